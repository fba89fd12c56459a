// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Install, uninstall and status of OLM, bounded by a per-operation timeout.

mod init;
pub mod version;

pub use init::Settings;
pub use version::{reconcile_version, Resolution};

use crate::client::{AddonClient, ClientProvider};
use crate::error::{ManagerError, Result};
use init::InitState;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;

/// Top-level operation, used to label errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Uninstall,
    Status,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Install => "install",
            Operation::Uninstall => "uninstall",
            Operation::Status => "status",
        })
    }
}

/// Names the release an install was asked for; an empty version leaves the
/// choice to the client.
fn installed_label(version: &str) -> String {
    if version.trim().is_empty() {
        "the default OLM version".to_string()
    } else {
        format!("OLM version {}", version)
    }
}

/// Runs a single OLM lifecycle operation against a cluster.
///
/// The client, timeout and namespace are finalized lazily on the first
/// operation; see [`Manager::ensure_initialized`].
pub struct Manager {
    provider: Arc<dyn ClientProvider>,
    client: Option<Arc<dyn AddonClient>>,
    version: String,
    timeout: Duration,
    namespace: String,
    init: Mutex<InitState>,
}

impl Manager {
    pub fn new(provider: Arc<dyn ClientProvider>) -> Self {
        Self {
            provider,
            client: None,
            version: String::new(),
            timeout: Duration::ZERO,
            namespace: String::new(),
            init: Mutex::new(InitState::Uninitialized),
        }
    }

    /// Use an existing client instead of building one from the cluster config
    pub fn with_client(mut self, client: Arc<dyn AddonClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Version to operate on; empty lets the operation decide
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Bound for each remote call; zero selects the default
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// The configured version, or the reconciled one after an uninstall/status
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Install the configured version and return the resulting status
    pub async fn install(&self) -> Result<String> {
        let settings = self.ensure_initialized().await?;

        let status = bounded(Operation::Install, settings.timeout(), async {
            settings
                .client()
                .install_version(settings.namespace(), &self.version)
                .await
                .map_err(|e| ManagerError::remote(Operation::Install, e))
        })
        .await?;

        info!("Successfully installed {}", installed_label(&self.version));
        Ok(status)
    }

    pub async fn uninstall(&mut self) -> Result<()> {
        let settings = self.ensure_initialized().await?;

        let version = bounded(Operation::Uninstall, settings.timeout(), async {
            let version = self.effective_version(&settings).await?;
            settings
                .client()
                .uninstall_version(&version)
                .await
                .map_err(|e| ManagerError::remote(Operation::Uninstall, e))?;
            Ok(version)
        })
        .await?;

        info!("Successfully uninstalled OLM version {:?}", version);
        Ok(())
    }

    /// Status of the installed (or configured) version
    pub async fn status(&mut self) -> Result<String> {
        let settings = self.ensure_initialized().await?;

        let (version, status) = bounded(Operation::Status, settings.timeout(), async {
            let version = self.effective_version(&settings).await?;
            let status = settings
                .client()
                .get_status(&version)
                .await
                .map_err(|e| ManagerError::remote(Operation::Status, e))?;
            Ok((version, status))
        })
        .await?;

        info!("Successfully got OLM status for version {:?}", version);
        Ok(status)
    }

    /// Reconcile the configured version with the installed one and record the result
    async fn effective_version(&mut self, settings: &Settings) -> Result<String> {
        let installed = settings
            .client()
            .get_installed_version(settings.namespace())
            .await;
        let version = reconcile_version(&self.version, installed)?.into_version();
        self.version.clone_from(&version);
        Ok(version)
    }
}

/// Run `operation` under `timeout`; the future is dropped on expiry
async fn bounded<T, F>(operation: Operation, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(ManagerError::Timeout { operation, timeout }),
    }
}
