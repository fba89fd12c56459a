// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! One-shot initialization of a [`Manager`]

use super::Manager;
use crate::client::AddonClient;
use crate::constants::{DEFAULT_NAMESPACE, DEFAULT_TIMEOUT};
use crate::error::{ManagerError, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Values fixed by a successful initialization
pub struct Settings {
    client: Arc<dyn AddonClient>,
    timeout: Duration,
    namespace: String,
}

impl Settings {
    pub fn client(&self) -> &Arc<dyn AddonClient> {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("timeout", &self.timeout)
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

/// Initialization progress. The attempt in flight holds the lock around this
/// state, so "initializing" is the locked `Uninitialized` state.
pub(super) enum InitState {
    Uninitialized,
    Ready(Arc<Settings>),
    Failed(ManagerError),
}

impl Manager {
    /// Finalize the configuration of this manager.
    ///
    /// Only the first call discovers the cluster config, builds the client and
    /// applies defaults. Concurrent callers wait for that attempt and every
    /// later call gets its outcome, including a failure.
    pub async fn ensure_initialized(&self) -> Result<Arc<Settings>> {
        let mut state = self.init.lock().await;

        match &*state {
            InitState::Ready(settings) => return Ok(Arc::clone(settings)),
            InitState::Failed(err) => return Err(err.clone()),
            InitState::Uninitialized => {}
        }

        let outcome = self.initialize().await.map(Arc::new);
        *state = match &outcome {
            Ok(settings) => InitState::Ready(Arc::clone(settings)),
            Err(err) => InitState::Failed(err.clone()),
        };
        outcome
    }

    #[instrument(skip(self))]
    async fn initialize(&self) -> Result<Settings> {
        let client = match &self.client {
            Some(client) => Arc::clone(client),
            None => {
                let config = self
                    .provider
                    .discover_config()
                    .await
                    .map_err(|e| ManagerError::Configuration(Arc::new(e)))?;
                self.provider
                    .build_client(config)
                    .await
                    .map_err(|e| ManagerError::ClientConstruction(Arc::new(e)))?
            }
        };

        let timeout = if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        };
        let namespace = if self.namespace.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            self.namespace.clone()
        };

        debug!("Manager initialized: namespace={}, timeout={:?}", namespace, timeout);

        Ok(Settings {
            client,
            timeout,
            namespace,
        })
    }
}
