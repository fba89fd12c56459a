// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Capabilities the [`Manager`](crate::manager::Manager) depends on.
//!
//! Production code uses the kube-backed implementations in
//! [`crate::kubernetes`]; tests substitute in-memory ones.

use crate::error::ClientError;
use async_trait::async_trait;
use std::sync::Arc;

/// Remote operations against the OLM installation in a cluster.
///
/// Calls are bounded by the caller: dropping the returned future cancels the
/// operation.
#[async_trait]
pub trait AddonClient: Send + Sync {
    /// Install `version` into `namespace` and return a human-readable status.
    /// An empty version installs the client's default release.
    async fn install_version(&self, namespace: &str, version: &str) -> Result<String, ClientError>;

    /// Version currently installed in `namespace`
    async fn get_installed_version(&self, namespace: &str) -> Result<String, ClientError>;

    async fn uninstall_version(&self, version: &str) -> Result<(), ClientError>;

    /// Human-readable status of the resources belonging to `version`
    async fn get_status(&self, version: &str) -> Result<String, ClientError>;
}

/// Discovers cluster configuration and builds an [`AddonClient`] from it.
#[async_trait]
pub trait ClientProvider: Send + Sync {
    async fn discover_config(&self) -> Result<kube::Config, ClientError>;

    async fn build_client(&self, config: kube::Config) -> Result<Arc<dyn AddonClient>, ClientError>;
}
