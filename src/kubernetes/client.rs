// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Cluster config discovery and client creation

use crate::client::{AddonClient, ClientProvider};
use crate::error::ClientError;
use crate::kubernetes::installer::KubeAddonClient;
use crate::kubernetes::manifests::ManifestSource;
use async_trait::async_trait;
use kube::{Client, Config as KConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Provider that infers the config from the ambient environment
/// (`KUBECONFIG`, `~/.kube/config` or the in-cluster service account)
#[derive(Debug, Clone)]
pub struct KubeProvider {
    manifests: ManifestSource,
}

impl KubeProvider {
    pub fn new(manifests_dir: impl Into<PathBuf>) -> Self {
        Self {
            manifests: ManifestSource::new(manifests_dir),
        }
    }
}

#[async_trait]
impl ClientProvider for KubeProvider {
    #[instrument(skip(self))]
    async fn discover_config(&self) -> Result<KConfig, ClientError> {
        let config = KConfig::infer()
            .await
            .map_err(|e| ClientError::ConfigError(format!("Failed to infer config: {}", e)))?;
        debug!("Using cluster {}", config.cluster_url);
        Ok(config)
    }

    async fn build_client(&self, config: KConfig) -> Result<Arc<dyn AddonClient>, ClientError> {
        let client = Client::try_from(config)?;
        Ok(Arc::new(KubeAddonClient::new(client, self.manifests.clone())))
    }
}
