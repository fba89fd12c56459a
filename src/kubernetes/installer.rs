// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! [`AddonClient`] backed by the Kubernetes API and local OLM release manifests

use crate::client::AddonClient;
use crate::constants::csv::PACKAGESERVER;
use crate::constants::poll::INTERVAL_MS;
use crate::constants::DEFAULT_VERSION;
use crate::error::ClientError;
use crate::kubernetes::crd::wait_for_kinds;
use crate::kubernetes::manifests::{ManifestSource, Release};
use crate::kubernetes::resources::ResourceApis;
use crate::types::ClusterServiceVersion;
use async_trait::async_trait;
use kube::{api::DynamicObject, Api, Client, ResourceExt};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

type Result<T> = std::result::Result<T, ClientError>;

pub struct KubeAddonClient {
    client: Client,
    manifests: ManifestSource,
}

impl KubeAddonClient {
    pub fn new(client: Client, manifests: ManifestSource) -> Self {
        Self { client, manifests }
    }

    /// Wait for the packageserver CSV to report a successful install
    async fn wait_for_packageserver(&self, namespace: &str) -> Result<()> {
        let csvs: Api<ClusterServiceVersion> = Api::namespaced(self.client.clone(), namespace);

        loop {
            match csvs.get_opt(PACKAGESERVER).await? {
                Some(csv) if csv.is_succeeded() => {
                    info!("ClusterServiceVersion {}/{} succeeded", namespace, PACKAGESERVER);
                    return Ok(());
                }
                Some(csv) => debug!(
                    "ClusterServiceVersion {}/{} in phase {}",
                    namespace,
                    PACKAGESERVER,
                    csv.phase().unwrap_or("Unknown")
                ),
                None => debug!(
                    "ClusterServiceVersion {}/{} not created yet",
                    namespace, PACKAGESERVER
                ),
            }

            sleep(Duration::from_millis(INTERVAL_MS)).await;
        }
    }

    async fn release_status(&self, apis: &ResourceApis, release: &Release) -> String {
        let mut rows = Vec::with_capacity(release.crds.len() + release.resources.len());
        for obj in release.crds.iter().chain(release.resources.iter()) {
            let status = match apis.get(obj).await {
                Ok(Some(live)) => resource_status(&live),
                Ok(None) => "Not found".to_string(),
                Err(e) => format!("Failed to get resource: {}", e),
            };
            rows.push(StatusRow::new(obj, status));
        }
        render_status(&rows)
    }
}

#[async_trait]
impl AddonClient for KubeAddonClient {
    #[instrument(skip(self))]
    async fn install_version(&self, namespace: &str, version: &str) -> Result<String> {
        let version = if version.trim().is_empty() {
            DEFAULT_VERSION
        } else {
            version
        };

        match self.get_installed_version(namespace).await {
            Ok(installed) => {
                return Err(ClientError::AlreadyInstalled {
                    namespace: namespace.to_string(),
                    version: installed,
                })
            }
            Err(ClientError::NotInstalled(_)) => {}
            Err(e) => return Err(e),
        }

        let release = self.manifests.load(version).await?;
        info!("Installing OLM version {}", release.version);

        let crd_apis = ResourceApis::discover(&self.client).await?;
        for crd in &release.crds {
            crd_apis.apply(crd).await?;
        }

        let apis = wait_for_kinds(&self.client, &release.resource_kinds()?).await?;
        for obj in &release.resources {
            apis.apply(obj).await?;
        }

        self.wait_for_packageserver(namespace).await?;

        Ok(self.release_status(&apis, &release).await)
    }

    #[instrument(skip(self))]
    async fn get_installed_version(&self, namespace: &str) -> Result<String> {
        let csvs: Api<ClusterServiceVersion> = Api::namespaced(self.client.clone(), namespace);

        let Some(csv) = csvs.get_opt(PACKAGESERVER).await? else {
            return Err(ClientError::NotInstalled(namespace.to_string()));
        };

        csv.version()
            .map(str::to_string)
            .ok_or_else(|| ClientError::MissingVersion(namespace.to_string()))
    }

    #[instrument(skip(self))]
    async fn uninstall_version(&self, version: &str) -> Result<()> {
        let release = self.manifests.load(version).await?;
        let apis = ResourceApis::discover(&self.client).await?;

        let mut deleted = 0;
        for obj in release.resources.iter().rev().chain(release.crds.iter().rev()) {
            if apis.delete(obj).await? {
                deleted += 1;
            }
        }

        if deleted == 0 {
            warn!("No resources of OLM version {} were found", release.version);
        } else {
            info!("Deleted {} resources of OLM version {}", deleted, release.version);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_status(&self, version: &str) -> Result<String> {
        let release = self.manifests.load(version).await?;
        let apis = ResourceApis::discover(&self.client).await?;

        Ok(self.release_status(&apis, &release).await)
    }
}

/// Status column for a live object: CSVs report their phase, anything else is installed
fn resource_status(live: &DynamicObject) -> String {
    let is_csv = live
        .types
        .as_ref()
        .is_some_and(|t| t.kind == "ClusterServiceVersion");

    if is_csv {
        live.data
            .pointer("/status/phase")
            .and_then(|p| p.as_str())
            .unwrap_or("Unknown")
            .to_string()
    } else {
        "Installed".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusRow {
    name: String,
    namespace: String,
    kind: String,
    status: String,
}

impl StatusRow {
    fn new(obj: &DynamicObject, status: String) -> Self {
        Self {
            name: obj.name_any(),
            namespace: obj.namespace().unwrap_or_default(),
            kind: obj
                .types
                .as_ref()
                .map(|t| t.kind.clone())
                .unwrap_or_default(),
            status,
        }
    }
}

/// Render rows as a left-aligned table with a header
fn render_status(rows: &[StatusRow]) -> String {
    const HEADER: [&str; 4] = ["NAME", "NAMESPACE", "KIND", "STATUS"];

    let mut widths = HEADER.map(str::len);
    for row in rows {
        widths[0] = widths[0].max(row.name.len());
        widths[1] = widths[1].max(row.namespace.len());
        widths[2] = widths[2].max(row.kind.len());
    }

    let line = |cells: [&str; 4]| {
        format!(
            "{:<w0$}   {:<w1$}   {:<w2$}   {}",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
        )
        .trim_end()
        .to_string()
    };

    let mut lines = vec![line(HEADER)];
    lines.extend(rows.iter().map(|r| {
        line([
            r.name.as_str(),
            r.namespace.as_str(),
            r.kind.as_str(),
            r.status.as_str(),
        ])
    }));
    lines.join("\n")
}
