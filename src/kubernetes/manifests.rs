// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! OLM release manifest loading and parsing

use crate::constants::manifests::{CRDS_FILE, OLM_FILE};
use crate::error::ClientError;
use kube::api::DynamicObject;
use kube::core::GroupVersionKind;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

type Result<T> = std::result::Result<T, ClientError>;

/// The parsed manifests of one OLM release
#[derive(Debug, Clone)]
pub struct Release {
    pub version: String,
    pub crds: Vec<DynamicObject>,
    pub resources: Vec<DynamicObject>,
}

impl Release {
    /// Distinct kinds used by the non-CRD resources, in manifest order
    pub fn resource_kinds(&self) -> Result<Vec<GroupVersionKind>> {
        let mut kinds: Vec<GroupVersionKind> = Vec::new();
        for obj in &self.resources {
            let gvk = gvk_of(obj)?;
            if !kinds.contains(&gvk) {
                kinds.push(gvk);
            }
        }
        Ok(kinds)
    }
}

/// Directory of release manifests laid out as `<dir>/v<version>/{crds,olm}.yaml`
#[derive(Debug, Clone)]
pub struct ManifestSource {
    dir: PathBuf,
}

impl ManifestSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn release_dir(&self, version: &str) -> PathBuf {
        self.dir.join(format!("v{}", normalize_version(version)))
    }

    /// Read and parse the manifests of a release
    #[instrument(skip(self))]
    pub async fn load(&self, version: &str) -> Result<Release> {
        let dir = self.release_dir(version);
        let crds = parse_manifests(&read_manifest(&dir.join(CRDS_FILE)).await?)?;
        let resources = parse_manifests(&read_manifest(&dir.join(OLM_FILE)).await?)?;

        debug!(
            "Loaded {} CRDs and {} resources from {}",
            crds.len(),
            resources.len(),
            dir.display()
        );

        Ok(Release {
            version: normalize_version(version).to_string(),
            crds,
            resources,
        })
    }
}

async fn read_manifest(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        ClientError::ManifestError(format!("Failed to read {}: {}", path.display(), e))
    })
}

/// Strip whitespace and a leading `v` so `v0.28.0` and `0.28.0` name the same release
pub fn normalize_version(version: &str) -> &str {
    let version = version.trim();
    version.strip_prefix('v').unwrap_or(version)
}

/// Split a multi-document YAML stream into dynamic objects, skipping empty documents
pub fn parse_manifests(yaml: &str) -> Result<Vec<DynamicObject>> {
    let mut objects = Vec::new();

    for document in serde_yaml::Deserializer::from_str(yaml) {
        let value = serde_yaml::Value::deserialize(document)
            .map_err(|e| ClientError::ManifestError(format!("Failed to parse YAML: {}", e)))?;
        if value.is_null() {
            continue;
        }

        let obj: DynamicObject = serde_yaml::from_value(value)
            .map_err(|e| ClientError::ManifestError(format!("Invalid object: {}", e)))?;

        if obj.metadata.name.is_none() {
            return Err(ClientError::ManifestError(
                "object without metadata.name".to_string(),
            ));
        }
        gvk_of(&obj)?;

        objects.push(obj);
    }

    Ok(objects)
}

/// Group, version and kind of a manifest object
pub fn gvk_of(obj: &DynamicObject) -> Result<GroupVersionKind> {
    let Some(types) = obj.types.as_ref() else {
        return Err(ClientError::ManifestError(format!(
            "object {:?} has no apiVersion/kind",
            obj.metadata.name.as_deref().unwrap_or_default()
        )));
    };

    let (group, version) = match types.api_version.split_once('/') {
        Some((group, version)) => (group, version),
        None => ("", types.api_version.as_str()),
    };

    if version.is_empty() || types.kind.is_empty() {
        return Err(ClientError::ManifestError(format!(
            "object {:?} has an incomplete apiVersion/kind",
            obj.metadata.name.as_deref().unwrap_or_default()
        )));
    }

    Ok(GroupVersionKind::gvk(group, version, &types.kind))
}

/// `Kind/name` label used in logs and status output
pub fn describe(obj: &DynamicObject) -> String {
    let kind = obj.types.as_ref().map(|t| t.kind.as_str()).unwrap_or("Unknown");
    format!("{}/{}", kind, obj.metadata.name.as_deref().unwrap_or_default())
}
