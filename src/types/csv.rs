// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::csv::PHASE_SUCCEEDED;
use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// The subset of an OLM ClusterServiceVersion the installer cares about.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, schemars::JsonSchema)]
#[kube(group = "operators.coreos.com", version = "v1alpha1", kind = "ClusterServiceVersion")]
#[kube(namespaced)]
#[kube(status = "ClusterServiceVersionStatus")]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceVersionSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl ClusterServiceVersion {
    /// The operator version, if one is set and non-empty
    pub fn version(&self) -> Option<&str> {
        self.spec
            .version
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Current install phase as reported by OLM
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.phase.as_deref())
    }

    pub fn is_succeeded(&self) -> bool {
        self.phase() == Some(PHASE_SUCCEEDED)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, schemars::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterServiceVersionStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
