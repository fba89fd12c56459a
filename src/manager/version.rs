// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Reconciliation of the requested OLM version against the installed one

use crate::error::{ClientError, ManagerError};
use std::sync::Arc;
use tracing::debug;

/// How the effective version of an uninstall/status was determined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing was requested, so the installed version is used
    Adopted(String),
    /// The requested version is the installed one
    Confirmed(String),
    /// The installed version could not be queried; the requested one is used as-is
    Overridden(String),
}

impl Resolution {
    pub fn version(&self) -> &str {
        match self {
            Resolution::Adopted(v) | Resolution::Confirmed(v) | Resolution::Overridden(v) => v,
        }
    }

    pub fn into_version(self) -> String {
        match self {
            Resolution::Adopted(v) | Resolution::Confirmed(v) | Resolution::Overridden(v) => v,
        }
    }
}

/// Decide which version an uninstall or status targets.
///
/// `requested` is the caller-supplied version (empty when unspecified) and
/// `installed` the outcome of querying the cluster for the installed version.
pub fn reconcile_version(
    requested: &str,
    installed: Result<String, ClientError>,
) -> Result<Resolution, ManagerError> {
    match installed {
        Ok(installed) if requested.is_empty() => Ok(Resolution::Adopted(installed)),
        Ok(installed) if installed != requested => Err(ManagerError::VersionMismatch {
            installed,
            supplied: requested.to_string(),
        }),
        Ok(_) => Ok(Resolution::Confirmed(requested.to_string())),
        Err(e) if requested.is_empty() => Err(ManagerError::UnresolvableVersion(Arc::new(e))),
        Err(e) => {
            debug!(
                "Ignoring failed installed version lookup, using supplied version {:?}: {}",
                requested, e
            );
            Ok(Resolution::Overridden(requested.to_string()))
        }
    }
}
