// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::manager::Operation;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by an [`AddonClient`](crate::client::AddonClient) implementation
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Failed to load Kubernetes config: {0}")]
    ConfigError(String),

    #[error("Invalid manifest: {0}")]
    ManifestError(String),

    #[error("Resource kind {0} is not served by the cluster")]
    UnknownKind(String),

    #[error("OLM version {version:?} is already installed in namespace {namespace:?}")]
    AlreadyInstalled { namespace: String, version: String },

    #[error("no OLM installation found in namespace {0:?}")]
    NotInstalled(String),

    #[error("installed OLM in namespace {0:?} does not report a version")]
    MissingVersion(String),
}

/// Errors returned by the [`Manager`](crate::manager::Manager) operations.
///
/// Causes are shared through `Arc` so that a failed initialization can be
/// replayed to every later caller.
#[derive(Error, Debug, Clone)]
pub enum ManagerError {
    #[error("failed to get Kubernetes config: {0}")]
    Configuration(#[source] Arc<ClientError>),

    #[error("failed to create manager client: {0}")]
    ClientConstruction(#[source] Arc<ClientError>),

    #[error("error getting installed OLM version (set --version to override the default version): {0}")]
    UnresolvableVersion(#[source] Arc<ClientError>),

    #[error("mismatched installed version {installed:?} vs. supplied version {supplied:?}")]
    VersionMismatch { installed: String, supplied: String },

    #[error("{operation} failed: {source}")]
    RemoteOperation {
        operation: Operation,
        #[source]
        source: Arc<ClientError>,
    },

    #[error("{operation} did not complete within {timeout:?}")]
    Timeout {
        operation: Operation,
        timeout: Duration,
    },
}

impl ManagerError {
    pub(crate) fn remote(operation: Operation, source: ClientError) -> Self {
        ManagerError::RemoteOperation {
            operation,
            source: Arc::new(source),
        }
    }
}

pub type Result<T> = std::result::Result<T, ManagerError>;
