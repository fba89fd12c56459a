// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

/// OLM version installed when none is requested
pub const DEFAULT_VERSION: &str = "0.28.0";

/// Time to wait for a command to complete before failing
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2 * 60);

/// Namespace where OLM is installed
pub const DEFAULT_NAMESPACE: &str = "olm";

/// Field manager name used for server-side apply
pub const FIELD_MANAGER: &str = "olm-installer";

/// OLM release manifest layout
pub mod manifests {
    /// Default directory holding `v<version>/` release folders
    pub const DEFAULT_DIR: &str = "manifests";
    pub const CRDS_FILE: &str = "crds.yaml";
    pub const OLM_FILE: &str = "olm.yaml";
}

/// ClusterServiceVersion that carries the installed OLM version
pub mod csv {
    pub const PACKAGESERVER: &str = "packageserver";
    pub const PHASE_SUCCEEDED: &str = "Succeeded";
}

/// Readiness polling while an install is in progress
pub mod poll {
    /// Interval in milliseconds between discovery/readiness checks
    pub const INTERVAL_MS: u64 = 500;
}
