// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use crate::constants::manifests;
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Installer configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing the OLM release manifests, one `v<version>` folder per release
    pub manifests_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let manifests_dir = match env::var("OLM_MANIFESTS_DIR") {
            Ok(dir) if dir.trim().is_empty() => {
                anyhow::bail!("OLM_MANIFESTS_DIR environment variable is set but empty")
            }
            Ok(dir) => PathBuf::from(dir),
            Err(env::VarError::NotPresent) => PathBuf::from(manifests::DEFAULT_DIR),
            Err(e) => return Err(e).context("OLM_MANIFESTS_DIR environment variable is not valid"),
        };

        Ok(Config { manifests_dir })
    }
}
