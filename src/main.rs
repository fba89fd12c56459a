// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use olm_installer::cli::{self, Cli};
use olm_installer::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout only carries the status output
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::from_env()?;

    cli::run(cli, config).await
}
