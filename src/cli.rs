// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Command line interface

use crate::client::ClientProvider;
use crate::config::Config;
use crate::constants::DEFAULT_TIMEOUT;
use crate::kubernetes::KubeProvider;
use crate::manager::Manager;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "olm-installer",
    about = "Install, uninstall and inspect the Operator Lifecycle Manager"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install OLM in the cluster
    Install(OperationArgs),
    /// Uninstall OLM from the cluster
    Uninstall(OperationArgs),
    /// Get the status of the OLM installation
    Status(OperationArgs),
}

#[derive(Args, Debug, Clone)]
pub struct OperationArgs {
    /// Version of OLM resources to operate on (defaults to the installed version, or the default release on install)
    #[arg(long)]
    pub version: Option<String>,

    /// Namespace OLM is installed in [default: olm]
    #[arg(long)]
    pub namespace: Option<String>,

    #[command(flatten)]
    pub timeout: TimeoutArgs,
}

impl OperationArgs {
    pub fn manager(&self, provider: Arc<dyn ClientProvider>) -> Manager {
        let manager = Manager::new(provider)
            .with_version(self.version.clone().unwrap_or_default())
            .with_namespace(self.namespace.clone().unwrap_or_default());
        self.timeout.apply(manager)
    }
}

/// The `--timeout` option of every manager command
#[derive(Args, Debug, Clone, Copy)]
pub struct TimeoutArgs {
    /// time to wait for the command to complete before failing
    #[arg(long, value_parser = humantime::parse_duration, default_value = "2m")]
    pub timeout: Duration,
}

impl Default for TimeoutArgs {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TimeoutArgs {
    pub fn apply(&self, manager: Manager) -> Manager {
        manager.with_timeout(self.timeout)
    }
}

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let provider: Arc<dyn ClientProvider> = Arc::new(KubeProvider::new(config.manifests_dir));

    match cli.command {
        Commands::Install(args) => {
            let status = args.manager(provider).install().await?;
            print_status(&status);
        }
        Commands::Uninstall(args) => {
            args.manager(provider).uninstall().await?;
        }
        Commands::Status(args) => {
            let status = args.manager(provider).status().await?;
            print_status(&status);
        }
    }

    Ok(())
}

fn print_status(status: &str) {
    println!();
    println!("{}", status);
}
