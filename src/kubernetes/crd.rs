// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! CRD availability checking utilities

use crate::constants::poll::INTERVAL_MS;
use crate::error::ClientError;
use crate::kubernetes::resources::ResourceApis;
use kube::{core::GroupVersionKind, Client};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Wait until the cluster serves every one of `kinds`.
///
/// Polls discovery at a fixed interval; the caller bounds the total wait.
#[instrument(skip_all, fields(kinds = kinds.len()))]
pub async fn wait_for_kinds(
    client: &Client,
    kinds: &[GroupVersionKind],
) -> Result<ResourceApis, ClientError> {
    let mut announced = false;

    loop {
        match ResourceApis::discover(client).await {
            Ok(apis) => {
                let missing: Vec<String> = kinds
                    .iter()
                    .filter(|gvk| !apis.serves(gvk))
                    .map(|gvk| format!("{}/{}", gvk.api_version(), gvk.kind))
                    .collect();

                if missing.is_empty() {
                    info!("All {} resource kinds are available", kinds.len());
                    return Ok(apis);
                }

                if announced {
                    debug!("Resource kinds still unavailable: {}", missing.join(", "));
                } else {
                    info!(
                        "Waiting for resource kinds to become available: {}, checking every {} ms",
                        missing.join(", "),
                        INTERVAL_MS
                    );
                    announced = true;
                }
            }
            Err(e) => {
                warn!(
                    "Error running API discovery: {}, retrying in {} ms",
                    e, INTERVAL_MS
                );
            }
        }

        sleep(Duration::from_millis(INTERVAL_MS)).await;
    }
}
