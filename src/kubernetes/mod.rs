// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes-backed implementation of the installer capabilities.

pub mod client;
pub mod crd;
pub mod installer;
pub mod manifests;
pub mod resources;

pub use client::KubeProvider;
pub use installer::KubeAddonClient;
pub use manifests::{ManifestSource, Release};
