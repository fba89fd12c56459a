// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Test doubles for the Kubernetes API and the installer capabilities.

use crate::client::{AddonClient, ClientProvider};
use crate::error::ClientError;
use async_trait::async_trait;
use http::{Request, Response};
use kube::client::Body;
use kube::Client;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tower::Service;

/// Responses queued for one `(method, path)` route
type Routes = HashMap<(String, String), VecDeque<(u16, String)>>;

/// A mock HTTP service that returns predefined responses based on request paths.
///
/// Several responses registered for the same route are served in order; the
/// last one keeps being served once the others are used up.
#[derive(Clone)]
pub struct MockService {
    responses: Arc<Mutex<Routes>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockService {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a response for GET requests matching the exact path
    pub fn on_get(self, path: &str, status: u16, body: &str) -> Self {
        self.on("GET", path, status, body)
    }

    /// Add a response for PATCH requests matching the exact path
    pub fn on_patch(self, path: &str, status: u16, body: &str) -> Self {
        self.on("PATCH", path, status, body)
    }

    /// Add a response for DELETE requests matching the exact path
    pub fn on_delete(self, path: &str, status: u16, body: &str) -> Self {
        self.on("DELETE", path, status, body)
    }

    fn on(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry((method.to_string(), path.to_string()))
            .or_default()
            .push_back((status, body.to_string()));
        self
    }

    /// Serve API discovery for the core group plus the CRD and OLM operator groups
    pub fn with_olm_discovery(self) -> Self {
        self.on_get("/api", 200, &api_versions_json())
            .on_get(
                "/api/v1",
                200,
                &api_resource_list_json(
                    "v1",
                    &[("namespaces", "Namespace", false), ("configmaps", "ConfigMap", true)],
                ),
            )
            .on_get(
                "/apis",
                200,
                &api_group_list_json(&["apiextensions.k8s.io/v1", "operators.coreos.com/v1alpha1"]),
            )
            .on_get(
                "/apis/apiextensions.k8s.io/v1",
                200,
                &api_resource_list_json(
                    "apiextensions.k8s.io/v1",
                    &[("customresourcedefinitions", "CustomResourceDefinition", false)],
                ),
            )
            .on_get(
                "/apis/operators.coreos.com/v1alpha1",
                200,
                &api_resource_list_json(
                    "operators.coreos.com/v1alpha1",
                    &[("clusterserviceversions", "ClusterServiceVersion", true)],
                ),
            )
    }

    /// Build a kube Client from this mock service
    pub fn into_client(self) -> Client {
        Client::new(self, "olm")
    }

    /// Paths requested with `method`, in request order
    pub fn requests(&self, method: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, path)| path.clone())
            .collect()
    }

    fn find_response(&self, method: &str, path: &str) -> Option<(u16, String)> {
        let mut responses = self.responses.lock().unwrap();
        let queue = responses.get_mut(&(method.to_string(), path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Default for MockService {
    fn default() -> Self {
        Self::new()
    }
}

impl Service<Request<Body>> for MockService {
    type Response = Response<Body>;
    type Error = tower::BoxError;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let method = req.method().to_string();
        let path = req.uri().path().to_string();

        self.requests
            .lock()
            .unwrap()
            .push((method.clone(), path.clone()));

        let (status, body) = self
            .find_response(&method, &path)
            .unwrap_or_else(|| (404, not_found_json(&path)));

        Box::pin(async move {
            Ok(Response::builder()
                .status(status)
                .header("content-type", "application/json")
                .body(Body::from(body.into_bytes()))
                .unwrap())
        })
    }
}

/// Core API versions served under `/api`
pub fn api_versions_json() -> String {
    serde_json::json!({
        "kind": "APIVersions",
        "apiVersion": "v1",
        "versions": ["v1"],
        "serverAddressByClientCIDRs": [
            { "clientCIDR": "0.0.0.0/0", "serverAddress": "127.0.0.1:6443" }
        ]
    })
    .to_string()
}

/// API groups served under `/apis`, one entry per `group/version`
pub fn api_group_list_json(group_versions: &[&str]) -> String {
    let groups: Vec<serde_json::Value> = group_versions
        .iter()
        .map(|gv| {
            let (group, version) = gv.split_once('/').unwrap();
            let version = serde_json::json!({ "groupVersion": gv, "version": version });
            serde_json::json!({
                "name": group,
                "versions": [version.clone()],
                "preferredVersion": version
            })
        })
        .collect();

    serde_json::json!({
        "kind": "APIGroupList",
        "apiVersion": "v1",
        "groups": groups
    })
    .to_string()
}

/// Resources of one group version as `(plural, kind, namespaced)`
pub fn api_resource_list_json(group_version: &str, resources: &[(&str, &str, bool)]) -> String {
    let resources: Vec<serde_json::Value> = resources
        .iter()
        .map(|(plural, kind, namespaced)| {
            serde_json::json!({
                "name": plural,
                "singularName": kind.to_lowercase(),
                "namespaced": namespaced,
                "kind": kind,
                "verbs": ["create", "delete", "get", "list", "patch", "update", "watch"]
            })
        })
        .collect();

    serde_json::json!({
        "kind": "APIResourceList",
        "apiVersion": "v1",
        "groupVersion": group_version,
        "resources": resources
    })
    .to_string()
}

/// Create a minimal object response
pub fn object_json(api_version: &str, kind: &str, name: &str, namespace: Option<&str>) -> String {
    let mut value = serde_json::json!({
        "apiVersion": api_version,
        "kind": kind,
        "metadata": { "name": name, "uid": format!("{}-uid", name) }
    });
    if let Some(ns) = namespace {
        value["metadata"]["namespace"] = ns.into();
    }
    value.to_string()
}

/// Create a successful delete response
pub fn status_success_json() -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Success",
        "code": 200
    })
    .to_string()
}

/// Parse a manifest-style object
pub fn dynamic_object(
    api_version: &str,
    kind: &str,
    name: &str,
    namespace: Option<&str>,
) -> kube::api::DynamicObject {
    serde_json::from_str(&object_json(api_version, kind, name, namespace)).unwrap()
}

/// Create a mock packageserver ClusterServiceVersion response
pub fn csv_json(namespace: &str, version: Option<&str>, phase: &str) -> String {
    let mut spec = serde_json::json!({ "displayName": "Package Server" });
    if let Some(version) = version {
        spec["version"] = version.into();
    }

    serde_json::json!({
        "apiVersion": "operators.coreos.com/v1alpha1",
        "kind": "ClusterServiceVersion",
        "metadata": {
            "name": "packageserver",
            "namespace": namespace,
            "uid": "test-uid"
        },
        "spec": spec,
        "status": { "phase": phase }
    })
    .to_string()
}

/// Create a 404 not found response
pub fn not_found_json(path: &str) -> String {
    serde_json::json!({
        "kind": "Status",
        "apiVersion": "v1",
        "status": "Failure",
        "message": format!("{} not found", path),
        "reason": "NotFound",
        "code": 404
    })
    .to_string()
}

/// A call received by [`MockAddonClient`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Install { namespace: String, version: String },
    GetInstalledVersion { namespace: String },
    Uninstall { version: String },
    Status { version: String },
}

/// In-memory [`AddonClient`] that records every call
pub struct MockAddonClient {
    installed: Option<String>,
    failing: bool,
    delay: Duration,
    calls: Mutex<Vec<Call>>,
}

impl MockAddonClient {
    /// A client whose installed version lookup returns `version`
    pub fn installed(version: &str) -> Self {
        Self {
            installed: Some(version.to_string()),
            failing: false,
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A client whose installed version lookup fails
    pub fn not_installed() -> Self {
        Self {
            installed: None,
            ..Self::installed("")
        }
    }

    /// Make install, uninstall and status fail
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Delay every call by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Whether install, uninstall or status was called
    pub fn has_mutations(&self) -> bool {
        self.calls()
            .iter()
            .any(|c| !matches!(c, Call::GetInstalledVersion { .. }))
    }

    async fn record(&self, call: Call) -> Result<(), ClientError> {
        self.calls.lock().unwrap().push(call);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(())
    }

    fn check_failing(&self) -> Result<(), ClientError> {
        if self.failing {
            return Err(ClientError::ManifestError("simulated failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AddonClient for MockAddonClient {
    async fn install_version(&self, namespace: &str, version: &str) -> Result<String, ClientError> {
        self.record(Call::Install {
            namespace: namespace.to_string(),
            version: version.to_string(),
        })
        .await?;
        self.check_failing()?;
        Ok(format!("OLM {} installed in {}", version, namespace))
    }

    async fn get_installed_version(&self, namespace: &str) -> Result<String, ClientError> {
        self.record(Call::GetInstalledVersion {
            namespace: namespace.to_string(),
        })
        .await?;
        self.installed
            .clone()
            .ok_or_else(|| ClientError::NotInstalled(namespace.to_string()))
    }

    async fn uninstall_version(&self, version: &str) -> Result<(), ClientError> {
        self.record(Call::Uninstall {
            version: version.to_string(),
        })
        .await?;
        self.check_failing()
    }

    async fn get_status(&self, version: &str) -> Result<String, ClientError> {
        self.record(Call::Status {
            version: version.to_string(),
        })
        .await?;
        self.check_failing()?;
        Ok(format!("OLM {} is healthy", version))
    }
}

/// [`ClientProvider`] handing out a fixed client and counting its invocations
pub struct StaticProvider {
    client: Arc<dyn AddonClient>,
    fail_config: bool,
    fail_build: bool,
    delay: Duration,
    discover_calls: AtomicUsize,
    build_calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(client: Arc<dyn AddonClient>) -> Self {
        Self {
            client,
            fail_config: false,
            fail_build: false,
            delay: Duration::ZERO,
            discover_calls: AtomicUsize::new(0),
            build_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_config(mut self) -> Self {
        self.fail_config = true;
        self
    }

    pub fn failing_build(mut self) -> Self {
        self.fail_build = true;
        self
    }

    /// Delay config discovery, widening the window for concurrent callers
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn discover_calls(&self) -> usize {
        self.discover_calls.load(Ordering::SeqCst)
    }

    pub fn build_calls(&self) -> usize {
        self.build_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientProvider for StaticProvider {
    async fn discover_config(&self) -> Result<kube::Config, ClientError> {
        self.discover_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_config {
            return Err(ClientError::ConfigError("no kubeconfig found".to_string()));
        }
        Ok(kube::Config::new(
            "https://127.0.0.1:6443".parse::<http::Uri>().unwrap(),
        ))
    }

    async fn build_client(&self, _config: kube::Config) -> Result<Arc<dyn AddonClient>, ClientError> {
        self.build_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_build {
            return Err(ClientError::ConfigError("invalid client certificate".to_string()));
        }
        Ok(Arc::clone(&self.client))
    }
}
