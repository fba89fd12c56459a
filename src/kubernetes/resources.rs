// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Apply, delete and look up manifest objects through API discovery

use crate::constants::FIELD_MANAGER;
use crate::error::ClientError;
use crate::kubernetes::manifests::{describe, gvk_of};
use kube::{
    api::{DeleteParams, DynamicObject, Patch, PatchParams},
    core::GroupVersionKind,
    discovery::{Discovery, Scope},
    Api, Client, ResourceExt,
};
use tracing::{debug, instrument};

type Result<T> = std::result::Result<T, ClientError>;

/// Dynamic API access for the kinds served by the cluster at discovery time
pub struct ResourceApis {
    client: Client,
    discovery: Discovery,
}

impl ResourceApis {
    /// Run a full API discovery against the cluster
    pub async fn discover(client: &Client) -> Result<Self> {
        let discovery = Discovery::new(client.clone()).run().await?;
        Ok(Self {
            client: client.clone(),
            discovery,
        })
    }

    pub fn serves(&self, gvk: &GroupVersionKind) -> bool {
        self.discovery.resolve_gvk(gvk).is_some()
    }

    fn api_for(&self, obj: &DynamicObject) -> Result<Api<DynamicObject>> {
        let gvk = gvk_of(obj)?;
        let Some((resource, caps)) = self.discovery.resolve_gvk(&gvk) else {
            return Err(ClientError::UnknownKind(format!(
                "{}/{}",
                gvk.api_version(),
                gvk.kind
            )));
        };

        Ok(if matches!(caps.scope, Scope::Namespaced) {
            let namespace = obj.namespace().unwrap_or_else(|| "default".to_string());
            Api::namespaced_with(self.client.clone(), &namespace, &resource)
        } else {
            Api::all_with(self.client.clone(), &resource)
        })
    }

    /// Server-side apply an object
    #[instrument(skip(self, obj), fields(resource = %describe(obj)))]
    pub async fn apply(&self, obj: &DynamicObject) -> Result<()> {
        let api = self.api_for(obj)?;
        let params = PatchParams::apply(FIELD_MANAGER).force();
        api.patch(&obj.name_any(), &params, &Patch::Apply(obj)).await?;
        debug!("Applied {}", describe(obj));
        Ok(())
    }

    /// Delete an object; returns false when it did not exist
    #[instrument(skip(self, obj), fields(resource = %describe(obj)))]
    pub async fn delete(&self, obj: &DynamicObject) -> Result<bool> {
        let api = match self.api_for(obj) {
            Ok(api) => api,
            // The CRD backing this kind is already gone, and so is the object
            Err(ClientError::UnknownKind(_)) => return Ok(false),
            Err(e) => return Err(e),
        };

        match api.delete(&obj.name_any(), &DeleteParams::background()).await {
            Ok(_) => {
                debug!("Deleted {}", describe(obj));
                Ok(true)
            }
            Err(kube::Error::Api(err)) if err.code == 404 => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Fetch the live counterpart of a manifest object
    pub async fn get(&self, obj: &DynamicObject) -> Result<Option<DynamicObject>> {
        let api = match self.api_for(obj) {
            Ok(api) => api,
            Err(ClientError::UnknownKind(_)) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(api.get_opt(&obj.name_any()).await?)
    }
}
