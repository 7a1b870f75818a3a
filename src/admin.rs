//! Admin Resource Client
//!
//! Role CRUD against `/api/roles` and the `/api/users/set_role` action. Every method
//! issues exactly one request. Non-2xx responses become [`Error::AdminRequest`] with
//! the body's `message` when the server sent one; 2xx bodies that do not decode
//! become [`Error::AdminResponse`].

use crate::config::{normalize_source, ConfigDocument};
use crate::error::{Error, Result};
use crate::settings::Settings;
use crate::transport::{status_description, Method, Transport, TransportRequest, TransportResponse};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

/// Access-control role owned by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: String,
    pub name: String,
    pub arn: String,
}

#[derive(Deserialize)]
struct RoleList {
    results: Vec<Role>,
}

/// Registry admin API client
pub struct AdminClient<T> {
    transport: T,
    base_url: Url,
}

impl<T: Transport> AdminClient<T> {
    pub fn new(transport: T, registry_url: &str) -> Result<Self> {
        let base_url = normalize_source(registry_url)
            .map_err(|e| Error::Settings(format!("Invalid registry URL: {}", e)))?;
        Ok(Self {
            transport,
            base_url,
        })
    }

    /// Base URL from settings first, then `registryUrl` from the reconciled config.
    pub fn from_settings(
        transport: T,
        settings: &Settings,
        document: &ConfigDocument,
    ) -> Result<Self> {
        let registry_url = settings
            .registry_url
            .as_deref()
            .or_else(|| document.registry_url())
            .ok_or_else(|| {
                Error::NotConfigured(
                    "no registry URL; set registry_url or fetch a config that provides registryUrl"
                        .to_string(),
                )
            })?;
        Self::new(transport, registry_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn list_roles(&self) -> Result<Vec<Role>> {
        let response = self.execute(TransportRequest::new(Method::Get, self.url(&["api", "roles"])))?;
        let list: RoleList = decode(&response, "role list")?;
        Ok(list.results)
    }

    pub fn get_role(&self, id: &str) -> Result<Role> {
        let response = self.execute(TransportRequest::new(
            Method::Get,
            self.url(&["api", "roles", id]),
        ))?;
        decode(&response, "role")
    }

    pub fn create_role(&self, name: &str, arn: &str) -> Result<Role> {
        let request = TransportRequest::new(Method::Post, self.url(&["api", "roles"]))
            .with_json(json!({ "name": name, "arn": arn }));
        let response = self.execute(request)?;
        decode(&response, "created role")
    }

    /// Replace the mutable fields of a role. Issues only the PUT.
    pub fn edit_role(&self, id: &str, name: &str, arn: &str) -> Result<Role> {
        let request = TransportRequest::new(Method::Put, self.url(&["api", "roles", id]))
            .with_json(json!({ "name": name, "arn": arn }));
        let response = self.execute(request)?;
        decode(&response, "updated role")
    }

    pub fn delete_role(&self, id: &str) -> Result<()> {
        self.execute(TransportRequest::new(
            Method::Delete,
            self.url(&["api", "roles", id]),
        ))?;
        Ok(())
    }

    pub fn set_role(&self, user: &str, role: &str) -> Result<()> {
        let request = TransportRequest::new(Method::Post, self.url(&["api", "users", "set_role"]))
            .with_json(json!({ "user": user, "role": role }));
        self.execute(request)?;
        Ok(())
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        // http(s) URLs always have path segments
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    fn execute(&self, request: TransportRequest) -> Result<TransportResponse> {
        let method = request.method;
        let url = request.url.clone();
        debug!(method = %method, url = %url, "Admin request");

        let response = self.transport.send(request).map_err(|e| {
            warn!(method = %method, url = %url, error = %e, "Admin request failed");
            Error::AdminRequest {
                status: None,
                message: format!("{} {} failed: {}", method, url, e),
            }
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let message = response
            .json_body
            .as_ref()
            .and_then(|body| body.get("message"))
            .and_then(|message| message.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| {
                format!(
                    "{} {}: request failed with status {}",
                    method,
                    url,
                    status_description(response.status)
                )
            });
        warn!(method = %method, url = %url, status = response.status, "Admin request rejected");
        Err(Error::AdminRequest {
            status: Some(response.status),
            message,
        })
    }
}

fn decode<D: DeserializeOwned>(response: &TransportResponse, what: &str) -> Result<D> {
    let body = response.json_body.clone().ok_or_else(|| {
        Error::AdminResponse(format!("expected a JSON {} body, got none", what))
    })?;
    serde_json::from_value(body)
        .map_err(|e| Error::AdminResponse(format!("malformed {}: {}", what, e)))
}
