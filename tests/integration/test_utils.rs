//! Shared test utilities for integration tests
//!
//! A scripted transport standing in for the catalog and registry servers, plus
//! settings pointed at a temporary directory.

use registry_admin::settings::Settings;
use registry_admin::transport::{
    Method, Transport, TransportError, TransportRequest, TransportResponse,
};
use serde_json::Value;
use std::sync::Mutex;
use tempfile::TempDir;

type Outcome = Result<TransportResponse, TransportError>;

/// Transport answering from a script. Each entry is consumed once; unmatched
/// requests fail like an unreachable host.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<Vec<(Method, String, Outcome)>>,
    seen: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, method: Method, url: &str, status: u16, body: Value) -> Self {
        self.script.lock().unwrap().push((
            method,
            url.to_string(),
            Ok(TransportResponse::json(status, body)),
        ));
        self
    }

    pub fn on_raw(self, method: Method, url: &str, status: u16, body: &str) -> Self {
        self.script.lock().unwrap().push((
            method,
            url.to_string(),
            Ok(TransportResponse::from_raw(status, body.as_bytes().to_vec())),
        ));
        self
    }

    pub fn seen(&self) -> Vec<TransportRequest> {
        self.seen.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.seen.lock().unwrap().push(request.clone());
        let mut script = self.script.lock().unwrap();
        match script
            .iter()
            .position(|(m, u, _)| *m == request.method && *u == request.url)
        {
            Some(idx) => script.remove(idx).2,
            None => Err(TransportError(format!(
                "connection refused: {} {}",
                request.method, request.url
            ))),
        }
    }
}

/// Settings whose config file and package directory live under `temp_dir`.
pub fn settings_in(temp_dir: &TempDir) -> Settings {
    Settings {
        config_path: Some(temp_dir.path().join("config").join("config.yml")),
        package_dir: Some(temp_dir.path().join("packages")),
        ..Settings::default()
    }
}
