//! Shared response shape: every non-redirect response begins with
//! `action`, `status`, `hostname`, `machine_guid`, in that order, to
//! which each handler appends its own fields.

use registry_core::RegistryConfig;
use serde_json::{json, Value};

pub fn header(action: &str, status: &str, config: &RegistryConfig) -> Value {
    json!({
        "action": action,
        "status": status,
        "hostname": config.hostname,
        "machine_guid": config.machine_guid,
    })
}

/// The disabled-registry response: still carries the full header, plus
/// the announced registry URL, HTTP 200.
pub fn disabled(action: &str, config: &RegistryConfig) -> Value {
    let mut body = header(action, "disabled", config);
    body["registry"] = json!(config.registry_to_announce);
    body
}

pub fn failed(action: &str, config: &RegistryConfig, error: &str) -> Value {
    let mut body = header(action, "failed", config);
    body["error"] = json!(error);
    body
}
