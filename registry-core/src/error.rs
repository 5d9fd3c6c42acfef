//! Error kinds and their HTTP status mapping.

use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("machine guid is not syntactically valid")]
    InvalidMachineGuid,

    #[error("person '{0}' is not known to this registry")]
    PersonNotFound(String),

    #[error("machine '{0}' is not known to this registry")]
    MachineNotFound(String),

    #[error("person '{0}' has no recorded visit to machine '{1}'")]
    NoEdgeToMachine(String, String),

    #[error("no matching url found for this person")]
    UrlNotFound,

    #[error("internal registry failure: {0}")]
    Internal(String),
}

impl RegistryError {
    /// HTTP status code this error kind is surfaced as.
    pub fn status_code(&self) -> u16 {
        match self {
            RegistryError::InvalidMachineGuid => 412,
            RegistryError::UrlNotFound => 412,
            RegistryError::MachineNotFound(_) => 404,
            RegistryError::Internal(_) => 412,
            // switch()'s four distinct failure codes are assigned by the
            // caller, which knows whether a given NotFound/NoEdge refers
            // to the old or new person; see registry-http's switch
            // handler for the 430..434 mapping.
            RegistryError::PersonNotFound(_) => 430,
            RegistryError::NoEdgeToMachine(_, _) => 433,
        }
    }

    /// Minimal failure body shared by every endpoint: `{"status":"failed"}`
    /// plus whatever header fields the caller merges in.
    pub fn to_json_body(&self) -> Value {
        json!({
            "status": "failed",
            "error": self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_machine_guid_is_412() {
        assert_eq!(RegistryError::InvalidMachineGuid.status_code(), 412);
    }

    #[test]
    fn machine_not_found_is_404() {
        assert_eq!(
            RegistryError::MachineNotFound("m1".into()).status_code(),
            404
        );
    }

    #[test]
    fn body_carries_failed_status() {
        let body = RegistryError::UrlNotFound.to_json_body();
        assert_eq!(body["status"], "failed");
    }
}
