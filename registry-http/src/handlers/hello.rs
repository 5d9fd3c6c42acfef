use crate::json;
use crate::server::SharedState;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

pub async fn handle(State(state): State<SharedState>) -> Json<Value> {
    if !state.config.enabled {
        state.counters.record_request("hello", "disabled");
        return Json(json::disabled("hello", &state.config));
    }

    let mut body = json::header("hello", "ok", &state.config);
    body["registry"] = json!(state.config.registry_to_announce);
    state.counters.record_request("hello", "ok");
    Json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::AppState;
    use registry_core::RegistryConfig;
    use registry_observability::Counters;
    use registry_store::{NullSink, Registry};
    use std::sync::Arc;

    fn state(config: RegistryConfig) -> SharedState {
        Arc::new(AppState {
            store: Arc::new(Registry::new(Box::new(NullSink))),
            counters: Arc::new(Counters::new()),
            config: Arc::new(config),
        })
    }

    #[tokio::test]
    async fn returns_ok_header_when_enabled() {
        let Json(body) = handle(State(state(RegistryConfig::default()))).await;
        assert_eq!(body["action"], "hello");
        assert_eq!(body["status"], "ok");
        assert!(body["hostname"].is_string());
        assert!(body["machine_guid"].is_string());
    }

    #[tokio::test]
    async fn returns_disabled_when_config_disabled() {
        let mut config = RegistryConfig::default();
        config.enabled = false;
        let Json(body) = handle(State(state(config))).await;
        assert_eq!(body["status"], "disabled");
        assert!(body["registry"].is_string());
    }
}
