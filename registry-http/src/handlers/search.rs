//! `GET /search`: the URLs of `for` (the target machine) as seen by any
//! person. Read-only; does not require the caller to have ever visited
//! the target machine themselves.

use crate::cookie;
use crate::json;
use crate::server::SharedState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub machine: String,
    pub url: String,
    #[serde(rename = "for")]
    pub request_machine: String,
}

pub async fn handle(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<SearchParams>,
) -> Response {
    if !state.config.enabled {
        state.counters.record_request("search", "disabled");
        return Json(json::disabled("search", &state.config)).into_response();
    }

    let person_guid = cookie::read_person_guid(&jar);

    match state.store.search(&person_guid, &params.request_machine) {
        Ok((_machine, machine_urls)) => {
            tracing::debug!(
                request_machine = %params.request_machine,
                url_count = machine_urls.len(),
                "search returned machine urls"
            );
            let urls: Vec<_> = machine_urls
                .into_iter()
                .map(|mu| json!([params.request_machine, mu.url, mu.last_t * 1000, mu.usages]))
                .collect();

            let mut body = json::header("search", "ok", &state.config);
            body["urls"] = json!(urls);
            state.counters.record_request("search", "ok");
            Json(body).into_response()
        }
        Err(err) => {
            tracing::debug!(request_machine = %params.request_machine, %err, "search target unknown");
            let body = json::failed("search", &state.config, &err.to_string());
            let mut response = Json(body).into_response();
            *response.status_mut() = StatusCode::from_u16(404).unwrap();
            state.counters.record_request("search", "404");
            response
        }
    }
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
    async fn search_404s_for_unknown_machine() {
        let response = handle(
            State(state(RegistryConfig::default())),
            CookieJar::new(),
            Query(SearchParams {
                machine: "550e8400-e29b-41d4-a716-446655440000".into(),
                url: "http://a/".into(),
                request_machine: "550e8400-e29b-41d4-a716-446655440001".into(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn search_returns_urls_without_machine_name() {
        let s = state(RegistryConfig::default());
        let machine = "550e8400-e29b-41d4-a716-446655440000";
        s.store.access("", machine, "http://a/", "alpha", 1000).unwrap();

        let response = handle(
            State(s),
            CookieJar::new(),
            Query(SearchParams {
                machine: machine.into(),
                url: "http://a/".into(),
                request_machine: machine.into(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
