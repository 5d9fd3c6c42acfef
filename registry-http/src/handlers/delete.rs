//! `GET /delete`: removes one of a person's URL edges. No cookie
//! probing — an absent or unknown person guid simply fails.

use crate::cookie;
use crate::json;
use crate::server::SharedState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub machine: String,
    pub url: String,
    pub delete_url: String,
}

pub async fn handle(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<DeleteParams>,
) -> Response {
    if !state.config.enabled {
        state.counters.record_request("delete", "disabled");
        return Json(json::disabled("delete", &state.config)).into_response();
    }

    let person_guid = cookie::read_person_guid(&jar);
    let when = registry_core::time::now_secs();

    match state.store.delete(
        &person_guid,
        &params.machine,
        &params.url,
        &params.delete_url,
        when,
    ) {
        Ok(person) => {
            tracing::debug!(
                person_guid = %person.guid,
                machine_guid = %params.machine,
                delete_url = %params.delete_url,
                "delete ok"
            );
            state.counters.record_request("delete", "ok");
            Json(json::header("delete", "ok", &state.config)).into_response()
        }
        Err(err) => {
            tracing::warn!(machine_guid = %params.machine, %err, "delete rejected");
            let body = json::failed("delete", &state.config, &err.to_string());
            let mut response = Json(body).into_response();
            *response.status_mut() = StatusCode::from_u16(412).unwrap();
            state.counters.record_request("delete", "412");
            response
        }
    }
}
