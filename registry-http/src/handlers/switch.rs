//! `GET /switch`: moves the caller's identity to `to`, a different
//! person guid, provided both have already been seen together on
//! `machine`. The old person is left untouched — the switch takes
//! effect client-side via the new cookie.

use crate::cookie;
use crate::json;
use crate::server::SharedState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use registry_store::SwitchError;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct SwitchParams {
    pub machine: String,
    pub url: String,
    pub to: String,
}

fn status_for(err: &SwitchError) -> u16 {
    match err {
        SwitchError::OldPersonUnknown => 430,
        SwitchError::NewPersonUnknown => 431,
        SwitchError::MachineUnknown => 432,
        SwitchError::OldPersonHasNoEdge => 433,
        SwitchError::NewPersonHasNoEdge => 434,
    }
}

pub async fn handle(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<SwitchParams>,
) -> Response {
    if !state.config.enabled {
        state.counters.record_request("switch", "disabled");
        return Json(json::disabled("switch", &state.config)).into_response();
    }

    let old_person_guid = cookie::read_person_guid(&jar);
    let when = registry_core::time::now_secs();

    match state
        .store
        .switch(&old_person_guid, &params.to, &params.machine, when)
    {
        Ok(new_person) => {
            tracing::info!(
                old_person_guid = %old_person_guid,
                new_person_guid = %new_person.guid,
                machine_guid = %params.machine,
                "switch ok"
            );
            let mut body = json::header("switch", "ok", &state.config);
            body["person_guid"] = json!(new_person.guid);
            let jar = cookie::set_person_cookie(jar, &state.config, &new_person.guid);
            state.counters.record_request("switch", "ok");
            (jar, Json(body)).into_response()
        }
        Err(err) => {
            let code = status_for(&err);
            tracing::warn!(machine_guid = %params.machine, %err, code, "switch rejected");
            let body = json::failed("switch", &state.config, &err.to_string());
            let mut response = Json(body).into_response();
            *response.status_mut() = StatusCode::from_u16(code).unwrap();
            state.counters.record_request("switch", &code.to_string());
            response
        }
    }
}
