//! `GET /access`: mints or recognizes a person, records a visit to
//! `machine` at `url`, and returns every URL that person has visited.
//! Performs cookie-capability probing before doing anything else when
//! the caller presented no person guid.

use crate::cookie::{self, COOKIE_NAME, VERIFY_COOKIE_GUID};
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
pub struct AccessParams {
    pub machine: String,
    pub url: String,
    #[serde(default)]
    pub name: String,
}

pub async fn handle(
    State(state): State<SharedState>,
    jar: CookieJar,
    Query(params): Query<AccessParams>,
) -> Response {
    if !state.config.enabled {
        state.counters.record_request("access", "disabled");
        return Json(json::disabled("access", &state.config)).into_response();
    }

    let mut person_guid = cookie::read_person_guid(&jar);

    if state.config.verify_cookies_redirects > 0 && person_guid.is_empty() {
        tracing::debug!(machine_guid = %params.machine, "probing cookie support before access");
        let body = json!({
            "status": "redirect",
            "registry": state.config.registry_to_announce,
        });
        let mut sentinel = axum_extra::extract::cookie::Cookie::new(COOKIE_NAME, VERIFY_COOKIE_GUID);
        sentinel.set_path("/");
        let jar = jar.add(sentinel);
        state.counters.record_request("access", "redirect");
        return (jar, Json(body)).into_response();
    }

    if person_guid == VERIFY_COOKIE_GUID {
        person_guid = String::new();
    }

    let when = registry_core::time::now_secs();

    let person = match state
        .store
        .access(&person_guid, &params.machine, &params.url, &params.name, when)
    {
        Ok(p) => p,
        Err(err) => {
            tracing::warn!(machine_guid = %params.machine, %err, "access rejected");
            let body = json::failed("access", &state.config, &err.to_string());
            let mut response = Json(body).into_response();
            let status = err.status_code();
            *response.status_mut() = StatusCode::from_u16(status).unwrap();
            state.counters.record_request("access", &status.to_string());
            return response;
        }
    };
    tracing::debug!(person_guid = %person.guid, machine_guid = %params.machine, url = %params.url, "access ok");

    let urls: Vec<_> = state
        .store
        .person_urls(&person.guid)
        .into_iter()
        .map(|pu| {
            json!([
                pu.machine_guid,
                pu.url,
                pu.last_t * 1000,
                pu.usages,
                pu.machine_name,
            ])
        })
        .collect();

    let mut body = json::header("access", "ok", &state.config);
    body["person_guid"] = json!(person.guid);
    body["urls"] = json!(urls);

    let jar = cookie::set_person_cookie(jar, &state.config, &person.guid);
    state.counters.record_request("access", "ok");
    (jar, Json(body)).into_response()
}
