//! `netdata_registry_id` cookie construction: one `Set-Cookie` header
//! without a `Domain` attribute, and — only when a registry domain is
//! configured — a second one with `Domain=<configured>`. Both carry the
//! same value and an `Expires` of `now + persons_expiration` seconds,
//! rendered as RFC 1123 GMT.

use axum_extra::extract::cookie::{Cookie, CookieJar};
use registry_core::RegistryConfig;
use time::{Duration, OffsetDateTime};

pub const COOKIE_NAME: &str = "netdata_registry_id";
pub const VERIFY_COOKIE_GUID: &str = "give-me-back-this-cookie-now--please";

/// Add the registry identity cookie(s) to `jar`, returning the updated
/// jar. Called once per response that needs to (re)assert a person's
/// identity.
pub fn set_person_cookie(jar: CookieJar, config: &RegistryConfig, value: &str) -> CookieJar {
    let expires = OffsetDateTime::now_utc()
        + Duration::seconds(config.persons_expiration_secs as i64);

    let mut without_domain = Cookie::new(COOKIE_NAME, value.to_string());
    without_domain.set_path("/");
    without_domain.set_expires(expires);
    let jar = jar.add(without_domain);

    if let Some(domain) = &config.registry_domain {
        let mut with_domain = Cookie::new(COOKIE_NAME, value.to_string());
        with_domain.set_path("/");
        with_domain.set_domain(domain.clone());
        with_domain.set_expires(expires);
        return jar.add(with_domain);
    }

    jar
}

pub fn read_person_guid(jar: &CookieJar) -> String {
    jar.get(COOKIE_NAME)
        .map(|c| c.value().to_string())
        .unwrap_or_default()
}
