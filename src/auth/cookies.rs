//! Carries the token pair in http-only cookies. No validation happens here.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::{auth::jwt::TokenPair, config::AppConfig};

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub secure: bool,
    pub same_site: SameSite,
    pub access_max_age: Duration,
    pub refresh_max_age: Duration,
}

impl CookieSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        let dev = cfg.environment.is_development();
        Self {
            secure: !dev,
            same_site: if dev { SameSite::Lax } else { SameSite::Strict },
            access_max_age: Duration::minutes(cfg.jwt.access_ttl_minutes),
            refresh_max_age: Duration::minutes(cfg.jwt.refresh_ttl_minutes),
        }
    }

    fn build(&self, name: &'static str, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((name, value))
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .path("/")
            .max_age(max_age)
            .build()
    }

    /// An expired, empty cookie; emitted even when the request carried none.
    fn removal(&self, name: &'static str) -> Cookie<'static> {
        let mut cookie = self.build(name, String::new(), Duration::ZERO);
        cookie.make_removal();
        cookie
    }
}

pub fn set_auth_cookies(jar: CookieJar, settings: &CookieSettings, pair: &TokenPair) -> CookieJar {
    jar.add(settings.build(ACCESS_COOKIE, pair.access.token.clone(), settings.access_max_age))
        .add(settings.build(REFRESH_COOKIE, pair.refresh.token.clone(), settings.refresh_max_age))
}

pub fn clear_auth_cookies(jar: CookieJar, settings: &CookieSettings) -> CookieJar {
    jar.add(settings.removal(ACCESS_COOKIE))
        .add(settings.removal(REFRESH_COOKIE))
}

pub fn access_token(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}

pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    jar.get(REFRESH_COOKIE)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}
