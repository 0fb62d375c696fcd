use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{AppState, config::SessionConfig, error::AppError};

pub const SESSION_MAX_AGE_DAYS: i64 = 7;

/// Session cookie carrying the username, valid on every route for a week.
pub fn session_cookie(config: &SessionConfig, username: &str) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), username.to_string()))
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure)
        .path("/")
        .max_age(time::Duration::days(SESSION_MAX_AGE_DAYS))
        .build()
}

/// Cookie that makes the browser drop the session.
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), "")).path("/").build()
}

pub fn session_username(jar: &CookieJar, cookie_name: &str) -> Option<String> {
    jar.get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Username of the caller, taken from the session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionUser(pub String);

impl FromRequestParts<AppState> for SessionUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session_username(&jar, &state.session.cookie_name)
            .map(SessionUser)
            .ok_or_else(|| {
                AppError::Unauthorized("Not authenticated (no username cookie)".to_string())
            })
    }
}
