use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{AppState, utils::session::session_username};

/// Liveness stays reachable without a session.
const OPEN_PATHS: [&str; 1] = ["/health"];

/// Sends callers without a session cookie to the login path. Requests under the login
/// path itself always pass.
pub async fn session_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();

    if is_open_path(path, &state.session.login_path) {
        return next.run(req).await;
    }

    let jar = CookieJar::from_headers(req.headers());
    if session_username(&jar, &state.session.cookie_name).is_none() {
        tracing::debug!("No session cookie for {}, redirecting to login", path);
        return Redirect::temporary(&state.session.login_path).into_response();
    }

    next.run(req).await
}

fn is_open_path(path: &str, login_path: &str) -> bool {
    path.starts_with(login_path) || OPEN_PATHS.iter().any(|open| *open == path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_prefix_and_liveness_are_open() {
        assert!(is_open_path("/login", "/login"));
        assert!(is_open_path("/login/anything", "/login"));
        assert!(is_open_path("/health", "/login"));
    }

    #[test]
    fn everything_else_is_gated() {
        assert!(!is_open_path("/", "/login"));
        assert!(!is_open_path("/products", "/login"));
        assert!(!is_open_path("/healthcheck", "/login"));
        assert!(!is_open_path("/health/ready", "/login"));
    }
}
