use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use serde_json::{Value, json};

use crate::{
    AppState,
    error::{AppError, Result},
    models::{LoginRequest, LoginResponse},
    utils::session::{removal_cookie, session_cookie, session_username},
};

const WRONG_CREDENTIALS: &str = "Wrong username or password";

pub async fn login_status(State(state): State<AppState>, jar: CookieJar) -> Json<Value> {
    let username = session_username(&jar, &state.session.cookie_name);

    Json(json!({
        "authenticated": username.is_some(),
        "username": username,
    }))
}

pub async fn login_user(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>)> {
    // Lookup failures are reported like a bad password.
    let credential = match state.store.find_credential(&payload.username).await {
        Ok(credential) => credential,
        Err(e) => {
            tracing::warn!("Credential lookup failed: {}", e);
            None
        }
    };

    let username = credential
        .filter(|c| c.matches(&payload.password))
        .map(|c| c.username)
        .ok_or_else(|| {
            tracing::warn!("Rejected login for {:?}", payload.username);
            AppError::Unauthorized(WRONG_CREDENTIALS.to_string())
        })?;

    tracing::info!("User {} logged in", username);

    let jar = jar.add(session_cookie(&state.session, &username));

    Ok((jar, Json(LoginResponse { username })))
}

pub async fn logout_user(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(removal_cookie(&state.session)), StatusCode::NO_CONTENT)
}
