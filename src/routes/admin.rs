// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Admin session routes: login, logout and session introspection.

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    admin_claims, create_session_token, removal_cookie, session_cookie, Role, ADMIN_COOKIE,
};
use crate::routes::json_body;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use subtle::ConstantTimeEq;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
        .route("/api/admin/session", get(session))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    password: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionResponse {
    pub authenticated: bool,
    pub issued_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionResponse {
    fn anonymous() -> Self {
        Self {
            authenticated: false,
            issued_at: None,
            expires_at: None,
        }
    }

    fn from_claims(iat: usize, exp: usize) -> Self {
        Self {
            authenticated: true,
            issued_at: DateTime::from_timestamp(iat as i64, 0),
            expires_at: DateTime::from_timestamp(exp as i64, 0),
        }
    }
}

/// Compare secrets in constant time. Hashing first hides the length.
fn password_matches(candidate: &str, expected: &str) -> bool {
    let candidate = Sha256::digest(candidate.as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    candidate.ct_eq(&expected).into()
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<SessionResponse>)> {
    let request = json_body(body)?;

    let expected = state
        .config
        .admin_password
        .as_deref()
        .ok_or(AppError::ServiceUnavailable("admin login"))?;
    let key = state
        .config
        .session_key()
        .ok_or(AppError::ServiceUnavailable("admin login"))?;

    if !password_matches(&request.password, expected) {
        tracing::warn!("Failed admin login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let (token, claims) = create_session_token("admin", Role::Admin, None, &key)?;

    tracing::info!(jti = %claims.jti, "Admin logged in");

    let jar = jar.add(session_cookie(ADMIN_COOKIE, token, state.config.production));
    Ok((jar, Json(SessionResponse::from_claims(claims.iat, claims.exp))))
}

/// Delete the admin cookie. Always succeeds.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Json<SessionResponse>) {
    if jar.get(ADMIN_COOKIE).is_some() {
        tracing::info!("Admin logged out");
    }
    let jar = jar.add(removal_cookie(ADMIN_COOKIE, state.config.production));
    (jar, Json(SessionResponse::anonymous()))
}

async fn session(State(state): State<Arc<AppState>>, jar: CookieJar) -> Json<SessionResponse> {
    Json(match admin_claims(&jar, &state.config) {
        Some(claims) => SessionResponse::from_claims(claims.iat, claims.exp),
        None => SessionResponse::anonymous(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_matches() {
        assert!(password_matches("hunter2hunter2", "hunter2hunter2"));
        assert!(!password_matches("hunter2hunter", "hunter2hunter2"));
        assert!(!password_matches("", "hunter2hunter2"));
    }
}
