// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resident accounts: registration, login and logout.

use crate::error::{AppError, Result};
use crate::middleware::auth::{
    create_session_token, removal_cookie, session_cookie, user_claims, Role, USER_COOKIE,
};
use crate::models::NewUser;
use crate::routes::json_body;
use crate::AppState;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: Option<String>,
    pub display_name: String,
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is unparseable");
            false
        }
    }
}

/// Run argon2 off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password task failed: {}", e)))
}

/// Create an account. Input is validated before the datastore is touched.
async fn register(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let new_user = json_body(body)?.normalized();
    validator::Validate::validate(&new_user)?;

    let store = state.db.datastore().writable()?;

    if store.get_user_by_email(&new_user.email).await?.is_some() {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let password = new_user.password.clone();
    let password_hash = blocking(move || hash_password(&password)).await??;

    let user = store
        .insert_user(&new_user.email, &new_user.display_name, &password_hash)
        .await?;
    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            id: user.id,
            email: Some(user.email),
            display_name: user.display_name,
        }),
    ))
}

async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<UserResponse>)> {
    let request = json_body(body)?;
    let email = request.email.trim().to_lowercase();

    let key = state
        .config
        .session_key()
        .ok_or(AppError::ServiceUnavailable("user login"))?;
    let store = state.db.datastore().required()?;

    let Some(user) = store.get_user_by_email(&email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let password = request.password;
    let stored_hash = user.password_hash.clone();
    if !blocking(move || verify_password(&password, &stored_hash)).await? {
        tracing::warn!(user_id = %user.id, "Failed user login attempt");
        return Err(AppError::InvalidCredentials);
    }

    let (token, _) = create_session_token(
        &user.id.to_string(),
        Role::User,
        Some(user.display_name.clone()),
        &key,
    )?;
    tracing::info!(user_id = %user.id, "User logged in");

    let jar = jar.add(session_cookie(USER_COOKIE, token, state.config.production));
    Ok((
        jar,
        Json(UserResponse {
            id: user.id,
            email: Some(user.email),
            display_name: user.display_name,
        }),
    ))
}

async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.add(removal_cookie(USER_COOKIE, state.config.production));
    (jar, StatusCode::NO_CONTENT)
}

/// The signed-in user, from the session cookie alone.
async fn me(State(state): State<Arc<AppState>>, jar: CookieJar) -> Result<Json<UserResponse>> {
    let claims = user_claims(&jar, &state.config).ok_or(AppError::Unauthorized)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

    Ok(Json(UserResponse {
        id,
        email: None,
        display_name: claims.name.unwrap_or_default(),
    }))
}
