// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cookie session authentication.
//!
//! Sessions are HS256 JWTs carried in HTTP-only cookies. A session counts
//! only if its signature verifies against the configured key and it has
//! not expired. Cookie presence alone is not enough.

use crate::config::Config;
use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Admin session cookie.
pub const ADMIN_COOKIE: &str = "portal_admin";
/// Registered-user session cookie.
pub const USER_COOKIE: &str = "portal_user";
/// Fixed session lifetime (24 hours).
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

/// Who a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject ("admin" or the user's UUID)
    pub sub: String,
    pub role: Role,
    /// Display name for user sessions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Random token id
    pub jti: String,
}

/// Verified admin session, inserted into request extensions.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub issued_at: usize,
    pub expires_at: usize,
}

/// Create a signed session token, returning it with its claims.
pub fn create_session_token(
    subject: &str,
    role: Role,
    name: Option<String>,
    signing_key: &[u8],
) -> anyhow::Result<(String, Claims)> {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as usize;

    let claims = Claims {
        sub: subject.to_string(),
        role,
        name,
        iat: now,
        exp: now + SESSION_TTL_SECS as usize,
        jti: random_token_id()?,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(signing_key),
    )?;
    Ok((token, claims))
}

/// Verify a token's signature, expiry and role.
pub fn verify_session_token(token: &str, role: Role, signing_key: &[u8]) -> Option<Claims> {
    let key = DecodingKey::from_secret(signing_key);
    let validation = Validation::new(Algorithm::HS256);

    let claims = decode::<Claims>(token, &key, &validation).ok()?.claims;
    (claims.role == role).then_some(claims)
}

/// The caller's verified admin claims, if any.
pub fn admin_claims(jar: &CookieJar, config: &Config) -> Option<Claims> {
    let cookie = jar.get(ADMIN_COOKIE)?;
    let key = config.session_key()?;
    verify_session_token(cookie.value(), Role::Admin, &key)
}

/// The caller's verified user claims, if any.
pub fn user_claims(jar: &CookieJar, config: &Config) -> Option<Claims> {
    let cookie = jar.get(USER_COOKIE)?;
    let key = config.session_key()?;
    verify_session_token(cookie.value(), Role::User, &key)
}

/// Middleware that requires a valid admin session.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = admin_claims(&jar, &state.config).ok_or_else(|| {
        tracing::debug!(
            cookie_present = jar.get(ADMIN_COOKIE).is_some(),
            path = %request.uri().path(),
            "Rejected admin request without a valid session"
        );
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(AdminSession {
        issued_at: claims.iat,
        expires_at: claims.exp,
    });

    Ok(next.run(request).await)
}

/// Session cookie with the fixed TTL.
pub fn session_cookie(name: &'static str, token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(SESSION_TTL_SECS))
        .build()
}

/// Cookie matching [`session_cookie`]'s attributes that expires immediately.
pub fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::ZERO)
        .build()
}

fn random_token_id() -> anyhow::Result<String> {
    let mut bytes = [0u8; 16];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| anyhow::anyhow!("System RNG unavailable"))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
