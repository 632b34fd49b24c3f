// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maintenance gate.
//!
//! Runs on every request. Exempt paths always pass. Other paths are
//! redirected to the localized maintenance page while maintenance is on,
//! unless the caller holds a valid admin session. The flag is re-read on
//! every request.

use crate::i18n::Locale;
use crate::middleware::auth::admin_claims;
use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

/// Prefixes that bypass the gate, after stripping an optional locale.
const EXEMPT_PREFIXES: &[&str] = &["/api", "/admin", "/maintenance", "/health"];

/// Outcome of the gate for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    Redirect(String),
}

/// Whether `path` is exempt from the maintenance check.
pub fn is_exempt(path: &str) -> bool {
    let unlocalized = match Locale::from_path(path) {
        Some(locale) => &path[1 + locale.code().len()..],
        None => path,
    };
    EXEMPT_PREFIXES
        .iter()
        .any(|prefix| matches_prefix(path, prefix) || matches_prefix(unlocalized, prefix))
}

/// `/api` matches `/api` and `/api/...` but not `/apiary`.
fn matches_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Localized maintenance page path.
pub fn maintenance_path(locale: Locale) -> String {
    format!("/{}/maintenance", locale.code())
}

/// Decide what to do with a request.
pub fn decide(path: &str, enabled: bool, is_admin: bool, default_locale: Locale) -> GateDecision {
    if is_exempt(path) || !enabled || is_admin {
        return GateDecision::Allow;
    }
    let locale = Locale::from_path(path).unwrap_or(default_locale);
    GateDecision::Redirect(maintenance_path(locale))
}

/// Maintenance gate middleware.
pub async fn maintenance_gate(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if is_exempt(path) {
        return next.run(request).await;
    }

    let enabled = state.maintenance.is_enabled().await;
    let is_admin = enabled && admin_claims(&jar, &state.config).is_some();

    match decide(path, enabled, is_admin, state.config.default_locale) {
        GateDecision::Allow => next.run(request).await,
        GateDecision::Redirect(target) => {
            tracing::debug!(path = %path, target = %target, "Maintenance redirect");
            Redirect::temporary(&target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exempt_paths() {
        for path in [
            "/api",
            "/api/events",
            "/api/admin/maintenance",
            "/admin",
            "/admin/login",
            "/de/admin",
            "/en/admin/settings",
            "/de/maintenance",
            "/en/maintenance",
            "/health",
        ] {
            assert!(is_exempt(path), "{path} should be exempt");
        }
    }

    #[test]
    fn test_non_exempt_paths() {
        for path in [
            "/",
            "/de",
            "/de/events",
            "/en/forum/123",
            "/apiary",
            "/administration",
            "/de/maintenance-info",
            "/fr/admin",
        ] {
            assert!(!is_exempt(path), "{path} should not be exempt");
        }
    }

    #[test]
    fn test_exempt_never_redirects() {
        for enabled in [false, true] {
            assert_eq!(
                decide("/api/events", enabled, false, Locale::De),
                GateDecision::Allow
            );
            assert_eq!(
                decide("/en/maintenance", enabled, false, Locale::De),
                GateDecision::Allow
            );
        }
    }

    #[test]
    fn test_redirect_uses_path_locale() {
        assert_eq!(
            decide("/en/events", true, false, Locale::De),
            GateDecision::Redirect("/en/maintenance".to_string())
        );
        assert_eq!(
            decide("/events", true, false, Locale::De),
            GateDecision::Redirect("/de/maintenance".to_string())
        );
        assert_eq!(
            decide("/", true, false, Locale::En),
            GateDecision::Redirect("/en/maintenance".to_string())
        );
    }

    #[test]
    fn test_admin_and_disabled_pass() {
        assert_eq!(decide("/de/events", true, true, Locale::De), GateDecision::Allow);
        assert_eq!(decide("/de/events", false, false, Locale::De), GateDecision::Allow);
    }
}
