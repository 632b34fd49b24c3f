// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Request locale resolution and error message localization.

use crate::error::ErrorResponse;
use crate::i18n::Locale;
use crate::AppState;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Locale for a request: path segment, then `lang` query, then
/// `Accept-Language`, then the configured default.
pub fn request_locale(request: &Request, default: Locale) -> Locale {
    let uri = request.uri();

    Locale::from_path(uri.path())
        .or_else(|| {
            uri.query()?
                .split('&')
                .find_map(|pair| pair.strip_prefix("lang="))
                .and_then(Locale::from_code)
        })
        .or_else(|| {
            request
                .headers()
                .get(header::ACCEPT_LANGUAGE)?
                .to_str()
                .ok()
                .and_then(Locale::from_accept_language)
        })
        .unwrap_or(default)
}

/// Make the request locale available to handlers and localize error bodies.
pub async fn localize_errors(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let locale = request_locale(&request, state.config.default_locale);
    request.extensions_mut().insert(locale);

    let response = next.run(request).await;

    let Some(body) = response.extensions().get::<ErrorResponse>() else {
        return response;
    };
    let localized = body.localized(locale);
    if localized.message == body.message {
        return response;
    }

    let json = match serde_json::to_vec(&localized) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to re-render error body");
            return response;
        }
    };

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.extensions.insert(localized);
    Response::from_parts(parts, Body::from(json))
}
