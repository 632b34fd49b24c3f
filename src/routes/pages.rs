// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Server-rendered pages: the maintenance notice and the locale root
//! redirect. Everything else comes from the static frontend build.

use crate::i18n::{self, Locale};
use crate::services::MaintenanceStatus;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Extension, Router,
};
use chrono::Utc;
use std::path::Path as FsPath;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/{locale}/maintenance", get(maintenance_page))
}

/// Static frontend build, used as the router fallback.
pub fn static_files(public_dir: &FsPath) -> ServeDir {
    ServeDir::new(public_dir).append_index_html_on_directories(true)
}

/// `/` goes to the visitor's preferred locale.
async fn root(Extension(locale): Extension<Locale>) -> Redirect {
    Redirect::temporary(&format!("/{}", locale.code()))
}

/// Localized maintenance notice.
///
/// Served as `503` with `Retry-After` while maintenance is on. Once it is
/// off, visitors are sent back to the locale's start page.
async fn maintenance_page(
    State(state): State<Arc<AppState>>,
    Path(locale): Path<String>,
) -> Response {
    let locale = Locale::from_code(&locale).unwrap_or(state.config.default_locale);
    let status = state.maintenance.status().await;

    if !status.enabled {
        return Redirect::temporary(&format!("/{}", locale.code())).into_response();
    }

    let mut response = (
        StatusCode::SERVICE_UNAVAILABLE,
        [(header::CACHE_CONTROL, "no-store")],
        Html(render_maintenance(&status, locale)),
    )
        .into_response();

    if let Some(seconds) = status
        .estimated_end
        .map(|end| (end - Utc::now()).num_seconds())
        .filter(|s| *s > 0)
    {
        if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }

    response
}

pub fn render_maintenance(status: &MaintenanceStatus, locale: Locale) -> String {
    let title = i18n::maintenance_title(locale);
    let message = if status.message.trim().is_empty() {
        i18n::maintenance_default_message(locale).to_string()
    } else {
        status.message.clone()
    };

    let until = status
        .estimated_end
        .map(|end| {
            let formatted = match locale {
                Locale::De => end.format("%d.%m.%Y, %H:%M UTC").to_string(),
                Locale::En => end.format("%Y-%m-%d %H:%M UTC").to_string(),
            };
            format!(
                "<p class=\"until\">{}: <time datetime=\"{}\">{}</time></p>",
                i18n::maintenance_until(locale),
                end.to_rfc3339(),
                formatted
            )
        })
        .unwrap_or_default();

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n\
         <style>body{{font-family:system-ui,sans-serif;max-width:40rem;margin:4rem auto;\
         padding:0 1rem;color:#222}}h1{{font-size:1.6rem}}.until{{color:#555}}</style>\n\
         </head>\n<body>\n<main>\n<h1>{title}</h1>\n<p>{message}</p>\n{until}</main>\n\
         </body>\n</html>\n",
        lang = locale.code(),
        title = escape_html(title),
        message = escape_html(&message),
        until = until,
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
