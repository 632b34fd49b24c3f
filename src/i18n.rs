// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Supported locales and the localized strings the API emits.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A supported portal locale. German is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::De, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }

    /// Parse a locale code such as `de`, `EN` or `en-GB`.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        Self::ALL.into_iter().find(|l| l.code() == primary)
    }

    /// Locale taken from the first path segment (`/en/events` -> `En`).
    pub fn from_path(path: &str) -> Option<Self> {
        let first = path.trim_start_matches('/').split('/').next()?;
        if first.len() != 2 {
            return None;
        }
        Self::from_code(first)
    }

    /// First supported language in an `Accept-Language` header, by q-value.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates: Vec<(f32, Locale)> = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let locale = Self::from_code(pieces.next()?)?;
                let q = pieces
                    .find_map(|p| p.trim().strip_prefix("q="))
                    .and_then(|q| q.parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((q, locale))
            })
            .collect();
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        candidates.first().map(|(_, l)| *l)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Localized message for an [`crate::error::AppError`] code.
pub fn error_message(code: &str, locale: Locale) -> &'static str {
    match (code, locale) {
        ("unauthorized", Locale::De) => "Anmeldung erforderlich.",
        ("unauthorized", Locale::En) => "Authentication required.",
        ("invalid_credentials", Locale::De) => "Das Passwort ist nicht korrekt.",
        ("invalid_credentials", Locale::En) => "The password is incorrect.",
        ("not_found", Locale::De) => "Der Eintrag wurde nicht gefunden.",
        ("not_found", Locale::En) => "The requested entry was not found.",
        ("bad_request", Locale::De) => "Die Anfrage ist ungültig.",
        ("bad_request", Locale::En) => "The request is invalid.",
        ("conflict", Locale::De) => {
            "Der Eintrag wurde inzwischen geändert. Bitte neu laden."
        }
        ("conflict", Locale::En) => "The entry was changed in the meantime. Please reload.",
        ("service_unavailable", Locale::De) => {
            "Dieser Dienst ist derzeit nicht verfügbar."
        }
        ("service_unavailable", Locale::En) => "This service is currently unavailable.",
        ("upstream_error", Locale::De) => "Ein externer Dienst antwortet nicht.",
        ("upstream_error", Locale::En) => "An external service is not responding.",
        (_, Locale::De) => "Ein interner Fehler ist aufgetreten.",
        (_, Locale::En) => "An internal error occurred.",
    }
}

/// Notice shown on the maintenance page when the admin left no message.
pub fn maintenance_default_message(locale: Locale) -> &'static str {
    match locale {
        Locale::De => "Die Seite wird gerade gewartet. Bitte versuchen Sie es später erneut.",
        Locale::En => "The site is currently under maintenance. Please try again later.",
    }
}

pub fn maintenance_title(locale: Locale) -> &'static str {
    match locale {
        Locale::De => "Wartungsarbeiten",
        Locale::En => "Maintenance",
    }
}

pub fn maintenance_until(locale: Locale) -> &'static str {
    match locale {
        Locale::De => "Voraussichtlich bis",
        Locale::En => "Expected until",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(Locale::from_code("de"), Some(Locale::De));
        assert_eq!(Locale::from_code("EN"), Some(Locale::En));
        assert_eq!(Locale::from_code("en-GB"), Some(Locale::En));
        assert_eq!(Locale::from_code("fr"), None);
        assert_eq!(Locale::from_code(""), None);
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Locale::from_path("/en/events"), Some(Locale::En));
        assert_eq!(Locale::from_path("/de"), Some(Locale::De));
        assert_eq!(Locale::from_path("/api/events"), None);
        assert_eq!(Locale::from_path("/"), None);
        assert_eq!(Locale::from_path("/fr/events"), None);
    }

    #[test]
    fn test_from_accept_language_respects_q_values() {
        assert_eq!(
            Locale::from_accept_language("fr-CH, fr;q=0.9, en;q=0.8, de;q=0.7"),
            Some(Locale::En)
        );
        assert_eq!(
            Locale::from_accept_language("en;q=0.5, de-AT"),
            Some(Locale::De)
        );
        assert_eq!(Locale::from_accept_language("fr, it"), None);
    }

    #[test]
    fn test_every_error_code_has_distinct_translations() {
        for code in [
            "unauthorized",
            "invalid_credentials",
            "not_found",
            "bad_request",
            "conflict",
            "service_unavailable",
            "upstream_error",
            "database_error",
            "internal_error",
        ] {
            assert_ne!(
                error_message(code, Locale::De),
                error_message(code, Locale::En),
                "{code}"
            );
        }
    }
}
