// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Middleware modules (sessions, maintenance gate, localization, security).

pub mod auth;
pub mod locale;
pub mod maintenance;
pub mod security;

pub use auth::require_admin;
pub use locale::localize_errors;
pub use maintenance::maintenance_gate;
