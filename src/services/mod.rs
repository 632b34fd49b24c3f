// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod maintenance;
pub mod traffic;
pub mod transit;
pub mod upstream;
pub mod weather;

pub use maintenance::{MaintenanceStatus, MaintenanceStore};
pub use traffic::TrafficService;
pub use transit::TransitService;
pub use weather::WeatherService;
