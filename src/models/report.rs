// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Cleanliness reports (litter, graffiti, illegal dumping, ...).

use super::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

pub const REPORT_CATEGORIES: &[&str] = &[
    "litter",
    "graffiti",
    "illegal_dumping",
    "damaged_infrastructure",
    "overflowing_bin",
    "other",
];

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CleanlinessReport {
    pub id: Uuid,
    pub category: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub image_url: Option<String>,
    pub is_anonymous: bool,
    pub reporter_name: Option<String>,
    #[serde(skip_serializing, default)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub reporter_email: Option<String>,
    /// "pending", "in_progress" or "resolved"
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCleanlinessReport {
    #[validate(custom(function = "validate_report_category"))]
    pub category: String,
    #[validate(length(min = 5, max = 2000))]
    pub description: String,
    #[validate(length(min = 2, max = 300))]
    pub location: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
    #[validate(length(max = 100))]
    pub reporter_name: Option<String>,
    #[validate(email)]
    pub reporter_email: Option<String>,
}

impl NewCleanlinessReport {
    /// Normalize blanks and drop the reporter identity of anonymous reports.
    pub fn normalized(self) -> Self {
        let (reporter_name, reporter_email) = if self.is_anonymous {
            (None, None)
        } else {
            (non_empty(self.reporter_name), non_empty(self.reporter_email))
        };

        Self {
            category: self.category.trim().to_lowercase(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            image_url: non_empty(self.image_url),
            is_anonymous: self.is_anonymous,
            reporter_name,
            reporter_email,
        }
    }
}

fn validate_report_category(value: &str) -> Result<(), validator::ValidationError> {
    if REPORT_CATEGORIES.contains(&value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("report_category"))
    }
}
