// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Community event model for storage and API.

use super::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Event row in the `events` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Free-form category slug (e.g. "culture", "sports")
    pub category: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub organizer: Option<String>,
    pub contact_email: Option<String>,
    pub website: Option<String>,
    /// Featured events sort first
    pub is_featured: bool,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields a visitor may submit for a new event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewEvent {
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub location: Option<String>,
    #[validate(length(max = 50))]
    pub category: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(length(max = 200))]
    pub organizer: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

impl NewEvent {
    /// Trim text and turn blank optional fields into NULLs.
    pub fn normalized(self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: non_empty(self.description),
            location: non_empty(self.location),
            category: non_empty(self.category).map(|c| c.to_lowercase()),
            start_date: self.start_date,
            end_date: self.end_date,
            image_url: non_empty(self.image_url),
            organizer: non_empty(self.organizer),
            contact_email: non_empty(self.contact_email),
            website: non_empty(self.website),
        }
    }
}
