// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Business directory model.

use super::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Business row in the `businesses` table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub opening_hours: Option<String>,
    pub image_url: Option<String>,
    pub is_featured: bool,
    /// Submissions stay inactive until an admin approves them
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Business category row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BusinessCategory {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub icon: Option<String>,
    pub sort_order: i32,
}

impl BusinessCategory {
    /// Categories served when no datastore is attached.
    pub fn fallback() -> Vec<Self> {
        [
            ("gastronomie", "Gastronomie", "utensils"),
            ("einzelhandel", "Einzelhandel", "shopping-bag"),
            ("handwerk", "Handwerk", "hammer"),
            ("dienstleistungen", "Dienstleistungen", "briefcase"),
            ("gesundheit", "Gesundheit", "heart-pulse"),
            ("vereine", "Vereine", "users"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (slug, name, icon))| Self {
            id: Uuid::nil(),
            slug: slug.to_string(),
            name: name.to_string(),
            icon: Some(icon.to_string()),
            sort_order: i as i32 + 1,
        })
        .collect()
    }
}

/// Fields a visitor may submit for a directory entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBusiness {
    #[validate(length(min = 2, max = 200))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(length(max = 300))]
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
    #[validate(length(max = 500))]
    pub opening_hours: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl NewBusiness {
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: non_empty(self.description),
            category_id: self.category_id,
            address: non_empty(self.address),
            phone: non_empty(self.phone),
            email: non_empty(self.email),
            website: non_empty(self.website),
            opening_hours: non_empty(self.opening_hours),
            image_url: non_empty(self.image_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_categories_are_ordered() {
        let categories = BusinessCategory::fallback();
        assert!(!categories.is_empty());
        assert!(categories
            .windows(2)
            .all(|w| w[0].sort_order < w[1].sort_order));
    }

    #[test]
    fn test_blank_email_is_dropped_before_validation() {
        let input = NewBusiness {
            name: "  Bäckerei Huber ".to_string(),
            description: None,
            category_id: None,
            address: Some("".to_string()),
            phone: None,
            email: Some(" ".to_string()),
            website: None,
            opening_hours: None,
            image_url: None,
        }
        .normalized();

        assert_eq!(input.name, "Bäckerei Huber");
        assert!(input.address.is_none());
        assert!(input.email.is_none());
        assert!(input.validate().is_ok());
    }
}
