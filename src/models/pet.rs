// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Lost and found pet alerts.

use super::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Statuses a visitor may report. Admins may later set `reunited`.
pub const PET_STATUSES: &[&str] = &["lost", "found"];

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PetAlert {
    pub id: Uuid,
    /// "lost", "found" or "reunited"
    pub status: String,
    /// Species, e.g. "dog" or "cat"
    pub animal_type: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub last_seen_location: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    /// Shown in listings
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewPetAlert {
    #[validate(custom(function = "validate_pet_status"))]
    pub status: String,
    #[validate(length(min = 2, max = 50))]
    pub animal_type: String,
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 2000))]
    pub description: Option<String>,
    #[validate(length(max = 300))]
    pub last_seen_location: Option<String>,
    pub last_seen_at: Option<DateTime<Utc>>,
    #[validate(url)]
    pub image_url: Option<String>,
    #[validate(length(max = 100))]
    pub contact_name: Option<String>,
    #[validate(length(max = 50))]
    pub contact_phone: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

impl NewPetAlert {
    pub fn normalized(self) -> Self {
        Self {
            status: self.status.trim().to_lowercase(),
            animal_type: self.animal_type.trim().to_lowercase(),
            name: non_empty(self.name),
            description: non_empty(self.description),
            last_seen_location: non_empty(self.last_seen_location),
            last_seen_at: self.last_seen_at,
            image_url: non_empty(self.image_url),
            contact_name: non_empty(self.contact_name),
            contact_phone: non_empty(self.contact_phone),
            contact_email: non_empty(self.contact_email),
        }
    }

    /// A visitor must leave at least one way to be reached.
    pub fn has_contact(&self) -> bool {
        self.contact_phone.is_some() || self.contact_email.is_some()
    }
}

fn validate_pet_status(value: &str) -> Result<(), validator::ValidationError> {
    if PET_STATUSES.contains(&value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("pet_status"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_only() -> NewPetAlert {
        NewPetAlert {
            status: "Lost".to_string(),
            animal_type: " Cat ".to_string(),
            name: Some("Minka".to_string()),
            description: None,
            last_seen_location: Some("Lindenweg".to_string()),
            last_seen_at: None,
            image_url: None,
            contact_name: None,
            contact_phone: Some("  ".to_string()),
            contact_email: Some("owner@example.org".to_string()),
        }
        .normalized()
    }

    #[test]
    fn test_email_only_contact_is_accepted() {
        let alert = email_only();
        assert_eq!(alert.status, "lost");
        assert_eq!(alert.animal_type, "cat");
        assert!(alert.contact_phone.is_none());
        assert!(alert.has_contact());
        assert!(alert.validate().is_ok());
    }

    #[test]
    fn test_listed_alert_shows_contact_email() {
        let input = email_only();
        let alert = PetAlert {
            id: Uuid::new_v4(),
            status: input.status,
            animal_type: input.animal_type,
            name: input.name,
            description: input.description,
            last_seen_location: input.last_seen_location,
            last_seen_at: input.last_seen_at,
            image_url: input.image_url,
            contact_name: input.contact_name,
            contact_phone: input.contact_phone,
            contact_email: input.contact_email,
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["contact_email"], "owner@example.org");
    }
}
