//! Bulletin board model (offers, requests and notices).

use super::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

/// Allowed values for `post_type`.
pub const BULLETIN_TYPES: &[&str] = &["offer", "request", "notice", "lost_found"];

/// Bulletin board row. Contact details other than the name are private.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct BulletinPost {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub post_type: String,
    pub title: String,
    pub content: String,
    pub contact_name: Option<String>,
    #[serde(skip_serializing, default)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub is_pinned: bool,
    pub is_active: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewBulletinPost {
    #[serde(rename = "type")]
    #[validate(custom(function = "validate_bulletin_type"))]
    pub post_type: String,
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[validate(length(max = 100))]
    pub contact_name: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 50))]
    pub contact_phone: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl NewBulletinPost {
    pub fn normalized(self) -> Self {
        Self {
            post_type: self.post_type.trim().to_lowercase(),
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            contact_name: non_empty(self.contact_name),
            contact_email: non_empty(self.contact_email),
            contact_phone: non_empty(self.contact_phone),
            expires_at: self.expires_at,
        }
    }
}

fn validate_bulletin_type(value: &str) -> Result<(), validator::ValidationError> {
    if BULLETIN_TYPES.contains(&value) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("bulletin_type"))
    }
}
