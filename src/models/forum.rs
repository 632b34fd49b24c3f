// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Forum categories, threads and replies.

use super::non_empty;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ForumCategory {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub sort_order: i32,
}

impl ForumCategory {
    /// Categories served when no datastore is attached.
    pub fn fallback() -> Vec<Self> {
        [
            ("allgemein", "Allgemein", "Alles rund um unsere Gemeinde"),
            ("nachbarschaft", "Nachbarschaft", "Hilfe und Austausch unter Nachbarn"),
            ("veranstaltungen", "Veranstaltungen", "Fragen und Ideen zu Veranstaltungen"),
            ("verkehr", "Verkehr", "Straßen, Parken und öffentlicher Verkehr"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (slug, name, description))| Self {
            id: Uuid::nil(),
            slug: slug.to_string(),
            name: name.to_string(),
            description: Some(description.to_string()),
            sort_order: i as i32 + 1,
        })
        .collect()
    }
}

/// Forum thread row. The author's email is stored but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ForumPost {
    pub id: Uuid,
    pub category_id: Option<Uuid>,
    pub title: String,
    pub content: String,
    pub author_name: String,
    #[serde(skip_serializing, default)]
    #[cfg_attr(feature = "binding-generation", ts(skip))]
    pub author_email: Option<String>,
    pub is_pinned: bool,
    pub is_active: bool,
    pub reply_count: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ForumReply {
    pub id: Uuid,
    pub post_id: Uuid,
    pub content: String,
    pub author_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewForumPost {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 3, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    #[validate(length(min = 2, max = 100))]
    pub author_name: String,
    #[validate(email)]
    pub author_email: Option<String>,
}

impl NewForumPost {
    pub fn normalized(self) -> Self {
        Self {
            category_id: self.category_id,
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            author_name: self.author_name.trim().to_string(),
            author_email: non_empty(self.author_email),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewForumReply {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[validate(length(min = 2, max = 100))]
    pub author_name: String,
}

impl NewForumReply {
    pub fn normalized(self) -> Self {
        Self {
            content: self.content.trim().to_string(),
            author_name: self.author_name.trim().to_string(),
        }
    }
}
