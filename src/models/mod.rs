// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod bulletin;
pub mod business;
pub mod event;
pub mod forum;
pub mod pet;
pub mod report;
pub mod user;
pub mod waste;

pub use bulletin::{BulletinPost, NewBulletinPost};
pub use business::{Business, BusinessCategory, NewBusiness};
pub use event::{Event, NewEvent};
pub use forum::{ForumCategory, ForumPost, ForumReply, NewForumPost, NewForumReply};
pub use pet::{NewPetAlert, PetAlert};
pub use report::{CleanlinessReport, NewCleanlinessReport};
pub use user::{NewUser, User};
pub use waste::WasteCollection;

/// Normalize an optional text field: trim it and treat blank as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
