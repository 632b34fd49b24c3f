// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed PostgreSQL operations.
//!
//! Provides list and insert operations for:
//! - Events
//! - Businesses and business categories
//! - Forum categories, threads and replies
//! - Bulletin posts
//! - Pet alerts
//! - Cleanliness reports
//! - Waste collection schedule
//! - Users
//!
//! Every statement is parameterized. Filters are appended with
//! [`QueryBuilder`] so absent filters never reach the SQL text.

use crate::error::Result;
use crate::models::{
    BulletinPost, Business, BusinessCategory, CleanlinessReport, Event, ForumCategory, ForumPost,
    ForumReply, NewBulletinPost, NewBusiness, NewCleanlinessReport, NewEvent, NewForumPost,
    NewForumReply, NewPetAlert, PetAlert, User, WasteCollection,
};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, title, description, location, category, start_date, end_date, \
     image_url, organizer, contact_email, website, is_featured, is_active, created_at";
const BUSINESS_COLUMNS: &str = "id, name, description, category_id, address, phone, email, \
     website, opening_hours, image_url, is_featured, is_active, created_at";
const FORUM_POST_COLUMNS: &str = "id, category_id, title, content, author_name, author_email, \
     is_pinned, is_active, reply_count, created_at";
const BULLETIN_COLUMNS: &str = "id, post_type, title, content, contact_name, contact_email, \
     contact_phone, is_pinned, is_active, expires_at, created_at";
const PET_COLUMNS: &str = "id, status, animal_type, name, description, last_seen_location, \
     last_seen_at, image_url, contact_name, contact_phone, contact_email, is_active, created_at";
const REPORT_COLUMNS: &str = "id, category, description, location, latitude, longitude, \
     image_url, is_anonymous, reporter_name, reporter_email, status, created_at";

/// Page window applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub category: Option<String>,
    pub featured: Option<bool>,
    /// Only events that have not ended before this instant
    pub from: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default)]
pub struct BusinessFilter {
    /// Category slug
    pub category: Option<String>,
    /// Case-insensitive substring of name or description
    pub search: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PetFilter {
    pub status: Option<String>,
    pub animal_type: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub status: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WasteFilter {
    pub district: Option<String>,
    pub waste_type: Option<String>,
    pub from: Option<NaiveDate>,
}

/// Borrowed handle on an available pool.
#[derive(Clone, Copy)]
pub struct PgStore<'a> {
    pool: &'a PgPool,
}

impl<'a> PgStore<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    // ─── Event Operations ────────────────────────────────────────

    /// Active events, featured first, then by start date.
    pub async fn list_events(&self, filter: &EventFilter, window: Window) -> Result<Vec<Event>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE is_active = TRUE"
        ));
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(featured) = filter.featured {
            qb.push(" AND is_featured = ").push_bind(featured);
        }
        if let Some(from) = filter.from {
            qb.push(" AND COALESCE(end_date, start_date) >= ")
                .push_bind(from);
        }
        qb.push(" ORDER BY is_featured DESC, start_date ASC");
        push_window(&mut qb, window);

        Ok(qb.build_query_as::<Event>().fetch_all(self.pool).await?)
    }

    pub async fn insert_event(&self, event: &NewEvent) -> Result<Event> {
        let sql = format!(
            "INSERT INTO events (title, description, location, category, start_date, end_date, \
             image_url, organizer, contact_email, website) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {EVENT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Event>(&sql)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(&event.category)
            .bind(event.start_date)
            .bind(event.end_date)
            .bind(&event.image_url)
            .bind(&event.organizer)
            .bind(&event.contact_email)
            .bind(&event.website)
            .fetch_one(self.pool)
            .await?)
    }

    // ─── Business Operations ─────────────────────────────────────

    /// Active businesses, featured first, then alphabetically.
    pub async fn list_businesses(
        &self,
        filter: &BusinessFilter,
        window: Window,
    ) -> Result<Vec<Business>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {BUSINESS_COLUMNS} FROM businesses WHERE is_active = TRUE"
        ));
        if let Some(slug) = &filter.category {
            qb.push(" AND category_id = (SELECT id FROM business_categories WHERE slug = ")
                .push_bind(slug.clone())
                .push(")");
        }
        if let Some(search) = &filter.search {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        qb.push(" ORDER BY is_featured DESC, name ASC");
        push_window(&mut qb, window);

        Ok(qb.build_query_as::<Business>().fetch_all(self.pool).await?)
    }

    pub async fn list_business_categories(&self) -> Result<Vec<BusinessCategory>> {
        Ok(sqlx::query_as::<_, BusinessCategory>(
            "SELECT id, slug, name, icon, sort_order FROM business_categories \
             ORDER BY sort_order ASC, name ASC",
        )
        .fetch_all(self.pool)
        .await?)
    }

    /// Insert a directory submission. New entries start inactive.
    pub async fn insert_business(&self, business: &NewBusiness) -> Result<Business> {
        let sql = format!(
            "INSERT INTO businesses (name, description, category_id, address, phone, email, \
             website, opening_hours, image_url, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, FALSE) RETURNING {BUSINESS_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, Business>(&sql)
            .bind(&business.name)
            .bind(&business.description)
            .bind(business.category_id)
            .bind(&business.address)
            .bind(&business.phone)
            .bind(&business.email)
            .bind(&business.website)
            .bind(&business.opening_hours)
            .bind(&business.image_url)
            .fetch_one(self.pool)
            .await?)
    }

    // ─── Forum Operations ────────────────────────────────────────

    pub async fn list_forum_categories(&self) -> Result<Vec<ForumCategory>> {
        Ok(sqlx::query_as::<_, ForumCategory>(
            "SELECT id, slug, name, description, sort_order FROM forum_categories \
             ORDER BY sort_order ASC, name ASC",
        )
        .fetch_all(self.pool)
        .await?)
    }

    /// Active threads, pinned first, then newest.
    pub async fn list_forum_posts(
        &self,
        category: Option<&str>,
        window: Window,
    ) -> Result<Vec<ForumPost>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {FORUM_POST_COLUMNS} FROM forum_posts WHERE is_active = TRUE"
        ));
        if let Some(slug) = category {
            qb.push(" AND category_id = (SELECT id FROM forum_categories WHERE slug = ")
                .push_bind(slug.to_string())
                .push(")");
        }
        qb.push(" ORDER BY is_pinned DESC, created_at DESC");
        push_window(&mut qb, window);

        Ok(qb.build_query_as::<ForumPost>().fetch_all(self.pool).await?)
    }

    pub async fn get_forum_post(&self, id: Uuid) -> Result<Option<ForumPost>> {
        let sql = format!(
            "SELECT {FORUM_POST_COLUMNS} FROM forum_posts WHERE id = $1 AND is_active = TRUE"
        );
        Ok(sqlx::query_as::<_, ForumPost>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    pub async fn insert_forum_post(&self, post: &NewForumPost) -> Result<ForumPost> {
        let sql = format!(
            "INSERT INTO forum_posts (category_id, title, content, author_name, author_email) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {FORUM_POST_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, ForumPost>(&sql)
            .bind(post.category_id)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.author_name)
            .bind(&post.author_email)
            .fetch_one(self.pool)
            .await?)
    }

    /// Replies to a thread, oldest first.
    pub async fn list_forum_replies(&self, post_id: Uuid, window: Window) -> Result<Vec<ForumReply>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, post_id, content, author_name, created_at FROM forum_replies \
             WHERE is_active = TRUE AND post_id = ",
        );
        qb.push_bind(post_id);
        qb.push(" ORDER BY created_at ASC");
        push_window(&mut qb, window);

        Ok(qb.build_query_as::<ForumReply>().fetch_all(self.pool).await?)
    }

    /// Insert a reply. The thread's `reply_count` is maintained by a trigger.
    pub async fn insert_forum_reply(&self, post_id: Uuid, reply: &NewForumReply) -> Result<ForumReply> {
        Ok(sqlx::query_as::<_, ForumReply>(
            "INSERT INTO forum_replies (post_id, content, author_name) VALUES ($1, $2, $3) \
             RETURNING id, post_id, content, author_name, created_at",
        )
        .bind(post_id)
        .bind(&reply.content)
        .bind(&reply.author_name)
        .fetch_one(self.pool)
        .await?)
    }

    // ─── Bulletin Operations ─────────────────────────────────────

    /// Active, unexpired posts, pinned first, then newest.
    pub async fn list_bulletin_posts(
        &self,
        post_type: Option<&str>,
        window: Window,
    ) -> Result<Vec<BulletinPost>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {BULLETIN_COLUMNS} FROM bulletin_posts \
             WHERE is_active = TRUE AND (expires_at IS NULL OR expires_at > NOW())"
        ));
        if let Some(post_type) = post_type {
            qb.push(" AND post_type = ").push_bind(post_type.to_string());
        }
        qb.push(" ORDER BY is_pinned DESC, created_at DESC");
        push_window(&mut qb, window);

        Ok(qb.build_query_as::<BulletinPost>().fetch_all(self.pool).await?)
    }

    pub async fn insert_bulletin_post(&self, post: &NewBulletinPost) -> Result<BulletinPost> {
        let sql = format!(
            "INSERT INTO bulletin_posts (post_type, title, content, contact_name, contact_email, \
             contact_phone, expires_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {BULLETIN_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, BulletinPost>(&sql)
            .bind(&post.post_type)
            .bind(&post.title)
            .bind(&post.content)
            .bind(&post.contact_name)
            .bind(&post.contact_email)
            .bind(&post.contact_phone)
            .bind(post.expires_at)
            .fetch_one(self.pool)
            .await?)
    }

    // ─── Pet Alert Operations ────────────────────────────────────

    pub async fn list_pet_alerts(&self, filter: &PetFilter, window: Window) -> Result<Vec<PetAlert>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PET_COLUMNS} FROM pet_alerts WHERE is_active = TRUE"
        ));
        if let Some(status) = &filter.status {
            qb.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(animal_type) = &filter.animal_type {
            qb.push(" AND animal_type = ").push_bind(animal_type.clone());
        }
        qb.push(" ORDER BY created_at DESC");
        push_window(&mut qb, window);

        Ok(qb.build_query_as::<PetAlert>().fetch_all(self.pool).await?)
    }

    pub async fn insert_pet_alert(&self, alert: &NewPetAlert) -> Result<PetAlert> {
        let sql = format!(
            "INSERT INTO pet_alerts (status, animal_type, name, description, last_seen_location, \
             last_seen_at, image_url, contact_name, contact_phone, contact_email) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING {PET_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, PetAlert>(&sql)
            .bind(&alert.status)
            .bind(&alert.animal_type)
            .bind(&alert.name)
            .bind(&alert.description)
            .bind(&alert.last_seen_location)
            .bind(alert.last_seen_at)
            .bind(&alert.image_url)
            .bind(&alert.contact_name)
            .bind(&alert.contact_phone)
            .bind(&alert.contact_email)
            .fetch_one(self.pool)
            .await?)
    }

    // ─── Cleanliness Report Operations ───────────────────────────

    pub async fn list_reports(
        &self,
        filter: &ReportFilter,
        window: Window,
    ) -> Result<Vec<CleanlinessReport>> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {REPORT_COLUMNS} FROM cleanliness_reports WHERE TRUE"
        ));
        if let Some(status) = &filter.status {
            qb.push(" AND status = ").push_bind(status.clone());
        }
        if let Some(category) = &filter.category {
            qb.push(" AND category = ").push_bind(category.clone());
        }
        qb.push(" ORDER BY created_at DESC");
        push_window(&mut qb, window);

        Ok(qb
            .build_query_as::<CleanlinessReport>()
            .fetch_all(self.pool)
            .await?)
    }

    pub async fn insert_report(&self, report: &NewCleanlinessReport) -> Result<CleanlinessReport> {
        let sql = format!(
            "INSERT INTO cleanliness_reports (category, description, location, latitude, \
             longitude, image_url, is_anonymous, reporter_name, reporter_email) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING {REPORT_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, CleanlinessReport>(&sql)
            .bind(&report.category)
            .bind(&report.description)
            .bind(&report.location)
            .bind(report.latitude)
            .bind(report.longitude)
            .bind(&report.image_url)
            .bind(report.is_anonymous)
            .bind(&report.reporter_name)
            .bind(&report.reporter_email)
            .fetch_one(self.pool)
            .await?)
    }

    // ─── Waste Schedule Operations ───────────────────────────────

    /// Upcoming pickups in date order.
    pub async fn list_waste_collections(
        &self,
        filter: &WasteFilter,
        window: Window,
    ) -> Result<Vec<WasteCollection>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT id, district, waste_type, collection_date, notes FROM waste_collections \
             WHERE TRUE",
        );
        if let Some(district) = &filter.district {
            qb.push(" AND district = ").push_bind(district.clone());
        }
        if let Some(waste_type) = &filter.waste_type {
            qb.push(" AND waste_type = ").push_bind(waste_type.clone());
        }
        if let Some(from) = filter.from {
            qb.push(" AND collection_date >= ").push_bind(from);
        }
        qb.push(" ORDER BY collection_date ASC, waste_type ASC");
        push_window(&mut qb, window);

        Ok(qb
            .build_query_as::<WasteCollection>()
            .fetch_all(self.pool)
            .await?)
    }

    // ─── User Operations ─────────────────────────────────────────

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT id, email, display_name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?)
    }

    /// Insert a user. A duplicate email surfaces as `AppError::Conflict`.
    pub async fn insert_user(
        &self,
        email: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<User> {
        Ok(sqlx::query_as::<_, User>(
            "INSERT INTO users (email, display_name, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, display_name, password_hash, created_at",
        )
        .bind(email)
        .bind(display_name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await?)
    }
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, window: Window) {
    qb.push(" LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
}

/// Escape `%`, `_` and `\` so user input matches literally inside ILIKE.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("café"), "café");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[test]
    fn test_window_binds_limit_and_offset() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM events WHERE TRUE");
        qb.push(" AND category = ").push_bind("culture".to_string());
        push_window(&mut qb, Window { limit: 10, offset: 0 });
        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM events WHERE TRUE AND category = $1 LIMIT $2 OFFSET $3"
        );
    }
}
