//! Waste collection schedule.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use uuid::Uuid;

/// One scheduled pickup for a district.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct WasteCollection {
    pub id: Uuid,
    pub district: String,
    /// "residual", "paper", "bio", "plastic" or "glass"
    pub waste_type: String,
    pub collection_date: NaiveDate,
    pub notes: Option<String>,
}
