// ── Event domain types ──

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::common::SyncState;
use super::entity_id::EntityId;

/// Whether an event is still ahead. Always derived from the date.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventStatus {
    #[default]
    Upcoming,
    Past,
}

impl EventStatus {
    /// `Upcoming` when `date` (YYYY-MM-DD) is today or later, `Past`
    /// otherwise. Dates that don't parse count as past.
    pub fn for_date(date: &str, today: NaiveDate) -> Self {
        match parse_event_date(date) {
            Some(d) if d >= today => Self::Upcoming,
            _ => Self::Past,
        }
    }
}

/// Parse an event's date column. Tolerates a trailing time component.
pub fn parse_event_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// The local calendar date used for status derivation.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A scheduled event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub time: String,
    pub location: String,
    pub image_url: String,
    pub url: String,
    pub status: EventStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub sync: SyncState,
}

impl Event {
    pub fn day(&self) -> Option<NaiveDate> {
        parse_event_date(&self.date)
    }
}
