// ── Project and section domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::SyncState;
use super::entity_id::EntityId;

/// Publication status of a project.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
    Draft,
}

impl ProjectStatus {
    /// Parse a backend status string. Anything unrecognized is a draft.
    pub fn from_backend(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.parse().ok()).unwrap_or(Self::Draft)
    }
}

/// A showcased project with its nested sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub overview: String,
    pub main_image_url: String,
    pub status: ProjectStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(skip)]
    pub sync: SyncState,
}

impl Project {
    pub fn section(&self, id: EntityId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// A titled block of content inside a project page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
    pub description: String,
    pub details: String,
    pub image_url: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub sync: SyncState,
}
