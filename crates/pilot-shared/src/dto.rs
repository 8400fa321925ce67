//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase and timestamps are epoch milliseconds, matching
//! the persisted records.

use serde::{Deserialize, Serialize};

/// A post as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub content: String,
    pub topic: String,
    /// One of `DRAFT`, `APPROVED`, `REJECTED`, `POSTED`.
    pub status: String,
    pub created_at: i64,
    pub scheduled_for: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
}

/// A generated, not yet approved post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftDto {
    pub content: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    /// `image` or `video`; must be given together with `media_url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

/// POST /api/posts/batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveBatchRequest {
    pub drafts: Vec<DraftDto>,
}

/// PUT /api/posts/{id}/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// PUT /api/posts/{id}/schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateScheduleRequest {
    pub scheduled_for: i64,
}

/// PUT /api/posts/queue/order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderQueueRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsCounts {
    pub drafts: usize,
    pub approved: usize,
    pub posted: usize,
}

/// GET /api/posts/stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(flatten)]
    pub counts: StatsCounts,
    pub posts_per_day: f64,
    pub upcoming: Vec<PostResponse>,
}

/// POST /api/settings/pillars
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddPillarRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// POST /api/settings/topics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTopicRequest {
    pub topic: String,
}

/// POST /api/personas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaCreatedResponse {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDto {
    #[serde(alias = "text")]
    pub instruction: String,
    pub persona_id: String,
}

/// POST /api/generate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub campaigns: Vec<CampaignDto>,
    /// Pillar names to focus on; empty means rotate through all pillars.
    #[serde(default)]
    pub pillars: Vec<String>,
    #[serde(default)]
    pub simulate_media: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub drafts: Vec<DraftDto>,
}
