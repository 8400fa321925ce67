use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Lifecycle state of a post.
///
/// There is no transition graph: any state may be set from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostStatus {
    Draft,
    Approved,
    Rejected,
    Posted,
}

impl PostStatus {
    /// Whether posts in this state belong to the publishing queue.
    pub fn is_queued(self) -> bool {
        matches!(self, PostStatus::Draft | PostStatus::Approved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PostStatus::Draft => "DRAFT",
            PostStatus::Approved => "APPROVED",
            PostStatus::Rejected => "REJECTED",
            PostStatus::Posted => "POSTED",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DRAFT" => Ok(PostStatus::Draft),
            "APPROVED" => Ok(PostStatus::Approved),
            "REJECTED" => Ok(PostStatus::Rejected),
            "POSTED" => Ok(PostStatus::Posted),
            other => Err(DomainError::Validation(format!(
                "unknown post status: {other}"
            ))),
        }
    }
}

/// Kind of media attached to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }
}

impl FromStr for MediaType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "image" => Ok(MediaType::Image),
            "video" => Ok(MediaType::Video),
            other => Err(DomainError::Validation(format!("unknown media type: {other}"))),
        }
    }
}

/// Media descriptor, stored flat on the post as `mediaType` / `mediaUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Media {
    #[serde(rename = "mediaType")]
    pub kind: MediaType,
    #[serde(rename = "mediaUrl")]
    pub url: String,
}

/// A generated post awaiting approval. Not yet part of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub content: String,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
    #[serde(flatten)]
    pub media: Option<Media>,
}

impl PostDraft {
    pub fn new(content: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            topic: topic.into(),
            persona_id: None,
            media: None,
        }
    }

    pub fn with_persona(mut self, persona_id: impl Into<String>) -> Self {
        self.persona_id = Some(persona_id.into());
        self
    }
}

/// Post entity - a scheduled social-media post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub content: String,
    pub topic: String,
    pub status: PostStatus,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub scheduled_for: DateTime<Utc>,
    #[serde(flatten)]
    pub media: Option<Media>,
    /// Weak reference into the persona registry; may dangle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona_id: Option<String>,
}

impl Post {
    /// Create a new draft post from an approved generation result.
    pub fn from_draft(draft: PostDraft, created_at: DateTime<Utc>, scheduled_for: DateTime<Utc>) -> Self {
        Self {
            id: new_post_id(),
            content: draft.content,
            topic: draft.topic,
            status: PostStatus::Draft,
            created_at,
            scheduled_for,
            media: draft.media,
            persona_id: draft.persona_id,
        }
    }
}

pub(crate) fn new_post_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrips_through_wire_names() {
        assert_eq!("posted".parse::<PostStatus>().unwrap(), PostStatus::Posted);
        assert_eq!(PostStatus::Approved.to_string(), "APPROVED");
        assert!("ARCHIVED".parse::<PostStatus>().is_err());
    }

    #[test]
    fn test_post_uses_flat_media_fields_and_millisecond_timestamps() {
        let json = serde_json::json!({
            "id": "abc123",
            "content": "Hello",
            "topic": "Greeting",
            "status": "DRAFT",
            "createdAt": 1_700_000_000_000_i64,
            "scheduledFor": 1_700_086_400_000_i64,
            "mediaType": "video",
            "mediaUrl": "https://example.com/v.mp4",
            "personaId": "p1"
        });

        let post: Post = serde_json::from_value(json).unwrap();
        assert_eq!(post.scheduled_for.timestamp_millis(), 1_700_086_400_000);
        assert_eq!(post.media.as_ref().unwrap().kind, MediaType::Video);

        let back = serde_json::to_value(&post).unwrap();
        assert_eq!(back["mediaUrl"], "https://example.com/v.mp4");
        assert_eq!(back["personaId"], "p1");
    }

    #[test]
    fn test_post_without_media_or_persona() {
        let json = serde_json::json!({
            "id": "x",
            "content": "c",
            "topic": "t",
            "status": "POSTED",
            "createdAt": 0,
            "scheduledFor": 0
        });

        let post: Post = serde_json::from_value(json).unwrap();
        assert!(post.media.is_none());
        assert!(post.persona_id.is_none());

        let back = serde_json::to_value(&post).unwrap();
        assert!(back.get("mediaType").is_none());
    }
}
