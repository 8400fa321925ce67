//! Conversions between domain types and wire DTOs.

use pilot_core::domain::{Media, MediaType, Post, PostDraft};
use pilot_shared::dto::{DraftDto, PostResponse};

use crate::middleware::error::AppError;

pub fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id.clone(),
        content: post.content.clone(),
        topic: post.topic.clone(),
        status: post.status.as_str().to_string(),
        created_at: post.created_at.timestamp_millis(),
        scheduled_for: post.scheduled_for.timestamp_millis(),
        media_type: post.media.as_ref().map(|m| m.kind.as_str().to_string()),
        media_url: post.media.as_ref().map(|m| m.url.clone()),
        persona_id: post.persona_id.clone(),
    }
}

pub fn post_responses<'a>(posts: impl IntoIterator<Item = &'a Post>) -> Vec<PostResponse> {
    posts.into_iter().map(post_response).collect()
}

pub fn draft_dto(draft: PostDraft) -> DraftDto {
    let (media_type, media_url) = match draft.media {
        Some(media) => (Some(media.kind.as_str().to_string()), Some(media.url)),
        None => (None, None),
    };
    DraftDto {
        content: draft.content,
        topic: draft.topic,
        persona_id: draft.persona_id,
        media_type,
        media_url,
    }
}

pub fn draft_from_dto(dto: DraftDto) -> Result<PostDraft, AppError> {
    let media = match (dto.media_type, dto.media_url) {
        (Some(kind), Some(url)) => Some(Media {
            kind: kind.parse::<MediaType>()?,
            url,
        }),
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "mediaType and mediaUrl must be given together".to_string(),
            ));
        }
    };
    Ok(PostDraft {
        content: dto.content,
        topic: dto.topic,
        persona_id: dto.persona_id,
        media,
    })
}
