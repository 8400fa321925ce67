//! Generation request orchestration: prompt assembly, response decoding and
//! caller-side post-processing of drafts.

mod prompt;
mod response;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Campaign, Media, MediaType, Post, PostDraft, Settings};
use crate::planner::GenerationPlan;
use crate::ports::{GeneratedPost, GenerationError, PostGenerator};

pub use prompt::{
    HISTORY_EXCERPT_CHARS, HISTORY_LIMIT, MAX_HASHTAGS, MAX_POST_CHARS, MIN_HASHTAGS, build_prompt,
};
pub use response::{decode_chat_content, decode_schema_array, strip_code_fence};

/// A fully assembled generation call.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Settings snapshot; backends read the engine and BYOK fields from it.
    pub settings: Settings,
    pub slots: Vec<Campaign>,
    pub prompt: String,
}

impl GenerationRequest {
    pub fn new(
        settings: &Settings,
        recent_posts: &[Post],
        plan: &GenerationPlan,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            prompt: build_prompt(settings, recent_posts, plan, now),
            settings: settings.clone(),
            slots: plan.slots.clone(),
        }
    }
}

/// Run `request` against `generator` and convert the output into drafts.
///
/// Nothing is persisted; approve the drafts with
/// [`Workspace::approve_drafts`](crate::Workspace::approve_drafts).
pub async fn generate_drafts(
    generator: &dyn PostGenerator,
    request: &GenerationRequest,
    simulate_media: bool,
) -> Result<Vec<PostDraft>, GenerationError> {
    let generated = generator.generate(request).await?;
    Ok(into_drafts(generated, simulate_media))
}

/// Convert backend output into drafts ready for approval.
pub fn into_drafts(generated: Vec<GeneratedPost>, simulate_media: bool) -> Vec<PostDraft> {
    let drafts = generated.into_iter().map(PostDraft::from).collect();
    if simulate_media {
        attach_placeholder_media(drafts)
    } else {
        drafts
    }
}

/// Attach placeholder media, alternating image and video by position.
pub fn attach_placeholder_media(drafts: Vec<PostDraft>) -> Vec<PostDraft> {
    drafts
        .into_iter()
        .enumerate()
        .map(|(i, mut draft)| {
            let kind = if i % 2 == 0 {
                MediaType::Image
            } else {
                MediaType::Video
            };
            draft.media = Some(Media {
                kind,
                url: format!("https://picsum.photos/seed/{}/800/450", Uuid::new_v4().simple()),
            });
            draft
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(n: usize) -> Vec<GeneratedPost> {
        (0..n)
            .map(|i| GeneratedPost {
                content: format!("c{i}"),
                topic: format!("t{i}"),
                persona_id: "p1".to_string(),
            })
            .collect()
    }

    #[test]
    fn test_drafts_keep_persona_and_skip_media_by_default() {
        let drafts = into_drafts(generated(2), false);
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].persona_id.as_deref(), Some("p1"));
        assert!(drafts.iter().all(|d| d.media.is_none()));
    }

    #[test]
    fn test_simulated_media_alternates_by_index() {
        let drafts = into_drafts(generated(3), true);
        let kinds: Vec<MediaType> = drafts.iter().map(|d| d.media.as_ref().unwrap().kind).collect();
        assert_eq!(kinds, vec![MediaType::Image, MediaType::Video, MediaType::Image]);
        assert_ne!(drafts[0].media.as_ref().unwrap().url, drafts[2].media.as_ref().unwrap().url);
    }
}
