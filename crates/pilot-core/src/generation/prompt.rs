//! Prompt assembly.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::domain::{Post, Settings};
use crate::planner::GenerationPlan;

/// How many recent posts are listed for de-duplication.
pub const HISTORY_LIMIT: usize = 10;
/// Characters of content kept per listed post.
pub const HISTORY_EXCERPT_CHARS: usize = 100;
pub const MAX_POST_CHARS: usize = 400;
pub const MIN_HASHTAGS: usize = 5;
pub const MAX_HASHTAGS: usize = 7;

/// Build the full generation prompt for one batch.
///
/// `recent_posts` is expected newest first, as the post store keeps them.
pub fn build_prompt(
    settings: &Settings,
    recent_posts: &[Post],
    plan: &GenerationPlan,
    now: DateTime<Utc>,
) -> String {
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "Act as a social media expert. Generate exactly {} posts for Facebook.",
        plan.slots.len()
    );
    prompt.push_str(
        "Return the response ONLY as a JSON array of objects with \"content\", \"topic\", and \"personaId\" keys.\n\n",
    );

    prompt.push_str("BRAND CONTEXT:\n");
    let _ = writeln!(prompt, "- Brand: {}", settings.brand_name);
    let _ = writeln!(prompt, "- Mission: {}", settings.brand_mission);
    let _ = writeln!(prompt, "- Audience: {}", settings.target_audience);
    let _ = writeln!(prompt, "- Style Guide: {}", settings.style_guide);

    prompt.push_str("\nCONTENT STRATEGY:\n");
    prompt.push_str(&plan.pillar_focus.render());
    prompt.push('\n');

    prompt.push_str("\nSPECIFIC BATCH INSTRUCTIONS:\n");
    prompt.push_str(&slot_instructions(settings, plan, now));

    prompt.push_str("\nSTRICT REPETITION AVOIDANCE:\n");
    prompt.push_str(&history_block(recent_posts));

    prompt.push_str("\nRULES:\n");
    let _ = writeln!(prompt, "1. Max {MAX_POST_CHARS} characters per post.");
    prompt.push_str("2. Strong scroll-stopping hook.\n");
    prompt.push_str("3. Clear CTA.\n");
    let _ = writeln!(prompt, "4. Exactly {MIN_HASHTAGS}-{MAX_HASHTAGS} hashtags.");
    prompt.push_str("5. Ensure \"personaId\" in JSON matches the persona used for that post.\n");

    prompt
}

fn slot_instructions(settings: &Settings, plan: &GenerationPlan, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    for (i, slot) in plan.slots.iter().enumerate() {
        let persona = settings.personas.resolve(Some(slot.persona_id.as_str()));
        let age = persona
            .age(now)
            .map(|a| a.to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let _ = writeln!(out, "POST #{}:", i + 1);
        let _ = writeln!(
            out,
            "- Persona: {} (Age: {}, MBTI: {}, Zodiac: {}, Tone: {})",
            persona.display_name,
            age,
            persona.mbti.as_deref().unwrap_or("unknown"),
            persona.zodiac.as_deref().unwrap_or("unknown"),
            persona.tone,
        );
        let _ = writeln!(out, "- personaId: {}", persona.id);
        let _ = writeln!(out, "- Goal/Instruction: {}", slot.instruction);
        out.push_str("- This post must strictly reflect this persona's voice and this specific goal.\n\n");
    }
    out
}

fn history_block(recent_posts: &[Post]) -> String {
    if recent_posts.is_empty() {
        return "No previous history.\n".to_string();
    }
    recent_posts
        .iter()
        .take(HISTORY_LIMIT)
        .map(|p| {
            let excerpt: String = p.content.chars().take(HISTORY_EXCERPT_CHARS).collect();
            format!("- {}: {}...\n", p.topic, excerpt)
        })
        .collect()
}
