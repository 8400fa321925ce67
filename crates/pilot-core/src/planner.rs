//! Campaign planning - turns a short list of campaigns into a full batch of
//! generation slots.

use crate::domain::{Campaign, ContentPillar};
use crate::registry::PersonaRegistry;

/// Number of posts requested per generation call.
pub const SLOT_COUNT: usize = 5;

/// Maximum number of campaigns a session can hold.
pub const MAX_CAMPAIGNS: usize = 5;

/// Instruction used when the session holds no campaigns.
pub const GENERIC_INSTRUCTION: &str = "General high engagement post";

/// The user's in-progress campaign list for one generation session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignSession {
    entries: Vec<Campaign>,
}

impl CampaignSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a session from caller-supplied campaigns, applying the same
    /// rules as [`CampaignSession::add`].
    pub fn from_campaigns(campaigns: impl IntoIterator<Item = Campaign>) -> Self {
        let mut session = Self::new();
        for campaign in campaigns {
            session.add(campaign.instruction, campaign.persona_id);
        }
        session
    }

    pub fn entries(&self) -> &[Campaign] {
        &self.entries
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_CAMPAIGNS
    }

    /// Add a campaign. Blank instructions and additions to a full session are
    /// ignored; returns whether the campaign was added.
    pub fn add(&mut self, instruction: impl Into<String>, persona_id: impl Into<String>) -> bool {
        let instruction: String = instruction.into();
        let instruction = instruction.trim();
        if instruction.is_empty() || self.is_full() {
            return false;
        }
        self.entries.push(Campaign::new(instruction, persona_id));
        true
    }

    pub fn remove(&mut self, index: usize) -> Option<Campaign> {
        (index < self.entries.len()).then(|| self.entries.remove(index))
    }

    /// Expand the session into exactly [`SLOT_COUNT`] slots.
    pub fn slots(&self, personas: &PersonaRegistry) -> Vec<Campaign> {
        expand_slots(&self.entries, personas)
    }
}

/// Cycle `entries` round-robin into [`SLOT_COUNT`] slots.
///
/// An empty list is replaced by one generic campaign for the first persona.
pub fn expand_slots(entries: &[Campaign], personas: &PersonaRegistry) -> Vec<Campaign> {
    let fallback;
    let entries = if entries.is_empty() {
        fallback = [Campaign::new(GENERIC_INSTRUCTION, personas.first().id.clone())];
        &fallback[..]
    } else {
        entries
    };

    (0..SLOT_COUNT)
        .map(|i| entries[i % entries.len()].clone())
        .collect()
}

/// Which pillars the generator should draw topics from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PillarFocus {
    /// Only these pillar names, chosen by the user for this batch.
    Selected(Vec<String>),
    /// The full catalog, rotated as themes.
    Rotating(Vec<ContentPillar>),
}

impl PillarFocus {
    pub fn new(selected: &[String], catalog: &[ContentPillar]) -> Self {
        if selected.is_empty() {
            PillarFocus::Rotating(catalog.to_vec())
        } else {
            PillarFocus::Selected(selected.to_vec())
        }
    }

    /// Prompt text describing the focus.
    pub fn render(&self) -> String {
        match self {
            PillarFocus::Selected(names) => format!(
                "Focus ONLY on these specific pillars for this batch: {}",
                names.join(", ")
            ),
            PillarFocus::Rotating(pillars) => {
                let details = pillars
                    .iter()
                    .map(|p| format!("- {}: {}", p.name, p.description))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("Use these rotating pillars as the primary content themes:\n{details}")
            }
        }
    }
}

/// Everything the generator needs to know about one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationPlan {
    pub slots: Vec<Campaign>,
    pub pillar_focus: PillarFocus,
}

impl GenerationPlan {
    pub fn new(
        session: &CampaignSession,
        selected_pillars: &[String],
        catalog: &[ContentPillar],
        personas: &PersonaRegistry,
    ) -> Self {
        Self {
            slots: session.slots(personas),
            pillar_focus: PillarFocus::new(selected_pillars, catalog),
        }
    }
}
