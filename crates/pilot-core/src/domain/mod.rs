//! Domain entities - the core business objects.

mod campaign;
mod persona;
mod post;
mod settings;

pub use campaign::Campaign;
pub use persona::{DEFAULT_TONE, Persona, PersonaPatch, derived_age};
pub use post::{Media, MediaType, Post, PostDraft, PostStatus};
pub use settings::{AiEngine, ContentPillar, DEFAULT_BYOK_MODEL, Settings};

pub(crate) use post::new_post_id;
