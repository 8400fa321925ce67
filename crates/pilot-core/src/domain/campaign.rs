use serde::{Deserialize, Serialize};

/// A user-authored generation directive bound to one persona.
///
/// Campaigns only live for the duration of a generation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    #[serde(alias = "text")]
    pub instruction: String,
    /// Weak reference; resolved against the registry at the point of use.
    pub persona_id: String,
}

impl Campaign {
    pub fn new(instruction: impl Into<String>, persona_id: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            persona_id: persona_id.into(),
        }
    }
}
