//! Persona registry - a list of voice profiles that is never empty.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Persona, PersonaPatch};
use crate::error::DomainError;

/// Ordered, non-empty collection of personas.
///
/// The first persona is the fallback for any dangling persona reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Persona>", into = "Vec<Persona>")]
pub struct PersonaRegistry {
    personas: Vec<Persona>,
}

impl PersonaRegistry {
    pub fn new(first: Persona) -> Self {
        Self {
            personas: vec![first],
        }
    }

    pub fn all(&self) -> &[Persona] {
        &self.personas
    }

    pub fn len(&self) -> usize {
        self.personas.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.personas.is_empty()
    }

    pub fn first(&self) -> &Persona {
        // Construction paths all reject an empty list.
        &self.personas[0]
    }

    pub fn get(&self, id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == id)
    }

    /// Resolve a weak reference, falling back to the first persona.
    pub fn resolve(&self, id: Option<&str>) -> &Persona {
        id.and_then(|id| self.get(id)).unwrap_or_else(|| self.first())
    }

    /// Add a placeholder persona and return its id.
    pub fn add(&mut self) -> String {
        let id = loop {
            let candidate = Uuid::new_v4().simple().to_string()[..9].to_string();
            if self.get(&candidate).is_none() {
                break candidate;
            }
        };
        self.personas.push(Persona::placeholder(id.clone()));
        id
    }

    /// Merge fields into an existing persona. Returns `false` for unknown ids.
    pub fn update(&mut self, id: &str, patch: PersonaPatch) -> bool {
        match self.personas.iter_mut().find(|p| p.id == id) {
            Some(persona) => {
                persona.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Remove a persona. Refused while it is the last one left.
    pub fn remove(&mut self, id: &str) -> bool {
        if self.personas.len() <= 1 {
            return false;
        }
        let before = self.personas.len();
        self.personas.retain(|p| p.id != id);
        self.personas.len() != before
    }
}

impl Default for PersonaRegistry {
    fn default() -> Self {
        Self::new(Persona::builtin())
    }
}

impl TryFrom<Vec<Persona>> for PersonaRegistry {
    type Error = DomainError;

    fn try_from(personas: Vec<Persona>) -> Result<Self, Self::Error> {
        if personas.is_empty() {
            return Err(DomainError::Validation(
                "at least one persona is required".to_string(),
            ));
        }
        Ok(Self { personas })
    }
}

impl From<PersonaRegistry> for Vec<Persona> {
    fn from(registry: PersonaRegistry) -> Self {
        registry.personas
    }
}
