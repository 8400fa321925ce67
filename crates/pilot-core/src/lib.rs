//! # SocialPilot Core
//!
//! The domain layer of SocialPilot.
//! This crate holds the post lifecycle, the noon-cadence scheduler, the persona
//! registry and campaign planning, plus the ports that infrastructure must
//! implement. It performs no network or disk I/O of its own.

pub mod domain;
pub mod error;
pub mod generation;
pub mod planner;
pub mod ports;
pub mod registry;
pub mod scheduler;
pub mod store;
pub mod workspace;

pub use error::DomainError;
pub use registry::PersonaRegistry;
pub use store::PostStore;
pub use workspace::Workspace;
