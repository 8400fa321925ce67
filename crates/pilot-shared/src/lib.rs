//! # SocialPilot Shared
//!
//! Wire types for the HTTP API. Kept free of domain dependencies so a client
//! can use them without pulling in the core crate.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
