//! Resolved request representation
//!
//! `UriInfo` is the engine's output: an immutable, fully validated picture
//! of one request. It is assembled exclusively through the staged builder,
//! which enforces construction order at the type level.

pub mod builder;
pub mod info;

pub use builder::UriInfoBuilder;
pub use info::{ContextKind, UriInfo};
