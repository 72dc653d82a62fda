//! Resource-path segmentation and resolution

pub mod resolver;
pub mod segment;

pub use resolver::resolve_path;
pub use segment::{KeyPredicate, NavigationSegment, ResolvedPath, TargetType};
