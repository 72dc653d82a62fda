//! Query-option validation and normalization

pub mod types;
pub mod validator;

pub use types::{ExpandSegment, FormatKind, InlineCount, QueryOptions, SelectItem};
pub use validator::validate_options;
