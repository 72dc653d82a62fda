//! Engine configuration
//!
//! Two layers: `constants` holds compile-time operational limits that bound
//! request parsing work, `runtime` holds user preferences resolved once at
//! startup from the environment or a TOML file.

pub mod constants;
pub mod runtime;

pub use runtime::{EnginePreferences, LoggingPreferences};
