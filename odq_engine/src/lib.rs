//! OData V2 URI resolution and expression engine
//!
//! Turns a raw resource path plus query options into an immutable,
//! type-checked `UriInfo` against a declared metadata model. Resolution is
//! strict: the first error wins, path errors before option errors, and a
//! successful result is fully validated against the model.

pub mod config;
pub mod edm;
pub mod error;
pub mod expr;
pub mod lexical;
pub mod literal;
#[macro_use]
pub mod logging;
pub mod options;
pub mod path;
pub mod pipeline;
pub mod tokens;
pub mod uri;
pub mod utils;

#[cfg(test)]
mod test_fixtures;

// Re-export key types for library consumers
pub use edm::MetadataModel;
pub use error::{UriResult, UriSyntaxError};
pub use expr::CommonExpression;
pub use literal::{format_literal, parse_literal, TypedValue};
pub use options::QueryOptions;
pub use pipeline::resolve;
pub use uri::{ContextKind, UriInfo};
