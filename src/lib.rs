//! Generate GraphQL test queries from an introspection document: every
//! argumented field is reached by some query path, every argument gets a
//! value resolver, and the resolvers are expanded into concrete argument
//! combinations.
pub mod binder;
pub mod cli;
pub mod combine;
pub mod config;
pub mod error;
pub mod introspection;
pub mod jq_exec;
pub mod literal;
pub mod path;
pub mod path_de;
pub mod registry;
pub mod resolver;
pub mod schema;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use combine::Proposition;
pub use config::{GenerationConfig, Override, Overrides};
pub use error::{Error, Result};
pub use introspection::{INTROSPECTION_QUERY, Transport, TransportResponse};
pub use registry::DescendantScan;
pub use resolver::{Determinism, SharedResolver, ValueResolver};
pub use schema::{Expansion, PathFailure, PreparedQueries, PreparedQuery, Schema};
