use thiserror::Error;

use crate::types::TypeKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// The transport itself failed before producing a response.
    #[error("transport failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success status on the introspection request. Not retried.
    #[error("introspection request failed with status {status}")]
    IntrospectionFetch { status: u16 },

    #[error("failed to decode introspection document: {0}")]
    Decode(String),

    #[error("type `{name}` not found in the registry")]
    TypeNotFound { name: String },

    #[error("cannot unwrap type reference of {owner}: {reason}")]
    TypeUnwrap { owner: String, reason: String },

    #[error("no generator registered for scalar `{scalar}` (argument {key})")]
    UnknownScalar { key: String, scalar: String },

    #[error("argument {key} has unsupported kind {kind:?}")]
    UnsupportedArgumentKind { key: String, kind: TypeKind },

    #[error("no resolver could be produced for argument {key}")]
    MissingResolver { key: String },

    #[error("invalid override at `{key}`: {reason}")]
    InvalidOverride { key: String, reason: String },
}
