//! Value resolvers: units that produce candidate values for one argument.
//!
//! Every call to [`ValueResolver::candidates`] starts a fresh sequence.
//! [`Determinism`] states whether two such sequences are guaranteed to be
//! equal; the default scalar generators are randomized.
pub mod connection;
pub mod enums;
pub mod input;
pub mod literal;
pub mod scalar;

use std::fmt::Debug;
use std::sync::Arc;

use serde_json::Value;

use crate::combine::Proposition;

pub use connection::{ConnectionFirst, ConnectionLast};
pub use enums::EnumResolver;
pub use input::InputObjectResolver;
pub use literal::LiteralResolver;
pub use scalar::ScalarRegistry;

pub type Candidates<'a> = Box<dyn Iterator<Item = Value> + 'a>;

pub type SharedResolver = Arc<dyn ValueResolver>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Determinism {
    /// Restarting yields the same sequence.
    Deterministic,
    /// Restarting may yield a different sequence (unseeded randomness, clock).
    Randomized,
}

impl Determinism {
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Determinism::Deterministic, Determinism::Deterministic) => Determinism::Deterministic,
            _ => Determinism::Randomized,
        }
    }
}

pub trait ValueResolver: Debug + Send + Sync {
    /// Candidate values, given the proposition built so far.
    fn candidates<'a>(&'a self, context: &'a Proposition) -> Candidates<'a>;

    /// GraphQL literal for one of this resolver's values.
    fn render(&self, value: &Value) -> String {
        crate::literal::render_value(value)
    }

    fn determinism(&self) -> Determinism {
        Determinism::Deterministic
    }
}

/// Built-in resolvers that an override table may name with `{"$resolver": ..}`.
pub fn builtin(name: &str) -> Option<SharedResolver> {
    match name {
        "connection.first" => Some(Arc::new(ConnectionFirst)),
        "connection.last" => Some(Arc::new(ConnectionLast)),
        _ => None,
    }
}
