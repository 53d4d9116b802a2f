use serde_json::Value;

use super::{Candidates, ValueResolver};
use crate::combine::Proposition;

/// Fixed list of caller-supplied values, yielded in order.
#[derive(Debug, Clone)]
pub struct LiteralResolver {
    values: Vec<Value>,
    bare_strings: bool,
}

impl LiteralResolver {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values, bare_strings: false }
    }

    /// Render string values unquoted, for enum-typed arguments.
    pub fn with_bare_strings(mut self) -> Self {
        self.bare_strings = true;
        self
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl ValueResolver for LiteralResolver {
    fn candidates<'a>(&'a self, _context: &'a Proposition) -> Candidates<'a> {
        Box::new(self.values.iter().cloned())
    }

    fn render(&self, value: &Value) -> String {
        if self.bare_strings {
            crate::literal::render_enum(value)
        } else {
            crate::literal::render_value(value)
        }
    }
}
