use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::{Candidates, Determinism, SharedResolver, ValueResolver};
use crate::combine::{Proposition, cartesian};

/// Composes one child resolver per declared input field into a compound
/// record. Yields the cartesian product of the children's candidates.
#[derive(Debug, Clone)]
pub struct InputObjectResolver {
    type_name: String,
    fields: IndexMap<String, SharedResolver>,
}

impl InputObjectResolver {
    pub fn new(type_name: impl Into<String>, fields: IndexMap<String, SharedResolver>) -> Self {
        Self { type_name: type_name.into(), fields }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &SharedResolver)> {
        self.fields.iter().map(|(name, r)| (name.as_str(), r))
    }
}

impl ValueResolver for InputObjectResolver {
    fn candidates<'a>(&'a self, context: &'a Proposition) -> Candidates<'a> {
        let columns = self
            .fields
            .values()
            .map(|child| child.candidates(context).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let names = self.fields.keys();
        Box::new(cartesian(&columns).into_iter().map(move |row| {
            let record = names.clone().cloned().zip(row).collect::<Map<String, Value>>();
            Value::Object(record)
        }))
    }

    fn render(&self, value: &Value) -> String {
        match value {
            Value::Object(record) => {
                let entries = record
                    .iter()
                    .map(|(name, v)| {
                        let rendered = match self.fields.get(name) {
                            Some(child) => child.render(v),
                            None => crate::literal::render_value(v),
                        };
                        format!("{name}: {rendered}")
                    })
                    .collect::<Vec<_>>();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Array(items) => {
                format!("[{}]", items.iter().map(|v| self.render(v)).collect::<Vec<_>>().join(", "))
            }
            other => crate::literal::render_value(other),
        }
    }

    fn determinism(&self) -> Determinism {
        self.fields
            .values()
            .fold(Determinism::Deterministic, |acc, child| acc.and(child.determinism()))
    }
}
