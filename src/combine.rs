//! Cartesian expansion of bound argument resolvers into propositions.
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::binder::VariableBinding;

// ————————————————————————————————————————————————————————————————————————————
// PROPOSITION
// ————————————————————————————————————————————————————————————————————————————

/// One concrete assignment of values to the arguments of a query path.
///
/// Values are grouped by path key (`"user.posts"`) then argument name. The
/// position cursor is the index of the next binding to fill during expansion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Proposition {
    values: IndexMap<String, IndexMap<String, Value>>,
    position: usize,
}

impl Proposition {
    pub fn set_value(&mut self, path_key: &str, argument: &str, value: Value) {
        self.values
            .entry(path_key.to_string())
            .or_default()
            .insert(argument.to_string(), value);
    }

    pub fn get(&self, path_key: &str, argument: &str) -> Option<&Value> {
        self.values.get(path_key).and_then(|args| args.get(argument))
    }

    /// Flat lookup by `"path.argument"` key.
    pub fn get_flat(&self, key: &str) -> Option<&Value> {
        let (path_key, argument) = key.rsplit_once('.')?;
        self.get(path_key, argument)
    }

    /// The most recently bound `(path_key, argument, value)`.
    pub fn last_bound(&self) -> Option<(&str, &str, &Value)> {
        let (path_key, args) = self.values.last()?;
        let (argument, value) = args.last()?;
        Some((path_key.as_str(), argument.as_str(), value))
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bound arguments.
    pub fn len(&self) -> usize {
        self.values.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &Value)> {
        self.values.iter().flat_map(|(path_key, args)| {
            args.iter().map(move |(argument, value)| (path_key.as_str(), argument.as_str(), value))
        })
    }

    pub fn flatten(&self) -> IndexMap<String, Value> {
        self.iter()
            .map(|(path_key, argument, value)| (format!("{path_key}.{argument}"), value.clone()))
            .collect()
    }
}

impl Serialize for Proposition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.flatten().serialize(serializer)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// EXPANSION
// ————————————————————————————————————————————————————————————————————————————

/// Every combination of one candidate per binding, leftmost binding varying
/// slowest. Each resolver sees the proposition built so far as context.
///
/// The output size is the product of the candidate counts: an empty candidate
/// sequence anywhere yields no propositions at all, and there is no cap.
pub fn expand(bindings: &[VariableBinding]) -> Vec<Proposition> {
    let mut out = Vec::new();
    if !bindings.is_empty() {
        expand_from(bindings, Proposition::default(), &mut out);
    }
    out
}

fn expand_from(bindings: &[VariableBinding], proposition: Proposition, out: &mut Vec<Proposition>) {
    let binding = &bindings[proposition.position];
    for value in binding.resolver.candidates(&proposition) {
        let mut next = proposition.clone();
        next.set_value(&binding.path_key, &binding.argument.name, value);
        if next.position + 1 < bindings.len() {
            next.position += 1;
            expand_from(bindings, next, out);
        } else {
            out.push(next);
        }
    }
}

/// Plain cartesian product of value columns, leftmost column varying slowest.
pub fn cartesian(columns: &[Vec<Value>]) -> Vec<Vec<Value>> {
    let mut rows = vec![Vec::with_capacity(columns.len())];
    for column in columns {
        rows = rows
            .into_iter()
            .flat_map(|row| {
                column.iter().map(move |value| {
                    let mut row = row.clone();
                    row.push(value.clone());
                    row
                })
            })
            .collect();
    }
    rows
}
