//! Default generators for named scalars and the registry that maps scalar
//! names to generators.
use std::sync::Arc;

use chrono::{Duration, Local};
use indexmap::IndexMap;
use rand::Rng;
use serde_json::Value;

use super::{Candidates, Determinism, SharedResolver, ValueResolver};
use crate::combine::Proposition;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, Default)]
pub struct StringGenerator;

impl ValueResolver for StringGenerator {
    fn candidates<'a>(&'a self, _context: &'a Proposition) -> Candidates<'a> {
        Box::new(std::iter::once(Value::from("1111a")))
    }
}

/// Yesterday and the day before, at the current wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTimeGenerator;

impl ValueResolver for DateTimeGenerator {
    fn candidates<'a>(&'a self, _context: &'a Proposition) -> Candidates<'a> {
        let now = Local::now();
        Box::new((1..=2).map(move |days| {
            let at = now - Duration::days(days);
            Value::from(at.format(DATETIME_FORMAT).to_string())
        }))
    }

    fn determinism(&self) -> Determinism {
        Determinism::Randomized
    }
}

/// One random integer in `1..=10`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntGenerator;

impl ValueResolver for IntGenerator {
    fn candidates<'a>(&'a self, _context: &'a Proposition) -> Candidates<'a> {
        let n = rand::thread_rng().gen_range(1..=10);
        Box::new(std::iter::once(Value::from(n)))
    }

    fn determinism(&self) -> Determinism {
        Determinism::Randomized
    }
}

/// One random boolean.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanGenerator;

impl ValueResolver for BooleanGenerator {
    fn candidates<'a>(&'a self, _context: &'a Proposition) -> Candidates<'a> {
        let b = rand::thread_rng().gen_bool(0.5);
        Box::new(std::iter::once(Value::from(b)))
    }

    fn determinism(&self) -> Determinism {
        Determinism::Randomized
    }
}

// ————————————————————————————————————————————————————————————————————————————
// REGISTRY
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct ScalarRegistry {
    generators: IndexMap<String, SharedResolver>,
}

impl Default for ScalarRegistry {
    fn default() -> Self {
        let mut generators: IndexMap<String, SharedResolver> = IndexMap::new();
        generators.insert("String".into(), Arc::new(StringGenerator));
        generators.insert("DateTime".into(), Arc::new(DateTimeGenerator));
        generators.insert("Boolean".into(), Arc::new(BooleanGenerator));
        generators.insert("Int".into(), Arc::new(IntGenerator));
        Self { generators }
    }
}

impl ScalarRegistry {
    /// Registers `generator` for `name`, replacing any built-in of that name.
    pub fn register(&mut self, name: impl Into<String>, generator: SharedResolver) {
        self.generators.insert(name.into(), generator);
    }

    /// Makes `alias` share the generator already registered as `target`.
    /// Returns `false` when `target` is unknown.
    pub fn alias(&mut self, alias: impl Into<String>, target: &str) -> bool {
        match self.generators.get(target).cloned() {
            Some(generator) => {
                self.generators.insert(alias.into(), generator);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&SharedResolver> {
        self.generators.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(resolver: &dyn ValueResolver) -> Vec<Value> {
        resolver.candidates(&Proposition::default()).collect()
    }

    #[test]
    fn defaults_cover_the_four_builtins() {
        let reg = ScalarRegistry::default();
        assert_eq!(reg.names().collect::<Vec<_>>(), ["String", "DateTime", "Boolean", "Int"]);
    }

    #[test]
    fn default_sequences() {
        assert_eq!(collect(&StringGenerator), vec![Value::from("1111a")]);

        let ints = collect(&IntGenerator);
        assert_eq!(ints.len(), 1);
        assert!((1..=10).contains(&ints[0].as_i64().unwrap()));

        assert!(collect(&BooleanGenerator)[0].is_boolean());

        let dates = collect(&DateTimeGenerator);
        assert_eq!(dates.len(), 2);
        assert!(dates[0].as_str().unwrap() > dates[1].as_str().unwrap());
        assert_eq!(DateTimeGenerator.render(&dates[0]).chars().next(), Some('"'));
    }

    #[test]
    fn register_replaces_and_alias_shares() {
        let mut reg = ScalarRegistry::default();
        reg.register("Int", Arc::new(StringGenerator));
        let value = reg.get("Int").unwrap().candidates(&Proposition::default()).next();
        assert_eq!(value, Some(Value::from("1111a")));

        assert!(reg.alias("ID", "String"));
        assert!(reg.get("ID").is_some());
        assert!(!reg.alias("Uuid", "Nope"));
        assert!(reg.get("Uuid").is_none());
    }
}
