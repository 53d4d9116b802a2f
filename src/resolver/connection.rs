//! Resolvers for relay-style pagination arguments (`first` / `last`).
use rand::Rng;
use serde_json::Value;

use super::{Candidates, Determinism, ValueResolver};
use crate::combine::Proposition;

/// `null`, then a random page size in `1..=5`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionFirst;

impl ValueResolver for ConnectionFirst {
    fn candidates<'a>(&'a self, _context: &'a Proposition) -> Candidates<'a> {
        let size = rand::thread_rng().gen_range(1..=5);
        Box::new([Value::Null, Value::from(size)].into_iter())
    }

    fn determinism(&self) -> Determinism {
        Determinism::Randomized
    }
}

/// Pairs with [`ConnectionFirst`] bound immediately before it: when `first`
/// was left null, a random page size is tried before `null`. Otherwise only
/// `null`, so a query never asks for both ends at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionLast;

impl ValueResolver for ConnectionLast {
    fn candidates<'a>(&'a self, context: &'a Proposition) -> Candidates<'a> {
        let first_was_null = matches!(
            context.last_bound(),
            Some((_, argument, Value::Null)) if argument.ends_with("first")
        );
        if first_was_null {
            let size = rand::thread_rng().gen_range(1..=5);
            Box::new([Value::from(size), Value::Null].into_iter())
        } else {
            Box::new(std::iter::once(Value::Null))
        }
    }

    fn determinism(&self) -> Determinism {
        Determinism::Randomized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_offers_null_then_a_size() {
        let values: Vec<_> = ConnectionFirst.candidates(&Proposition::default()).collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].is_null());
        assert!((1..=5).contains(&values[1].as_i64().unwrap()));
    }

    #[test]
    fn last_depends_on_first() {
        let mut after_null = Proposition::default();
        after_null.set_value("posts", "first", Value::Null);
        let values: Vec<_> = ConnectionLast.candidates(&after_null).collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].is_i64());
        assert!(values[1].is_null());

        let mut after_size = Proposition::default();
        after_size.set_value("posts", "first", Value::from(3));
        let values: Vec<_> = ConnectionLast.candidates(&after_size).collect();
        assert_eq!(values, vec![Value::Null]);

        let values: Vec<_> = ConnectionLast.candidates(&Proposition::default()).collect();
        assert_eq!(values, vec![Value::Null]);
    }
}
