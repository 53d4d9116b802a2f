use serde_json::Value;

use super::{Candidates, ValueResolver};
use crate::combine::Proposition;

/// Cycles through the declared names of an enum.
///
/// - scalar argument: each name once, in declaration order
/// - list argument: each name as a one-element list, then all names together
/// - nullable argument: a trailing `null`
#[derive(Debug, Clone)]
pub struct EnumResolver {
    names: Vec<String>,
    is_list: bool,
    is_non_null: bool,
}

impl EnumResolver {
    pub fn new(names: Vec<String>, is_list: bool, is_non_null: bool) -> Self {
        Self { names, is_list, is_non_null }
    }
}

impl ValueResolver for EnumResolver {
    fn candidates<'a>(&'a self, _context: &'a Proposition) -> Candidates<'a> {
        let names = self.names.iter().map(|n| Value::from(n.as_str()));

        let values: Candidates<'a> = if self.is_list {
            let singles = names.map(|v| Value::Array(vec![v]));
            let all = (self.names.len() > 1)
                .then(|| Value::Array(self.names.iter().map(|n| Value::from(n.as_str())).collect()));
            Box::new(singles.chain(all))
        } else {
            Box::new(names)
        };

        let null = (!self.is_non_null).then_some(Value::Null);
        Box::new(values.chain(null))
    }

    fn render(&self, value: &Value) -> String {
        crate::literal::render_enum(value)
    }
}
