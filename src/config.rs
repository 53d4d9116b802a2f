//! Generation settings and the caller-supplied override table.
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::registry::DescendantScan;
use crate::resolver::SharedResolver;

pub const DEFAULT_MAX_DEPTH: usize = 6;

const VALUES_KEY: &str = "$values";
const RESOLVER_KEY: &str = "$resolver";

// ————————————————————————————————————————————————————————————————————————————
// OVERRIDES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub enum Override {
    /// Candidates used verbatim, in order.
    Values(Vec<Value>),
    Resolver(SharedResolver),
}

#[derive(Debug, Clone)]
pub enum OverrideNode {
    Table(IndexMap<String, OverrideNode>),
    Leaf(Override),
}

/// Nested table keyed by field path segments, then argument name, then (for
/// input objects) input field names.
///
/// From JSON, any non-object value is a leaf: an array lists candidates and
/// anything else is a single candidate. `{"$values": [..]}` lists candidates
/// explicitly (needed for object literals) and `{"$resolver": "name"}` names a
/// built-in resolver.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    root: IndexMap<String, OverrideNode>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Set the override at a dotted key such as `"user.posts.first"`.
    pub fn with(mut self, dotted_key: &str, value: Override) -> Self {
        let key = dotted_key.split('.').collect::<Vec<_>>();
        self.insert(&key, value);
        self
    }

    pub fn insert(&mut self, key: &[&str], value: Override) {
        let Some((last, parents)) = key.split_last() else { return };
        let mut table = &mut self.root;
        for segment in parents {
            let node = table
                .entry(segment.to_string())
                .or_insert_with(|| OverrideNode::Table(IndexMap::new()));
            // a deeper key replaces a leaf set earlier at this segment
            if matches!(node, OverrideNode::Leaf(_)) {
                *node = OverrideNode::Table(IndexMap::new());
            }
            let OverrideNode::Table(inner) = node else { return };
            table = inner;
        }
        table.insert(last.to_string(), OverrideNode::Leaf(value));
    }

    pub fn get<S: AsRef<str>>(&self, key: &[S]) -> Option<&OverrideNode> {
        let (first, rest) = key.split_first()?;
        let mut node = self.root.get(first.as_ref())?;
        for segment in rest {
            node = match node {
                OverrideNode::Table(table) => table.get(segment.as_ref())?,
                OverrideNode::Leaf(_) => return None,
            };
        }
        Some(node)
    }

    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(map) = value else {
            return Err(Error::InvalidOverride { key: String::new(), reason: "expected a JSON object".into() });
        };
        let mut root = IndexMap::with_capacity(map.len());
        for (name, child) in map {
            root.insert(name.clone(), parse_node(name, child)?);
        }
        Ok(Self { root })
    }
}

fn parse_node(key: &str, value: &Value) -> Result<OverrideNode> {
    let invalid = |reason: &str| Error::InvalidOverride { key: key.to_string(), reason: reason.to_string() };

    match value {
        Value::Array(items) => Ok(OverrideNode::Leaf(Override::Values(items.clone()))),
        Value::Object(map) if map.contains_key(VALUES_KEY) || map.contains_key(RESOLVER_KEY) => {
            if map.len() != 1 {
                return Err(invalid("`$values` / `$resolver` must be the only key"));
            }
            if let Some(values) = map.get(VALUES_KEY) {
                let Value::Array(items) = values else { return Err(invalid("`$values` must be an array")) };
                return Ok(OverrideNode::Leaf(Override::Values(items.clone())));
            }
            let name = map.get(RESOLVER_KEY).and_then(Value::as_str).ok_or_else(|| invalid("`$resolver` must be a string"))?;
            let resolver = crate::resolver::builtin(name).ok_or_else(|| invalid(&format!("unknown resolver `{name}`")))?;
            Ok(OverrideNode::Leaf(Override::Resolver(resolver)))
        }
        Value::Object(map) => {
            let mut table = IndexMap::with_capacity(map.len());
            for (name, child) in map {
                table.insert(name.clone(), parse_node(&format!("{key}.{name}"), child)?);
            }
            Ok(OverrideNode::Table(table))
        }
        scalar => Ok(OverrideNode::Leaf(Override::Values(vec![scalar.clone()]))),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// GENERATION CONFIG
// ————————————————————————————————————————————————————————————————————————————

/// Immutable settings for one `prepare_paths` run.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    /// Maximum number of fields on a generated path (also bounds selections).
    pub max_depth: usize,
    pub descendant_scan: DescendantScan,
    pub overrides: Overrides,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH, descendant_scan: DescendantScan::default(), overrides: Overrides::default() }
    }
}

impl GenerationConfig {
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_descendant_scan(mut self, scan: DescendantScan) -> Self {
        self.descendant_scan = scan;
        self
    }
}

/// On-disk form of the configuration (`--config file.json`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub descendant_scan: Option<DescendantScan>,
    /// Extra scalar name → already-registered scalar it should reuse.
    #[serde(default)]
    pub scalars: IndexMap<String, String>,
    #[serde(default)]
    pub overrides: Option<Value>,
}

impl ConfigFile {
    pub fn generation_config(&self) -> Result<GenerationConfig> {
        let mut config = GenerationConfig::default();
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if let Some(scan) = self.descendant_scan {
            config = config.with_descendant_scan(scan);
        }
        if let Some(overrides) = &self.overrides {
            config = config.with_overrides(Overrides::from_json(overrides)?);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(node: Option<&OverrideNode>) -> Vec<Value> {
        match node {
            Some(OverrideNode::Leaf(Override::Values(v))) => v.clone(),
            other => panic!("expected values leaf, got {other:?}"),
        }
    }

    #[test]
    fn json_leaves() {
        let o = Overrides::from_json(&json!({
            "user": {
                "id": [7, 8],
                "name": "ada",
                "filter": { "$values": [{ "a": 1 }] },
                "posts": { "first": { "$resolver": "connection.first" } }
            }
        }))
        .unwrap();

        assert_eq!(values(o.get(&["user", "id"])), vec![json!(7), json!(8)]);
        assert_eq!(values(o.get(&["user", "name"])), vec![json!("ada")]);
        assert_eq!(values(o.get(&["user", "filter"])), vec![json!({ "a": 1 })]);
        assert!(matches!(o.get(&["user", "posts", "first"]), Some(OverrideNode::Leaf(Override::Resolver(_)))));
        assert!(matches!(o.get(&["user"]), Some(OverrideNode::Table(_))));
        assert!(o.get(&["user", "id", "deeper"]).is_none());
        assert!(o.get(&["nope"]).is_none());
    }

    #[test]
    fn invalid_json_overrides_name_the_key() {
        let err = Overrides::from_json(&json!({ "a": { "b": { "$resolver": "nope" } } })).unwrap_err();
        assert!(matches!(&err, Error::InvalidOverride { key, .. } if key == "a.b"), "{err}");

        let err = Overrides::from_json(&json!({ "a": { "$values": 1 } })).unwrap_err();
        assert!(matches!(err, Error::InvalidOverride { .. }));

        assert!(Overrides::from_json(&json!([1])).is_err());
    }

    #[test]
    fn programmatic_insert_replaces_leaves_with_tables() {
        let o = Overrides::new()
            .with("user.filter", Override::Values(vec![json!(null)]))
            .with("user.filter.name", Override::Values(vec![json!("x")]));
        assert_eq!(values(o.get(&["user", "filter", "name"])), vec![json!("x")]);
    }

    #[test]
    fn insert_through_a_leaf_keeps_siblings() {
        let o = Overrides::new()
            .with("user.id", Override::Values(vec![json!(1)]))
            .with("user.filter", Override::Values(vec![json!(null)]))
            .with("user.filter.name.first", Override::Values(vec![json!("x")]));
        assert_eq!(values(o.get(&["user", "id"])), vec![json!(1)]);
        assert_eq!(values(o.get(&["user", "filter", "name", "first"])), vec![json!("x")]);
        assert!(matches!(o.get(&["user", "filter"]), Some(OverrideNode::Table(_))));
    }

    #[test]
    fn config_file_builds_generation_config() {
        let file: ConfigFile = serde_json::from_value(json!({
            "max_depth": 3,
            "descendant_scan": "first_field_only",
            "scalars": { "ID": "String" },
            "overrides": { "user": { "id": 1 } }
        }))
        .unwrap();
        let config = file.generation_config().unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.descendant_scan, DescendantScan::FirstFieldOnly);
        assert!(!config.overrides.is_empty());
        assert_eq!(file.scalars["ID"], "String");
    }

    #[test]
    fn config_file_rejects_unknown_keys() {
        assert!(serde_json::from_value::<ConfigFile>(json!({ "depth": 3 })).is_err());
    }
}
