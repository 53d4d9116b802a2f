//! Name-keyed table of every type in the introspected schema.
use std::collections::HashSet;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::introspection::RawSchema;
use crate::types::TypeDefinition;

pub const DEFAULT_QUERY_ROOT: &str = "Query";

/// How "does anything below this type take arguments?" is answered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DescendantScan {
    /// Every field of every reachable type is inspected.
    #[default]
    Full,
    /// Only the first field of each type is inspected, following its type
    /// downwards. Reproduces the output of older tooling.
    FirstFieldOnly,
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, Arc<TypeDefinition>>,
    query_root: String,
    skipped: Vec<String>,
}

impl TypeRegistry {
    /// Build the whole table at once. Types whose type references cannot be
    /// unwrapped are left out and reported by [`TypeRegistry::skipped`].
    pub fn from_raw(schema: &RawSchema) -> Self {
        let mut types = IndexMap::with_capacity(schema.types.len());
        let mut skipped = Vec::new();

        for raw in &schema.types {
            if types.contains_key(&raw.name) {
                warn!(type_name = %raw.name, "duplicate type record, keeping the first");
                continue;
            }
            match TypeDefinition::from_raw(raw) {
                Ok(def) => {
                    types.insert(raw.name.clone(), Arc::new(def));
                }
                Err(error) => {
                    warn!(type_name = %raw.name, %error, "skipping type");
                    skipped.push(raw.name.clone());
                }
            }
        }

        let query_root = schema
            .query_type
            .as_ref()
            .map(|q| q.name.clone())
            .unwrap_or_else(|| DEFAULT_QUERY_ROOT.to_string());

        debug!(types = types.len(), skipped = skipped.len(), %query_root, "type registry built");
        Self { types, query_root, skipped }
    }

    pub fn lookup(&self, name: &str) -> Result<&Arc<TypeDefinition>> {
        self.types.get(name).ok_or_else(|| Error::TypeNotFound { name: name.to_string() })
    }

    pub fn query_root(&self) -> Result<&Arc<TypeDefinition>> {
        self.lookup(&self.query_root)
    }

    pub fn query_root_name(&self) -> &str {
        &self.query_root
    }

    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Whether any field reachable below `type_name` takes arguments.
    ///
    /// Leaf-typed fields are never looked up, so documents that omit built-in
    /// scalars still scan cleanly.
    pub fn has_argumented_descendant(&self, type_name: &str, scan: DescendantScan) -> Result<bool> {
        let mut visited = HashSet::new();
        self.scan_descendants(type_name, scan, &mut visited)
    }

    fn scan_descendants(&self, type_name: &str, scan: DescendantScan, visited: &mut HashSet<String>) -> Result<bool> {
        // already scanned, or on the current chain: its fields are covered there
        if !visited.insert(type_name.to_string()) {
            return Ok(false);
        }
        let ty = self.lookup(type_name)?;

        match scan {
            DescendantScan::Full => {
                for field in ty.fields.values() {
                    if field.is_argumented() {
                        return Ok(true);
                    }
                    if !field.ty.kind.is_leaf() && self.scan_descendants(&field.ty.name, scan, visited)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            DescendantScan::FirstFieldOnly => match ty.fields.values().next() {
                None => Ok(false),
                Some(field) if field.is_argumented() => Ok(true),
                Some(field) if field.ty.kind.is_leaf() => Ok(false),
                Some(field) => self.scan_descendants(&field.ty.name, scan, visited),
            },
        }
    }
}
