//! Query paths: minimal root-to-leaf field chains that together reach every
//! argumented field under the query root.
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::registry::TypeRegistry;
use crate::types::{ArgumentDefinition, FieldDefinition, TypeKind};

const TYPENAME: &str = "__typename";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Argument-free sub-selection rendered under the terminal field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub name: String,
    pub children: Vec<Selection>,
}

impl Selection {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self { name: name.into(), children: Vec::new() }
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.name);
        if !self.children.is_empty() {
            out.push('{');
            render_selection(&self.children, out);
            out.push('}');
        }
    }
}

fn render_selection(items: &[Selection], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        item.render_into(out);
    }
}

#[derive(Debug, Clone, Default)]
pub struct QueryPath {
    fields: Vec<Arc<FieldDefinition>>,
    selection: Vec<Selection>,
}

impl QueryPath {
    pub fn fields(&self) -> &[Arc<FieldDefinition>] {
        &self.fields
    }

    pub fn selection(&self) -> &[Selection] {
        &self.selection
    }

    pub fn depth(&self) -> usize {
        self.fields.len()
    }

    pub fn root_field(&self) -> Option<&str> {
        self.fields.first().map(|f| f.name.as_str())
    }

    /// Field names from the root through `fields()[depth]`.
    pub fn names_through(&self, depth: usize) -> Vec<String> {
        self.fields.iter().take(depth + 1).map(|f| f.name.clone()).collect()
    }

    /// Dotted names of the whole path.
    pub fn key(&self) -> String {
        self.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>().join(".")
    }

    /// Arguments declared along the path with their dotted path key, not yet
    /// bound to resolvers.
    pub fn variables(&self) -> impl Iterator<Item = (String, &ArgumentDefinition)> {
        self.fields.iter().enumerate().flat_map(move |(depth, field)| {
            let path_key = self.names_through(depth).join(".");
            field.args.values().map(move |arg| (path_key.clone(), arg))
        })
    }

    /// `a{b{c}}` nesting of the path; the terminal selection goes inside the
    /// last field.
    pub fn render(&self) -> String {
        self.render_with_arguments(|_, _| None)
    }

    /// Like [`QueryPath::render`], with `arguments(depth, field)` supplying
    /// the text between parentheses for a field, if any.
    pub fn render_with_arguments(&self, mut arguments: impl FnMut(usize, &FieldDefinition) -> Option<String>) -> String {
        let mut out = String::new();
        for (depth, field) in self.fields.iter().enumerate() {
            out.push_str(&field.name);
            if let Some(args) = arguments(depth, field) {
                out.push('(');
                out.push_str(&args);
                out.push(')');
            }
            if depth + 1 < self.fields.len() {
                out.push('{');
            }
        }
        if !self.selection.is_empty() {
            out.push('{');
            render_selection(&self.selection, &mut out);
            out.push('}');
        }
        for _ in 1..self.fields.len() {
            out.push('}');
        }
        out
    }

    fn extended(&self, field: Arc<FieldDefinition>) -> Self {
        let mut fields = self.fields.clone();
        fields.push(field);
        Self { fields, selection: Vec::new() }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDER
// ————————————————————————————————————————————————————————————————————————————

/// Paths built from one root field.
#[derive(Debug, Default)]
pub struct BuiltPaths {
    pub paths: Vec<QueryPath>,
    pub failures: Vec<BranchFailure>,
}

/// A branch left out of [`BuiltPaths`].
#[derive(Debug)]
pub struct BranchFailure {
    /// Dotted field path of the dropped branch.
    pub key: String,
    pub error: Error,
}

pub struct PathBuilder<'a> {
    registry: &'a TypeRegistry,
    config: &'a GenerationConfig,
}

impl<'a> PathBuilder<'a> {
    pub fn new(registry: &'a TypeRegistry, config: &'a GenerationConfig) -> Self {
        Self { registry, config }
    }

    /// All paths starting at one root field, deeper paths first. A branch
    /// that cannot be built is dropped and reported; its siblings are kept.
    pub fn build(&self, root_field: &Arc<FieldDefinition>) -> BuiltPaths {
        let mut failures = Vec::new();
        let paths = self.descend(&QueryPath::default(), root_field, &mut failures);
        BuiltPaths { paths, failures }
    }

    fn descend(&self, prefix: &QueryPath, field: &Arc<FieldDefinition>, failures: &mut Vec<BranchFailure>) -> Vec<QueryPath> {
        let mut current = prefix.extended(field.clone());
        if field.ty.kind.is_leaf() {
            return vec![current];
        }

        let ty = match self.registry.lookup(&field.ty.name) {
            Ok(ty) => ty,
            Err(error) => {
                failures.push(BranchFailure { key: current.key(), error });
                return Vec::new();
            }
        };
        if ty.kind == TypeKind::Union {
            current.selection = vec![Selection::leaf(TYPENAME)];
            return vec![current];
        }

        let can_descend = current.depth() < self.config.max_depth;
        let mut branch = self.branch_types(&current);
        let mut paths = Vec::new();
        let mut selection = Vec::new();

        for child in ty.fields.values() {
            let child_key = || format!("{}.{}", current.key(), child.name);
            let needs_own_path = if child.is_argumented() {
                true
            } else if child.ty.kind.is_leaf() {
                false
            } else {
                match self.registry.has_argumented_descendant(&child.ty.name, self.config.descendant_scan) {
                    Ok(found) => found,
                    Err(error) => {
                        failures.push(BranchFailure { key: child_key(), error });
                        continue;
                    }
                }
            };

            if !needs_own_path {
                match self.select(child, &mut branch, current.depth()) {
                    Ok(Some(item)) => selection.push(item),
                    Ok(None) => {}
                    Err(error) => failures.push(BranchFailure { key: child_key(), error }),
                }
            } else if can_descend {
                paths.extend(self.descend(&current, child, failures));
            } else {
                debug!(path = %current.key(), field = %child.name, max_depth = self.config.max_depth, "depth limit reached, not descending");
            }
        }

        if !selection.is_empty() {
            current.selection = selection;
            paths.push(current);
        } else if paths.is_empty() {
            // nothing below is reachable, but the arguments along `current` still need a query
            current.selection = vec![Selection::leaf(TYPENAME)];
            paths.push(current);
        }
        paths
    }

    /// Selection for an argument-free field, or `None` when nothing below it
    /// can be selected (cycle, depth limit, or only argumented fields).
    fn select(&self, field: &FieldDefinition, branch: &mut Vec<String>, depth: usize) -> Result<Option<Selection>> {
        if field.ty.kind.is_leaf() {
            return Ok(Some(Selection::leaf(&field.name)));
        }
        if depth >= self.config.max_depth || branch.contains(&field.ty.name) {
            return Ok(None);
        }

        let ty = self.registry.lookup(&field.ty.name)?;
        if ty.kind == TypeKind::Union {
            return Ok(Some(Selection { name: field.name.clone(), children: vec![Selection::leaf(TYPENAME)] }));
        }

        branch.push(ty.name.clone());
        let mut children = Vec::new();
        for child in ty.fields.values().filter(|f| !f.is_argumented()) {
            if let Some(item) = self.select(child, branch, depth + 1)? {
                children.push(item);
            }
        }
        branch.pop();

        Ok((!children.is_empty()).then(|| Selection { name: field.name.clone(), children }))
    }

    fn branch_types(&self, path: &QueryPath) -> Vec<String> {
        std::iter::once(self.registry.query_root_name().to_string())
            .chain(path.fields.iter().map(|f| f.ty.name.clone()))
            .collect()
    }
}
