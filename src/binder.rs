//! Attaches a value resolver to every argument on a query path.
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::trace;

use crate::config::{Override, OverrideNode, Overrides};
use crate::error::{Error, Result};
use crate::path::QueryPath;
use crate::registry::TypeRegistry;
use crate::resolver::{EnumResolver, InputObjectResolver, LiteralResolver, ScalarRegistry, SharedResolver};
use crate::types::{ArgumentDefinition, TypeDescriptor, TypeKind};

/// One argument of one node on a path, with the resolver bound to it.
#[derive(Debug, Clone)]
pub struct VariableBinding {
    /// Dotted field path up to the argumented node, e.g. `"user.posts"`.
    pub path_key: String,
    pub argument: ArgumentDefinition,
    pub resolver: SharedResolver,
}

impl VariableBinding {
    /// `"path.argument"`, the key used in flattened propositions.
    pub fn key(&self) -> String {
        format!("{}.{}", self.path_key, self.argument.name)
    }
}

pub struct Binder<'a> {
    registry: &'a TypeRegistry,
    scalars: &'a ScalarRegistry,
    overrides: &'a Overrides,
}

impl<'a> Binder<'a> {
    pub fn new(registry: &'a TypeRegistry, scalars: &'a ScalarRegistry, overrides: &'a Overrides) -> Self {
        Self { registry, scalars, overrides }
    }

    /// Bindings for every argument of every argumented node, root first.
    pub fn bind_path(&self, path: &QueryPath) -> Result<Vec<VariableBinding>> {
        let mut bindings = Vec::new();
        for (depth, field) in path.fields().iter().enumerate() {
            if !field.is_argumented() {
                continue;
            }
            let segments = path.names_through(depth);
            let path_key = segments.join(".");
            for argument in field.args.values() {
                let resolver = self.bind(&segments, argument)?;
                bindings.push(VariableBinding { path_key: path_key.clone(), argument: argument.clone(), resolver });
            }
        }
        Ok(bindings)
    }

    /// Resolver for `argument` of the field reached by `path` (field names).
    /// Overrides win; otherwise one is synthesized from the argument's type.
    pub fn bind(&self, path: &[String], argument: &ArgumentDefinition) -> Result<SharedResolver> {
        let mut key = path.to_vec();
        key.push(argument.name.clone());
        self.resolve(&key, &argument.ty, &mut Vec::new())
    }

    fn resolve(&self, key: &[String], ty: &TypeDescriptor, input_chain: &mut Vec<String>) -> Result<SharedResolver> {
        let dotted = || key.join(".");

        match self.overrides.get(key) {
            Some(OverrideNode::Leaf(Override::Resolver(resolver))) => {
                trace!(key = %dotted(), "using override resolver");
                return Ok(resolver.clone());
            }
            Some(OverrideNode::Leaf(Override::Values(values))) => {
                trace!(key = %dotted(), count = values.len(), "using override values");
                let literal = LiteralResolver::new(values.clone());
                let literal = if ty.kind == TypeKind::Enum { literal.with_bare_strings() } else { literal };
                return Ok(Arc::new(literal));
            }
            // a table only makes sense as per-input-field overrides
            Some(OverrideNode::Table(_)) if ty.kind != TypeKind::InputObject => {
                return Err(Error::MissingResolver { key: dotted() });
            }
            _ => {}
        }

        match ty.kind {
            TypeKind::Scalar => self
                .scalars
                .get(&ty.name)
                .cloned()
                .ok_or_else(|| Error::UnknownScalar { key: dotted(), scalar: ty.name.clone() }),
            TypeKind::Enum => {
                let def = self.registry.lookup(&ty.name)?;
                let names = def.enum_values.keys().cloned().collect();
                Ok(Arc::new(EnumResolver::new(names, ty.is_list, ty.is_non_null)))
            }
            TypeKind::InputObject => self.resolve_input_object(key, ty, input_chain),
            kind => Err(Error::UnsupportedArgumentKind { key: dotted(), kind }),
        }
    }

    fn resolve_input_object(
        &self,
        key: &[String],
        ty: &TypeDescriptor,
        input_chain: &mut Vec<String>,
    ) -> Result<SharedResolver> {
        if input_chain.contains(&ty.name) {
            // recursive input type: stop with the smallest legal value
            return match (ty.is_list, ty.is_non_null) {
                (true, _) => Ok(Arc::new(LiteralResolver::new(vec![Value::Array(Vec::new())]))),
                (false, false) => Ok(Arc::new(LiteralResolver::new(vec![Value::Null]))),
                (false, true) => Err(Error::MissingResolver { key: key.join(".") }),
            };
        }

        let def = self.registry.lookup(&ty.name)?;
        input_chain.push(def.name.clone());

        let mut fields = IndexMap::with_capacity(def.input_fields.len());
        for (name, input_field) in &def.input_fields {
            let mut child_key = key.to_vec();
            child_key.push(name.clone());
            let child = self.resolve(&child_key, &input_field.ty, input_chain);
            match child {
                Ok(resolver) => {
                    fields.insert(name.clone(), resolver);
                }
                Err(error) => {
                    input_chain.pop();
                    return Err(error);
                }
            }
        }

        input_chain.pop();
        Ok(Arc::new(InputObjectResolver::new(def.name.clone(), fields)))
    }
}
