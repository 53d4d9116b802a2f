//! The orchestrator: owns the type registry and the scalar generators, and
//! drives path building, binding and expansion.
use std::str::FromStr;

use tracing::{info, warn};

use crate::binder::{Binder, VariableBinding};
use crate::combine::{self, Proposition};
use crate::config::GenerationConfig;
use crate::error::{Error, Result};
use crate::introspection::{self, INTROSPECTION_QUERY, RawSchema, Transport, TransportResponse};
use crate::path::{PathBuilder, QueryPath};
use crate::registry::TypeRegistry;
use crate::resolver::{Determinism, ScalarRegistry, SharedResolver};

#[derive(Debug, Clone)]
pub struct Schema {
    registry: TypeRegistry,
    scalars: ScalarRegistry,
}

/// A query path with a resolver bound to each of its arguments.
#[derive(Debug, Clone)]
pub struct PreparedQuery {
    path: QueryPath,
    bindings: Vec<VariableBinding>,
}

/// A root field or path that could not be prepared.
#[derive(Debug)]
pub struct PathFailure {
    pub root_field: String,
    /// Dotted path being processed when the failure happened.
    pub key: String,
    pub error: Error,
}

#[derive(Debug, Default)]
pub struct PreparedQueries {
    pub queries: Vec<PreparedQuery>,
    pub failures: Vec<PathFailure>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expansion {
    /// The path takes no arguments; the query runs as-is.
    Static,
    Propositions(Vec<Proposition>),
}

// ————————————————————————————————————————————————————————————————————————————
// SCHEMA
// ————————————————————————————————————————————————————————————————————————————

impl Schema {
    /// Build from a transport response. A non-success status aborts.
    pub fn build(response: TransportResponse) -> Result<Self> {
        if !response.is_success() {
            warn!(status = response.status, "introspection request failed");
            return Err(Error::IntrospectionFetch { status: response.status });
        }
        response.body.parse()
    }

    /// Send [`INTROSPECTION_QUERY`] through `transport` and build from the response.
    pub fn fetch<T: Transport + ?Sized>(transport: &T) -> Result<Self> {
        let response = transport.execute(INTROSPECTION_QUERY).map_err(Error::Transport)?;
        Self::build(response)
    }

    /// Build from an already-parsed introspection document.
    pub fn from_value(document: serde_json::Value) -> Result<Self> {
        Self::from_raw(&introspection::decode_value(document)?)
    }

    pub fn from_raw(raw: &RawSchema) -> Result<Self> {
        let registry = TypeRegistry::from_raw(raw);
        registry.query_root()?;
        Ok(Self { registry, scalars: ScalarRegistry::default() })
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn scalars(&self) -> &ScalarRegistry {
        &self.scalars
    }

    /// Register a generator for a named scalar, replacing a built-in of the
    /// same name.
    pub fn register_scalar(&mut self, name: impl Into<String>, generator: SharedResolver) {
        self.scalars.register(name, generator);
    }

    /// Reuse the generator of `target` for scalar `alias`.
    pub fn alias_scalar(&mut self, alias: impl Into<String>, target: &str) -> bool {
        self.scalars.alias(alias, target)
    }

    /// Build the paths of every root field and bind their arguments. A failing
    /// branch or path is recorded and skipped.
    pub fn prepare_paths(&self, config: &GenerationConfig) -> PreparedQueries {
        let mut prepared = PreparedQueries::default();
        let root = match self.registry.query_root() {
            Ok(root) => root,
            Err(error) => {
                let name = self.registry.query_root_name().to_string();
                prepared.failures.push(PathFailure { root_field: name.clone(), key: name, error });
                return prepared;
            }
        };

        let builder = PathBuilder::new(&self.registry, config);
        let binder = Binder::new(&self.registry, &self.scalars, &config.overrides);

        for field in root.fields.values() {
            let built = builder.build(field);
            for failure in built.failures {
                warn!(branch = %failure.key, error = %failure.error, "skipping branch");
                prepared.failures.push(PathFailure { root_field: field.name.clone(), key: failure.key, error: failure.error });
            }
            for path in built.paths {
                match binder.bind_path(&path) {
                    Ok(bindings) => prepared.queries.push(PreparedQuery { path, bindings }),
                    Err(error) => {
                        warn!(path = %path.key(), %error, "skipping path");
                        prepared.failures.push(PathFailure { root_field: field.name.clone(), key: path.key(), error });
                    }
                }
            }
        }

        info!(queries = prepared.queries.len(), failures = prepared.failures.len(), "prepared queries");
        prepared
    }

    pub fn expand(&self, query: &PreparedQuery) -> Expansion {
        if query.is_static() {
            Expansion::Static
        } else {
            Expansion::Propositions(combine::expand(&query.bindings))
        }
    }
}

impl FromStr for Schema {
    type Err = Error;

    fn from_str(src: &str) -> Result<Self> {
        Self::from_raw(&introspection::decode_str(src)?)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PREPARED QUERY
// ————————————————————————————————————————————————————————————————————————————

impl PreparedQuery {
    pub fn path(&self) -> &QueryPath {
        &self.path
    }

    pub fn bindings(&self) -> &[VariableBinding] {
        &self.bindings
    }

    pub fn is_static(&self) -> bool {
        self.bindings.is_empty()
    }

    /// `Deterministic` only when every bound resolver is.
    pub fn determinism(&self) -> Determinism {
        self.bindings
            .iter()
            .fold(Determinism::Deterministic, |acc, b| acc.and(b.resolver.determinism()))
    }

    pub fn render(&self) -> String {
        self.path.render()
    }

    /// The query with `proposition`'s values embedded as argument literals,
    /// e.g. `user(id: 7){name}`.
    pub fn render_with(&self, proposition: &Proposition) -> String {
        self.path.render_with_arguments(|depth, field| {
            if !field.is_argumented() {
                return None;
            }
            let path_key = self.path.names_through(depth).join(".");
            let args = self
                .bindings
                .iter()
                .filter(|b| b.path_key == path_key)
                .filter_map(|b| {
                    let value = proposition.get(&b.path_key, &b.argument.name)?;
                    Some(format!("{}: {}", b.argument.name, b.resolver.render(value)))
                })
                .collect::<Vec<_>>();
            (!args.is_empty()).then(|| args.join(", "))
        })
    }
}
