//! Command line front end: introspection document → (paths | generate)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::combine::Proposition;
use crate::config::{ConfigFile, GenerationConfig};
use crate::registry::DescendantScan;
use crate::schema::{Expansion, PreparedQueries, PreparedQuery, Schema};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// generate GraphQL test queries and argument combinations from an introspection document
#[derive(Parser, Debug)]
#[command(name = "gql-autotest", version)]
pub struct CommandLineInterface {
    /// tracing filter directives, e.g. `gql_autotest=debug` (defaults to RUST_LOG, then `warn`)
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list the query paths and the arguments bound along each one
    Paths(PathsOut),
    /// expand every query path into argument combinations and emit JSON
    Generate(GenerateOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to the introspection response inside each document (e.g. /response/body)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document.
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more introspection documents. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct GenerationSettings {
    /// JSON config file (max_depth, descendant_scan, scalars, overrides)
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// maximum number of fields on a query path; overrides the config file
    #[arg(long)]
    max_depth: Option<usize>,

    /// only inspect the first field of each type when looking for argumented descendants
    #[arg(long, default_value_t = false)]
    first_field_scan: bool,
}

#[derive(clap::Parser, Debug)]
struct PathsOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generation: GenerationSettings,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generation: GenerationSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// OUTPUT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Serialize)]
struct GeneratedDocument {
    source: String,
    queries: Vec<GeneratedQuery>,
    failures: Vec<GeneratedFailure>,
}

#[derive(Debug, Serialize)]
struct GeneratedQuery {
    query: String,
    /// flat `path.argument` keys
    variables: Vec<String>,
    /// false when a bound resolver draws random or time-based values
    reproducible: bool,
    propositions: Vec<Proposition>,
    /// the query with each proposition embedded as argument literals
    requests: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GeneratedFailure {
    root_field: String,
    key: String,
    error: String,
}

impl GeneratedQuery {
    fn new(schema: &Schema, query: &PreparedQuery) -> Self {
        let (propositions, requests) = match schema.expand(query) {
            Expansion::Static => (Vec::new(), vec![query.render()]),
            Expansion::Propositions(propositions) => {
                let requests = propositions.iter().map(|p| query.render_with(p)).collect();
                (propositions, requests)
            }
        };
        Self {
            query: query.render(),
            variables: query.bindings().iter().map(|b| b.key()).collect(),
            reproducible: query.determinism() == crate::resolver::Determinism::Deterministic,
            propositions,
            requests,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    /// Read every input and hand each introspection document to `apply`.
    fn load_process(&self, mut apply: impl FnMut(&Path, Value) -> Result<()>) -> Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        for source_path in source_paths {
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file {}", source_path.display()))?;
            let json_value = serde_json::from_str::<Value>(&source)
                .with_context(|| format!("failed to parse JSON source file {}", source_path.display()))?;
            let json_value = match self.json_pointer.as_deref() {
                None => json_value,
                Some(pointer) => json_value
                    .pointer(pointer)
                    .cloned()
                    .ok_or_else(|| anyhow!("JSON pointer {pointer} matched nothing in {}", source_path.display()))?,
            };
            match self.jq_expr.as_ref() {
                None => apply(&source_path, json_value)?,
                Some(jq_expr) => {
                    let outputs = crate::jq_exec::run_jaq(jq_expr, &json_value).with_context(|| {
                        format!("failed to apply jq expression to source file {}", source_path.display())
                    })?;
                    for json_value in outputs {
                        apply(&source_path, json_value)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl GenerationSettings {
    /// Load the config file (if any) and apply the command line overrides.
    fn load(&self) -> Result<(GenerationConfig, ConfigFile)> {
        let file = match self.config.as_ref() {
            None => ConfigFile::default(),
            Some(path) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                crate::path_de::from_str_with_path::<ConfigFile>(&source)
                    .map_err(anyhow::Error::msg)
                    .with_context(|| format!("invalid config file {}", path.display()))?
            }
        };
        let mut config = file.generation_config()?;
        if let Some(depth) = self.max_depth {
            config = config.with_max_depth(depth);
        }
        if self.first_field_scan {
            config = config.with_descendant_scan(DescendantScan::FirstFieldOnly);
        }
        Ok((config, file))
    }
}

/// Build a schema from one document and register the configured scalar aliases.
fn load_schema(document: Value, file: &ConfigFile) -> Result<Schema> {
    let mut schema = Schema::from_value(document)?;
    for (alias, target) in &file.scalars {
        if !schema.alias_scalar(alias.clone(), target) {
            bail!("scalar alias `{alias}` points at `{target}`, which has no generator");
        }
    }
    Ok(schema)
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        init_tracing(self.log_filter.as_deref());
        match &self.cmd {
            Command::Paths(target) => {
                let (config, file) = target.generation.load()?;
                target.input_settings.load_process(|source_path, document| {
                    let schema = load_schema(document, &file)
                        .with_context(|| format!("failed to build schema from {}", source_path.display()))?;
                    let prepared = schema.prepare_paths(&config);
                    println!("{}", source_path.display().to_string().bold());
                    print_paths(&prepared);
                    Ok(())
                })
            }
            Command::Generate(target) => {
                let (config, file) = target.generation.load()?;
                let mut documents = Vec::new();
                target.input_settings.load_process(|source_path, document| {
                    let schema = load_schema(document, &file)
                        .with_context(|| format!("failed to build schema from {}", source_path.display()))?;
                    documents.push(generate(&schema, &config, source_path));
                    Ok(())
                })?;

                let output = if target.pretty {
                    serde_json::to_string_pretty(&documents)?
                } else {
                    serde_json::to_string(&documents)?
                };
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(out, &output).with_context(|| format!("failed to write {}", out.display()))?;
                    }
                    None => println!("{output}"),
                }
                Ok(())
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn init_tracing(directives: Option<&str>) {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::WARN.into());
    let filter = match directives {
        Some(directives) => builder.parse_lossy(directives),
        None => builder.from_env_lossy(),
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn generate(schema: &Schema, config: &GenerationConfig, source_path: &Path) -> GeneratedDocument {
    let prepared = schema.prepare_paths(config);
    let queries = prepared
        .queries
        .par_iter()
        .map(|query| GeneratedQuery::new(schema, query))
        .collect::<Vec<_>>();
    info!(
        source = %source_path.display(),
        queries = queries.len(),
        requests = queries.iter().map(|q| q.requests.len()).sum::<usize>(),
        "generated"
    );
    let failures = prepared
        .failures
        .into_iter()
        .map(|f| GeneratedFailure { root_field: f.root_field, key: f.key, error: f.error.to_string() })
        .collect();
    GeneratedDocument { source: source_path.display().to_string(), queries, failures }
}

fn print_paths(prepared: &PreparedQueries) {
    for query in &prepared.queries {
        println!("  {}", query.render().green());
        for binding in query.bindings() {
            println!("    {} {}", binding.key().cyan(), binding.argument.ty.to_string().dimmed());
        }
    }
    for failure in &prepared.failures {
        println!("  {} {}: {}", "failed".red().bold(), failure.key, failure.error);
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use serde_json::json;

    #[test]
    fn parses_generate_invocation() {
        let cli = CommandLineInterface::try_parse_from([
            "gql-autotest",
            "--log-filter",
            "debug",
            "generate",
            "-i",
            "schema.json",
            "--max-depth",
            "4",
            "--first-field-scan",
        ])
        .unwrap();
        assert_eq!(cli.log_filter.as_deref(), Some("debug"));
        let Command::Generate(target) = cli.cmd else { panic!("expected generate") };
        assert_eq!(target.input_settings.input, ["schema.json"]);
        let (config, _) = target.generation.load().unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.descendant_scan, DescendantScan::FirstFieldOnly);
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["a.json", "dir/b.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("a.json"), PathBuf::from("dir/b.json")]);
    }

    #[test]
    fn generated_document_for_user_schema() {
        let file: ConfigFile = serde_json::from_value(json!({ "overrides": { "user": { "id": [7, 8] } } })).unwrap();
        let schema = load_schema(user_schema(), &file).unwrap();
        let document = generate(&schema, &file.generation_config().unwrap(), Path::new("schema.json"));

        assert!(document.failures.is_empty());
        let query = &document.queries[0];
        assert_eq!(query.query, "user{name}");
        assert_eq!(query.variables, ["user.id"]);
        assert!(query.reproducible);
        assert_eq!(query.requests, ["user(id: 7){name}", "user(id: 8){name}"]);
    }

    #[test]
    fn scalar_aliases_must_point_at_a_generator() {
        let file: ConfigFile = serde_json::from_value(json!({ "scalars": { "ID": "Missing" } })).unwrap();
        assert!(load_schema(user_schema(), &file).is_err());
    }
}
