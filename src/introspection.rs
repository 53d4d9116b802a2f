//! Wire shape of the introspection response, the query that requests it, and
//! the transport seam used to fetch it.
//!
//! Only what the generator needs is decoded; descriptions, directives and
//! interfaces are ignored.
use serde::{Deserialize, Deserializer};

use crate::error::{Error, Result};
use crate::types::TypeKind;

/// Number of `ofType` levels captured by [`INTROSPECTION_QUERY`].
pub const MAX_WRAPPER_DEPTH: usize = 7;

pub const INTROSPECTION_QUERY: &str = "query IntrospectionQuery { \
__schema { \
queryType { name } \
types { \
kind name \
fields(includeDeprecated: false) { name args { name defaultValue type { ...TypeRef } } type { ...TypeRef } } \
inputFields { name defaultValue type { ...TypeRef } } \
enumValues(includeDeprecated: false) { name isDeprecated } \
} } } \
fragment TypeRef on __Type { kind name ofType { kind name ofType { kind name ofType { kind name \
ofType { kind name ofType { kind name ofType { kind name ofType { kind name } } } } } } } }";

// ————————————————————————————————————————————————————————————————————————————
// TRANSPORT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self { status: 200, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends a GraphQL document to an endpoint. Implemented by callers; the crate
/// never performs network I/O itself.
pub trait Transport {
    fn execute(&self, query: &str) -> Result<TransportResponse, Box<dyn std::error::Error + Send + Sync>>;
}

// ————————————————————————————————————————————————————————————————————————————
// WIRE TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTypeRef {
    pub kind: TypeKind,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub of_type: Option<Box<RawTypeRef>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInputValue {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: RawTypeRef,
    #[serde(default)]
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawField {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub args: Vec<RawInputValue>,
    #[serde(rename = "type")]
    pub ty: RawTypeRef,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEnumValue {
    pub name: String,
    #[serde(default)]
    pub is_deprecated: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawType {
    pub kind: TypeKind,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub fields: Vec<RawField>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub input_fields: Vec<RawInputValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub enum_values: Vec<RawEnumValue>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub args: Vec<RawInputValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNamed {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchema {
    #[serde(default)]
    pub query_type: Option<RawNamed>,
    pub types: Vec<RawType>,
}

/// Accepts both a full response (`{"data": {"__schema": ..}}`) and a bare
/// `{"__schema": ..}` document.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<SchemaHolder>,
    #[serde(rename = "__schema", default)]
    schema: Option<RawSchema>,
    #[serde(default)]
    errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SchemaHolder {
    #[serde(rename = "__schema")]
    schema: RawSchema,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// ————————————————————————————————————————————————————————————————————————————
// DECODING
// ————————————————————————————————————————————————————————————————————————————

pub fn decode_str(src: &str) -> Result<RawSchema> {
    let envelope = crate::path_de::from_str_with_path::<Envelope>(src).map_err(Error::Decode)?;
    unwrap_envelope(envelope)
}

pub fn decode_value(value: serde_json::Value) -> Result<RawSchema> {
    let envelope = crate::path_de::from_value_with_path::<Envelope>(value).map_err(Error::Decode)?;
    unwrap_envelope(envelope)
}

fn unwrap_envelope(envelope: Envelope) -> Result<RawSchema> {
    match (envelope.data, envelope.schema) {
        (Some(holder), _) => Ok(holder.schema),
        (None, Some(schema)) => Ok(schema),
        (None, None) => {
            let reason = match envelope.errors {
                Some(errors) => format!("response carries no schema; errors: {errors}"),
                None => "response carries no `__schema`".to_string(),
            };
            Err(Error::Decode(reason))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn query_captures_seven_wrapper_levels() {
        assert_eq!(INTROSPECTION_QUERY.matches("ofType").count(), MAX_WRAPPER_DEPTH);
        assert!(INTROSPECTION_QUERY.contains("inputFields"));
        assert!(INTROSPECTION_QUERY.contains("enumValues"));
    }

    #[test]
    fn decodes_full_response_and_bare_schema() {
        let schema = json!({
            "queryType": { "name": "Root" },
            "types": [
                { "kind": "OBJECT", "name": "Root", "fields": [], "inputFields": null, "enumValues": null }
            ]
        });
        let full = decode_value(json!({ "data": { "__schema": schema.clone() } })).unwrap();
        assert_eq!(full.query_type.unwrap().name, "Root");
        assert_eq!(full.types.len(), 1);

        let bare = decode_value(json!({ "__schema": schema })).unwrap();
        assert_eq!(bare.types[0].name, "Root");
        assert!(bare.types[0].input_fields.is_empty());
    }

    #[test]
    fn decode_errors_carry_json_path() {
        let src = r#"{"data": {"__schema": {"types": [{"kind": "WIDGET", "name": "X"}]}}}"#;
        let Err(Error::Decode(msg)) = decode_str(src) else { panic!("expected decode error") };
        assert!(msg.contains("data.__schema.types[0].kind"), "{msg}");
    }

    #[test]
    fn missing_schema_reports_errors() {
        let src = r#"{"data": null, "errors": [{"message": "introspection disabled"}]}"#;
        let Err(Error::Decode(msg)) = decode_str(src) else { panic!("expected decode error") };
        assert!(msg.contains("introspection disabled"));
    }
}
