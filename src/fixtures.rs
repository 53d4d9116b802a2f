//! Compact builders for introspection documents used across unit tests.
use serde_json::{Value, json};

pub fn named(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

pub fn scalar(name: &str) -> Value {
    named("SCALAR", name)
}

pub fn object_ref(name: &str) -> Value {
    named("OBJECT", name)
}

pub fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

pub fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

pub fn arg(name: &str, ty: Value) -> Value {
    json!({ "name": name, "type": ty, "defaultValue": null })
}

pub fn field(name: &str, ty: Value, args: Vec<Value>) -> Value {
    json!({ "name": name, "type": ty, "args": args })
}

pub fn object(name: &str, fields: Vec<Value>) -> Value {
    json!({ "kind": "OBJECT", "name": name, "fields": fields, "inputFields": null, "enumValues": null })
}

pub fn enumeration(name: &str, values: &[&str]) -> Value {
    let values = values.iter().map(|v| json!({ "name": v, "isDeprecated": false })).collect::<Vec<_>>();
    json!({ "kind": "ENUM", "name": name, "fields": null, "inputFields": null, "enumValues": values })
}

pub fn input_object(name: &str, input_fields: Vec<Value>) -> Value {
    json!({ "kind": "INPUT_OBJECT", "name": name, "fields": null, "inputFields": input_fields, "enumValues": null })
}

pub fn union(name: &str) -> Value {
    json!({ "kind": "UNION", "name": name, "fields": null, "inputFields": null, "enumValues": null })
}

/// Full introspection response: the given types plus the built-in scalars.
pub fn response(types: Vec<Value>) -> Value {
    let mut all = types;
    for name in ["String", "Int", "Boolean", "DateTime", "ID", "Float"] {
        all.push(json!({ "kind": "SCALAR", "name": name, "fields": null, "inputFields": null, "enumValues": null }));
    }
    json!({ "data": { "__schema": { "queryType": { "name": "Query" }, "types": all } } })
}

/// `type Query { user(id: Int!): User }`, `type User { name: String }`
pub fn user_schema() -> Value {
    response(vec![
        object("Query", vec![field("user", object_ref("User"), vec![arg("id", non_null(scalar("Int")))])]),
        object("User", vec![field("name", scalar("String"), vec![])]),
    ])
}
