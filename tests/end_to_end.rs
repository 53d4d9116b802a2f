use gql_autotest::{Error, Expansion, GenerationConfig, Overrides, Schema, Transport, TransportResponse};
use serde_json::{Value, json};

fn type_ref(kind: &str, name: &str) -> Value {
    json!({ "kind": kind, "name": name, "ofType": null })
}

fn non_null(inner: Value) -> Value {
    json!({ "kind": "NON_NULL", "name": null, "ofType": inner })
}

fn list(inner: Value) -> Value {
    json!({ "kind": "LIST", "name": null, "ofType": inner })
}

/// A small shop API: products with paginated reviews, a search filter input
/// object and an enum sort order.
fn shop_introspection() -> String {
    let scalar = |name: &str| json!({ "kind": "SCALAR", "name": name });
    json!({
        "data": { "__schema": {
            "queryType": { "name": "Query" },
            "types": [
                { "kind": "OBJECT", "name": "Query", "fields": [
                    { "name": "product", "type": type_ref("OBJECT", "Product"),
                      "args": [{ "name": "id", "type": non_null(type_ref("SCALAR", "Int")), "defaultValue": null }] },
                    { "name": "search", "type": list(type_ref("OBJECT", "Product")),
                      "args": [
                          { "name": "filter", "type": type_ref("INPUT_OBJECT", "Filter"), "defaultValue": null },
                          { "name": "order", "type": non_null(type_ref("ENUM", "Order")), "defaultValue": null }
                      ] },
                    { "name": "version", "type": type_ref("SCALAR", "String"), "args": [] }
                ] },
                { "kind": "OBJECT", "name": "Product", "fields": [
                    { "name": "name", "type": type_ref("SCALAR", "String"), "args": [] },
                    { "name": "reviews", "type": list(type_ref("OBJECT", "Review")),
                      "args": [
                          { "name": "first", "type": type_ref("SCALAR", "Int"), "defaultValue": null },
                          { "name": "last", "type": type_ref("SCALAR", "Int"), "defaultValue": null }
                      ] }
                ] },
                { "kind": "OBJECT", "name": "Review", "fields": [
                    { "name": "stars", "type": type_ref("SCALAR", "Int"), "args": [] }
                ] },
                { "kind": "INPUT_OBJECT", "name": "Filter", "inputFields": [
                    { "name": "inStock", "type": non_null(type_ref("SCALAR", "Boolean")), "defaultValue": null }
                ] },
                { "kind": "ENUM", "name": "Order", "enumValues": [
                    { "name": "ASC", "isDeprecated": false },
                    { "name": "DESC", "isDeprecated": false }
                ] },
                scalar("Int"), scalar("String"), scalar("Boolean")
            ]
        } }
    })
    .to_string()
}

struct Saved(String);

impl Transport for Saved {
    fn execute(&self, _query: &str) -> Result<TransportResponse, Box<dyn std::error::Error + Send + Sync>> {
        Ok(TransportResponse::ok(self.0.clone()))
    }
}

#[test]
fn every_argumented_field_is_reached() {
    let schema = Schema::fetch(&Saved(shop_introspection())).unwrap();
    let prepared = schema.prepare_paths(&GenerationConfig::default());
    assert!(prepared.failures.is_empty());

    let rendered: Vec<_> = prepared.queries.iter().map(|q| q.render()).collect();
    assert_eq!(rendered, [
        "product{reviews{stars}}",
        "product{name}",
        "search{reviews{stars}}",
        "search{name}",
        "version",
    ]);

    let keys: Vec<Vec<String>> = prepared
        .queries
        .iter()
        .map(|q| q.bindings().iter().map(|b| b.key()).collect())
        .collect();
    assert_eq!(keys[0], ["product.id", "product.reviews.first", "product.reviews.last"]);
    assert_eq!(keys[1], ["product.id"]);
    assert_eq!(keys[2], ["search.filter", "search.order", "search.reviews.first", "search.reviews.last"]);
    assert_eq!(keys[3], ["search.filter", "search.order"]);
    assert!(keys[4].is_empty());
    assert_eq!(schema.expand(&prepared.queries[4]), Expansion::Static);
}

#[test]
fn overrides_drive_the_combinations() {
    let schema: Schema = shop_introspection().parse().unwrap();
    let overrides = Overrides::from_json(&json!({
        "product": {
            "id": 3,
            "reviews": {
                "first": { "$resolver": "connection.first" },
                "last": { "$resolver": "connection.last" }
            }
        },
        "search": { "filter": { "inStock": [true] } }
    }))
    .unwrap();
    let config = GenerationConfig::default().with_overrides(overrides);
    let prepared = schema.prepare_paths(&config);

    let Expansion::Propositions(props) = schema.expand(&prepared.queries[0]) else { panic!("expected propositions") };
    // first = null → last tries a size then null; first = size → last is null
    assert_eq!(props.len(), 3);
    for p in &props {
        let first = p.get("product.reviews", "first").unwrap();
        let last = p.get("product.reviews", "last").unwrap();
        assert!(first.is_null() || last.is_null());
    }

    let search = &prepared.queries[3];
    let Expansion::Propositions(props) = schema.expand(search) else { panic!("expected propositions") };
    let requests: Vec<_> = props.iter().map(|p| search.render_with(p)).collect();
    assert_eq!(requests, [
        "search(filter: {inStock: true}, order: ASC){name}",
        "search(filter: {inStock: true}, order: DESC){name}",
    ]);
}

#[test]
fn failing_introspection_request_is_reported() {
    let response = TransportResponse { status: 401, body: "unauthorized".into() };
    assert!(matches!(Schema::build(response), Err(Error::IntrospectionFetch { status: 401 })));
    assert!(matches!("{\"data\": {}}".parse::<Schema>(), Err(Error::Decode(_))));
}
