//! OpenAPI 3.0 document generation.
//!
//! The document is assembled from the route table in [`crate::api::routes`],
//! so the served documentation cannot drift from what the service actually
//! dispatches on. The generator is pure: it only looks at its arguments.

use serde_json::{Map, Value, json};

use crate::api::routes::{ResponseSpec, RouteSpec, SchemaRef, TagSpec};
use crate::api::service::ApiInfo;

/// Build the OpenAPI 3.0 document for the given route table.
///
/// `server_url` ends up as the single `servers` entry. When `info` carries no
/// version, the document falls back to "1.0.0" since OpenAPI requires one.
pub fn openapi_document(
    info: &ApiInfo,
    server_url: &str,
    routes: &[RouteSpec],
    tags: &[TagSpec],
) -> Value {
    let mut paths = Map::new();
    for route in routes {
        let entry = paths
            .entry(route.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(operations) = entry {
            operations.insert(route.method.as_str().to_lowercase(), operation(route));
        }
    }

    let tags: Vec<Value> = tags
        .iter()
        .map(|tag| json!({ "name": tag.name, "description": tag.description }))
        .collect();

    json!({
        "openapi": "3.0.0",
        "info": info_object(info),
        "servers": [{ "url": server_url }],
        "tags": tags,
        "paths": paths,
        "components": { "schemas": component_schemas() },
    })
}

fn info_object(info: &ApiInfo) -> Value {
    let mut object = Map::new();
    object.insert("title".to_string(), json!(info.title));
    if let Some(description) = &info.description {
        object.insert("description".to_string(), json!(description));
    }
    let version = info.version.as_deref().unwrap_or("1.0.0");
    object.insert("version".to_string(), json!(version));
    Value::Object(object)
}

fn operation(route: &RouteSpec) -> Value {
    let mut operation = Map::new();
    operation.insert("summary".to_string(), json!(route.summary));
    operation.insert("tags".to_string(), json!([route.tag]));

    let parameters = path_parameters(route.path);
    if !parameters.is_empty() {
        operation.insert("parameters".to_string(), Value::Array(parameters));
    }

    if let Some(schema) = route.request_body {
        operation.insert(
            "requestBody".to_string(),
            json!({
                "required": true,
                "content": { "application/json": { "schema": schema_value(schema) } },
            }),
        );
    }

    let mut responses = Map::new();
    for response in &route.responses {
        responses.insert(response.status.to_string(), response_object(response));
    }
    operation.insert("responses".to_string(), Value::Object(responses));

    Value::Object(operation)
}

/// Turn `{name}` segments of a path template into path parameter objects.
fn path_parameters(path: &str) -> Vec<Value> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .map(|name| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "description": "Identifier of the book",
                "schema": { "type": "integer" },
            })
        })
        .collect()
}

fn response_object(response: &ResponseSpec) -> Value {
    match response.schema {
        Some(schema) => json!({
            "description": response.description,
            "content": { "application/json": { "schema": schema_value(schema) } },
        }),
        None => json!({ "description": response.description }),
    }
}

fn schema_value(schema: SchemaRef) -> Value {
    match schema {
        SchemaRef::Book => json!({ "$ref": "#/components/schemas/Book" }),
        SchemaRef::BookList => json!({
            "type": "array",
            "items": { "$ref": "#/components/schemas/Book" },
        }),
        SchemaRef::BookInput => json!({ "$ref": "#/components/schemas/BookInput" }),
        SchemaRef::BookUpdate => json!({ "$ref": "#/components/schemas/BookUpdate" }),
        SchemaRef::ErrorMessage => json!({ "$ref": "#/components/schemas/ErrorMessage" }),
    }
}

fn component_schemas() -> Value {
    json!({
        "Book": {
            "type": "object",
            "required": ["id", "name", "author", "pages"],
            "properties": {
                "id": { "type": "integer", "description": "Identifier assigned by the service" },
                "name": { "type": "string", "description": "Title of the book" },
                "author": { "type": "string", "description": "Author of the book" },
                "pages": { "type": "integer", "description": "Number of pages" },
            },
            "example": {
                "id": 1,
                "name": "O Alquimista",
                "author": "Paulo Coelho",
                "pages": 208,
            },
        },
        "BookInput": {
            "type": "object",
            "required": ["name", "author", "pages"],
            "properties": {
                "name": { "type": "string", "description": "Title of the book" },
                "author": { "type": "string", "description": "Author of the book" },
                "pages": { "type": "integer", "description": "Number of pages" },
            },
            "example": {
                "name": "O Alquimista",
                "author": "Paulo Coelho",
                "pages": 208,
            },
        },
        "BookUpdate": {
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "New title" },
                "author": { "type": "string", "description": "New author" },
                "pages": { "type": "integer", "description": "New page count" },
            },
            "example": {
                "name": "New Name",
                "author": "New Author",
                "pages": 300,
            },
        },
        "ErrorMessage": {
            "type": "object",
            "properties": {
                "message": { "type": "string", "description": "What went wrong" },
            },
            "example": { "message": "book not found" },
        },
    })
}
