//! Conversion of a decoded OpenAPI tree into an [`ApiModel`].
//!
//! The walk is over a generic `serde_json::Value` rather than a typed OpenAPI
//! model so that partially-specified documents still normalize: every optional
//! member gets a deterministic default here, and templates never have to test
//! for absence.
//!
//! Reference handling is asymmetric:
//! - a `$ref` parameter or response aborts the whole document
//! - a `$ref` request body is treated as if the operation declared none

use super::types::{
    ApiModel, EndpointDescriptor, MediaContent, ParameterDescriptor, ParameterLocation,
    RequestBodyDescriptor, ResponseDescriptor, SchemaDescriptor, SpecMetadata, DEFAULT_TAG,
};
use crate::error::{Result, ScaffoldError};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Path-item keys that declare operations.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

/// Normalize a decoded OpenAPI document.
///
/// # Errors
///
/// - [`ScaffoldError::UnsupportedReference`] if any parameter (operation or
///   path level) or any response is a `$ref`
/// - [`ScaffoldError::InvalidDocument`] if the tree does not have the shape
///   of an OpenAPI document
pub fn normalize(document: &Value) -> Result<ApiModel> {
    let root = document
        .as_object()
        .ok_or_else(|| ScaffoldError::invalid("$", "document root must be a mapping"))?;

    let metadata = normalize_metadata(root.get("info"))?;

    let mut endpoints = Vec::new();
    match root.get("paths") {
        None | Some(Value::Null) => {}
        Some(Value::Object(paths)) => {
            for (path, item) in paths {
                normalize_path_item(path, item, &mut endpoints)?;
            }
        }
        Some(_) => return Err(ScaffoldError::invalid("paths", "expected a mapping")),
    }

    let schemas = extract_schemas(root);

    Ok(ApiModel {
        endpoints,
        schemas,
        metadata,
    })
}

/// Operation id used when the document does not declare one.
///
/// Uppercase method followed by the path, with every non-alphanumeric
/// character removed: `GET /pets/{petId}` becomes `GETpetspetId`. Two
/// operations whose paths differ only in punctuation collide.
pub fn synthesize_operation_id(method: &str, path: &str) -> String {
    method
        .to_uppercase()
        .chars()
        .chain(path.chars())
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn normalize_metadata(info: Option<&Value>) -> Result<SpecMetadata> {
    let info = info
        .and_then(Value::as_object)
        .ok_or_else(|| ScaffoldError::invalid("info", "missing info block"))?;
    let text = |key: &str| info.get(key).map(scalar_to_string);
    Ok(SpecMetadata {
        title: text("title").unwrap_or_default(),
        version: text("version").unwrap_or_default(),
        description: text("description"),
    })
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn reference_of(value: &Value) -> Option<String> {
    value
        .as_object()
        .and_then(|o| o.get("$ref"))
        .map(scalar_to_string)
}

fn normalize_path_item(path: &str, item: &Value, out: &mut Vec<EndpointDescriptor>) -> Result<()> {
    let location = format!("paths.{path}");
    let item = item
        .as_object()
        .ok_or_else(|| ScaffoldError::invalid(&location, "path item must be a mapping"))?;

    let shared = match item.get("parameters") {
        Some(list) => normalize_parameters(list, &format!("{location}.parameters"))?,
        None => Vec::new(),
    };

    for (key, operation) in item {
        let method = key.to_ascii_lowercase();
        if !HTTP_METHODS.contains(&method.as_str()) {
            continue;
        }
        let endpoint = normalize_operation(path, &method, operation, &shared)?;
        debug!(
            method = %endpoint.method,
            path = %endpoint.path,
            operation_id = %endpoint.operation_id,
            "normalized operation"
        );
        out.push(endpoint);
    }
    Ok(())
}

fn normalize_operation(
    path: &str,
    method: &str,
    operation: &Value,
    shared: &[ParameterDescriptor],
) -> Result<EndpointDescriptor> {
    let location = format!("paths.{path}.{method}");
    let op = operation
        .as_object()
        .ok_or_else(|| ScaffoldError::invalid(&location, "operation must be a mapping"))?;

    let operation_id = op
        .get("operationId")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| synthesize_operation_id(method, path));

    let tags = normalize_tags(op.get("tags"), &location)?;

    let own = match op.get("parameters") {
        Some(list) => normalize_parameters(list, &format!("{location}.parameters"))?,
        None => Vec::new(),
    };
    let parameters = merge_parameters(shared, own);

    let request_body = match op.get("requestBody") {
        None | Some(Value::Null) => None,
        Some(body) => {
            if let Some(reference) = reference_of(body) {
                debug!(%location, %reference, "ignoring referenced request body");
                None
            } else {
                Some(normalize_request_body(body, &format!("{location}.requestBody"))?)
            }
        }
    };

    let responses = match op.get("responses") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Object(map)) => normalize_responses(map, &format!("{location}.responses"))?,
        Some(_) => {
            return Err(ScaffoldError::invalid(
                format!("{location}.responses"),
                "expected a mapping of status codes",
            ))
        }
    };

    Ok(EndpointDescriptor {
        path: path.to_string(),
        method: method.to_uppercase(),
        operation_id,
        tags,
        parameters,
        request_body,
        responses,
    })
}

fn normalize_tags(tags: Option<&Value>, location: &str) -> Result<Vec<String>> {
    let list = match tags {
        None | Some(Value::Null) => return Ok(vec![DEFAULT_TAG.to_string()]),
        Some(Value::Array(list)) => list,
        Some(_) => {
            return Err(ScaffoldError::invalid(
                format!("{location}.tags"),
                "expected a list of strings",
            ))
        }
    };
    let mut out: Vec<String> = Vec::with_capacity(list.len());
    for (i, tag) in list.iter().enumerate() {
        let tag = tag.as_str().ok_or_else(|| {
            ScaffoldError::invalid(format!("{location}.tags[{i}]"), "tag must be a string")
        })?;
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    if out.is_empty() {
        out.push(DEFAULT_TAG.to_string());
    }
    Ok(out)
}

fn normalize_parameters(list: &Value, location: &str) -> Result<Vec<ParameterDescriptor>> {
    let entries = match list {
        Value::Null => return Ok(Vec::new()),
        Value::Array(entries) => entries,
        _ => return Err(ScaffoldError::invalid(location, "expected a list of parameters")),
    };

    let mut out = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let here = format!("{location}[{i}]");
        if let Some(reference) = reference_of(entry) {
            return Err(ScaffoldError::UnsupportedReference {
                location: here,
                reference,
            });
        }
        let obj = entry
            .as_object()
            .ok_or_else(|| ScaffoldError::invalid(&here, "parameter must be a mapping"))?;
        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| ScaffoldError::invalid(&here, "parameter is missing 'name'"))?;
        let raw_location = obj
            .get("in")
            .and_then(Value::as_str)
            .ok_or_else(|| ScaffoldError::invalid(&here, "parameter is missing 'in'"))?;
        let Some(param_location) = ParameterLocation::parse(raw_location) else {
            if raw_location == "cookie" {
                warn!(location = %here, parameter = name, "cookie parameters are not scaffolded");
                continue;
            }
            return Err(ScaffoldError::invalid(
                &here,
                format!("unknown parameter location '{raw_location}'"),
            ));
        };
        let required = obj
            .get("required")
            .and_then(Value::as_bool)
            .unwrap_or(param_location == ParameterLocation::Path);
        out.push(ParameterDescriptor {
            name: name.to_string(),
            location: param_location,
            required,
            schema: obj.get("schema").cloned(),
        });
    }
    Ok(out)
}

/// Path-level parameters first; an operation parameter with the same name and
/// location replaces the shared one in place.
fn merge_parameters(
    shared: &[ParameterDescriptor],
    own: Vec<ParameterDescriptor>,
) -> Vec<ParameterDescriptor> {
    let mut merged = shared.to_vec();
    for param in own {
        match merged
            .iter_mut()
            .find(|p| p.name == param.name && p.location == param.location)
        {
            Some(existing) => *existing = param,
            None => merged.push(param),
        }
    }
    merged
}

fn normalize_content(content: Option<&Value>, location: &str) -> Result<Option<Vec<MediaContent>>> {
    let map = match content {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(map)) => map,
        Some(_) => return Err(ScaffoldError::invalid(location, "expected a mapping of media types")),
    };
    let entries = map
        .iter()
        .map(|(media_type, media)| MediaContent {
            media_type: media_type.clone(),
            schema: media.as_object().and_then(|m| m.get("schema")).cloned(),
        })
        .collect();
    Ok(Some(entries))
}

fn normalize_request_body(body: &Value, location: &str) -> Result<RequestBodyDescriptor> {
    let obj = body
        .as_object()
        .ok_or_else(|| ScaffoldError::invalid(location, "request body must be a mapping"))?;
    Ok(RequestBodyDescriptor {
        required: obj.get("required").and_then(Value::as_bool).unwrap_or(false),
        content: normalize_content(obj.get("content"), &format!("{location}.content"))?
            .unwrap_or_default(),
    })
}

fn normalize_responses(map: &Map<String, Value>, location: &str) -> Result<Vec<ResponseDescriptor>> {
    let mut out = Vec::with_capacity(map.len());
    for (status, response) in map {
        let here = format!("{location}.{status}");
        if let Some(reference) = reference_of(response) {
            return Err(ScaffoldError::UnsupportedReference {
                location: here,
                reference,
            });
        }
        let obj = response
            .as_object()
            .ok_or_else(|| ScaffoldError::invalid(&here, "response must be a mapping"))?;
        out.push(ResponseDescriptor {
            status_code: status.clone(),
            description: obj
                .get("description")
                .map(scalar_to_string)
                .unwrap_or_default(),
            content: normalize_content(obj.get("content"), &format!("{here}.content"))?,
        });
    }
    Ok(out)
}

/// Keep only `components.schemas` entries that carry a `properties` member.
fn extract_schemas(root: &Map<String, Value>) -> Vec<SchemaDescriptor> {
    let Some(schemas) = root
        .get("components")
        .and_then(|c| c.get("schemas"))
        .and_then(Value::as_object)
    else {
        return Vec::new();
    };

    schemas
        .iter()
        .filter_map(|(name, schema)| {
            let obj = schema.as_object()?;
            let properties = obj.get("properties")?;
            let required = obj
                .get("required")
                .and_then(Value::as_array)
                .map(|r| {
                    r.iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();
            Some(SchemaDescriptor {
                name: name.clone(),
                properties: properties.as_object().cloned().unwrap_or_default(),
                required,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    fn doc(paths: Value) -> Value {
        json!({
            "openapi": "3.0.3",
            "info": { "title": "Pets", "version": "1.0.0" },
            "paths": paths
        })
    }

    #[test]
    fn test_synthesized_operation_id() {
        assert_eq!(synthesize_operation_id("get", "/pets/{petId}"), "GETpetspetId");
        assert_eq!(synthesize_operation_id("delete", "/a-b/c_d"), "DELETEabcd");
    }

    #[test]
    fn test_defaults_for_missing_members() {
        let model = normalize(&doc(json!({ "/pets": { "get": {} } }))).unwrap();
        let ep = &model.endpoints[0];
        assert_eq!(ep.method, "GET");
        assert_eq!(ep.operation_id, "GETpets");
        assert_eq!(ep.tags, vec!["default"]);
        assert!(ep.parameters.is_empty());
        assert!(ep.responses.is_empty());
        assert!(ep.request_body.is_none());
    }

    #[test]
    fn test_non_operation_keys_are_skipped() {
        let model = normalize(&doc(json!({
            "/pets": {
                "summary": "pets",
                "x-internal": true,
                "get": { "operationId": "listPets" },
                "POST": { "operationId": "createPet" }
            }
        })))
        .unwrap();
        let ids: Vec<&str> = model.endpoints.iter().map(|e| e.operation_id.as_str()).collect();
        assert_eq!(ids, ["listPets", "createPet"]);
        assert_eq!(model.endpoints[1].method, "POST");
    }

    #[test]
    fn test_referenced_parameter_fails_whole_document() {
        let err = normalize(&doc(json!({
            "/ok": { "get": { "operationId": "fine" } },
            "/pets": { "get": { "parameters": [ { "$ref": "#/components/parameters/Limit" } ] } }
        })))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedReference);
        assert!(err.to_string().contains("paths./pets.get.parameters[0]"));
    }

    #[test]
    fn test_referenced_response_fails() {
        let err = normalize(&doc(json!({
            "/pets": { "get": { "responses": { "404": { "$ref": "#/components/responses/NotFound" } } } }
        })))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedReference);
    }

    #[test]
    fn test_referenced_request_body_is_dropped() {
        let model = normalize(&doc(json!({
            "/pets": { "post": { "requestBody": { "$ref": "#/components/requestBodies/Pet" } } }
        })))
        .unwrap();
        assert!(model.endpoints[0].request_body.is_none());
    }

    #[test]
    fn test_path_level_parameters_merge() {
        let model = normalize(&doc(json!({
            "/pets/{id}": {
                "parameters": [
                    { "name": "id", "in": "path", "schema": { "type": "string" } },
                    { "name": "trace", "in": "header" }
                ],
                "get": {
                    "parameters": [
                        { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } },
                        { "name": "session", "in": "cookie" }
                    ]
                }
            }
        })))
        .unwrap();
        let params = &model.endpoints[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "id");
        assert_eq!(params[0].schema, Some(json!({ "type": "integer" })));
        assert_eq!(params[1].location, ParameterLocation::Header);
        assert!(!params[1].required);
    }

    #[test]
    fn test_path_parameter_required_by_default() {
        let model = normalize(&doc(json!({
            "/pets/{id}": { "get": { "parameters": [ { "name": "id", "in": "path" } ] } }
        })))
        .unwrap();
        assert!(model.endpoints[0].parameters[0].required);
    }

    #[test]
    fn test_schema_extraction_keeps_object_shapes() {
        let model = normalize(&json!({
            "info": { "title": "t", "version": "1" },
            "paths": {},
            "components": { "schemas": {
                "Pet": { "type": "object", "required": ["name"], "properties": { "name": { "type": "string" } } },
                "Empty": { "properties": {} },
                "Id": { "type": "string" },
                "Pets": { "type": "array", "items": { "$ref": "#/components/schemas/Pet" } }
            } }
        }))
        .unwrap();
        let names: Vec<&str> = model.schemas.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Pet", "Empty"]);
        assert!(model.schemas[0].is_required("name"));
        assert!(model.schemas[1].properties.is_empty());
    }

    #[test]
    fn test_missing_info_is_invalid_document() {
        let err = normalize(&json!({ "paths": {} })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDocument);
    }
}
