//! Lookup tables from OpenAPI primitive types to emitted TypeScript.
//!
//! Three tables, all stateless:
//!
//! | OpenAPI type | storage (Drizzle SQLite)            | validation (Zod)             |
//! |--------------|-------------------------------------|------------------------------|
//! | `string`     | `text(col)`                         | `z.string()`                 |
//! | `integer`    | `integer(col)`                      | `z.number().int()`           |
//! | `number`     | `real(col)`                         | `z.number()`                 |
//! | `boolean`    | `integer(col, { mode: "boolean" })` | `z.boolean()`                |
//! | `array`      | `text(col)`                         | `z.array(<items>)`           |
//! | other        | `text(col)`                         | `z.unknown()`                |
//!
//! plus [`status_code_constant`] for response keys.

use serde_json::Value;

/// Module alias the generated files import status constants under.
pub const STATUS_CODES_IMPORT: &str = "HttpStatusCodes";

/// Column kind used for a property in the storage schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    Text,
    Integer,
    Real,
    Boolean,
}

impl StorageType {
    /// Unknown and missing types fall back to [`StorageType::Text`].
    pub fn from_openapi(ty: Option<&str>) -> Self {
        match ty {
            Some("string") => StorageType::Text,
            Some("integer") => StorageType::Integer,
            Some("number") => StorageType::Real,
            Some("boolean") => StorageType::Boolean,
            _ => StorageType::Text,
        }
    }

    /// Drizzle column builder call for `column`.
    pub fn expression(&self, column: &str) -> String {
        match self {
            StorageType::Text => format!("text(\"{column}\")"),
            StorageType::Integer => format!("integer(\"{column}\")"),
            StorageType::Real => format!("real(\"{column}\")"),
            StorageType::Boolean => format!("integer(\"{column}\", {{ mode: \"boolean\" }})"),
        }
    }
}

/// Storage column expression for a property of OpenAPI type `ty`.
pub fn storage_column(ty: Option<&str>, column: &str) -> String {
    StorageType::from_openapi(ty).expression(column)
}

/// Zod expression validating values of `schema`.
///
/// Arrays recurse into `items`; an array without `items` validates
/// `z.array(z.unknown())`.
pub fn validator_expression(schema: &Value) -> String {
    match schema.get("type").and_then(Value::as_str) {
        Some("string") => "z.string()".to_string(),
        Some("number") => "z.number()".to_string(),
        Some("integer") => "z.number().int()".to_string(),
        Some("boolean") => "z.boolean()".to_string(),
        Some("array") => {
            let items = schema
                .get("items")
                .map(validator_expression)
                .unwrap_or_else(|| "z.unknown()".to_string());
            format!("z.array({items})")
        }
        _ => "z.unknown()".to_string(),
    }
}

/// Symbolic name for the status codes the generated app imports.
pub fn status_code_constant(code: &str) -> Option<&'static str> {
    match code {
        "200" => Some("OK"),
        "201" => Some("CREATED"),
        "204" => Some("NO_CONTENT"),
        "400" => Some("BAD_REQUEST"),
        "401" => Some("UNAUTHORIZED"),
        "404" => Some("NOT_FOUND"),
        "422" => Some("UNPROCESSABLE_ENTITY"),
        "500" => Some("INTERNAL_SERVER_ERROR"),
        _ => None,
    }
}

/// Expression used as a response key: `HttpStatusCodes.OK` for known codes,
/// the bare numeral for other numeric codes, a quoted literal otherwise.
pub fn status_code_expression(code: &str) -> String {
    if let Some(name) = status_code_constant(code) {
        format!("{STATUS_CODES_IMPORT}.{name}")
    } else if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) {
        code.to_string()
    } else {
        format!("\"{code}\"")
    }
}
