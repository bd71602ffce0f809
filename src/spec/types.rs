use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Tag assigned to operations that declare none.
pub const DEFAULT_TAG: &str = "default";

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl ParameterLocation {
    /// Parse the OpenAPI `in` value. `cookie` and unknown locations yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One inline operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// Raw schema, passed through for the type tables
    pub schema: Option<Value>,
}

/// A media type entry of a request body or response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaContent {
    pub media_type: String,
    pub schema: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBodyDescriptor {
    pub required: bool,
    pub content: Vec<MediaContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseDescriptor {
    /// Status key as written in the document (`"200"`, `"default"`, ...)
    pub status_code: String,
    pub description: String,
    pub content: Option<Vec<MediaContent>>,
}

/// One HTTP operation after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointDescriptor {
    /// URL template exactly as declared, `{param}` placeholders included
    pub path: String,
    /// Uppercase HTTP verb
    pub method: String,
    pub operation_id: String,
    /// Never empty; the first entry decides the output group
    pub tags: Vec<String>,
    pub parameters: Vec<ParameterDescriptor>,
    pub request_body: Option<RequestBodyDescriptor>,
    pub responses: Vec<ResponseDescriptor>,
}

impl EndpointDescriptor {
    /// The tag that decides which output group this endpoint belongs to.
    pub fn primary_tag(&self) -> &str {
        self.tags.first().map(String::as_str).unwrap_or(DEFAULT_TAG)
    }

    /// Parameters carried at `location`, in declaration order.
    pub fn parameters_in(
        &self,
        location: ParameterLocation,
    ) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}

/// A named reusable object schema from `components.schemas`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaDescriptor {
    pub name: String,
    /// Property name to raw property schema, in declaration order
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

impl SchemaDescriptor {
    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}

/// The `info` block, copied verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecMetadata {
    pub title: String,
    pub version: String,
    pub description: Option<String>,
}

/// The normalized, template-ready description of one OpenAPI document.
///
/// Built once by [`crate::spec::normalize`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiModel {
    pub endpoints: Vec<EndpointDescriptor>,
    pub schemas: Vec<SchemaDescriptor>,
    pub metadata: SpecMetadata,
}
