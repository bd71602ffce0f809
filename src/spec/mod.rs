//! # Spec Module
//!
//! Loading and normalization of OpenAPI 3.x documents.
//!
//! ```text
//! openapi.yaml ──load_document──▶ serde_json::Value ──normalize──▶ ApiModel ──partition_by_tag──▶ Vec<TagGroup>
//! ```
//!
//! - [`load_document`] decodes the file (YAML for `.yaml`/`.yml`, JSON otherwise)
//! - [`normalize()`] produces the immutable [`ApiModel`]
//! - [`partition_by_tag`] splits endpoints into per-tag output groups
//!
//! `$ref` parameters and responses are rejected; `$ref` request bodies are
//! ignored. No other reference resolution takes place.

mod load;
mod normalize;
mod partition;
mod types;

pub use load::{decode_document, load_document, load_spec, SpecFormat};
pub use normalize::{normalize, synthesize_operation_id, HTTP_METHODS};
pub use partition::{partition_by_tag, TagGroup};
pub use types::*;
