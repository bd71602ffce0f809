use super::normalize::normalize;
use super::types::ApiModel;
use crate::error::{MissingInput, Result, ScaffoldError};
use serde_json::{Map, Number, Value};
use std::path::Path;
use tracing::{debug, info};

/// Decoder chosen from the spec file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecFormat {
    Json,
    Yaml,
}

impl SpecFormat {
    /// `.yaml` / `.yml` decode as YAML; everything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => SpecFormat::Yaml,
            _ => SpecFormat::Json,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpecFormat::Json => "json",
            SpecFormat::Yaml => "yaml",
        }
    }
}

/// Decode spec text into a generic tree.
///
/// YAML mapping keys that are numbers or booleans (an unquoted `200:` under
/// `responses`) are turned into strings so the tree has the same shape as the
/// JSON form of the same document.
pub fn decode_document(text: &str, format: SpecFormat, path: &Path) -> Result<Value> {
    let decode_err = |message: String| ScaffoldError::Decode {
        path: path.to_path_buf(),
        format: format.name(),
        message,
    };
    match format {
        SpecFormat::Json => serde_json::from_str(text).map_err(|e| decode_err(e.to_string())),
        SpecFormat::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| decode_err(e.to_string()))?;
            yaml_to_json(yaml).map_err(decode_err)
        }
    }
}

fn yaml_to_json(value: serde_yaml::Value) -> std::result::Result<Value, String> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(f)
                    .map(Value::Number)
                    .ok_or_else(|| format!("non-finite number {f} cannot be represented"))?
            }
        }
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(seq) => Value::Array(
            seq.into_iter()
                .map(yaml_to_json)
                .collect::<std::result::Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut out = Map::with_capacity(mapping.len());
            for (k, v) in mapping {
                let key = match k {
                    serde_yaml::Value::String(s) => s,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    other => return Err(format!("unsupported mapping key {other:?}")),
                };
                out.insert(key, yaml_to_json(v)?);
            }
            Value::Object(out)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

/// Read and decode the document at `path`.
pub fn load_document(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ScaffoldError::from(MissingInput::SpecNotFound(path.to_path_buf()))
        } else {
            ScaffoldError::io(path, e)
        }
    })?;
    let format = SpecFormat::from_path(path);
    debug!(path = %path.display(), format = format.name(), "decoding spec");
    decode_document(&text, format, path)
}

/// Load the document at `path` and normalize it into an [`ApiModel`].
pub fn load_spec(path: &Path) -> Result<ApiModel> {
    let document = load_document(path)?;
    let model = normalize(&document)?;
    info!(
        path = %path.display(),
        title = %model.metadata.title,
        endpoints = model.endpoints.len(),
        schemas = model.schemas.len(),
        "spec loaded"
    );
    Ok(model)
}
