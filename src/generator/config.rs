//! Output layout configuration for scaffolding
//!
//! Projects can adjust where generated files land via a `scaffold.toml` that
//! sits alongside the OpenAPI spec:
//!
//! ```toml
//! [output]
//! extension = "ts"
//! source_dir = "src"
//! routes_dir = "routes"
//! db_dir = "db"
//! ```
//!
//! Every key is optional; a missing file means the defaults above.

use crate::error::{Result, ScaffoldError};
use crate::spec::DEFAULT_TAG;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// File name looked up next to the spec.
pub const CONFIG_FILE_NAME: &str = "scaffold.toml";

/// Configuration loaded from `scaffold.toml`
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ScaffoldConfig {
    /// Where generated files are placed
    #[serde(default)]
    pub output: OutputLayout,
}

/// Relative locations and extension of generated artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputLayout {
    /// Extension of endpoint/schema-derived files, without the dot
    pub extension: String,
    /// Source root inside the generated app
    #[serde(rename = "source_dir")]
    pub src_dir: String,
    /// Directory under the source root holding per-tag files
    pub routes_dir: String,
    /// Directory under the source root holding the storage schema
    pub db_dir: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            extension: "ts".to_string(),
            src_dir: "src".to_string(),
            routes_dir: "routes".to_string(),
            db_dir: "db".to_string(),
        }
    }
}

impl OutputLayout {
    /// File stem for a tag: the tag lower-cased, with every character other
    /// than ASCII letters, digits, `-` and `_` replaced by `_`. Tags come
    /// straight from the document, so separators and dots never reach a path.
    pub fn tag_stem(tag: &str) -> String {
        let stem: String = tag
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if stem.is_empty() {
            DEFAULT_TAG.to_string()
        } else {
            stem
        }
    }

    fn routes_root(&self) -> PathBuf {
        Path::new(&self.src_dir).join(&self.routes_dir)
    }

    /// `<src>/<db>/schema.<ext>`
    pub fn schema_path(&self) -> PathBuf {
        Path::new(&self.src_dir)
            .join(&self.db_dir)
            .join(format!("schema.{}", self.extension))
    }

    /// `<src>/<routes>/<tag>.routes.<ext>`
    pub fn routes_path(&self, tag: &str) -> PathBuf {
        self.routes_root()
            .join(format!("{}.{}", self.routes_module(tag), self.extension))
    }

    /// `<src>/<routes>/<tag>.handlers.<ext>`
    pub fn handlers_path(&self, tag: &str) -> PathBuf {
        self.routes_root()
            .join(format!("{}.{}", self.handlers_module(tag), self.extension))
    }

    /// `<src>/<routes>/<tag>.index.<ext>`
    pub fn router_path(&self, tag: &str) -> PathBuf {
        self.routes_root()
            .join(format!("{}.{}", self.router_module(tag), self.extension))
    }

    /// `<src>/<routes>/index.<ext>`
    pub fn route_index_path(&self) -> PathBuf {
        self.routes_root().join(format!("index.{}", self.extension))
    }

    pub fn routes_module(&self, tag: &str) -> String {
        format!("{}.routes", Self::tag_stem(tag))
    }

    pub fn handlers_module(&self, tag: &str) -> String {
        format!("{}.handlers", Self::tag_stem(tag))
    }

    pub fn router_module(&self, tag: &str) -> String {
        format!("{}.index", Self::tag_stem(tag))
    }

    /// Relative import prefix from the routes directory back to the source root,
    /// e.g. `../` for `routes`, `../../` for `api/routes`.
    pub fn src_root_import(&self) -> String {
        let depth = Path::new(&self.routes_dir)
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .count();
        if depth == 0 {
            "./".to_string()
        } else {
            "../".repeat(depth)
        }
    }

    /// Import specifier of the database module as seen from the routes directory.
    pub fn db_module(&self) -> String {
        format!("{}{}", self.src_root_import(), self.db_dir)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let err = |message: String| ScaffoldError::Config {
            path: path.to_path_buf(),
            message,
        };
        if self.extension.is_empty() || self.extension.contains(['.', '/', '\\']) {
            return Err(err(format!(
                "output.extension must be a bare extension, got '{}'",
                self.extension
            )));
        }
        for (key, dir) in [
            ("source_dir", &self.src_dir),
            ("routes_dir", &self.routes_dir),
            ("db_dir", &self.db_dir),
        ] {
            let escapes = Path::new(dir)
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
            if dir.is_empty() || escapes {
                return Err(err(format!(
                    "output.{key} must be a relative path inside the app, got '{dir}'"
                )));
            }
        }
        Ok(())
    }
}

/// Load a configuration file.
///
/// Returns `Ok(None)` if the file doesn't exist, and a
/// [`ScaffoldError::Config`] if it exists but fails to read, parse or
/// validate.
pub fn load_config(config_path: &Path) -> Result<Option<ScaffoldConfig>> {
    if !config_path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(config_path).map_err(|e| ScaffoldError::Config {
        path: config_path.to_path_buf(),
        message: e.to_string(),
    })?;

    let config: ScaffoldConfig = toml::from_str(&contents).map_err(|e| ScaffoldError::Config {
        path: config_path.to_path_buf(),
        message: e.to_string(),
    })?;
    config.output.validate(config_path)?;

    debug!(path = %config_path.display(), ?config, "loaded scaffold config");
    Ok(Some(config))
}

/// `scaffold.toml` in the same directory as the spec, if present.
pub fn detect_config_path(spec_path: &Path) -> Option<PathBuf> {
    let candidate = spec_path.parent()?.join(CONFIG_FILE_NAME);
    candidate.exists().then_some(candidate)
}

/// Resolve the effective configuration.
///
/// An explicit path must exist; otherwise the file next to the spec is used
/// when present, and defaults apply when it is not.
pub fn resolve_config(explicit: Option<&Path>, spec_path: &Path) -> Result<ScaffoldConfig> {
    if let Some(path) = explicit {
        return load_config(path)?.ok_or_else(|| ScaffoldError::Config {
            path: path.to_path_buf(),
            message: "file not found".to_string(),
        });
    }
    match detect_config_path(spec_path) {
        Some(path) => Ok(load_config(&path)?.unwrap_or_default()),
        None => Ok(ScaffoldConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let layout = OutputLayout::default();
        assert_eq!(layout.schema_path(), PathBuf::from("src/db/schema.ts"));
        assert_eq!(layout.routes_path("Pets"), PathBuf::from("src/routes/pets.routes.ts"));
        assert_eq!(layout.handlers_path("Pets"), PathBuf::from("src/routes/pets.handlers.ts"));
        assert_eq!(layout.router_path("Pets"), PathBuf::from("src/routes/pets.index.ts"));
        assert_eq!(layout.route_index_path(), PathBuf::from("src/routes/index.ts"));
        assert_eq!(layout.db_module(), "../db");
    }

    #[test]
    fn test_tag_stem_stays_a_single_path_segment() {
        assert_eq!(OutputLayout::tag_stem("Pets"), "pets");
        assert_eq!(OutputLayout::tag_stem("pet-store_v2"), "pet-store_v2");
        assert_eq!(OutputLayout::tag_stem("Pet Store"), "pet_store");
        assert_eq!(OutputLayout::tag_stem("../../../pwned"), "_________pwned");
        assert_eq!(OutputLayout::tag_stem("a\\b"), "a_b");
        assert_eq!(OutputLayout::tag_stem(""), DEFAULT_TAG);

        let layout = OutputLayout::default();
        let path = layout.routes_path("../../../pwned");
        assert_eq!(path, PathBuf::from("src/routes/_________pwned.routes.ts"));
        assert!(path.components().all(|c| matches!(c, Component::Normal(_))));
    }

    #[test]
    fn test_nested_routes_dir_import_prefix() {
        let layout = OutputLayout {
            routes_dir: "api/routes".into(),
            ..OutputLayout::default()
        };
        assert_eq!(layout.src_root_import(), "../../");
        assert_eq!(layout.db_module(), "../../db");
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap().is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let spec = dir.path().join("openapi.yaml");
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[output]\nextension = \"mts\"\n").unwrap();
        let config = resolve_config(None, &spec).unwrap();
        assert_eq!(config.output.extension, "mts");
        assert_eq!(config.output.src_dir, "src");
        assert_eq!(config.output.schema_path(), PathBuf::from("src/db/schema.mts"));
    }

    #[test]
    fn test_invalid_config_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "[output]\nroutes_dir = \"../escape\"\n").unwrap();
        assert_eq!(load_config(&path).unwrap_err().kind(), ErrorKind::Config);

        fs::write(&path, "[output\n").unwrap();
        assert_eq!(load_config(&path).unwrap_err().kind(), ErrorKind::Config);
    }

    #[test]
    fn test_explicit_missing_config_errors() {
        let err = resolve_config(Some(Path::new("/nope/scaffold.toml")), Path::new("x.yaml"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
