//! # Error Taxonomy
//!
//! Every fallible operation in the scaffolding pipeline returns a
//! [`ScaffoldError`]. All of them are fatal for a generation run: nothing is
//! retried and nothing already written is rolled back.
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | [`ErrorKind::UnsupportedReference`] | a parameter or response is a `$ref` |
//! | [`ErrorKind::MissingInput`] | target exists, spec missing, bad app name, zero endpoints |
//! | [`ErrorKind::Decode`] | the spec is not valid JSON/YAML for the chosen decoder |
//! | [`ErrorKind::InvalidDocument`] | the decoded tree does not have the expected shape |
//! | [`ErrorKind::Render`] | a template fails to compile or render |
//! | [`ErrorKind::Config`] | `scaffold.toml` exists but cannot be read or parsed |
//! | [`ErrorKind::Io`] | persisting output fails |

use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;

/// Coarse classification of a [`ScaffoldError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A cross-reference where an inline definition is required
    UnsupportedReference,
    /// An operator-supplied input is missing or unusable
    MissingInput,
    /// The spec text could not be decoded
    Decode,
    /// The decoded document has an unexpected shape
    InvalidDocument,
    /// Template compilation or rendering failed
    Render,
    /// The layout configuration could not be loaded
    Config,
    /// File system failure while persisting output
    Io,
}

/// The operator-facing input problems that abort a run before generation.
#[derive(Debug, thiserror::Error)]
pub enum MissingInput {
    /// The application directory is already present
    #[error("target directory {} already exists", .0.display())]
    TargetExists(PathBuf),
    /// The OpenAPI document path does not exist
    #[error("spec file {} does not exist", .0.display())]
    SpecNotFound(PathBuf),
    /// The application name contains disallowed characters
    #[error("invalid app name '{0}': use letters, digits, '-' and '_' (must start with a letter or digit)")]
    InvalidAppName(String),
    /// The spec declares no operations at all
    #[error("the spec declares no endpoints to scaffold")]
    NoEndpoints,
}

/// Error type for spec loading, normalization, rendering and emission.
#[derive(Debug, thiserror::Error)]
pub enum ScaffoldError {
    /// A parameter or response is declared through `$ref`
    #[error("unsupported reference '{reference}' at {location}: inline the definition instead")]
    UnsupportedReference {
        /// Where the reference was found, e.g. `paths./pets.get.parameters[0]`
        location: String,
        /// The `$ref` target as written in the document
        reference: String,
    },

    /// See [`MissingInput`]
    #[error(transparent)]
    MissingInput(#[from] MissingInput),

    /// The document could not be decoded as JSON or YAML
    #[error("failed to decode {} as {format}: {message}", path.display())]
    Decode {
        /// Spec path
        path: PathBuf,
        /// `json` or `yaml`
        format: &'static str,
        /// Decoder message
        message: String,
    },

    /// The decoded tree does not match the OpenAPI shape the normalizer walks
    #[error("invalid OpenAPI document at {location}: {reason}")]
    InvalidDocument {
        /// Path inside the document
        location: String,
        /// What was expected
        reason: String,
    },

    /// A template failed to compile or render
    #[error("failed to render template '{template}': {source}")]
    Render {
        /// Template name
        template: String,
        /// Engine error
        #[source]
        source: minijinja::Error,
    },

    /// The layout configuration file is unreadable or malformed
    #[error("invalid configuration {}: {message}", path.display())]
    Config {
        /// Config file path
        path: PathBuf,
        /// Parser or I/O message
        message: String,
    },

    /// Reading or writing a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ScaffoldError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScaffoldError::UnsupportedReference { .. } => ErrorKind::UnsupportedReference,
            ScaffoldError::MissingInput(_) => ErrorKind::MissingInput,
            ScaffoldError::Decode { .. } => ErrorKind::Decode,
            ScaffoldError::InvalidDocument { .. } => ErrorKind::InvalidDocument,
            ScaffoldError::Render { .. } => ErrorKind::Render,
            ScaffoldError::Config { .. } => ErrorKind::Config,
            ScaffoldError::Io { .. } => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid(location: impl Into<String>, reason: impl Into<String>) -> Self {
        ScaffoldError::InvalidDocument {
            location: location.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScaffoldError::Io {
            path: path.into(),
            source,
        }
    }
}
