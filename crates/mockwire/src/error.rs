//! Error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn a request into its wire document.
///
/// Every leaf of the document is a string, a boolean or a nested document of
/// the same kind, so this only surfaces if a serializer rejects one of them.
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("failed to encode `{path}`: {source}")]
    Section {
        /// Location in the document, e.g. `headers.Accept` or `multipartPatterns[1]`.
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize request document: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl EncodeError {
    pub(crate) fn section(path: impl Into<String>, source: serde_json::Error) -> Self {
        EncodeError::Section {
            path: path.into(),
            source,
        }
    }

    /// Document path of the failing section, if known.
    pub fn path(&self) -> Option<&str> {
        match self {
            EncodeError::Section { path, .. } => Some(path),
            EncodeError::Serialize(_) => None,
        }
    }
}

/// Failure to load a request definition.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not well-formed YAML.
    #[error("invalid YAML{}: {source}", origin(.path))]
    Yaml {
        path: Option<PathBuf>,
        #[source]
        source: serde_yaml::Error,
    },
    /// Malformed JSON, or a document that does not describe a request.
    #[error("invalid request definition{}: {source}", origin(.path))]
    Invalid {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported definition format for {} (expected .json, .yaml or .yml)", .0.display())]
    UnsupportedFormat(PathBuf),
}

impl DefinitionError {
    /// File the definition was loaded from, when it came from a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DefinitionError::Io { path, .. } | DefinitionError::UnsupportedFormat(path) => {
                Some(path)
            }
            DefinitionError::Yaml { path, .. } | DefinitionError::Invalid { path, .. } => {
                path.as_deref()
            }
        }
    }
}

fn origin(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_error() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{").unwrap_err()
    }

    #[test]
    fn test_section_error_carries_path() {
        let err = EncodeError::section("headers.X-Ids", json_error());
        assert_eq!(err.path(), Some("headers.X-Ids"));
        assert!(err.to_string().starts_with("failed to encode `headers.X-Ids`"));
    }

    #[test]
    fn test_definition_error_names_file() {
        let err = DefinitionError::Invalid {
            path: Some(PathBuf::from("stubs/orders.json")),
            source: json_error(),
        };
        assert_eq!(err.path(), Some(Path::new("stubs/orders.json")));
        assert!(err.to_string().starts_with("invalid request definition in stubs/orders.json: "));

        let inline = DefinitionError::Invalid {
            path: None,
            source: json_error(),
        };
        assert_eq!(inline.path(), None);
        assert!(inline.to_string().starts_with("invalid request definition: "));
    }

    #[test]
    fn test_serialize_error_has_no_path() {
        let err = EncodeError::from(json_error());
        assert_eq!(err.path(), None);
    }
}
