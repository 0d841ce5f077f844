//! Config loading failures.

use std::path::PathBuf;
use thiserror::Error;

/// Why an assistant config could not be produced.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or the working directory could not be read.
    #[error("cannot read {}: {source}", path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// JSON5 syntax error in a layer, labelled with its origin.
    #[error("cannot parse {origin}: {source}")]
    ParseFailed {
        origin: String,
        #[source]
        source: json5::Error,
    },
    /// The merged document does not fit the config model.
    #[error("config does not match the assistant model: {0}")]
    DecodeFailed(#[from] serde_json::Error),
    /// A field has the wrong shape, addressed as `layer:dotted.path`.
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
    /// A well-formed value breaks a config rule.
    #[error("{field} {requirement}")]
    Constraint {
        field: &'static str,
        requirement: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::ReadFailed {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(origin: impl Into<String>, source: json5::Error) -> Self {
        Self::ParseFailed {
            origin: origin.into(),
            source,
        }
    }
}
