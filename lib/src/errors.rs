//! The error taxonomy shared by every repository operation.
//!
//! Status codes are classified into these variants exactly once, right after the
//! response arrives (see [`crate::status`]); layers above only propagate them.

use crate::config::ConfigBuilderError;
use oxigraph::io::RdfParseError;
use oxigraph::model::IriParseError;
use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("resource {uri} does not exist")]
    NotFound { uri: String },

    #[error("request for resource {uri} is not authorized")]
    Forbidden { uri: String },

    #[error("server rejected the request for resource {uri}")]
    BadRequest { uri: String },

    #[error("resource {uri} already exists")]
    AlreadyExists { uri: String },

    #[error("{method} attempted using a read-only repository")]
    ReadOnly { method: String },

    #[error("fixity check failed for resource {uri}")]
    FixityMismatch { uri: String },

    #[error("conflicting request for resource {uri}: {reason}")]
    Conflict { uri: String, reason: String },

    #[error("unexpected response for resource {uri}: {} {reason}", .status.as_u16())]
    Protocol {
        uri: String,
        status: StatusCode,
        reason: String,
    },

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("response for {uri} is missing the {header} header")]
    MissingHeader { uri: String, header: &'static str },

    #[error("location {0} is outside the repository")]
    UnexpectedLocation(String),

    #[error("invalid value {value:?} for property {property}")]
    InvalidProperty { property: String, value: String },

    #[error("unsupported RDF media type {0}")]
    UnsupportedFormat(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse RDF: {0}")]
    Parse(#[from] RdfParseError),

    #[error(transparent)]
    Iri(#[from] IriParseError),

    #[error(transparent)]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigBuilderError),
}

impl Error {
    /// True for failures a caller may reasonably retry: the request never got a
    /// classified answer from the server. Status-derived errors are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Io(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// The HTTP status behind this error, when it came from a classified response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::BadRequest { .. } => Some(StatusCode::BAD_REQUEST),
            Error::Forbidden { .. } => Some(StatusCode::FORBIDDEN),
            Error::NotFound { .. } => Some(StatusCode::NOT_FOUND),
            Error::AlreadyExists { .. } | Error::FixityMismatch { .. } | Error::Conflict { .. } => {
                Some(StatusCode::CONFLICT)
            }
            Error::Protocol { status, .. } => Some(*status),
            _ => None,
        }
    }
}
