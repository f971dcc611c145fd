//! Error types for share-link parsing and registry operations.

use std::num::ParseIntError;

use thiserror::Error;

/// Errors produced while registering parsers or turning a share link into a
/// [`Provider`](crate::provider::Provider).
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid URI")]
    InvalidUri(#[from] url::ParseError),

    #[error("unsupported scheme {scheme:?} (supported: {})", .supported.join(", "))]
    UnsupportedScheme {
        scheme: String,
        supported: Vec<String>,
    },

    #[error("parser scheme is empty")]
    EmptyScheme,

    #[error("duplicate scheme: parser already registered for scheme {0:?}")]
    DuplicateScheme(String),

    #[error("{scheme} URI missing user id")]
    MissingUserId { scheme: &'static str },

    #[error("{scheme} URI has empty user id")]
    EmptyUserId { scheme: &'static str },

    #[error("{scheme} host/port parse failed")]
    HostPort {
        scheme: &'static str,
        #[source]
        source: HostPortError,
    },

    #[error("invalid {scheme} port")]
    InvalidPort {
        scheme: &'static str,
        #[source]
        source: ParseIntError,
    },

    #[error("invalid vmess URI")]
    InvalidVmessUri,

    #[error("{scheme} base64 decode failed")]
    Base64 {
        scheme: &'static str,
        #[source]
        source: base64::DecodeError,
    },

    #[error("vmess JSON decode failed")]
    Json(#[source] serde_json::Error),

    #[error("invalid vmess port")]
    InvalidVmessPort(#[source] NumericFieldError),

    #[error("vmess JSON missing add/port/id")]
    MissingVmessFields,

    #[error("{scheme} port out of range: {port}")]
    PortOutOfRange { scheme: &'static str, port: i64 },

    #[error("ss URI missing method/password")]
    MissingCredentials,

    #[error("invalid ss port")]
    InvalidSsPort,
}

/// Reasons a `host:port` authority could not be split.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostPortError {
    #[error("missing port in address {0:?}")]
    MissingPort(String),

    #[error("too many colons in address {0:?}")]
    TooManyColons(String),

    #[error("missing ']' in address {0:?}")]
    MissingBracket(String),

    #[error("unexpected '[' or ']' in address {0:?}")]
    UnexpectedBracket(String),
}

/// Reasons a number-or-numeric-string field could not be coerced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumericFieldError {
    #[error("empty field")]
    Empty,

    #[error("empty string")]
    EmptyString,

    #[error("{0:?} is not an integer")]
    NotAnInteger(String),

    #[error("expected number or numeric string")]
    WrongType,
}

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;
