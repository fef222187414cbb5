use {
    crate::oauth::OAuthError,
    reqwest::header::InvalidHeaderValue,
    std::{
        error::Error as StdError,
        fmt::{Display, Formatter, Result as FmtResult},
    },
};

/// Errors produced while building request headers.
#[derive(Debug)]
pub enum Error {
    /// A computed header value contained characters that are not allowed in HTTP headers.
    InvalidHeaderValue {
        /// The header being set.
        header: &'static str,

        /// The underlying error.
        source: InvalidHeaderValue,
    },

    /// The OAuth 1.0a signer rejected its input.
    OAuth(OAuthError),

    /// Required configuration was missing or invalid.
    Config(String),

    /// A token endpoint response could not be decoded.
    Json(serde_json::Error),

    /// A token endpoint returned something other than a bearer token.
    UnexpectedTokenType(String),

    /// The underlying HTTP request could not be built.
    Request(reqwest::Error),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::InvalidHeaderValue {
                header,
                source,
            } => write!(f, "Invalid value for header {header}: {source}"),
            Self::OAuth(e) => write!(f, "OAuth signing failed: {e}"),
            Self::Config(msg) => write!(f, "Invalid configuration: {msg}"),
            Self::Json(e) => write!(f, "Invalid token response: {e}"),
            Self::UnexpectedTokenType(token_type) => write!(f, "Expected a bearer token, got token type {token_type:?}"),
            Self::Request(e) => write!(f, "Failed to build request: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidHeaderValue {
                source,
                ..
            } => Some(source),
            Self::OAuth(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Request(e) => Some(e),
            Self::Config(_) | Self::UnexpectedTokenType(_) => None,
        }
    }
}

impl From<OAuthError> for Error {
    fn from(e: OAuthError) -> Self {
        Self::OAuth(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Request(e)
    }
}
