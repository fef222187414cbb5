mod encode;
mod header;
mod signature;

pub use {encode::*, header::*, signature::*};

use std::{
    error::Error,
    fmt::{Display, Formatter, Result as FmtResult},
};

/// Errors raised by the OAuth 1.0a signer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum OAuthError {
    /// An option key was not recognized and extra keys were not being ignored.
    UnknownOption(String),

    /// An option was supplied with a value it cannot take.
    InvalidOption(String),

    /// A required option was not supplied.
    MissingOption(&'static str),

    /// The signature method is not one this signer implements.
    UnsupportedSignatureMethod(String),

    /// An `Authorization` header could not be parsed.
    MalformedHeader(String),
}

impl Display for OAuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::UnknownOption(key) => write!(f, "Unknown OAuth option: {key}"),
            Self::InvalidOption(reason) => write!(f, "Invalid OAuth option: {reason}"),
            Self::MissingOption(key) => write!(f, "Missing OAuth option: {key}"),
            Self::UnsupportedSignatureMethod(method) => write!(f, "Unsupported signature method: {method}"),
            Self::MalformedHeader(reason) => write!(f, "Malformed OAuth header: {reason}"),
        }
    }
}

impl Error for OAuthError {}
