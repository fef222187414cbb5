//! Authentication and content-negotiation headers for Twitter API requests.
//!
//! [`Headers`] picks one authorization strategy per request: an OAuth 1.0a signature when the client has a
//! user token, HTTP Basic over the consumer credentials when the request obtains a bearer token, or an
//! application-only bearer token otherwise.
//!
//! ```
//! use twitter_headers::{Credentials, Headers, RequestOptions, RestClient};
//! use reqwest::{header::AUTHORIZATION, Method, Url};
//!
//! let client = RestClient::new(Credentials::new("ck", "cs"));
//! let url = Url::parse("https://api.twitter.com/oauth2/token").unwrap();
//! let options = RequestOptions::default().bearer_token_request(true);
//! let headers = Headers::new(&client, Method::POST, &url, &options).request_headers().unwrap();
//! assert_eq!(headers.headers.get(AUTHORIZATION).unwrap(), "Basic Y2s6Y3M=");
//! ```
#![warn(clippy::all)]
#![deny(rustdoc::missing_crate_level_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

/// Client credentials and capabilities.
pub mod client;

/// Client configuration.
pub mod config;

/// Error types.
pub mod error;

/// The request header builder.
pub mod headers;

/// reqwest integration.
pub mod httpext;

/// OAuth 1.0a request signing.
pub mod oauth;

/// Request parameters and flags.
pub mod options;

/// Bearer token requests and responses.
pub mod token;

pub use {
    client::{BearerTokenCapable, Client, Credentials, RestClient, StreamingClient, DEFAULT_USER_AGENT},
    config::ClientConfig,
    error::Error,
    headers::{AuthStrategy, Headers, RequestHeaders},
    oauth::{OAuthError, OAuthHeader, OAuthOptions, SignatureMethod},
    options::{ParamValue, Params, RequestOptions},
    token::{invalidate_token_request, token_request, BearerToken, TokenRequest},
};

use std::error::Error as StdError;

/// Dynamic error type that is safe to send across threads.
pub type BoxError = Box<dyn StdError + Send + Sync>;
