//! Client credentials and the capabilities header construction relies on.

use {
    crate::{
        error::Error,
        headers::Headers,
        options::RequestOptions,
        token::BearerToken,
    },
    log::*,
    reqwest::{header::HeaderMap, Method, Url},
    serde::{Deserialize, Serialize},
};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("TwitterHeaders/", env!("CARGO_PKG_VERSION"));

/// The default `User-Agent`, as an owned string for serde defaults.
#[inline]
pub fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

#[inline]
fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// OAuth 1.0a consumer and (optional) user credentials.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct Credentials {
    /// The consumer (application) key.
    pub consumer_key: String,

    /// The consumer (application) secret.
    pub consumer_secret: String,

    /// The user's access token.
    #[serde(default)]
    pub access_token: Option<String>,

    /// The user's access token secret.
    #[serde(default)]
    pub access_token_secret: Option<String>,
}

impl Credentials {
    /// Consumer-only credentials.
    pub fn new<K: Into<String>, S: Into<String>>(consumer_key: K, consumer_secret: S) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Default::default()
        }
    }

    /// Add the user's access token pair.
    pub fn with_access_token<T: Into<String>, S: Into<String>>(mut self, token: T, secret: S) -> Self {
        self.access_token = Some(token.into());
        self.access_token_secret = Some(secret.into());
        self
    }
}

/// What the header builder needs to know about a client.
pub trait Client {
    /// The configured `User-Agent`.
    fn user_agent(&self) -> &str;

    /// The consumer (application) key.
    fn consumer_key(&self) -> &str;

    /// The consumer (application) secret.
    fn consumer_secret(&self) -> &str;

    /// The user's access token, if any.
    fn access_token(&self) -> Option<&str>;

    /// The user's access token secret, if any.
    fn access_token_secret(&self) -> Option<&str>;

    /// Whether a user-level OAuth token pair is configured.
    fn user_token(&self) -> bool {
        present(self.access_token()) && present(self.access_token_secret())
    }

    /// Whether the client has enough credentials to make any authenticated request.
    fn credentials_present(&self) -> bool {
        present(Some(self.consumer_key())) && present(Some(self.consumer_secret())) && self.user_token()
    }

    /// The credentials handed to the OAuth signer, as `(option, value)` pairs.
    fn credentials(&self) -> Vec<(&'static str, String)> {
        let mut credentials = vec![
            ("consumer_key", self.consumer_key().to_string()),
            ("consumer_secret", self.consumer_secret().to_string()),
        ];

        if let Some(token) = self.access_token() {
            credentials.push(("token", token.to_string()));
        }

        if let Some(token_secret) = self.access_token_secret() {
            credentials.push(("token_secret", token_secret.to_string()));
        }

        credentials
    }

    /// The client's bearer-token capability, for clients that can authenticate with one.
    fn bearer_token_capability(&self) -> Option<&dyn BearerTokenCapable> {
        None
    }
}

/// Clients that can authenticate with an application-only bearer token.
pub trait BearerTokenCapable {
    /// The bearer token currently set on the client.
    fn bearer_token(&self) -> Option<&str>;

    /// A token obtained earlier from the token endpoint, used when no bearer token is set.
    fn fetched_token(&self) -> Option<&str>;

    /// Whether a bearer token is set.
    fn bearer_token_present(&self) -> bool {
        present(self.bearer_token())
    }

    /// The token to authenticate with: the set bearer token, or else the fetched one.
    fn resolve_bearer_token(&self) -> Option<BearerToken> {
        if self.bearer_token_present() {
            self.bearer_token().map(BearerToken::new)
        } else {
            self.fetched_token().map(BearerToken::new)
        }
    }
}

/// A client for the REST API. Authenticates with user OAuth credentials or an application bearer token.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RestClient {
    /// The `User-Agent` to send.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// OAuth credentials.
    #[serde(flatten)]
    pub credentials: Credentials,

    /// The bearer token in use; filled in from `fetched_token` on first use.
    #[serde(default)]
    pub bearer_token: Option<String>,

    /// The last token obtained from the token endpoint.
    #[serde(default, skip_serializing)]
    pub fetched_token: Option<String>,
}

impl RestClient {
    /// Create a client with the default user agent.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credentials,
            bearer_token: None,
            fetched_token: None,
        }
    }

    /// Set the `User-Agent`.
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the bearer token.
    pub fn with_bearer_token<S: Into<String>>(mut self, token: S) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Record a token obtained from the token endpoint.
    ///
    /// It is used for bearer authentication once no other bearer token is set.
    pub fn store_fetched_token(&mut self, token: BearerToken) {
        debug!("Storing fetched bearer token");
        self.fetched_token = Some(token.into_string());
    }

    /// Build the headers for a request and cache the bearer token it resolved.
    pub fn request_headers(&mut self, method: Method, url: &Url, options: &RequestOptions) -> Result<HeaderMap, Error> {
        let headers = Headers::new(&*self, method, url, options).request_headers()?;

        if let Some(token) = headers.bearer_token {
            if !self.bearer_token_present() {
                debug!("Caching resolved bearer token on client");
                self.bearer_token = Some(token.into_string());
            }
        }

        Ok(headers.headers)
    }
}

impl Client for RestClient {
    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn consumer_key(&self) -> &str {
        &self.credentials.consumer_key
    }

    fn consumer_secret(&self) -> &str {
        &self.credentials.consumer_secret
    }

    fn access_token(&self) -> Option<&str> {
        self.credentials.access_token.as_deref()
    }

    fn access_token_secret(&self) -> Option<&str> {
        self.credentials.access_token_secret.as_deref()
    }

    fn credentials_present(&self) -> bool {
        let oauth = present(Some(self.consumer_key())) && present(Some(self.consumer_secret())) && self.user_token();
        oauth || self.bearer_token_present()
    }

    fn bearer_token_capability(&self) -> Option<&dyn BearerTokenCapable> {
        Some(self)
    }
}

impl BearerTokenCapable for RestClient {
    fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    fn fetched_token(&self) -> Option<&str> {
        self.fetched_token.as_deref()
    }
}

/// A client for the streaming API. Only user OAuth credentials are accepted there.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct StreamingClient {
    /// The `User-Agent` to send.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// OAuth credentials.
    #[serde(flatten)]
    pub credentials: Credentials,
}

impl StreamingClient {
    /// Create a client with the default user agent.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            credentials,
        }
    }

    /// Set the `User-Agent`.
    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Client for StreamingClient {
    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn consumer_key(&self) -> &str {
        &self.credentials.consumer_key
    }

    fn consumer_secret(&self) -> &str {
        &self.credentials.consumer_secret
    }

    fn access_token(&self) -> Option<&str> {
        self.credentials.access_token.as_deref()
    }

    fn access_token_secret(&self) -> Option<&str> {
        self.credentials.access_token_secret.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use {
        super::{BearerTokenCapable, Client, Credentials, RestClient, StreamingClient, DEFAULT_USER_AGENT},
        crate::{oauth::OAuthOptions, token::BearerToken},
    };

    #[test_log::test]
    fn user_token_requires_both_halves() {
        let client = RestClient::new(Credentials::new("ck", "cs"));
        assert!(!client.user_token());

        let client = RestClient::new(Credentials::new("ck", "cs").with_access_token("at", ""));
        assert!(!client.user_token());

        let client = RestClient::new(Credentials::new("ck", "cs").with_access_token("at", "ats"));
        assert!(client.user_token());
        assert!(client.credentials_present());
    }

    #[test_log::test]
    fn rest_credentials_present_with_bearer_only() {
        let client = RestClient::new(Credentials::new("ck", "cs"));
        assert!(!client.credentials_present());

        let client = client.with_bearer_token("AAAA");
        assert!(client.credentials_present());
    }

    #[test_log::test]
    fn resolve_prefers_set_token() {
        let mut client = RestClient::new(Credentials::new("ck", "cs"));
        assert_eq!(client.resolve_bearer_token(), None);

        client.store_fetched_token(BearerToken::new("fetched"));
        assert_eq!(client.resolve_bearer_token(), Some(BearerToken::new("fetched")));

        let client = client.with_bearer_token("set");
        assert_eq!(client.resolve_bearer_token(), Some(BearerToken::new("set")));
    }

    #[test_log::test]
    fn streaming_client_has_no_bearer_capability() {
        let client = StreamingClient::new(Credentials::new("ck", "cs"));
        assert!(client.bearer_token_capability().is_none());
        assert_eq!(client.user_agent(), DEFAULT_USER_AGENT);

        let rest = RestClient::new(Credentials::new("ck", "cs"));
        assert!(rest.bearer_token_capability().is_some());
    }

    #[test_log::test]
    fn credentials_carry_tokens() {
        let client = StreamingClient::new(Credentials::new("ck", "cs").with_access_token("at", "ats"));
        let options = OAuthOptions::from_pairs(client.credentials(), true).unwrap();
        assert_eq!(options.consumer_key, "ck");
        assert_eq!(options.consumer_secret, "cs");
        assert_eq!(options.token.as_deref(), Some("at"));
        assert_eq!(options.token_secret.as_deref(), Some("ats"));

        let client = RestClient::new(Credentials::new("ck", "cs"));
        assert_eq!(client.credentials().len(), 2);
    }
}
