use {
    crate::{
        client::Client,
        error::Error,
        oauth::{OAuthHeader, OAuthOptions},
        options::RequestOptions,
        token::BearerToken,
    },
    base64::prelude::*,
    log::*,
    reqwest::{
        header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, AUTHORIZATION, USER_AGENT},
        Method, Url,
    },
    std::fmt::{Display, Formatter, Result as FmtResult},
};

const HEADER_USER_AGENT: &str = "user-agent";
const HEADER_AUTHORIZATION: &str = "authorization";

/// `Accept-Encoding` sent when a compressed response is requested.
pub const ACCEPT_ENCODING_GZIP: &str = "deflate, gzip";

/// `Accept` sent on bearer-token requests.
pub const ACCEPT_ANY: &str = "*/*";

/// How a request is authorized. Exactly one applies to any request.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AuthStrategy {
    /// OAuth 1.0a signature with the user's token.
    OAuth1,

    /// HTTP Basic over the consumer credentials, used to obtain or invalidate a bearer token.
    BearerTokenCredentials,

    /// An application-only bearer token.
    Bearer,

    /// No credentials that can authorize the request.
    None,
}

impl Display for AuthStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::OAuth1 => f.write_str("OAuth1"),
            Self::BearerTokenCredentials => f.write_str("BearerTokenCredentials"),
            Self::Bearer => f.write_str("Bearer"),
            Self::None => f.write_str("None"),
        }
    }
}

/// The headers for one request, plus the bearer token they were built with.
#[derive(Debug)]
pub struct RequestHeaders {
    /// Headers to attach to the request.
    pub headers: HeaderMap,

    /// The bearer token resolved for this request, when bearer authentication was used.
    ///
    /// Callers that cache tokens on the client store this.
    pub bearer_token: Option<BearerToken>,
}

/// Builds the headers for a single request to the API.
///
/// Nothing is mutated: a bearer token resolved from the client's fetched token is handed back in
/// [`RequestHeaders::bearer_token`] for the caller to cache.
#[derive(Debug)]
pub struct Headers<'a, C: Client + ?Sized> {
    client: &'a C,
    method: Method,
    url: &'a Url,
    options: &'a RequestOptions,
}

impl<'a, C: Client + ?Sized> Headers<'a, C> {
    /// Prepare headers for `method url` with `options`.
    pub fn new(client: &'a C, method: Method, url: &'a Url, options: &'a RequestOptions) -> Self {
        Self {
            client,
            method,
            url,
            options,
        }
    }

    /// Whether this request obtains or invalidates a bearer token.
    #[inline(always)]
    pub fn bearer_token_request(&self) -> bool {
        self.options.bearer_token_request
    }

    /// Whether a compressed response is requested.
    #[inline(always)]
    pub fn gzip_request(&self) -> bool {
        self.options.gzip_request
    }

    /// The strategy that authorizes this request.
    pub fn auth_strategy(&self) -> AuthStrategy {
        if self.bearer_token_request() {
            AuthStrategy::BearerTokenCredentials
        } else if self.client.user_token() {
            AuthStrategy::OAuth1
        } else if self.client.bearer_token_capability().and_then(|c| c.resolve_bearer_token()).is_some() {
            AuthStrategy::Bearer
        } else {
            AuthStrategy::None
        }
    }

    /// The OAuth 1.0a header for this request, signed with the client's credentials.
    ///
    /// Credential keys the signer does not know are ignored.
    pub fn oauth_auth_header(&self) -> Result<OAuthHeader, Error> {
        let credentials = OAuthOptions::from_pairs(self.client.credentials(), true)?;
        Ok(OAuthHeader::new(self.method.clone(), self.url, &self.options.params, credentials))
    }

    /// Build the headers.
    pub fn request_headers(&self) -> Result<RequestHeaders, Error> {
        let mut headers = HeaderMap::new();
        let mut bearer_token = None;

        headers.insert(USER_AGENT, header_value(HEADER_USER_AGENT, self.client.user_agent())?);

        if self.gzip_request() {
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static(ACCEPT_ENCODING_GZIP));
        }

        let strategy = self.auth_strategy();
        let authorization = match strategy {
            AuthStrategy::BearerTokenCredentials => {
                headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_ANY));
                Some(self.bearer_token_credentials_auth_header())
            }
            AuthStrategy::OAuth1 => Some(self.oauth_auth_header()?.to_string()),
            AuthStrategy::Bearer => {
                let token = self.client.bearer_token_capability().and_then(|c| c.resolve_bearer_token());
                let value = token.as_ref().map(bearer_auth_header);
                bearer_token = token;
                value
            }
            AuthStrategy::None => None,
        };

        match authorization {
            Some(value) => {
                let mut value = header_value(HEADER_AUTHORIZATION, &value)?;
                value.set_sensitive(true);
                headers.insert(AUTHORIZATION, value);
            }
            None => warn!(
                "No credentials to authorize {} {}; sending without an Authorization header",
                self.method, self.url
            ),
        }

        debug!(
            "Built headers for {} {} using {strategy}: {:?}",
            self.method,
            self.url,
            headers.keys().map(|k| k.as_str()).collect::<Vec<_>>()
        );

        Ok(RequestHeaders {
            headers,
            bearer_token,
        })
    }

    fn bearer_token_credentials_auth_header(&self) -> String {
        let credentials = format!("{}:{}", self.client.consumer_key(), self.client.consumer_secret());
        format!("Basic {}", BASE64_STANDARD.encode(credentials))
    }
}

fn bearer_auth_header(token: &BearerToken) -> String {
    format!("Bearer {token}")
}

fn header_value(header: &'static str, value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|source| Error::InvalidHeaderValue {
        header,
        source,
    })
}
