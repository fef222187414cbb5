//! Obtaining and invalidating application-only bearer tokens.

use {
    crate::{
        client::Client,
        error::Error,
        headers::{Headers, RequestHeaders},
        options::{Params, RequestOptions},
    },
    log::*,
    reqwest::{Method, Url},
    serde::{Deserialize, Serialize},
    std::fmt::{Display, Formatter, Result as FmtResult},
};

/// Base URL of the Twitter API.
pub const API_BASE_URL: &str = "https://api.twitter.com";

const TOKEN_PATH: &str = "/oauth2/token";
const INVALIDATE_TOKEN_PATH: &str = "/oauth2/invalidate_token";
const GRANT_TYPE: &str = "grant_type";
const GRANT_TYPE_CLIENT_CREDENTIALS: &str = "client_credentials";
const PARAM_ACCESS_TOKEN: &str = "access_token";
const TOKEN_TYPE_BEARER: &str = "bearer";

/// An application-only bearer token.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a token string.
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    /// The token.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap the token string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode the token endpoint's JSON response.
    ///
    /// The response must carry `"token_type": "bearer"`.
    pub fn from_json(body: &str) -> Result<Self, Error> {
        let response: TokenResponse = serde_json::from_str(body)?;
        if !response.token_type.eq_ignore_ascii_case(TOKEN_TYPE_BEARER) {
            return Err(Error::UnexpectedTokenType(response.token_type));
        }

        Ok(Self(response.access_token))
    }
}

impl Display for BearerToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
}

/// A request against the token endpoints. These authenticate with the consumer credentials over HTTP Basic.
#[derive(Clone, Debug)]
pub struct TokenRequest {
    /// Always `POST`.
    pub method: Method,

    /// The endpoint.
    pub url: Url,

    /// Parameters, with `bearer_token_request` set.
    pub options: RequestOptions,
}

impl TokenRequest {
    fn new(base_url: &Url, path: &str, params: Params) -> Result<Self, Error> {
        let url = base_url.join(path).map_err(|e| Error::Config(format!("Invalid API base URL {base_url}: {e}")))?;

        Ok(Self {
            method: Method::POST,
            url,
            options: RequestOptions::new(params).bearer_token_request(true),
        })
    }

    /// The headers for this request.
    pub fn headers<C: Client + ?Sized>(&self, client: &C) -> Result<RequestHeaders, Error> {
        Headers::new(client, self.method.clone(), &self.url, &self.options).request_headers()
    }
}

fn default_base_url() -> Result<Url, Error> {
    Url::parse(API_BASE_URL).map_err(|e| Error::Config(format!("Invalid API base URL {API_BASE_URL}: {e}")))
}

/// The request that obtains a bearer token with the client-credentials grant.
pub fn token_request(base_url: Option<&Url>) -> Result<TokenRequest, Error> {
    let base_url = match base_url {
        Some(url) => url.clone(),
        None => default_base_url()?,
    };

    debug!("Preparing bearer token request against {base_url}");
    TokenRequest::new(&base_url, TOKEN_PATH, Params::new().with(GRANT_TYPE, GRANT_TYPE_CLIENT_CREDENTIALS))
}

/// The request that revokes `token`.
pub fn invalidate_token_request(base_url: Option<&Url>, token: &BearerToken) -> Result<TokenRequest, Error> {
    let base_url = match base_url {
        Some(url) => url.clone(),
        None => default_base_url()?,
    };

    debug!("Preparing bearer token invalidation against {base_url}");
    TokenRequest::new(&base_url, INVALIDATE_TOKEN_PATH, Params::new().with(PARAM_ACCESS_TOKEN, token.as_str()))
}

#[cfg(test)]
mod tests {
    use {
        super::{invalidate_token_request, token_request, BearerToken},
        crate::{
            client::{Credentials, RestClient},
            error::Error,
            options::ParamValue,
        },
        reqwest::{header::AUTHORIZATION, Method, Url},
    };

    #[test_log::test]
    fn obtain_token_request() {
        let request = token_request(None).unwrap();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "https://api.twitter.com/oauth2/token");
        assert!(request.options.bearer_token_request);
        assert_eq!(request.options.params.get("grant_type"), Some(&ParamValue::from("client_credentials")));

        let client = RestClient::new(Credentials::new("ck", "cs").with_access_token("at", "ats"));
        let headers = request.headers(&client).unwrap();
        assert_eq!(headers.headers.get(AUTHORIZATION).unwrap(), "Basic Y2s6Y3M=");
    }

    #[test_log::test]
    fn invalidate_request_uses_custom_base() {
        let base = Url::parse("http://127.0.0.1:8080/").unwrap();
        let request = invalidate_token_request(Some(&base), &BearerToken::new("AAAA")).unwrap();
        assert_eq!(request.url.as_str(), "http://127.0.0.1:8080/oauth2/invalidate_token");
        assert_eq!(request.options.params.get("access_token"), Some(&ParamValue::from("AAAA")));
        assert!(request.options.bearer_token_request);
    }

    #[test_log::test]
    fn parse_token_response() {
        let token = BearerToken::from_json(r#"{"token_type":"bearer","access_token":"AAAA%2FAAA%3DAAAAAAAA"}"#).unwrap();
        assert_eq!(token.as_str(), "AAAA%2FAAA%3DAAAAAAAA");

        let err = BearerToken::from_json(r#"{"token_type":"mac","access_token":"x"}"#).unwrap_err();
        assert!(matches!(err, Error::UnexpectedTokenType(t) if t == "mac"));

        assert!(matches!(BearerToken::from_json("not json"), Err(Error::Json(_))));
    }
}
