use {
    crate::{
        oauth::{escape, normalize_url, unescape, OAuthError, SignatureMethod},
        options::Params,
    },
    log::*,
    reqwest::{Method, Url},
    std::{
        collections::BTreeMap,
        fmt::{Display, Formatter, Result as FmtResult},
        time::{SystemTime, UNIX_EPOCH},
    },
    uuid::Uuid,
};

const HEADER_PREFIX: &str = "OAuth ";
const DEFAULT_VERSION: &str = "1.0";

const ATTR_CALLBACK: &str = "oauth_callback";
const ATTR_CONSUMER_KEY: &str = "oauth_consumer_key";
const ATTR_NONCE: &str = "oauth_nonce";
const ATTR_SIGNATURE: &str = "oauth_signature";
const ATTR_SIGNATURE_METHOD: &str = "oauth_signature_method";
const ATTR_TIMESTAMP: &str = "oauth_timestamp";
const ATTR_TOKEN: &str = "oauth_token";
const ATTR_VERIFIER: &str = "oauth_verifier";
const ATTR_VERSION: &str = "oauth_version";

/// Inputs to the signer: credentials plus the protocol parameters.
///
/// `nonce` and `timestamp` are generated when left unset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OAuthOptions {
    /// The consumer (application) key.
    pub consumer_key: String,

    /// The consumer (application) secret.
    pub consumer_secret: String,

    /// The user's access token.
    pub token: Option<String>,

    /// The user's access token secret.
    pub token_secret: Option<String>,

    /// A unique value for this request.
    pub nonce: Option<String>,

    /// Seconds since the Unix epoch.
    pub timestamp: Option<u64>,

    /// How the request is signed.
    pub signature_method: SignatureMethod,

    /// The `oauth_version` value.
    pub version: String,

    /// The `oauth_callback` value, for request-token calls.
    pub callback: Option<String>,

    /// The `oauth_verifier` value, for access-token calls.
    pub verifier: Option<String>,
}

impl Default for OAuthOptions {
    fn default() -> Self {
        Self {
            consumer_key: String::new(),
            consumer_secret: String::new(),
            token: None,
            token_secret: None,
            nonce: None,
            timestamp: None,
            signature_method: SignatureMethod::default(),
            version: DEFAULT_VERSION.to_string(),
            callback: None,
            verifier: None,
        }
    }
}

impl OAuthOptions {
    /// Options for the given consumer credentials.
    pub fn new<K: Into<String>, S: Into<String>>(consumer_key: K, consumer_secret: S) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            ..Default::default()
        }
    }

    /// Add the user's token credentials.
    pub fn with_token<T: Into<String>, S: Into<String>>(mut self, token: T, token_secret: S) -> Self {
        self.token = Some(token.into());
        self.token_secret = Some(token_secret.into());
        self
    }

    /// Build options from loosely-typed `(key, value)` pairs.
    ///
    /// Recognized keys are the field names of this struct. With `ignore_extra_keys` set, anything else is
    /// skipped; otherwise it is an [`OAuthError::UnknownOption`]. A pair `("ignore_extra_keys", "true")` has the
    /// same effect as the flag.
    pub fn from_pairs<I, K, V>(pairs: I, ignore_extra_keys: bool) -> Result<Self, OAuthError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut options = Self::default();
        let mut consumer_key = None;
        let mut consumer_secret = None;
        let mut extra = Vec::new();
        let mut ignore_extra_keys = ignore_extra_keys;

        for (key, value) in pairs {
            let value = value.into();
            match key.as_ref() {
                "consumer_key" => consumer_key = Some(value),
                "consumer_secret" => consumer_secret = Some(value),
                "token" => options.token = Some(value),
                "token_secret" => options.token_secret = Some(value),
                "nonce" => options.nonce = Some(value),
                "timestamp" => {
                    let timestamp = value
                        .parse()
                        .map_err(|_| OAuthError::InvalidOption(format!("timestamp {value:?} is not a number")))?;
                    options.timestamp = Some(timestamp);
                }
                "signature_method" => options.signature_method = value.parse()?,
                "version" => options.version = value,
                "callback" => options.callback = Some(value),
                "verifier" => options.verifier = Some(value),
                "ignore_extra_keys" => ignore_extra_keys |= value == "true",
                other => extra.push(other.to_string()),
            }
        }

        if let Some(key) = extra.into_iter().next() {
            if !ignore_extra_keys {
                return Err(OAuthError::UnknownOption(key));
            }
        }

        options.consumer_key = consumer_key.ok_or(OAuthError::MissingOption("consumer_key"))?;
        options.consumer_secret = consumer_secret.ok_or(OAuthError::MissingOption("consumer_secret"))?;
        Ok(options)
    }
}

/// An OAuth 1.0a `Authorization` header for a single request.
///
/// Formatting with [`Display`] yields the ready-to-use header value.
#[derive(Clone, Debug)]
pub struct OAuthHeader {
    method: Method,
    url: Url,
    params: Params,
    options: OAuthOptions,

    /// The signature carried by a parsed header, if this header was parsed.
    received_signature: Option<String>,
}

impl OAuthHeader {
    /// Prepare a header for signing `method url` with `params`.
    ///
    /// Query parameters already present on `url` are signed too.
    pub fn new(method: Method, url: &Url, params: &Params, mut options: OAuthOptions) -> Self {
        if options.nonce.is_none() {
            options.nonce = Some(Uuid::new_v4().simple().to_string());
        }

        if options.timestamp.is_none() {
            let now = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
            options.timestamp = Some(now);
        }

        Self {
            method,
            url: url.clone(),
            params: params.clone(),
            options,
            received_signature: None,
        }
    }

    /// Reconstruct a header received from a client, for verification with [`is_valid`][Self::is_valid].
    pub fn from_header(method: Method, url: &Url, params: &Params, header: &str) -> Result<Self, OAuthError> {
        let mut attributes = Self::parse(header)?;
        let received_signature = attributes.remove(ATTR_SIGNATURE);
        let pairs = attributes
            .into_iter()
            .filter_map(|(key, value)| key.strip_prefix("oauth_").map(|key| (key.to_string(), value)));

        // Secrets are never transmitted; they are supplied to is_valid().
        let pairs = pairs.chain([("consumer_secret".to_string(), String::new())]);
        let options = OAuthOptions::from_pairs(pairs, true)?;

        Ok(Self {
            method,
            url: url.clone(),
            params: params.clone(),
            options,
            received_signature,
        })
    }

    /// Parse an `Authorization: OAuth ...` header value into its (unescaped) attributes.
    pub fn parse(header: &str) -> Result<BTreeMap<String, String>, OAuthError> {
        let Some(rest) = header.trim().strip_prefix(HEADER_PREFIX) else {
            return Err(OAuthError::MalformedHeader("missing OAuth prefix".to_string()));
        };

        let mut attributes = BTreeMap::new();
        for pair in rest.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((key, value)) = pair.split_once('=') else {
                return Err(OAuthError::MalformedHeader(format!("expected key=\"value\", got {pair:?}")));
            };

            let Some(value) = value.strip_prefix('"').and_then(|v| v.strip_suffix('"')) else {
                return Err(OAuthError::MalformedHeader(format!("unquoted value for {key}")));
            };

            attributes.insert(unescape(key.trim())?, unescape(value)?);
        }

        Ok(attributes)
    }

    /// The `oauth_*` protocol attributes, excluding the signature.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let options = &self.options;
        let mut attributes = vec![
            (ATTR_CONSUMER_KEY, options.consumer_key.clone()),
            (ATTR_NONCE, options.nonce.clone().unwrap_or_default()),
            (ATTR_SIGNATURE_METHOD, options.signature_method.to_string()),
            (ATTR_TIMESTAMP, options.timestamp.unwrap_or_default().to_string()),
            (ATTR_VERSION, options.version.clone()),
        ];

        let optional = [
            (ATTR_TOKEN, &options.token),
            (ATTR_CALLBACK, &options.callback),
            (ATTR_VERIFIER, &options.verifier),
        ];

        for (name, value) in optional {
            if let Some(value) = value {
                attributes.push((name, value.clone()));
            }
        }

        attributes.sort();
        attributes
    }

    /// The attributes including `oauth_signature`, sorted by name.
    pub fn signed_attributes(&self) -> Vec<(&'static str, String)> {
        let mut attributes = self.attributes();
        attributes.push((ATTR_SIGNATURE, self.signature()));
        attributes.sort();
        attributes
    }

    /// Encoded, sorted and joined signature parameters: protocol attributes, request parameters and URL query.
    pub fn normalized_params(&self) -> String {
        let attributes = self.attributes();
        let attributes = attributes.iter().map(|(k, v)| (*k, v.as_str()));
        let query: Vec<(String, String)> = self.url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())).collect();
        let query = query.iter().map(|(k, v)| (k.as_str(), v.as_str()));

        let mut pairs: Vec<(String, String)> =
            attributes.chain(self.params.pairs()).chain(query).map(|(k, v)| (escape(k), escape(v))).collect();
        pairs.sort();

        pairs.into_iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&")
    }

    /// `METHOD&url&params`, each component escaped.
    pub fn signature_base_string(&self) -> String {
        format!(
            "{}&{}&{}",
            self.method.as_str().to_ascii_uppercase(),
            escape(&normalize_url(&self.url)),
            escape(&self.normalized_params())
        )
    }

    /// The signing key: `consumer_secret&token_secret`, each escaped.
    pub fn secret(&self) -> String {
        let token_secret = self.options.token_secret.as_deref().unwrap_or_default();
        format!("{}&{}", escape(&self.options.consumer_secret), escape(token_secret))
    }

    /// Compute the signature for this request.
    pub fn signature(&self) -> String {
        let base_string = self.signature_base_string();
        trace!("OAuth signature base string: {base_string}");
        self.options.signature_method.sign(&base_string, &self.secret())
    }

    /// Check a parsed header's signature against the given secrets.
    ///
    /// Headers built with [`new`][Self::new] carry no received signature and are never valid.
    pub fn is_valid(&self, consumer_secret: &str, token_secret: Option<&str>) -> bool {
        let Some(received) = self.received_signature.as_deref() else {
            return false;
        };

        let mut check = self.clone();
        check.options.consumer_secret = consumer_secret.to_string();
        check.options.token_secret = token_secret.map(str::to_string);
        let valid = check.options.signature_method.verify(&check.signature_base_string(), &check.secret(), received);
        if !valid {
            debug!("OAuth signature mismatch for {} {}", self.method, self.url);
        }

        valid
    }

    /// The options this header signs with, including the generated nonce and timestamp.
    pub fn options(&self) -> &OAuthOptions {
        &self.options
    }
}

impl Display for OAuthHeader {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(HEADER_PREFIX)?;
        for (i, (key, value)) in self.signed_attributes().into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}=\"{}\"", escape(&value))?;
        }

        Ok(())
    }
}
