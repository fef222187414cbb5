use {
    serde::{Deserialize, Serialize},
    std::{collections::BTreeMap, slice},
};

const OPT_BEARER_TOKEN_REQUEST: &str = "bearer_token_request";
const OPT_GZIP_REQUEST: &str = "gzip_request";

/// A request parameter value: either a single string or a list of strings.
///
/// Lists are sent (and signed) as one `key=value` pair per element.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A single value.
    Single(String),

    /// Multiple values for the same key.
    Multiple(Vec<String>),
}

impl ParamValue {
    /// All values held by this parameter.
    pub fn values(&self) -> &[String] {
        match self {
            Self::Single(value) => slice::from_ref(value),
            Self::Multiple(values) => values.as_slice(),
        }
    }

    fn is_truthy(&self) -> bool {
        self.values().iter().any(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multiple(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

/// Request parameters, keyed by name.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, ParamValue>);

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a parameter, returning the previous value if there was one.
    pub fn insert<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) -> Option<ParamValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style variant of [`insert`][Self::insert].
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a parameter.
    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        self.0.remove(key)
    }

    /// Look up a parameter.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Number of parameter keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(key, value)` pairs, expanding list values into one pair per element.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(key, value)| value.values().iter().map(move |v| (key.as_str(), v.as_str())))
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// The parameters of a request plus the flags that control header construction.
///
/// The flags are never part of `params`, so they never reach the OAuth signature base string.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestOptions {
    /// Parameters sent with the request.
    pub params: Params,

    /// This request obtains (or invalidates) a bearer token.
    pub bearer_token_request: bool,

    /// Ask the server for a compressed response.
    pub gzip_request: bool,
}

impl RequestOptions {
    /// Create options for the given parameters with both flags cleared.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    /// Split a raw parameter map into parameters and flags.
    ///
    /// The `bearer_token_request` and `gzip_request` keys are removed from the map.
    pub fn from_params(mut params: Params) -> Self {
        let bearer_token_request = params.remove(OPT_BEARER_TOKEN_REQUEST).is_some_and(|v| v.is_truthy());
        let gzip_request = params.remove(OPT_GZIP_REQUEST).is_some_and(|v| v.is_truthy());

        Self {
            params,
            bearer_token_request,
            gzip_request,
        }
    }

    /// Set the bearer-token-request flag.
    pub fn bearer_token_request(mut self, enable: bool) -> Self {
        self.bearer_token_request = enable;
        self
    }

    /// Set the gzip-request flag.
    pub fn gzip_request(mut self, enable: bool) -> Self {
        self.gzip_request = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{ParamValue, Params, RequestOptions};

    #[test_log::test]
    fn flags_are_stripped_from_params() {
        let params = Params::new()
            .with("status", "hello")
            .with("bearer_token_request", "true")
            .with("gzip_request", "1");

        let options = RequestOptions::from_params(params);
        assert!(options.bearer_token_request);
        assert!(options.gzip_request);
        assert_eq!(options.params.len(), 1);
        assert!(options.params.get("bearer_token_request").is_none());
        assert!(options.params.get("gzip_request").is_none());
    }

    #[test_log::test]
    fn false_flags_are_stripped_too() {
        let params = Params::new().with("gzip_request", "false").with("count", "5");

        let options = RequestOptions::from_params(params);
        assert!(!options.gzip_request);
        assert!(!options.bearer_token_request);
        assert_eq!(options.params, Params::new().with("count", "5"));
    }

    #[test_log::test]
    fn list_values_expand_to_pairs() {
        let params = Params::new().with("id", vec!["1", "2"]).with("a", "x");
        let pairs: Vec<_> = params.pairs().collect();
        assert_eq!(pairs, vec![("a", "x"), ("id", "1"), ("id", "2")]);
    }

    #[test_log::test]
    fn deserialize_mixed_values() {
        let params: Params = serde_json::from_str(r#"{"q":"rust","ids":["1","2"]}"#).unwrap();
        assert_eq!(params.get("q"), Some(&ParamValue::Single("rust".to_string())));
        assert_eq!(params.get("ids").map(ParamValue::values), Some(&["1".to_string(), "2".to_string()][..]));
    }
}
