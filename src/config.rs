use {
    crate::{
        client::{default_user_agent, Credentials, RestClient, StreamingClient},
        error::Error,
    },
    log::*,
    serde::{Deserialize, Serialize},
    std::env,
};

const ENV_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
const ENV_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
const ENV_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";
const ENV_BEARER_TOKEN: &str = "TWITTER_BEARER_TOKEN";
const ENV_USER_AGENT: &str = "TWITTER_USER_AGENT";

/// Client configuration, from the environment or any serde source.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ClientConfig {
    /// User agent to send.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// OAuth credentials.
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Application-only bearer token.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl ClientConfig {
    /// Read the configuration from `TWITTER_*` environment variables.
    ///
    /// `TWITTER_CONSUMER_KEY` and `TWITTER_CONSUMER_SECRET` must be set.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, Error> {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let required = |name: &str| non_empty(name).ok_or_else(|| Error::Config(format!("{name} must be set")));

        let credentials = Credentials {
            consumer_key: required(ENV_CONSUMER_KEY)?,
            consumer_secret: required(ENV_CONSUMER_SECRET)?,
            access_token: non_empty(ENV_ACCESS_TOKEN),
            access_token_secret: non_empty(ENV_ACCESS_TOKEN_SECRET),
        };

        let user_agent = non_empty(ENV_USER_AGENT).unwrap_or_else(default_user_agent);
        let bearer_token = non_empty(ENV_BEARER_TOKEN);

        debug!(
            "Loaded client configuration: user_agent={user_agent}, access_token={}, bearer_token={}",
            credentials.access_token.is_some(),
            bearer_token.is_some()
        );

        Ok(Self {
            user_agent,
            credentials,
            bearer_token,
        })
    }

    /// A REST client for this configuration.
    pub fn into_rest_client(self) -> RestClient {
        let client = RestClient::new(self.credentials).with_user_agent(self.user_agent);
        match self.bearer_token {
            Some(token) => client.with_bearer_token(token),
            None => client,
        }
    }

    /// A streaming client for this configuration. Any bearer token is dropped.
    pub fn into_streaming_client(self) -> StreamingClient {
        if self.bearer_token.is_some() {
            info!("Streaming clients authenticate with OAuth only; ignoring bearer token");
        }

        StreamingClient::new(self.credentials).with_user_agent(self.user_agent)
    }
}

#[cfg(test)]
mod tests {
    use {
        super::ClientConfig,
        crate::{
            client::{BearerTokenCapable, Client, DEFAULT_USER_AGENT},
            error::Error,
        },
        std::collections::HashMap,
    };

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| vars.get(name).cloned()
    }

    #[test_log::test]
    fn load_full_configuration() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TWITTER_CONSUMER_KEY", "ck"),
            ("TWITTER_CONSUMER_SECRET", "cs"),
            ("TWITTER_ACCESS_TOKEN", "at"),
            ("TWITTER_ACCESS_TOKEN_SECRET", "ats"),
            ("TWITTER_BEARER_TOKEN", "AAAA"),
            ("TWITTER_USER_AGENT", "MyApp/2.0"),
        ]))
        .unwrap();

        let client = config.clone().into_rest_client();
        assert_eq!(client.user_agent(), "MyApp/2.0");
        assert!(client.user_token());
        assert_eq!(client.bearer_token(), Some("AAAA"));

        let streaming = config.into_streaming_client();
        assert!(streaming.bearer_token_capability().is_none());
    }

    #[test_log::test]
    fn defaults_and_missing_values() {
        let config =
            ClientConfig::from_lookup(lookup(&[("TWITTER_CONSUMER_KEY", "ck"), ("TWITTER_CONSUMER_SECRET", "cs")]))
                .unwrap();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.credentials.access_token, None);
        assert_eq!(config.bearer_token, None);

        let err = ClientConfig::from_lookup(lookup(&[("TWITTER_CONSUMER_KEY", "ck")])).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("TWITTER_CONSUMER_SECRET")));

        let err = ClientConfig::from_lookup(lookup(&[("TWITTER_CONSUMER_KEY", ""), ("TWITTER_CONSUMER_SECRET", "cs")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test_log::test]
    fn deserialize_from_json() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"consumer_key":"ck","consumer_secret":"cs","bearer_token":"AAAA"}"#).unwrap();
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.credentials.consumer_key, "ck");
        assert_eq!(config.bearer_token.as_deref(), Some("AAAA"));
    }
}
