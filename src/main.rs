//! Print the headers for a Twitter API request.
//!
//! Credentials come from the `TWITTER_*` environment variables.
#![warn(clippy::all)]

use {
    clap::Parser,
    log::*,
    reqwest::{Method, Url},
    std::{process::ExitCode, str::FromStr},
    twitter_headers::{BoxError, ClientConfig, Params, RequestOptions},
};

/// Print the headers for a Twitter API request.
#[derive(Debug, Parser)]
#[command(version, rename_all = "kebab")]
struct Args {
    /// Build headers for the streaming API (user OAuth credentials only).
    #[arg(long)]
    streaming: bool,

    /// The request obtains or invalidates a bearer token (HTTP Basic auth).
    #[arg(long)]
    bearer_token_request: bool,

    /// Ask for a gzip-compressed response.
    #[arg(long)]
    gzip: bool,

    /// The HTTP method, in any case.
    #[arg(value_name = "METHOD")]
    method: String,

    /// The request URL.
    #[arg(value_name = "URL")]
    url: Url,

    /// Request parameters.
    #[arg(value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, String)>,
}

fn parse_param(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("invalid parameter {arg:?}; expected key=value")),
    }
}

impl Args {
    fn method(&self) -> Result<Method, BoxError> {
        Ok(Method::from_str(&self.method.to_uppercase())?)
    }

    fn request_options(&self) -> RequestOptions {
        let params = self.params.iter().map(|(key, value)| (key.as_str(), value.as_str())).collect::<Params>();

        // Flags may also arrive as parameters; those are stripped before signing.
        let mut options = RequestOptions::from_params(params);
        options.bearer_token_request |= self.bearer_token_request;
        options.gzip_request |= self.gzip;
        options
    }
}

fn run(args: Args) -> Result<(), BoxError> {
    let method = args.method()?;
    let options = args.request_options();
    let config = ClientConfig::from_env()?;

    let headers = if args.streaming {
        let client = config.into_streaming_client();
        twitter_headers::Headers::new(&client, method, &args.url, &options).request_headers()?.headers
    } else {
        let mut client = config.into_rest_client();
        client.request_headers(method, &args.url, &options)?
    };

    for (name, value) in headers.iter() {
        println!("{name}: {}", value.to_str()?);
    }

    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::Args,
        clap::{error::ErrorKind, Parser},
        reqwest::Method,
    };

    #[test_log::test]
    fn parse_flags_and_params() {
        let args =
            Args::try_parse_from(["twitter-headers", "--gzip", "post", "https://api.twitter.com/1.1/statuses/update.json", "status=hi"])
                .unwrap();
        assert!(!args.streaming);
        assert_eq!(args.method().unwrap(), Method::POST);

        let options = args.request_options();
        assert!(options.gzip_request);
        assert!(!options.bearer_token_request);
        assert_eq!(options.params.len(), 1);
    }

    #[test_log::test]
    fn flag_params_are_stripped() {
        let args =
            Args::try_parse_from(["twitter-headers", "POST", "https://api.twitter.com/oauth2/token", "bearer_token_request=true"])
                .unwrap();
        let options = args.request_options();
        assert!(options.bearer_token_request);
        assert!(options.params.is_empty());
    }

    #[test_log::test]
    fn missing_url_is_an_error() {
        let err = Args::try_parse_from(["twitter-headers", "GET"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let err = Args::try_parse_from(["twitter-headers", "GET", "https://example.com/", "novalue"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test_log::test]
    fn unknown_flag_is_reported_as_such() {
        let err = Args::try_parse_from(["twitter-headers", "--verbose", "GET", "https://api.twitter.com/1.1/x.json"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
        assert!(err.to_string().contains("--verbose"));
    }

    #[test_log::test]
    fn invalid_url_is_rejected() {
        let err = Args::try_parse_from(["twitter-headers", "GET", "not a url"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}
