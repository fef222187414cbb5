use {
    crate::{
        client::{Client, RestClient},
        error::Error,
        headers::Headers,
        options::RequestOptions,
    },
    log::*,
    reqwest::{header::HeaderMap, Method, RequestBuilder, Url},
};

/// Whether parameters for `method` go in the query string rather than a form body.
#[inline(always)]
fn params_in_query(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::DELETE)
}

fn build(http: &reqwest::Client, headers: HeaderMap, method: Method, url: Url, options: &RequestOptions) -> RequestBuilder {
    let pairs: Vec<(&str, &str)> = options.params.pairs().collect();
    let in_query = params_in_query(&method);
    let builder = http.request(method, url).headers(headers);

    match (pairs.is_empty(), in_query) {
        (true, _) => builder,
        (false, true) => builder.query(&pairs),
        (false, false) => builder.form(&pairs),
    }
}

/// Create a reqwest request for `method url` with the API headers and parameters attached.
///
/// The bearer token resolved for the request is cached on `client`. Nothing is sent.
pub fn prepare(
    http: &reqwest::Client,
    client: &mut RestClient,
    method: Method,
    url: Url,
    options: &RequestOptions,
) -> Result<RequestBuilder, Error> {
    let headers = client.request_headers(method.clone(), &url, options)?;
    debug!("Prepared {method} {url} with {} parameters", options.params.len());
    Ok(build(http, headers, method, url, options))
}

/// Like [`prepare`], for any client. Nothing is cached.
pub fn prepare_with<C: Client + ?Sized>(
    http: &reqwest::Client,
    client: &C,
    method: Method,
    url: Url,
    options: &RequestOptions,
) -> Result<RequestBuilder, Error> {
    let headers = Headers::new(client, method.clone(), &url, options).request_headers()?;
    debug!("Prepared {method} {url} with {} parameters", options.params.len());
    Ok(build(http, headers.headers, method, url, options))
}
