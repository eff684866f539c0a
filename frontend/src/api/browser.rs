use super::transport::{HttpRequest, HttpResponse, HttpTransport, Method, TransportError};
use async_trait::async_trait;
use futures::future::{select, Either};
use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::future::TimeoutFuture;
use log::debug;
use web_sys::RequestCredentials;

/// `fetch`-based transport. Credentials ride along as cookies
/// (`credentials: include`); the pipeline never sees the token.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserTransport;

fn builder_for(method: Method, url: &str) -> RequestBuilder {
    match method {
        Method::Get => Request::get(url),
        Method::Post => Request::post(url),
        Method::Put => Request::put(url),
        Method::Patch => Request::patch(url),
        Method::Delete => Request::delete(url),
    }
}

async fn exchange(request: &HttpRequest) -> Result<HttpResponse, TransportError> {
    let mut builder = builder_for(request.method, &request.url);
    if request.include_credentials {
        builder = builder.credentials(RequestCredentials::Include);
    }
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }

    let prepared = match &request.body {
        Some(body) => builder.body(body.as_str()),
        None => builder.build(),
    }
    .map_err(|e| TransportError::Network(e.to_string()))?;

    let response = prepared
        .send()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| TransportError::Network(e.to_string()))?;

    Ok(HttpResponse { status, body })
}

#[async_trait(?Send)]
impl HttpTransport for BrowserTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let result = match request.timeout {
            Some(timeout) => {
                let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
                let call = Box::pin(exchange(&request));
                match select(call, TimeoutFuture::new(millis)).await {
                    Either::Left((result, _)) => result,
                    Either::Right(_) => Err(TransportError::Timeout(timeout)),
                }
            }
            None => exchange(&request).await,
        };

        if let Ok(response) = &result {
            debug!("{} {} -> {}", request.method, request.url, response.status);
        }
        result
    }
}
