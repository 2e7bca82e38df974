use crate::outcome::{FailureKind, Outcome};
use http::Uri;
use hyper::client::connect::HttpConnector;
use hyper::client::Client as HyperClient;
use hyper::{Body, Request, StatusCode};
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use std::time::Duration;
use tokio::time;
use volley_metrics::Stopwatch;

/// Timeout applied when the caller doesn't configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues single GET requests and reports each attempt as an [`Outcome`].
///
/// Timeouts, refused connections, transport errors, and error statuses all
/// come back as data. `fetch` has no error path, so one bad request can
/// never take down the worker driving it.
#[derive(Clone)]
pub struct Client {
    inner: HyperClient<HttpsConnector<HttpConnector>, Body>,
    timeout: Duration,
}

impl Client {
    pub fn new(timeout: Duration) -> Client {
        let connector = HttpsConnectorBuilder::new()
            .with_native_roots()
            .https_or_http()
            .enable_http1()
            .build();
        // No connection reuse between attempts; every request pays the
        // full connect cost.
        let inner = HyperClient::builder()
            .pool_max_idle_per_host(0)
            .build(connector);
        Client { inner, timeout }
    }

    /// Perform one GET against `url`, draining the whole body so latency
    /// covers the full response, not just the header round trip.
    pub async fn fetch(&self, url: &Uri) -> Outcome {
        let stopwatch = Stopwatch::new();
        let req = match Request::get(url.clone()).body(Body::empty()) {
            Ok(req) => req,
            Err(_) => return Outcome::failure(FailureKind::Other, stopwatch.elapsed()),
        };
        let roundtrip = async {
            let res = self.inner.request(req).await?;
            let status = res.status();
            let _body = hyper::body::to_bytes(res.into_body()).await?;
            Ok::<StatusCode, hyper::Error>(status)
        };
        match time::timeout(self.timeout, roundtrip).await {
            Err(_) => Outcome::failure(FailureKind::Timeout, stopwatch.elapsed()),
            Ok(Err(ref e)) => Outcome::failure(classify(e), stopwatch.elapsed()),
            Ok(Ok(status)) => Outcome::from_status(status, stopwatch.elapsed()),
        }
    }
}

impl Default for Client {
    fn default() -> Client {
        Client::new(DEFAULT_TIMEOUT)
    }
}

fn classify(err: &hyper::Error) -> FailureKind {
    if err.is_connect() {
        FailureKind::Connect
    } else if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Other
    }
}
