// src/probe/executor.rs
use crate::check::{Check, Endpoint, FailureReason, HttpMethod, Outcome};
use crate::config::ProbeConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{redirect, Client, Method};
use std::io;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Performs exactly one network probe per call and always yields one [`Outcome`].
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, check: &Check) -> Outcome;
}

pub struct HttpProber {
    client: Client,
    max_timeout: Duration,
}

impl HttpProber {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        // Redirects are reported as-is so a 3xx can be listed as a success code.
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .redirect(redirect::Policy::none())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            max_timeout: config.max_timeout(),
        })
    }

    pub async fn probe_endpoint(&self, endpoint: &Endpoint, limit: Duration) -> Outcome {
        let url = match endpoint.to_url() {
            Ok(url) => url,
            Err(e) => return Outcome::failed(FailureReason::ProtocolError, e.to_string()),
        };

        let request = self.client.request(to_method(endpoint.method), url);

        // The send future is dropped once the deadline wins, so a late
        // response or transport error can never produce a second outcome.
        match timeout(limit, request.send()).await {
            Ok(Ok(response)) => Outcome::response(response.status().as_u16()),
            Ok(Err(e)) => classify(&e),
            Err(_) => Outcome::timeout(),
        }
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, check: &Check) -> Outcome {
        let limit = check.timeout().min(self.max_timeout);
        let outcome = self.probe_endpoint(&check.endpoint, limit).await;
        debug!(check = %check.id, endpoint = %check.endpoint, %outcome, "probe finished");
        outcome
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Options => Method::OPTIONS,
    }
}

fn classify(error: &reqwest::Error) -> Outcome {
    let reason = if error.is_timeout() {
        FailureReason::Timeout
    } else if error.is_connect() || is_connection_io_error(error) {
        FailureReason::ConnectionError
    } else {
        FailureReason::ProtocolError
    };
    Outcome::failed(reason, error.to_string())
}

/// Resets and aborts surface as request errors; look through the source chain.
fn is_connection_io_error(error: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(error);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            return matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionRefused
                    | io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::NotConnected
            );
        }
        source = err.source();
    }
    false
}
