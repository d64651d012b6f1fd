use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, USER_AGENT};

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    /// JSON payload; sent with `Content-Type: application/json`.
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Carries one request to the server and hands back the raw status and body.
/// Interpreting either is left to the caller.
pub trait Transport: Send + Sync {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// Blocking reqwest transport. The client is built on first use and reused
/// for every later request.
#[derive(Debug)]
pub struct HttpTransport {
    timeout: Duration,
    client: OnceCell<Client>,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Config::from_env().timeout)
    }
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceCell::new(),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn client(&self) -> Result<&Client> {
        self.client.get_or_try_init(|| {
            Client::builder()
                .timeout(self.timeout)
                .build()
                .context("failed to build http client")
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let client = self.client()?;
        let mut req = match request.method {
            Method::Get => client.get(&request.url),
            Method::Post => client.post(&request.url),
            Method::Delete => client.delete(&request.url),
        };
        req = req
            .header(USER_AGENT, "roster_terminal/0.1")
            .header(ACCEPT, "application/json");
        if let Some(body) = request.body {
            req = req.header(CONTENT_TYPE, "application/json").body(body);
        }

        let resp = req.send().context("request failed")?;
        let status = resp.status().as_u16();
        let body = resp.text().context("failed reading body")?;
        Ok(ApiResponse { status, body })
    }
}
