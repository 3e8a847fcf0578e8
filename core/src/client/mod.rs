//! Stateless HTTP request builders and response parsers for the back-office API.
//!
//! # Design
//! `TailorClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The transport executes the round-trip in between, keeping this layer
//! deterministic and free of I/O. No retries and no caching happen here.
//!
//! Every request carries the tenant id as the `tenant_id` query parameter.
//! The operations are grouped per resource in the submodules.

mod appointments;
mod customers;
mod diagnoses;
mod orders;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Page;

/// Synchronous, stateless client for the back-office API.
#[derive(Debug, Clone)]
pub struct TailorClient {
    base_url: String,
}

impl TailorClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an arbitrary request against `path` (which may carry its own
    /// query string). Used for calls no typed operation covers.
    pub fn build_raw(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpRequest, ApiError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        match body {
            Some(body) => json_request(method, url, body),
            None => Ok(bare_request(method, url)),
        }
    }

    /// Parse any 2xx body as JSON. An empty body parses as `null`.
    pub fn parse_raw(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        decode(&response.body)
    }

    fn url(&self, path: &str, query: &Query) -> String {
        format!("{}{path}?{}", self.base_url, query.encode())
    }

    fn get(&self, path: &str, query: &Query) -> HttpRequest {
        bare_request(HttpMethod::Get, self.url(path, query))
    }

    fn delete(&self, path: &str, query: &Query) -> HttpRequest {
        bare_request(HttpMethod::Delete, self.url(path, query))
    }

    fn post_empty(&self, path: &str, query: &Query) -> HttpRequest {
        bare_request(HttpMethod::Post, self.url(path, query))
    }

    fn send_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        query: &Query,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        json_request(method, self.url(path, query), body)
    }
}

fn bare_request(method: HttpMethod, url: String) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: Vec::new(),
        body: None,
    }
}

fn json_request<B: Serialize>(method: HttpMethod, url: String, body: &B) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(body).map_err(|e| ApiError::Request(e.to_string()))?;
    Ok(HttpRequest {
        method,
        url,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Map a non-2xx status to `ApiError::Server`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        Ok(())
    } else {
        Err(ApiError::from_response(response))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    decode(&response.body)
}

/// A list endpoint's items, whether wrapped in a page envelope or sent as
/// a bare array.
fn parse_list<T: DeserializeOwned>(response: HttpResponse) -> Result<Vec<T>, ApiError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Listing<T> {
        Bare(Vec<T>),
        Page(Page<T>),
    }

    Ok(match parse_json(response)? {
        Listing::Bare(items) => items,
        Listing::Page(page) => page.items,
    })
}

fn parse_empty(response: HttpResponse) -> Result<(), ApiError> {
    check_status(&response)
}

/// Query string, always led by the tenant id. Empty optional values are
/// dropped.
#[derive(Debug, Clone)]
struct Query {
    pairs: Vec<(&'static str, String)>,
}

impl Query {
    fn tenant(tenant_id: &str) -> Self {
        Self {
            pairs: vec![("tenant_id", tenant_id.to_string())],
        }
    }

    fn param(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((key, value.into()));
        self
    }

    fn opt<V: ToString>(self, key: &'static str, value: Option<V>) -> Self {
        match value.map(|v| v.to_string()).filter(|v| !v.is_empty()) {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}
