//! Error types for the back-office API client.
//!
//! # Design
//! `ApiError` is the uniform failure value of every remote call. Its
//! `Display` output is the human-readable message shown in the error banner,
//! so a `Server` error renders as exactly the message the backend sent.
//! The enum is `Clone` because cache slots keep the last failure around for
//! rendering.
//!
//! `ValidationError` never reaches the network: it is raised by the order
//! form before anything is dispatched.

use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::http::HttpResponse;
use crate::locale;

/// Errors returned by remote calls.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// The request was sent but no response arrived (timeout, refused, reset).
    #[error("{}", locale::NETWORK_ERROR)]
    Network { cause: String },

    /// The request could not be dispatched at all.
    #[error("{0}")]
    Request(String),

    /// A 2xx body did not match the expected shape.
    #[error("レスポンスの解析に失敗しました: {0}")]
    Decode(String),
}

impl ApiError {
    /// Normalize a non-2xx response.
    ///
    /// The message comes from the `error` field, then the `message` field of
    /// a JSON object body; a non-JSON body is used as-is; anything else falls
    /// back to the generic message.
    pub fn from_response(response: &HttpResponse) -> Self {
        ApiError::Server {
            status: response.status,
            message: extract_message(&response.body),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Server { .. } => "server",
            ApiError::Network { .. } => "network",
            ApiError::Request(_) => "request",
            ApiError::Decode(_) => "decode",
        }
    }

    /// Write the failure to the log sink. The caller still propagates it.
    pub fn report(&self) {
        match self {
            ApiError::Server { status, message } => match status {
                400 => error!(status, %message, "bad request"),
                401 => error!(status, "unauthorized: check authentication"),
                403 => error!(status, "forbidden: no permission for this resource"),
                404 => error!(status, %message, "not found: requested resource does not exist"),
                409 => error!(status, %message, "conflict"),
                500 => error!(status, %message, "internal server error: try again later"),
                _ => error!(status, %message, "request failed"),
            },
            ApiError::Network { cause } => {
                error!(%cause, "network error: no response received")
            }
            ApiError::Request(msg) => error!(error = %msg, "request could not be dispatched"),
            ApiError::Decode(msg) => error!(error = %msg, "unexpected response body"),
        }
    }
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => ["error", "message"]
            .iter()
            .filter_map(|key| fields.get(*key).and_then(Value::as_str))
            .find(|msg| !msg.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| locale::GENERIC_ERROR.to_string()),
        Ok(Value::String(text)) if !text.is_empty() => text,
        Ok(_) => locale::GENERIC_ERROR.to_string(),
        Err(_) => {
            let text = body.trim();
            if text.is_empty() {
                locale::GENERIC_ERROR.to_string()
            } else {
                text.to_string()
            }
        }
    }
}

/// Order form input rejected before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{}", locale::MISSING_FABRIC_ID)]
    MissingFabricId,
    #[error("{}", locale::INVALID_AMOUNT)]
    InvalidAmount,
    #[error("{}", locale::MISSING_DELIVERY_DATE)]
    MissingDeliveryDate,
    #[error("{}", locale::MALFORMED_DELIVERY_DATE)]
    MalformedDeliveryDate,
    #[error("{}", locale::EMPTY_DESCRIPTION)]
    EmptyDescription,
}
