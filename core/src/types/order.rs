use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;

/// Order lifecycle status.
///
/// Transitions happen server-side. The backend knows more states than the
/// console names (`Cutting`, `Sewing`, ...), so unknown values are kept
/// verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Draft,
    Confirmed,
    Cancelled,
    Completed,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Draft => "Draft",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Completed => "Completed",
            OrderStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "Draft" => OrderStatus::Draft,
            "Confirmed" => OrderStatus::Confirmed,
            "Cancelled" => OrderStatus::Cancelled,
            "Completed" => OrderStatus::Completed,
            _ => OrderStatus::Other(raw),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form part of an order. Measurement data and adjustments are opaque
/// to the console; `null` reads as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub measurement_data: Map<String, Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub adjustments: Map<String, Value>,
}

/// A full order as returned by `POST /api/orders`.
///
/// Amounts are whole yen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    pub customer_id: String,
    pub fabric_id: String,
    pub status: OrderStatus,
    pub total_amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_excluded_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_due_date: Option<DateTime<Utc>>,
    pub delivery_date: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub details: OrderDetails,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Row of a customer's order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub id: String,
    pub tenant_id: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub total_amount: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for creating an order.
///
/// `tenant_id` is filled from the configured tenant when left empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrder {
    pub customer_id: String,
    pub fabric_id: String,
    pub total_amount: i64,
    pub delivery_date: DateTime<Utc>,
    pub details: OrderDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Result of `POST /api/orders/{id}/generate-document`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub order_id: String,
    pub doc_url: String,
    /// Content fingerprint of the generated PDF.
    pub doc_hash: String,
    pub generated_at: DateTime<Utc>,
}
