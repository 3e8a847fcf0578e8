use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ARCHETYPES: [&str; 5] = ["Classic", "Modern", "Elegant", "Sporty", "Casual"];
pub const PLAN_TYPES: [&str; 2] = ["Best Value", "Authentic"];

/// Consumption tax applied to order totals.
pub const TAX_RATE: f64 = 0.10;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub tenant_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub tenant_id: String,
    pub customer_id: String,
    pub fabric_id: String,
    pub status: String,
    pub total_amount: i64,
    pub tax_excluded_amount: i64,
    pub tax_amount: i64,
    pub tax_rate: f64,
    pub delivery_date: DateTime<Utc>,
    pub details: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

#[derive(Serialize)]
pub struct OrderSummary {
    pub id: String,
    pub tenant_id: String,
    pub customer_id: String,
    pub status: String,
    pub total_amount: i64,
    pub delivery_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            tenant_id: order.tenant_id.clone(),
            customer_id: order.customer_id.clone(),
            status: order.status.clone(),
            total_amount: order.total_amount,
            delivery_date: order.delivery_date,
            created_at: order.created_at,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateOrder {
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub fabric_id: String,
    pub total_amount: i64,
    pub delivery_date: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratedDocument {
    pub order_id: String,
    pub doc_url: String,
    pub doc_hash: String,
    pub generated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnosis {
    pub id: String,
    pub user_id: String,
    pub tenant_id: String,
    pub archetype: String,
    /// `""` when no plan was chosen.
    pub plan_type: String,
    /// `null` when the diagnosis was stored without a result.
    pub diagnosis_result: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateDiagnosis {
    #[serde(default)]
    pub user_id: String,
    pub archetype: String,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub diagnosis_result: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitter_id: Option<String>,
    pub appointment_datetime: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deposit_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    pub fn is_active(&self) -> bool {
        self.status != "Cancelled"
    }
}

#[derive(Deserialize)]
pub struct CreateAppointment {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub fitter_id: Option<String>,
    pub appointment_datetime: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateAppointment {
    pub fitter_id: Option<String>,
    pub appointment_datetime: Option<DateTime<Utc>>,
    pub duration_minutes: Option<u32>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct Availability {
    pub available: bool,
    pub slots: Vec<String>,
}

/// Tax-inclusive total split into its net amount and tax, rounding the net
/// amount to the nearest yen.
pub fn split_tax(total: i64) -> (i64, i64) {
    let net = (total as f64 / (1.0 + TAX_RATE)).round() as i64;
    (net, total - net)
}
