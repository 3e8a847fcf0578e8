use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    NoShow,
}

/// Deposit payment state. The backend sends an empty string when no deposit
/// was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepositStatus {
    Pending,
    Succeeded,
    Failed,
    Refunded,
    #[serde(rename = "")]
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub user_id: String,
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitter_id: Option<String>,
    pub appointment_datetime: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_amount: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_payment_intent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit_status: Option<DepositStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancelled_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAppointment {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitter_id: Option<String>,
    pub appointment_datetime: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update. Omitted fields stay unchanged on the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateAppointment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fitter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment_datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Optional filters of `GET /api/appointments`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentFilter {
    pub user_id: Option<String>,
    pub fitter_id: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Free slots of a fitter on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    #[serde(default)]
    pub slots: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_deposit_status_parses() {
        let status: DepositStatus = serde_json::from_str(r#""""#).unwrap();
        assert_eq!(status, DepositStatus::None);
        let status: DepositStatus = serde_json::from_str(r#""succeeded""#).unwrap();
        assert_eq!(status, DepositStatus::Succeeded);
    }

    #[test]
    fn update_omits_unset_fields() {
        let update = UpdateAppointment {
            status: Some(AppointmentStatus::NoShow),
            ..UpdateAppointment::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"status": "NoShow"}));
    }

    #[test]
    fn null_deposit_amount_is_none() {
        let appointment: Appointment = serde_json::from_str(
            r#"{"id":"a1","user_id":"u1","tenant_id":"t",
                "appointment_datetime":"2025-06-01T10:00:00Z","duration_minutes":60,
                "status":"Pending","deposit_amount":null,"cancelled_at":null,
                "created_at":"2025-05-01T00:00:00Z","updated_at":"2025-05-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert!(appointment.deposit_amount.is_none());
        assert!(appointment.cancelled_at.is_none());
    }
}
