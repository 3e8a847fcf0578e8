//! Domain DTOs for the back-office API.
//!
//! # Design
//! These types mirror the backend's JSON schema but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift between the two. Every entity is owned by the server; the console
//! only holds read-through copies.

mod appointment;
mod customer;
mod diagnosis;
mod order;

use serde::de::value::StringDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Deserializer, Serialize};

pub use appointment::{
    Appointment, AppointmentFilter, AppointmentStatus, Availability, CreateAppointment,
    DepositStatus, UpdateAppointment,
};
pub use customer::Customer;
pub use diagnosis::{
    Archetype, ArchetypeScores, CreateDiagnosis, Diagnosis, DiagnosisFilter, DiagnosisResult,
    PlanType,
};
pub use order::{CreateOrder, GeneratedDocument, Order, OrderDetails, OrderStatus, OrderSummary};

/// One page of a list endpoint.
///
/// The backend names the item field `data` for diagnoses and appointments,
/// `customers` for customers and `orders` for a customer's history; all
/// spellings land in `items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(alias = "data", alias = "customers", alias = "orders")]
    pub items: Vec<T>,
    #[serde(default)]
    pub total: u64,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }
}

/// Read an explicit `null` as the type's default, the same as a missing
/// field. The backend passes unset raw JSON columns through as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read `""` (and `null`) as `None`. The backend serializes unset string
/// enums as the empty string.
pub(crate) fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.is_empty() => {
            let raw: StringDeserializer<D::Error> = raw.into_deserializer();
            T::deserialize(raw).map(Some)
        }
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_accepts_every_item_field_name() {
        let data: Page<u32> = serde_json::from_str(r#"{"data":[1,2],"total":2}"#).unwrap();
        let customers: Page<u32> = serde_json::from_str(r#"{"customers":[3],"total":1}"#).unwrap();
        let items: Page<u32> = serde_json::from_str(r#"{"items":[],"total":0}"#).unwrap();
        assert_eq!(data.items, vec![1, 2]);
        assert_eq!(customers.items, vec![3]);
        assert!(items.is_empty());
    }

    #[test]
    fn page_total_defaults_to_zero() {
        let page: Page<u32> = serde_json::from_str(r#"{"data":[7]}"#).unwrap();
        assert_eq!(page.total, 0);
        assert_eq!(page.len(), 1);
    }
}
