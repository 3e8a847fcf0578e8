//! Async facade over the resource clients.
//!
//! `Api` pairs the stateless [`TailorClient`] with a [`Transport`] and runs
//! build → send → parse for each operation. Every failure, whatever its kind,
//! is written to the log before it is handed back to the caller.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::client::TailorClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{
    Appointment, AppointmentFilter, Availability, CreateAppointment, CreateDiagnosis, CreateOrder,
    Customer, Diagnosis, DiagnosisFilter, GeneratedDocument, Order, OrderSummary, Page,
    UpdateAppointment,
};

#[derive(Clone)]
pub struct Api {
    client: TailorClient,
    transport: Arc<dyn Transport>,
    tenant_id: String,
}

impl Api {
    pub fn new(client: TailorClient, transport: Arc<dyn Transport>, tenant_id: impl Into<String>) -> Self {
        Self {
            client,
            transport,
            tenant_id: tenant_id.into(),
        }
    }

    /// Production wiring: `reqwest` transport configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::from_config(config)?;
        Ok(Self::new(
            TailorClient::new(&config.base_url),
            Arc::new(transport),
            config.tenant_id.clone(),
        ))
    }

    /// Tenant used when a caller does not name one.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn client(&self) -> &TailorClient {
        &self.client
    }

    async fn execute<R>(
        &self,
        request: Result<HttpRequest, ApiError>,
        parse: impl FnOnce(&TailorClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let result = async {
            let request = request?;
            debug!(method = %request.method, url = %request.url, "sending request");
            let response = self.transport.send(request).await?;
            debug!(status = response.status, "response received");
            parse(&self.client, response)
        }
        .await;
        if let Err(err) = &result {
            err.report();
        }
        result
    }

    /// Untyped call: `path` is relative to the base URL and carries its own
    /// query string.
    pub async fn send(&self, method: HttpMethod, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let request = self.client.build_raw(method, path, body);
        self.execute(request, |c, r| c.parse_raw(r)).await
    }

    // ========== Customers ==========

    pub async fn list_customers(&self, tenant_id: &str, search: Option<&str>) -> Result<Page<Customer>, ApiError> {
        let request = self.client.build_list_customers(tenant_id, search);
        self.execute(Ok(request), |c, r| c.parse_list_customers(r)).await
    }

    pub async fn get_customer(&self, tenant_id: &str, id: &str) -> Result<Customer, ApiError> {
        let request = self.client.build_get_customer(tenant_id, id);
        self.execute(Ok(request), |c, r| c.parse_get_customer(r)).await
    }

    pub async fn get_customer_orders(&self, tenant_id: &str, id: &str) -> Result<Vec<OrderSummary>, ApiError> {
        let request = self.client.build_get_customer_orders(tenant_id, id);
        self.execute(Ok(request), |c, r| c.parse_get_customer_orders(r)).await
    }

    // ========== Orders ==========

    /// Create an order. The tenant comes from the input, else the configured
    /// default.
    pub async fn create_order(&self, input: &CreateOrder) -> Result<Order, ApiError> {
        let tenant_id = input.tenant_id.as_deref().unwrap_or(&self.tenant_id);
        let request = self.client.build_create_order(tenant_id, input);
        self.execute(request, |c, r| c.parse_create_order(r)).await
    }

    pub async fn generate_order_document(&self, tenant_id: &str, order_id: &str) -> Result<GeneratedDocument, ApiError> {
        let request = self.client.build_generate_order_document(tenant_id, order_id);
        self.execute(Ok(request), |c, r| c.parse_generate_order_document(r)).await
    }

    // ========== Diagnoses ==========

    pub async fn create_diagnosis(&self, tenant_id: &str, input: &CreateDiagnosis) -> Result<Diagnosis, ApiError> {
        let request = self.client.build_create_diagnosis(tenant_id, input);
        self.execute(request, |c, r| c.parse_create_diagnosis(r)).await
    }

    pub async fn get_diagnosis(&self, tenant_id: &str, id: &str) -> Result<Diagnosis, ApiError> {
        let request = self.client.build_get_diagnosis(tenant_id, id);
        self.execute(Ok(request), |c, r| c.parse_get_diagnosis(r)).await
    }

    pub async fn list_diagnoses(&self, tenant_id: &str, filter: &DiagnosisFilter) -> Result<Page<Diagnosis>, ApiError> {
        let request = self.client.build_list_diagnoses(tenant_id, filter);
        self.execute(Ok(request), |c, r| c.parse_list_diagnoses(r)).await
    }

    pub async fn list_diagnoses_by_user(&self, tenant_id: &str, user_id: &str) -> Result<Vec<Diagnosis>, ApiError> {
        let request = self.client.build_list_diagnoses_by_user(tenant_id, user_id);
        self.execute(Ok(request), |c, r| c.parse_list_diagnoses_by_user(r)).await
    }

    pub async fn delete_diagnosis(&self, tenant_id: &str, id: &str) -> Result<(), ApiError> {
        let request = self.client.build_delete_diagnosis(tenant_id, id);
        self.execute(Ok(request), |c, r| c.parse_delete_diagnosis(r)).await
    }

    // ========== Appointments ==========

    pub async fn create_appointment(&self, tenant_id: &str, input: &CreateAppointment) -> Result<Appointment, ApiError> {
        let request = self.client.build_create_appointment(tenant_id, input);
        self.execute(request, |c, r| c.parse_create_appointment(r)).await
    }

    pub async fn get_appointment(&self, tenant_id: &str, id: &str) -> Result<Appointment, ApiError> {
        let request = self.client.build_get_appointment(tenant_id, id);
        self.execute(Ok(request), |c, r| c.parse_get_appointment(r)).await
    }

    pub async fn list_appointments(
        &self,
        tenant_id: &str,
        filter: &AppointmentFilter,
    ) -> Result<Page<Appointment>, ApiError> {
        let request = self.client.build_list_appointments(tenant_id, filter);
        self.execute(Ok(request), |c, r| c.parse_list_appointments(r)).await
    }

    pub async fn update_appointment(
        &self,
        tenant_id: &str,
        id: &str,
        input: &UpdateAppointment,
    ) -> Result<Appointment, ApiError> {
        let request = self.client.build_update_appointment(tenant_id, id, input);
        self.execute(request, |c, r| c.parse_update_appointment(r)).await
    }

    pub async fn cancel_appointment(&self, tenant_id: &str, id: &str, reason: &str) -> Result<(), ApiError> {
        let request = self.client.build_cancel_appointment(tenant_id, id, reason);
        self.execute(Ok(request), |c, r| c.parse_cancel_appointment(r)).await
    }

    pub async fn check_availability(
        &self,
        tenant_id: &str,
        fitter_id: &str,
        date: NaiveDate,
    ) -> Result<Availability, ApiError> {
        let request = self.client.build_check_availability(tenant_id, fitter_id, date);
        self.execute(Ok(request), |c, r| c.parse_check_availability(r)).await
    }
}
