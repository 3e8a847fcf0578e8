//! In-memory stand-in for the back-office API.
//!
//! Serves every endpoint the console consumes with the backend's wire
//! shapes: tenant scoping through the `tenant_id` query parameter, plain-text
//! error bodies, page envelopes on list endpoints. Tests seed data and inject
//! per-route faults through [`AppState`].

pub mod models;

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

pub use axum::http::StatusCode as Status;

use models::{
    split_tax, Appointment, Availability, CreateAppointment, CreateDiagnosis, CreateOrder, Customer,
    Diagnosis, GeneratedDocument, Order, OrderSummary, UpdateAppointment, ARCHETYPES, PLAN_TYPES,
    TAX_RATE,
};

type Params = HashMap<String, String>;
type Reply<T> = Result<T, Response>;

const DEFAULT_DIAGNOSIS_LIMIT: usize = 20;
const MAX_DIAGNOSIS_LIMIT: usize = 100;
const APPOINTMENT_STATUSES: [&str; 5] = ["Pending", "Confirmed", "Cancelled", "Completed", "NoShow"];
/// Bookable fitting hours (UTC), one slot per hour.
const SLOT_HOURS: std::ops::Range<u32> = 10..18;

/// Endpoint a [`Fault`] is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    ListCustomers,
    GetCustomer,
    CustomerOrders,
    CreateOrder,
    GenerateDocument,
    CreateDiagnosis,
    GetDiagnosis,
    ListDiagnoses,
    DeleteDiagnosis,
    CreateAppointment,
    GetAppointment,
    ListAppointments,
    UpdateAppointment,
    CancelAppointment,
    Availability,
}

/// Injected misbehavior: wait `delay`, then answer with `reply` instead of
/// handling the request (or handle it normally if `reply` is `None`).
#[derive(Clone, Debug)]
pub struct Fault {
    pub delay: Duration,
    pub reply: Option<(StatusCode, String)>,
}

impl Fault {
    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            reply: Some((status, body.into())),
        }
    }

    pub fn delay(delay: Duration) -> Self {
        Self { delay, reply: None }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
pub struct Store {
    customers: HashMap<String, Customer>,
    orders: HashMap<String, Order>,
    documents: HashMap<String, GeneratedDocument>,
    diagnoses: HashMap<String, Diagnosis>,
    appointments: HashMap<String, Appointment>,
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Clone, Default)]
pub struct AppState {
    db: Db,
    faults: Arc<RwLock<HashMap<Route, Fault>>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `fault` to `route` until cleared.
    pub async fn inject(&self, route: Route, fault: Fault) {
        self.faults.write().await.insert(route, fault);
    }

    pub async fn clear_faults(&self) {
        self.faults.write().await.clear();
    }

    pub async fn seed_customer(&self, tenant_id: &str, name: &str, phone: Option<&str>) -> Customer {
        let now = Utc::now();
        let customer = Customer {
            id: new_id(),
            tenant_id: tenant_id.to_string(),
            name: name.to_string(),
            email: None,
            phone: phone.map(str::to_string),
            address: None,
            created_at: now,
            updated_at: now,
        };
        let mut db = self.db.write().await;
        db.customers.insert(customer.id.clone(), customer.clone());
        customer
    }

    pub async fn seed_diagnosis(&self, tenant_id: &str, user_id: &str, archetype: &str) -> Diagnosis {
        let now = Utc::now();
        let diagnosis = Diagnosis {
            id: new_id(),
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            archetype: archetype.to_string(),
            plan_type: String::new(),
            diagnosis_result: json!({ "scores": {} }),
            created_at: now,
            updated_at: now,
        };
        let mut db = self.db.write().await;
        db.diagnoses.insert(diagnosis.id.clone(), diagnosis.clone());
        diagnosis
    }

    pub async fn seed_appointment(
        &self,
        tenant_id: &str,
        user_id: &str,
        fitter_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> Appointment {
        let now = Utc::now();
        let appointment = Appointment {
            id: new_id(),
            user_id: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            fitter_id: fitter_id.map(str::to_string),
            appointment_datetime: at,
            duration_minutes: 60,
            status: "Pending".to_string(),
            deposit_amount: None,
            deposit_status: None,
            notes: None,
            cancelled_at: None,
            cancelled_reason: None,
            created_at: now,
            updated_at: now,
        };
        let mut db = self.db.write().await;
        db.appointments.insert(appointment.id.clone(), appointment.clone());
        appointment
    }

    pub async fn orders(&self) -> Vec<Order> {
        self.db.read().await.orders.values().cloned().collect()
    }

    pub async fn documents(&self) -> Vec<GeneratedDocument> {
        self.db.read().await.documents.values().cloned().collect()
    }

    /// Apply any fault on `route`, then resolve the caller's tenant.
    async fn admit(&self, route: Route, params: &Params) -> Reply<String> {
        let fault = self.faults.read().await.get(&route).cloned();
        if let Some(fault) = fault {
            debug!(?route, ?fault, "applying fault");
            if !fault.delay.is_zero() {
                tokio::time::sleep(fault.delay).await;
            }
            if let Some((status, body)) = fault.reply {
                return Err((status, body).into_response());
            }
        }
        tenant(params)
    }
}

pub fn app() -> Router {
    router(AppState::default())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/customers", get(list_customers))
        .route("/api/customers/{id}", get(get_customer))
        .route("/api/customers/{id}/orders", get(customer_orders))
        .route("/api/orders", post(create_order))
        .route("/api/orders/{id}/generate-document", post(generate_document))
        .route("/api/diagnoses", get(list_diagnoses).post(create_diagnosis))
        .route("/api/diagnoses/{id}", get(get_diagnosis).delete(delete_diagnosis))
        .route("/api/appointments", get(list_appointments).post(create_appointment))
        .route("/api/appointments/availability", get(availability))
        .route(
            "/api/appointments/{id}",
            get(get_appointment)
                .patch(update_appointment)
                .delete(cancel_appointment),
        )
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, AppState::default()).await
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, router(state)).await
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    let message: String = message.into();
    (status, message).into_response()
}

fn param<'a>(params: &'a Params, name: &str) -> Option<&'a str> {
    params
        .get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
}

fn tenant(params: &Params) -> Reply<String> {
    param(params, "tenant_id").map(str::to_string).ok_or_else(|| {
        error(
            StatusCode::UNAUTHORIZED,
            "Authentication required or tenant_id must be provided",
        )
    })
}

fn parse_datetime(params: &Params, name: &str) -> Reply<Option<DateTime<Utc>>> {
    param(params, name)
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|at| at.with_timezone(&Utc))
                .map_err(|e| error(StatusCode::BAD_REQUEST, format!("Invalid {name} format: {e}")))
        })
        .transpose()
}

// ========== Customers ==========

async fn list_customers(State(state): State<AppState>, Query(params): Query<Params>) -> Reply<Json<Value>> {
    let tenant_id = state.admit(Route::ListCustomers, &params).await?;
    let search = param(&params, "search").map(str::to_lowercase);

    let db = state.db.read().await;
    let mut customers: Vec<&Customer> = db
        .customers
        .values()
        .filter(|c| c.tenant_id == tenant_id)
        .filter(|c| match &search {
            Some(term) => [Some(&c.name), c.phone.as_ref(), c.email.as_ref()]
                .into_iter()
                .flatten()
                .any(|field| field.to_lowercase().contains(term.as_str())),
            None => true,
        })
        .collect();
    customers.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    Ok(Json(json!({ "customers": customers, "total": customers.len() })))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Reply<Json<Customer>> {
    let tenant_id = state.admit(Route::GetCustomer, &params).await?;
    let db = state.db.read().await;
    db.customers
        .get(&id)
        .filter(|c| c.tenant_id == tenant_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "customer not found"))
}

async fn customer_orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Reply<Json<Value>> {
    let tenant_id = state.admit(Route::CustomerOrders, &params).await?;
    let db = state.db.read().await;
    if !db.customers.get(&id).is_some_and(|c| c.tenant_id == tenant_id) {
        return Err(error(StatusCode::NOT_FOUND, "customer not found"));
    }
    let mut orders: Vec<&Order> = db
        .orders
        .values()
        .filter(|o| o.tenant_id == tenant_id && o.customer_id == id)
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
    let orders: Vec<OrderSummary> = orders.into_iter().map(OrderSummary::from).collect();

    Ok(Json(json!({ "orders": orders, "total": orders.len() })))
}

// ========== Orders ==========

async fn create_order(
    State(state): State<AppState>,
    Query(params): Query<Params>,
    Json(input): Json<CreateOrder>,
) -> Reply<(StatusCode, Json<Order>)> {
    let query_tenant = state.admit(Route::CreateOrder, &params).await?;
    let tenant_id = input
        .tenant_id
        .filter(|t| !t.trim().is_empty())
        .unwrap_or(query_tenant);
    if input.customer_id.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "customer_id is required"));
    }
    if input.fabric_id.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "fabric_id is required"));
    }
    if input.total_amount <= 0 {
        return Err(error(StatusCode::BAD_REQUEST, "total_amount must be positive"));
    }

    let now = Utc::now();
    let (tax_excluded_amount, tax_amount) = split_tax(input.total_amount);
    let order = Order {
        id: new_id(),
        tenant_id,
        customer_id: input.customer_id,
        fabric_id: input.fabric_id,
        status: "Draft".to_string(),
        total_amount: input.total_amount,
        tax_excluded_amount,
        tax_amount,
        tax_rate: TAX_RATE,
        delivery_date: input.delivery_date,
        details: input.details.unwrap_or_else(|| json!({})),
        created_at: now,
        updated_at: now,
        created_by: input.created_by,
    };
    info!(order_id = %order.id, customer_id = %order.customer_id, "order created");
    state.db.write().await.orders.insert(order.id.clone(), order.clone());
    Ok((StatusCode::CREATED, Json(order)))
}

async fn generate_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Reply<Json<GeneratedDocument>> {
    let tenant_id = state.admit(Route::GenerateDocument, &params).await?;
    let mut db = state.db.write().await;
    if !db.orders.get(&id).is_some_and(|o| o.tenant_id == tenant_id) {
        return Err(error(StatusCode::NOT_FOUND, "order not found"));
    }
    let document = GeneratedDocument {
        order_id: id.clone(),
        doc_url: format!("https://documents.tailor-cloud.local/{tenant_id}/orders/{id}.pdf"),
        doc_hash: Uuid::new_v4().simple().to_string(),
        generated_at: Utc::now(),
    };
    info!(order_id = %id, "order document generated");
    db.documents.insert(id, document.clone());
    Ok(Json(document))
}

// ========== Diagnoses ==========

async fn create_diagnosis(
    State(state): State<AppState>,
    Query(params): Query<Params>,
    Json(input): Json<CreateDiagnosis>,
) -> Reply<(StatusCode, Json<Diagnosis>)> {
    let tenant_id = state.admit(Route::CreateDiagnosis, &params).await?;
    if input.user_id.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "user_id is required"));
    }
    if !ARCHETYPES.contains(&input.archetype.as_str()) {
        return Err(error(StatusCode::BAD_REQUEST, "invalid archetype"));
    }
    let plan_type = input.plan_type.unwrap_or_default();
    if !plan_type.is_empty() && !PLAN_TYPES.contains(&plan_type.as_str()) {
        return Err(error(StatusCode::BAD_REQUEST, "invalid plan_type"));
    }

    let now = Utc::now();
    let diagnosis = Diagnosis {
        id: new_id(),
        user_id: input.user_id,
        tenant_id,
        archetype: input.archetype,
        plan_type,
        diagnosis_result: input.diagnosis_result.unwrap_or(Value::Null),
        created_at: now,
        updated_at: now,
    };
    state
        .db
        .write()
        .await
        .diagnoses
        .insert(diagnosis.id.clone(), diagnosis.clone());
    Ok((StatusCode::CREATED, Json(diagnosis)))
}

async fn get_diagnosis(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Reply<Json<Diagnosis>> {
    let tenant_id = state.admit(Route::GetDiagnosis, &params).await?;
    let db = state.db.read().await;
    db.diagnoses
        .get(&id)
        .filter(|d| d.tenant_id == tenant_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "diagnosis not found"))
}

/// Narrowed to one user when `user_id` is given (unpaged), otherwise one
/// page of the tenant's diagnoses, newest first.
async fn list_diagnoses(State(state): State<AppState>, Query(params): Query<Params>) -> Reply<Json<Value>> {
    let tenant_id = state.admit(Route::ListDiagnoses, &params).await?;
    let user_id = param(&params, "user_id");

    let db = state.db.read().await;
    let mut diagnoses: Vec<&Diagnosis> = db
        .diagnoses
        .values()
        .filter(|d| d.tenant_id == tenant_id)
        .filter(|d| user_id.map_or(true, |u| d.user_id == u))
        .collect();
    diagnoses.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

    if user_id.is_none() {
        let limit = param(&params, "limit")
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|limit| *limit > 0)
            .map_or(DEFAULT_DIAGNOSIS_LIMIT, |limit| limit.min(MAX_DIAGNOSIS_LIMIT));
        let offset = param(&params, "offset")
            .and_then(|raw| raw.parse::<usize>().ok())
            .unwrap_or(0);
        diagnoses = diagnoses.into_iter().skip(offset).take(limit).collect();
    }

    let archetype = param(&params, "archetype");
    let plan_type = param(&params, "plan_type");
    diagnoses.retain(|d| {
        archetype.map_or(true, |a| d.archetype == a)
            && plan_type.map_or(true, |p| d.plan_type == p)
    });

    Ok(Json(json!({ "data": diagnoses, "total": diagnoses.len() })))
}

async fn delete_diagnosis(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Reply<StatusCode> {
    let tenant_id = state.admit(Route::DeleteDiagnosis, &params).await?;
    let mut db = state.db.write().await;
    if !db.diagnoses.get(&id).is_some_and(|d| d.tenant_id == tenant_id) {
        return Err(error(StatusCode::NOT_FOUND, "diagnosis not found"));
    }
    db.diagnoses.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

// ========== Appointments ==========

fn fitter_busy(db: &Store, tenant_id: &str, fitter_id: &str, at: DateTime<Utc>, except: Option<&str>) -> bool {
    db.appointments.values().any(|a| {
        a.tenant_id == tenant_id
            && a.is_active()
            && a.fitter_id.as_deref() == Some(fitter_id)
            && a.appointment_datetime == at
            && Some(a.id.as_str()) != except
    })
}

async fn create_appointment(
    State(state): State<AppState>,
    Query(params): Query<Params>,
    Json(input): Json<CreateAppointment>,
) -> Reply<(StatusCode, Json<Appointment>)> {
    let tenant_id = state.admit(Route::CreateAppointment, &params).await?;
    if input.user_id.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "user_id is required"));
    }
    if input.duration_minutes == 0 {
        return Err(error(StatusCode::BAD_REQUEST, "duration_minutes must be positive"));
    }

    let mut db = state.db.write().await;
    if let Some(fitter_id) = input.fitter_id.as_deref() {
        if fitter_busy(&db, &tenant_id, fitter_id, input.appointment_datetime, None) {
            return Err(error(StatusCode::CONFLICT, "fitter is not available at the requested time"));
        }
    }
    let now = Utc::now();
    let appointment = Appointment {
        id: new_id(),
        user_id: input.user_id,
        tenant_id,
        fitter_id: input.fitter_id,
        appointment_datetime: input.appointment_datetime,
        duration_minutes: input.duration_minutes,
        status: "Pending".to_string(),
        deposit_amount: None,
        deposit_status: None,
        notes: input.notes,
        cancelled_at: None,
        cancelled_reason: None,
        created_at: now,
        updated_at: now,
    };
    db.appointments.insert(appointment.id.clone(), appointment.clone());
    Ok((StatusCode::CREATED, Json(appointment)))
}

async fn get_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Reply<Json<Appointment>> {
    let tenant_id = state.admit(Route::GetAppointment, &params).await?;
    let db = state.db.read().await;
    db.appointments
        .get(&id)
        .filter(|a| a.tenant_id == tenant_id)
        .cloned()
        .map(Json)
        .ok_or_else(|| error(StatusCode::NOT_FOUND, "appointment not found"))
}

async fn list_appointments(State(state): State<AppState>, Query(params): Query<Params>) -> Reply<Json<Value>> {
    let tenant_id = state.admit(Route::ListAppointments, &params).await?;
    let user_id = param(&params, "user_id");
    let fitter_id = param(&params, "fitter_id");
    let start = parse_datetime(&params, "start_date")?;
    let end = parse_datetime(&params, "end_date")?;

    let db = state.db.read().await;
    let mut appointments: Vec<&Appointment> = db
        .appointments
        .values()
        .filter(|a| a.tenant_id == tenant_id)
        .filter(|a| user_id.map_or(true, |u| a.user_id == u))
        .filter(|a| fitter_id.map_or(true, |f| a.fitter_id.as_deref() == Some(f)))
        .filter(|a| start.map_or(true, |s| a.appointment_datetime >= s))
        .filter(|a| end.map_or(true, |e| a.appointment_datetime <= e))
        .collect();
    appointments.sort_by(|a, b| {
        a.appointment_datetime
            .cmp(&b.appointment_datetime)
            .then_with(|| a.id.cmp(&b.id))
    });

    Ok(Json(json!({ "data": appointments, "total": appointments.len() })))
}

async fn update_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
    Json(input): Json<UpdateAppointment>,
) -> Reply<Json<Appointment>> {
    let tenant_id = state.admit(Route::UpdateAppointment, &params).await?;
    if input
        .status
        .as_deref()
        .is_some_and(|s| !APPOINTMENT_STATUSES.contains(&s))
    {
        return Err(error(StatusCode::BAD_REQUEST, "invalid status"));
    }

    let mut db = state.db.write().await;
    let Some(current) = db.appointments.get(&id).filter(|a| a.tenant_id == tenant_id) else {
        return Err(error(StatusCode::NOT_FOUND, "appointment not found"));
    };
    let fitter_id = input.fitter_id.clone().or_else(|| current.fitter_id.clone());
    let at = input.appointment_datetime.unwrap_or(current.appointment_datetime);
    if let Some(fitter_id) = fitter_id.as_deref() {
        if fitter_busy(&db, &tenant_id, fitter_id, at, Some(id.as_str())) {
            return Err(error(StatusCode::CONFLICT, "fitter is not available at the requested time"));
        }
    }

    let Some(appointment) = db.appointments.get_mut(&id) else {
        return Err(error(StatusCode::NOT_FOUND, "appointment not found"));
    };
    appointment.fitter_id = fitter_id;
    appointment.appointment_datetime = at;
    if let Some(duration) = input.duration_minutes {
        appointment.duration_minutes = duration;
    }
    if let Some(status) = input.status {
        appointment.status = status;
    }
    if let Some(notes) = input.notes {
        appointment.notes = Some(notes);
    }
    appointment.updated_at = Utc::now();
    Ok(Json(appointment.clone()))
}

async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<Params>,
) -> Reply<StatusCode> {
    let tenant_id = state.admit(Route::CancelAppointment, &params).await?;
    let reason = param(&params, "reason").map(str::to_string);

    let mut db = state.db.write().await;
    let Some(appointment) = db
        .appointments
        .get_mut(&id)
        .filter(|a| a.tenant_id == tenant_id)
    else {
        return Err(error(StatusCode::NOT_FOUND, "appointment not found"));
    };
    let now = Utc::now();
    appointment.status = "Cancelled".to_string();
    appointment.cancelled_at = Some(now);
    appointment.cancelled_reason = reason;
    appointment.updated_at = now;
    Ok(StatusCode::NO_CONTENT)
}

/// Hourly slots of one fitter on one day, minus booked hours.
async fn availability(State(state): State<AppState>, Query(params): Query<Params>) -> Reply<Json<Availability>> {
    let tenant_id = state.admit(Route::Availability, &params).await?;
    let fitter_id = param(&params, "fitter_id")
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "fitter_id is required"))?;
    let date = param(&params, "date")
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "date is required"))
        .and_then(|raw| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| error(StatusCode::BAD_REQUEST, "Invalid date format (expected YYYY-MM-DD)"))
        })?;

    let db = state.db.read().await;
    let booked: Vec<u32> = db
        .appointments
        .values()
        .filter(|a| {
            a.tenant_id == tenant_id
                && a.is_active()
                && a.fitter_id.as_deref() == Some(fitter_id)
                && a.appointment_datetime.date_naive() == date
        })
        .map(|a| a.appointment_datetime.hour())
        .collect();
    let slots: Vec<String> = SLOT_HOURS
        .filter(|hour| !booked.contains(hour))
        .map(|hour| format!("{hour:02}:00"))
        .collect();

    Ok(Json(Availability {
        available: !slots.is_empty(),
        slots,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn tenant_is_required() {
        assert_eq!(tenant(&params(&[("tenant_id", "t")])).unwrap(), "t");
        let response = tenant(&params(&[("tenant_id", "  ")])).unwrap_err();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn blank_params_are_absent() {
        let p = params(&[("search", " "), ("user_id", " u-1 ")]);
        assert_eq!(param(&p, "search"), None);
        assert_eq!(param(&p, "user_id"), Some("u-1"));
        assert_eq!(param(&p, "missing"), None);
    }

    #[test]
    fn bad_datetime_param_is_bad_request() {
        let p = params(&[("start_date", "yesterday")]);
        let response = parse_datetime(&p, "start_date").unwrap_err();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(parse_datetime(&p, "end_date").unwrap(), None);
    }

    #[tokio::test]
    async fn fault_replaces_reply() {
        let state = AppState::new();
        state
            .inject(Route::ListCustomers, Fault::status(StatusCode::INTERNAL_SERVER_ERROR, "boom"))
            .await;
        let err = state
            .admit(Route::ListCustomers, &params(&[("tenant_id", "t")]))
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        state.clear_faults().await;
        assert!(state.admit(Route::ListCustomers, &params(&[("tenant_id", "t")])).await.is_ok());
    }
}
