//! Order creation and document generation.
//!
//! # Design
//! The dialog walks `Idle → Validating → CreatingOrder → GeneratingDocument
//! → Done`, dropping into `Error` from any of the three working states.
//! Validation is fail-fast and stops at the first bad field, so nothing
//! reaches the network until the form is clean. Document generation is
//! issued only after order creation has resolved successfully.
//!
//! A successful create invalidates the customer's order-history cache entry
//! before generation starts, so the history is refetched even when
//! generation later fails. The order exists at that point; a generation
//! failure is reported on its own and leaves the dialog open.
//!
//! Each open of the dialog starts a new session. A flow that is still
//! suspended when its session ends (dialog closed or reopened) keeps running
//! but no longer writes into the dialog.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::api::Api;
use crate::cache::{QueryCache, QueryKey};
use crate::error::{ApiError, ValidationError};
use crate::locale;
use crate::types::{CreateOrder, GeneratedDocument, OrderDetails, OrderSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    FabricId,
    TotalAmount,
    DeliveryDate,
    Description,
}

impl ValidationError {
    /// The form field the error points at.
    pub fn field(&self) -> FormField {
        match self {
            ValidationError::MissingFabricId => FormField::FabricId,
            ValidationError::InvalidAmount => FormField::TotalAmount,
            ValidationError::MissingDeliveryDate | ValidationError::MalformedDeliveryDate => {
                FormField::DeliveryDate
            }
            ValidationError::EmptyDescription => FormField::Description,
        }
    }
}

/// Raw text of the order dialog's inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderForm {
    pub fabric_id: String,
    pub total_amount: String,
    pub delivery_date: String,
    pub description: String,
}

impl OrderForm {
    /// A fresh form: delivery today, stock description.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            fabric_id: String::new(),
            total_amount: String::new(),
            delivery_date: today.format("%Y-%m-%d").to_string(),
            description: locale::DEFAULT_ORDER_DESCRIPTION.to_string(),
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::FabricId => self.fabric_id = value,
            FormField::TotalAmount => self.total_amount = value,
            FormField::DeliveryDate => self.delivery_date = value,
            FormField::Description => self.description = value,
        }
    }

    /// Helper text under a required field that is currently unusable.
    pub fn hint(&self, field: FormField) -> Option<&'static str> {
        match field {
            FormField::FabricId if self.fabric_id.trim().is_empty() => {
                Some(locale::FABRIC_ID_HINT)
            }
            FormField::TotalAmount if parse_amount(&self.total_amount).is_err() => {
                Some(locale::AMOUNT_HINT)
            }
            _ => None,
        }
    }
}

/// Form input that passed validation, ready to submit.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOrder {
    pub fabric_id: String,
    pub total_amount: i64,
    pub delivery_date: DateTime<Utc>,
    pub description: String,
}

impl ValidatedOrder {
    pub fn into_request(self, customer_id: &str, tenant_id: &str) -> CreateOrder {
        CreateOrder {
            customer_id: customer_id.to_string(),
            fabric_id: self.fabric_id,
            total_amount: self.total_amount,
            delivery_date: self.delivery_date,
            details: OrderDetails {
                description: self.description,
                ..OrderDetails::default()
            },
            tenant_id: Some(tenant_id.to_string()),
            created_by: None,
        }
    }
}

/// Check the form in field order and stop at the first failure.
pub fn validate(form: &OrderForm) -> Result<ValidatedOrder, ValidationError> {
    let fabric_id = form.fabric_id.trim();
    if fabric_id.is_empty() {
        return Err(ValidationError::MissingFabricId);
    }
    let total_amount = parse_amount(&form.total_amount)?;
    let delivery_date = normalize_delivery_date(&form.delivery_date)?;
    let description = form.description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(ValidatedOrder {
        fabric_id: fabric_id.to_string(),
        total_amount,
        delivery_date,
        description: description.to_string(),
    })
}

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// Whole yen, strictly positive.
///
/// Plain integers are read exactly. Decimal and exponent forms go through
/// `f64` and must stay below 2^53.
pub fn parse_amount(raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if let Ok(amount) = raw.parse::<i64>() {
        return if amount > 0 {
            Ok(amount)
        } else {
            Err(ValidationError::InvalidAmount)
        };
    }
    let amount: f64 = raw.parse().map_err(|_| ValidationError::InvalidAmount)?;
    if !amount.is_finite() || amount <= 0.0 || amount.fract() != 0.0 || amount >= MAX_EXACT_FLOAT {
        return Err(ValidationError::InvalidAmount);
    }
    Ok(amount as i64)
}

/// Accept a date (`2025-12-31`, taken as midnight UTC) or a full RFC 3339
/// timestamp.
pub fn normalize_delivery_date(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingDeliveryDate);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| ValidationError::MalformedDeliveryDate)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FlowError {
    #[error("{0}")]
    Validation(ValidationError),
    #[error("{0}")]
    CreateOrder(ApiError),
    /// The order was created; only the document is missing.
    #[error("{source}")]
    GenerateDocument { order_id: String, source: ApiError },
}

impl FlowError {
    /// Banner headline. Validation errors are shown bare.
    pub fn headline(&self) -> Option<&'static str> {
        match self {
            FlowError::Validation(_) => None,
            FlowError::CreateOrder(_) => Some(locale::ORDER_CREATE_FAILED),
            FlowError::GenerateDocument { .. } => Some(locale::DOCUMENT_FAILED),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FlowState {
    Idle,
    Validating,
    CreatingOrder,
    GeneratingDocument { order_id: String },
    Done { document: GeneratedDocument },
    Error(FlowError),
}

impl FlowState {
    /// A request is in flight; submission is disabled.
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            FlowState::Validating | FlowState::CreatingOrder | FlowState::GeneratingDocument { .. }
        )
    }

    pub fn error(&self) -> Option<&FlowError> {
        match self {
            FlowState::Error(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct DialogInner {
    open: bool,
    session: u64,
    form: OrderForm,
    state: FlowState,
    last_document: Option<GeneratedDocument>,
}

/// The "create order for this customer" dialog.
pub struct OrderDialog {
    api: Api,
    customer_id: String,
    tenant_id: String,
    orders_cache: Arc<QueryCache<Vec<OrderSummary>>>,
    orders_key: QueryKey,
    inner: Mutex<DialogInner>,
}

impl OrderDialog {
    /// `orders_key` is the cache entry of this customer's order history in
    /// `orders_cache`; it is invalidated whenever an order gets created.
    pub fn new(
        api: Api,
        customer_id: impl Into<String>,
        orders_cache: Arc<QueryCache<Vec<OrderSummary>>>,
        orders_key: QueryKey,
    ) -> Self {
        let tenant_id = api.tenant_id().to_string();
        Self {
            api,
            customer_id: customer_id.into(),
            tenant_id,
            orders_cache,
            orders_key,
            inner: Mutex::new(DialogInner {
                open: false,
                session: 0,
                form: OrderForm::default(),
                state: FlowState::Idle,
                last_document: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DialogInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open(&self) {
        self.open_on(Local::now().date_naive());
    }

    /// Open with a fresh form whose delivery date defaults to `today`.
    pub fn open_on(&self, today: NaiveDate) {
        let mut inner = self.lock();
        inner.open = true;
        inner.session += 1;
        inner.form = OrderForm::new(today);
        inner.state = FlowState::Idle;
    }

    /// Close the dialog. A flow still in flight is detached, not aborted.
    pub fn close(&self) {
        let mut inner = self.lock();
        if inner.state.is_busy() {
            debug!(customer_id = %self.customer_id, "closing dialog with a request in flight");
        }
        inner.open = false;
        inner.session += 1;
        inner.state = FlowState::Idle;
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn form(&self) -> OrderForm {
        self.lock().form.clone()
    }

    pub fn state(&self) -> FlowState {
        self.lock().state.clone()
    }

    /// URL of the most recently generated order document, kept across
    /// dialog sessions.
    pub fn last_document(&self) -> Option<GeneratedDocument> {
        self.lock().last_document.clone()
    }

    /// Edit one input. An error on display is cleared, re-enabling submit.
    pub fn edit(&self, field: FormField, value: impl Into<String>) {
        let mut inner = self.lock();
        inner.form.set(field, value.into());
        if matches!(inner.state, FlowState::Error(_)) {
            inner.state = FlowState::Idle;
        }
    }

    /// Validate, create the order, then generate its document.
    ///
    /// Returns the state the flow ended in. Ignored (returning the current
    /// state) while the dialog is closed or a request is in flight.
    #[instrument(skip(self), fields(customer_id = %self.customer_id))]
    pub async fn submit(&self) -> FlowState {
        let (session, form) = {
            let mut inner = self.lock();
            if !inner.open || inner.state.is_busy() {
                return inner.state.clone();
            }
            inner.state = FlowState::Validating;
            (inner.session, inner.form.clone())
        };

        let order = match validate(&form) {
            Ok(order) => order,
            Err(err) => {
                warn!(%err, "order form rejected");
                return self.settle(session, FlowState::Error(FlowError::Validation(err)));
            }
        };

        self.settle(session, FlowState::CreatingOrder);
        let request = order.into_request(&self.customer_id, &self.tenant_id);
        let order = match self.api.create_order(&request).await {
            Ok(order) => order,
            Err(err) => {
                return self.settle(session, FlowState::Error(FlowError::CreateOrder(err)));
            }
        };
        info!(order_id = %order.id, "order created");
        self.orders_cache.invalidate(&self.orders_key);

        self.settle(
            session,
            FlowState::GeneratingDocument {
                order_id: order.id.clone(),
            },
        );
        match self.api.generate_order_document(&self.tenant_id, &order.id).await {
            Ok(document) => {
                info!(order_id = %order.id, doc_url = %document.doc_url, "order document generated");
                self.finish(session, document)
            }
            Err(err) => {
                warn!(order_id = %order.id, "order created without a document");
                self.settle(
                    session,
                    FlowState::Error(FlowError::GenerateDocument {
                        order_id: order.id,
                        source: err,
                    }),
                )
            }
        }
    }

    /// Record `state` if `session` is still the dialog's current one.
    fn settle(&self, session: u64, state: FlowState) -> FlowState {
        let mut inner = self.lock();
        if inner.session == session {
            inner.state = state.clone();
        } else {
            debug!("dialog session ended; result not rendered");
        }
        state
    }

    fn finish(&self, session: u64, document: GeneratedDocument) -> FlowState {
        let state = FlowState::Done {
            document: document.clone(),
        };
        let mut inner = self.lock();
        if inner.session == session {
            inner.last_document = Some(document);
            inner.state = state.clone();
            inner.open = false;
        } else {
            debug!("dialog session ended; result not rendered");
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn valid_form() -> OrderForm {
        OrderForm {
            fabric_id: "F1".to_string(),
            total_amount: "50000".to_string(),
            delivery_date: "2025-12-31".to_string(),
            description: "suit".to_string(),
        }
    }

    #[test]
    fn valid_form_normalizes() {
        let order = validate(&valid_form()).unwrap();
        assert_eq!(order.fabric_id, "F1");
        assert_eq!(order.total_amount, 50000);
        assert_eq!(
            order.delivery_date,
            Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap()
        );
        assert_eq!(order.description, "suit");
    }

    #[test]
    fn fields_are_trimmed() {
        let form = OrderForm {
            fabric_id: "  F1 ".to_string(),
            description: "\tsuit\n".to_string(),
            ..valid_form()
        };
        let order = validate(&form).unwrap();
        assert_eq!(order.fabric_id, "F1");
        assert_eq!(order.description, "suit");
    }

    #[test]
    fn missing_fabric_id_fails_first() {
        let form = OrderForm {
            fabric_id: "   ".to_string(),
            total_amount: "-1".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&form), Err(ValidationError::MissingFabricId));
    }

    #[test]
    fn bad_amounts() {
        for raw in ["", "0", "-5", "abc", "NaN", "inf", "12.5", "1e400"] {
            let form = OrderForm {
                total_amount: raw.to_string(),
                ..valid_form()
            };
            assert_eq!(
                validate(&form),
                Err(ValidationError::InvalidAmount),
                "amount {raw:?}"
            );
        }
    }

    #[test]
    fn large_integer_amounts_are_exact() {
        assert_eq!(parse_amount("9007199254740993"), Ok(9_007_199_254_740_993));
        assert_eq!(parse_amount(&i64::MAX.to_string()), Ok(i64::MAX));
        assert_eq!(parse_amount("9223372036854775808"), Err(ValidationError::InvalidAmount));
    }

    #[test]
    fn inexact_float_amounts_are_rejected() {
        assert_eq!(parse_amount("9007199254740993.0"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_amount("1e16"), Err(ValidationError::InvalidAmount));
        assert_eq!(parse_amount("9007199254740991.0"), Ok(9_007_199_254_740_991));
    }

    #[test]
    fn amount_accepts_exponent_and_padding() {
        assert_eq!(parse_amount(" 1e3 "), Ok(1000));
        assert_eq!(parse_amount("50000.0"), Ok(50000));
    }

    #[test]
    fn delivery_date_checks() {
        let missing = OrderForm {
            delivery_date: String::new(),
            ..valid_form()
        };
        assert_eq!(validate(&missing), Err(ValidationError::MissingDeliveryDate));

        let malformed = OrderForm {
            delivery_date: "2025-13-45".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&malformed), Err(ValidationError::MalformedDeliveryDate));
    }

    #[test]
    fn date_checked_before_description() {
        let form = OrderForm {
            delivery_date: String::new(),
            description: String::new(),
            ..valid_form()
        };
        assert_eq!(validate(&form), Err(ValidationError::MissingDeliveryDate));
    }

    #[test]
    fn empty_description() {
        let form = OrderForm {
            description: "  ".to_string(),
            ..valid_form()
        };
        assert_eq!(validate(&form), Err(ValidationError::EmptyDescription));
    }

    #[test]
    fn rfc3339_delivery_date_is_converted_to_utc() {
        let at = normalize_delivery_date("2025-12-31T09:00:00+09:00").unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn request_carries_tenant_and_empty_maps() {
        let request = validate(&valid_form()).unwrap().into_request("c-1", "tenant-a");
        assert_eq!(request.customer_id, "c-1");
        assert_eq!(request.tenant_id.as_deref(), Some("tenant-a"));
        assert!(request.details.measurement_data.is_empty());
        assert!(request.details.adjustments.is_empty());
    }

    #[test]
    fn fresh_form_defaults() {
        let form = OrderForm::new(NaiveDate::from_ymd_opt(2025, 3, 7).unwrap());
        assert_eq!(form.delivery_date, "2025-03-07");
        assert_eq!(form.description, "オーダースーツ縫製");
        assert_eq!(form.hint(FormField::FabricId), Some(locale::FABRIC_ID_HINT));
        assert_eq!(form.hint(FormField::TotalAmount), Some(locale::AMOUNT_HINT));
        assert_eq!(form.hint(FormField::Description), None);
    }

    #[test]
    fn hints_follow_validation() {
        let blank = OrderForm {
            fabric_id: "   ".to_string(),
            ..valid_form()
        };
        assert_eq!(blank.hint(FormField::FabricId), Some(locale::FABRIC_ID_HINT));
        assert_eq!(validate(&blank), Err(ValidationError::MissingFabricId));

        let form = valid_form();
        assert_eq!(form.hint(FormField::FabricId), None);
        assert_eq!(form.hint(FormField::TotalAmount), None);
    }

    #[test]
    fn error_points_at_field() {
        assert_eq!(ValidationError::MalformedDeliveryDate.field(), FormField::DeliveryDate);
        assert_eq!(ValidationError::InvalidAmount.field(), FormField::TotalAmount);
    }
}
