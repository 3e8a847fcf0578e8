use std::sync::Arc;

use crate::api::Api;
use crate::cache::{QueryCache, QueryKey};
use crate::locale;
use crate::order_flow::OrderDialog;
use crate::types::{Customer, GeneratedDocument, OrderSummary};

use super::{render, ViewState};

/// One customer's profile, their order history, and the order dialog.
///
/// Profile and history are fetched independently; a failure in one never
/// blanks the other.
pub struct CustomerDetailView {
    api: Api,
    tenant_id: String,
    customer_id: String,
    customer: QueryCache<Customer>,
    orders: Arc<QueryCache<Vec<OrderSummary>>>,
    dialog: OrderDialog,
}

impl CustomerDetailView {
    pub fn new(api: Api, customer_id: impl Into<String>) -> Self {
        let tenant_id = api.tenant_id().to_string();
        let customer_id = customer_id.into();
        let orders = Arc::new(QueryCache::new());
        let dialog = OrderDialog::new(
            api.clone(),
            customer_id.as_str(),
            Arc::clone(&orders),
            orders_key(&tenant_id, &customer_id),
        );
        Self {
            api,
            tenant_id,
            customer_id,
            customer: QueryCache::new(),
            orders,
            dialog,
        }
    }

    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    pub fn customer_key(&self) -> QueryKey {
        QueryKey::new("customer")
            .with(self.tenant_id.as_str())
            .with(self.customer_id.as_str())
    }

    pub fn orders_key(&self) -> QueryKey {
        orders_key(&self.tenant_id, &self.customer_id)
    }

    pub fn dialog(&self) -> &OrderDialog {
        &self.dialog
    }

    /// Document from the last successful order flow, for the download link.
    pub fn last_document(&self) -> Option<GeneratedDocument> {
        self.dialog.last_document()
    }

    /// Fetch whatever is missing or stale, both fetches concurrently.
    pub async fn load(&self) {
        let customer_key = self.customer_key();
        let orders_key = self.orders_key();
        let _ = tokio::join!(
            self.customer.fetch(&customer_key, || {
                self.api.get_customer(&self.tenant_id, &self.customer_id)
            }),
            self.orders.fetch(&orders_key, || {
                self.api.get_customer_orders(&self.tenant_id, &self.customer_id)
            }),
        );
    }

    pub async fn refresh(&self) {
        let customer_key = self.customer_key();
        let orders_key = self.orders_key();
        let _ = tokio::join!(
            self.customer.refetch(&customer_key, || {
                self.api.get_customer(&self.tenant_id, &self.customer_id)
            }),
            self.orders.refetch(&orders_key, || {
                self.api.get_customer_orders(&self.tenant_id, &self.customer_id)
            }),
        );
    }

    pub fn customer_state(&self) -> ViewState<Customer> {
        render(
            self.customer.state(&self.customer_key()),
            locale::CUSTOMER_FAILED,
            None,
            |_: &Customer| false,
        )
    }

    pub fn orders_state(&self) -> ViewState<Vec<OrderSummary>> {
        render(
            self.orders.state(&self.orders_key()),
            locale::ORDERS_FAILED,
            Some(locale::ORDERS_EMPTY),
            |orders: &Vec<OrderSummary>| orders.is_empty(),
        )
    }

    /// The history entry has been invalidated and not yet refetched.
    pub fn orders_stale(&self) -> bool {
        self.orders.is_stale(&self.orders_key())
    }
}

fn orders_key(tenant_id: &str, customer_id: &str) -> QueryKey {
    QueryKey::new("customerOrders").with(tenant_id).with(customer_id)
}
