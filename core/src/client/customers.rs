use super::{parse_json, parse_list, Query, TailorClient};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Customer, OrderSummary, Page};

impl TailorClient {
    /// `GET /api/customers`, optionally narrowed by a name/phone search.
    pub fn build_list_customers(&self, tenant_id: &str, search: Option<&str>) -> HttpRequest {
        let query = Query::tenant(tenant_id).opt("search", search);
        self.get("/api/customers", &query)
    }

    pub fn build_get_customer(&self, tenant_id: &str, id: &str) -> HttpRequest {
        self.get(&format!("/api/customers/{id}"), &Query::tenant(tenant_id))
    }

    pub fn build_get_customer_orders(&self, tenant_id: &str, id: &str) -> HttpRequest {
        self.get(&format!("/api/customers/{id}/orders"), &Query::tenant(tenant_id))
    }

    pub fn parse_list_customers(&self, response: HttpResponse) -> Result<Page<Customer>, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_customer(&self, response: HttpResponse) -> Result<Customer, ApiError> {
        parse_json(response)
    }

    /// The backend wraps the history as `{"orders": [...], "total": n}`.
    pub fn parse_get_customer_orders(&self, response: HttpResponse) -> Result<Vec<OrderSummary>, ApiError> {
        parse_list(response)
    }
}
