use super::{parse_json, Query, TailorClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateOrder, GeneratedDocument, Order};

impl TailorClient {
    /// `POST /api/orders`. The tenant id travels both in the query and in
    /// the body.
    pub fn build_create_order(&self, tenant_id: &str, input: &CreateOrder) -> Result<HttpRequest, ApiError> {
        let mut input = input.clone();
        input.tenant_id.get_or_insert_with(|| tenant_id.to_string());
        self.send_json(HttpMethod::Post, "/api/orders", &Query::tenant(tenant_id), &input)
    }

    /// `POST /api/orders/{id}/generate-document`, empty body.
    pub fn build_generate_order_document(&self, tenant_id: &str, order_id: &str) -> HttpRequest {
        self.post_empty(
            &format!("/api/orders/{order_id}/generate-document"),
            &Query::tenant(tenant_id),
        )
    }

    pub fn parse_create_order(&self, response: HttpResponse) -> Result<Order, ApiError> {
        parse_json(response)
    }

    pub fn parse_generate_order_document(&self, response: HttpResponse) -> Result<GeneratedDocument, ApiError> {
        parse_json(response)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::OrderDetails;

    fn client() -> TailorClient {
        TailorClient::new("http://localhost:8080")
    }

    fn input() -> CreateOrder {
        CreateOrder {
            customer_id: "c-1".to_string(),
            fabric_id: "F1".to_string(),
            total_amount: 50000,
            delivery_date: Utc.with_ymd_and_hms(2025, 12, 31, 0, 0, 0).unwrap(),
            details: OrderDetails {
                description: "suit".to_string(),
                ..OrderDetails::default()
            },
            tenant_id: None,
            created_by: None,
        }
    }

    #[test]
    fn create_fills_tenant_in_body() {
        let req = client().build_create_order("tenant-a", &input()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/orders?tenant_id=tenant-a");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["tenant_id"], "tenant-a");
        assert_eq!(body["delivery_date"], "2025-12-31T00:00:00Z");
        assert_eq!(body["details"]["description"], "suit");
    }

    #[test]
    fn create_keeps_explicit_tenant() {
        let mut input = input();
        input.tenant_id = Some("tenant-b".to_string());
        let req = client().build_create_order("tenant-a", &input).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["tenant_id"], "tenant-b");
    }

    #[test]
    fn generate_document_has_no_body() {
        let req = client().build_generate_order_document("tenant-a", "o-9");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(
            req.url,
            "http://localhost:8080/api/orders/o-9/generate-document?tenant_id=tenant-a"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_generated_document() {
        let response = HttpResponse::new(
            200,
            r#"{"order_id":"o-9","doc_url":"https://storage.example.com/o-9.pdf",
                "doc_hash":"abc123","generated_at":"2025-06-01T12:00:00Z"}"#,
        );
        let doc = client().parse_generate_order_document(response).unwrap();
        assert_eq!(doc.order_id, "o-9");
        assert_eq!(doc.doc_url, "https://storage.example.com/o-9.pdf");
    }

    #[test]
    fn parse_create_server_error() {
        let response = HttpResponse::new(400, r#"{"error":"fabric_id is required"}"#);
        let err = client().parse_create_order(response).unwrap_err();
        assert_eq!(
            err,
            ApiError::Server {
                status: 400,
                message: "fabric_id is required".to_string()
            }
        );
    }
}
