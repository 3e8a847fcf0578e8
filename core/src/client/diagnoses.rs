use super::{parse_empty, parse_json, parse_list, Query, TailorClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateDiagnosis, Diagnosis, DiagnosisFilter, Page};

impl TailorClient {
    pub fn build_create_diagnosis(&self, tenant_id: &str, input: &CreateDiagnosis) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, "/api/diagnoses", &Query::tenant(tenant_id), input)
    }

    pub fn build_get_diagnosis(&self, tenant_id: &str, id: &str) -> HttpRequest {
        self.get(&format!("/api/diagnoses/{id}"), &Query::tenant(tenant_id))
    }

    pub fn build_list_diagnoses(&self, tenant_id: &str, filter: &DiagnosisFilter) -> HttpRequest {
        let query = Query::tenant(tenant_id)
            .opt("user_id", filter.user_id.as_deref())
            .opt("limit", filter.limit)
            .opt("offset", filter.offset)
            .opt("archetype", filter.archetype.map(|a| a.as_str()))
            .opt("plan_type", filter.plan_type.map(|p| p.as_str()));
        self.get("/api/diagnoses", &query)
    }

    /// Same endpoint as the list, narrowed to one user.
    pub fn build_list_diagnoses_by_user(&self, tenant_id: &str, user_id: &str) -> HttpRequest {
        self.get("/api/diagnoses", &Query::tenant(tenant_id).param("user_id", user_id))
    }

    pub fn build_delete_diagnosis(&self, tenant_id: &str, id: &str) -> HttpRequest {
        self.delete(&format!("/api/diagnoses/{id}"), &Query::tenant(tenant_id))
    }

    pub fn parse_create_diagnosis(&self, response: HttpResponse) -> Result<Diagnosis, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_diagnosis(&self, response: HttpResponse) -> Result<Diagnosis, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_diagnoses(&self, response: HttpResponse) -> Result<Page<Diagnosis>, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_diagnoses_by_user(&self, response: HttpResponse) -> Result<Vec<Diagnosis>, ApiError> {
        parse_list(response)
    }

    pub fn parse_delete_diagnosis(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }
}
