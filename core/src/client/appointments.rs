use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use super::{parse_empty, parse_json, Query, TailorClient};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Appointment, AppointmentFilter, Availability, CreateAppointment, Page, UpdateAppointment,
};

fn rfc3339(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl TailorClient {
    pub fn build_create_appointment(&self, tenant_id: &str, input: &CreateAppointment) -> Result<HttpRequest, ApiError> {
        self.send_json(HttpMethod::Post, "/api/appointments", &Query::tenant(tenant_id), input)
    }

    pub fn build_get_appointment(&self, tenant_id: &str, id: &str) -> HttpRequest {
        self.get(&format!("/api/appointments/{id}"), &Query::tenant(tenant_id))
    }

    pub fn build_list_appointments(&self, tenant_id: &str, filter: &AppointmentFilter) -> HttpRequest {
        let query = Query::tenant(tenant_id)
            .opt("user_id", filter.user_id.as_deref())
            .opt("fitter_id", filter.fitter_id.as_deref())
            .opt("start_date", filter.start_date.as_ref().map(rfc3339))
            .opt("end_date", filter.end_date.as_ref().map(rfc3339));
        self.get("/api/appointments", &query)
    }

    pub fn build_update_appointment(
        &self,
        tenant_id: &str,
        id: &str,
        input: &UpdateAppointment,
    ) -> Result<HttpRequest, ApiError> {
        self.send_json(
            HttpMethod::Patch,
            &format!("/api/appointments/{id}"),
            &Query::tenant(tenant_id),
            input,
        )
    }

    /// `DELETE /api/appointments/{id}` with the cancellation reason as a
    /// query parameter.
    pub fn build_cancel_appointment(&self, tenant_id: &str, id: &str, reason: &str) -> HttpRequest {
        self.delete(
            &format!("/api/appointments/{id}"),
            &Query::tenant(tenant_id).param("reason", reason),
        )
    }

    pub fn build_check_availability(&self, tenant_id: &str, fitter_id: &str, date: NaiveDate) -> HttpRequest {
        let query = Query::tenant(tenant_id)
            .param("fitter_id", fitter_id)
            .param("date", date.format("%Y-%m-%d").to_string());
        self.get("/api/appointments/availability", &query)
    }

    pub fn parse_create_appointment(&self, response: HttpResponse) -> Result<Appointment, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_appointment(&self, response: HttpResponse) -> Result<Appointment, ApiError> {
        parse_json(response)
    }

    pub fn parse_list_appointments(&self, response: HttpResponse) -> Result<Page<Appointment>, ApiError> {
        parse_json(response)
    }

    pub fn parse_update_appointment(&self, response: HttpResponse) -> Result<Appointment, ApiError> {
        parse_json(response)
    }

    pub fn parse_cancel_appointment(&self, response: HttpResponse) -> Result<(), ApiError> {
        parse_empty(response)
    }

    pub fn parse_check_availability(&self, response: HttpResponse) -> Result<Availability, ApiError> {
        parse_json(response)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::types::AppointmentStatus;

    fn client() -> TailorClient {
        TailorClient::new("http://localhost:8080")
    }

    #[test]
    fn list_with_date_range() {
        let filter = AppointmentFilter {
            fitter_id: Some("f-1".to_string()),
            start_date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2025, 6, 30, 23, 59, 59).unwrap()),
            ..AppointmentFilter::default()
        };
        let req = client().build_list_appointments("t", &filter);
        assert_eq!(
            req.url,
            "http://localhost:8080/api/appointments?tenant_id=t&fitter_id=f-1\
             &start_date=2025-06-01T00%3A00%3A00Z&end_date=2025-06-30T23%3A59%3A59Z"
        );
    }

    #[test]
    fn cancel_encodes_reason() {
        let req = client().build_cancel_appointment("t", "a-1", "体調不良 (本人)");
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.url.starts_with("http://localhost:8080/api/appointments/a-1?tenant_id=t&reason="));
        assert!(!req.url.contains(' '));
        let (_, query) = req.url.split_once('?').unwrap();
        let reason = url::form_urlencoded::parse(query.as_bytes())
            .find(|(k, _)| k == "reason")
            .map(|(_, v)| v.into_owned());
        assert_eq!(reason.as_deref(), Some("体調不良 (本人)"));
    }

    #[test]
    fn update_uses_patch() {
        let input = UpdateAppointment {
            status: Some(AppointmentStatus::Confirmed),
            ..UpdateAppointment::default()
        };
        let req = client().build_update_appointment("t", "a-1", &input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.body.as_deref(), Some(r#"{"status":"Confirmed"}"#));
    }

    #[test]
    fn availability_query() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 3).unwrap();
        let req = client().build_check_availability("t", "f-1", date);
        assert_eq!(
            req.url,
            "http://localhost:8080/api/appointments/availability?tenant_id=t&fitter_id=f-1&date=2025-06-03"
        );
    }

    #[test]
    fn parse_list_reads_data_field() {
        let page = client()
            .parse_list_appointments(HttpResponse::new(200, r#"{"data":[],"total":0}"#))
            .unwrap();
        assert!(page.is_empty());
    }

    #[test]
    fn parse_availability() {
        let availability = client()
            .parse_check_availability(HttpResponse::new(
                200,
                r#"{"available":true,"slots":["10:00","14:30"]}"#,
            ))
            .unwrap();
        assert!(availability.available);
        assert_eq!(availability.slots.len(), 2);
    }
}
