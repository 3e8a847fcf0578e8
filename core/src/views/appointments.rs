use crate::api::Api;
use crate::cache::{QueryCache, QueryKey};
use crate::error::ApiError;
use crate::locale;
use crate::types::{Appointment, AppointmentFilter, Page};

use super::{render, ViewState};

pub struct AppointmentsView {
    api: Api,
    tenant_id: String,
    cache: QueryCache<Page<Appointment>>,
}

impl AppointmentsView {
    pub fn new(api: Api) -> Self {
        let tenant_id = api.tenant_id().to_string();
        Self {
            api,
            tenant_id,
            cache: QueryCache::new(),
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Switching tenants changes the key; the next `load` fetches.
    pub fn set_tenant_id(&mut self, tenant_id: impl Into<String>) {
        self.tenant_id = tenant_id.into();
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::new("appointments").with(self.tenant_id.as_str())
    }

    pub async fn load(&self) -> ViewState<Page<Appointment>> {
        let _ = self.cache.fetch(&self.key(), || self.request()).await;
        self.state()
    }

    pub async fn refresh(&self) -> ViewState<Page<Appointment>> {
        let _ = self.cache.refetch(&self.key(), || self.request()).await;
        self.state()
    }

    pub fn state(&self) -> ViewState<Page<Appointment>> {
        render(
            self.cache.state(&self.key()),
            locale::APPOINTMENTS_FAILED,
            Some(locale::APPOINTMENTS_EMPTY),
            Page::is_empty,
        )
    }

    async fn request(&self) -> Result<Page<Appointment>, ApiError> {
        self.api
            .list_appointments(&self.tenant_id, &AppointmentFilter::default())
            .await
    }
}
