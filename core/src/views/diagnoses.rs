use crate::api::Api;
use crate::cache::{QueryCache, QueryKey};
use crate::error::ApiError;
use crate::locale;
use crate::types::{Diagnosis, DiagnosisFilter, Page};

use super::{render, ViewState};

/// The page shows one fixed-size page of the tenant's diagnoses.
pub const DIAGNOSES_LIMIT: u32 = 50;

pub struct DiagnosesView {
    api: Api,
    tenant_id: String,
    cache: QueryCache<Page<Diagnosis>>,
}

impl DiagnosesView {
    pub fn new(api: Api) -> Self {
        let tenant_id = api.tenant_id().to_string();
        Self {
            api,
            tenant_id,
            cache: QueryCache::new(),
        }
    }

    pub fn key(&self) -> QueryKey {
        QueryKey::new("diagnoses")
            .with(self.tenant_id.as_str())
            .with(DIAGNOSES_LIMIT.to_string())
    }

    pub async fn load(&self) -> ViewState<Page<Diagnosis>> {
        let _ = self.cache.fetch(&self.key(), || self.request()).await;
        self.state()
    }

    pub async fn refresh(&self) -> ViewState<Page<Diagnosis>> {
        let _ = self.cache.refetch(&self.key(), || self.request()).await;
        self.state()
    }

    pub fn state(&self) -> ViewState<Page<Diagnosis>> {
        render(
            self.cache.state(&self.key()),
            locale::DIAGNOSES_FAILED,
            Some(locale::DIAGNOSES_EMPTY),
            Page::is_empty,
        )
    }

    async fn request(&self) -> Result<Page<Diagnosis>, ApiError> {
        let filter = DiagnosisFilter {
            limit: Some(DIAGNOSES_LIMIT),
            ..DiagnosisFilter::default()
        };
        self.api.list_diagnoses(&self.tenant_id, &filter).await
    }
}
