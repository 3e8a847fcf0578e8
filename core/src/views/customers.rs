use crate::api::Api;
use crate::cache::{QueryCache, QueryKey};
use crate::error::ApiError;
use crate::locale;
use crate::types::{Customer, Page};

use super::{render, ViewState};

/// Customer list with a name/phone search box.
///
/// The search text is part of the key, so a new search is always a new
/// fetch and never renders the previous search's rows.
pub struct CustomerListView {
    api: Api,
    tenant_id: String,
    search: String,
    cache: QueryCache<Page<Customer>>,
}

impl CustomerListView {
    pub fn new(api: Api) -> Self {
        let tenant_id = api.tenant_id().to_string();
        Self {
            api,
            tenant_id,
            search: String::new(),
            cache: QueryCache::new(),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    /// Keyed on the search text as sent, so surrounding whitespace does not
    /// make a second entry.
    pub fn key(&self) -> QueryKey {
        QueryKey::new("customers")
            .with(self.tenant_id.as_str())
            .with(self.search.trim())
    }

    /// Fetch the current key unless fresh rows are already cached.
    pub async fn load(&self) -> ViewState<Page<Customer>> {
        let _ = self.cache.fetch(&self.key(), || self.request()).await;
        self.state()
    }

    /// The search button: fetch the current key again.
    pub async fn refresh(&self) -> ViewState<Page<Customer>> {
        let _ = self.cache.refetch(&self.key(), || self.request()).await;
        self.state()
    }

    pub fn state(&self) -> ViewState<Page<Customer>> {
        render(
            self.cache.state(&self.key()),
            locale::CUSTOMERS_FAILED,
            Some(locale::CUSTOMERS_EMPTY),
            Page::is_empty,
        )
    }

    async fn request(&self) -> Result<Page<Customer>, ApiError> {
        let search = Some(self.search.trim()).filter(|s| !s.is_empty());
        self.api.list_customers(&self.tenant_id, search).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn view() -> CustomerListView {
        let config = ClientConfig::new("http://localhost:8080").with_tenant_id("t");
        CustomerListView::new(Api::from_config(&config).unwrap())
    }

    #[test]
    fn padded_search_shares_the_key() {
        let mut view = view();
        view.set_search("山田");
        let plain = view.key();
        view.set_search(" 山田 ");
        assert_eq!(view.key(), plain);
        assert_eq!(view.search(), " 山田 ");

        view.set_search("佐藤");
        assert_ne!(view.key(), plain);
    }

    #[test]
    fn blank_search_is_the_unfiltered_key() {
        let mut view = view();
        let all = view.key();
        view.set_search("   ");
        assert_eq!(view.key(), all);
    }
}
