//! Per-page view state.
//!
//! # Overview
//! Each page owns the caches for the fetches it issues and exposes a
//! [`ViewState`] for the render pass. Fetching is explicit: `load` is called
//! when the page opens or its key changes, `refresh` when the user asks.
//! Nothing refetches on a timer.

mod appointments;
mod customer_detail;
mod customers;
mod diagnoses;

pub use appointments::AppointmentsView;
pub use customer_detail::CustomerDetailView;
pub use customers::CustomerListView;
pub use diagnoses::{DiagnosesView, DIAGNOSES_LIMIT};

use crate::cache::QueryState;
use crate::error::ApiError;

/// Error banner: a fixed headline plus the failure's own message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBanner {
    pub headline: &'static str,
    pub detail: Option<String>,
}

impl ErrorBanner {
    pub fn new(headline: &'static str, err: &ApiError) -> Self {
        Self {
            headline,
            detail: Some(err.to_string()),
        }
    }
}

/// Render state of one fetch.
///
/// `Empty` and `Ready` are both the success state; `Empty` carries the page's
/// empty-state message instead of rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(ErrorBanner),
    Empty(&'static str),
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorBanner> {
        match self {
            ViewState::Error(banner) => Some(banner),
            _ => None,
        }
    }
}

/// Map a cache snapshot onto a render state. A key that has never been
/// fetched renders as loading, like one whose fetch is in flight.
pub(crate) fn render<T>(
    state: QueryState<T>,
    headline: &'static str,
    empty: Option<&'static str>,
    is_empty: impl Fn(&T) -> bool,
) -> ViewState<T> {
    match state {
        QueryState::Idle | QueryState::Loading => ViewState::Loading,
        QueryState::Failed(err) => ViewState::Error(ErrorBanner::new(headline, &err)),
        QueryState::Ready { data, .. } => match empty {
            Some(message) if is_empty(&data) => ViewState::Empty(message),
            _ => ViewState::Ready(data),
        },
    }
}
