//! Client core for the tailoring back-office console.
//!
//! # Overview
//! Staff browse customers and their orders, body-type diagnoses and fitting
//! appointments, and create an order for a customer together with its order
//! document (発注書). Everything is scoped to one tenant.
//!
//! # Design
//! - `TailorClient` is stateless; it holds only `base_url`. Each operation is
//!   split into `build_*` (produces an `HttpRequest`) and `parse_*` (consumes
//!   an `HttpResponse`), so the I/O boundary stays explicit and testable.
//! - `Api` runs build → send → parse over a pluggable [`Transport`] and logs
//!   every failure once.
//! - Views read through a keyed [`QueryCache`] that keeps one request in
//!   flight per key; the order flow invalidates a customer's history after a
//!   successful create.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod locale;
pub mod order_flow;
pub mod transport;
pub mod types;
pub mod views;

pub use api::Api;
pub use cache::{QueryCache, QueryKey, QueryState};
pub use client::TailorClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use order_flow::{FlowError, FlowState, FormField, OrderDialog, OrderForm};
pub use transport::{ReqwestTransport, Transport};
pub use types::*;
pub use views::{
    AppointmentsView, CustomerDetailView, CustomerListView, DiagnosesView, ErrorBanner, ViewState,
};
