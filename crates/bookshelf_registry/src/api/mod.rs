//! The HTTP surface of the registry.
//!
//! [`service::ApiService`] implements the `HttpService` trait from
//! `bookshelf_base` and owns all routing decisions, so it can be driven by
//! the real server loop or called directly in tests. [`routes`] declares the
//! API surface as data; the OpenAPI generator consumes it.

pub mod routes;
pub mod service;

pub use service::{ApiInfo, ApiService};
