//! HTTP server for the chart endpoint.
//!
//! This module provides:
//! - The axum router and handlers (`routes`)
//! - Error-to-response mapping (`error`)
//! - Configuration types (`config`)

pub mod config;
pub mod error;
pub mod routes;

pub use error::ApiError;
pub use routes::{ChartQuery, router};
