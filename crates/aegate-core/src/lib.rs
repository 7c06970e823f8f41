//! Aegate Core Library
//!
//! This crate provides the core functionality for the aegate gateway:
//! configuration, the placeholder-substitution rule, the Analytics Engine
//! SQL client, and the normalized result types.

pub mod client;
pub mod config;
pub mod error;
pub mod template;
pub mod types;

mod client_tests;

// Re-export commonly used types
pub use client::{AnalyticsClient, HttpTransport, SqlTransport, TransportResponse};
pub use config::AnalyticsConfig;
pub use error::{AegateError, AegateResult};
pub use template::{substitute, ParamValue, Params};
pub use types::{ColumnMeta, Dataset, QueryResult};
