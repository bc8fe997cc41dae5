//! # Report client
//!
//! GET-only client for the analytics service: period reports as spreadsheet bytes and the
//! clear-database call. [`period`] computes the date ranges behind the `/report_*` commands.

pub mod client;
pub mod error;
pub mod period;

pub use client::ReportClient;
pub use error::ReportError;
pub use period::ReportPeriod;
