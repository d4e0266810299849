//! # viewscan
//!
//! A small view layer for axum: templates are discovered on disk by a
//! recursive, filterable directory scanner, cached as parsed
//! [`tera`](https://docs.rs/tera) templates and re-rendered on demand.
//!
//! ## Core Components
//!
//! - [`scanner`]: Recursive directory listing, blocking and non-blocking,
//!   with wildcard include filters, glob excludes, sorting and absolute paths
//! - [`types`]: Scan options, the named flag bits and result types
//! - [`views`]: Template cache fed by the scanner, with a polling watcher
//! - [`config`]: Layered application configuration
//! - [`error`]: Scanner, view and HTTP error types
//! - [`routes`]: HTTP endpoints over the view cache
//! - [`state`]: Shared application state
//!
//! ## Scanning
//!
//! ```rust,no_run
//! use viewscan::scanner::{scan_sync, NO_FILTERS};
//! use viewscan::types::{ScanOptions, CASE_SORT, INCLUDE_DIRECTORIES};
//!
//! let everything = scan_sync("views", NO_FILTERS, &ScanOptions::default())?;
//! let html = scan_sync(
//!     "views",
//!     &["**.html"],
//!     &ScanOptions::from_bits(CASE_SORT | INCLUDE_DIRECTORIES),
//! )?;
//! # Ok::<(), viewscan::error::ScanError>(())
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod scanner;
pub mod state;
pub mod types;
pub mod views;

#[cfg(test)]
mod tests;
