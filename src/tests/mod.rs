//! Unit and integration tests for viewscan.
//!
//! ## Test Modules
//!
//! - **fixtures**: Temporary directory trees shared by the other modules
//! - **scanner_tests**: Blocking scanner behaviour
//! - **async_scanner_tests**: Non-blocking scanner behaviour and error policy
//! - **views_tests**: Template discovery, rendering and reload
//! - **api_tests**: HTTP endpoints
//! - **error_tests**: Error conversion and JSON error bodies
//! - **config_tests**: Configuration loading and validation
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test
//! cargo test scanner_tests
//! ```


pub mod api_tests;
pub mod views_tests;
