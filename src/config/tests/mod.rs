//! Unit tests for configuration loading and precedence.
//!
//! Tests are organised into modules by functional area:
//! - `helpers`: Shared test utilities
//! - `precedence`: Layer precedence tests
//! - `field_resolution`: Filename, token, and API base resolution tests
//! - `flag_loading`: CLI and environment loading through `load_from_iter`
//! - `check_options`: Conversion into pipeline options

mod helpers;
