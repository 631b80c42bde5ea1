//! Style Enforcement Tests
//!
//! These tests enforce patterns that clippy cannot catch on its own.
//!
//! # Test Organization
//!
//! - `production_code_enforcement` - Rejects `#[allow(dead_code)]`, `unwrap()`
//!   and `expect()` in non-test code of the Cinescope crates
//!
//! These tests scan the workspace and fail if violations are found.

#[path = "style/production_code_enforcement.rs"]
mod production_code_enforcement;
