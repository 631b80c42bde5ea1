//! Integration tests for Cinescope
//!
//! These tests run the lookup client and the suggestion box against a local
//! OMDb-compatible HTTP server, and scan the workspace for style violations.

#[path = "style.rs"]
mod style;

#[path = "integration/mock_omdb.rs"]
mod mock_omdb;

#[path = "integration/lookup_http.rs"]
mod lookup_http;

#[path = "integration/browse_session.rs"]
mod browse_session;

#[path = "integration/suggestions_http.rs"]
mod suggestions_http;

#[path = "integration/logging.rs"]
mod logging;
