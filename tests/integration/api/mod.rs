//! API integration tests
//!
//! Integration tests for all API endpoints

mod presence_test;
mod server_test;
