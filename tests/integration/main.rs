//! Integration tests for Blog-Mirror
//!
//! Mock blogs are served by wiremock; every test mirrors into a temporary
//! directory.

mod crawl_tests;
mod report_tests;
