//! Integration test crate for the contact book.
//!
//! This crate has no library code. It only contains integration tests
//! that run spreadsheet round trips against a real SQLite-backed directory.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p contactbook-integration-tests
//! ```
