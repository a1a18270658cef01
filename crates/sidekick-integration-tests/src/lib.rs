//! Integration test crate for the Sidekick catalog.
//!
//! This crate has no library code. It only holds end-to-end flows that
//! cross the types, store, blend and compose crates against a catalog file
//! on disk.
//!
//! Run all integration tests:
//! ```sh
//! cargo test -p sidekick-integration-tests
//! ```
