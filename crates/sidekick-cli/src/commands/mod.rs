//! Subcommand handlers.
//!
//! Every handler takes an open catalog and returns the JSON value printed
//! on stdout.

pub mod catalog;
pub mod compose;
pub mod maintenance;

pub type Result = anyhow::Result<serde_json::Value>;
