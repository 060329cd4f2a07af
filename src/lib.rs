// ABOUTME: Library root for convoy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod hooks;
pub mod output;
pub mod sink;
pub mod types;
