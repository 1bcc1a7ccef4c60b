//! Logging setup shared by the vault binaries and tests.

pub mod tracing;
