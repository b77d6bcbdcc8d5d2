//! Configuration and startup utilities.

/// Tracing subscriber initialization.
pub mod logging;
/// TOML configuration model, loading and validation.
pub mod toml_config;
