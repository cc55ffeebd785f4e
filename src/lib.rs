pub mod config;
pub mod domain;
pub mod engine;
pub mod forms;
pub mod repository;
pub mod services;

/// Currency prefix used when no `CURRENCY_PREFIX` is configured.
pub const DEFAULT_CURRENCY_PREFIX: &str = "Rs.";
