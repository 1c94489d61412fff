//! Configuration module for image collection
//!
//! This module provides the `CollectorConfig` struct and its type-safe builder
//! for configuring collection runs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{CollectorConfigBuilder, WithOutputRoot};
pub use types::{CollectorConfig, QualityThresholds};
