//! What happened to one product

use serde::Serialize;
use std::path::PathBuf;

/// Per-reason counts of candidates and sources that contributed nothing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureTally {
    pub fetch: usize,
    pub decode: usize,
    pub quality: usize,
    pub duplicate: usize,
    pub save: usize,
    pub render: usize,
    /// Sources that rendered or resolved but produced no candidate URLs
    pub empty_sources: usize,
}

impl FailureTally {
    #[must_use]
    pub fn total(&self) -> usize {
        self.fetch
            + self.decode
            + self.quality
            + self.duplicate
            + self.save
            + self.render
            + self.empty_sources
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub product_id: String,
    pub accepted: usize,
    /// The relaxed pass ran because the strict pass saved nothing
    pub fallback_used: bool,
    pub saved: Vec<PathBuf>,
    pub failures: FailureTally,
}

impl CollectionReport {
    #[must_use]
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            accepted: 0,
            fallback_used: false,
            saved: Vec::new(),
            failures: FailureTally::default(),
        }
    }
}
