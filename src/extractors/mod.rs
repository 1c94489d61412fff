//! Candidate image URL extraction from rendered markup
//!
//! Both extractors are pure functions over an HTML string. Malformed markup
//! never fails: `scraper` parses leniently and a heuristic that finds
//! nothing simply contributes nothing.

pub mod generic;
pub mod marketplace;

use std::collections::HashSet;

pub use generic::{extract_all, extract_best};
pub use marketplace::extract_gallery;

/// Insertion-ordered set of candidate URLs.
///
/// Iteration order is the order of first discovery, which in turn fixes the
/// `_img{n}` numbering of saved files.
#[derive(Debug, Default)]
pub(crate) struct CandidateList {
    seen: HashSet<String>,
    ordered: Vec<String>,
}

impl CandidateList {
    pub(crate) fn push(&mut self, url: String) {
        if self.seen.insert(url.clone()) {
            self.ordered.push(url);
        }
    }

    pub(crate) fn into_vec(self) -> Vec<String> {
        self.ordered
    }
}
