//! Per-product dedup state

use std::collections::HashSet;

use crate::imaging::Fingerprint;

/// Fingerprints seen so far for one product, plus the saved count.
///
/// The count never exceeds `cap`. A fingerprint is marked before its save is
/// attempted, so a failed save still blocks later copies of the same image
/// while leaving the count (and the next file number) unchanged.
#[derive(Debug)]
pub struct AcceptedImageSet {
    seen: HashSet<Fingerprint>,
    count: usize,
    cap: usize,
}

impl AcceptedImageSet {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            seen: HashSet::new(),
            count: 0,
            cap,
        }
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count >= self.cap
    }

    /// Record a fingerprint; `false` when it was already present.
    pub fn mark(&mut self, fingerprint: Fingerprint) -> bool {
        self.seen.insert(fingerprint)
    }

    /// 1-based number the next saved file gets.
    #[must_use]
    pub fn next_number(&self) -> usize {
        self.count + 1
    }

    /// Count one successfully saved image.
    pub fn record_saved(&mut self) {
        debug_assert!(self.count < self.cap, "saved past the per-product cap");
        self.count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::PerceptualHasher;
    use image::{DynamicImage, Rgb, RgbImage};

    fn fingerprint(split_at: u32) -> Fingerprint {
        let img = RgbImage::from_fn(64, 64, |x, _| {
            if x < split_at {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        PerceptualHasher::new(64).fingerprint_image(&DynamicImage::ImageRgb8(img))
    }

    #[test]
    fn duplicates_are_refused() {
        let mut set = AcceptedImageSet::new(3);
        assert!(set.mark(fingerprint(32)));
        assert!(!set.mark(fingerprint(32)));
    }

    #[test]
    fn count_tracks_saves_only() {
        let mut set = AcceptedImageSet::new(2);
        assert_eq!(set.next_number(), 1);

        set.mark(fingerprint(32));
        assert_eq!(set.count(), 0);

        set.record_saved();
        set.record_saved();
        assert_eq!(set.next_number(), 3);
        assert!(set.is_full());
        assert_eq!(set.cap(), 2);
    }
}
