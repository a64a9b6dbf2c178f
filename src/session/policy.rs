use super::store::SegmentStore;

/// Decides whether accumulated audio justifies a recognition pass
///
/// A pure byte-count threshold over the decoded buffer, with no relationship
/// to audio duration or silence. Intentional simplification; `trigger_bytes`
/// is a tuning parameter, not a timing guarantee.
#[derive(Debug, Clone, Copy)]
pub struct TriggerPolicy {
    threshold_bytes: usize,
}

impl TriggerPolicy {
    pub fn new(threshold_bytes: usize) -> Self {
        Self { threshold_bytes }
    }

    pub fn should_run(&self, buffered_bytes: usize) -> bool {
        buffered_bytes >= self.threshold_bytes
    }
}

/// Bounds the segment buffer by evicting the oldest entries
///
/// Runs only after a successful recognition pass; a failed pass leaves the
/// store untouched, including any length above the bound.
#[derive(Debug, Clone, Copy)]
pub struct RotationPolicy {
    max_segments: usize,
}

impl RotationPolicy {
    pub fn new(max_segments: usize) -> Self {
        Self { max_segments }
    }

    /// Evict oldest segments until the bound holds; returns how many were
    /// released
    pub fn rotate(&self, store: &mut SegmentStore) -> usize {
        let mut evicted = 0;
        while store.len() > self.max_segments {
            if store.evict_oldest().is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }
}
