use std::collections::VecDeque;

use crate::audio::AudioClip;

/// One buffered audio segment: a decoded clip plus its byte size and
/// arrival index
#[derive(Debug)]
pub struct Segment {
    pub clip: AudioClip,
    pub byte_len: usize,
    pub index: u64,
}

/// Ordered buffer of decoded segments for one session
///
/// Insertion order is arrival order. The store is owned by the session's
/// connection task; releasing a segment means dropping it here, which happens
/// exactly once (eviction, clear on flush, or teardown).
#[derive(Debug, Default)]
pub struct SegmentStore {
    segments: VecDeque<Segment>,
    total_bytes: usize,
    next_index: u64,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a decoded clip, returning its arrival index
    pub fn push(&mut self, clip: AudioClip) -> u64 {
        let index = self.next_index;
        self.next_index += 1;

        let byte_len = clip.byte_len();
        self.total_bytes += byte_len;
        self.segments.push_back(Segment {
            clip,
            byte_len,
            index,
        });

        index
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Cumulative byte size of all buffered segments
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Buffered clips in arrival order
    pub fn clips(&self) -> impl Iterator<Item = &AudioClip> {
        self.segments.iter().map(|s| &s.clip)
    }

    /// Evict and release the oldest segment
    pub fn evict_oldest(&mut self) -> Option<Segment> {
        let segment = self.segments.pop_front()?;
        self.total_bytes -= segment.byte_len;
        Some(segment)
    }

    /// Release every buffered segment, returning how many were dropped
    pub fn clear(&mut self) -> usize {
        let released = self.segments.len();
        self.segments.clear();
        self.total_bytes = 0;
        released
    }
}
