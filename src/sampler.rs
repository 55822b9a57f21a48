//! Maps a wire's rolling sample history onto its rendered segments.
//!
//! The segment nearest the source shows the newest sample and the segment
//! nearest the target the oldest, so a signal looks like it is still travelling
//! down a long wire.

use crate::models::{Wire, SAMPLE_HISTORY_LEN};

impl Wire {
    /// Writes `value` into the ring buffer and advances the write head.
    pub fn push_sample(&mut self, value: f64) {
        let head = self.write_head % SAMPLE_HISTORY_LEN;
        self.sample_history[head] = value;
        self.write_head = (head + 1) % SAMPLE_HISTORY_LEN;
    }

    /// Slot of the most recent write.
    pub fn newest_index(&self) -> usize {
        (self.write_head % SAMPLE_HISTORY_LEN + SAMPLE_HISTORY_LEN - 1) % SAMPLE_HISTORY_LEN
    }

    pub fn newest_sample(&self) -> f64 {
        self.sample_history[self.newest_index()]
    }
}

/// Sample shown on segment `segment_index` of `total_segments`.
pub fn get_segment_signal(wire: &Wire, segment_index: usize, total_segments: usize) -> f64 {
    let newest = wire.newest_index();
    if total_segments <= 1 {
        return wire.sample_history[newest];
    }
    // floor(t * (len - 1)) with t = index / (total - 1), kept in integers.
    let offset =
        segment_index.min(total_segments - 1) * (SAMPLE_HISTORY_LEN - 1) / (total_segments - 1);
    let index = (newest + SAMPLE_HISTORY_LEN - offset) % SAMPLE_HISTORY_LEN;
    wire.sample_history[index]
}
