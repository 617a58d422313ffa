/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The float damage sink: a coalescing set of closed intervals on the block
//! axis, recording where float geometry changed so the frame tree can repaint
//! the affected bands.
//!
//! The sink accumulates across state checkpoints. A trial layout that adds
//! and then discards a float still moved that float's pixels, and the final
//! layout may place it somewhere different from both the trial and the
//! original position; restoring the sink along with the registry would lose
//! one of those regions.

use std::cmp::{max, min};
use std::iter;
use std::ops::Range;

use app_units::Au;

/// A set of disjoint, sorted, closed intervals `[start, end]` of block-axis
/// coordinates.
#[derive(Clone, Debug, Default)]
pub struct FloatDamage {
    intervals: Vec<Range<Au>>,
}

impl FloatDamage {
    pub fn new() -> FloatDamage {
        FloatDamage {
            intervals: Vec::new(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn clear(&mut self) {
        self.intervals.clear();
    }

    /// Adds `[block_start, block_end]` to the set, merging every interval it
    /// overlaps or touches.
    pub fn include(&mut self, block_start: Au, block_end: Au) {
        debug_assert!(block_start <= block_end, "backwards damage interval");
        let (block_start, block_end) = (min(block_start, block_end), max(block_start, block_end));

        let first = self
            .intervals
            .partition_point(|interval| interval.end < block_start);
        let mut merged = block_start..block_end;
        let mut last = first;
        while last < self.intervals.len() && self.intervals[last].start <= block_end {
            merged.start = min(merged.start, self.intervals[last].start);
            merged.end = max(merged.end, self.intervals[last].end);
            last += 1;
        }
        self.intervals.splice(first..last, iter::once(merged));
    }

    /// Does any damaged interval intersect `[block_start, block_end]`?
    pub fn intersects(&self, block_start: Au, block_end: Au) -> bool {
        debug_assert!(block_start <= block_end, "backwards damage interval");
        let index = self
            .intervals
            .partition_point(|interval| interval.end < block_start);
        self.intervals
            .get(index)
            .is_some_and(|interval| interval.start <= block_end)
    }

    /// The damaged intervals, sorted and disjoint.
    pub fn intervals(&self) -> &[Range<Au>] {
        &self.intervals
    }
}
