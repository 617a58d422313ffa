/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The float manager: the ordered log of floated boxes within one block
//! formatting context, and the queries the reflow driver runs against it.
//!
//! Everything is stored in the manager's internal frame, with x measured from
//! the containing block's line-left edge and y from its block-start edge.
//! The manager carries a mutable origin that is added to every incoming rect
//! and query coordinate; already-stored floats are never moved by later
//! origin changes.

use std::cmp::{max, min};
use std::mem;

use app_units::{Au, MAX_AU, MIN_AU};
use euclid::default::{Rect, SideOffsets2D, Size2D};
use geometry::{LogicalMargin, LogicalRect, LogicalSize, WritingMode};
use log::debug;
use rustc_hash::FxHashSet;
use serde::Serialize;

use crate::cache;
use crate::damage::FloatDamage;
use crate::shape::{float_logical_rect, ShapeInfo};
use crate::style::{FloatFrame, FrameId};

/// Which side of the containing block a float is pushed to, in physical
/// line-relative terms.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FloatSide {
    Left,
    Right,
}

/// The sides a `clear` value applies to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum ClearSide {
    None,
    Left,
    Right,
    Both,
}

bitflags::bitflags!(
    /// Flags accepted by [`FloatManager::clear_floats`].
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ClearFlags: u8 {
        /// Resolve clearance against the floats actually present, ignoring
        /// floats pushed or split past a fragmentation break.
        const DONT_CLEAR_PUSHED_FLOATS = 1 << 0;
    }
);

/// How [`FloatManager::get_flow_area`] interprets the requested band.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BandInfoType {
    /// Starting from the given block coordinate, find the largest band that
    /// is uniform: no float edge crosses its interior. The returned band may
    /// be shorter than requested.
    BandFromPoint,
    /// The caller fixes the band's block extent; the result is the narrowest
    /// inline extent that avoids every float anywhere within it.
    WidthWithinHeight,
}

/// Whether a query is answered against plain margin boxes or against
/// `shape-outside` exclusion areas.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapeType {
    Margin,
    ShapeOutside,
}

/// The result of a flow-area query: the available band, plus whether any
/// float actually intruded on it.
#[derive(Clone, Debug, Serialize)]
pub struct FlowAreaRect {
    pub rect: LogicalRect<Au>,
    pub has_floats: bool,
}

/// One registered float.
///
/// `left_b_end` and `right_b_end` are the cumulative maxima of the block-end
/// coordinates of all same-side floats up to and including this entry. They
/// are monotone non-decreasing along the registry, which lets queries walk
/// backwards from the tail and stop as soon as both end at or before the
/// band start.
#[derive(Clone, Debug)]
pub struct FloatInfo {
    frame: FrameId,
    side: FloatSide,
    rect: Rect<Au>,
    shape: Option<ShapeInfo>,
    left_b_end: Au,
    right_b_end: Au,
}

impl FloatInfo {
    #[inline]
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    #[inline]
    pub fn side(&self) -> FloatSide {
        self.side
    }

    /// The margin box, in the manager's internal frame.
    #[inline]
    pub fn rect(&self) -> Rect<Au> {
        self.rect
    }

    #[inline]
    pub fn left_b_end(&self) -> Au {
        self.left_b_end
    }

    #[inline]
    pub fn right_b_end(&self) -> Au {
        self.right_b_end
    }

    fn margin_line_left(&self) -> Au {
        self.rect.min_x()
    }

    fn margin_line_right(&self) -> Au {
        self.rect.max_x()
    }

    fn margin_b_start(&self) -> Au {
        self.rect.min_y()
    }

    fn margin_b_end(&self) -> Au {
        self.rect.max_y()
    }

    fn is_empty(&self, shape_type: ShapeType) -> bool {
        match (shape_type, &self.shape) {
            (ShapeType::ShapeOutside, Some(shape)) => shape.is_empty(),
            _ => self.rect.size.width <= Au(0) || self.rect.size.height <= Au(0),
        }
    }

    // The shape never reaches outside the margin box: its edges are clamped
    // against the box's on every query.

    fn b_start(&self, shape_type: ShapeType) -> Au {
        match (shape_type, &self.shape) {
            (ShapeType::ShapeOutside, Some(shape)) => max(self.margin_b_start(), shape.b_start()),
            _ => self.margin_b_start(),
        }
    }

    fn b_end(&self, shape_type: ShapeType) -> Au {
        match (shape_type, &self.shape) {
            (ShapeType::ShapeOutside, Some(shape)) => min(self.margin_b_end(), shape.b_end()),
            _ => self.margin_b_end(),
        }
    }

    fn line_left(&self, shape_type: ShapeType, band_b_start: Au, band_b_end: Au) -> Au {
        match (shape_type, &self.shape) {
            (ShapeType::ShapeOutside, Some(shape)) => max(
                self.margin_line_left(),
                shape.line_left(band_b_start, band_b_end),
            ),
            _ => self.margin_line_left(),
        }
    }

    fn line_right(&self, shape_type: ShapeType, band_b_start: Au, band_b_end: Au) -> Au {
        match (shape_type, &self.shape) {
            (ShapeType::ShapeOutside, Some(shape)) => min(
                self.margin_line_right(),
                shape.line_right(band_b_start, band_b_end),
            ),
            _ => self.margin_line_right(),
        }
    }
}

/// A checkpoint of the manager's restorable state. The damage sink is
/// deliberately not part of it.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SavedState {
    float_count: usize,
    line_left: Au,
    block_start: Au,
    pushed_left_float_past_break: bool,
    pushed_right_float_past_break: bool,
    split_left_float_across_break: bool,
    split_right_float_across_break: bool,
}

impl SavedState {
    #[inline]
    pub fn float_count(&self) -> usize {
        self.float_count
    }
}

pub struct FloatManager {
    writing_mode: WritingMode,
    /// Origin offset added to incoming geometry, on the inline axis.
    line_left: Au,
    /// Origin offset added to incoming geometry, on the block axis.
    block_start: Au,
    floats: Vec<FloatInfo>,
    pushed_left_float_past_break: bool,
    pushed_right_float_past_break: bool,
    split_left_float_across_break: bool,
    split_right_float_across_break: bool,
    damage: FloatDamage,
}

impl FloatManager {
    pub fn new(writing_mode: WritingMode) -> FloatManager {
        FloatManager {
            writing_mode,
            line_left: Au(0),
            block_start: Au(0),
            floats: cache::take_registry_storage(),
            pushed_left_float_past_break: false,
            pushed_right_float_past_break: false,
            split_left_float_across_break: false,
            split_right_float_across_break: false,
            damage: FloatDamage::new(),
        }
    }

    #[inline]
    pub fn writing_mode(&self) -> WritingMode {
        self.writing_mode
    }

    #[inline]
    pub fn has_any_floats(&self) -> bool {
        !self.floats.is_empty()
    }

    #[inline]
    pub fn floats(&self) -> &[FloatInfo] {
        &self.floats
    }

    /// Moves the origin by the given deltas. Stored floats keep the absolute
    /// coordinates they were inserted with.
    pub fn translate(&mut self, d_line_left: Au, d_block_start: Au) {
        self.line_left = self.line_left + d_line_left;
        self.block_start = self.block_start + d_block_start;
    }

    #[inline]
    fn check_writing_mode(&self, mode: WritingMode) {
        debug_assert_eq!(
            mode, self.writing_mode,
            "writing mode differs from the one this float manager was created with"
        );
    }

    /// Registers a float. `margin_rect` is the float's margin box in
    /// flow-relative coordinates, relative to the current origin; the shape
    /// strategy, if any, is built here from the frame's `shape-outside`.
    pub fn add_float<F: FloatFrame + ?Sized>(
        &mut self,
        frame: &F,
        margin_rect: &LogicalRect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) {
        self.check_writing_mode(mode);
        debug_assert!(margin_rect.size.inline >= Au(0), "negative inline size");
        debug_assert!(margin_rect.size.block >= Au(0), "negative block size");

        let mut rect = float_logical_rect(margin_rect, mode, container_size);
        rect.origin.x = rect.origin.x + self.line_left;
        rect.origin.y = rect.origin.y + self.block_start;

        let side = frame.float_side(mode);
        let shape = ShapeInfo::from_frame(frame, margin_rect, mode, container_size).map(
            |mut shape| {
                shape.translate(self.line_left, self.block_start);
                shape
            },
        );

        let (mut left_b_end, mut right_b_end) = match self.floats.last() {
            Some(tail) => (tail.left_b_end, tail.right_b_end),
            None => (MIN_AU, MIN_AU),
        };
        let this_b_end = rect.max_y();
        match side {
            FloatSide::Left => left_b_end = max(left_b_end, this_b_end),
            FloatSide::Right => right_b_end = max(right_b_end, this_b_end),
        }

        self.damage.include(rect.min_y(), this_b_end);
        debug!(
            "float manager: adding {:?} float {:?} at {:?}",
            side,
            frame.id(),
            rect
        );
        self.floats.push(FloatInfo {
            frame: frame.id(),
            side,
            rect,
            shape,
            left_b_end,
            right_b_end,
        });
    }

    /// The inline band available to content within a block-axis band.
    ///
    /// `b_coord` and the returned rect are relative to the current origin;
    /// `content_area` is the containing block's inline span. `b_size` may be
    /// `MAX_AU` (only with [`BandInfoType::BandFromPoint`]) to ask for the
    /// band extending to the bottom of everything. When `saved_state` is
    /// given, only floats registered before that checkpoint are considered.
    #[allow(clippy::too_many_arguments)]
    pub fn get_flow_area(
        &self,
        mode: WritingMode,
        b_coord: Au,
        b_size: Au,
        band_info_type: BandInfoType,
        shape_type: ShapeType,
        content_area: &LogicalRect<Au>,
        saved_state: Option<&SavedState>,
        container_size: Size2D<Au>,
    ) -> FlowAreaRect {
        self.check_writing_mode(mode);
        debug_assert!(b_size >= Au(0), "negative band size");
        debug_assert!(
            content_area.size.inline >= Au(0),
            "negative content area inline size"
        );

        let block_start = b_coord + self.block_start;

        let float_count = match saved_state {
            Some(state) => state.float_count,
            None => self.floats.len(),
        };
        debug_assert!(
            float_count <= self.floats.len(),
            "saved state is newer than this manager's registry"
        );
        let floats = &self.floats[..min(float_count, self.floats.len())];

        // If there are no floats at all, or none reaching down to the band,
        // the entire requested area is available.
        let all_floats_above = match floats.last() {
            None => true,
            Some(tail) => tail.left_b_end <= block_start && tail.right_b_end <= block_start,
        };
        if all_floats_above {
            return FlowAreaRect {
                rect: LogicalRect::new(
                    mode,
                    content_area.start.i,
                    b_coord,
                    content_area.size.inline,
                    b_size,
                ),
                has_floats: false,
            };
        }

        let mut block_end;
        if b_size == MAX_AU {
            debug_assert!(
                band_info_type == BandInfoType::BandFromPoint,
                "unbounded block size only makes sense when banding from a point"
            );
            block_end = MAX_AU;
        } else {
            block_end = block_start + b_size;
            if block_end < block_start {
                block_end = MAX_AU;
            }
        }

        let content_line_left = self.line_left + content_area.line_left(mode, container_size);
        let content_line_right = self.line_left + content_area.line_right(mode, container_size);
        let mut line_left = content_line_left;
        let mut line_right = max(content_line_right, content_line_left);

        let mut has_floats = false;
        for fi in floats.iter().rev() {
            if fi.left_b_end <= block_start && fi.right_b_end <= block_start {
                // Nothing earlier in the registry can reach the band.
                break;
            }
            if fi.is_empty(shape_type) {
                continue;
            }
            let float_b_start = fi.b_start(shape_type);
            let float_b_end = fi.b_end(shape_type);

            if block_start < float_b_start && band_info_type == BandInfoType::BandFromPoint {
                // The float is below the band; stop the band above it.
                if float_b_start < block_end {
                    block_end = float_b_start;
                }
            } else if block_start < float_b_end
                && (float_b_start < block_end
                    || (float_b_start == block_end && block_start == block_end))
            {
                // The float is in the band. Zero-height bands (which only
                // WidthWithinHeight produces) take floats starting exactly at
                // the band coordinate, keeping such queries at least as
                // narrow as banding from the same point.
                let band_b_end_for_shape = match band_info_type {
                    BandInfoType::BandFromPoint => block_start,
                    BandInfoType::WidthWithinHeight => block_end,
                };
                match fi.side {
                    FloatSide::Left => {
                        let edge = fi.line_right(shape_type, block_start, band_b_end_for_shape);
                        if edge > line_left {
                            line_left = edge;
                            has_floats = true;
                        }
                    },
                    FloatSide::Right => {
                        let edge = fi.line_left(shape_type, block_start, band_b_end_for_shape);
                        if edge < line_right {
                            line_right = edge;
                            has_floats = true;
                        }
                    },
                }
                if float_b_end < block_end && band_info_type == BandInfoType::BandFromPoint {
                    block_end = float_b_end;
                }
            }
        }

        if line_left > line_right {
            // Opposing exclusions crossed; collapse the band to zero width,
            // keeping it inside the content area.
            line_left = min(line_left, content_line_right);
            line_right = line_left;
        }

        let block_size = if block_end == MAX_AU {
            MAX_AU
        } else {
            block_end - block_start
        };
        let inline_start = if mode.line_left_is_inline_start() {
            line_left - self.line_left
        } else {
            self.line_left - line_right + LogicalSize::from_physical(mode, container_size).inline
        };
        FlowAreaRect {
            rect: LogicalRect::new(
                mode,
                inline_start,
                block_start - self.block_start,
                line_right - line_left,
                block_size,
            ),
            has_floats,
        }
    }

    /// True when clearance on the given side cannot be resolved within this
    /// fragment because a float of that side was pushed or split past a
    /// break.
    pub fn clear_continues(&self, clear: ClearSide) -> bool {
        ((self.pushed_left_float_past_break || self.split_left_float_across_break) &&
            (clear == ClearSide::Both || clear == ClearSide::Left)) ||
            ((self.pushed_right_float_past_break || self.split_right_float_across_break) &&
                (clear == ClearSide::Both || clear == ClearSide::Right))
    }

    /// The block coordinate content must move to in order to clear past the
    /// given side's floats: `b_coord` raised to the relevant cumulative
    /// block-end. Returns `MAX_AU` when clearance continues past a break and
    /// [`ClearFlags::DONT_CLEAR_PUSHED_FLOATS`] is not set.
    pub fn clear_floats(&self, b_coord: Au, clear: ClearSide, flags: ClearFlags) -> Au {
        if !flags.contains(ClearFlags::DONT_CLEAR_PUSHED_FLOATS) && self.clear_continues(clear) {
            return MAX_AU;
        }
        let tail = match self.floats.last() {
            Some(tail) => tail,
            None => return b_coord,
        };

        let mut block_end = b_coord + self.block_start;
        match clear {
            ClearSide::Left => block_end = max(block_end, tail.left_b_end),
            ClearSide::Right => block_end = max(block_end, tail.right_b_end),
            ClearSide::Both => {
                block_end = max(block_end, tail.left_b_end);
                block_end = max(block_end, tail.right_b_end);
            },
            ClearSide::None => {},
        }
        block_end - self.block_start
    }

    /// The block-start of the most recently added float, used by the driver
    /// to check forward progress. `MAX_AU` when floats were pushed past a
    /// break, `MIN_AU` when the registry is empty.
    pub fn get_lowest_float_top(&self) -> Au {
        if self.pushed_left_float_past_break || self.pushed_right_float_past_break {
            return MAX_AU;
        }
        match self.floats.last() {
            None => MIN_AU,
            Some(tail) => tail.rect.min_y() - self.block_start,
        }
    }

    /// Captures the origin, break flags, and registry length. The damage
    /// sink is not captured; it accumulates across checkpoints.
    pub fn push_state(&self) -> SavedState {
        SavedState {
            float_count: self.floats.len(),
            line_left: self.line_left,
            block_start: self.block_start,
            pushed_left_float_past_break: self.pushed_left_float_past_break,
            pushed_right_float_past_break: self.pushed_right_float_past_break,
            split_left_float_across_break: self.split_left_float_across_break,
            split_right_float_across_break: self.split_right_float_across_break,
        }
    }

    /// Restores a checkpoint taken with [`FloatManager::push_state`],
    /// discarding floats registered since.
    pub fn pop_state(&mut self, state: &SavedState) {
        debug_assert!(
            state.float_count <= self.floats.len(),
            "restoring a checkpoint from some other manager"
        );
        self.floats.truncate(state.float_count);
        self.line_left = state.line_left;
        self.block_start = state.block_start;
        self.pushed_left_float_past_break = state.pushed_left_float_past_break;
        self.pushed_right_float_past_break = state.pushed_right_float_past_break;
        self.split_left_float_across_break = state.split_left_float_across_break;
        self.split_right_float_across_break = state.split_right_float_across_break;
        debug!(
            "float manager: popped state back to {} floats",
            state.float_count
        );
    }

    /// Drops trailing registry entries whose frame is in `frames`, stopping
    /// at the first one that is not. Entries further in cannot be removed:
    /// the cumulative summaries of everything after them would be wrong.
    /// Callers must only pass trailing frames.
    pub fn remove_trailing_regions(&mut self, frames: &FxHashSet<FrameId>) {
        while self
            .floats
            .last()
            .is_some_and(|tail| frames.contains(&tail.frame))
        {
            if let Some(removed) = self.floats.pop() {
                self.damage.include(removed.rect.min_y(), removed.rect.max_y());
                debug!("float manager: removed trailing float {:?}", removed.frame);
            }
        }
        debug_assert!(
            !self.floats.iter().any(|fi| frames.contains(&fi.frame)),
            "tried to remove floats from the middle of the registry"
        );
    }

    /// The float's margin region: its rect inflated by `margin`, with
    /// negative sizes collapsed to zero. A collapsed inline size keeps the
    /// margin edge content flows against: the inline-end edge when the float
    /// sits at line-left, the inline-start edge otherwise.
    pub fn calculate_region_for<F: FloatFrame + ?Sized>(
        mode: WritingMode,
        frame: &F,
        margin: &LogicalMargin<Au>,
        container_size: Size2D<Au>,
    ) -> LogicalRect<Au> {
        let rect = LogicalRect::from_physical(mode, frame.rect(), container_size);
        let mut region = rect.inflate(margin);
        if region.size.inline < Au(0) {
            let side = frame.float_side(mode);
            if (side == FloatSide::Left) == mode.is_bidi_ltr() {
                region.start.i = region.start.i + region.size.inline;
            }
            region.size.inline = Au(0);
        }
        if region.size.block < Au(0) {
            region.size.block = Au(0);
        }
        region
    }

    /// Reads back the region stored with [`FloatManager::store_region_for`]:
    /// the frame's rect inflated by the stored margin correction.
    pub fn get_region_for<F: FloatFrame + ?Sized>(
        mode: WritingMode,
        frame: &F,
        container_size: Size2D<Au>,
    ) -> LogicalRect<Au> {
        let region = LogicalRect::from_physical(mode, frame.rect(), container_size);
        match frame.float_region_margin() {
            Some(margin) => region.inflate(&LogicalMargin::from_physical(mode, margin)),
            None => region,
        }
    }

    /// Persists a float's effective region on its frame as a margin
    /// correction relative to the frame's rect, so it survives frame-tree
    /// mutations between reflows. Storing the identity region removes the
    /// correction.
    pub fn store_region_for<F: FloatFrame + ?Sized>(
        mode: WritingMode,
        frame: &F,
        region: &LogicalRect<Au>,
        container_size: Size2D<Au>,
    ) {
        let rect = frame.rect();
        let region = region.to_physical(mode, container_size);
        if region == rect {
            frame.set_float_region_margin(None);
        } else {
            frame.set_float_region_margin(Some(SideOffsets2D::new(
                rect.min_y() - region.min_y(),
                region.max_x() - rect.max_x(),
                region.max_y() - rect.max_y(),
                rect.min_x() - region.min_x(),
            )));
        }
    }

    #[inline]
    pub fn pushed_left_float_past_break(&self) -> bool {
        self.pushed_left_float_past_break
    }

    pub fn set_pushed_left_float_past_break(&mut self, value: bool) {
        self.pushed_left_float_past_break = value;
    }

    #[inline]
    pub fn pushed_right_float_past_break(&self) -> bool {
        self.pushed_right_float_past_break
    }

    pub fn set_pushed_right_float_past_break(&mut self, value: bool) {
        self.pushed_right_float_past_break = value;
    }

    #[inline]
    pub fn split_left_float_across_break(&self) -> bool {
        self.split_left_float_across_break
    }

    pub fn set_split_left_float_across_break(&mut self, value: bool) {
        self.split_left_float_across_break = value;
    }

    #[inline]
    pub fn split_right_float_across_break(&self) -> bool {
        self.split_right_float_across_break
    }

    pub fn set_split_right_float_across_break(&mut self, value: bool) {
        self.split_right_float_across_break = value;
    }

    /// Marks a block-axis interval (relative to the current origin) as
    /// needing repaint.
    pub fn include_in_damage(&mut self, block_start: Au, block_end: Au) {
        self.damage
            .include(block_start + self.block_start, block_end + self.block_start);
    }

    pub fn has_float_damage(&self) -> bool {
        !self.damage.is_empty()
    }

    /// Does accumulated damage intersect the given interval (relative to the
    /// current origin)?
    pub fn intersects_damage(&self, block_start: Au, block_end: Au) -> bool {
        self.damage
            .intersects(block_start + self.block_start, block_end + self.block_start)
    }

    /// The damage sink itself, for drivers that hand it to the frame tree.
    pub fn float_damage(&self) -> &FloatDamage {
        &self.damage
    }
}

impl Drop for FloatManager {
    fn drop(&mut self) {
        cache::return_registry_storage(mem::take(&mut self.floats));
    }
}
