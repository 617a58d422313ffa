/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Geometry in flow-relative space.
//!
//! Physical coordinates are only ever seen at the boundary: a caller hands in
//! a `euclid` rectangle together with a writing mode and the size of the
//! container used for mirroring, and gets flow-relative values back. All
//! arithmetic in between happens on the inline and block axes.

use std::fmt::{self, Debug, Formatter};
use std::ops::{Add, Sub};

use bitflags::bitflags;
use euclid::default::{Point2D, Rect, SideOffsets2D, Size2D};
use serde::{Serialize, Serializer};

bitflags!(
    /// A writing mode, expressed as the set of flags that turn horizontal-tb
    /// LTR into it. `WritingMode::empty()` is horizontal-tb LTR.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct WritingMode: u8 {
        /// The inline direction is right-to-left (`direction: rtl`).
        const RTL = 1 << 0;
        /// The block axis is horizontal (`vertical-rl`, `vertical-lr`,
        /// `sideways-lr`).
        const VERTICAL = 1 << 1;
        /// For vertical writing modes, the block direction runs left-to-right
        /// (`vertical-lr`, `sideways-lr`); clear means right-to-left.
        const VERTICAL_LR = 1 << 2;
        /// For vertical writing modes, the inline axis is flipped along the
        /// block axis (`sideways-lr`): line-left is the physical bottom.
        const SIDEWAYS = 1 << 3;
    }
);

impl WritingMode {
    #[inline]
    pub fn horizontal_tb() -> WritingMode {
        WritingMode::empty()
    }

    #[inline]
    pub fn vertical_rl() -> WritingMode {
        WritingMode::VERTICAL
    }

    #[inline]
    pub fn vertical_lr() -> WritingMode {
        WritingMode::VERTICAL | WritingMode::VERTICAL_LR
    }

    #[inline]
    pub fn sideways_lr() -> WritingMode {
        WritingMode::VERTICAL | WritingMode::VERTICAL_LR | WritingMode::SIDEWAYS
    }

    #[inline]
    pub fn is_vertical(&self) -> bool {
        self.intersects(WritingMode::VERTICAL)
    }

    /// Assuming .is_vertical(), does the block direction go left to right?
    #[inline]
    pub fn is_vertical_lr(&self) -> bool {
        self.intersects(WritingMode::VERTICAL_LR)
    }

    /// Assuming .is_vertical(), does the inline direction go top to bottom?
    #[inline]
    pub fn is_inline_tb(&self) -> bool {
        // https://drafts.csswg.org/css-writing-modes-3/#logical-to-physical
        self.intersects(WritingMode::RTL) == self.intersects(WritingMode::SIDEWAYS)
    }

    #[inline]
    pub fn is_bidi_ltr(&self) -> bool {
        !self.intersects(WritingMode::RTL)
    }

    #[inline]
    pub fn is_sideways(&self) -> bool {
        self.intersects(WritingMode::SIDEWAYS)
    }

    /// Is the line-left edge the inline-start edge?
    ///
    /// Line-left and line-right are direction-independent; they coincide with
    /// inline-start and inline-end exactly when the inline direction is LTR.
    #[inline]
    pub fn line_left_is_inline_start(&self) -> bool {
        self.is_bidi_ltr()
    }

    /// For vertical writing modes: does the line-left edge sit on the
    /// physical top? It does unless the inline axis is flipped
    /// (`sideways-lr`, where line-left is the physical bottom).
    #[inline]
    pub fn line_left_is_physical_top(&self) -> bool {
        debug_assert!(self.is_vertical());
        !self.is_sideways()
    }
}

impl Serialize for WritingMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.bits().serialize(serializer)
    }
}

/// Writing mode memory for debug assertions, zero-sized in release builds.
///
/// Flow-relative values are meaningless without the writing mode they were
/// computed in; mixing values from different modes is a contract bug that
/// this type catches in debug builds.
#[cfg(not(debug_assertions))]
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct DebugWritingMode;

#[cfg(debug_assertions)]
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct DebugWritingMode {
    mode: WritingMode,
}

#[cfg(not(debug_assertions))]
impl DebugWritingMode {
    #[inline]
    fn check(&self, _other: WritingMode) {}

    #[inline]
    fn check_debug(&self, _other: DebugWritingMode) {}

    #[inline]
    fn new(_mode: WritingMode) -> DebugWritingMode {
        DebugWritingMode
    }
}

#[cfg(debug_assertions)]
impl DebugWritingMode {
    #[inline]
    fn check(&self, other: WritingMode) {
        assert_eq!(self.mode, other)
    }

    #[inline]
    fn check_debug(&self, other: DebugWritingMode) {
        assert_eq!(self.mode, other.mode)
    }

    #[inline]
    fn new(mode: WritingMode) -> DebugWritingMode {
        DebugWritingMode { mode }
    }
}

#[cfg(not(debug_assertions))]
impl Debug for DebugWritingMode {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "?")
    }
}

#[cfg(debug_assertions)]
impl Debug for DebugWritingMode {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "{}",
            match (
                self.mode.is_vertical(),
                self.mode.is_vertical_lr(),
                self.mode.is_sideways(),
            ) {
                (false, ..) => "H",
                (true, false, _) => "V-RL",
                (true, true, false) => "V-LR",
                (true, true, true) => "S-LR",
            }
        )?;
        if !self.mode.is_bidi_ltr() {
            write!(formatter, " RTL")?;
        }
        Ok(())
    }
}

/// A size in flow-relative dimensions.
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct LogicalSize<T> {
    /// Extent along the inline direction.
    pub inline: T,
    /// Extent along the block direction.
    pub block: T,
    debug_writing_mode: DebugWritingMode,
}

impl<T: Debug> Debug for LogicalSize<T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "LogicalSize({:?}, i{:?}×b{:?})",
            self.debug_writing_mode, self.inline, self.block
        )
    }
}

impl<T: Copy> LogicalSize<T> {
    #[inline]
    pub fn new(mode: WritingMode, inline: T, block: T) -> LogicalSize<T> {
        LogicalSize {
            inline,
            block,
            debug_writing_mode: DebugWritingMode::new(mode),
        }
    }

    #[inline]
    pub fn from_physical(mode: WritingMode, size: Size2D<T>) -> LogicalSize<T> {
        if mode.is_vertical() {
            LogicalSize::new(mode, size.height, size.width)
        } else {
            LogicalSize::new(mode, size.width, size.height)
        }
    }

    #[inline]
    pub fn width(&self, mode: WritingMode) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            self.block
        } else {
            self.inline
        }
    }

    #[inline]
    pub fn height(&self, mode: WritingMode) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            self.inline
        } else {
            self.block
        }
    }

    #[inline]
    pub fn to_physical(&self, mode: WritingMode) -> Size2D<T> {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            Size2D::new(self.block, self.inline)
        } else {
            Size2D::new(self.inline, self.block)
        }
    }
}

/// A position in flow-relative dimensions, measured from the corner of the
/// container where both the inline and block directions start.
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct LogicalPoint<T> {
    /// Distance along the inline direction from the inline-start edge.
    pub i: T,
    /// Distance along the block direction from the block-start edge.
    pub b: T,
    debug_writing_mode: DebugWritingMode,
}

impl<T: Debug> Debug for LogicalPoint<T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "LogicalPoint({:?}, (i{:?}, b{:?}))",
            self.debug_writing_mode, self.i, self.b
        )
    }
}

impl<T: Copy> LogicalPoint<T> {
    #[inline]
    pub fn new(mode: WritingMode, i: T, b: T) -> LogicalPoint<T> {
        LogicalPoint {
            i,
            b,
            debug_writing_mode: DebugWritingMode::new(mode),
        }
    }
}

impl<T: Copy + Sub<T, Output = T>> LogicalPoint<T> {
    #[inline]
    pub fn from_physical(
        mode: WritingMode,
        point: Point2D<T>,
        container_size: Size2D<T>,
    ) -> LogicalPoint<T> {
        if mode.is_vertical() {
            LogicalPoint::new(
                mode,
                if mode.is_inline_tb() {
                    point.y
                } else {
                    container_size.height - point.y
                },
                if mode.is_vertical_lr() {
                    point.x
                } else {
                    container_size.width - point.x
                },
            )
        } else {
            LogicalPoint::new(
                mode,
                if mode.is_bidi_ltr() {
                    point.x
                } else {
                    container_size.width - point.x
                },
                point.y,
            )
        }
    }

    /// The physical x coordinate of this point.
    #[inline]
    pub fn x(&self, mode: WritingMode, container_size: Size2D<T>) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            if mode.is_vertical_lr() {
                self.b
            } else {
                container_size.width - self.b
            }
        } else if mode.is_bidi_ltr() {
            self.i
        } else {
            container_size.width - self.i
        }
    }

    /// The physical y coordinate of this point.
    #[inline]
    pub fn y(&self, mode: WritingMode, container_size: Size2D<T>) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            if mode.is_inline_tb() {
                self.i
            } else {
                container_size.height - self.i
            }
        } else {
            self.b
        }
    }

    #[inline]
    pub fn to_physical(&self, mode: WritingMode, container_size: Size2D<T>) -> Point2D<T> {
        Point2D::new(
            self.x(mode, container_size),
            self.y(mode, container_size),
        )
    }

    /// The distance from the line-left edge of the container to this point,
    /// mirroring `i` when the inline direction and the line direction
    /// disagree.
    #[inline]
    pub fn line_relative(&self, mode: WritingMode, container_size: Size2D<T>) -> T {
        self.debug_writing_mode.check(mode);
        if mode.line_left_is_inline_start() {
            self.i
        } else {
            LogicalSize::from_physical(mode, container_size).inline - self.i
        }
    }
}

/// A "margin" in flow-relative dimensions: offsets on the four flow-relative
/// sides.
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct LogicalMargin<T> {
    pub block_start: T,
    pub inline_end: T,
    pub block_end: T,
    pub inline_start: T,
    debug_writing_mode: DebugWritingMode,
}

impl<T: Debug> Debug for LogicalMargin<T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "LogicalMargin({:?}, [bs{:?}, ie{:?}, be{:?}, is{:?}])",
            self.debug_writing_mode,
            self.block_start,
            self.inline_end,
            self.block_end,
            self.inline_start
        )
    }
}

impl<T: Copy> LogicalMargin<T> {
    #[inline]
    pub fn new(
        mode: WritingMode,
        block_start: T,
        inline_end: T,
        block_end: T,
        inline_start: T,
    ) -> LogicalMargin<T> {
        LogicalMargin {
            block_start,
            inline_end,
            block_end,
            inline_start,
            debug_writing_mode: DebugWritingMode::new(mode),
        }
    }

    #[inline]
    pub fn from_physical(mode: WritingMode, offsets: SideOffsets2D<T>) -> LogicalMargin<T> {
        let block_start;
        let inline_end;
        let block_end;
        let inline_start;
        if mode.is_vertical() {
            if mode.is_vertical_lr() {
                block_start = offsets.left;
                block_end = offsets.right;
            } else {
                block_start = offsets.right;
                block_end = offsets.left;
            }
            if mode.is_inline_tb() {
                inline_start = offsets.top;
                inline_end = offsets.bottom;
            } else {
                inline_start = offsets.bottom;
                inline_end = offsets.top;
            }
        } else {
            block_start = offsets.top;
            block_end = offsets.bottom;
            if mode.is_bidi_ltr() {
                inline_start = offsets.left;
                inline_end = offsets.right;
            } else {
                inline_start = offsets.right;
                inline_end = offsets.left;
            }
        }
        LogicalMargin::new(mode, block_start, inline_end, block_end, inline_start)
    }

    #[inline]
    pub fn top(&self, mode: WritingMode) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            if mode.is_inline_tb() {
                self.inline_start
            } else {
                self.inline_end
            }
        } else {
            self.block_start
        }
    }

    #[inline]
    pub fn right(&self, mode: WritingMode) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            if mode.is_vertical_lr() {
                self.block_end
            } else {
                self.block_start
            }
        } else if mode.is_bidi_ltr() {
            self.inline_end
        } else {
            self.inline_start
        }
    }

    #[inline]
    pub fn bottom(&self, mode: WritingMode) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            if mode.is_inline_tb() {
                self.inline_end
            } else {
                self.inline_start
            }
        } else {
            self.block_end
        }
    }

    #[inline]
    pub fn left(&self, mode: WritingMode) -> T {
        self.debug_writing_mode.check(mode);
        if mode.is_vertical() {
            if mode.is_vertical_lr() {
                self.block_start
            } else {
                self.block_end
            }
        } else if mode.is_bidi_ltr() {
            self.inline_start
        } else {
            self.inline_end
        }
    }

    #[inline]
    pub fn to_physical(&self, mode: WritingMode) -> SideOffsets2D<T> {
        SideOffsets2D::new(
            self.top(mode),
            self.right(mode),
            self.bottom(mode),
            self.left(mode),
        )
    }
}

impl<T: Copy + Add<T, Output = T>> LogicalMargin<T> {
    #[inline]
    pub fn inline_start_end(&self) -> T {
        self.inline_start + self.inline_end
    }

    #[inline]
    pub fn block_start_end(&self) -> T {
        self.block_start + self.block_end
    }
}

/// A rectangle in flow-relative dimensions.
#[derive(Clone, Copy, Eq, PartialEq, Serialize)]
pub struct LogicalRect<T> {
    pub start: LogicalPoint<T>,
    pub size: LogicalSize<T>,
}

impl<T: Debug> Debug for LogicalRect<T> {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(
            formatter,
            "LogicalRect({:?}, (i{:?}, b{:?}), i{:?}×b{:?})",
            self.start.debug_writing_mode,
            self.start.i,
            self.start.b,
            self.size.inline,
            self.size.block
        )
    }
}

impl<T: Copy> LogicalRect<T> {
    #[inline]
    pub fn new(
        mode: WritingMode,
        inline_start: T,
        block_start: T,
        inline: T,
        block: T,
    ) -> LogicalRect<T> {
        LogicalRect {
            start: LogicalPoint::new(mode, inline_start, block_start),
            size: LogicalSize::new(mode, inline, block),
        }
    }
}

impl<T: Copy + Add<T, Output = T>> LogicalRect<T> {
    #[inline]
    pub fn inline_end(&self) -> T {
        self.start.i + self.size.inline
    }

    #[inline]
    pub fn block_end(&self) -> T {
        self.start.b + self.size.block
    }
}

impl<T: Copy + Add<T, Output = T> + Sub<T, Output = T>> LogicalRect<T> {
    #[inline]
    pub fn from_physical(
        mode: WritingMode,
        rect: Rect<T>,
        container_size: Size2D<T>,
    ) -> LogicalRect<T> {
        let inline_start;
        let block_start;
        let inline;
        let block;
        if mode.is_vertical() {
            inline = rect.size.height;
            block = rect.size.width;
            inline_start = if mode.is_inline_tb() {
                rect.origin.y
            } else {
                container_size.height - (rect.origin.y + rect.size.height)
            };
            block_start = if mode.is_vertical_lr() {
                rect.origin.x
            } else {
                container_size.width - (rect.origin.x + rect.size.width)
            };
        } else {
            inline = rect.size.width;
            block = rect.size.height;
            inline_start = if mode.is_bidi_ltr() {
                rect.origin.x
            } else {
                container_size.width - (rect.origin.x + rect.size.width)
            };
            block_start = rect.origin.y;
        }
        LogicalRect::new(mode, inline_start, block_start, inline, block)
    }

    #[inline]
    pub fn to_physical(&self, mode: WritingMode, container_size: Size2D<T>) -> Rect<T> {
        self.start.debug_writing_mode.check(mode);
        let x;
        let y;
        let width;
        let height;
        if mode.is_vertical() {
            width = self.size.block;
            height = self.size.inline;
            x = if mode.is_vertical_lr() {
                self.start.b
            } else {
                container_size.width - self.block_end()
            };
            y = if mode.is_inline_tb() {
                self.start.i
            } else {
                container_size.height - self.inline_end()
            };
        } else {
            width = self.size.inline;
            height = self.size.block;
            x = if mode.is_bidi_ltr() {
                self.start.i
            } else {
                container_size.width - self.inline_end()
            };
            y = self.start.b;
        }
        Rect::new(Point2D::new(x, y), Size2D::new(width, height))
    }

    /// The distance from the line-left edge of the container to the
    /// line-left edge of this rectangle.
    #[inline]
    pub fn line_left(&self, mode: WritingMode, container_size: Size2D<T>) -> T {
        self.start.debug_writing_mode.check(mode);
        if mode.line_left_is_inline_start() {
            self.start.i
        } else {
            LogicalSize::from_physical(mode, container_size).inline - self.inline_end()
        }
    }

    /// The distance from the line-left edge of the container to the
    /// line-right edge of this rectangle.
    #[inline]
    pub fn line_right(&self, mode: WritingMode, container_size: Size2D<T>) -> T {
        self.line_left(mode, container_size) + self.size.inline
    }

    /// Expands the rectangle by the given margin on all four flow-relative
    /// sides.
    #[inline]
    pub fn inflate(&self, margin: &LogicalMargin<T>) -> LogicalRect<T> {
        self.start
            .debug_writing_mode
            .check_debug(margin.debug_writing_mode);
        LogicalRect {
            start: LogicalPoint {
                i: self.start.i - margin.inline_start,
                b: self.start.b - margin.block_start,
                debug_writing_mode: self.start.debug_writing_mode,
            },
            size: LogicalSize {
                inline: self.size.inline + margin.inline_start_end(),
                block: self.size.block + margin.block_start_end(),
                debug_writing_mode: self.size.debug_writing_mode,
            },
        }
    }

    /// Shrinks the rectangle by the given margin on all four flow-relative
    /// sides.
    #[inline]
    pub fn deflate(&self, margin: &LogicalMargin<T>) -> LogicalRect<T> {
        self.start
            .debug_writing_mode
            .check_debug(margin.debug_writing_mode);
        LogicalRect {
            start: LogicalPoint {
                i: self.start.i + margin.inline_start,
                b: self.start.b + margin.block_start,
                debug_writing_mode: self.start.debug_writing_mode,
            },
            size: LogicalSize {
                inline: self.size.inline - margin.inline_start_end(),
                block: self.size.block - margin.block_start_end(),
                debug_writing_mode: self.size.debug_writing_mode,
            },
        }
    }
}
