/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Geometric primitives for the ebb layout engine.
//!
//! Lengths are integer app units (`app_units::Au`, 1/60th of a CSS pixel).
//! Physical geometry uses `euclid`; flow-relative geometry lives in
//! [`logical_geometry`].

#![deny(unsafe_code)]

use app_units::{Au, MAX_AU, MIN_AU};
use euclid::default::{Point2D, Rect, Size2D};

pub mod logical_geometry;

pub use crate::logical_geometry::{
    DebugWritingMode, LogicalMargin, LogicalPoint, LogicalRect, LogicalSize, WritingMode,
};

/// The largest representable rectangle, for callers that need an effectively
/// unbounded area.
#[inline]
pub fn max_rect() -> Rect<Au> {
    Rect::new(
        Point2D::new(MIN_AU / 2, MIN_AU / 2),
        Size2D::new(MAX_AU, MAX_AU),
    )
}
