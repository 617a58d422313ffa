/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Float management for block layout.
//!
//! A [`FloatManager`] tracks the floated boxes of one block formatting
//! context and answers, for any band on the block axis, the inline space
//! left for lines and further floats, honoring `shape-outside` exclusion
//! shapes, `clear`, and fragmentation break flags. It decides nothing about
//! where floats go; the reflow driver tells it.

#![deny(unsafe_code)]

mod cache;
mod damage;
mod manager;
mod shape;
mod style;

pub use crate::cache::shutdown;
pub use crate::damage::FloatDamage;
pub use crate::manager::{
    BandInfoType, ClearFlags, ClearSide, FloatInfo, FloatManager, FloatSide, FlowAreaRect,
    SavedState, ShapeType,
};
pub use crate::shape::{
    CornerRadii, EllipseShape, ImageShape, PolygonShape, RoundedBoxShape, ShapeInfo,
};
pub use crate::style::{
    AlphaMask, BasicShape, BorderRadii, Circle, CornerRadius, Ellipse, FloatFrame, FrameId,
    InsetRadii, InsetRect, LengthPercentage, Polygon, ShapeBox, ShapeImage, ShapeImageRenderer,
    ShapeOutside, ShapePosition, ShapeRadius,
};
