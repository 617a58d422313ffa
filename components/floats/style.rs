/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The slice of computed style the float manager consumes, and the frame
//! handle it consumes it through.
//!
//! The style system proper lives elsewhere; these are the resolved values a
//! frame exposes once cascading and used-value computation are done.
//! Percentages inside basic shapes stay unresolved until the shape is built,
//! because their basis (the shape box) is only known at that point.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use app_units::{Au, AU_PER_PX};
use euclid::default::{Rect, SideOffsets2D, Size2D};
use geometry::{LogicalMargin, WritingMode};

use crate::manager::FloatSide;

/// Opaque frame identity, used for equality during trailing-removal and for
/// keying the stored float region.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct FrameId(pub u64);

/// The reference box a `shape-outside` value is resolved against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ShapeBox {
    MarginBox,
    BorderBox,
    PaddingBox,
    ContentBox,
}

/// A computed `<length-percentage>`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LengthPercentage {
    pub length: Au,
    pub percentage: f32,
}

impl LengthPercentage {
    #[inline]
    pub fn new(length: Au, percentage: f32) -> LengthPercentage {
        LengthPercentage { length, percentage }
    }

    #[inline]
    pub fn length(length: Au) -> LengthPercentage {
        LengthPercentage::new(length, 0.)
    }

    #[inline]
    pub fn percentage(percentage: f32) -> LengthPercentage {
        LengthPercentage::new(Au(0), percentage)
    }

    #[inline]
    pub fn resolve(&self, basis: Au) -> Au {
        self.length + basis.scale_by(self.percentage)
    }
}

/// A computed `<shape-radius>` for `circle()` and `ellipse()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShapeRadius {
    Length(LengthPercentage),
    ClosestSide,
    FarthestSide,
}

impl Default for ShapeRadius {
    fn default() -> ShapeRadius {
        ShapeRadius::ClosestSide
    }
}

/// A computed `<position>`, resolved against the reference box size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapePosition {
    pub horizontal: LengthPercentage,
    pub vertical: LengthPercentage,
}

impl Default for ShapePosition {
    fn default() -> ShapePosition {
        // The initial position is the center of the reference box.
        ShapePosition {
            horizontal: LengthPercentage::percentage(0.5),
            vertical: LengthPercentage::percentage(0.5),
        }
    }
}

/// One corner of a `round` clause, horizontal then vertical radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerRadius {
    pub x: LengthPercentage,
    pub y: LengthPercentage,
}

/// The `round` clause of `inset()`, in physical corner order.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InsetRadii {
    pub top_left: CornerRadius,
    pub top_right: CornerRadius,
    pub bottom_right: CornerRadius,
    pub bottom_left: CornerRadius,
}

/// Resolved physical border radii, as supplied by the frame for its shape
/// box. Each corner carries its horizontal (`width`) and vertical (`height`)
/// radius.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BorderRadii {
    pub top_left: Size2D<Au>,
    pub top_right: Size2D<Au>,
    pub bottom_right: Size2D<Au>,
    pub bottom_left: Size2D<Au>,
}

/// A computed `inset()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InsetRect {
    pub top: LengthPercentage,
    pub right: LengthPercentage,
    pub bottom: LengthPercentage,
    pub left: LengthPercentage,
    pub round: Option<InsetRadii>,
}

/// A computed `circle()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Circle {
    pub position: ShapePosition,
    pub radius: ShapeRadius,
}

/// A computed `ellipse()`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Ellipse {
    pub position: ShapePosition,
    pub radius_x: ShapeRadius,
    pub radius_y: ShapeRadius,
}

/// A computed `polygon()`. Coordinates are (horizontal, vertical) pairs
/// resolved against the reference box size.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polygon {
    pub coordinates: Vec<(LengthPercentage, LengthPercentage)>,
}

/// A computed `<basic-shape>`.
#[derive(Clone, Debug, PartialEq)]
pub enum BasicShape {
    Inset(InsetRect),
    Circle(Circle),
    Ellipse(Ellipse),
    Polygon(Polygon),
}

/// An 8-bit alpha surface produced by rasterizing a shape image.
#[derive(Clone, Debug)]
pub struct AlphaMask {
    bytes: Vec<u8>,
    stride: usize,
    size: Size2D<i32>,
}

impl AlphaMask {
    pub fn new(bytes: Vec<u8>, stride: usize, size: Size2D<i32>) -> AlphaMask {
        debug_assert!(size.width >= 0 && size.height >= 0);
        debug_assert!(stride >= size.width as usize);
        debug_assert!(bytes.len() >= stride * size.height as usize);
        AlphaMask {
            bytes,
            stride,
            size,
        }
    }

    #[inline]
    pub fn size(&self) -> Size2D<i32> {
        self.size
    }

    #[inline]
    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        debug_assert!(x >= 0 && x < self.size.width);
        debug_assert!(y >= 0 && y < self.size.height);
        self.bytes[y as usize * self.stride + x as usize]
    }
}

/// Rasterizes a shape image to an alpha mask, synchronously and best-effort.
pub trait ShapeImageRenderer {
    /// Draws the image at the given device-pixel size. Returns `None` when
    /// the underlying image is not yet decoded; callers fall back to the
    /// float's margin box until a later layout retries.
    fn rasterize_alpha(&self, size: Size2D<i32>) -> Option<AlphaMask>;
}

/// A computed `shape-outside: <image>`.
#[derive(Clone)]
pub struct ShapeImage {
    pub image: Arc<dyn ShapeImageRenderer>,
    /// `shape-image-threshold`, clamped to `[0, 1]`.
    pub threshold: f32,
}

impl Debug for ShapeImage {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "ShapeImage(threshold: {})", self.threshold)
    }
}

/// The computed value of `shape-outside`.
#[derive(Clone, Debug, Default)]
pub enum ShapeOutside {
    #[default]
    None,
    Box(ShapeBox),
    Shape(BasicShape, ShapeBox),
    Image(ShapeImage),
}

/// The frame handle the float manager works against.
///
/// A frame is the layout box of a floated element; the manager only ever
/// reads resolved style and geometry through this trait and stores nothing
/// but the opaque [`FrameId`].
pub trait FloatFrame {
    /// Stable identity for this frame.
    fn id(&self) -> FrameId;

    /// The physical side this float is pushed to, with `float: inline-start`
    /// and friends already resolved against `mode`.
    fn float_side(&self, mode: WritingMode) -> FloatSide;

    fn shape_outside(&self) -> &ShapeOutside;

    fn logical_used_margin(&self, mode: WritingMode) -> LogicalMargin<Au>;

    fn logical_used_border(&self, mode: WritingMode) -> LogicalMargin<Au>;

    fn logical_used_padding(&self, mode: WritingMode) -> LogicalMargin<Au>;

    /// Border radii for the frame's shape box, already adjusted to that box.
    /// `None` means the box is axis-aligned.
    fn shape_box_border_radii(&self) -> Option<BorderRadii>;

    /// The device-pixel scale shape images are rasterized at.
    fn app_units_per_dev_pixel(&self) -> i32 {
        AU_PER_PX
    }

    /// The frame's physical rect, used by the region-persistence helpers.
    fn rect(&self) -> Rect<Au>;

    /// The stored float-region margin correction, if any.
    fn float_region_margin(&self) -> Option<SideOffsets2D<Au>>;

    /// Attaches (or with `None`, removes) the float-region margin correction.
    fn set_float_region_margin(&self, margin: Option<SideOffsets2D<Au>>);
}
