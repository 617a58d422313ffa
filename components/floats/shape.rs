/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Exclusion shapes for `shape-outside`.
//!
//! Every shape answers the same question the float registry asks of a margin
//! box: given a band on the block axis, how far does the shape reach toward
//! line-left and line-right? Shapes are stored in the float manager's
//! internal frame (x from the container's line-left edge, y from its
//! block-start edge) and are built once, at float insertion time.

use std::cmp::{max, min};

use app_units::{Au, MAX_AU, MIN_AU};
use euclid::default::{Point2D, Rect, Size2D};
use geometry::{LogicalPoint, LogicalRect, WritingMode};
use log::warn;

use crate::style::{
    AlphaMask, BasicShape, BorderRadii, Circle, CornerRadius, Ellipse, FloatFrame, InsetRect,
    Polygon, ShapeBox, ShapeImage, ShapeOutside, ShapePosition, ShapeRadius,
};

/// Converts a flow-relative rect into the float manager's internal frame.
pub(crate) fn float_logical_rect(
    rect: &LogicalRect<Au>,
    mode: WritingMode,
    container_size: Size2D<Au>,
) -> Rect<Au> {
    Rect::new(
        Point2D::new(rect.line_left(mode, container_size), rect.start.b),
        Size2D::new(rect.size.inline, rect.size.block),
    )
}

/// Converts a physical point into the float manager's internal frame.
fn float_logical_point(
    point: Point2D<Au>,
    mode: WritingMode,
    container_size: Size2D<Au>,
) -> Point2D<Au> {
    let logical = LogicalPoint::from_physical(mode, point, container_size);
    Point2D::new(logical.line_relative(mode, container_size), logical.b)
}

fn physical_rect_to_float_logical(
    rect: Rect<Au>,
    mode: WritingMode,
    container_size: Size2D<Au>,
) -> Rect<Au> {
    let logical = LogicalRect::from_physical(mode, rect, container_size);
    float_logical_rect(&logical, mode, container_size)
}

/// A physical corner radius reordered for the internal frame: `width` along
/// the inline axis, `height` along the block axis.
fn float_logical_radius(radius: Size2D<Au>, mode: WritingMode) -> Size2D<Au> {
    if mode.is_vertical() {
        Size2D::new(radius.height, radius.width)
    } else {
        radius
    }
}

#[inline]
fn abs(value: Au) -> Au {
    Au(value.0.abs())
}

fn au_from_f64(value: f64) -> Au {
    Au(value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
}

fn round_to_pixels(value: Au, app_units_per_dev_pixel: i32) -> i32 {
    (f64::from(value.0) / f64::from(app_units_per_dev_pixel)).round() as i32
}

/// Border radii in the internal frame, one (inline, block) pair per corner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CornerRadii {
    pub line_left_b_start: Size2D<Au>,
    pub line_right_b_start: Size2D<Au>,
    pub line_left_b_end: Size2D<Au>,
    pub line_right_b_end: Size2D<Au>,
}

impl CornerRadii {
    /// Maps physical corners onto internal-frame corners. Under horizontal
    /// writing modes line-left is the physical left and block-start the top;
    /// under vertical ones block-start is a horizontal side and line-left the
    /// top (or the bottom, when the inline axis is flipped).
    pub fn from_physical(radii: &BorderRadii, mode: WritingMode) -> CornerRadii {
        let (ll_bs, lr_bs, ll_be, lr_be) = if mode.is_vertical() {
            let top_is_line_left = mode.line_left_is_physical_top();
            if mode.is_vertical_lr() {
                if top_is_line_left {
                    (
                        radii.top_left,
                        radii.bottom_left,
                        radii.top_right,
                        radii.bottom_right,
                    )
                } else {
                    (
                        radii.bottom_left,
                        radii.top_left,
                        radii.bottom_right,
                        radii.top_right,
                    )
                }
            } else if top_is_line_left {
                (
                    radii.top_right,
                    radii.bottom_right,
                    radii.top_left,
                    radii.bottom_left,
                )
            } else {
                (
                    radii.bottom_right,
                    radii.top_right,
                    radii.bottom_left,
                    radii.top_left,
                )
            }
        } else {
            (
                radii.top_left,
                radii.top_right,
                radii.bottom_left,
                radii.bottom_right,
            )
        };
        CornerRadii {
            line_left_b_start: float_logical_radius(ll_bs, mode),
            line_right_b_start: float_logical_radius(lr_bs, mode),
            line_left_b_end: float_logical_radius(ll_be, mode),
            line_right_b_end: float_logical_radius(lr_be, mode),
        }
    }
}

/// Solves the ellipse equation `(x/rx)² + (y/ry)² = 1` for x, with y measured
/// from the ellipse center.
fn x_intercept_at_y(y: Au, radius_x: Au, radius_y: Au) -> Au {
    debug_assert!(radius_y > Au(0));
    let ratio = f64::from(y.0) / f64::from(radius_y.0);
    au_from_f64(f64::from(radius_x.0) * (1. - ratio * ratio).max(0.).sqrt())
}

/// How far a corner arc pushes the band's edge inward, for a shape box
/// spanning `[shape_b_start, shape_b_end]` with the given corner radii on one
/// inline side.
///
/// Only one corner can matter: if the band crosses both corner spans it also
/// crosses the widest point of the side, and the two quarter arcs stay inside
/// the box, so the intrusion is zero. The most intruding point of a crossed
/// block-start arc is at the band's block-end edge (and symmetrically for the
/// block-end arc).
fn ellipse_line_intercept_diff(
    shape_b_start: Au,
    shape_b_end: Au,
    b_start_radius_inline: Au,
    b_start_radius_block: Au,
    b_end_radius_inline: Au,
    b_end_radius_block: Au,
    band_b_start: Au,
    band_b_end: Au,
) -> Au {
    if b_start_radius_block > Au(0)
        && band_b_end > shape_b_start
        && band_b_end < shape_b_start + b_start_radius_block
    {
        let intercept = x_intercept_at_y(
            shape_b_start + b_start_radius_block - band_b_end,
            b_start_radius_inline,
            b_start_radius_block,
        );
        b_start_radius_inline - intercept
    } else if b_end_radius_block > Au(0)
        && band_b_start > shape_b_end - b_end_radius_block
        && band_b_start < shape_b_end
    {
        let intercept = x_intercept_at_y(
            band_b_start - (shape_b_end - b_end_radius_block),
            b_end_radius_inline,
            b_end_radius_block,
        );
        b_end_radius_inline - intercept
    } else {
        Au(0)
    }
}

/// `<shape-box>` keywords and `inset()`: a rectangle with optional rounded
/// corners.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundedBoxShape {
    rect: Rect<Au>,
    radii: Option<CornerRadii>,
}

impl RoundedBoxShape {
    pub fn new(rect: Rect<Au>, radii: Option<CornerRadii>) -> RoundedBoxShape {
        RoundedBoxShape { rect, radii }
    }

    pub fn line_left(&self, band_b_start: Au, band_b_end: Au) -> Au {
        let radii = match &self.radii {
            Some(radii) => radii,
            None => return self.rect.origin.x,
        };
        let diff = ellipse_line_intercept_diff(
            self.rect.min_y(),
            self.rect.max_y(),
            radii.line_left_b_start.width,
            radii.line_left_b_start.height,
            radii.line_left_b_end.width,
            radii.line_left_b_end.height,
            band_b_start,
            band_b_end,
        );
        self.rect.origin.x + diff
    }

    pub fn line_right(&self, band_b_start: Au, band_b_end: Au) -> Au {
        let radii = match &self.radii {
            Some(radii) => radii,
            None => return self.rect.max_x(),
        };
        let diff = ellipse_line_intercept_diff(
            self.rect.min_y(),
            self.rect.max_y(),
            radii.line_right_b_start.width,
            radii.line_right_b_start.height,
            radii.line_right_b_end.width,
            radii.line_right_b_end.height,
            band_b_start,
            band_b_end,
        );
        self.rect.max_x() - diff
    }

    pub fn b_start(&self) -> Au {
        self.rect.min_y()
    }

    pub fn b_end(&self) -> Au {
        self.rect.max_y()
    }

    pub fn is_empty(&self) -> bool {
        self.rect.size.width <= Au(0) || self.rect.size.height <= Au(0)
    }

    fn translate(&mut self, d_line_left: Au, d_block_start: Au) {
        self.rect.origin.x = self.rect.origin.x + d_line_left;
        self.rect.origin.y = self.rect.origin.y + d_block_start;
    }
}

/// `circle()` and `ellipse()`: a center with an (inline, block) radius pair.
#[derive(Clone, Debug, PartialEq)]
pub struct EllipseShape {
    center: Point2D<Au>,
    radii: Size2D<Au>,
}

impl EllipseShape {
    pub fn new(center: Point2D<Au>, radii: Size2D<Au>) -> EllipseShape {
        EllipseShape { center, radii }
    }

    fn intercept_diff(&self, band_b_start: Au, band_b_end: Au) -> Au {
        ellipse_line_intercept_diff(
            self.center.y - self.radii.height,
            self.center.y + self.radii.height,
            self.radii.width,
            self.radii.height,
            self.radii.width,
            self.radii.height,
            band_b_start,
            band_b_end,
        )
    }

    pub fn line_left(&self, band_b_start: Au, band_b_end: Au) -> Au {
        self.center.x - self.radii.width + self.intercept_diff(band_b_start, band_b_end)
    }

    pub fn line_right(&self, band_b_start: Au, band_b_end: Au) -> Au {
        self.center.x + self.radii.width - self.intercept_diff(band_b_start, band_b_end)
    }

    pub fn b_start(&self) -> Au {
        self.center.y - self.radii.height
    }

    pub fn b_end(&self) -> Au {
        self.center.y + self.radii.height
    }

    pub fn is_empty(&self) -> bool {
        self.radii.width <= Au(0) || self.radii.height <= Au(0)
    }

    fn translate(&mut self, d_line_left: Au, d_block_start: Au) {
        self.center.x = self.center.x + d_line_left;
        self.center.y = self.center.y + d_block_start;
    }
}

/// `polygon()`: an ordered vertex list with a precomputed block-axis span.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonShape {
    vertices: Vec<Point2D<Au>>,
    empty: bool,
    b_start: Au,
    b_end: Au,
}

impl PolygonShape {
    pub fn new(vertices: Vec<Point2D<Au>>) -> PolygonShape {
        // Polygons with fewer than three vertices enclose no area, as do ones
        // whose vertices are all collinear.
        let empty = vertices.len() < 3 || {
            let first = vertices[0];
            let second = vertices[1];
            vertices[2..].iter().all(|vertex| {
                let d1 = (
                    i64::from((second.x - first.x).0),
                    i64::from((second.y - first.y).0),
                );
                let d2 = (
                    i64::from((vertex.x - first.x).0),
                    i64::from((vertex.y - first.y).0),
                );
                d1.0 * d2.1 == d1.1 * d2.0
            })
        };
        let mut b_start = MAX_AU;
        let mut b_end = MIN_AU;
        for vertex in &vertices {
            b_start = min(b_start, vertex.y);
            b_end = max(b_end, vertex.y);
        }
        PolygonShape {
            vertices,
            empty,
            b_start,
            b_end,
        }
    }

    /// x at the given y on the edge from `from` to `to`, which must not be
    /// horizontal.
    fn edge_x_intercept_at_y(y: Au, from: Point2D<Au>, to: Point2D<Au>) -> Au {
        debug_assert!(from.y < to.y);
        let along = f64::from((y - from.y).0) / f64::from((to.y - from.y).0);
        from.x + au_from_f64(f64::from((to.x - from.x).0) * along)
    }

    fn line_edge(&self, band_b_start: Au, band_b_end: Au, find_line_left: bool) -> Au {
        debug_assert!(!self.empty, "querying an empty polygon");
        let mut edge = if find_line_left { MAX_AU } else { MIN_AU };
        let count = self.vertices.len();
        for index in 0..count {
            let mut from = self.vertices[index];
            let mut to = self.vertices[(index + 1) % count];
            if from.y > to.y {
                std::mem::swap(&mut from, &mut to);
            }
            // Skip edges entirely outside the band. Horizontal edges are
            // skipped too: an extremum on one is attained at its endpoints,
            // each of which participates in a neighboring edge.
            if band_b_start >= to.y || band_b_end <= from.y || from.y == to.y {
                continue;
            }
            let start_intercept = if band_b_start <= from.y {
                from.x
            } else {
                Self::edge_x_intercept_at_y(band_b_start, from, to)
            };
            let end_intercept = if band_b_end >= to.y {
                to.x
            } else {
                Self::edge_x_intercept_at_y(band_b_end, from, to)
            };
            edge = if find_line_left {
                min(edge, min(start_intercept, end_intercept))
            } else {
                max(edge, max(start_intercept, end_intercept))
            };
        }
        edge
    }

    pub fn line_left(&self, band_b_start: Au, band_b_end: Au) -> Au {
        self.line_edge(band_b_start, band_b_end, true)
    }

    pub fn line_right(&self, band_b_start: Au, band_b_end: Au) -> Au {
        self.line_edge(band_b_start, band_b_end, false)
    }

    pub fn b_start(&self) -> Au {
        self.b_start
    }

    pub fn b_end(&self) -> Au {
        self.b_end
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    fn translate(&mut self, d_line_left: Au, d_block_start: Au) {
        for vertex in &mut self.vertices {
            vertex.x = vertex.x + d_line_left;
            vertex.y = vertex.y + d_block_start;
        }
        self.b_start = self.b_start + d_block_start;
        self.b_end = self.b_end + d_block_start;
    }
}

/// `shape-outside: <image>`: one interval per device-pixel row (or column,
/// for vertical writing modes) spanning the opaque pixels of that slice,
/// sorted ascending on the block axis.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageShape {
    intervals: Vec<Rect<Au>>,
}

/// The first and last index in a mask slice whose alpha exceeds the
/// threshold.
fn opaque_run(alpha: impl Fn(i32) -> u8, len: i32, threshold: u8) -> Option<(i32, i32)> {
    let mut run = None;
    for index in 0..len {
        if alpha(index) > threshold {
            run = match run {
                None => Some((index, index)),
                Some((first, _)) => Some((first, index)),
            };
        }
    }
    run
}

impl ImageShape {
    pub fn new(intervals: Vec<Rect<Au>>) -> ImageShape {
        debug_assert!(
            intervals
                .windows(2)
                .all(|pair| pair[0].origin.y <= pair[1].origin.y),
            "image intervals must ascend on the block axis"
        );
        ImageShape { intervals }
    }

    /// Scans an alpha mask covering `content_rect` (already in the internal
    /// frame) and builds the interval list. A pixel belongs to the shape when
    /// its alpha strictly exceeds `threshold` scaled to `[0, 255]`.
    pub fn from_alpha_mask(
        mask: &AlphaMask,
        threshold: f32,
        app_units_per_dev_pixel: i32,
        content_rect: Rect<Au>,
        mode: WritingMode,
    ) -> ImageShape {
        debug_assert!(app_units_per_dev_pixel > 0);
        let threshold = (threshold.clamp(0., 1.) * 255.) as u8;
        let size = mask.size();
        let pixel = Au(app_units_per_dev_pixel);
        let mut intervals = Vec::new();

        if mode.is_vertical() {
            // The block axis runs along mask columns.
            for column in 0..size.width {
                let run = opaque_run(|index| mask.alpha_at(column, index), size.height, threshold);
                let Some((first, last)) = run else {
                    continue;
                };
                let b = if mode.is_vertical_lr() {
                    content_rect.origin.y + pixel * column
                } else {
                    content_rect.origin.y + pixel * (size.width - 1 - column)
                };
                let i = if mode.line_left_is_physical_top() {
                    content_rect.origin.x + pixel * first
                } else {
                    content_rect.origin.x + pixel * (size.height - 1 - last)
                };
                intervals.push(Rect::new(
                    Point2D::new(i, b),
                    Size2D::new(pixel * (last - first + 1), pixel),
                ));
            }
            if !mode.is_vertical_lr() {
                // Columns were scanned left to right but the block axis runs
                // right to left; restore ascending block order.
                intervals.reverse();
            }
        } else {
            for row in 0..size.height {
                let run = opaque_run(|index| mask.alpha_at(index, row), size.width, threshold);
                let Some((first, last)) = run else {
                    continue;
                };
                intervals.push(Rect::new(
                    Point2D::new(
                        content_rect.origin.x + pixel * first,
                        content_rect.origin.y + pixel * row,
                    ),
                    Size2D::new(pixel * (last - first + 1), pixel),
                ));
            }
        }
        ImageShape::new(intervals)
    }

    /// Index of the first interval whose block-end lies past `b`.
    fn first_interval_crossing(&self, b: Au) -> usize {
        self.intervals
            .partition_point(|interval| interval.max_y() <= b)
    }

    fn line_edge(&self, band_b_start: Au, band_b_end: Au, find_line_left: bool) -> Au {
        let mut edge = if find_line_left { MAX_AU } else { MIN_AU };
        for interval in &self.intervals[self.first_interval_crossing(band_b_start)..] {
            if interval.origin.y >= band_b_end {
                break;
            }
            edge = if find_line_left {
                min(edge, interval.origin.x)
            } else {
                max(edge, interval.max_x())
            };
        }
        edge
    }

    pub fn line_left(&self, band_b_start: Au, band_b_end: Au) -> Au {
        self.line_edge(band_b_start, band_b_end, true)
    }

    pub fn line_right(&self, band_b_start: Au, band_b_end: Au) -> Au {
        self.line_edge(band_b_start, band_b_end, false)
    }

    pub fn b_start(&self) -> Au {
        debug_assert!(!self.is_empty());
        self.intervals.first().map_or(Au(0), |interval| interval.origin.y)
    }

    pub fn b_end(&self) -> Au {
        debug_assert!(!self.is_empty());
        self.intervals.last().map_or(Au(0), |interval| interval.max_y())
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    pub fn intervals(&self) -> &[Rect<Au>] {
        &self.intervals
    }

    fn translate(&mut self, d_line_left: Au, d_block_start: Au) {
        for interval in &mut self.intervals {
            interval.origin.x = interval.origin.x + d_line_left;
            interval.origin.y = interval.origin.y + d_block_start;
        }
    }
}

/// An exclusion shape, dispatched by variant.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeInfo {
    RoundedBox(RoundedBoxShape),
    Ellipse(EllipseShape),
    Polygon(PolygonShape),
    Image(ImageShape),
}

impl ShapeInfo {
    /// Builds the exclusion shape for a float from its computed
    /// `shape-outside`, in the internal frame but not yet translated by the
    /// manager origin.
    ///
    /// Returns `None` for `shape-outside: none`, for an empty margin box, and
    /// for a shape image whose pixels are not available yet; the float then
    /// excludes exactly its margin box. Image acquisition is best-effort and
    /// idempotent: re-inserting the same float in a later layout may succeed.
    pub fn from_frame<F: FloatFrame + ?Sized>(
        frame: &F,
        margin_rect: &LogicalRect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) -> Option<ShapeInfo> {
        if margin_rect.size.inline <= Au(0) || margin_rect.size.block <= Au(0) {
            return None;
        }
        match frame.shape_outside() {
            ShapeOutside::None => None,
            ShapeOutside::Box(shape_box) => {
                let reference = shape_box_rect(frame, margin_rect, *shape_box, mode);
                Some(ShapeInfo::RoundedBox(RoundedBoxShape::new(
                    float_logical_rect(&reference, mode, container_size),
                    frame
                        .shape_box_border_radii()
                        .map(|radii| CornerRadii::from_physical(&radii, mode)),
                )))
            }
            ShapeOutside::Shape(basic_shape, shape_box) => {
                let reference = shape_box_rect(frame, margin_rect, *shape_box, mode);
                Some(ShapeInfo::from_basic_shape(
                    basic_shape,
                    &reference,
                    mode,
                    container_size,
                ))
            }
            ShapeOutside::Image(image) => {
                ShapeInfo::from_image(frame, image, margin_rect, mode, container_size)
            }
        }
    }

    fn from_basic_shape(
        shape: &BasicShape,
        reference: &LogicalRect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) -> ShapeInfo {
        // Percentages inside basic shapes resolve against the physical axes
        // of the reference box.
        let physical = reference.to_physical(mode, container_size);
        match shape {
            BasicShape::Inset(inset) => Self::from_inset(inset, &physical, mode, container_size),
            BasicShape::Circle(circle) => {
                Self::from_circle(circle, &physical, mode, container_size)
            },
            BasicShape::Ellipse(ellipse) => {
                Self::from_ellipse(ellipse, &physical, mode, container_size)
            },
            BasicShape::Polygon(polygon) => {
                Self::from_polygon(polygon, &physical, mode, container_size)
            },
        }
    }

    fn from_inset(
        inset: &InsetRect,
        reference: &Rect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) -> ShapeInfo {
        let top = inset.top.resolve(reference.size.height);
        let right = inset.right.resolve(reference.size.width);
        let bottom = inset.bottom.resolve(reference.size.height);
        let left = inset.left.resolve(reference.size.width);
        // Over-large insets collapse the rect to zero size.
        let inset_rect = Rect::new(
            Point2D::new(reference.origin.x + left, reference.origin.y + top),
            Size2D::new(
                max(reference.size.width - left - right, Au(0)),
                max(reference.size.height - top - bottom, Au(0)),
            ),
        );
        let radii = inset.round.map(|round| {
            let resolve = |corner: CornerRadius| {
                Size2D::new(
                    corner.x.resolve(inset_rect.size.width),
                    corner.y.resolve(inset_rect.size.height),
                )
            };
            CornerRadii::from_physical(
                &BorderRadii {
                    top_left: resolve(round.top_left),
                    top_right: resolve(round.top_right),
                    bottom_right: resolve(round.bottom_right),
                    bottom_left: resolve(round.bottom_left),
                },
                mode,
            )
        });
        ShapeInfo::RoundedBox(RoundedBoxShape::new(
            physical_rect_to_float_logical(inset_rect, mode, container_size),
            radii,
        ))
    }

    fn from_circle(
        circle: &Circle,
        reference: &Rect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) -> ShapeInfo {
        let center = resolve_position(&circle.position, reference);
        let radius = match &circle.radius {
            ShapeRadius::Length(length) => length.resolve(circle_basis(reference.size)),
            ShapeRadius::ClosestSide => side_distances(center, reference)
                .into_iter()
                .min()
                .unwrap_or(Au(0)),
            ShapeRadius::FarthestSide => side_distances(center, reference)
                .into_iter()
                .max()
                .unwrap_or(Au(0)),
        };
        ShapeInfo::Ellipse(EllipseShape::new(
            float_logical_point(center, mode, container_size),
            float_logical_radius(Size2D::new(radius, radius), mode),
        ))
    }

    fn from_ellipse(
        ellipse: &Ellipse,
        reference: &Rect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) -> ShapeInfo {
        let center = resolve_position(&ellipse.position, reference);
        let radius_x = match &ellipse.radius_x {
            ShapeRadius::Length(length) => length.resolve(reference.size.width),
            ShapeRadius::ClosestSide => min(
                abs(center.x - reference.min_x()),
                abs(reference.max_x() - center.x),
            ),
            ShapeRadius::FarthestSide => max(
                abs(center.x - reference.min_x()),
                abs(reference.max_x() - center.x),
            ),
        };
        let radius_y = match &ellipse.radius_y {
            ShapeRadius::Length(length) => length.resolve(reference.size.height),
            ShapeRadius::ClosestSide => min(
                abs(center.y - reference.min_y()),
                abs(reference.max_y() - center.y),
            ),
            ShapeRadius::FarthestSide => max(
                abs(center.y - reference.min_y()),
                abs(reference.max_y() - center.y),
            ),
        };
        ShapeInfo::Ellipse(EllipseShape::new(
            float_logical_point(center, mode, container_size),
            float_logical_radius(Size2D::new(radius_x, radius_y), mode),
        ))
    }

    fn from_polygon(
        polygon: &Polygon,
        reference: &Rect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) -> ShapeInfo {
        let vertices = polygon
            .coordinates
            .iter()
            .map(|&(x, y)| {
                let vertex = Point2D::new(
                    reference.origin.x + x.resolve(reference.size.width),
                    reference.origin.y + y.resolve(reference.size.height),
                );
                float_logical_point(vertex, mode, container_size)
            })
            .collect();
        ShapeInfo::Polygon(PolygonShape::new(vertices))
    }

    fn from_image<F: FloatFrame + ?Sized>(
        frame: &F,
        image: &ShapeImage,
        margin_rect: &LogicalRect<Au>,
        mode: WritingMode,
        container_size: Size2D<Au>,
    ) -> Option<ShapeInfo> {
        let content = shape_box_rect(frame, margin_rect, ShapeBox::ContentBox, mode);
        let app_units_per_dev_pixel = frame.app_units_per_dev_pixel();
        debug_assert!(app_units_per_dev_pixel > 0);
        let physical = content.to_physical(mode, container_size);
        let size = Size2D::new(
            round_to_pixels(physical.size.width, app_units_per_dev_pixel),
            round_to_pixels(physical.size.height, app_units_per_dev_pixel),
        );
        if size.width <= 0 || size.height <= 0 {
            return Some(ShapeInfo::Image(ImageShape::new(Vec::new())));
        }
        let Some(mask) = image.image.rasterize_alpha(size) else {
            warn!("shape-outside image is not ready; float falls back to its margin box");
            return None;
        };
        debug_assert_eq!(mask.size(), size);
        Some(ShapeInfo::Image(ImageShape::from_alpha_mask(
            &mask,
            image.threshold,
            app_units_per_dev_pixel,
            float_logical_rect(&content, mode, container_size),
            mode,
        )))
    }

    pub fn line_left(&self, band_b_start: Au, band_b_end: Au) -> Au {
        match self {
            ShapeInfo::RoundedBox(shape) => shape.line_left(band_b_start, band_b_end),
            ShapeInfo::Ellipse(shape) => shape.line_left(band_b_start, band_b_end),
            ShapeInfo::Polygon(shape) => shape.line_left(band_b_start, band_b_end),
            ShapeInfo::Image(shape) => shape.line_left(band_b_start, band_b_end),
        }
    }

    pub fn line_right(&self, band_b_start: Au, band_b_end: Au) -> Au {
        match self {
            ShapeInfo::RoundedBox(shape) => shape.line_right(band_b_start, band_b_end),
            ShapeInfo::Ellipse(shape) => shape.line_right(band_b_start, band_b_end),
            ShapeInfo::Polygon(shape) => shape.line_right(band_b_start, band_b_end),
            ShapeInfo::Image(shape) => shape.line_right(band_b_start, band_b_end),
        }
    }

    pub fn b_start(&self) -> Au {
        match self {
            ShapeInfo::RoundedBox(shape) => shape.b_start(),
            ShapeInfo::Ellipse(shape) => shape.b_start(),
            ShapeInfo::Polygon(shape) => shape.b_start(),
            ShapeInfo::Image(shape) => shape.b_start(),
        }
    }

    pub fn b_end(&self) -> Au {
        match self {
            ShapeInfo::RoundedBox(shape) => shape.b_end(),
            ShapeInfo::Ellipse(shape) => shape.b_end(),
            ShapeInfo::Polygon(shape) => shape.b_end(),
            ShapeInfo::Image(shape) => shape.b_end(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ShapeInfo::RoundedBox(shape) => shape.is_empty(),
            ShapeInfo::Ellipse(shape) => shape.is_empty(),
            ShapeInfo::Polygon(shape) => shape.is_empty(),
            ShapeInfo::Image(shape) => shape.is_empty(),
        }
    }

    /// Shifts the shape by the manager origin at insertion time.
    pub fn translate(&mut self, d_line_left: Au, d_block_start: Au) {
        match self {
            ShapeInfo::RoundedBox(shape) => shape.translate(d_line_left, d_block_start),
            ShapeInfo::Ellipse(shape) => shape.translate(d_line_left, d_block_start),
            ShapeInfo::Polygon(shape) => shape.translate(d_line_left, d_block_start),
            ShapeInfo::Image(shape) => shape.translate(d_line_left, d_block_start),
        }
    }
}

fn resolve_position(position: &ShapePosition, reference: &Rect<Au>) -> Point2D<Au> {
    Point2D::new(
        reference.origin.x + position.horizontal.resolve(reference.size.width),
        reference.origin.y + position.vertical.resolve(reference.size.height),
    )
}

/// `circle()` percentages resolve against the reference box's diagonal
/// divided by sqrt(2).
fn circle_basis(size: Size2D<Au>) -> Au {
    let width = f64::from(size.width.0);
    let height = f64::from(size.height.0);
    au_from_f64(((width * width + height * height) / 2.).sqrt())
}

fn side_distances(center: Point2D<Au>, rect: &Rect<Au>) -> [Au; 4] {
    [
        abs(center.x - rect.min_x()),
        abs(rect.max_x() - center.x),
        abs(center.y - rect.min_y()),
        abs(rect.max_y() - center.y),
    ]
}

/// Walks the margin rect inward to the requested reference box.
fn shape_box_rect<F: FloatFrame + ?Sized>(
    frame: &F,
    margin_rect: &LogicalRect<Au>,
    shape_box: ShapeBox,
    mode: WritingMode,
) -> LogicalRect<Au> {
    let rect = *margin_rect;
    if shape_box == ShapeBox::MarginBox {
        return rect;
    }
    let rect = rect.deflate(&frame.logical_used_margin(mode));
    if shape_box == ShapeBox::BorderBox {
        return rect;
    }
    let rect = rect.deflate(&frame.logical_used_border(mode));
    if shape_box == ShapeBox::PaddingBox {
        return rect;
    }
    rect.deflate(&frame.logical_used_padding(mode))
}
