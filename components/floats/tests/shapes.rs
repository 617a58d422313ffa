/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Geometry tests for the exclusion shapes.

use app_units::{Au, MAX_AU, MIN_AU};
use euclid::default::{Point2D, Rect, Size2D};
use floats::{
    AlphaMask, CornerRadii, EllipseShape, ImageShape, PolygonShape, RoundedBoxShape, ShapeInfo,
};
use geometry::WritingMode;
use quickcheck::{Arbitrary, Gen};

fn au(value: i32) -> Au {
    Au(value)
}

fn rect(x: i32, y: i32, w: i32, h: i32) -> Rect<Au> {
    Rect::new(Point2D::new(au(x), au(y)), Size2D::new(au(w), au(h)))
}

fn point(x: i32, y: i32) -> Point2D<Au> {
    Point2D::new(au(x), au(y))
}

// Rounded boxes

#[test]
fn test_plain_box_edges() {
    let shape = RoundedBoxShape::new(rect(10, 20, 100, 50), None);
    assert_eq!(shape.b_start(), au(20));
    assert_eq!(shape.b_end(), au(70));
    assert_eq!(shape.line_left(au(20), au(70)), au(10));
    assert_eq!(shape.line_right(au(20), au(70)), au(110));
    assert!(!shape.is_empty());
}

#[test]
fn test_rounded_box_corner_intrusion() {
    // A 100×100 box with 50-unit radii everywhere. A band ending 10 units
    // into the block-start corners meets the arcs 40 units from their
    // centers: intercept 50·√(1 − (40/50)²) = 30, intrusion 20.
    let radius = Size2D::new(au(50), au(50));
    let shape = RoundedBoxShape::new(
        rect(0, 0, 100, 100),
        Some(CornerRadii {
            line_left_b_start: radius,
            line_right_b_start: radius,
            line_left_b_end: radius,
            line_right_b_end: radius,
        }),
    );
    assert_eq!(shape.line_left(au(0), au(10)), au(20));
    assert_eq!(shape.line_right(au(0), au(10)), au(80));

    // Symmetric at the block-end corners.
    assert_eq!(shape.line_left(au(90), au(100)), au(20));
    assert_eq!(shape.line_right(au(90), au(100)), au(80));

    // A band across the straight middle sees the full box.
    assert_eq!(shape.line_left(au(40), au(60)), au(0));
    assert_eq!(shape.line_right(au(40), au(60)), au(100));

    // So does a band spanning both corners: the quarter arcs stay inside.
    assert_eq!(shape.line_left(au(0), au(100)), au(0));
    assert_eq!(shape.line_right(au(0), au(100)), au(100));
}

#[test]
fn test_empty_box() {
    assert!(RoundedBoxShape::new(rect(0, 0, 0, 100), None).is_empty());
    assert!(RoundedBoxShape::new(rect(0, 0, 100, 0), None).is_empty());
}

// Ellipses

#[test]
fn test_ellipse_extent() {
    let shape = EllipseShape::new(point(100, 100), Size2D::new(au(50), au(40)));
    assert_eq!(shape.b_start(), au(60));
    assert_eq!(shape.b_end(), au(140));
    // Across the center line the full inline diameter applies.
    assert_eq!(shape.line_left(au(90), au(110)), au(50));
    assert_eq!(shape.line_right(au(90), au(110)), au(150));
}

#[test]
fn test_ellipse_band_intercepts() {
    let shape = EllipseShape::new(point(100, 100), Size2D::new(au(50), au(40)));
    // Band [60, 70]: 30 units above center, intercept 50·√(1 − (30/40)²) ≈ 33.
    assert_eq!(shape.line_left(au(60), au(70)), au(67));
    assert_eq!(shape.line_right(au(60), au(70)), au(133));
    // Mirrored below the center.
    assert_eq!(shape.line_left(au(130), au(140)), au(67));
    assert_eq!(shape.line_right(au(130), au(140)), au(133));
}

#[test]
fn test_degenerate_ellipse_is_empty() {
    assert!(EllipseShape::new(point(0, 0), Size2D::new(au(0), au(40))).is_empty());
    assert!(EllipseShape::new(point(0, 0), Size2D::new(au(40), au(0))).is_empty());
    assert!(!EllipseShape::new(point(0, 0), Size2D::new(au(1), au(1))).is_empty());
}

// Polygons

#[test]
fn test_triangle_hypotenuse() {
    let shape = PolygonShape::new(vec![point(0, 0), point(200, 0), point(0, 200)]);
    assert!(!shape.is_empty());
    assert_eq!(shape.b_start(), au(0));
    assert_eq!(shape.b_end(), au(200));
    // The hypotenuse runs x = 200 − y; the rightmost point of a band is at
    // its block-start edge.
    assert_eq!(shape.line_right(au(150), au(160)), au(50));
    assert_eq!(shape.line_left(au(150), au(160)), au(0));
}

#[test]
fn test_rectangle_polygon() {
    let shape = PolygonShape::new(vec![
        point(10, 10),
        point(110, 10),
        point(110, 60),
        point(10, 60),
    ]);
    assert_eq!(shape.line_left(au(20), au(30)), au(10));
    assert_eq!(shape.line_right(au(20), au(30)), au(110));
    // Band straddling the top edge clamps at the vertices.
    assert_eq!(shape.line_left(au(0), au(20)), au(10));
    assert_eq!(shape.line_right(au(0), au(20)), au(110));
}

#[test]
fn test_degenerate_polygons_are_empty() {
    assert!(PolygonShape::new(vec![]).is_empty());
    assert!(PolygonShape::new(vec![point(0, 0)]).is_empty());
    assert!(PolygonShape::new(vec![point(0, 0), point(10, 10)]).is_empty());
    // Collinear vertices enclose no area.
    assert!(PolygonShape::new(vec![point(0, 0), point(10, 10), point(20, 20)]).is_empty());
    assert!(!PolygonShape::new(vec![point(0, 0), point(10, 10), point(20, 0)]).is_empty());
}

#[derive(Clone, Debug)]
struct SmallPoint(i32, i32);

impl Arbitrary for SmallPoint {
    fn arbitrary(generator: &mut Gen) -> SmallPoint {
        SmallPoint(
            (u32::arbitrary(generator) % 500) as i32,
            (u32::arbitrary(generator) % 500) as i32,
        )
    }
}

// Collinearity classification is order-independent for the degenerate cases
// quickcheck can build: any polygon on a single line is empty.
#[test]
fn test_collinear_polygons_are_empty() {
    let f: fn(Vec<SmallPoint>, u32, u32) = check;
    quickcheck::quickcheck(f);
    fn check(scales: Vec<SmallPoint>, dx: u32, dy: u32) {
        let (dx, dy) = ((dx % 20) as i32, (dy % 20) as i32);
        let vertices: Vec<_> = scales
            .iter()
            .map(|p| point(p.0 % 50 * dx, p.0 % 50 * dy))
            .collect();
        assert!(PolygonShape::new(vertices).is_empty());
    }
}

// For any band overlapping a non-empty polygon, line-left never exceeds
// line-right.
#[test]
fn test_polygon_edges_are_ordered() {
    let f: fn(Vec<SmallPoint>, u32, u32) = check;
    quickcheck::quickcheck(f);
    fn check(points: Vec<SmallPoint>, band_start: u32, band_size: u32) {
        let vertices: Vec<_> = points.iter().map(|p| point(p.0, p.1)).collect();
        let shape = PolygonShape::new(vertices);
        if shape.is_empty() {
            return;
        }
        let band_start = au((band_start % 600) as i32);
        let band_end = band_start + au((band_size % 100) as i32 + 1);
        if band_end <= shape.b_start() || band_start >= shape.b_end() {
            return;
        }
        assert!(shape.line_left(band_start, band_end) <= shape.line_right(band_start, band_end));
    }
}

// Image shapes

#[test]
fn test_image_interval_lookup() {
    let shape = ImageShape::new(vec![
        rect(10, 0, 30, 1),
        rect(5, 1, 40, 1),
        rect(20, 3, 10, 1),
    ]);
    assert_eq!(shape.b_start(), au(0));
    assert_eq!(shape.b_end(), au(4));
    // Band over the first two rows.
    assert_eq!(shape.line_left(au(0), au(2)), au(5));
    assert_eq!(shape.line_right(au(0), au(2)), au(45));
    // Band over the gap row only: nothing overlaps, so the identity values
    // come back and the margin-box clamp swallows them.
    assert_eq!(shape.line_left(au(2), au(3)), MAX_AU);
    assert_eq!(shape.line_right(au(2), au(3)), MIN_AU);
    // Band over the last row.
    assert_eq!(shape.line_left(au(3), au(4)), au(20));
    assert_eq!(shape.line_right(au(3), au(4)), au(30));
}

fn checkerboard_mask() -> AlphaMask {
    // 4×4, with the top-left and bottom-right 2×2 quadrants opaque.
    let mut bytes = vec![0u8; 16];
    for y in 0..4usize {
        for x in 0..4usize {
            if (x < 2) == (y < 2) {
                bytes[y * 4 + x] = 0xff;
            }
        }
    }
    AlphaMask::new(bytes, 4, Size2D::new(4, 4))
}

#[test]
fn test_image_from_alpha_mask_horizontal() {
    let shape = ImageShape::from_alpha_mask(
        &checkerboard_mask(),
        0.5,
        10,
        rect(100, 200, 40, 40),
        WritingMode::horizontal_tb(),
    );
    let intervals = shape.intervals();
    assert_eq!(intervals.len(), 4);
    // Top two rows span the left half, bottom two the right half.
    assert_eq!(intervals[0], rect(100, 200, 20, 10));
    assert_eq!(intervals[1], rect(100, 210, 20, 10));
    assert_eq!(intervals[2], rect(120, 220, 20, 10));
    assert_eq!(intervals[3], rect(120, 230, 20, 10));
}

#[test]
fn test_image_from_alpha_mask_threshold() {
    let mut bytes = vec![0u8; 4];
    bytes[1] = 100;
    bytes[2] = 200;
    let mask = AlphaMask::new(bytes, 4, Size2D::new(4, 1));
    // Threshold 0.5 scales to 127; only the 200-alpha pixel survives.
    let shape = ImageShape::from_alpha_mask(
        &mask,
        0.5,
        1,
        rect(0, 0, 4, 1),
        WritingMode::horizontal_tb(),
    );
    assert_eq!(shape.intervals(), &[rect(2, 0, 1, 1)]);
    // Threshold 1.0 admits nothing.
    let shape = ImageShape::from_alpha_mask(
        &mask,
        1.,
        1,
        rect(0, 0, 4, 1),
        WritingMode::horizontal_tb(),
    );
    assert!(shape.is_empty());
}

#[test]
fn test_image_from_alpha_mask_vertical_rl() {
    // Under vertical-rl the block axis runs right-to-left along mask
    // columns, and intervals still come out ascending on the block axis.
    let shape = ImageShape::from_alpha_mask(
        &checkerboard_mask(),
        0.5,
        10,
        rect(0, 0, 40, 40),
        WritingMode::vertical_rl(),
    );
    let intervals = shape.intervals();
    assert_eq!(intervals.len(), 4);
    assert!(intervals
        .windows(2)
        .all(|pair| pair[0].origin.y <= pair[1].origin.y));
    // The rightmost columns (block-start) hold the bottom-right quadrant,
    // whose rows sit at the line-right half (physical bottom).
    assert_eq!(intervals[0], rect(20, 0, 20, 10));
    assert_eq!(intervals[3], rect(0, 30, 20, 10));
}

#[test]
fn test_image_from_alpha_mask_sideways_lr() {
    // Under sideways-lr the block axis runs left-to-right and line-left is
    // the physical bottom.
    let shape = ImageShape::from_alpha_mask(
        &checkerboard_mask(),
        0.5,
        10,
        rect(0, 0, 40, 40),
        WritingMode::sideways_lr(),
    );
    let intervals = shape.intervals();
    assert_eq!(intervals.len(), 4);
    // The leftmost column (block-start) holds the top-left quadrant, whose
    // rows 0..2 are measured from the physical bottom: offset 40 − 20 = 20.
    assert_eq!(intervals[0], rect(20, 0, 20, 10));
    assert_eq!(intervals[3], rect(0, 30, 20, 10));
}

// Uniform dispatch through ShapeInfo

#[test]
fn test_shape_info_dispatch_and_translate() {
    let mut shape = ShapeInfo::Polygon(PolygonShape::new(vec![
        point(0, 0),
        point(100, 0),
        point(0, 100),
    ]));
    assert_eq!(shape.b_start(), au(0));
    assert_eq!(shape.b_end(), au(100));
    shape.translate(au(10), au(20));
    assert_eq!(shape.b_start(), au(20));
    assert_eq!(shape.b_end(), au(120));
    assert_eq!(shape.line_left(au(20), au(120)), au(10));

    let mut shape = ShapeInfo::Ellipse(EllipseShape::new(point(50, 50), Size2D::new(au(10), au(10))));
    shape.translate(au(0), au(50));
    assert_eq!(shape.b_start(), au(90));
    assert_eq!(shape.b_end(), au(110));
    assert!(!shape.is_empty());
}
