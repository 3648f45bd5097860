//! Minimum-area enclosing rectangle for small point sets.
//!
//! An annotation line supplies four corner points in arbitrary order, possibly
//! non-convex or degenerate. The importer normalizes them to the smallest
//! rectangle (of any orientation) enclosing all of them, via rotating calipers
//! over the convex hull.
//!
//! # Angle convention
//!
//! [`RotatedRect::angle`] is in degrees in `[0, 90)`: the counter-clockwise
//! rotation, from the positive x axis, of the rectangle edge reported as
//! `w`. An axis-aligned rectangle therefore has angle 0 with `w` along x and
//! `h` along y. Golden-value tests below pin this convention.

use serde::Serialize;

/// A point in pixel space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle of arbitrary orientation: center, extents, rotation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RotatedRect {
    pub cx: f64,
    pub cy: f64,
    pub w: f64,
    pub h: f64,
    /// Degrees in `[0, 90)`, see the module docs.
    pub angle: f64,
}

/// Computes the convex hull of `points` with Andrew's monotone chain.
///
/// Returns the hull in counter-clockwise order without repeating the first
/// point. Collinear points are dropped, so a degenerate input collapses to
/// two points (a segment) or one (all coincident).
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    let mut sorted: Vec<Point> = points.to_vec();
    sorted.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    sorted.dedup_by(|a, b| a.x == b.x && a.y == b.y);

    if sorted.len() <= 2 {
        return sorted;
    }

    fn cross(o: Point, a: Point, b: Point) -> f64 {
        (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
    }

    let mut hull: Vec<Point> = Vec::with_capacity(sorted.len() * 2);
    for &p in &sorted {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }

    let lower_len = hull.len() + 1;
    for &p in sorted.iter().rev().skip(1) {
        while hull.len() >= lower_len
            && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();

    // A fully collinear input collapses to its two endpoints.
    if hull.len() < 2 {
        return vec![sorted[0], sorted[sorted.len() - 1]];
    }

    hull
}

/// Computes the minimum-area rectangle enclosing `points`.
///
/// One rectangle side is always flush with a convex-hull edge, so it is
/// enough to test each hull edge as a candidate orientation. Degenerate
/// inputs (collinear or coincident points) yield a rectangle with zero
/// extent along the degenerate axis.
pub fn min_area_rect(points: &[Point]) -> RotatedRect {
    let hull = convex_hull(points);

    match hull.len() {
        0 => {
            return RotatedRect {
                cx: 0.0,
                cy: 0.0,
                w: 0.0,
                h: 0.0,
                angle: 0.0,
            }
        }
        1 => {
            return RotatedRect {
                cx: hull[0].x,
                cy: hull[0].y,
                w: 0.0,
                h: 0.0,
                angle: 0.0,
            }
        }
        _ => {}
    }

    let mut best: Option<(f64, f64, f64)> = None; // (area, ux, uy)
    for i in 0..hull.len() {
        let a = hull[i];
        let b = hull[(i + 1) % hull.len()];
        let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
        if len == 0.0 {
            continue;
        }
        let ux = (b.x - a.x) / len;
        let uy = (b.y - a.y) / len;

        let (min_u, max_u, min_v, max_v) = extents_along(&hull, ux, uy);
        let area = (max_u - min_u) * (max_v - min_v);
        if best.map_or(true, |(best_area, _, _)| area < best_area) {
            best = Some((area, ux, uy));
        }
    }

    let Some((_, ux, uy)) = best else {
        // Two coincident hull points, already ruled out by dedup above.
        return RotatedRect {
            cx: hull[0].x,
            cy: hull[0].y,
            w: 0.0,
            h: 0.0,
            angle: 0.0,
        };
    };

    let (min_u, max_u, min_v, max_v) = extents_along(&hull, ux, uy);
    let mid_u = (min_u + max_u) / 2.0;
    let mid_v = (min_v + max_v) / 2.0;

    let mut w = max_u - min_u;
    let mut h = max_v - min_v;
    let mut angle = uy.atan2(ux).to_degrees().rem_euclid(180.0);
    if angle >= 90.0 {
        // Rotating the reported frame back by 90 degrees swaps the extents.
        angle -= 90.0;
        std::mem::swap(&mut w, &mut h);
    }

    RotatedRect {
        cx: mid_u * ux - mid_v * uy,
        cy: mid_u * uy + mid_v * ux,
        w,
        h,
        angle,
    }
}

/// Projects `hull` onto the frame spanned by `(ux, uy)` and its
/// counter-clockwise perpendicular, returning (min_u, max_u, min_v, max_v).
fn extents_along(hull: &[Point], ux: f64, uy: f64) -> (f64, f64, f64, f64) {
    let mut min_u = f64::INFINITY;
    let mut max_u = f64::NEG_INFINITY;
    let mut min_v = f64::INFINITY;
    let mut max_v = f64::NEG_INFINITY;

    for p in hull {
        let u = p.x * ux + p.y * uy;
        let v = -p.x * uy + p.y * ux;
        min_u = min_u.min(u);
        max_u = max_u.max(u);
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }

    (min_u, max_u, min_v, max_v)
}
