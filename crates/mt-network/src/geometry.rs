//! Planar geometry helpers: headings, angle normalization, polyline arc
//! lengths, and the segment-intersection test used by the planar generator.

use mt_core::Point2;

/// Tolerance below which a cross product is treated as collinear.
pub const COLLINEAR_EPS: f64 = 1e-9;

/// Convert a km/h speed tag value to m/s.
#[inline]
pub fn kmh_to_mps(kmh: f64) -> f64 {
    kmh / 3.6
}

// ── Headings ──────────────────────────────────────────────────────────────────

/// Heading of the directed segment `a → b` in degrees, in (−180, 180].
/// 0° points along +x, 90° along +y.
#[inline]
pub fn heading_deg(a: Point2, b: Point2) -> f64 {
    (b.y - a.y).atan2(b.x - a.x).to_degrees()
}

/// Signed angular difference `to − from` normalized into (−180, 180].
///
/// Both inputs come from [`heading_deg`], so the raw difference lies in
/// (−360, 360) and a single ±360 correction suffices.
#[inline]
pub fn heading_diff_deg(from: f64, to: f64) -> f64 {
    let mut diff = to - from;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

// ── Polylines ─────────────────────────────────────────────────────────────────

/// Total arc length of a polyline in metres.
pub fn polyline_arc_length(points: &[Point2]) -> f64 {
    points
        .windows(2)
        .map(|w| w[0].distance(w[1]))
        .sum()
}

/// Cumulative arc length at every polyline vertex.
/// `result[0] == 0.0` and `result.last() == polyline_arc_length(points)`.
pub fn cumulative_arc_lengths(points: &[Point2]) -> Vec<f64> {
    let mut cum = Vec::with_capacity(points.len());
    let mut total = 0.0;
    cum.push(0.0);
    for w in points.windows(2) {
        total += w[0].distance(w[1]);
        cum.push(total);
    }
    cum
}

// ── Segment intersection (planar generator) ───────────────────────────────────

/// Orientation of the triple (a, b, c): 0 collinear (within
/// [`COLLINEAR_EPS`]), +1 counter-clockwise, −1 clockwise.
fn orientation(a: Point2, b: Point2, c: Point2) -> i8 {
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if cross.abs() <= COLLINEAR_EPS {
        0
    } else if cross > 0.0 {
        1
    } else {
        -1
    }
}

/// `true` if `c` (known collinear with `a → b`) lies within the segment's
/// bounding box.
fn on_segment(a: Point2, b: Point2, c: Point2) -> bool {
    c.x >= a.x.min(b.x)
        && c.x <= a.x.max(b.x)
        && c.y >= a.y.min(b.y)
        && c.y <= a.y.max(b.y)
}

/// Standard orientation + on-segment intersection test for the closed
/// segments `a1a2` and `b1b2`.  Touching counts as intersecting; callers
/// that allow shared endpoints must exclude those pairs before asking.
pub fn segments_intersect(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> bool {
    let o1 = orientation(a1, a2, b1);
    let o2 = orientation(a1, a2, b2);
    let o3 = orientation(b1, b2, a1);
    let o4 = orientation(b1, b2, a2);

    if o1 != o2 && o3 != o4 {
        return true;
    }

    // Collinear cases: an endpoint of one segment lying on the other.
    (o1 == 0 && on_segment(a1, a2, b1))
        || (o2 == 0 && on_segment(a1, a2, b2))
        || (o3 == 0 && on_segment(b1, b2, a1))
        || (o4 == 0 && on_segment(b1, b2, a2))
}
