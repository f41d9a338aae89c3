use super::{Point2, TOLERANCE};

/// Result of classifying two segments against each other.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentIntersection {
    /// The segments are disjoint, or only touch at an endpoint.
    None,
    /// The segments cross transversally at a point interior to both.
    Point(Point2),
    /// The segments are collinear and share a stretch of positive length.
    /// Carries the lexicographically smallest point of the shared stretch.
    Collinear(Point2),
}

impl SegmentIntersection {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The reported point, if any.
    #[must_use]
    pub fn point(&self) -> Option<Point2> {
        match *self {
            Self::None => None,
            Self::Point(p) | Self::Collinear(p) => Some(p),
        }
    }
}

/// Signed distance of `c` from the directed line `a → b`.
///
/// Positive when `c` lies to the left. Returns `0.0` for a degenerate line.
#[must_use]
pub fn signed_distance(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    let ab = b - a;
    let len = ab.norm();
    if len < TOLERANCE {
        return 0.0;
    }
    ab.perp(&(c - a)) / len
}

/// Orientation of `c` relative to `a → b`: `1` left, `-1` right, `0` on the line.
#[must_use]
pub fn orientation(a: &Point2, b: &Point2, c: &Point2) -> i8 {
    let d = signed_distance(a, b, c);
    if d > TOLERANCE {
        1
    } else if d < -TOLERANCE {
        -1
    } else {
        0
    }
}

/// Classifies segment `a0 → a1` against segment `b0 → b1`.
///
/// Only transversal crossings strictly inside both segments and collinear
/// stretches of positive length are reported. Touching at an endpoint, an
/// endpoint resting on the other segment, and zero-length segments all give
/// [`SegmentIntersection::None`].
#[must_use]
pub fn segment_segment_intersect_2d(
    a0: &Point2,
    a1: &Point2,
    b0: &Point2,
    b1: &Point2,
) -> SegmentIntersection {
    let da = a1 - a0;
    let db = b1 - b0;
    if da.norm() < TOLERANCE || db.norm() < TOLERANCE {
        return SegmentIntersection::None;
    }

    let o1 = orientation(a0, a1, b0);
    let o2 = orientation(a0, a1, b1);

    if o1 == 0 && o2 == 0 {
        return collinear_overlap(a0, a1, b0, b1);
    }

    let o3 = orientation(b0, b1, a0);
    let o4 = orientation(b0, b1, a1);
    if o1 * o2 >= 0 || o3 * o4 >= 0 {
        return SegmentIntersection::None;
    }

    let denom = da.perp(&db);
    if denom.abs() < TOLERANCE * TOLERANCE {
        return SegmentIntersection::None;
    }
    let t = (b0 - a0).perp(&db) / denom;
    SegmentIntersection::Point(a0 + da * t)
}

/// Shared stretch of two segments already known to lie on one line.
fn collinear_overlap(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> SegmentIntersection {
    let da = a1 - a0;
    let len = da.norm();
    let dir = da / len;

    // Positions along `a`, measured from `a0` in UV units.
    let tb0 = (b0 - a0).dot(&dir);
    let tb1 = (b1 - a0).dot(&dir);
    let lo = tb0.min(tb1).max(0.0);
    let hi = tb0.max(tb1).min(len);
    if hi - lo <= TOLERANCE {
        return SegmentIntersection::None;
    }

    let p = a0 + dir * lo;
    let q = a0 + dir * hi;
    let start = if super::cmp_points(&p, &q).is_le() { p } else { q };
    SegmentIntersection::Collinear(start)
}
