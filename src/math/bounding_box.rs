use super::{Point2, TOLERANCE};

/// An axis-aligned bounding box in UV space.
///
/// Built once from a set of points and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb2 {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Aabb2 {
    /// Builds the tightest box around `points`, ignoring non-finite coordinates.
    ///
    /// Returns `None` if no finite point is given.
    #[must_use]
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point2>,
    {
        let mut bbox: Option<Self> = None;
        for p in points {
            if !(p.x.is_finite() && p.y.is_finite()) {
                continue;
            }
            bbox = Some(match bbox {
                None => Self {
                    left: p.x,
                    right: p.x,
                    bottom: p.y,
                    top: p.y,
                },
                Some(b) => Self {
                    left: b.left.min(p.x),
                    right: b.right.max(p.x),
                    bottom: b.bottom.min(p.y),
                    top: b.top.max(p.y),
                },
            });
        }
        bbox
    }

    /// Returns `true` if the two boxes share any area or boundary.
    ///
    /// Boxes that merely touch are still reported: the exact sweep decides
    /// whether touching geometry actually overlaps.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left <= other.right + TOLERANCE
            && other.left <= self.right + TOLERANCE
            && self.bottom <= other.top + TOLERANCE
            && other.bottom <= self.top + TOLERANCE
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Free-function form of [`Aabb2::overlaps`].
#[must_use]
pub fn aabb_overlap(a: &Aabb2, b: &Aabb2) -> bool {
    a.overlaps(b)
}
