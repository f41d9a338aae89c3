pub mod bounding_box;
pub mod intersect_2d;

/// 2D point type. UV coordinates are stored as `(x, y) = (u, v)`.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance, in UV units.
///
/// UV layouts live in `[0, N]` for small `N`, so an absolute distance works
/// for every predicate in the crate. Floating-point values are never compared
/// for equality directly.
pub const TOLERANCE: f64 = 1e-9;

/// Lexicographic `(x, y)` ordering with tolerance: points closer than
/// [`TOLERANCE`] on an axis compare equal on that axis.
#[must_use]
pub fn cmp_points(a: &Point2, b: &Point2) -> std::cmp::Ordering {
    cmp_scalar(a.x, b.x).then_with(|| cmp_scalar(a.y, b.y))
}

/// Exact lexicographic `(x, y)` ordering.
///
/// Unlike [`cmp_points`] this is a total order, so it is safe for heaps and
/// sorts. `-0.0` and `0.0` compare equal.
#[must_use]
pub fn lex_cmp(a: &Point2, b: &Point2) -> std::cmp::Ordering {
    (a.x + 0.0)
        .total_cmp(&(b.x + 0.0))
        .then_with(|| (a.y + 0.0).total_cmp(&(b.y + 0.0)))
}

/// Compares two scalars, treating values within [`TOLERANCE`] as equal.
#[must_use]
pub fn cmp_scalar(a: f64, b: f64) -> std::cmp::Ordering {
    if (a - b).abs() <= TOLERANCE {
        std::cmp::Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use super::*;

    #[test]
    fn points_within_tolerance_are_equal() {
        let a = Point2::new(0.5, 0.5);
        let b = Point2::new(0.5 + TOLERANCE * 0.1, 0.5);
        assert_eq!(cmp_points(&a, &b), Ordering::Equal);
    }

    #[test]
    fn points_order_by_x_then_y() {
        let a = Point2::new(0.0, 1.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 2.0);
        assert_eq!(cmp_points(&a, &b), Ordering::Less);
        assert_eq!(cmp_points(&a, &c), Ordering::Less);
        assert_eq!(cmp_points(&b, &c), Ordering::Greater);
    }

    #[test]
    fn exact_order_is_transitive_near_tolerance() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(0.6 * TOLERANCE, 0.0);
        let c = Point2::new(1.2 * TOLERANCE, 0.0);
        assert_eq!(cmp_points(&a, &b), Ordering::Equal);
        assert_eq!(cmp_points(&b, &c), Ordering::Equal);
        assert_eq!(cmp_points(&a, &c), Ordering::Less);

        assert_eq!(lex_cmp(&a, &b), Ordering::Less);
        assert_eq!(lex_cmp(&b, &c), Ordering::Less);
        assert_eq!(lex_cmp(&a, &c), Ordering::Less);
        assert_eq!(lex_cmp(&Point2::new(-0.0, 1.0), &Point2::new(0.0, 1.0)), Ordering::Equal);
    }
}
