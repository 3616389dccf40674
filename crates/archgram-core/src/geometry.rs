//! Geometric primitives for diagram layout and positioning.
//!
//! - [`Point`] - A 2D coordinate in diagram space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - An axis-aligned rectangle defined by its min and max corners
//! - [`Insets`] - Padding values for four sides
//!
//! # Coordinate System
//!
//! Archgram uses the SVG coordinate system:
//!
//! ```text
//!   (0,0) ────────► +X
//!     │
//!     │
//!     ▼
//!    +Y
//! ```

/// A 2D point in diagram coordinate space.
///
/// # Examples
///
/// ```
/// # use archgram_core::geometry::Point;
/// let a = Point::new(10.0, 20.0);
/// let b = Point::new(30.0, 40.0);
///
/// let mid = a.midpoint(b);
/// assert_eq!(mid.x(), 20.0);
/// assert_eq!(mid.y(), 30.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a copy with the given x-coordinate.
    pub fn with_x(mut self, x: f32) -> Self {
        self.x = x;
        self
    }

    /// Returns a copy with the given y-coordinate.
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean distance from the origin.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Treats this point as the center of a rectangle of `size`.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_center(self, size)
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum of two sizes.
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Grows the size by the horizontal and vertical sums of `insets`.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Stacks `other` below this size.
    pub fn merge_vertical(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height + other.height,
        }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    pub fn new_from_center(center: Point, size: Size) -> Self {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    pub fn center(self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Top-left corner.
    pub fn min_point(self) -> Point {
        Point::new(self.min_x, self.min_y)
    }

    pub fn to_size(self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// Moves the bounds by `offset` without changing the size.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows the bounds outward by `insets`.
    pub fn add_padding(&self, insets: Insets) -> Self {
        Self {
            min_x: self.min_x - insets.left,
            min_y: self.min_y - insets.top,
            max_x: self.max_x + insets.right,
            max_y: self.max_y + insets.bottom,
        }
    }

    /// Whether `point` lies inside or on the border of the bounds.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Point where the ray from the center towards `target` leaves the bounds.
    ///
    /// Edges are clipped with this so arrows start and end on an icon border
    /// instead of its center. When `target` coincides with the center the
    /// center is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// # use archgram_core::geometry::{Bounds, Point, Size};
    /// let icon = Point::new(0.0, 0.0).to_bounds(Size::new(40.0, 20.0));
    /// let exit = icon.boundary_point_towards(Point::new(100.0, 0.0));
    /// assert_eq!(exit, Point::new(20.0, 0.0));
    /// ```
    pub fn boundary_point_towards(&self, target: Point) -> Point {
        let center = self.center();
        let delta = target.sub_point(center);
        if delta.hypot() < 0.001 {
            return center;
        }

        let half_width = self.width() / 2.0;
        let half_height = self.height() / 2.0;
        let scale_x = if delta.x.abs() > f32::EPSILON {
            half_width / delta.x.abs()
        } else {
            f32::INFINITY
        };
        let scale_y = if delta.y.abs() > f32::EPSILON {
            half_height / delta.y.abs()
        } else {
            f32::INFINITY
        };
        let scale = scale_x.min(scale_y);

        Point::new(
            delta.x.mul_add(scale, center.x),
            delta.y.mul_add(scale, center.y),
        )
    }
}

/// Spacing around an element, one value per side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Same value on all four sides.
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns a copy with a different top inset.
    pub fn with_top(self, top: f32) -> Self {
        Self { top, ..self }
    }

    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let a = Point::new(3.0, 4.0);
        let b = Point::new(1.0, 2.0);

        assert_eq!(a.add_point(b), Point::new(4.0, 6.0));
        assert_eq!(a.sub_point(b), Point::new(2.0, 2.0));
        assert_approx_eq!(f32, a.hypot(), 5.0);
        assert_eq!(a.with_x(9.0), Point::new(9.0, 4.0));
        assert_eq!(a.with_y(9.0), Point::new(3.0, 9.0));
    }

    #[test]
    fn test_size_padding_and_stacking() {
        let size = Size::new(100.0, 40.0).add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_approx_eq!(f32, size.width(), 106.0);
        assert_approx_eq!(f32, size.height(), 44.0);

        let stacked = Size::new(80.0, 64.0).merge_vertical(Size::new(120.0, 18.0));
        assert_approx_eq!(f32, stacked.width(), 120.0);
        assert_approx_eq!(f32, stacked.height(), 82.0);
    }

    #[test]
    fn test_bounds_from_center() {
        let bounds = Point::new(50.0, 50.0).to_bounds(Size::new(20.0, 10.0));

        assert_approx_eq!(f32, bounds.min_x(), 40.0);
        assert_approx_eq!(f32, bounds.min_y(), 45.0);
        assert_approx_eq!(f32, bounds.max_x(), 60.0);
        assert_approx_eq!(f32, bounds.max_y(), 55.0);
        assert_eq!(bounds.center(), Point::new(50.0, 50.0));
    }

    #[test]
    fn test_bounds_translate_keeps_size() {
        let bounds = Bounds::new_from_top_left(Point::new(10.0, 20.0), Size::new(50.0, 30.0));
        let moved = bounds.translate(Point::new(100.0, 50.0));

        assert_eq!(moved.min_point(), Point::new(110.0, 70.0));
        assert_eq!(moved.to_size(), bounds.to_size());
    }

    #[test]
    fn test_bounds_add_padding_and_contains() {
        let bounds = Bounds::new_from_top_left(Point::default(), Size::new(10.0, 10.0))
            .add_padding(Insets::uniform(5.0));

        assert!(bounds.contains(Point::new(-5.0, -5.0)));
        assert!(bounds.contains(Point::new(15.0, 15.0)));
        assert!(!bounds.contains(Point::new(16.0, 0.0)));
    }

    #[test]
    fn test_boundary_point_vertical_and_diagonal() {
        let bounds = Point::new(0.0, 0.0).to_bounds(Size::new(40.0, 20.0));

        let below = bounds.boundary_point_towards(Point::new(0.0, 100.0));
        assert_approx_eq!(f32, below.x(), 0.0);
        assert_approx_eq!(f32, below.y(), 10.0);

        let diagonal = bounds.boundary_point_towards(Point::new(100.0, 100.0));
        assert_approx_eq!(f32, diagonal.x(), 10.0);
        assert_approx_eq!(f32, diagonal.y(), 10.0);
    }

    #[test]
    fn test_boundary_point_degenerate_target() {
        let bounds = Point::new(5.0, 5.0).to_bounds(Size::new(10.0, 10.0));
        assert_eq!(
            bounds.boundary_point_towards(Point::new(5.0, 5.0)),
            Point::new(5.0, 5.0)
        );
    }

    proptest! {
        #[test]
        fn boundary_point_lies_on_border(
            cx in -500.0f32..500.0,
            cy in -500.0f32..500.0,
            width in 1.0f32..300.0,
            height in 1.0f32..300.0,
            tx in -1000.0f32..1000.0,
            ty in -1000.0f32..1000.0,
        ) {
            let bounds = Point::new(cx, cy).to_bounds(Size::new(width, height));
            let target = Point::new(tx, ty);
            prop_assume!(target.sub_point(bounds.center()).hypot() > 0.01);

            let exit = bounds.boundary_point_towards(target);
            let tolerance = 0.01 * (1.0 + width.max(height));
            let on_vertical_side = (exit.x() - bounds.min_x()).abs() < tolerance
                || (exit.x() - bounds.max_x()).abs() < tolerance;
            let on_horizontal_side = (exit.y() - bounds.min_y()).abs() < tolerance
                || (exit.y() - bounds.max_y()).abs() < tolerance;

            prop_assert!(on_vertical_side || on_horizontal_side);
            prop_assert!(bounds.add_padding(Insets::uniform(tolerance)).contains(exit));
        }
    }
}
