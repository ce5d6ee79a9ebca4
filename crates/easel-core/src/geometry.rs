//! Basic geometric types used across the canvas engine.
//!
//! Positions follow the scene-graph convention: a shape's position is its
//! top-left corner, and rotation angles are expressed in radians.

/// A point or offset in canvas coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Rotates this point by `angle` radians around `origin`.
    pub fn rotate_around(self, origin: Point, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - origin.x;
        let dy = self.y - origin.y;

        Self {
            x: dx.mul_add(cos, -dy * sin) + origin.x,
            y: dx.mul_add(sin, dy * cos) + origin.y,
        }
    }

    /// Builds the bounds of a box whose top-left corner is this point.
    pub fn to_bounds(self, size: Size) -> Bounds {
        Bounds::new_from_top_left(self, size)
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Returns true if this size fits strictly inside `container` on both axes.
    pub fn fits_within(self, container: Size) -> bool {
        self.width < container.width && self.height < container.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates bounds from a top-left corner and a size.
    pub fn new_from_top_left(top_left: Point, size: Size) -> Self {
        Self {
            min_x: top_left.x,
            min_y: top_left.y,
            max_x: top_left.x + size.width,
            max_y: top_left.y + size.height,
        }
    }

    /// Returns the smallest bounds containing every item, or `None` when empty.
    pub fn union<I>(items: I) -> Option<Self>
    where
        I: IntoIterator<Item = Bounds>,
    {
        items
            .into_iter()
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    /// Returns the minimum x-coordinate of the bounds
    pub fn min_x(self) -> f32 {
        self.min_x
    }

    /// Returns the minimum y-coordinate of the bounds
    pub fn min_y(self) -> f32 {
        self.min_y
    }

    /// Returns the maximum x-coordinate of the bounds
    pub fn max_x(self) -> f32 {
        self.max_x
    }

    /// Returns the maximum y-coordinate of the bounds
    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the top-left corner as a Point
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    /// Returns the center of the bounds
    pub fn center(self) -> Point {
        Point {
            x: self.min_x + self.width() / 2.0,
            y: self.min_y + self.height() / 2.0,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, PI};

    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_new() {
        let point = Point::new(3.5, 4.2);
        assert_eq!(point.x(), 3.5);
        assert_eq!(point.y(), 4.2);
    }

    #[test]
    fn test_point_default() {
        let point = Point::default();
        assert!(point.is_zero());
    }

    #[test]
    fn test_point_add_sub() {
        let p1 = Point::new(5.0, 8.0);
        let p2 = Point::new(2.0, 3.0);
        assert_eq!(p1.add_point(p2), Point::new(7.0, 11.0));
        assert_eq!(p1.sub_point(p2), Point::new(3.0, 5.0));
    }

    #[test]
    fn test_point_midpoint() {
        let midpoint = Point::new(0.0, 0.0).midpoint(Point::new(4.0, 6.0));
        assert_eq!(midpoint, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_point_hypot() {
        assert_eq!(Point::new(3.0, 4.0).hypot(), 5.0);
    }

    #[test]
    fn test_rotate_quarter_turn_around_origin() {
        let rotated = Point::new(10.0, 0.0).rotate_around(Point::default(), FRAC_PI_2);

        assert_approx_eq!(f32, rotated.x(), 0.0, epsilon = 1e-4);
        assert_approx_eq!(f32, rotated.y(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotate_half_turn_around_point() {
        let origin = Point::new(-5.0, -5.0);
        let rotated = Point::new(5.0, -5.0).rotate_around(origin, PI);

        assert_approx_eq!(f32, rotated.x(), -15.0, epsilon = 1e-4);
        assert_approx_eq!(f32, rotated.y(), -5.0, epsilon = 1e-4);
    }

    #[test]
    fn test_size_fits_within() {
        let container = Size::new(800.0, 600.0);
        assert!(Size::new(100.0, 100.0).fits_within(container));
        assert!(!Size::new(1600.0, 100.0).fits_within(container));
        assert!(!Size::new(800.0, 100.0).fits_within(container));
    }

    #[test]
    fn test_bounds_from_top_left() {
        let bounds = Point::new(10.0, 20.0).to_bounds(Size::new(30.0, 40.0));

        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 40.0);
        assert_eq!(bounds.max_y(), 60.0);
        assert_eq!(bounds.center(), Point::new(25.0, 40.0));
        assert_eq!(bounds.to_size(), Size::new(30.0, 40.0));
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        let b = Bounds::new_from_top_left(Point::new(20.0, -5.0), Size::new(10.0, 10.0));

        let union = Bounds::union([a, b]).expect("two bounds");
        assert_eq!(union.min_point(), Point::new(0.0, -5.0));
        assert_eq!(union.to_size(), Size::new(30.0, 15.0));

        assert!(Bounds::union(Vec::new()).is_none());
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::new_from_top_left(Point::new(1.0, 2.0), Size::new(3.0, 4.0))
            .translate(Point::new(10.0, 10.0));
        assert_eq!(bounds.min_point(), Point::new(11.0, 12.0));
    }
}

#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    /// Rotation keeps the distance to the rotation origin.
    fn check_rotation_preserves_distance(
        point: Point,
        origin: Point,
        angle: f32,
    ) -> Result<(), TestCaseError> {
        let before = point.sub_point(origin).hypot();
        let after = point.rotate_around(origin, angle).sub_point(origin).hypot();

        prop_assert!(
            approx_eq!(f32, before, after, epsilon = 0.05),
            "distance changed from {before} to {after}"
        );
        Ok(())
    }

    proptest! {
        #[test]
        fn rotation_preserves_distance(
            point in point_strategy(),
            origin in point_strategy(),
            angle in -6.3f32..6.3,
        ) {
            check_rotation_preserves_distance(point, origin, angle)?;
        }
    }
}
