//! Geometry primitives for frames and hit testing.

/// A point in pixels. Coordinates are signed so that translation into a
/// child's local space can go negative.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Point {
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

impl Point {
    /// Construct a point.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// A rectangle with a signed origin, expressed relative to the parent node.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width.
    pub w: i32,
    /// Height.
    pub h: i32,
}

impl Rect {
    /// Construct a rectangle from coordinates and size.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// A zero-sized rectangle at the origin.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Does this rect have a zero size?
    pub fn is_zero(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Containment test over the closed interval on both axes:
    /// `[x, x + w] × [y, y + h]`.
    ///
    /// Both edges are inclusive, so a zero-sized rect still contains its
    /// single corner point and two adjacent rects both claim their shared
    /// edge. Hit testing resolves the ambiguity by asking the frontmost
    /// child first.
    pub fn contains(&self, p: Point) -> bool {
        (self.tl.x..=self.tl.x + self.w).contains(&p.x)
            && (self.tl.y..=self.tl.y + self.h).contains(&p.y)
    }
}

/// Insets from the top, right, bottom and left edges.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Insets {
    /// Top inset.
    pub top: i32,
    /// Right inset.
    pub right: i32,
    /// Bottom inset.
    pub bottom: i32,
    /// Left inset.
    pub left: i32,
}

impl Insets {
    /// Construct insets in top/right/bottom/left order.
    pub fn new(top: i32, right: i32, bottom: i32, left: i32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// A navigation direction for directional input.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Navigate up.
    Up,
    /// Navigate right.
    Right,
    /// Navigate down.
    Down,
    /// Navigate left.
    Left,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_is_inclusive_on_both_edges() {
        let r = Rect::new(10, 10, 20, 20);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(30, 30)));
        assert!(!r.contains(Point::new(31, 30)));
        assert!(!r.contains(Point::new(9, 10)));
    }

    #[test]
    fn zero_size_rect_contains_its_corner() {
        // The closed-interval quirk: a zero-area rect still matches its
        // single point, and two adjacent zero-area rects share it.
        let r = Rect::new(5, 5, 0, 0);
        assert!(r.is_zero());
        assert!(r.contains(Point::new(5, 5)));
        assert!(!r.contains(Point::new(5, 6)));

        let neighbor = Rect::new(5, 5, 10, 0);
        assert!(neighbor.contains(Point::new(5, 5)));
    }
}
