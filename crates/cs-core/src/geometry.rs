use std::fmt;
use std::ops::{Add, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Square of a value.
pub fn square(x: f64) -> f64 {
    x * x
}

/// A 2D point or displacement in arena coordinates. `(0, 0)` is the lower left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Vec2 {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared euclidean distance to `other`.
    pub fn dist2(self, other: Self) -> f64 {
        square(self.x - other.x) + square(self.y - other.y)
    }

    /// Euclidean distance to `other`.
    pub fn dist(self, other: Self) -> f64 {
        self.dist2(other).sqrt()
    }

    /// Scale both components by `s`.
    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Half-open axis-aligned rectangle `[x_min, x_max) x [y_min, y_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Inclusive lower x bound.
    pub x_min: f64,
    /// Exclusive upper x bound.
    pub x_max: f64,
    /// Inclusive lower y bound.
    pub y_min: f64,
    /// Exclusive upper y bound.
    pub y_max: f64,
}

impl Rect {
    /// Create a rectangle from its bounds.
    pub const fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Square of half-extent `r` centered on `center`.
    pub fn around(center: Vec2, r: f64) -> Self {
        Self::new(center.x - r, center.x + r, center.y - r, center.y + r)
    }

    /// Degenerate rectangle covering exactly one point (used for bounding boxes).
    pub const fn point(x: f64, y: f64) -> Self {
        Self::new(x, x, y, y)
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// Half-open containment test.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x_min && x < self.x_max && y >= self.y_min && y < self.y_max
    }

    /// Whether the half-open interiors of the two rectangles overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x_max <= self.x_min
            || other.x_min >= self.x_max
            || other.y_max <= self.y_min
            || other.y_min >= self.y_max)
    }

    /// Grow this rectangle (treated as a closed bounding box) to cover `(x, y)`.
    pub fn extend(&mut self, x: f64, y: f64) {
        self.x_min = self.x_min.min(x);
        self.x_max = self.x_max.max(x);
        self.y_min = self.y_min.min(y);
        self.y_max = self.y_max.max(y);
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {}) x [{} {})",
            self.x_min, self.x_max, self.y_min, self.y_max
        )
    }
}

/// The rectangular battlefield `[0, width] x [0, height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Arena width.
    pub width: f64,
    /// Arena height.
    pub height: f64,
}

impl Arena {
    /// Create an arena of the given dimensions.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Point reflection through the arena center.
    pub fn mirror(&self, pos: Vec2) -> Vec2 {
        Vec2::new(self.width - pos.x, self.height - pos.y)
    }

    /// Whether a circle lies fully inside the arena.
    pub fn contains_circle(&self, pos: Vec2, radius: f64) -> bool {
        pos.x - radius >= 0.0
            && pos.x + radius <= self.width
            && pos.y - radius >= 0.0
            && pos.y + radius <= self.height
    }

    /// Random position at which a circle of `radius` fits, keeping 10% slack to the border.
    pub fn random_position<R: Rng>(&self, radius: f64, rng: &mut R) -> Vec2 {
        let slack = radius * 1.1;
        let p = Vec2::new(
            (self.width - 2.0 * slack) * rng.random::<f64>() + slack,
            (self.height - 2.0 * slack) * rng.random::<f64>() + slack,
        );
        debug_assert!(self.contains_circle(p, radius));
        p
    }

    /// Random position along one of the arena edges at which a circle of `radius` fits.
    ///
    /// When `now` is already close to an edge, the opposite edge is chosen so
    /// units keep crossing the arena instead of hugging a wall.
    pub fn random_edge_position<R: Rng>(&self, radius: f64, now: Vec2, rng: &mut R) -> Vec2 {
        let slack = radius * 1.05;
        let (x_low, x_high) = (self.width * 0.05, self.width * 0.95);
        let (y_low, y_high) = (self.height * 0.05, self.height * 0.95);

        let p = if rng.random::<f64>() < 0.5 {
            let x = (self.width - 2.0 * slack) * rng.random::<f64>() + slack;
            let y = if now.y < y_low {
                self.height - slack
            } else if now.y > y_high || rng.random::<f64>() < 0.5 {
                slack
            } else {
                self.height - slack
            };
            Vec2::new(x, y)
        } else {
            let y = (self.height - 2.0 * slack) * rng.random::<f64>() + slack;
            let x = if now.x < x_low {
                self.width - slack
            } else if now.x > x_high || rng.random::<f64>() < 0.5 {
                slack
            } else {
                self.width - slack
            };
            Vec2::new(x, y)
        };
        debug_assert!(self.contains_circle(p, radius));
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn vec2_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert_eq!(a.dist2(b), 25.0);
        assert!((a.dist(b) - 5.0).abs() < f64::EPSILON);
        assert_eq!(b - a, b);
        assert_eq!((a + b).scale(2.0), Vec2::new(6.0, 8.0));
    }

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(0.0, 10.0, 0.0, 5.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(9.999, 4.999));
        assert!(!r.contains(10.0, 1.0));
        assert!(!r.contains(1.0, 5.0));
    }

    #[test]
    fn rect_intersection_excludes_touching_edges() {
        let a = Rect::new(0.0, 10.0, 0.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 15.0, 5.0, 15.0)));
        assert!(!a.intersects(&Rect::new(10.0, 20.0, 0.0, 10.0)));
        assert!(!a.intersects(&Rect::new(0.0, 10.0, -5.0, 0.0)));
    }

    #[test]
    fn rect_extend_grows_bounding_box() {
        let mut bb = Rect::point(2.0, 3.0);
        bb.extend(5.0, 1.0);
        assert_eq!(bb, Rect::new(2.0, 5.0, 1.0, 3.0));
        assert_eq!(bb.width(), 3.0);
        assert_eq!(bb.height(), 2.0);
    }

    #[test]
    fn arena_mirror_is_point_reflection() {
        let arena = Arena::new(800.0, 600.0);
        assert_eq!(arena.mirror(Vec2::new(100.0, 50.0)), Vec2::new(700.0, 550.0));
    }

    #[test]
    fn random_positions_fit_inside_arena() {
        let arena = Arena::new(200.0, 100.0);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let p = arena.random_position(9.0, &mut rng);
            assert!(arena.contains_circle(p, 9.0));
            let e = arena.random_edge_position(16.0, p, &mut rng);
            assert!(arena.contains_circle(e, 16.0));
        }
    }

    #[test]
    fn edge_position_avoids_nearby_bottom_edge() {
        let arena = Arena::new(100.0, 100.0);
        let mut rng = StdRng::seed_from_u64(3);
        let now = Vec2::new(50.0, 1.0);
        for _ in 0..200 {
            let e = arena.random_edge_position(2.0, now, &mut rng);
            // Either constrained to the top edge or to a vertical edge.
            let on_top = (e.y - (100.0 - 2.1)).abs() < 1e-9;
            let on_side = (e.x - 2.1).abs() < 1e-9 || (e.x - (100.0 - 2.1)).abs() < 1e-9;
            assert!(on_top || on_side, "unexpected edge position {e}");
        }
    }
}
