//! Positions, zone rectangles and colours.

/// A 2D point on the map plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A player position. Height is carried but ignored by zone containment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Drop the height component.
    #[must_use]
    pub const fn xy(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Axis-aligned zone rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ZonePos {
    pub min: Vec2,
    pub max: Vec2,
}

impl ZonePos {
    #[must_use]
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Build a rectangle from two corners given in any order.
    #[must_use]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        Self {
            min: Vec2::new(a.x.min(b.x), a.y.min(b.y)),
            max: Vec2::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Check whether a point lies inside, bounds included on every side.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}

/// RGBA colour as sent to clients, `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);

impl Colour {
    pub const WHITE: Self = Self(0xFFFF_FFFF);
    pub const RED: Self = Self(0xFF00_00FF);
    pub const TRANSPARENT: Self = Self(0);

    #[must_use]
    pub const fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from_be_bytes([r, g, b, a]))
    }

    #[must_use]
    pub const fn rgba(self) -> u32 {
        self.0
    }

    /// Same colour in `0xAABBGGRR` order, as the client's zone packets expect.
    #[must_use]
    pub const fn abgr(self) -> u32 {
        self.0.swap_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_inclusive_bounds() {
        let zone = ZonePos::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 20.0));

        assert!(zone.contains(Vec2::new(5.0, 5.0)));
        assert!(zone.contains(Vec2::new(0.0, 0.0)));
        assert!(zone.contains(Vec2::new(10.0, 20.0)));
        assert!(zone.contains(Vec2::new(10.0, 0.0)));

        assert!(!zone.contains(Vec2::new(-0.1, 5.0)));
        assert!(!zone.contains(Vec2::new(5.0, 20.1)));
        assert!(!zone.contains(Vec2::new(10.1, 5.0)));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let zone = ZonePos::from_corners(Vec2::new(10.0, -5.0), Vec2::new(-10.0, 5.0));
        assert_eq!(zone.min, Vec2::new(-10.0, -5.0));
        assert_eq!(zone.max, Vec2::new(10.0, 5.0));
        assert!((zone.width() - 20.0).abs() < f32::EPSILON);
        assert!((zone.height() - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_height_ignored() {
        let zone = ZonePos::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        assert!(zone.contains(Vec3::new(0.5, 0.5, 900.0).xy()));
    }

    #[test]
    fn test_colour_packing() {
        let colour = Colour::from_rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(colour.rgba(), 0x1122_3344);
        assert_eq!(colour.abgr(), 0x4433_2211);
    }
}
