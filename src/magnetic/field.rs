use eframe::egui::{Pos2, Rect, Vec2, pos2, vec2};

/// Radial attractor pulling every simulated node toward the scene centre.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Field {
    pub position: Pos2,
    pub strength: f32,
    pub minimum_radius: f32,
    pub capture_region_radius: f32,
}

impl Field {
    pub fn for_size(size: Vec2, minimum_radius: f32) -> Self {
        let strength = size.x.max(size.y).max(0.0);
        Self {
            position: pos2(size.x / 2.0, size.y / 2.0),
            strength,
            minimum_radius,
            capture_region_radius: strength.sqrt() * 100.0,
        }
    }

    /// Edge loop the nodes bounce off: `capture_region_radius` wide, centred on the
    /// field, full scene height.
    pub fn boundary(&self, size: Vec2) -> Rect {
        let width = self.capture_region_radius;
        Rect::from_min_max(
            pos2(self.position.x - width / 2.0, 0.0),
            pos2(self.position.x + width / 2.0, size.y.max(0.0)),
        )
    }

    pub fn acceleration_at(&self, point: Pos2, gain: f32) -> Vec2 {
        let delta = self.position - point;
        let distance = delta.length();
        if distance <= self.minimum_radius || distance > self.capture_region_radius {
            return Vec2::ZERO;
        }
        if distance <= f32::EPSILON {
            return Vec2::ZERO;
        }
        delta / distance * (self.strength * gain)
    }
}

impl Default for Field {
    fn default() -> Self {
        Self::for_size(vec2(0.0, 0.0), 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_derives_from_largest_dimension() {
        let field = Field::for_size(vec2(400.0, 900.0), 1.0);
        assert_eq!(field.strength, 900.0);
        assert_eq!(field.capture_region_radius, 3_000.0);
        assert_eq!(field.position, pos2(200.0, 450.0));
    }

    #[test]
    fn test_boundary_is_centred_on_field() {
        let size = vec2(400.0, 900.0);
        let field = Field::for_size(size, 1.0);
        let boundary = field.boundary(size);
        assert_eq!(boundary.left(), 200.0 - 1_500.0);
        assert_eq!(boundary.right(), 200.0 + 1_500.0);
        assert_eq!(boundary.top(), 0.0);
        assert_eq!(boundary.bottom(), 900.0);
    }

    #[test]
    fn test_no_pull_inside_minimum_radius() {
        let field = Field::for_size(vec2(100.0, 100.0), 5.0);
        assert_eq!(field.acceleration_at(pos2(52.0, 51.0), 1.0), Vec2::ZERO);

        let pull = field.acceleration_at(pos2(90.0, 50.0), 1.0);
        assert!(pull.x < 0.0);
        assert!((pull.length() - 100.0).abs() < 1e-3);
    }
}
