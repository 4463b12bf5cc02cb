use eframe::egui::{Pos2, Rect, Vec2};
use rand::Rng;

pub fn distance(a: Pos2, b: Pos2) -> f32 {
    (a - b).length()
}

/// Uniform sample from `[min, max]`. Collapses to the midpoint when the range is empty.
pub fn random_range(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if !(min.is_finite() && max.is_finite()) {
        return 0.0;
    }
    if max <= min {
        return (min + max) * 0.5;
    }
    rng.random_range(min..=max)
}

pub fn circle_bounds(center: Pos2, radius: f32) -> Rect {
    Rect::from_center_size(center, Vec2::splat(radius * 2.0))
}

pub fn circle_contains(center: Pos2, radius: f32, point: Pos2) -> bool {
    radius > 0.0 && center.distance_sq(point) <= radius * radius
}

pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from * (1.0 - t) + to * t
}

pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

pub fn ease_in_quad(t: f32) -> f32 {
    t * t
}
