use eframe::egui::{Pos2, Rect, Vec2};

use super::scene::Scene;

/// Bridges the presentation surface and scene space: scene coordinates are
/// relative to the surface's top-left corner.
#[derive(Clone, Copy, Debug, Default)]
pub struct Viewport {
    origin: Pos2,
    size: Vec2,
}

impl Viewport {
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Follows the surface rect; resizes the scene only when the size really changed.
    /// Degenerate sizes (minimised window) are ignored.
    pub fn sync(&mut self, surface: Rect, scene: &mut Scene) -> bool {
        self.origin = surface.min;

        let size = surface.size();
        if !(size.x > 0.0 && size.y > 0.0 && size.is_finite()) || size == self.size {
            return false;
        }

        log::info!("viewport resized to {:.0}x{:.0}", size.x, size.y);
        self.size = size;
        scene.set_size(size);
        true
    }

    pub fn to_scene(&self, surface_point: Pos2) -> Pos2 {
        (surface_point - self.origin).to_pos2()
    }

    pub fn to_surface(&self, scene_point: Pos2) -> Pos2 {
        self.origin + scene_point.to_vec2()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::magnetic::config::EngineConfig;
    use eframe::egui::{pos2, vec2};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_sync_resizes_scene_once() {
        let mut scene =
            Scene::with_rng(vec2(10.0, 10.0), EngineConfig::default(), StdRng::seed_from_u64(1));
        let mut viewport = Viewport::default();
        let surface = Rect::from_min_size(pos2(200.0, 40.0), vec2(640.0, 480.0));

        assert!(viewport.sync(surface, &mut scene));
        assert_eq!(scene.size(), vec2(640.0, 480.0));
        assert_eq!(scene.field().strength, 640.0);
        assert!(!viewport.sync(surface, &mut scene));
    }

    #[test]
    fn test_degenerate_surface_is_ignored() {
        let mut scene =
            Scene::with_rng(vec2(300.0, 200.0), EngineConfig::default(), StdRng::seed_from_u64(1));
        let mut viewport = Viewport::default();
        let surface = Rect::from_min_size(pos2(0.0, 0.0), vec2(0.0, 480.0));

        assert!(!viewport.sync(surface, &mut scene));
        assert_eq!(scene.size(), vec2(300.0, 200.0));
    }

    #[test]
    fn test_point_mapping_round_trips_through_origin() {
        let mut scene =
            Scene::with_rng(vec2(10.0, 10.0), EngineConfig::default(), StdRng::seed_from_u64(1));
        let mut viewport = Viewport::default();
        viewport.sync(Rect::from_min_size(pos2(200.0, 40.0), vec2(640.0, 480.0)), &mut scene);

        assert_eq!(viewport.to_scene(pos2(250.0, 100.0)), pos2(50.0, 60.0));
        assert_eq!(viewport.to_surface(pos2(50.0, 60.0)), pos2(250.0, 100.0));
    }
}
