// Viewport: the world-coordinate rectangle currently on screen.
//
// The offset is the world position of the canvas's top-left corner. The
// world-to-screen transform is a plain subtraction, so screen_to_world is
// its exact inverse.

use glam::Vec2;

#[derive(Debug, Clone, Copy, Default)]
pub struct Viewport {
    offset: Vec2,
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Centre the view on `target`, clamping each axis independently so the
    /// visible rectangle stays inside `[0, world]`. On an axis where the
    /// world is smaller than the surface the world is centred instead, which
    /// puts the offset half the slack below zero.
    pub fn recentre_on(&mut self, target: Vec2, surface: Vec2, world: Vec2) {
        self.offset = Vec2::new(
            clamp_axis(target.x - surface.x / 2.0, world.x, surface.x),
            clamp_axis(target.y - surface.y / 2.0, world.y, surface.y),
        );
    }

    #[inline]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point - self.offset
    }

    #[inline]
    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        point + self.offset
    }
}

fn clamp_axis(offset: f32, world: f32, surface: f32) -> f32 {
    let max = world - surface;
    if max < 0.0 {
        // World narrower than the surface on this axis: centre it.
        max / 2.0
    } else {
        offset.clamp(0.0, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORLD: Vec2 = Vec2::new(2048.0, 2048.0);
    const SURFACE: Vec2 = Vec2::new(800.0, 600.0);

    #[test]
    fn recentre_centres_the_target() {
        let mut viewport = Viewport::new();
        viewport.recentre_on(Vec2::new(1000.0, 1000.0), SURFACE, WORLD);
        assert_eq!(viewport.offset(), Vec2::new(600.0, 700.0));
        assert_eq!(
            viewport.world_to_screen(Vec2::new(1000.0, 1000.0)),
            Vec2::new(400.0, 300.0)
        );
    }

    #[test]
    fn offset_is_clamped_to_world_bounds() {
        let mut viewport = Viewport::new();
        for target in [
            Vec2::new(0.0, 0.0),
            Vec2::new(-500.0, 10_000.0),
            Vec2::new(2048.0, 2048.0),
            Vec2::new(9999.0, -9999.0),
        ] {
            viewport.recentre_on(target, SURFACE, WORLD);
            let offset = viewport.offset();
            assert!(offset.x >= 0.0 && offset.x <= WORLD.x - SURFACE.x, "{target} -> {offset}");
            assert!(offset.y >= 0.0 && offset.y <= WORLD.y - SURFACE.y, "{target} -> {offset}");
        }
    }

    #[test]
    fn small_world_is_centred() {
        let mut viewport = Viewport::new();
        let world = Vec2::new(400.0, 2048.0);
        viewport.recentre_on(Vec2::new(200.0, 0.0), SURFACE, world);
        // x axis degenerate: 400-wide world centred in an 800-wide surface.
        assert_eq!(viewport.offset().x, -200.0);
        assert_eq!(viewport.offset().y, 0.0);
    }

    #[test]
    fn transform_round_trips_exactly() {
        let mut viewport = Viewport::new();
        viewport.recentre_on(Vec2::new(123.0, 456.0), SURFACE, WORLD);
        let point = Vec2::new(77.5, -12.25);
        assert_eq!(viewport.screen_to_world(viewport.world_to_screen(point)), point);
        assert_eq!(viewport.world_to_screen(viewport.screen_to_world(point)), point);
    }

    #[test]
    fn join_scenario_centres_on_spawn_clamped() {
        // Join at (100, 100): an unclamped offset would be negative on both
        // axes, so the view pins to the world's top-left corner.
        let mut viewport = Viewport::new();
        viewport.recentre_on(Vec2::new(100.0, 100.0), SURFACE, WORLD);
        assert_eq!(viewport.offset(), Vec2::ZERO);
    }
}
