//! A single particle and its per-frame kinetics
//!
//! The step is split into small pieces (integrate, reflect, repel, limit) so
//! each rule can be exercised on its own. [`Particle::step`] runs them in
//! frame order.

use rand::Rng;

use crate::config::SimulationConfig;
use crate::pointer::PointerState;

/// A point with position, velocity and a fixed visual radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in surface pixels
    pub x: f32,
    pub y: f32,
    /// Velocity in pixels per frame
    pub vx: f32,
    pub vy: f32,
    /// Disc radius for rendering
    pub radius: f32,
}

/// Uniform sample in [0, 1)
fn unit_sample<R: Rng + ?Sized>(rng: &mut R) -> f32 {
    rng.gen_range(0.0..1.0)
}

impl Particle {
    pub fn new(x: f32, y: f32, vx: f32, vy: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            radius,
        }
    }

    /// Random particle inside a `width` x `height` surface
    ///
    /// Samples are scaled from [0, 1) rather than drawn from a range, so a
    /// zero-sized surface or an empty radius range is fine.
    pub fn random<R: Rng + ?Sized>(
        width: f32,
        height: f32,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Self {
        let x = unit_sample(rng) * width;
        let y = unit_sample(rng) * height;
        let vx = (unit_sample(rng) - 0.5) * config.base_speed;
        let vy = (unit_sample(rng) - 0.5) * config.base_speed;
        let radius =
            config.min_radius + unit_sample(rng) * (config.max_radius - config.min_radius);

        Self::new(x, y, vx, vy, radius)
    }

    pub fn speed(&self) -> f32 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Advance position by one frame of velocity
    pub fn integrate(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    /// Bounce off the surface edges
    ///
    /// Reflection is instantaneous: the velocity component flips and the
    /// position snaps back onto the edge.
    pub fn reflect(&mut self, width: f32, height: f32) {
        if self.x < 0.0 || self.x > width {
            self.vx = -self.vx;
            self.x = self.x.clamp(0.0, width);
        }
        if self.y < 0.0 || self.y > height {
            self.vy = -self.vy;
            self.y = self.y.clamp(0.0, height);
        }
    }

    /// Push away from the pointer with linear falloff to zero at its radius
    pub fn repel_from(&mut self, pointer: &PointerState, strength: f32) {
        let Some((px, py)) = pointer.position() else {
            return;
        };

        let dx = px - self.x;
        let dy = py - self.y;
        let distance = (dx * dx + dy * dy).sqrt();
        if distance >= pointer.radius {
            return;
        }

        let force = (pointer.radius - distance) / pointer.radius;
        // atan2(0, 0) is 0, so a particle under the pointer is pushed along -x
        let angle = dy.atan2(dx);
        self.vx -= angle.cos() * force * strength;
        self.vy -= angle.sin() * force * strength;
    }

    /// Rescale velocity to `cap`, keeping its direction
    pub fn limit_speed(&mut self, cap: f32) {
        let speed = self.speed();
        if speed > cap {
            self.vx = self.vx / speed * cap;
            self.vy = self.vy / speed * cap;
        }
    }

    /// One full frame: integrate, reflect, repel, limit
    pub fn step(
        &mut self,
        width: f32,
        height: f32,
        pointer: &PointerState,
        config: &SimulationConfig,
    ) {
        self.integrate();
        self.reflect(width, height);
        self.repel_from(pointer, config.repulsion_strength);
        self.limit_speed(config.speed_cap());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const EPS: f32 = 1e-6;

    #[test]
    fn random_particles_respect_config_ranges() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..500 {
            let p = Particle::random(800.0, 600.0, &config, &mut rng);
            assert!((0.0..800.0).contains(&p.x));
            assert!((0.0..600.0).contains(&p.y));
            assert!(p.vx.abs() <= config.base_speed / 2.0);
            assert!(p.vy.abs() <= config.base_speed / 2.0);
            assert!(p.radius >= config.min_radius && p.radius <= config.max_radius);
        }
    }

    #[test]
    fn random_on_empty_surface_does_not_panic() {
        let config = SimulationConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let p = Particle::random(0.0, 0.0, &config, &mut rng);
        assert_eq!((p.x, p.y), (0.0, 0.0));
    }

    #[test]
    fn integrate_is_explicit_euler() {
        let mut p = Particle::new(10.0, 20.0, 0.5, -0.25, 2.0);
        p.integrate();
        assert_eq!((p.x, p.y), (10.5, 19.75));
    }

    #[test]
    fn reflect_flips_and_clamps_right_edge() {
        let mut p = Particle::new(101.0, 50.0, 0.4, 0.1, 2.0);
        p.reflect(100.0, 100.0);
        assert_eq!(p.x, 100.0);
        assert_eq!(p.vx, -0.4);
        assert_eq!(p.vy, 0.1);
    }

    #[test]
    fn reflect_flips_and_clamps_top_edge() {
        let mut p = Particle::new(50.0, -0.3, 0.1, -0.4, 2.0);
        p.reflect(100.0, 100.0);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.vy, 0.4);
        assert_eq!(p.vx, 0.1);
    }

    #[test]
    fn reflect_leaves_particles_on_the_edge_alone() {
        let mut p = Particle::new(100.0, 0.0, 0.4, -0.4, 2.0);
        p.reflect(100.0, 100.0);
        assert_eq!((p.vx, p.vy), (0.4, -0.4));
    }

    #[test]
    fn repulsion_at_zero_distance_is_maximal() {
        let mut pointer = PointerState::new(150.0);
        pointer.move_to(40.0, 40.0);
        let mut p = Particle::new(40.0, 40.0, 0.0, 0.0, 2.0);

        p.repel_from(&pointer, 0.05);

        assert!((p.vx + 0.05).abs() < EPS);
        assert!(p.vy.abs() < EPS);
    }

    #[test]
    fn repulsion_points_away_from_pointer() {
        let mut pointer = PointerState::new(150.0);
        pointer.move_to(100.0, 100.0);
        let mut p = Particle::new(100.0, 25.0, 0.0, 0.0, 2.0);

        p.repel_from(&pointer, 0.05);

        // Pointer is straight below at distance 75: half strength, upward
        assert!(p.vx.abs() < EPS);
        assert!((p.vy + 0.025).abs() < EPS);
    }

    #[test]
    fn no_repulsion_outside_radius_or_without_pointer() {
        let mut pointer = PointerState::new(150.0);
        let mut p = Particle::new(0.0, 0.0, 0.1, 0.1, 2.0);

        p.repel_from(&pointer, 0.05);
        assert_eq!((p.vx, p.vy), (0.1, 0.1));

        pointer.move_to(150.0, 0.0);
        p.repel_from(&pointer, 0.05);
        assert_eq!((p.vx, p.vy), (0.1, 0.1));
    }

    #[test]
    fn limit_speed_preserves_direction() {
        let mut p = Particle::new(0.0, 0.0, 3.0, 4.0, 2.0);
        p.limit_speed(1.0);
        assert!((p.speed() - 1.0).abs() < EPS);
        assert!((p.vx - 0.6).abs() < EPS);
        assert!((p.vy - 0.8).abs() < EPS);
    }

    #[test]
    fn limit_speed_ignores_slow_particles() {
        let mut p = Particle::new(0.0, 0.0, 0.3, 0.4, 2.0);
        p.limit_speed(1.0);
        assert_eq!((p.vx, p.vy), (0.3, 0.4));
    }

    #[test]
    fn step_bounces_then_caps() {
        let config = SimulationConfig::default();
        let pointer = PointerState::new(config.pointer_radius);
        let mut p = Particle::new(99.5, 50.0, 2.0, 0.0, 2.0);

        p.step(100.0, 100.0, &pointer, &config);

        assert_eq!(p.x, 100.0);
        assert!(p.vx < 0.0);
        assert!(p.speed() <= config.speed_cap() + EPS);
    }
}
