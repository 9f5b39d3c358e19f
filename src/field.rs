//! Particle field simulation
//!
//! Keeps a set of particles bouncing inside the surface, pushes them away
//! from the pointer, and draws them as a network: every pair closer than the
//! connection distance gets a line that fades out with distance.
//!
//! The pairwise pass is O(n²) per frame. The particle count is tied to the
//! surface area through the density formula, which is what keeps it bounded.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::SimulationConfig;
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::surface::Surface;

/// Number of particles for a `width` x `height` surface
///
/// `floor(width * height / reference_area * density_factor)`
pub fn particle_count(width: u32, height: u32, config: &SimulationConfig) -> usize {
    let area = width as f64 * height as f64;
    (area / config.reference_area * config.density_factor).floor() as usize
}

/// Opacity of a link of length `distance`
///
/// Decays linearly from `max_opacity` at distance 0 to exactly 0 at
/// `threshold`, and stays 0 beyond it.
pub fn connection_opacity(distance: f32, threshold: f32, max_opacity: f32) -> f32 {
    if distance >= threshold {
        return 0.0;
    }
    (1.0 - distance / threshold) * max_opacity
}

/// What a render pass drew
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub particles: usize,
    /// Particle-to-particle lines
    pub links: usize,
    /// Particle-to-pointer lines
    pub pointer_links: usize,
}

/// The simulated particle network
pub struct ParticleField {
    config: SimulationConfig,
    width: u32,
    height: u32,
    particles: Vec<Particle>,
    pointer: PointerState,
    rng: StdRng,
}

impl ParticleField {
    /// Create a field filling a `width` x `height` surface
    ///
    /// `config` must already have passed [`SimulationConfig::validate`]; a
    /// zero or non-finite `reference_area` makes the particle count
    /// meaningless. Debug builds check this.
    pub fn new(width: u32, height: u32, config: SimulationConfig, rng: StdRng) -> Self {
        debug_assert!(
            config.validate().is_ok(),
            "ParticleField needs a validated SimulationConfig"
        );
        let pointer = PointerState::new(config.pointer_radius);
        let mut field = Self {
            config,
            width,
            height,
            particles: Vec::new(),
            pointer,
            rng,
        };
        field.regenerate();
        field
    }

    /// Create a field with a deterministic random source
    ///
    /// Same precondition on `config` as [`ParticleField::new`].
    pub fn seeded(width: u32, height: u32, config: SimulationConfig, seed: u64) -> Self {
        Self::new(width, height, config, StdRng::seed_from_u64(seed))
    }

    /// Adopt new surface dimensions
    ///
    /// The whole particle set is regenerated; positions are not carried over.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let count = particle_count(self.width, self.height, &self.config);
        let (w, h) = (self.width as f32, self.height as f32);

        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = Particle::random(w, h, &self.config, &mut self.rng);
            self.particles.push(particle);
        }

        tracing::debug!(
            width = self.width,
            height = self.height,
            count,
            "regenerated particle field"
        );
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.move_to(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.leave();
    }

    /// Advance every particle by one frame
    pub fn update(&mut self) {
        let (w, h) = (self.width as f32, self.height as f32);
        for particle in &mut self.particles {
            particle.step(w, h, &self.pointer, &self.config);
        }
    }

    /// Draw the current state onto `surface`
    pub fn render<S: Surface + ?Sized>(&self, surface: &mut S) -> RenderStats {
        let mut stats = RenderStats {
            particles: self.particles.len(),
            ..Default::default()
        };

        surface.clear(self.width as f32, self.height as f32);

        for particle in &self.particles {
            surface.fill_circle(
                particle.x,
                particle.y,
                particle.radius,
                self.config.particle_color,
            );
        }

        stats.links = self.render_links(surface);
        stats.pointer_links = self.render_pointer_links(surface);

        tracing::trace!(
            particles = stats.particles,
            links = stats.links,
            pointer_links = stats.pointer_links,
            "rendered frame"
        );
        stats
    }

    /// Lines between every unordered pair within the connection distance
    fn render_links<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let threshold = self.config.connection_distance;
        let mut drawn = 0;

        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = a.distance_to(b.x, b.y);
                if distance < threshold {
                    let opacity =
                        connection_opacity(distance, threshold, self.config.link_max_opacity);
                    surface.stroke_line(a.x, a.y, b.x, b.y, self.config.link_color, opacity);
                    drawn += 1;
                }
            }
        }

        drawn
    }

    /// Lines from particles to the pointer, if it is over the surface
    fn render_pointer_links<S: Surface + ?Sized>(&self, surface: &mut S) -> usize {
        let Some((px, py)) = self.pointer.position() else {
            return 0;
        };
        let threshold = self.config.pointer_connection_distance;
        let mut drawn = 0;

        for particle in &self.particles {
            let distance = particle.distance_to(px, py);
            if distance < threshold {
                let opacity = connection_opacity(
                    distance,
                    threshold,
                    self.config.pointer_link_max_opacity,
                );
                surface.stroke_line(
                    particle.x,
                    particle.y,
                    px,
                    py,
                    self.config.pointer_link_color,
                    opacity,
                );
                drawn += 1;
            }
        }

        drawn
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles; the count stays fixed
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCall, RecordingSurface};

    const EPS: f32 = 1e-5;

    /// 150x200 at default density holds exactly two particles
    fn two_particle_field() -> ParticleField {
        let mut field = ParticleField::seeded(150, 200, SimulationConfig::default(), 3);
        assert_eq!(field.particles().len(), 2);
        let particles = field.particles_mut();
        particles[0] = Particle::new(50.0, 50.0, 0.0, 0.0, 2.0);
        particles[1] = Particle::new(125.0, 50.0, 0.0, 0.0, 1.5);
        field
    }

    #[test]
    fn count_for_reference_viewport() {
        let config = SimulationConfig::default();
        assert_eq!(particle_count(1500, 1000, &config), 100);
    }

    #[test]
    fn count_floors_and_scales_with_density() {
        let config = SimulationConfig {
            density_factor: 0.5,
            ..Default::default()
        };
        // 1000 * 1000 / 15000 = 66.67, halved = 33.3
        assert_eq!(particle_count(1000, 1000, &config), 33);
        assert_eq!(particle_count(0, 1000, &config), 0);
    }

    #[test]
    fn construction_uses_density_formula() {
        let config = SimulationConfig::default();
        let field = ParticleField::seeded(1500, 1000, config, 42);
        assert_eq!(field.particles().len(), 100);
        assert_eq!((field.width(), field.height()), (1500, 1000));
        assert!(!field.pointer().is_present());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "validated SimulationConfig")]
    fn unvalidated_config_is_rejected_in_debug() {
        let config = SimulationConfig {
            reference_area: 0.0,
            ..Default::default()
        };
        ParticleField::seeded(1500, 1000, config, 1);
    }

    #[test]
    fn resize_regenerates_particles() {
        let mut field = ParticleField::seeded(1500, 1000, SimulationConfig::default(), 42);
        let before = field.particles()[0];

        field.resize(300, 500);

        assert_eq!(field.particles().len(), 10);
        assert_ne!(field.particles()[0], before);
        for p in field.particles() {
            assert!(p.x <= 300.0 && p.y <= 500.0);
        }
    }

    #[test]
    fn resize_to_nothing_empties_the_field() {
        let mut field = ParticleField::seeded(800, 600, SimulationConfig::default(), 1);
        field.resize(0, 0);
        assert!(field.particles().is_empty());

        field.update();
        let stats = field.render(&mut RecordingSurface::new());
        assert_eq!(stats, RenderStats::default());
    }

    #[test]
    fn same_seed_same_field() {
        let a = ParticleField::seeded(640, 480, SimulationConfig::default(), 9);
        let b = ParticleField::seeded(640, 480, SimulationConfig::default(), 9);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn opacity_endpoints() {
        assert_eq!(connection_opacity(0.0, 150.0, 0.5), 0.5);
        assert_eq!(connection_opacity(150.0, 150.0, 0.5), 0.0);
        assert_eq!(connection_opacity(400.0, 150.0, 0.5), 0.0);
        assert_eq!(connection_opacity(75.0, 150.0, 0.5), 0.25);
    }

    #[test]
    fn opacity_decreases_with_distance() {
        let mut previous = connection_opacity(0.0, 150.0, 0.5);
        for step in 1..=150 {
            let current = connection_opacity(step as f32, 150.0, 0.5);
            assert!(current < previous, "opacity rose at distance {step}");
            previous = current;
        }
    }

    #[test]
    fn update_keeps_particles_in_bounds_and_under_cap() {
        let config = SimulationConfig {
            base_speed: 6.0,
            ..Default::default()
        };
        let cap = config.speed_cap();
        let mut field = ParticleField::seeded(300, 200, config, 11);
        field.pointer_moved(150.0, 100.0);

        for _ in 0..500 {
            field.update();
            for p in field.particles() {
                assert!((0.0..=300.0).contains(&p.x), "x out of bounds: {}", p.x);
                assert!((0.0..=200.0).contains(&p.y), "y out of bounds: {}", p.y);
                assert!(p.speed() <= cap + EPS);
            }
        }
    }

    #[test]
    fn crossing_a_bound_flips_velocity() {
        let mut field = ParticleField::seeded(150, 200, SimulationConfig::default(), 5);
        {
            let particles = field.particles_mut();
            particles[0] = Particle::new(149.8, 100.0, 0.4, 0.1, 1.0);
            particles[1] = Particle::new(20.0, 0.1, -0.2, -0.3, 1.0);
        }

        field.update();

        let p = field.particles();
        assert_eq!(p[0].x, 150.0);
        assert!(p[0].vx < 0.0);
        assert!(p[0].vy > 0.0);
        assert_eq!(p[1].y, 0.0);
        assert!(p[1].vy > 0.0);
        assert!(p[1].vx < 0.0);
    }

    #[test]
    fn pointer_repulsion_goes_through_update() {
        let mut field = two_particle_field();
        field.pointer_moved(50.0, 50.0);

        field.update();

        let p = field.particles()[0];
        assert!((p.vx + 0.05).abs() < EPS);
        assert!(p.vy.abs() < EPS);

        field.pointer_left();
        assert!(!field.pointer().is_present());
    }

    #[test]
    fn coincident_particles_link_at_max_opacity() {
        let mut field = two_particle_field();
        field.particles_mut()[1] = Particle::new(50.0, 50.0, 0.0, 0.0, 1.5);

        let mut surface = RecordingSurface::new();
        let stats = field.render(&mut surface);

        assert_eq!(stats.links, 1);
        match surface.lines().next() {
            Some(DrawCall::Line { opacity, .. }) => assert_eq!(*opacity, 0.5),
            other => panic!("expected a link, got {other:?}"),
        }
    }

    #[test]
    fn distant_particles_are_not_linked() {
        let mut field = two_particle_field();
        field.particles_mut()[1] = Particle::new(50.0, 200.0, 0.0, 0.0, 1.5);

        let mut surface = RecordingSurface::new();
        let stats = field.render(&mut surface);

        assert_eq!(stats.links, 0);
        assert_eq!(surface.circles().count(), 2);
        assert_eq!(surface.lines().count(), 0);
    }

    #[test]
    fn render_pass_draw_order() {
        let mut field = two_particle_field();
        field.pointer_moved(50.0, 150.0);

        let mut surface = RecordingSurface::new();
        let stats = field.render(&mut surface);

        assert_eq!(
            stats,
            RenderStats {
                particles: 2,
                links: 1,
                pointer_links: 2,
            }
        );
        insta::assert_snapshot!(surface.transcript(), @r"
        clear 150x200
        circle (50, 50) r=2 rgba(129, 140, 248, 0.8)
        circle (125, 50) r=1.5 rgba(129, 140, 248, 0.8)
        line (50, 50) -> (125, 50) rgba(99, 102, 241, 0.2) alpha=0.25
        line (50, 50) -> (50, 150) rgba(139, 92, 246, 0.4) alpha=0.4
        line (125, 50) -> (50, 150) rgba(139, 92, 246, 0.4) alpha=0.3
        ");
    }
}
