//! Simulation tunables
//!
//! Every value the particle field reads is fixed at construction. Defaults
//! reproduce the landing page background; a JSON object can override any
//! subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The JSON could not be parsed into a configuration
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the simulation cannot work with
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// RGBA color with 8-bit channels and a fractional alpha, as CSS expects
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string, e.g. `rgba(129, 140, 248, 0.8)`
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Default palette (indigo/violet on a dark page)
pub mod colors {
    use super::Rgba;

    /// Particle discs
    pub const PARTICLE: Rgba = Rgba::new(129, 140, 248, 0.8);

    /// Particle-to-particle links
    pub const LINK: Rgba = Rgba::new(99, 102, 241, 0.2);

    /// Particle-to-pointer links
    pub const POINTER_LINK: Rgba = Rgba::new(139, 92, 246, 0.4);
}

/// Configuration for the particle field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Surface area (px²) that holds one particle at density 1
    pub reference_area: f64,
    /// Multiplier applied to the area-derived particle count
    pub density_factor: f64,
    /// Initial speed scale; velocity components start in [-base/2, base/2]
    pub base_speed: f32,
    /// Smallest particle radius
    pub min_radius: f32,
    /// Particle radius upper bound (exclusive)
    pub max_radius: f32,
    /// Particles closer than this are linked
    pub connection_distance: f32,
    /// Pointer interaction radius for repulsion
    pub pointer_radius: f32,
    /// Particles closer than this to the pointer are linked to it
    pub pointer_connection_distance: f32,
    /// Coupling constant for pointer repulsion
    pub repulsion_strength: f32,
    /// Opacity of a zero-length particle link
    pub link_max_opacity: f32,
    /// Opacity of a zero-length pointer link
    pub pointer_link_max_opacity: f32,
    pub particle_color: Rgba,
    pub link_color: Rgba,
    pub pointer_link_color: Rgba,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            reference_area: 15_000.0,
            density_factor: 1.0,
            base_speed: 0.5,
            min_radius: 1.0,
            max_radius: 3.0,
            connection_distance: 150.0,
            pointer_radius: 150.0,
            pointer_connection_distance: 200.0,
            repulsion_strength: 0.05,
            link_max_opacity: 0.5,
            pointer_link_max_opacity: 0.8,
            particle_color: colors::PARTICLE,
            link_color: colors::LINK,
            pointer_link_color: colors::POINTER_LINK,
        }
    }
}

impl SimulationConfig {
    /// Parse a (possibly partial) JSON object and validate the result
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Maximum particle speed after an update
    pub fn speed_cap(&self) -> f32 {
        self.base_speed * 2.0
    }

    /// Check every field for values the simulation cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("reference_area", self.reference_area)?;
        non_negative("density_factor", self.density_factor)?;
        non_negative("base_speed", self.base_speed as f64)?;
        non_negative("min_radius", self.min_radius as f64)?;
        non_negative("max_radius", self.max_radius as f64)?;
        if self.min_radius > self.max_radius {
            return Err(ConfigError::Invalid {
                field: "min_radius",
                reason: format!(
                    "{} is larger than max_radius {}",
                    self.min_radius, self.max_radius
                ),
            });
        }
        positive("connection_distance", self.connection_distance as f64)?;
        positive("pointer_radius", self.pointer_radius as f64)?;
        positive(
            "pointer_connection_distance",
            self.pointer_connection_distance as f64,
        )?;
        non_negative("repulsion_strength", self.repulsion_strength as f64)?;
        unit("link_max_opacity", self.link_max_opacity)?;
        unit("pointer_link_max_opacity", self.pointer_link_max_opacity)?;
        unit("particle_color.a", self.particle_color.a)?;
        unit("link_color.a", self.link_color.a)?;
        unit("pointer_link_color.a", self.pointer_link_color.a)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not a finite number"),
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must be greater than zero"),
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} must not be negative"),
        })
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside [0, 1]"),
        })
    }
}
