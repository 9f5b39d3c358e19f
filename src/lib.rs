//! particle-net - animated particle-network page background and form rules.
//!
//! This crate holds the browser-free core: the particle field simulation,
//! the surface and frame-clock abstractions it is driven through, and the
//! form field validation rules. `particle-net-viz` binds it to a canvas.

pub mod animation;
pub mod config;
pub mod events;
pub mod field;
pub mod particle;
pub mod pointer;
pub mod surface;
pub mod validation;

pub use animation::{Animation, FrameClock, ManualClock};
pub use config::{ConfigError, Rgba, SimulationConfig};
pub use events::HostEvent;
pub use field::{ParticleField, RenderStats, connection_opacity, particle_count};
pub use particle::Particle;
pub use pointer::PointerState;
pub use surface::{DrawCall, RecordingSurface, Surface};
pub use validation::{FieldError, FieldKind, validate_field};
