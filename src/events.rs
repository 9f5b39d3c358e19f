//! Host notifications the field reacts to
//!
//! The browser layer translates DOM events into [`HostEvent`]s so the core
//! never sees a DOM type.

use crate::field::ParticleField;

/// A notification from the host environment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The viewport changed size
    Resize { width: u32, height: u32 },
    /// The pointer moved to absolute surface coordinates
    PointerMove { x: f32, y: f32 },
    /// The pointer left the viewport
    PointerLeave,
}

impl ParticleField {
    /// Apply a host notification
    pub fn handle_event(&mut self, event: HostEvent) {
        match event {
            HostEvent::Resize { width, height } => self.resize(width, height),
            HostEvent::PointerMove { x, y } => self.pointer_moved(x, y),
            HostEvent::PointerLeave => self.pointer_left(),
        }
    }
}
