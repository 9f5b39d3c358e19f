//! Frame loop driver
//!
//! The host's frame callback (e.g. `requestAnimationFrame`) is modeled as a
//! [`FrameClock`]. Each [`Animation::tick`] asks the clock for the next frame
//! before doing any work, so the loop keeps itself alive until
//! [`Animation::stop`] is called or the host stops delivering frames.

use crate::events::HostEvent;
use crate::field::{ParticleField, RenderStats};
use crate::surface::Surface;

/// Host primitive that calls back once per display refresh
pub trait FrameClock {
    /// Ask for one more frame callback
    fn request_frame(&mut self);
}

/// Clock driven by hand, for tests and headless use
#[derive(Debug, Default)]
pub struct ManualClock {
    pending: usize,
    requested: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one pending frame request, if any
    pub fn take_pending(&mut self) -> bool {
        if self.pending == 0 {
            return false;
        }
        self.pending -= 1;
        true
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Total frames requested since creation
    pub fn requested(&self) -> u64 {
        self.requested
    }
}

impl FrameClock for ManualClock {
    fn request_frame(&mut self) {
        self.pending += 1;
        self.requested += 1;
    }
}

/// A particle field plus its loop state
pub struct Animation {
    field: ParticleField,
    running: bool,
    frames: u64,
}

impl Animation {
    pub fn new(field: ParticleField) -> Self {
        Self {
            field,
            running: true,
            frames: 0,
        }
    }

    /// Kick off the loop by requesting the first frame
    pub fn start<C: FrameClock + ?Sized>(&mut self, clock: &mut C) {
        if self.running {
            clock.request_frame();
        }
    }

    /// Run one frame: schedule the next, update, render
    ///
    /// Returns `None` without scheduling anything once stopped.
    pub fn tick<S, C>(&mut self, surface: &mut S, clock: &mut C) -> Option<RenderStats>
    where
        S: Surface + ?Sized,
        C: FrameClock + ?Sized,
    {
        if !self.running {
            return None;
        }
        clock.request_frame();

        self.field.update();
        let stats = self.field.render(surface);
        self.frames += 1;
        Some(stats)
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        self.field.handle_event(event);
    }

    /// Stop the loop; later ticks are no-ops
    pub fn stop(&mut self) {
        if self.running {
            tracing::debug!(frames = self.frames, "animation stopped");
        }
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }
}
