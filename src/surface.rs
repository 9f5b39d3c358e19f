//! Drawing surface abstraction
//!
//! The field renders through [`Surface`] so the draw pass can run against a
//! browser canvas or, in tests, a [`RecordingSurface`].

use crate::config::Rgba;

/// The drawing primitives a render pass needs
pub trait Surface {
    /// Erase the whole `width` x `height` area
    fn clear(&mut self, width: f32, height: f32);

    /// Fill a disc centered at (`x`, `y`)
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba);

    /// Stroke a 1px straight line
    ///
    /// `opacity` is a global alpha applied on top of the color's own alpha.
    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba, opacity: f32);
}

/// A draw operation captured by [`RecordingSurface`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCall {
    Clear {
        width: f32,
        height: f32,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: (f32, f32),
        to: (f32, f32),
        color: Rgba,
        opacity: f32,
    },
}

/// Surface that records draw calls instead of painting
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget everything recorded so far
    pub fn reset(&mut self) {
        self.calls.clear();
    }

    /// Recorded lines, in draw order
    pub fn lines(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Line { .. }))
    }

    /// Recorded discs, in draw order
    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|call| matches!(call, DrawCall::Circle { .. }))
    }

    /// One line per call, for snapshot assertions
    pub fn transcript(&self) -> String {
        self.calls
            .iter()
            .map(|call| match call {
                DrawCall::Clear { width, height } => format!("clear {width}x{height}"),
                DrawCall::Circle {
                    x,
                    y,
                    radius,
                    color,
                } => format!("circle ({x}, {y}) r={radius} {}", color.css()),
                DrawCall::Line {
                    from,
                    to,
                    color,
                    opacity,
                } => format!(
                    "line ({}, {}) -> ({}, {}) {} alpha={opacity}",
                    from.0,
                    from.1,
                    to.0,
                    to.1,
                    color.css()
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, width: f32, height: f32) {
        self.calls.push(DrawCall::Clear { width, height });
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Rgba) {
        self.calls.push(DrawCall::Circle {
            x,
            y,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgba, opacity: f32) {
        self.calls.push(DrawCall::Line {
            from: (x1, y1),
            to: (x2, y2),
            color,
            opacity,
        });
    }
}
