//! Pointer state shared between the event handlers and the simulation step

/// Current pointer position (if over the viewport) and its interaction radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Option<(f32, f32)>,
    /// Radius within which particles are pushed away
    pub radius: f32,
}

impl PointerState {
    /// Create an absent pointer with the given interaction radius
    pub fn new(radius: f32) -> Self {
        Self {
            position: None,
            radius,
        }
    }

    /// Record a pointer move to absolute surface coordinates
    pub fn move_to(&mut self, x: f32, y: f32) {
        self.position = Some((x, y));
    }

    /// The pointer left the viewport
    pub fn leave(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }

    /// Distance from the pointer to a point, `None` when the pointer is absent
    pub fn distance_to(&self, x: f32, y: f32) -> Option<f32> {
        self.position.map(|(px, py)| {
            let dx = px - x;
            let dy = py - y;
            (dx * dx + dy * dy).sqrt()
        })
    }
}
