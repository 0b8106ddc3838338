use crate::api::types::TouchId;

/// Input events the level understands. Coordinates are screen pixels, y-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A touch began.
    PointerDown { id: TouchId, x: f32, y: f32 },
    /// A touch moved from (prev_x, prev_y) to (x, y).
    PointerMove {
        id: TouchId,
        x: f32,
        y: f32,
        prev_x: f32,
        prev_y: f32,
    },
    /// A touch ended.
    PointerUp { id: TouchId },
    /// Flip the collider wireframe view. Debug builds only.
    #[cfg(debug_assertions)]
    ToggleDebug,
}

/// A queue of input events.
/// The host pushes events as they arrive; the level drains them each frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events. Returns a Vec and clears the queue.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    /// Iterate over pending events without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &InputEvent> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
