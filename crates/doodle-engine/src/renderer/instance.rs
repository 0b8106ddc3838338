use bytemuck::{Pod, Zeroable};

/// Per-instance render data read by the JS renderer.
/// Must match the JS protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// X position in screen pixels.
    pub x: f32,
    /// Y position in screen pixels (y-up).
    pub y: f32,
    /// Rotation in radians (counter-clockwise).
    pub rotation: f32,
    /// Normalized anchor, measured from the sprite's bottom-left corner.
    pub anchor_x: f32,
    pub anchor_y: f32,
    /// Rendered size in screen pixels.
    pub width: f32,
    pub height: f32,
    /// Texture id in the level's texture registry.
    pub texture: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Render buffer containing all sprite instances for a frame.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(64),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as a flat float slice.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer to instance data for reads from wasm memory.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
