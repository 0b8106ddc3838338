use doodle_engine::systems::render::build_render_buffer;
use doodle_engine::{InputEvent, InputQueue, LevelCommand, LevelLayer, RenderBuffer, TextureId};

use crate::host::take_commands;

/// Drives one level for the browser: queued input in, render data out.
///
/// wasm-bindgen cannot export this directly, so `lib.rs` keeps one in a
/// `thread_local!` and exports free functions around it.
pub struct LevelRunner {
    level: LevelLayer,
    input: InputQueue,
    render_buffer: RenderBuffer,
    /// Flattened debug outlines: for each line its point count, then x, y pairs.
    debug_buffer: Vec<f32>,
}

impl LevelRunner {
    pub fn new(level: LevelLayer) -> Self {
        let mut runner = Self {
            level,
            input: InputQueue::new(),
            render_buffer: RenderBuffer::new(),
            debug_buffer: Vec::new(),
        };
        // LoadLevel may already have queued requests.
        runner.apply_commands(take_commands());
        runner
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: input, one physics step, script requests, render data.
    pub fn tick(&mut self, dt: f32) {
        if let Err(err) = self.level.handle_input(&mut self.input) {
            log::error!("stroke rejected: {}", err);
        }
        self.apply_commands(take_commands());

        self.level.update(dt);
        self.apply_commands(take_commands());

        build_render_buffer(self.level.scene().iter(), &mut self.render_buffer);
        self.rebuild_debug_buffer();
    }

    pub fn apply_commands(&mut self, commands: Vec<LevelCommand>) {
        for command in commands {
            self.level.apply(command);
        }
    }

    pub fn level(&self) -> &LevelLayer {
        &self.level
    }

    #[cfg(debug_assertions)]
    fn rebuild_debug_buffer(&mut self) {
        self.debug_buffer.clear();
        for line in self.level.debug_lines() {
            self.debug_buffer.push(line.points.len() as f32);
            for [x, y] in line.points {
                self.debug_buffer.push(x);
                self.debug_buffer.push(y);
            }
        }
    }

    #[cfg(not(debug_assertions))]
    fn rebuild_debug_buffer(&mut self) {}

    // ---- Pointer accessors for reads from wasm memory ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.render_buffer.instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.render_buffer.instance_count()
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn debug_ptr(&self) -> *const f32 {
        self.debug_buffer.as_ptr()
    }

    pub fn debug_len(&self) -> u32 {
        self.debug_buffer.len() as u32
    }

    pub fn debug_buffer(&self) -> &[f32] {
        &self.debug_buffer
    }

    /// RGBA8 pixels of a sprite texture, or null once it has been freed.
    pub fn texture_ptr(&self, id: u32) -> *const u8 {
        self.level
            .textures()
            .get(TextureId(id))
            .map(|img| img.as_raw().as_ptr())
            .unwrap_or(std::ptr::null())
    }

    pub fn texture_size(&self, id: u32) -> (u32, u32) {
        self.level
            .textures()
            .get(TextureId(id))
            .map(|img| img.dimensions())
            .unwrap_or((0, 0))
    }

    /// RGBA8 pixels of the stroke being drawn, or null when idle.
    pub fn surface_ptr(&self) -> *const u8 {
        self.level
            .drawing_surface()
            .map(|s| s.pixels().as_raw().as_ptr())
            .unwrap_or(std::ptr::null())
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.level
            .drawing_surface()
            .map(|s| s.pixels().dimensions())
            .unwrap_or((0, 0))
    }
}
