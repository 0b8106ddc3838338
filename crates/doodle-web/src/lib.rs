//! Browser bindings for a single drawn-physics level.
//!
//! JS owns the frame loop and the renderer. It pushes pointer input, calls
//! `level_tick`, then reads instances, textures and the live drawing surface
//! straight out of wasm memory.

pub mod host;
pub mod runner;

pub use host::{JsGameManager, JsScriptHost};
pub use runner::LevelRunner;

use std::cell::RefCell;

use doodle_engine::{
    BodyDesc, Brush, CollisionTag, FixtureDesc, InputEvent, LevelCommand, LevelConfig, LevelError,
    LevelLayer, TouchId,
};
use glam::Vec2;
use wasm_bindgen::prelude::*;

use host::queue_command;

thread_local! {
    static RUNNER: RefCell<Option<LevelRunner>> = RefCell::new(None);
}

fn with_runner<R: Default>(f: impl FnOnce(&mut LevelRunner) -> R) -> R {
    RUNNER.with(|cell| {
        let mut borrow = match cell.try_borrow_mut() {
            Ok(borrow) => borrow,
            Err(_) => {
                log::warn!("level is busy, call ignored");
                return R::default();
            }
        };
        match borrow.as_mut() {
            Some(runner) => f(runner),
            None => {
                log::warn!("no level loaded, call level_init() first");
                R::default()
            }
        }
    })
}

/// Swap the current level. Fails instead of panicking when called while the
/// runner is borrowed.
fn install_runner(runner: Option<LevelRunner>) -> Result<(), &'static str> {
    RUNNER.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slot) => {
            *slot = runner;
            Ok(())
        }
        Err(_) => Err("level is busy, cannot replace it now"),
    })
}

/// Pointers are not `Default`, so null stands in when no level is loaded.
fn read_ptr<T>(f: impl FnOnce(&LevelRunner) -> *const T) -> *const T {
    RUNNER.with(|cell| match cell.try_borrow() {
        Ok(borrow) => borrow.as_ref().map(f).unwrap_or(std::ptr::null()),
        Err(_) => std::ptr::null(),
    })
}

fn build_level(
    number: u32,
    config_json: &str,
    brush_png: &[u8],
    script: js_sys::Object,
    on_game_over: js_sys::Function,
) -> Result<LevelLayer, LevelError> {
    let config = if config_json.trim().is_empty() {
        LevelConfig::default()
    } else {
        LevelConfig::from_json(config_json)?
    };
    let brush = Brush::from_png(brush_png)?;
    LevelLayer::new(
        number,
        config,
        brush,
        Box::new(JsScriptHost::new(script)),
        Box::new(JsGameManager::new(on_game_over)),
    )
}

/// Build and load level `number`.
///
/// `config_json` may omit any field and `brush_png` is the stamp image.
/// `script` is the object whose properties are the level's script
/// functions; `on_game_over(scene, success)` hears the outcome.
#[wasm_bindgen]
pub fn level_init(
    number: u32,
    config_json: &str,
    brush_png: Vec<u8>,
    script: js_sys::Object,
    on_game_over: js_sys::Function,
) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    // Drop any previous level before LoadLevel runs for the new one.
    install_runner(None).map_err(JsValue::from_str)?;
    host::take_commands();

    let level = build_level(number, config_json, &brush_png, script, on_game_over)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    log::info!("level {}: initialized", number);

    install_runner(Some(LevelRunner::new(level))).map_err(JsValue::from_str)?;
    host::run_deferred();
    Ok(())
}

#[wasm_bindgen]
pub fn level_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
    host::run_deferred();
}

// ---- Input ----

#[wasm_bindgen]
pub fn pointer_down(id: i32, x: f32, y: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { id: TouchId(id), x, y }));
}

#[wasm_bindgen]
pub fn pointer_move(id: i32, x: f32, y: f32, prev_x: f32, prev_y: f32) {
    with_runner(|r| {
        r.push_input(InputEvent::PointerMove {
            id: TouchId(id),
            x,
            y,
            prev_x,
            prev_y,
        })
    });
}

#[wasm_bindgen]
pub fn pointer_up(id: i32) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { id: TouchId(id) }));
}

#[cfg(debug_assertions)]
#[wasm_bindgen]
pub fn toggle_debug() {
    with_runner(|r| r.push_input(InputEvent::ToggleDebug));
}

// ---- Script-facing level API ----
//
// These are usually called from inside LoadLevel or a contact callback,
// while the runner is busy, so they only queue a request.

#[wasm_bindgen]
pub fn level_complete() {
    queue_command(LevelCommand::Complete);
}

#[wasm_bindgen]
pub fn level_set_goal_reached() {
    queue_command(LevelCommand::SetGoalReached);
}

#[wasm_bindgen]
pub fn level_collect_star(index: u32) {
    queue_command(LevelCommand::CollectStar(index as usize));
}

#[wasm_bindgen]
pub fn level_clear_drawn_bodies() {
    queue_command(LevelCommand::ClearDrawnBodies);
}

fn spawn(fixture: FixtureDesc, x: f32, y: f32, tag: i32, is_static: bool, sensor: bool) {
    let desc = if is_static { BodyDesc::fixed() } else { BodyDesc::dynamic() };
    queue_command(LevelCommand::SpawnBody {
        desc: desc
            .with_position(Vec2::new(x, y))
            .with_fixture(fixture)
            .with_sensor(sensor),
        tag: CollisionTag(tag),
    });
}

/// Place a tagged circle. Units are meters.
#[wasm_bindgen]
pub fn level_spawn_circle(x: f32, y: f32, radius: f32, tag: i32, is_static: bool, sensor: bool) {
    spawn(
        FixtureDesc::Circle {
            center: Vec2::ZERO,
            radius,
        },
        x,
        y,
        tag,
        is_static,
        sensor,
    );
}

/// Place a tagged box. Units are meters; the box takes half-extents.
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn level_spawn_box(
    x: f32,
    y: f32,
    half_width: f32,
    half_height: f32,
    angle: f32,
    tag: i32,
    is_static: bool,
    sensor: bool,
) {
    spawn(
        FixtureDesc::Box {
            center: Vec2::ZERO,
            half_width,
            half_height,
            angle,
        },
        x,
        y,
        tag,
        is_static,
        sensor,
    );
}

// ---- Level state ----

#[wasm_bindgen]
pub fn is_level_complete() -> bool {
    with_runner(|r| r.level().is_complete())
}

#[wasm_bindgen]
pub fn get_goal_reached() -> bool {
    with_runner(|r| r.level().goal_reached())
}

#[wasm_bindgen]
pub fn get_stars_collected() -> u32 {
    with_runner(|r| r.level().stars_collected() as u32)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_instances_ptr() -> *const f32 {
    read_ptr(|r| r.instances_ptr())
}

#[wasm_bindgen]
pub fn get_instance_count() -> u32 {
    with_runner(|r| r.instance_count())
}

#[wasm_bindgen]
pub fn get_texture_ptr(id: u32) -> *const u8 {
    read_ptr(|r| r.texture_ptr(id))
}

#[wasm_bindgen]
pub fn get_texture_width(id: u32) -> u32 {
    with_runner(|r| r.texture_size(id).0)
}

#[wasm_bindgen]
pub fn get_texture_height(id: u32) -> u32 {
    with_runner(|r| r.texture_size(id).1)
}

#[wasm_bindgen]
pub fn get_surface_ptr() -> *const u8 {
    read_ptr(|r| r.surface_ptr())
}

#[wasm_bindgen]
pub fn get_surface_width() -> u32 {
    with_runner(|r| r.surface_size().0)
}

#[wasm_bindgen]
pub fn get_surface_height() -> u32 {
    with_runner(|r| r.surface_size().1)
}

#[wasm_bindgen]
pub fn get_debug_lines_ptr() -> *const f32 {
    read_ptr(|r| r.debug_ptr())
}

#[wasm_bindgen]
pub fn get_debug_lines_len() -> u32 {
    with_runner(|r| r.debug_len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodle_engine::{GameStateManager, Rgba, SceneId, ScriptError, ScriptHost, ScriptValue};
    use std::rc::Rc;

    struct LoadOnly;

    impl ScriptHost for LoadOnly {
        fn has_function(&self, name: &str) -> bool {
            name == "LoadLevel"
        }

        fn call(&mut self, _name: &str, _args: &[ScriptValue]) -> Result<(), ScriptError> {
            Ok(())
        }
    }

    /// Loads the next level from inside the outcome callback, like a JS
    /// game manager advancing to the next stage.
    struct AdvancingManager {
        reported: Rc<RefCell<Vec<SceneId>>>,
    }

    impl GameStateManager for AdvancingManager {
        fn game_over(&mut self, scene: SceneId, _success: bool) {
            let reported = Rc::clone(&self.reported);
            host::defer(move || {
                reported.borrow_mut().push(scene);
                let next = level(scene.0 + 1, Rc::clone(&reported));
                assert!(install_runner(Some(LevelRunner::new(next))).is_ok());
            });
        }
    }

    fn level(number: u32, reported: Rc<RefCell<Vec<SceneId>>>) -> LevelLayer {
        LevelLayer::new(
            number,
            LevelConfig::default(),
            Brush::round(8, Rgba([0, 0, 0, 255])),
            Box::new(LoadOnly),
            Box::new(AdvancingManager { reported }),
        )
        .unwrap()
    }

    #[test]
    fn outcome_callback_can_start_the_next_level() {
        let reported = Rc::new(RefCell::new(Vec::new()));
        install_runner(Some(LevelRunner::new(level(1, Rc::clone(&reported))))).unwrap();

        queue_command(LevelCommand::Complete);
        level_tick(1.0 / 60.0);

        assert_eq!(reported.borrow().as_slice(), &[SceneId(1)]);
        assert_eq!(with_runner(|r| r.level().level_number()), 2);
        assert!(!is_level_complete());
    }

    #[test]
    fn replacing_a_busy_runner_is_an_error() {
        let reported = Rc::new(RefCell::new(Vec::new()));
        install_runner(Some(LevelRunner::new(level(1, reported)))).unwrap();

        let swapped = RUNNER.with(|cell| {
            let _busy = cell.borrow_mut();
            install_runner(None)
        });
        assert!(swapped.is_err());
        assert_eq!(with_runner(|r| r.level().level_number()), 1);
    }
}
