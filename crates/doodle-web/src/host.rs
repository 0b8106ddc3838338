//! Script host and game-state manager backed by JavaScript.

use std::cell::RefCell;

use doodle_engine::{GameStateManager, LevelCommand, SceneId, ScriptError, ScriptHost, ScriptValue};
use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

type Deferred = Box<dyn FnOnce()>;

thread_local! {
    static PENDING: RefCell<Vec<LevelCommand>> = RefCell::new(Vec::new());
    static DEFERRED: RefCell<Vec<Deferred>> = RefCell::new(Vec::new());
}

/// Queue a level request. Script callbacks run while the level is busy, so
/// requests wait here until the runner applies them.
pub fn queue_command(command: LevelCommand) {
    PENDING.with(|cell| cell.borrow_mut().push(command));
}

/// Take every queued request.
pub fn take_commands() -> Vec<LevelCommand> {
    PENDING.with(|cell| std::mem::take(&mut *cell.borrow_mut()))
}

/// Hold a JS callback until the runner is no longer borrowed.
pub fn defer(call: impl FnOnce() + 'static) {
    DEFERRED.with(|cell| cell.borrow_mut().push(Box::new(call)));
}

/// Run deferred callbacks, including any they defer in turn.
pub fn run_deferred() {
    loop {
        let batch = DEFERRED.with(|cell| std::mem::take(&mut *cell.borrow_mut()));
        if batch.is_empty() {
            break;
        }
        for call in batch {
            call();
        }
    }
}

fn to_js(value: &ScriptValue) -> JsValue {
    match *value {
        ScriptValue::Level(id) => JsValue::from(id.0),
        ScriptValue::Int(n) => JsValue::from(n),
    }
}

/// Resolves script functions as properties of a JS namespace object.
pub struct JsScriptHost {
    namespace: Object,
}

impl JsScriptHost {
    pub fn new(namespace: Object) -> Self {
        Self { namespace }
    }

    fn function(&self, name: &str) -> Option<Function> {
        Reflect::get(&self.namespace, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    }
}

impl ScriptHost for JsScriptHost {
    fn has_function(&self, name: &str) -> bool {
        self.function(name).is_some()
    }

    fn call(&mut self, name: &str, args: &[ScriptValue]) -> Result<(), ScriptError> {
        let function = self
            .function(name)
            .ok_or_else(|| ScriptError::MissingFunction(name.to_string()))?;
        let js_args: Array = args.iter().map(to_js).collect();
        function
            .apply(&self.namespace, &js_args)
            .map(|_| ())
            .map_err(|err| ScriptError::Call {
                name: name.to_string(),
                message: format!("{:?}", err),
            })
    }
}

/// Forwards the level outcome to a JS callback `(scene, success)`.
///
/// The outcome arrives while the runner is borrowed, and the callback may
/// well start the next level, so the call is deferred.
pub struct JsGameManager {
    callback: Function,
}

impl JsGameManager {
    pub fn new(callback: Function) -> Self {
        Self { callback }
    }
}

impl GameStateManager for JsGameManager {
    fn game_over(&mut self, scene: SceneId, success: bool) {
        let callback = self.callback.clone();
        defer(move || {
            if let Err(err) = callback.call2(
                &JsValue::NULL,
                &JsValue::from(scene.0),
                &JsValue::from_bool(success),
            ) {
                log::error!("game over callback failed: {:?}", err);
            }
        });
    }
}
