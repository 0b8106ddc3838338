use crate::api::error::ScriptError;
use crate::api::types::{CollisionTag, LevelId};
use crate::core::physics::Contact;
use crate::script::{ScriptHost, ScriptValue};

pub const LOAD_LEVEL: &str = "LoadLevel";
pub const BEGIN_CONTACT: &str = "BeginContact";
pub const END_CONTACT: &str = "EndContact";

/// Forwards level and contact notifications to the script host.
pub struct ScriptBridge {
    host: Box<dyn ScriptHost>,
}

impl ScriptBridge {
    pub fn new(host: Box<dyn ScriptHost>) -> Self {
        Self { host }
    }

    /// Run `LoadLevel(self, number)`. Any failure here is fatal for the level.
    pub fn load_level(&mut self, level: LevelId, number: u32) -> Result<(), ScriptError> {
        if !self.host.has_function(LOAD_LEVEL) {
            return Err(ScriptError::MissingFunction(LOAD_LEVEL.to_string()));
        }
        self.host.call(
            LOAD_LEVEL,
            &[ScriptValue::Level(level), ScriptValue::Int(number as i32)],
        )
    }

    /// Call `name(tag_a, tag_b)` if the script defines it and both bodies are
    /// tagged. Returns whether the callback ran successfully.
    pub fn notify_contact(&mut self, name: &str, tag_a: CollisionTag, tag_b: CollisionTag) -> bool {
        if !self.host.has_function(name) {
            return false;
        }
        if !tag_a.is_tagged() || !tag_b.is_tagged() {
            return false;
        }
        match self
            .host
            .call(name, &[ScriptValue::Int(tag_a.0), ScriptValue::Int(tag_b.0)])
        {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{}", err);
                false
            }
        }
    }

    pub fn begin_contact(&mut self, contact: &Contact) -> bool {
        self.notify_contact(BEGIN_CONTACT, contact.tag_a, contact.tag_b)
    }

    pub fn end_contact(&mut self, contact: &Contact) -> bool {
        self.notify_contact(END_CONTACT, contact.tag_a, contact.tag_b)
    }
}
