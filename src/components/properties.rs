// Property bag read by the presentation boundary

use bevy_ecs::prelude::Component;
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Key of the current image (animation frame) of an entity.
pub const IMAGE: &str = "Image";
/// Whether the renderer should mirror the image horizontally.
pub const FLIP_HORIZONTALLY: &str = "FlipHorizontally";
/// Sounds emitted by the entity during the current tick.
pub const SOUNDS: &str = "Sounds";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Scalar(f32),
    Text(String),
    List(Vec<String>),
}

#[derive(Debug, Clone, Default, Component, Serialize)]
pub struct Properties {
    pub values: FxHashMap<String, PropertyValue>,
}

impl Properties {
    pub fn set(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.values.insert(key.into(), value);
    }
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }
    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }
    pub fn set_bool(&mut self, key: impl Into<String>, value: bool) {
        self.set(key, PropertyValue::Bool(value));
    }
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.values.get(key) {
            Some(PropertyValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.set(key, PropertyValue::Text(value.into()));
    }
    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(PropertyValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
    pub fn set_list(&mut self, key: impl Into<String>, value: Vec<String>) {
        self.set(key, PropertyValue::List(value));
    }
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        match self.values.get(key) {
            Some(PropertyValue::List(l)) => Some(l.as_slice()),
            _ => None,
        }
    }
    pub fn set_scalar(&mut self, key: impl Into<String>, value: f32) {
        self.set(key, PropertyValue::Scalar(value));
    }
    pub fn get_scalar(&self, key: &str) -> Option<f32> {
        match self.values.get(key) {
            Some(PropertyValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut p = Properties::default();
        p.set_bool(FLIP_HORIZONTALLY, true);
        p.set_text(IMAGE, "player_idle_0");
        p.set_list(SOUNDS, vec!["jump".to_string()]);
        p.set_scalar("speed", 2.5);

        assert_eq!(p.get_bool(FLIP_HORIZONTALLY), Some(true));
        assert_eq!(p.get_text(IMAGE), Some("player_idle_0"));
        assert_eq!(p.get_list(SOUNDS), Some(&["jump".to_string()][..]));
        assert_eq!(p.get_scalar("speed"), Some(2.5));
    }

    #[test]
    fn test_wrong_type_reads_as_none() {
        let mut p = Properties::default();
        p.set_text(IMAGE, "frame");
        assert_eq!(p.get_bool(IMAGE), None);
        assert_eq!(p.get_list(IMAGE), None);
        assert!(p.remove(IMAGE).is_some());
        assert!(p.get(IMAGE).is_none());
    }
}
