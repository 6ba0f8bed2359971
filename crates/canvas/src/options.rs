use crate::Result;
use serde::{Deserialize, Serialize};

/// Marker class names the canvas applies to entity surfaces.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasOptions {
    /// Applied to every registered entity.
    pub entity_class: String,
    /// Applied to every currently selected entity.
    pub selected_class: String,
    /// Applied while a drag gesture is in progress.
    pub dragging_class: String,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            entity_class: "elastibox-entity".into(),
            selected_class: "elastibox-selected".into(),
            dragging_class: "elastibox-entity-dragging".into(),
        }
    }
}

impl CanvasOptions {
    /// Parse options from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_elastibox_class_names() {
        let options = CanvasOptions::default();
        assert_eq!(options.entity_class, "elastibox-entity");
        assert_eq!(options.selected_class, "elastibox-selected");
        assert_eq!(options.dragging_class, "elastibox-entity-dragging");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let options = CanvasOptions::from_json(r#"{"selected_class": "picked"}"#).unwrap();
        assert_eq!(options.selected_class, "picked");
        assert_eq!(options.entity_class, "elastibox-entity");
    }

    #[test]
    fn invalid_json_is_an_options_error() {
        let err = CanvasOptions::from_json("{").unwrap_err();
        assert!(matches!(err, crate::Error::Options(_)));
    }
}
