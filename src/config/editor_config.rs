//! Editor-wide settings
//!
//! Everything the controller needs that isn't per entity: canvas size,
//! default styles and the look of the interaction helpers. Deserialised from
//! JSON with every field optional.

use crate::components::{EdgeStyle, VertexStyle};
use crate::value_objects::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading an [`EditorConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse editor config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid editor config: {0}")]
    Invalid(String),
}

/// Stroke/fill of an auxiliary primitive such as the selection halo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub width: f64,
    pub height: f64,
    pub background_color: Color,
    pub vertex_style: VertexStyle,
    pub edge_style: EdgeStyle,
    /// Halo drawn under selected vertices
    pub highlight_style: OverlayStyle,
    /// Rubber-band rectangle of a marquee selection
    pub marquee_style: OverlayStyle,
    /// Segment following the pointer while a join is pending
    pub join_link_style: OverlayStyle,
    /// Prepended to the running counter when naming created vertices
    pub vertex_name_prefix: String,
    /// Drop the attribute values of a removed vertex
    pub purge_attributes_on_remove: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            background_color: Color::WHITE,
            vertex_style: VertexStyle::default(),
            edge_style: EdgeStyle::default(),
            highlight_style: OverlayStyle {
                fill: Some(Color::LIGHT_GRAY),
                stroke: None,
                stroke_width: 0.0,
                opacity: 0.5,
            },
            marquee_style: OverlayStyle {
                // deepskyblue on honeydew
                fill: Some(Color::rgb(0xf0, 0xff, 0xf0)),
                stroke: Some(Color::rgb(0x00, 0xbf, 0xff)),
                stroke_width: 2.0,
                opacity: 0.5,
            },
            join_link_style: OverlayStyle {
                fill: None,
                // slategray
                stroke: Some(Color::rgb(0x70, 0x80, 0x90)),
                stroke_width: 2.0,
                opacity: 1.0,
            },
            vertex_name_prefix: String::new(),
            purge_attributes_on_remove: true,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a JSON document; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Canvas must be a finite positive area; the edge size divides marker
    /// geometry so it must be positive too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f64| value.is_finite() && value > 0.0;
        let non_negative = |value: f64| value.is_finite() && value >= 0.0;

        if !(positive(self.width) && positive(self.height)) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(non_negative(self.vertex_style.size) && non_negative(self.vertex_style.stroke_size)) {
            return Err(ConfigError::Invalid(format!(
                "vertex sizes must not be negative, got size {} stroke {}",
                self.vertex_style.size, self.vertex_style.stroke_size
            )));
        }
        if !positive(self.edge_style.size) {
            return Err(ConfigError::Invalid(format!(
                "edge size must be positive, got {}",
                self.edge_style.size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EditorConfig::from_json_str(
            r##"{"width": 1024, "vertex_name_prefix": "n", "vertex_style": {"color": "#ff0000"}}"##,
        )
        .unwrap();
        assert_eq!(config.width, 1024.0);
        assert_eq!(config.height, 600.0);
        assert_eq!(config.vertex_name_prefix, "n");
        assert_eq!(config.vertex_style.color, Color::rgb(255, 0, 0));
        assert_eq!(config.vertex_style.size, 35.0);
        assert!(config.purge_attributes_on_remove);
    }

    #[test]
    fn test_rejects_non_positive_canvas() {
        let err = EditorConfig::from_json_str(r#"{"height": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_degenerate_styles() {
        let mut config = EditorConfig::default();
        config.edge_style.size = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EditorConfig::default();
        config.vertex_style.stroke_size = -2.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = EditorConfig::default();
        config.width = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = EditorConfig::from_json_str("{width: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
