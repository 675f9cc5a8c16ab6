//! Visual styles for vertices and edges

use crate::value_objects::Color;
use serde::{Deserialize, Serialize};

/// Shape drawn for a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VertexShape {
    Circle,
    Square,
}

impl Default for VertexShape {
    fn default() -> Self {
        Self::Circle
    }
}

/// Visual style of a vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexStyle {
    pub shape: VertexShape,
    pub size: f64,
    pub color: Color,
    pub stroke_size: f64,
    pub stroke_color: Color,
    pub opacity: f64,
    pub label_size: f64,
    pub label_color: Color,
}

impl VertexStyle {
    /// Side of the square box the vertex is drawn in; the extra 30% leaves
    /// room for the selection halo.
    pub fn footprint(&self) -> f64 {
        let size = self.size + self.stroke_size;
        size + size * 0.3
    }

    /// Distance from the centre at which edges should stop
    pub fn edge_offset(&self) -> f64 {
        self.size / 2.0 + self.stroke_size / 2.0
    }

    /// Apply a single display change. Sizes are clamped at zero, opacity to
    /// `0..=1`; non-finite values leave the style untouched.
    pub fn apply(&mut self, attribute: &DisplayAttribute) {
        match *attribute {
            DisplayAttribute::Size(size) if size.is_finite() => self.size = size.max(0.0),
            DisplayAttribute::StrokeSize(size) if size.is_finite() => self.stroke_size = size.max(0.0),
            DisplayAttribute::Opacity(opacity) if opacity.is_finite() => self.opacity = opacity.clamp(0.0, 1.0),
            DisplayAttribute::Color(color) => self.color = color,
            DisplayAttribute::StrokeColor(color) => self.stroke_color = color,
            _ => {}
        }
    }
}

impl Default for VertexStyle {
    fn default() -> Self {
        Self {
            shape: VertexShape::Circle,
            size: 35.0,
            color: Color::LIGHT_GRAY,
            stroke_size: 1.0,
            stroke_color: Color::GRAY,
            opacity: 1.0,
            label_size: 12.0,
            label_color: Color::INK,
        }
    }
}

/// Marker drawn at the target end of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeShape {
    /// Filled arrow head
    Directed,
    /// Outlined arrow head
    ODirected,
    /// Flat bar, for inhibition
    Inhibited,
    Dot,
    ODot,
}

impl EdgeShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeShape::Directed => "directed",
            EdgeShape::ODirected => "odirected",
            EdgeShape::Inhibited => "inhibited",
            EdgeShape::Dot => "dot",
            EdgeShape::ODot => "odot",
        }
    }
}

impl Default for EdgeShape {
    fn default() -> Self {
        Self::Directed
    }
}

/// Visual style of an edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeStyle {
    pub shape: EdgeShape,
    pub size: f64,
    pub color: Color,
    pub opacity: f64,
    pub label_size: f64,
    pub label_color: Color,
}

impl Default for EdgeStyle {
    fn default() -> Self {
        Self {
            shape: EdgeShape::Directed,
            size: 2.0,
            color: Color::LIGHT_GRAY,
            opacity: 1.0,
            label_size: 12.0,
            label_color: Color::INK,
        }
    }
}

/// A bulk-editable vertex display property and its new value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "attribute", content = "value", rename_all = "snake_case")]
pub enum DisplayAttribute {
    Size(f64),
    StrokeSize(f64),
    Opacity(f64),
    Color(Color),
    StrokeColor(Color),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vertex_geometry() {
        let style = VertexStyle::default();
        assert!((style.footprint() - 46.8).abs() < 1e-9);
        assert_eq!(style.edge_offset(), 18.0);
    }

    #[test]
    fn test_apply_display_attribute() {
        let mut style = VertexStyle::default();
        style.apply(&DisplayAttribute::Size(50.0));
        style.apply(&DisplayAttribute::Opacity(3.0));
        style.apply(&DisplayAttribute::Color(Color::BLACK));

        assert_eq!(style.size, 50.0);
        assert_eq!(style.opacity, 1.0);
        assert_eq!(style.color, Color::BLACK);
    }

    #[test]
    fn test_out_of_range_display_values_keep_geometry_sane() {
        let mut style = VertexStyle::default();
        style.apply(&DisplayAttribute::Size(-10.0));
        style.apply(&DisplayAttribute::StrokeSize(-1.0));
        assert_eq!(style.size, 0.0);
        assert_eq!(style.stroke_size, 0.0);
        assert_eq!(style.footprint(), 0.0);

        style.apply(&DisplayAttribute::Size(f64::NAN));
        style.apply(&DisplayAttribute::StrokeSize(f64::INFINITY));
        style.apply(&DisplayAttribute::Opacity(f64::NAN));
        assert_eq!(style.size, 0.0);
        assert_eq!(style.stroke_size, 0.0);
        assert_eq!(style.opacity, 1.0);
    }

    #[test]
    fn test_display_attribute_json_shape() {
        let attr: DisplayAttribute =
            serde_json::from_str(r##"{"attribute":"stroke_color","value":"#00ff00"}"##).unwrap();
        assert_eq!(attr, DisplayAttribute::StrokeColor(Color::rgb(0, 255, 0)));
    }
}
