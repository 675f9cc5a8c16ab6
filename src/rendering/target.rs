//! Abstract retained-mode vector surface

use indexmap::IndexMap;
use std::fmt;

/// Opaque handle to a primitive created by a [`RenderTarget`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(u64);

impl NodeHandle {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Kind of vector primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Svg,
    Defs,
    Group,
    Circle,
    Rect,
    Line,
    Polyline,
    Text,
    Marker,
}

impl PrimitiveKind {
    /// SVG element name
    pub fn tag(&self) -> &'static str {
        match self {
            PrimitiveKind::Svg => "svg",
            PrimitiveKind::Defs => "defs",
            PrimitiveKind::Group => "g",
            PrimitiveKind::Circle => "circle",
            PrimitiveKind::Rect => "rect",
            PrimitiveKind::Line => "line",
            PrimitiveKind::Polyline => "polyline",
            PrimitiveKind::Text => "text",
            PrimitiveKind::Marker => "marker",
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Ordered attribute set for a primitive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(IndexMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl ToString) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl ToString) {
        self.0.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Overwrite/insert every entry of `other`
    pub fn merge(&mut self, other: Attributes) {
        self.0.extend(other.0);
    }
}

/// A retained-mode 2D vector backend.
///
/// Anything that can create primitives with attributes, arrange them in a
/// tree and remove them again qualifies: a DOM-backed SVG element, a canvas
/// scene graph, a native widget toolkit or the in-memory [`SvgScene`](super::SvgScene).
pub trait RenderTarget {
    /// The top-level primitive everything else hangs off
    fn root(&self) -> NodeHandle;

    /// Create a detached primitive
    fn create(&mut self, kind: PrimitiveKind, attributes: Attributes) -> NodeHandle;

    /// Make `child` the last child of `parent`, detaching it from any previous parent
    fn append_child(&mut self, parent: NodeHandle, child: NodeHandle);

    /// Insert `child` at `index` among the children of `parent` (clamped to the end)
    fn insert_child(&mut self, parent: NodeHandle, child: NodeHandle, index: usize);

    /// Overwrite/insert the given attributes
    fn set_attributes(&mut self, node: NodeHandle, attributes: Attributes);

    /// Replace the text content
    fn set_text(&mut self, node: NodeHandle, text: &str);

    /// Remove a primitive and everything below it. Unknown handles are ignored.
    fn remove(&mut self, node: NodeHandle);

    /// Create a primitive and append it to `parent`
    fn add_child(&mut self, parent: NodeHandle, kind: PrimitiveKind, attributes: Attributes) -> NodeHandle {
        let node = self.create(kind, attributes);
        self.append_child(parent, node);
        node
    }
}
