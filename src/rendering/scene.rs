//! In-memory SVG scene graph
//!
//! A [`RenderTarget`] that keeps the primitive tree in memory and can dump it
//! as SVG markup. Used by hosts without a DOM and by the test-suite to inspect
//! what was drawn.

use super::target::{Attributes, NodeHandle, PrimitiveKind, RenderTarget};
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone)]
struct SceneNode {
    kind: PrimitiveKind,
    attributes: Attributes,
    text: Option<String>,
    parent: Option<NodeHandle>,
    children: Vec<NodeHandle>,
}

/// Retained in-memory SVG document
#[derive(Debug, Clone)]
pub struct SvgScene {
    nodes: HashMap<NodeHandle, SceneNode>,
    root: NodeHandle,
    next_handle: u64,
}

impl SvgScene {
    /// Create a scene whose root is an `<svg>` of the given size
    pub fn new(width: f64, height: f64) -> Self {
        let root = NodeHandle::from_raw(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            SceneNode {
                kind: PrimitiveKind::Svg,
                attributes: Attributes::new()
                    .with("xmlns", "http://www.w3.org/2000/svg")
                    .with("width", width)
                    .with("height", height),
                text: None,
                parent: None,
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            root,
            next_handle: 1,
        }
    }

    pub fn contains(&self, node: NodeHandle) -> bool {
        self.nodes.contains_key(&node)
    }

    /// Number of live primitives, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn kind(&self, node: NodeHandle) -> Option<PrimitiveKind> {
        self.nodes.get(&node).map(|n| n.kind)
    }

    pub fn attribute(&self, node: NodeHandle, name: &str) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.attributes.get(name))
    }

    /// Numeric attribute, if present and parseable
    pub fn number(&self, node: NodeHandle, name: &str) -> Option<f64> {
        self.attribute(node, name).and_then(|v| v.parse().ok())
    }

    pub fn text(&self, node: NodeHandle) -> Option<&str> {
        self.nodes.get(&node).and_then(|n| n.text.as_deref())
    }

    pub fn parent(&self, node: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(&node).and_then(|n| n.parent)
    }

    pub fn children(&self, node: NodeHandle) -> &[NodeHandle] {
        self.nodes
            .get(&node)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// All primitives whose attribute `name` equals `value`, in handle order
    pub fn find_by_attribute(&self, name: &str, value: &str) -> Vec<NodeHandle> {
        let mut found: Vec<NodeHandle> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.attributes.get(name) == Some(value))
            .map(|(handle, _)| *handle)
            .collect();
        found.sort();
        found
    }

    /// Serialise the tree below the root as SVG markup
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        self.write_node(self.root, &mut out);
        out
    }

    fn write_node(&self, handle: NodeHandle, out: &mut String) {
        let Some(node) = self.nodes.get(&handle) else {
            return;
        };
        let tag = node.kind.tag();
        let _ = write!(out, "<{tag}");
        for (name, value) in node.attributes.iter() {
            let _ = write!(out, " {}=\"{}\"", name, escape(value));
        }
        if node.children.is_empty() && node.text.is_none() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &node.text {
            out.push_str(&escape(text));
        }
        for child in &node.children {
            self.write_node(*child, out);
        }
        let _ = write!(out, "</{tag}>");
    }

    fn detach(&mut self, child: NodeHandle) {
        let parent = self.nodes.get_mut(&child).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != child);
        }
    }

    fn attach(&mut self, parent: NodeHandle, child: NodeHandle, index: Option<usize>) {
        if parent == child || !self.nodes.contains_key(&parent) || !self.nodes.contains_key(&child) {
            return;
        }
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&parent) {
            let index = index.unwrap_or(node.children.len()).min(node.children.len());
            node.children.insert(index, child);
        }
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }
}

impl RenderTarget for SvgScene {
    fn root(&self) -> NodeHandle {
        self.root
    }

    fn create(&mut self, kind: PrimitiveKind, attributes: Attributes) -> NodeHandle {
        let handle = NodeHandle::from_raw(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(
            handle,
            SceneNode {
                kind,
                attributes,
                text: None,
                parent: None,
                children: Vec::new(),
            },
        );
        handle
    }

    fn append_child(&mut self, parent: NodeHandle, child: NodeHandle) {
        self.attach(parent, child, None);
    }

    fn insert_child(&mut self, parent: NodeHandle, child: NodeHandle, index: usize) {
        self.attach(parent, child, Some(index));
    }

    fn set_attributes(&mut self, node: NodeHandle, attributes: Attributes) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.attributes.merge(attributes);
        }
    }

    fn set_text(&mut self, node: NodeHandle, text: &str) {
        if let Some(node) = self.nodes.get_mut(&node) {
            node.text = Some(text.to_string());
        }
    }

    fn remove(&mut self, node: NodeHandle) {
        if node == self.root || !self.nodes.contains_key(&node) {
            return;
        }
        self.detach(node);
        let mut pending = vec![node];
        while let Some(handle) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&handle) {
                pending.extend(removed.children);
            }
        }
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
