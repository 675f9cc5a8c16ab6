//! Interactive network editor
//!
//! [`NetworkSvgLayout`] turns pointer events into edits of a [`Network`]. It
//! owns the render target, the scene chrome (background, marquee, temporary
//! join segment), the current [`EditMode`], the in-flight [`Gesture`], the
//! vertex selection and the context menu state.

use super::context_menu::{ContextMenu, ContextMenuRequest, ContextMenuState, MenuAction, MenuTicket};
use super::gesture::{Gesture, PointerButton, PointerEvent, PointerEventKind, PointerOutcome};
use super::mode::{EditMode, UnknownMode};
use crate::aggregate::Network;
use crate::attributes::{AttributeManager, AttributeMap, AttributeResult};
use crate::components::{DisplayAttribute, Edge, Vertex};
use crate::config::{ConfigError, EdgeConfig, EditorConfig, OverlayStyle, VertexConfig};
use crate::events::LayoutEvent;
use crate::rendering::{
    Attributes, DefaultEdgeRenderer, DefaultVertexRenderer, NodeHandle, PrimitiveKind, RenderTarget,
};
use crate::value_objects::{EdgeId, Point, Rect, VertexId};
use indexmap::IndexSet;
use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Share of the canvas left blank on the top/left edge by normalised layouts
const LAYOUT_MARGIN: f64 = 0.05;
/// Share of the canvas a normalised layout spans
const LAYOUT_SPAN: f64 = 0.85;

pub struct NetworkSvgLayout<T: RenderTarget> {
    config: EditorConfig,
    network: Network,
    target: T,
    background: NodeHandle,
    /// Group every vertex and edge is drawn into
    canvas: NodeHandle,
    join_link: NodeHandle,
    marquee: NodeHandle,
    mode: EditMode,
    gesture: Gesture,
    selection: IndexSet<VertexId>,
    highlights: HashMap<VertexId, NodeHandle>,
    created_vertex_count: u64,
    menu: ContextMenuState,
    next_ticket: u64,
    events: Vec<LayoutEvent>,
}

impl<T: RenderTarget> NetworkSvgLayout<T> {
    /// Set up the scene chrome on `target` and start in select mode. The
    /// config is validated first; nothing is drawn if it is rejected.
    pub fn new(config: EditorConfig, attributes: AttributeManager, mut target: T) -> Result<Self, ConfigError> {
        config.validate()?;
        let mode = EditMode::default();
        let root = target.root();
        target.set_attributes(
            root,
            Attributes::new()
                .with("width", config.width)
                .with("height", config.height)
                .with("cursor", mode.cursor()),
        );

        let background = target.add_child(
            root,
            PrimitiveKind::Rect,
            Attributes::new()
                .with("x", 0)
                .with("y", 0)
                .with("width", config.width)
                .with("height", config.height)
                .with("fill", config.background_color)
                .with("network-type", "background"),
        );
        let canvas = target.add_child(
            root,
            PrimitiveKind::Group,
            Attributes::new().with("id", "scaleGroupSVG").with("transform", "scale(1)"),
        );

        let mut link = overlay_attributes(&config.join_link_style)
            .with("x1", 0)
            .with("y1", 0)
            .with("x2", 0)
            .with("y2", 0)
            .with("cursor", "pointer");
        link.set("visibility", "hidden");
        let join_link = target.add_child(root, PrimitiveKind::Line, link);

        let mut rect = overlay_attributes(&config.marquee_style)
            .with("x", 0)
            .with("y", 0)
            .with("width", 0)
            .with("height", 0);
        rect.set("visibility", "hidden");
        let marquee = target.add_child(root, PrimitiveKind::Rect, rect);

        let network = Network::new(attributes).with_purge_on_remove(config.purge_attributes_on_remove);
        Ok(Self {
            config,
            network,
            target,
            background,
            canvas,
            join_link,
            marquee,
            mode,
            gesture: Gesture::Idle,
            selection: IndexSet::new(),
            highlights: HashMap::new(),
            created_vertex_count: 0,
            menu: ContextMenuState::Closed,
            next_ticket: 0,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Group holding vertex and edge primitives
    pub fn canvas(&self) -> NodeHandle {
        self.canvas
    }

    pub fn background(&self) -> NodeHandle {
        self.background
    }

    pub fn marquee(&self) -> NodeHandle {
        self.marquee
    }

    pub fn join_link(&self) -> NodeHandle {
        self.join_link
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn context_menu(&self) -> &ContextMenuState {
        &self.menu
    }

    /// Selected vertices in selection order
    pub fn selected_vertices(&self) -> Vec<VertexId> {
        self.selection.iter().copied().collect()
    }

    pub fn is_selected(&self, vertex_id: &VertexId) -> bool {
        self.selection.contains(vertex_id)
    }

    /// Drain pending notifications for the host UI
    pub fn take_events(&mut self) -> Vec<LayoutEvent> {
        std::mem::take(&mut self.events)
    }

    /// Switch mode, abandoning whatever gesture was in progress
    pub fn set_mode(&mut self, mode: EditMode) {
        self.cancel_gesture();
        let root = self.target.root();
        self.target
            .set_attributes(root, Attributes::new().with("cursor", mode.cursor()));
        if mode != self.mode {
            debug!(from = %self.mode, to = %mode, "edit mode changed");
            self.events.push(LayoutEvent::ModeChanged { from: self.mode, to: mode });
            self.mode = mode;
        }
    }

    /// Switch mode by name; unknown names leave the current mode in place
    pub fn set_mode_named(&mut self, name: &str) -> Result<(), UnknownMode> {
        match name.parse::<EditMode>() {
            Ok(mode) => {
                self.set_mode(mode);
                Ok(())
            }
            Err(e) => {
                debug!(name, "unknown edit mode ignored");
                Err(e)
            }
        }
    }

    /// Feed one pointer event. A secondary press on a vertex yields a
    /// context menu request the caller must resolve; a select-mode click on
    /// a vertex yields its attribute lookup.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerOutcome {
        let position = event.position;
        match event.kind {
            PointerEventKind::Down(PointerButton::Primary) => {
                self.menu = ContextMenuState::Closed;
                self.primary_down(position);
                PointerOutcome::Handled
            }
            PointerEventKind::Down(PointerButton::Secondary) => self
                .secondary_down(position)
                .map_or(PointerOutcome::Handled, PointerOutcome::ContextMenu),
            PointerEventKind::Move => {
                self.pointer_move(position);
                PointerOutcome::Handled
            }
            PointerEventKind::Up(PointerButton::Primary) => self.primary_up(position),
            PointerEventKind::Up(PointerButton::Secondary) => PointerOutcome::Handled,
            PointerEventKind::Leave => {
                if !self.gesture.is_idle() {
                    trace!("pointer left the canvas, gesture cancelled");
                }
                self.cancel_gesture();
                PointerOutcome::Handled
            }
        }
    }

    fn primary_down(&mut self, position: Point) {
        let hit = self.network.vertex_at(position);
        match self.mode {
            EditMode::Select => match hit {
                Some(vertex_id) => {
                    if !self.selection.contains(&vertex_id) {
                        self.select_vertices([vertex_id]);
                    }
                    self.gesture = Gesture::Dragging { last: position };
                }
                None => {
                    self.gesture = Gesture::Marquee {
                        origin: position,
                        current: position,
                    };
                    self.draw_marquee(Rect::from_corners(position, position));
                }
            },
            EditMode::Add => {
                if hit.is_none() {
                    self.create_vertex(position);
                }
            }
            EditMode::Join => self.join_click(hit),
            EditMode::Delete => {
                if let Some(vertex_id) = hit {
                    self.remove_vertex(&vertex_id);
                }
            }
        }
    }

    fn join_click(&mut self, hit: Option<VertexId>) {
        match (self.gesture, hit) {
            (Gesture::PendingJoin { source }, Some(vertex_id)) if source == vertex_id => {
                debug!(vertex_id = %vertex_id, "self-join ignored");
            }
            (Gesture::PendingJoin { source }, Some(vertex_id)) => {
                self.cancel_gesture();
                self.create_edge(source, vertex_id);
            }
            (_, Some(vertex_id)) => {
                let Some(coords) = self.network.vertex_coords(&vertex_id) else {
                    return;
                };
                self.gesture = Gesture::PendingJoin { source: vertex_id };
                self.target.set_attributes(
                    self.join_link,
                    Attributes::new()
                        .with("x1", coords.x)
                        .with("y1", coords.y)
                        .with("x2", coords.x)
                        .with("y2", coords.y)
                        .with("visibility", "visible"),
                );
            }
            (_, None) => self.cancel_gesture(),
        }
    }

    fn pointer_move(&mut self, position: Point) {
        match self.gesture {
            Gesture::Dragging { last } => {
                let (dx, dy) = last.delta_to(&position);
                self.move_selection(dx, dy);
                self.gesture = Gesture::Dragging { last: position };
            }
            Gesture::Marquee { origin, .. } => {
                self.gesture = Gesture::Marquee {
                    origin,
                    current: position,
                };
                self.draw_marquee(Rect::from_corners(origin, position));
            }
            Gesture::PendingJoin { .. } => {
                self.target.set_attributes(
                    self.join_link,
                    Attributes::new().with("x2", position.x).with("y2", position.y),
                );
            }
            Gesture::Idle => trace!(x = position.x, y = position.y, "pointer move"),
        }
    }

    fn primary_up(&mut self, position: Point) -> PointerOutcome {
        match self.gesture {
            Gesture::Marquee { origin, .. } => {
                self.cancel_gesture();
                self.select_vertices_in(Rect::from_corners(origin, position));
                PointerOutcome::Handled
            }
            Gesture::Dragging { .. } => {
                self.gesture = Gesture::Idle;
                self.vertex_click(position).unwrap_or(PointerOutcome::Handled)
            }
            Gesture::PendingJoin { .. } | Gesture::Idle => PointerOutcome::Handled,
        }
    }

    fn vertex_click(&mut self, position: Point) -> Option<PointerOutcome> {
        let vertex_id = self.network.vertex_at(position)?;
        let style = self.network.config().vertex_config(&vertex_id)?.renderer().style();
        let (color, stroke_color) = (style.color, style.stroke_color);
        let fetch = self.network.fetch_vertex_attributes(&vertex_id)?;
        self.events.push(LayoutEvent::VertexClicked {
            vertex_id,
            color,
            stroke_color,
        });
        Some(PointerOutcome::VertexClicked { vertex_id, fetch })
    }

    fn secondary_down(&mut self, position: Point) -> Option<ContextMenuRequest> {
        let vertex_id = self.network.vertex_at(position)?;
        let fetch = self.network.fetch_vertex_attributes(&vertex_id)?;
        self.next_ticket += 1;
        let ticket = MenuTicket(self.next_ticket);
        self.menu = ContextMenuState::Loading {
            ticket,
            vertex_id,
            anchor: position,
        };
        Some(ContextMenuRequest {
            ticket,
            vertex_id,
            anchor: position,
            fetch,
        })
    }

    /// Hand back the outcome of a [`ContextMenuRequest`]. Returns whether a
    /// menu was opened; answers for superseded requests are dropped.
    ///
    /// A failed lookup still opens the menu, without attribute entries.
    pub fn resolve_context_menu(&mut self, ticket: MenuTicket, result: AttributeResult<AttributeMap>) -> bool {
        let (vertex_id, anchor) = match &self.menu {
            ContextMenuState::Loading {
                ticket: pending,
                vertex_id,
                anchor,
            } if *pending == ticket => (*vertex_id, *anchor),
            _ => {
                debug!(ticket = ticket.0, "stale context menu answer dropped");
                return false;
            }
        };
        if !self.network.graph().contains_vertex(&vertex_id) {
            self.menu = ContextMenuState::Closed;
            return false;
        }

        let entries = result.unwrap_or_else(|e| {
            warn!(vertex_id = %vertex_id, error = %e, "vertex attributes unavailable");
            AttributeMap::new()
        });
        self.menu = ContextMenuState::Open(ContextMenu {
            vertex_id,
            anchor,
            entries,
            actions: vec![MenuAction::DeleteVertex],
        });
        self.events.push(LayoutEvent::ContextMenuOpened { vertex_id, anchor });
        true
    }

    pub fn close_context_menu(&mut self) {
        self.menu = ContextMenuState::Closed;
    }

    /// Run the menu's delete action
    pub fn activate_menu_delete(&mut self) -> bool {
        let Some(vertex_id) = self.menu.menu().map(|menu| menu.vertex_id) else {
            return false;
        };
        self.menu = ContextMenuState::Closed;
        self.remove_vertex(&vertex_id)
    }

    /// Create a vertex at `position` with the next generated name
    pub fn create_vertex(&mut self, position: Point) -> Option<VertexId> {
        let name = format!("{}{}", self.config.vertex_name_prefix, self.created_vertex_count);
        let vertex = Vertex::new(name.clone());
        let vertex_id = vertex.id();
        let config = VertexConfig::new(
            position,
            Box::new(DefaultVertexRenderer::new(self.config.vertex_style.clone())),
        );
        if !self
            .network
            .add_vertex(vertex, config, &mut self.target, self.canvas)
        {
            return None;
        }
        self.created_vertex_count += 1;
        self.events.push(LayoutEvent::VertexCreated {
            vertex_id,
            name,
            position,
        });
        Some(vertex_id)
    }

    /// Connect two vertices already in the network
    pub fn create_edge(&mut self, source: VertexId, target: VertexId) -> Option<EdgeId> {
        let edge = Edge::new(source, target);
        let edge_id = edge.id();
        let config = EdgeConfig::new(Box::new(DefaultEdgeRenderer::new(self.config.edge_style.clone())));
        if !self
            .network
            .add_edge(edge, config, std::iter::empty(), &mut self.target, self.canvas)
        {
            return None;
        }
        self.events.push(LayoutEvent::EdgeCreated {
            edge_id,
            source,
            target,
        });
        Some(edge_id)
    }

    /// Remove a single edge, leaving both endpoints in place
    pub fn remove_edge(&mut self, edge_id: &EdgeId) -> bool {
        let Some((source, target)) = self
            .network
            .graph()
            .edge(edge_id)
            .map(|e| (e.source(), e.target()))
        else {
            return false;
        };
        if !self.network.remove_edge(edge_id, &mut self.target) {
            return false;
        }
        debug!(edge_id = %edge_id, "edge removed");
        self.events.push(LayoutEvent::EdgeDeleted {
            edge_id: *edge_id,
            source,
            target,
        });
        true
    }

    /// Remove a vertex and its edges, dropping it from the selection, a
    /// pending join and the context menu
    pub fn remove_vertex(&mut self, vertex_id: &VertexId) -> bool {
        let Some(degree) = self.network.graph().degree(vertex_id) else {
            return false;
        };
        if matches!(self.gesture, Gesture::PendingJoin { source } if source == *vertex_id) {
            self.cancel_gesture();
        }
        let menu_vertex = match &self.menu {
            ContextMenuState::Loading { vertex_id, .. } => Some(*vertex_id),
            ContextMenuState::Open(menu) => Some(menu.vertex_id),
            ContextMenuState::Closed => None,
        };
        if menu_vertex == Some(*vertex_id) {
            self.menu = ContextMenuState::Closed;
        }

        // the halo lives inside the vertex primitives and goes with them
        self.highlights.remove(vertex_id);
        let was_selected = self.selection.shift_remove(vertex_id);

        if !self.network.remove_vertex(vertex_id, &mut self.target) {
            return false;
        }
        self.events.push(LayoutEvent::VertexDeleted {
            vertex_id: *vertex_id,
            removed_edges: degree,
        });
        if was_selected {
            self.emit_selection();
        }
        true
    }

    /// Make `vertex_ids` the whole selection
    pub fn select_vertices<I>(&mut self, vertex_ids: I)
    where
        I: IntoIterator<Item = VertexId>,
    {
        self.clear_highlights();
        self.selection = vertex_ids
            .into_iter()
            .filter(|id| self.network.graph().contains_vertex(id))
            .collect();
        let selected: Vec<VertexId> = self.selection.iter().copied().collect();
        for vertex_id in selected {
            self.add_highlight(&vertex_id);
        }
        self.emit_selection();
    }

    /// Select the vertices whose centre lies in `rect`. Returns how many.
    pub fn select_vertices_in(&mut self, rect: Rect) -> usize {
        let inside = self.network.vertices_in(rect);
        let count = inside.len();
        self.select_vertices(inside);
        count
    }

    pub fn select_all_vertices(&mut self) {
        let all: Vec<VertexId> = self.network.graph().vertices().map(Vertex::id).collect();
        self.select_vertices(all);
    }

    pub fn deselect_all(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.clear_highlights();
        self.selection.clear();
        self.emit_selection();
    }

    /// Change one display property of every selected vertex and redraw
    /// those vertices and their edges
    pub fn set_selected_vertices_display(&mut self, attribute: DisplayAttribute) {
        let selected: Vec<VertexId> = self.selection.iter().copied().collect();
        for vertex_id in selected {
            let Some(config) = self.network.config_mut().vertex_config_mut(&vertex_id) else {
                continue;
            };
            config.renderer_mut().style_mut().apply(&attribute);

            self.highlights.remove(&vertex_id);
            self.network.render_vertex(&vertex_id, &mut self.target, self.canvas);
            self.add_highlight(&vertex_id);

            let incident = self
                .network
                .vertex(&vertex_id)
                .map(|v| v.edges().to_vec())
                .unwrap_or_default();
            for edge_id in incident {
                self.network.render_edge(&edge_id, &mut self.target, self.canvas);
            }
        }
    }

    /// Place vertices from coordinates normalised to `[0, 1]`, e.g. the
    /// output of an external layout service
    pub fn apply_normalized_layout<I>(&mut self, coords: I)
    where
        I: IntoIterator<Item = (VertexId, Point)>,
    {
        for (vertex_id, normalized) in coords {
            let position = Point::new(
                self.config.width * (LAYOUT_MARGIN + LAYOUT_SPAN * normalized.x),
                self.config.height * (LAYOUT_MARGIN + LAYOUT_SPAN * normalized.y),
            );
            self.network
                .reposition_vertex(&vertex_id, position, &mut self.target);
        }
    }

    /// Scatter every vertex over the canvas
    pub fn apply_random_layout<R: Rng>(&mut self, rng: &mut R) {
        let coords: Vec<(VertexId, Point)> = self
            .network
            .graph()
            .vertices()
            .map(|v| (v.id(), Point::new(rng.gen::<f64>(), rng.gen::<f64>())))
            .collect();
        self.apply_normalized_layout(coords);
    }

    /// Redraw every vertex and edge, keeping the selection halos
    pub fn redraw(&mut self) {
        self.highlights.clear();
        self.network.redraw(&mut self.target, self.canvas);
        let selected: Vec<VertexId> = self.selection.iter().copied().collect();
        for vertex_id in selected {
            self.add_highlight(&vertex_id);
        }
    }

    /// Delete the attribute values of vertices removed so far
    pub async fn purge_removed_attributes(&mut self) -> AttributeResult<usize> {
        self.network.purge_removed_attributes().await
    }

    fn move_selection(&mut self, dx: f64, dy: f64) {
        if self.selection.is_empty() {
            trace!("drag with empty selection ignored");
            return;
        }
        let selected: Vec<VertexId> = self.selection.iter().copied().collect();
        for vertex_id in selected {
            if let Some(coords) = self.network.vertex_coords(&vertex_id) {
                self.network
                    .reposition_vertex(&vertex_id, coords.translated(dx, dy), &mut self.target);
            }
        }
    }

    fn cancel_gesture(&mut self) {
        match self.gesture {
            Gesture::Marquee { .. } => {
                self.target.set_attributes(
                    self.marquee,
                    Attributes::new()
                        .with("x", 0)
                        .with("y", 0)
                        .with("width", 0)
                        .with("height", 0)
                        .with("visibility", "hidden"),
                );
            }
            Gesture::PendingJoin { .. } => {
                self.target.set_attributes(
                    self.join_link,
                    Attributes::new()
                        .with("x1", 0)
                        .with("y1", 0)
                        .with("x2", 0)
                        .with("y2", 0)
                        .with("visibility", "hidden"),
                );
            }
            Gesture::Dragging { .. } | Gesture::Idle => {}
        }
        self.gesture = Gesture::Idle;
    }

    fn draw_marquee(&mut self, rect: Rect) {
        self.target.set_attributes(
            self.marquee,
            Attributes::new()
                .with("x", rect.x)
                .with("y", rect.y)
                .with("width", rect.width)
                .with("height", rect.height)
                .with("visibility", "visible"),
        );
    }

    fn add_highlight(&mut self, vertex_id: &VertexId) {
        let (Some(primitives), Some(config)) = (
            self.network.vertex_primitives(vertex_id).copied(),
            self.network.config().vertex_config(vertex_id),
        ) else {
            return;
        };
        let mid = config.renderer().style().footprint() / 2.0;
        let halo = overlay_attributes(&self.config.highlight_style)
            .with("cx", mid)
            .with("cy", mid)
            .with("r", mid)
            .with("network-type", "select-vertex");
        let halo = self.target.create(PrimitiveKind::Circle, halo);
        self.target.insert_child(primitives.group, halo, 0);
        self.highlights.insert(*vertex_id, halo);
    }

    fn clear_highlights(&mut self) {
        for (_, halo) in self.highlights.drain() {
            self.target.remove(halo);
        }
    }

    fn emit_selection(&mut self) {
        self.events.push(LayoutEvent::SelectionChanged {
            selected: self.selection.iter().copied().collect(),
        });
    }
}

fn overlay_attributes(style: &OverlayStyle) -> Attributes {
    let mut attributes = Attributes::new()
        .with("stroke-width", style.stroke_width)
        .with("opacity", style.opacity);
    attributes.set("fill", style.fill.map_or_else(|| "none".to_string(), |c| c.to_hex()));
    if let Some(stroke) = style.stroke {
        attributes.set("stroke", stroke);
    }
    attributes
}
