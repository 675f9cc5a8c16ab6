//! End-to-end editing session against the in-memory scene and store

use anyhow::Result;
use cim_domain_network::{
    AttributeManager, ContextMenuState, DisplayAttribute, EditMode, EditorConfig, InMemoryAttributeStore,
    LayoutEvent, NetworkSvgLayout, Point, PointerEvent, SvgScene, VertexShape,
};
use serde_json::json;
use std::sync::Arc;

async fn editor(config: EditorConfig) -> Result<NetworkSvgLayout<SvgScene>> {
    let manager = AttributeManager::new(Arc::new(InMemoryAttributeStore::new()));
    manager.open().await?;
    let scene = SvgScene::new(config.width, config.height);
    Ok(NetworkSvgLayout::new(config, manager, scene)?)
}

fn click(layout: &mut NetworkSvgLayout<SvgScene>, x: f64, y: f64) {
    layout.handle_pointer(PointerEvent::down(x, y));
    layout.handle_pointer(PointerEvent::up(x, y));
}

#[tokio::test]
async fn test_build_edit_and_tear_down_a_network() -> Result<()> {
    let mut layout = editor(EditorConfig::default()).await?;

    layout.set_mode(EditMode::Add);
    click(&mut layout, 100.0, 100.0);
    click(&mut layout, 300.0, 100.0);
    click(&mut layout, 200.0, 300.0);
    assert_eq!(layout.network().graph().number_of_vertices(), 3);

    layout.set_mode(EditMode::Join);
    click(&mut layout, 100.0, 100.0);
    click(&mut layout, 300.0, 100.0);
    click(&mut layout, 300.0, 100.0);
    click(&mut layout, 200.0, 300.0);
    assert_eq!(layout.network().graph().number_of_edges(), 2);

    let report = layout.network().add_attribute("expression", "number", json!(0.5)).await?;
    assert_eq!(report.written, 3);

    layout.set_mode(EditMode::Select);
    layout.handle_pointer(PointerEvent::down(100.0, 100.0));
    let (clicked, fetch) = layout
        .handle_pointer(PointerEvent::up(100.0, 100.0))
        .into_vertex_click()
        .ok_or_else(|| anyhow::anyhow!("click reported no vertex"))?;
    assert_eq!(layout.network().vertex_at(Point::new(100.0, 100.0)), Some(clicked));
    assert_eq!(fetch.await?["expression"], json!(0.5));

    let request = layout
        .handle_pointer(PointerEvent::secondary_down(300.0, 100.0))
        .into_context_menu()
        .ok_or_else(|| anyhow::anyhow!("no context menu request"))?;
    let ticket = request.ticket;
    let attributes = request.fetch.await;
    assert!(layout.resolve_context_menu(ticket, attributes));
    match layout.context_menu() {
        ContextMenuState::Open(menu) => assert_eq!(menu.entries["expression"], json!(0.5)),
        other => panic!("menu not open: {other:?}"),
    }

    assert!(layout.activate_menu_delete());
    assert_eq!(layout.network().graph().number_of_vertices(), 2);
    assert_eq!(layout.network().graph().number_of_edges(), 0);
    assert_eq!(layout.purge_removed_attributes().await?, 1);

    let events = layout.take_events();
    let created = events
        .iter()
        .filter(|e| matches!(e, LayoutEvent::VertexCreated { .. }))
        .count();
    let joined = events
        .iter()
        .filter(|e| matches!(e, LayoutEvent::EdgeCreated { .. }))
        .count();
    assert_eq!((created, joined), (3, 2));
    assert!(events
        .iter()
        .any(|e| matches!(e, LayoutEvent::VertexDeleted { removed_edges: 2, .. })));
    Ok(())
}

#[tokio::test]
async fn test_configured_editor_renders_squares_with_prefix() -> Result<()> {
    let config = EditorConfig::from_json_str(
        r#"{
            "width": 640,
            "height": 480,
            "vertex_name_prefix": "gene-",
            "vertex_style": { "shape": "square", "size": 20 }
        }"#,
    )?;
    let mut layout = editor(config).await?;

    layout.set_mode_named("add")?;
    click(&mut layout, 50.0, 50.0);
    let vertex = layout
        .network()
        .graph()
        .vertices()
        .next()
        .ok_or_else(|| anyhow::anyhow!("vertex missing"))?;
    assert_eq!(vertex.name(), "gene-0");
    let vertex_id = vertex.id();
    let config = layout
        .network()
        .config()
        .vertex_config(&vertex_id)
        .ok_or_else(|| anyhow::anyhow!("config missing"))?;
    assert_eq!(config.renderer().style().shape, VertexShape::Square);

    layout.select_all_vertices();
    layout.set_selected_vertices_display(DisplayAttribute::Opacity(0.25));
    let svg = layout.target().to_svg();
    assert!(svg.contains("gene-0"));
    assert!(svg.contains("opacity=\"0.25\""));
    assert!(svg.contains("width=\"640\""));
    Ok(())
}

#[tokio::test]
async fn test_marquee_then_drag_moves_group() -> Result<()> {
    let mut layout = editor(EditorConfig::default()).await?;
    let a = layout.create_vertex(Point::new(100.0, 100.0)).ok_or_else(|| anyhow::anyhow!("a"))?;
    let b = layout.create_vertex(Point::new(150.0, 120.0)).ok_or_else(|| anyhow::anyhow!("b"))?;
    let far = layout.create_vertex(Point::new(600.0, 500.0)).ok_or_else(|| anyhow::anyhow!("far"))?;

    layout.handle_pointer(PointerEvent::down(50.0, 50.0));
    layout.handle_pointer(PointerEvent::moved(200.0, 200.0));
    layout.handle_pointer(PointerEvent::up(200.0, 200.0));
    assert_eq!(layout.selected_vertices(), vec![a, b]);

    layout.handle_pointer(PointerEvent::down(150.0, 120.0));
    layout.handle_pointer(PointerEvent::moved(160.0, 140.0));
    layout.handle_pointer(PointerEvent::up(160.0, 140.0));

    let network = layout.network();
    assert_eq!(network.vertex_coords(&a), Some(Point::new(110.0, 120.0)));
    assert_eq!(network.vertex_coords(&b), Some(Point::new(160.0, 140.0)));
    assert_eq!(network.vertex_coords(&far), Some(Point::new(600.0, 500.0)));
    Ok(())
}
