//! Canvas scaler and anchored placement tests.

use glam::Vec3;
use std::cell::Cell;
use std::rc::Rc;
use vitrine_engine::camera::{PerspectiveCamera, Viewport};
use vitrine_engine::overlay::OverlayItem;
use vitrine_engine::scaler::{AnchorSpec, CanvasScaler};
use vitrine_engine::scene::SceneGraph;
use vitrine_engine::types::{Orientation, OrientedValue};

const FOV: f32 = 60.0;
const DISTANCE: f32 = 10.0;

fn setup(width: f32, height: f32) -> (SceneGraph, PerspectiveCamera, Viewport, CanvasScaler) {
    let viewport = Viewport::new(width, height);
    let camera = PerspectiveCamera::new(FOV, viewport.aspect(), 0.1, 1000.0, DISTANCE);
    let mut graph = SceneGraph::new();
    let scaler = CanvasScaler::new(&mut graph, None, 20.0, 15.0, &camera, &viewport);
    (graph, camera, viewport, scaler)
}

/// True world extent of the focal plane, from the frustum geometry.
fn world_extent(aspect: f32) -> (f32, f32) {
    let height = 2.0 * DISTANCE * (FOV.to_radians() * 0.5).tan();
    (height * aspect, height)
}

#[test]
fn stored_extents_compensate_for_the_applied_scale() {
    for (width, height) in [(1920.0, 1080.0), (1280.0, 960.0), (720.0, 1280.0)] {
        for (ref_w, ref_h) in [(20.0, 15.0), (10.0, 10.0), (4.0, 32.0)] {
            let viewport = Viewport::new(width, height);
            let camera = PerspectiveCamera::new(FOV, viewport.aspect(), 0.1, 1000.0, DISTANCE);
            let mut graph = SceneGraph::new();
            let scaler = CanvasScaler::new(&mut graph, None, ref_w, ref_h, &camera, &viewport);

            let (true_width, true_height) = world_extent(viewport.aspect());
            let metrics = scaler.metrics();
            assert!(
                (metrics.width * metrics.scale - true_width).abs() < 1e-3,
                "width * scale must recover the true world width at {width}x{height} \
                 with reference {ref_w}x{ref_h}: {} * {} vs {true_width}",
                metrics.width,
                metrics.scale
            );
            assert!(
                (metrics.height * metrics.scale - true_height).abs() < 1e-3,
                "height * scale must recover the true world height at {width}x{height}"
            );
        }
    }
}

#[test]
fn pixels_per_world_unit_matches_the_canvas() {
    let (_, _, viewport, scaler) = setup(1920.0, 1080.0);
    let metrics = scaler.metrics();

    // pixels_per_world_unit is pre-division: it refers to raw world units.
    assert!(
        (metrics.pixels_per_world_unit * metrics.width * metrics.scale - viewport.width).abs()
            < 1e-2,
        "density times world width must span the canvas"
    );
}

#[test]
fn centred_anchor_lands_on_the_world_origin() {
    for (width, height) in [(1920.0, 1080.0), (1080.0, 1920.0), (500.0, 500.0)] {
        let (mut graph, _, _, mut scaler) = setup(width, height);

        let node = graph.add_node();
        graph.get_mut(node).unwrap().anchor = Some(AnchorSpec::centered());
        scaler.attach_to_root(&mut graph, node);

        let world = graph.world_position(node);
        assert!(
            world.length() < 1e-4,
            "anchor (0.5, 0.5) with no offset must sit at the origin, got {world} at {width}x{height}"
        );
    }
}

#[test]
fn anchor_corners_hit_the_frustum_edges() {
    let (mut graph, _, viewport, mut scaler) = setup(1600.0, 900.0);

    let node = graph.add_node();
    graph.get_mut(node).unwrap().anchor = Some(AnchorSpec::new(0.0, 0.0, 1.0, 1.0));
    scaler.attach_to_root(&mut graph, node);

    let world = graph.world_position(node);
    let (true_width, true_height) = world_extent(viewport.aspect());
    assert!((world.x - true_width * 0.5).abs() < 1e-3, "right edge, got {}", world.x);
    assert!((world.y - true_height * 0.5).abs() < 1e-3, "top edge, got {}", world.y);
}

#[test]
fn negate_scaler_scale_cancels_the_reference_zoom() {
    let (mut graph, _, _, mut scaler) = setup(1920.0, 1080.0);

    let negated = graph.add_node();
    graph.get_mut(negated).unwrap().anchor =
        Some(AnchorSpec::new(1.5, -2.0, 0.25, 0.75).negate_scale());
    scaler.attach_to_root(&mut graph, negated);

    let metrics = *scaler.metrics();
    let node = graph.get(negated).unwrap();
    assert!(
        (node.scale.x - 1.0 / metrics.scale).abs() < 1e-5,
        "negated child carries the reciprocal scale"
    );

    // The scaler's zoom cancels end to end: the node's world transform works
    // in raw world units, so its rendered pixel size never follows the
    // reference scaling.
    let world = graph.world_position(negated);
    let expected = Vec3::new(
        0.25 * metrics.width + 1.5 - metrics.half_width,
        0.75 * metrics.height - 2.0 - metrics.half_height,
        0.0,
    );
    assert!(
        (world - expected).length() < 1e-3,
        "anchor math lands in raw units: {world} vs {expected}"
    );

    let world_scale = metrics.scale * node.scale.x;
    assert!((world_scale - 1.0).abs() < 1e-5, "unit content stays unit-sized");
}

#[test]
fn attach_repositions_new_subtrees_immediately() {
    let (mut graph, _, _, mut scaler) = setup(1920.0, 1080.0);

    let group = graph.add_node();
    let child = graph.add_node();
    graph.get_mut(child).unwrap().anchor = Some(AnchorSpec::new(0.0, 0.0, 1.0, 0.5));
    graph.add_child(group, child);

    assert_eq!(graph.get(child).unwrap().position, Vec3::ZERO);

    scaler.attach_to_root(&mut graph, group);
    let position = graph.get(child).unwrap().position;
    assert!(
        (position.x - scaler.half_width()).abs() < 1e-4,
        "anchored child positioned at insertion time, got {position}"
    );
}

#[test]
fn resize_cascades_to_anchored_nodes_then_notifies() {
    let (mut graph, mut camera, _, mut scaler) = setup(1600.0, 900.0);

    let node = graph.add_node();
    graph.get_mut(node).unwrap().anchor = Some(AnchorSpec::new(0.0, 0.0, 1.0, 0.5));
    scaler.attach_to_root(&mut graph, node);
    let before = graph.get(node).unwrap().position;

    let notified = Rc::new(Cell::new(0u32));
    let notify_flag = Rc::clone(&notified);
    scaler.add_notify(move |_| notify_flag.set(notify_flag.get() + 1), false);

    // Rotate the canvas to portrait.
    let viewport = Viewport::new(900.0, 1600.0);
    camera.set_aspect(viewport.aspect());
    scaler.update_scale(&mut graph, &camera, &viewport);

    let after = graph.get(node).unwrap().position;
    assert_ne!(before, after, "anchored node must follow the new extents");
    assert_eq!(notified.get(), 1, "notify callbacks run after a recompute");

    scaler.update_scale(&mut graph, &camera, &viewport);
    assert_eq!(notified.get(), 2);
}

#[test]
fn notify_call_now_and_removal() {
    let (mut graph, camera, viewport, mut scaler) = setup(800.0, 600.0);

    let count = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&count);
    let id = scaler.add_notify(move |_| counter.set(counter.get() + 1), true);
    assert_eq!(count.get(), 1, "call_now runs the callback immediately");

    scaler.remove_notify(id);
    scaler.update_scale(&mut graph, &camera, &viewport);
    assert_eq!(count.get(), 1, "removed callbacks stay silent");
}

#[test]
fn orientation_dependent_anchors_resolve_per_viewport() {
    let spec = AnchorSpec {
        ref_x: OrientedValue::Fixed(0.0),
        ref_y: OrientedValue::Fixed(0.0),
        anchor_x: OrientedValue::PerOrientation {
            landscape: 0.25,
            portrait: 0.5,
        },
        anchor_y: OrientedValue::Fixed(0.5),
        negate_scaler_scale: false,
    };

    let (mut graph, _, viewport, mut scaler) = setup(1920.0, 1080.0);
    assert_eq!(viewport.orientation(), Orientation::Landscape);

    let node = graph.add_node();
    graph.get_mut(node).unwrap().anchor = Some(spec);
    scaler.attach_to_root(&mut graph, node);

    let landscape_x = graph.get(node).unwrap().position.x;
    let expected = 0.25 * scaler.width() - scaler.half_width();
    assert!((landscape_x - expected).abs() < 1e-4);

    let (mut graph, _, viewport, mut scaler) = setup(1080.0, 1920.0);
    assert_eq!(viewport.orientation(), Orientation::Portrait);

    let node = graph.add_node();
    graph.get_mut(node).unwrap().anchor = Some(spec);
    scaler.attach_to_root(&mut graph, node);

    let portrait_x = graph.get(node).unwrap().position.x;
    assert!(
        portrait_x.abs() < 1e-4,
        "portrait resolves anchor_x 0.5 (centre), got {portrait_x}"
    );
}

#[test]
fn reposition_hook_fires_with_fresh_metrics() {
    let (mut graph, camera, viewport, mut scaler) = setup(1024.0, 768.0);

    let node = graph.add_node();
    graph.get_mut(node).unwrap().anchor = Some(AnchorSpec::centered());
    scaler.attach_to_root(&mut graph, node);

    let density = Rc::new(Cell::new(0.0f32));
    let sink = Rc::clone(&density);
    scaler.set_reposition_hook(node, move |_, metrics| {
        sink.set(metrics.pixels_per_reference_unit());
    });

    scaler.update_scale(&mut graph, &camera, &viewport);
    let expected = scaler.metrics().pixels_per_reference_unit();
    assert!(
        (density.get() - expected).abs() < 1e-4,
        "hook observes the recomputed density"
    );
}

#[test]
fn overlay_projects_the_origin_to_the_canvas_centre() {
    let (mut graph, camera, viewport, mut scaler) = setup(1280.0, 720.0);

    let node = graph.add_node();
    graph.get_mut(node).unwrap().anchor = Some(AnchorSpec::centered());
    scaler.attach_to_root(&mut graph, node);

    let mut overlay = OverlayItem::new(node);
    overlay.update(&graph, &camera, &viewport, &scaler);

    let placement = overlay.placement();
    assert!(placement.visible);
    assert!((placement.x_px - 640.0).abs() < 1e-2, "got {}", placement.x_px);
    assert!((placement.y_px - 360.0).abs() < 1e-2, "got {}", placement.y_px);
    assert!(placement.scale > 0.0);
}
