//! Pointer/touch interaction: tracked raycast targets, hover state and click
//! dispatch.
//!
//! The manager keeps an explicit registry of interactive nodes instead of
//! scanning the scene graph, maintains one interaction point in normalised
//! device coordinates, and raycasts it against the registry once per frame.
//! Touch contacts are tracked per platform identifier so a quick tap can be
//! told apart from a drag.

use crate::animation::{Curve, Easing, Keyframe};
use crate::camera::{PerspectiveCamera, Viewport};
use crate::particles::{EmitterOptions, EmitterShape, ParticleSystem};
use crate::raycast::{self, Ray, RayHit};
use crate::scaler::{AnchorSpec, CanvasScaler};
use crate::scene::SceneGraph;
use crate::types::{NodeId, Range};
use glam::{Quat, Vec2, Vec3};
use std::sync::Arc;

/// Maximum duration of a touch contact that still counts as a tap.
const TAP_WINDOW_SECONDS: f32 = 0.5;

/// Interaction point parked off-screen (no pointer present).
const POINT_OFFSCREEN: Vec2 = Vec2::new(-2.0, -2.0);

/// One active touch contact.
#[derive(Copy, Clone, Debug)]
pub struct TouchRecord {
    pub identifier: u64,
    pub client_x: f32,
    pub client_y: f32,
    /// Manager clock time at touch start.
    pub start_time: f32,
    /// Cleared on the first move; a contact that moved is a drag, not a tap.
    pub allow_click: bool,
}

/// Click listeners receive the first raycast hit, or `None` when the click
/// landed on empty space.
pub type ClickListener = Box<dyn FnMut(Option<&RayHit>)>;

pub struct InteractManager {
    /// Globally suppresses raycasting (e.g. while a modal overlay is open).
    pub enabled: bool,
    tracked: Vec<NodeId>,
    interact_point: Vec2,
    hits: Vec<RayHit>,
    touches: Vec<TouchRecord>,
    listeners: Vec<(String, ClickListener)>,
    hover_anchor: NodeId,
    hover_emitter_node: NodeId,
    hover_particles: ParticleSystem,
    pointer_cursor: bool,
    clock: f32,
}

impl InteractManager {
    /// Creates the manager and its hover particle emitter, anchored to the
    /// centre of the given scaler.
    pub fn new(graph: &mut SceneGraph, scaler: &mut CanvasScaler) -> Self {
        let hover_anchor = graph.add_node();
        if let Some(node) = graph.get_mut(hover_anchor) {
            node.anchor = Some(AnchorSpec::centered());
        }
        scaler.attach_to_root(graph, hover_anchor);

        let hover_emitter_node = graph.spawn_child(hover_anchor);
        if let Some(node) = graph.get_mut(hover_emitter_node) {
            node.rotation = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        }

        let size_curve = Curve::new(vec![
            Keyframe::new(0.0, 1.0, Easing::Linear),
            Keyframe::new(0.3, 1.0, Easing::Exponential),
            Keyframe::new(1.0, 0.0, Easing::Linear),
        ]);

        let mut hover_particles = ParticleSystem::new(EmitterOptions {
            rate: 30.0,
            shape: EmitterShape::Rect {
                width: 1.0,
                height: 0.0,
            },
            lifetime: Range::new(0.3, 0.6),
            start_speed: Range::new(2.0, 4.0),
            start_size: Range::fixed(0.5),
            start_angle: Range::fixed(std::f32::consts::FRAC_PI_4),
            size_curve: Some(Arc::new(size_curve)),
        });
        hover_particles.pause();

        let point_scale = hover_particles.point_scale_handle();
        scaler.set_reposition_hook(hover_anchor, move |_, metrics| {
            point_scale.set(metrics.pixels_per_reference_unit());
        });

        Self {
            enabled: true,
            tracked: Vec::new(),
            interact_point: POINT_OFFSCREEN,
            hits: Vec::new(),
            touches: Vec::new(),
            listeners: Vec::new(),
            hover_anchor,
            hover_emitter_node,
            hover_particles,
            pointer_cursor: false,
            clock: 0.0,
        }
    }

    pub fn hover_anchor(&self) -> NodeId {
        self.hover_anchor
    }

    pub fn hover_particles(&self) -> &ParticleSystem {
        &self.hover_particles
    }

    /// Registers a node as a raycast target.
    pub fn track_object(&mut self, node: NodeId) {
        self.tracked.push(node);
    }

    pub fn untrack_object(&mut self, node: NodeId) {
        if let Some(pos) = self.tracked.iter().position(|&id| id == node) {
            self.tracked.remove(pos);
        }
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    /// Registers a click listener under a caller-supplied identity key so the
    /// owner can deregister independently. Registering an already-used key
    /// replaces the previous listener.
    pub fn add_click_listener(&mut self, key: &str, listener: impl FnMut(Option<&RayHit>) + 'static) {
        let boxed: ClickListener = Box::new(listener);
        if let Some(slot) = self.listeners.iter_mut().find(|(k, _)| k == key) {
            slot.1 = boxed;
        } else {
            self.listeners.push((key.to_owned(), boxed));
        }
    }

    pub fn remove_click_listener(&mut self, key: &str) {
        self.listeners.retain(|(k, _)| k != key);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The nearest raycast hit from the last update, if any.
    pub fn first_hit(&self) -> Option<&RayHit> {
        self.hits.first()
    }

    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    /// `true` while the pointer is over a tracked object; the host mirrors
    /// this into the cursor affordance.
    pub fn pointer_cursor(&self) -> bool {
        self.pointer_cursor
    }

    pub fn interact_point(&self) -> Vec2 {
        self.interact_point
    }

    pub fn active_touches(&self) -> &[TouchRecord] {
        &self.touches
    }

    pub fn on_mouse_over(&mut self, client_x: f32, client_y: f32, viewport: &Viewport) {
        self.hover_particles.play();
        self.interact_point = viewport.client_to_ndc(client_x, client_y);
    }

    pub fn on_mouse_out(&mut self) {
        self.hover_particles.pause();
    }

    pub fn on_mouse_move(&mut self, client_x: f32, client_y: f32, viewport: &Viewport) {
        self.interact_point = viewport.client_to_ndc(client_x, client_y);
    }

    /// Dispatches the current first hit (or `None`) to every listener.
    pub fn on_mouse_click(&mut self) {
        let hit = self.hits.first().copied();
        for (_, listener) in &mut self.listeners {
            listener(hit.as_ref());
        }
    }

    pub fn on_touch_start(&mut self, identifier: u64, client_x: f32, client_y: f32, viewport: &Viewport) {
        self.hover_particles.play();

        self.touches.push(TouchRecord {
            identifier,
            client_x,
            client_y,
            start_time: self.clock,
            allow_click: true,
        });

        self.interact_point = viewport.client_to_ndc(client_x, client_y);
    }

    pub fn on_touch_move(&mut self, identifier: u64, client_x: f32, client_y: f32, viewport: &Viewport) {
        let Some(touch) = self
            .touches
            .iter_mut()
            .find(|t| t.identifier == identifier)
        else {
            return;
        };

        touch.client_x = client_x;
        touch.client_y = client_y;
        touch.allow_click = false;

        self.interact_point = viewport.client_to_ndc(client_x, client_y);
    }

    /// Ends a touch contact. A contact that never moved and lasted less than
    /// the tap window refreshes the raycast at the current interaction point
    /// and synthesizes exactly one click.
    pub fn on_touch_end(
        &mut self,
        identifier: u64,
        graph: &mut SceneGraph,
        camera: &PerspectiveCamera,
        scaler: &CanvasScaler,
    ) {
        let Some(index) = self.touches.iter().position(|t| t.identifier == identifier) else {
            return;
        };

        let touch = self.touches[index];
        if touch.allow_click && self.clock - touch.start_time < TAP_WINDOW_SECONDS {
            // Make sure hit data reflects the final touch position.
            self.update(0.0, graph, camera, scaler);
            self.on_mouse_click();
        }

        self.interact_point = POINT_OFFSCREEN;
        self.touches.remove(index);

        if self.touches.is_empty() {
            self.hover_particles.pause();
        }
    }

    pub fn on_touch_cancel(&mut self, identifier: u64) {
        let Some(index) = self.touches.iter().position(|t| t.identifier == identifier) else {
            return;
        };

        self.interact_point = POINT_OFFSCREEN;
        self.touches.remove(index);

        if self.touches.is_empty() {
            self.hover_particles.pause();
        }
    }

    /// Per-frame update: advances the hover emitter, raycasts the interaction
    /// point against tracked objects (nearest hit first) and refreshes the
    /// cursor affordance. Must run before screens consume hit results.
    pub fn update(
        &mut self,
        dt: f32,
        graph: &mut SceneGraph,
        camera: &PerspectiveCamera,
        scaler: &CanvasScaler,
    ) {
        self.clock += dt;

        graph.set_position(
            self.hover_emitter_node,
            Vec3::new(
                self.interact_point.x * scaler.half_width(),
                self.interact_point.y * scaler.half_height(),
                0.0,
            ),
        );
        self.hover_particles.update(dt);

        self.hits.clear();
        if self.enabled {
            let ray = Ray::from_camera(camera, self.interact_point);
            raycast::intersect_nodes(&ray, graph, &self.tracked, &mut self.hits);
        }

        self.pointer_cursor = !self.hits.is_empty();
    }
}
