//! Canvas-to-world scaling and anchored placement.
//!
//! A [`CanvasScaler`] owns one root node in the scene graph and maintains the
//! mapping between canvas pixel space and a fixed-reference world coordinate
//! system. Descendant nodes carrying an [`AnchorSpec`] are positioned from
//! orientation-resolved anchor fractions and reference offsets, and are
//! repositioned every time the scaler recomputes.
//!
//! Which scaler owns an anchored node is a composition-time fact: nodes enter
//! a scaler's scope by being [`CanvasScaler::attach`]ed into its subtree.

use crate::camera::{PerspectiveCamera, Viewport};
use crate::scene::SceneGraph;
use crate::types::{NodeId, Orientation, OrientedValue};
use glam::Vec3;

/// Anchor-relative placement options for a scene node.
///
/// Position per axis = `anchor * scaler_extent + ref - half_extent`: an anchor
/// fraction of the scaler's world area plus a fixed world-unit offset,
/// recentred.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct AnchorSpec {
    pub ref_x: OrientedValue,
    pub ref_y: OrientedValue,
    pub anchor_x: OrientedValue,
    pub anchor_y: OrientedValue,
    /// Cancels the scaler's uniform scale on this node, producing a child
    /// that keeps a fixed pixel size regardless of reference-resolution zoom.
    pub negate_scaler_scale: bool,
}

impl AnchorSpec {
    pub fn new(
        ref_x: impl Into<OrientedValue>,
        ref_y: impl Into<OrientedValue>,
        anchor_x: impl Into<OrientedValue>,
        anchor_y: impl Into<OrientedValue>,
    ) -> Self {
        Self {
            ref_x: ref_x.into(),
            ref_y: ref_y.into(),
            anchor_x: anchor_x.into(),
            anchor_y: anchor_y.into(),
            negate_scaler_scale: false,
        }
    }

    /// Centre of the scaler area with no offset.
    pub fn centered() -> Self {
        Self::new(0.0, 0.0, 0.5, 0.5)
    }

    pub fn negate_scale(mut self) -> Self {
        self.negate_scaler_scale = true;
        self
    }
}

/// Derived scaling metrics, recomputed by [`CanvasScaler::update_scale`].
///
/// Extents are stored in *unscaled* reference units (already divided by the
/// applied scale) so anchor math stays resolution-independent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScalerMetrics {
    pub width: f32,
    pub height: f32,
    pub half_width: f32,
    pub half_height: f32,
    /// Canvas pixels per world unit at the focal plane, before the reference
    /// scale division.
    pub pixels_per_world_unit: f32,
    /// Uniform scale applied to the scaler's root node.
    pub scale: f32,
    pub orientation: Orientation,
}

impl ScalerMetrics {
    /// Canvas pixels per reference unit, i.e. the pre-division density times
    /// the applied scale. Point-size uniforms are expressed in these units.
    pub fn pixels_per_reference_unit(&self) -> f32 {
        self.pixels_per_world_unit * self.scale
    }
}

impl Default for ScalerMetrics {
    fn default() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            half_width: 0.0,
            half_height: 0.0,
            pixels_per_world_unit: 0.0,
            scale: 1.0,
            orientation: Orientation::Landscape,
        }
    }
}

/// Identifier for a registered notify callback.
pub type NotifyId = usize;

type NotifyFn = Box<dyn FnMut(&ScalerMetrics)>;
type RepositionHook = Box<dyn FnMut(NodeId, &ScalerMetrics)>;

/// Maintains the mapping between canvas pixels and the fixed-reference world
/// coordinate system, and keeps anchored descendants positioned.
pub struct CanvasScaler {
    root: NodeId,
    ref_width: f32,
    ref_height: f32,
    metrics: ScalerMetrics,
    notifies: Vec<(NotifyId, NotifyFn)>,
    next_notify: NotifyId,
    reposition_hooks: Vec<(NodeId, RepositionHook)>,
}

impl CanvasScaler {
    /// Creates the scaler's root node under `parent` and computes the initial
    /// scale.
    pub fn new(
        graph: &mut SceneGraph,
        parent: Option<NodeId>,
        ref_width: f32,
        ref_height: f32,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
    ) -> Self {
        let root = graph.add_node();
        if let Some(parent) = parent {
            graph.add_child(parent, root);
        }

        let mut scaler = Self {
            root,
            ref_width,
            ref_height,
            metrics: ScalerMetrics::default(),
            notifies: Vec::new(),
            next_notify: 0,
            reposition_hooks: Vec::new(),
        };
        scaler.update_scale(graph, camera, viewport);
        scaler
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn metrics(&self) -> &ScalerMetrics {
        &self.metrics
    }

    pub fn width(&self) -> f32 {
        self.metrics.width
    }

    pub fn height(&self) -> f32 {
        self.metrics.height
    }

    pub fn half_width(&self) -> f32 {
        self.metrics.half_width
    }

    pub fn half_height(&self) -> f32 {
        self.metrics.half_height
    }

    pub fn pixels_per_world_unit(&self) -> f32 {
        self.metrics.pixels_per_world_unit
    }

    /// Recomputes the world extents and scale from the camera frustum and
    /// canvas dimensions, then repositions every anchored descendant and
    /// invokes the registered notify callbacks (descendants first).
    ///
    /// Must run on construction and whenever the canvas client size changes.
    pub fn update_scale(
        &mut self,
        graph: &mut SceneGraph,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
    ) {
        let bottom_left = camera.ndc_to_focal_plane(-1.0, -1.0);
        let top_right = camera.ndc_to_focal_plane(1.0, 1.0);

        let mut width = top_right.x - bottom_left.x;
        let mut height = top_right.y - bottom_left.y;
        let pixels_per_world_unit = viewport.width / width;

        let short_size = width.min(height);
        let short_ref_size = self.ref_width.min(self.ref_height);
        let scale = short_size / short_ref_size;

        graph.set_uniform_scale(self.root, scale);

        // Compensate for the scale now applied to the root so descendants
        // keep working in reference units.
        width /= scale;
        height /= scale;

        self.metrics = ScalerMetrics {
            width,
            height,
            half_width: width * 0.5,
            half_height: height * 0.5,
            pixels_per_world_unit,
            scale,
            orientation: viewport.orientation(),
        };

        for id in graph.descendants(self.root) {
            self.update_position(graph, id);
        }

        let metrics = self.metrics;
        for (_, notify) in &mut self.notifies {
            notify(&metrics);
        }
    }

    /// Inserts `child` under `parent` within this scaler's scope and eagerly
    /// repositions any anchored node in the added subtree, so content created
    /// after the last resize still lands in the right place.
    pub fn attach(&mut self, graph: &mut SceneGraph, parent: NodeId, child: NodeId) {
        graph.add_child(parent, child);
        for id in graph.descendants(child) {
            self.update_position(graph, id);
        }
    }

    /// As [`CanvasScaler::attach`] with the scaler root as the parent.
    pub fn attach_to_root(&mut self, graph: &mut SceneGraph, child: NodeId) {
        let root = self.root;
        self.attach(graph, root, child);
    }

    /// Resolves an anchored node's position from its [`AnchorSpec`] and the
    /// current metrics, then runs the node's reposition hook if one is set.
    /// Nodes without an anchor are left untouched.
    pub fn update_position(&mut self, graph: &mut SceneGraph, id: NodeId) {
        let spec = match graph.get(id).and_then(|node| node.anchor) {
            Some(spec) => spec,
            None => return,
        };

        let m = self.metrics;
        let orientation = m.orientation;

        let mut position = Vec3::new(
            spec.anchor_x.resolve(orientation) * m.width + spec.ref_x.resolve(orientation)
                - m.half_width,
            spec.anchor_y.resolve(orientation) * m.height + spec.ref_y.resolve(orientation)
                - m.half_height,
            0.0,
        );

        if let Some(node) = graph.get_mut(id) {
            if spec.negate_scaler_scale {
                position /= m.scale;
                node.scale = Vec3::splat(1.0 / m.scale);
            }
            node.position = position;
        }

        for (hook_id, hook) in &mut self.reposition_hooks {
            if *hook_id == id {
                hook(id, &m);
            }
        }
    }

    /// Merges a change into the node's anchor options and immediately
    /// re-resolves its position.
    pub fn update_anchor(
        &mut self,
        graph: &mut SceneGraph,
        id: NodeId,
        merge: impl FnOnce(&mut AnchorSpec),
    ) {
        if let Some(node) = graph.get_mut(id) {
            let mut spec = node.anchor.unwrap_or_default();
            merge(&mut spec);
            node.anchor = Some(spec);
        }
        self.update_position(graph, id);
    }

    /// Registers a callback invoked after every recompute. When `call_now` is
    /// set the callback also runs immediately with the current metrics.
    pub fn add_notify(
        &mut self,
        mut notify: impl FnMut(&ScalerMetrics) + 'static,
        call_now: bool,
    ) -> NotifyId {
        if call_now {
            notify(&self.metrics);
        }
        let id = self.next_notify;
        self.next_notify += 1;
        self.notifies.push((id, Box::new(notify)));
        id
    }

    pub fn remove_notify(&mut self, id: NotifyId) {
        self.notifies.retain(|(notify_id, _)| *notify_id != id);
    }

    /// Attaches a hook run whenever the given node is repositioned, used to
    /// keep pixel-density-dependent state (point size uniforms) in sync.
    pub fn set_reposition_hook(
        &mut self,
        node: NodeId,
        hook: impl FnMut(NodeId, &ScalerMetrics) + 'static,
    ) {
        self.clear_reposition_hook(node);
        self.reposition_hooks.push((node, Box::new(hook)));
    }

    pub fn clear_reposition_hook(&mut self, node: NodeId) {
        self.reposition_hooks.retain(|(id, _)| *id != node);
    }
}
