//! Screen-space placement for host-rendered overlay content.
//!
//! DOM text, images and video players live outside the scene; the engine only
//! computes where they belong. Each [`OverlayItem`] follows a scene node and
//! projects its world position into canvas pixel coordinates every frame; the
//! host applies the resulting [`ScreenPlacement`] to its own elements.

use crate::camera::{PerspectiveCamera, Viewport};
use crate::scaler::CanvasScaler;
use crate::scene::SceneGraph;
use crate::types::NodeId;

/// Pixel-space placement of one overlay element.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScreenPlacement {
    /// Canvas pixel coordinates of the followed node, origin top-left.
    pub x_px: f32,
    pub y_px: f32,
    /// Pixels per world unit at the node, for sizing overlay content.
    pub scale: f32,
    /// `false` when the node is gone or behind the camera.
    pub visible: bool,
}

/// An overlay element following a scene node.
#[derive(Clone, Debug)]
pub struct OverlayItem {
    node: NodeId,
    /// Pivot within the element, as fractions of its own size.
    pub pivot_x: f32,
    pub pivot_y: f32,
    placement: ScreenPlacement,
}

impl OverlayItem {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            pivot_x: 0.5,
            pivot_y: 0.5,
            placement: ScreenPlacement {
                x_px: 0.0,
                y_px: 0.0,
                scale: 1.0,
                visible: false,
            },
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn placement(&self) -> &ScreenPlacement {
        &self.placement
    }

    /// Recomputes the placement from the node's current world position.
    pub fn update(
        &mut self,
        graph: &SceneGraph,
        camera: &PerspectiveCamera,
        viewport: &Viewport,
        scaler: &CanvasScaler,
    ) {
        if !graph.contains(self.node) || !graph.effectively_visible(self.node) {
            self.placement.visible = false;
            return;
        }

        let world = graph.world_position(self.node);
        let ndc = camera.project(world);

        // Behind the camera the projection flips; hide rather than mirror.
        if ndc.z > 1.0 || ndc.z < 0.0 {
            self.placement.visible = false;
            return;
        }

        let pixels = viewport.ndc_to_client(ndc.x, ndc.y);

        self.placement = ScreenPlacement {
            x_px: pixels.x,
            y_px: pixels.y,
            scale: scaler.pixels_per_world_unit(),
            visible: true,
        };
    }
}
