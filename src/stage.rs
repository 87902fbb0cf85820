//! The composition root: scene graph, cameras, scalers, interaction and
//! assets for one canvas.

use crate::assets::{AssetCache, AssetLoader};
use crate::camera::{PerspectiveCamera, Viewport};
use crate::interact::InteractManager;
use crate::scaler::CanvasScaler;
use crate::scene::SceneGraph;
use std::sync::Arc;

/// Reference design-space width, in world units.
pub const REF_WIDTH: f32 = 20.0;
/// Reference design-space height, in world units.
pub const REF_HEIGHT: f32 = 15.0;

const CONTENT_FOV_DEGREES: f32 = 60.0;
const HUD_FOV_DEGREES: f32 = 10.0;
const CAMERA_NEAR: f32 = 0.1;
const CAMERA_FAR: f32 = 1000.0;
const CAMERA_DISTANCE: f32 = 10.0;

/// Owns the presentation state shared by every screen: the scene graph, one
/// content and one HUD camera/scaler pair, the interaction manager and the
/// asset cache.
pub struct Stage {
    pub viewport: Viewport,
    pub graph: SceneGraph,
    pub content_camera: PerspectiveCamera,
    pub hud_camera: PerspectiveCamera,
    pub content_scaler: CanvasScaler,
    pub hud_scaler: CanvasScaler,
    pub interact: InteractManager,
    pub assets: AssetCache,
}

impl Stage {
    pub fn new(canvas_width: f32, canvas_height: f32, loader: Arc<dyn AssetLoader>) -> Self {
        let viewport = Viewport::new(canvas_width, canvas_height);
        let aspect = viewport.aspect();

        let content_camera = PerspectiveCamera::new(
            CONTENT_FOV_DEGREES,
            aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
            CAMERA_DISTANCE,
        );
        let hud_camera = PerspectiveCamera::new(
            HUD_FOV_DEGREES,
            aspect,
            CAMERA_NEAR,
            CAMERA_FAR,
            CAMERA_DISTANCE,
        );

        let mut graph = SceneGraph::new();

        let mut content_scaler = CanvasScaler::new(
            &mut graph,
            None,
            REF_WIDTH,
            REF_HEIGHT,
            &content_camera,
            &viewport,
        );
        let hud_scaler = CanvasScaler::new(
            &mut graph,
            None,
            REF_WIDTH,
            REF_HEIGHT,
            &hud_camera,
            &viewport,
        );

        let interact = InteractManager::new(&mut graph, &mut content_scaler);

        Self {
            viewport,
            graph,
            content_camera,
            hud_camera,
            content_scaler,
            hud_scaler,
            interact,
            assets: AssetCache::new(loader),
        }
    }

    /// Applies a canvas client-size change: camera aspects first, then both
    /// scalers recompute and cascade to anchored content. A no-op when the
    /// size is unchanged. Must run before anything reads camera-dependent
    /// metrics this frame.
    pub fn resize_if_needed(&mut self, canvas_width: f32, canvas_height: f32) {
        let viewport = Viewport::new(canvas_width, canvas_height);
        if viewport == self.viewport {
            return;
        }

        self.viewport = viewport;
        let aspect = viewport.aspect();
        self.content_camera.set_aspect(aspect);
        self.hud_camera.set_aspect(aspect);

        self.content_scaler
            .update_scale(&mut self.graph, &self.content_camera, &self.viewport);
        self.hud_scaler
            .update_scale(&mut self.graph, &self.hud_camera, &self.viewport);
    }

    /// Advances the interaction manager against the content camera. Runs
    /// before screen updates so hit results are fresh for this frame.
    pub fn update_interactions(&mut self, dt: f32) {
        self.interact.update(
            dt,
            &mut self.graph,
            &self.content_camera,
            &self.content_scaler,
        );
    }
}
