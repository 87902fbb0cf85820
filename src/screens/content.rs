//! Content entries hosted by app screen tabs.
//!
//! Each entry is an anchored node with its own animator; the closed
//! [`ContentKind`] registry maps configuration entries to concrete items at
//! construction time.

use crate::animation::{AnimationTracks, Curve, Easing, Keyframe, KeyValue, Track, TracksHandle};
use crate::animator::{Animator, BindingTable};
use crate::config::{ContentConfig, ContentKind};
use crate::scaler::AnchorSpec;
use crate::scene::HitShape;
use crate::overlay::OverlayItem;
use crate::stage::Stage;
use crate::types::NodeId;
use std::sync::OnceLock;
use tracing::warn;

/// Contract between a tabbed screen and each content entry it hosts.
pub trait ContentItem {
    fn show(&mut self, stage: &mut Stage);
    fn hide(&mut self, stage: &mut Stage);
    fn update(&mut self, dt: f32, stage: &mut Stage);
    /// Offered every click the owning screen could not resolve itself.
    fn process_click(&mut self, _hit: Option<NodeId>, _stage: &mut Stage) {}
    fn dispose(&mut self, stage: &mut Stage);
}

/// Resolves a configuration entry into a concrete content item.
pub fn create_content_item(
    stage: &mut Stage,
    parent: NodeId,
    config: &ContentConfig,
) -> Box<dyn ContentItem> {
    match config.kind {
        ContentKind::Text => Box::new(TextPanel::new(stage, parent, config)),
        ContentKind::Image => Box::new(ImagePanel::new(stage, parent, config)),
    }
}

/// Animated properties shared by both panel kinds.
#[derive(Clone, Debug, Default)]
struct PanelVisual {
    scale: f32,
}

fn panel_bindings() -> BindingTable<PanelVisual> {
    BindingTable::new().bind_with_accessor(
        "scale",
        |visual, value| {
            if let Some(scale) = value.as_scalar() {
                visual.scale = scale;
            }
        },
        |visual| KeyValue::Scalar(visual.scale),
    )
}

struct PanelAnimations {
    show: TracksHandle,
    hide: TracksHandle,
    expand: TracksHandle,
    collapse: TracksHandle,
}

fn panel_animations() -> &'static PanelAnimations {
    static ANIMATIONS: OnceLock<PanelAnimations> = OnceLock::new();
    ANIMATIONS.get_or_init(|| PanelAnimations {
        show: AnimationTracks::new()
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 0.0, Easing::InvExponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.25,
                ),
            )
            .into_handle(),
        hide: AnimationTracks::new()
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::Exponential),
                        Keyframe::new(1.0, 0.0, Easing::Linear),
                    ]),
                    0.15,
                ),
            )
            .into_handle(),
        expand: AnimationTracks::new()
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::InvExponential),
                        Keyframe::new(1.0, 2.2, Easing::Linear),
                    ]),
                    0.2,
                ),
            )
            .into_handle(),
        collapse: AnimationTracks::new()
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::Exponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.15,
                ),
            )
            .into_handle(),
    })
}

fn anchor_from_config(config: &ContentConfig) -> AnchorSpec {
    AnchorSpec {
        ref_x: config.ref_x,
        ref_y: config.ref_y,
        anchor_x: config.anchor_x,
        anchor_y: config.anchor_y,
        negate_scaler_scale: false,
    }
}

/// Body copy projected into screen space for the host's DOM layer.
pub struct TextPanel {
    node: NodeId,
    text: String,
    overlay: OverlayItem,
    visual: PanelVisual,
    animator: Animator<PanelVisual>,
}

impl TextPanel {
    pub fn new(stage: &mut Stage, parent: NodeId, config: &ContentConfig) -> Self {
        let node = stage.graph.add_node();
        if let Some(scene_node) = stage.graph.get_mut(node) {
            scene_node.anchor = Some(anchor_from_config(config));
            scene_node.visible = false;
        }
        stage
            .content_scaler
            .attach(&mut stage.graph, parent, node);

        Self {
            node,
            text: config.text.clone().unwrap_or_default(),
            overlay: OverlayItem::new(node),
            visual: PanelVisual { scale: 0.0 },
            animator: Animator::new(panel_bindings()),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn placement(&self) -> &crate::overlay::ScreenPlacement {
        self.overlay.placement()
    }
}

impl ContentItem for TextPanel {
    fn show(&mut self, stage: &mut Stage) {
        if let Some(node) = stage.graph.get_mut(self.node) {
            node.visible = true;
        }
        self.animator.play(&panel_animations().show);
    }

    fn hide(&mut self, _stage: &mut Stage) {
        self.animator.play(&panel_animations().hide);
    }

    fn update(&mut self, dt: f32, stage: &mut Stage) {
        if let Some(done) = self.animator.update(dt, &mut self.visual) {
            if crate::animation::same_tracks(&done, &panel_animations().hide) {
                if let Some(node) = stage.graph.get_mut(self.node) {
                    node.visible = false;
                }
            }
        }

        stage
            .graph
            .set_uniform_scale(self.node, self.visual.scale.max(0.0));

        self.overlay.update(
            &stage.graph,
            &stage.content_camera,
            &stage.viewport,
            &stage.content_scaler,
        );
    }

    fn dispose(&mut self, stage: &mut Stage) {
        stage.graph.destroy_node(self.node);
    }
}

/// A raycast-tracked thumbnail that expands in place when clicked.
pub struct ImagePanel {
    node: NodeId,
    resource: Option<String>,
    expanded: bool,
    visual: PanelVisual,
    animator: Animator<PanelVisual>,
}

impl ImagePanel {
    pub fn new(stage: &mut Stage, parent: NodeId, config: &ContentConfig) -> Self {
        let node = stage.graph.add_node();
        if let Some(scene_node) = stage.graph.get_mut(node) {
            scene_node.anchor = Some(anchor_from_config(config));
            scene_node.hit_shape = Some(HitShape::Rect {
                width: config.width,
                height: config.height,
            });
            scene_node.visible = false;
        }
        stage
            .content_scaler
            .attach(&mut stage.graph, parent, node);

        // Warm the texture cache; a missing resource degrades to an untextured
        // quad rather than blocking the screen.
        let resource = config.resource.clone();
        if let Some(path) = &resource {
            if stage.assets.load(path).is_err() {
                warn!(path = %path, "image panel resource unavailable");
            }
        }

        Self {
            node,
            resource,
            expanded: false,
            visual: PanelVisual { scale: 0.0 },
            animator: Animator::new(panel_bindings()),
        }
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl ContentItem for ImagePanel {
    fn show(&mut self, stage: &mut Stage) {
        if let Some(node) = stage.graph.get_mut(self.node) {
            node.visible = true;
        }
        stage.interact.track_object(self.node);
        self.expanded = false;
        self.animator.play(&panel_animations().show);
    }

    fn hide(&mut self, stage: &mut Stage) {
        stage.interact.untrack_object(self.node);
        self.animator.play(&panel_animations().hide);
    }

    fn update(&mut self, dt: f32, stage: &mut Stage) {
        if let Some(done) = self.animator.update(dt, &mut self.visual) {
            if crate::animation::same_tracks(&done, &panel_animations().hide) {
                if let Some(node) = stage.graph.get_mut(self.node) {
                    node.visible = false;
                }
            }
        }

        stage
            .graph
            .set_uniform_scale(self.node, self.visual.scale.max(0.0));
    }

    fn process_click(&mut self, hit: Option<NodeId>, _stage: &mut Stage) {
        match hit {
            Some(node) if node == self.node => {
                let animations = panel_animations();
                self.expanded = !self.expanded;
                self.animator.play(if self.expanded {
                    &animations.expand
                } else {
                    &animations.collapse
                });
            }
            // A click elsewhere collapses an expanded panel.
            _ if self.expanded => {
                self.expanded = false;
                self.animator.play(&panel_animations().collapse);
            }
            _ => {}
        }
    }

    fn dispose(&mut self, stage: &mut Stage) {
        stage.interact.untrack_object(self.node);
        stage.graph.destroy_node(self.node);
    }
}
