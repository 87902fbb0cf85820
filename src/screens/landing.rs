//! The landing menu: one interactive item per app route, plus the HUD title.
//!
//! Items rise in with staggered delays, react to hover, and carry the click
//! origin through to the destination screen. The landing screen itself is a
//! singleton owned by the navigation layer — it hides and shows but is never
//! disposed.

use crate::animation::{
    AnimationTracks, Curve, Easing, Keyframe, KeyValue, Track, TracksHandle,
};
use crate::animator::{Animator, BindingTable};
use crate::config::SiteConfig;
use crate::overlay::OverlayItem;
use crate::raycast::RayHit;
use crate::scaler::AnchorSpec;
use crate::scene::HitShape;
use crate::screen::{HideToken, NavLink, Screen};
use crate::stage::Stage;
use crate::types::{NodeId, OrientedValue, OriginData, Range};
use glam::{Quat, Vec3, Vec4};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

const LISTENER_KEY: &str = "landing_screen";
const SHOW_STAGGER_SECONDS: f32 = 0.1;

/// Animated properties of one landing item. `coords` packs the anchor
/// placement as (ref_x, ref_y, anchor_x, anchor_y); `rest` is the item's
/// home placement, substituted for unresolved keyframes.
#[derive(Clone, Debug)]
struct ItemVisual {
    coords: Vec4,
    rest: Vec4,
    scale: f32,
}

fn item_bindings() -> BindingTable<ItemVisual> {
    BindingTable::new()
        .bind_with_accessor(
            "position",
            |visual: &mut ItemVisual, value: KeyValue| {
                if let Some(coords) = value.as_vec4() {
                    visual.coords = coords;
                }
            },
            |visual| KeyValue::Vector4(visual.rest),
        )
        .bind_with_accessor(
            "scale",
            |visual, value| {
                if let Some(scale) = value.as_scalar() {
                    visual.scale = scale;
                }
            },
            |visual| KeyValue::Scalar(visual.scale),
        )
}

struct ItemAnimations {
    show: TracksHandle,
    hide: TracksHandle,
    selected: TracksHandle,
    deselected: TracksHandle,
    enter: TracksHandle,
    exit: TracksHandle,
}

/// Items sink towards this placement when hidden: below the lower edge,
/// gathered around the horizontal centre.
const HIDDEN_COORDS: Vec4 = Vec4::new(0.0, -3.0, 0.5, -0.2);
/// Screen centre, where the clicked item grows while its app takes over.
const CENTER_COORDS: Vec4 = Vec4::new(0.0, 0.0, 0.5, 0.5);

fn item_animations() -> &'static ItemAnimations {
    static ANIMATIONS: OnceLock<ItemAnimations> = OnceLock::new();
    ANIMATIONS.get_or_init(|| ItemAnimations {
        show: AnimationTracks::new()
            .with_track(
                "position",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, HIDDEN_COORDS, Easing::InvExponential),
                        Keyframe::unresolved(1.0, Easing::Linear),
                    ]),
                    Range::new(0.3, 0.6),
                ),
            )
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 0.0, Easing::InvExponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    Range::new(0.3, 0.6),
                ),
            )
            .into_handle(),
        hide: AnimationTracks::new()
            .with_track(
                "position",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::Exponential),
                        Keyframe::new(1.0, HIDDEN_COORDS, Easing::Linear),
                    ]),
                    Range::new(0.2, 0.4),
                ),
            )
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::Exponential),
                        Keyframe::new(1.0, 0.0, Easing::Linear),
                    ]),
                    Range::new(0.2, 0.4),
                ),
            )
            .into_handle(),
        selected: AnimationTracks::new()
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::InvExponential),
                        Keyframe::new(1.0, 1.15, Easing::Linear),
                    ]),
                    0.15,
                ),
            )
            .into_handle(),
        deselected: AnimationTracks::new()
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::Exponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.1,
                ),
            )
            .into_handle(),
        enter: AnimationTracks::new()
            .with_track(
                "position",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::InvExponential),
                        Keyframe::new(1.0, CENTER_COORDS, Easing::Linear),
                    ]),
                    0.25,
                ),
            )
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::InvExponential),
                        Keyframe::new(1.0, 1.6, Easing::Linear),
                    ]),
                    0.25,
                ),
            )
            .into_handle(),
        exit: AnimationTracks::new()
            .with_track(
                "position",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, CENTER_COORDS, Easing::Exponential),
                        Keyframe::unresolved(1.0, Easing::Linear),
                    ]),
                    0.2,
                ),
            )
            .with_track(
                "scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::unresolved(0.0, Easing::Exponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.2,
                ),
            )
            .into_handle(),
    })
}

/// One interactive menu item: an anchored cube with an orbit ring.
pub struct LandingItem {
    title: String,
    anchor: NodeId,
    cube: NodeId,
    ring: NodeId,
    visual: ItemVisual,
    animator: Animator<ItemVisual>,
    next_animation: Option<TracksHandle>,
    attached: bool,
    spin_angle: f32,
    spin_speed: f32,
    orbit_angle: f32,
    orbit_speed: f32,
}

impl LandingItem {
    fn new(stage: &mut Stage, title: &str, index: usize, count: usize) -> Self {
        let fraction = (index as f32 + 1.0) / (count as f32 + 1.0);

        // Items line up horizontally in landscape, vertically in portrait.
        let spec = AnchorSpec {
            ref_x: OrientedValue::Fixed(0.0),
            ref_y: OrientedValue::Fixed(0.0),
            anchor_x: OrientedValue::PerOrientation {
                landscape: fraction,
                portrait: 0.5,
            },
            anchor_y: OrientedValue::PerOrientation {
                landscape: 0.5,
                portrait: 1.0 - fraction,
            },
            negate_scaler_scale: false,
        };

        let orientation = stage.viewport.orientation();
        let rest = Vec4::new(
            spec.ref_x.resolve(orientation),
            spec.ref_y.resolve(orientation),
            spec.anchor_x.resolve(orientation),
            spec.anchor_y.resolve(orientation),
        );

        let anchor = stage.graph.add_node();
        if let Some(node) = stage.graph.get_mut(anchor) {
            node.anchor = Some(spec);
            node.scale = Vec3::ZERO;
        }

        let cube = stage.graph.spawn_child(anchor);
        if let Some(node) = stage.graph.get_mut(cube) {
            node.hit_shape = Some(HitShape::Box {
                half_extents: Vec3::splat(0.75),
            });
        }

        let ring = stage.graph.spawn_child(anchor);
        if let Some(node) = stage.graph.get_mut(ring) {
            node.scale = Vec3::splat(1.4);
        }

        let mut rng = rand::thread_rng();

        Self {
            title: title.to_owned(),
            anchor,
            cube,
            ring,
            visual: ItemVisual {
                coords: rest,
                rest,
                scale: 0.0,
            },
            animator: Animator::new(item_bindings()),
            next_animation: None,
            attached: false,
            spin_angle: 0.0,
            spin_speed: rng.gen_range(0.3..0.5),
            orbit_angle: rng.gen_range(0.0..std::f32::consts::TAU),
            orbit_speed: rng.gen_range(0.4..0.8),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn cube(&self) -> NodeId {
        self.cube
    }

    pub fn anchor(&self) -> NodeId {
        self.anchor
    }

    fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    fn set_animation(&mut self, tracks: &TracksHandle, force: bool, delay: Option<f32>) {
        if self.animator.is_playing(tracks) {
            return;
        }

        if self.animator.is_animating() && !force {
            self.next_animation = Some(tracks.clone());
            return;
        }

        self.animator.play(tracks);

        if let Some(delay) = delay {
            self.animator.set_time(-delay);
        }
    }

    fn show(&mut self, stage: &mut Stage, delay: f32) {
        stage.interact.track_object(self.cube);

        let animations = item_animations();
        if self.attached {
            // Navigated back from this item's screen: return to the rest
            // placement, then settle.
            self.set_animation(&animations.exit, true, None);
            self.next_animation = Some(animations.deselected.clone());
        } else {
            stage
                .content_scaler
                .attach_to_root(&mut stage.graph, self.anchor);
            self.attached = true;

            self.set_animation(&animations.show, true, Some(delay));
        }
    }

    fn hide(&mut self) {
        let animations = item_animations();

        // A show still in flight is skipped to its end so the hide starts
        // from settled values.
        let seek_to_end = self.animator.is_playing(&animations.show);

        self.set_animation(&animations.hide, true, None);

        if seek_to_end {
            let length = self.animator.length();
            self.animator.set_time(length);
        }
    }

    fn disable_interaction(&mut self, stage: &mut Stage) {
        stage.interact.untrack_object(self.cube);
    }

    fn update(&mut self, dt: f32, stage: &mut Stage) {
        self.spin_angle = (self.spin_angle + dt * self.spin_speed) % std::f32::consts::TAU;
        self.orbit_angle = (self.orbit_angle + dt * self.orbit_speed) % std::f32::consts::TAU;

        let was_animating = self.animator.is_animating();

        if let Some(_done) = self.animator.update(dt, &mut self.visual) {
            if let Some(next) = self.next_animation.take() {
                self.animator.play(&next);
            }
        }

        // Anchor coordinates only move during playback; rewriting them every
        // frame would discard the orientation-dependent rest options.
        if was_animating {
            let coords = self.visual.coords;
            stage
                .content_scaler
                .update_anchor(&mut stage.graph, self.anchor, |spec| {
                    spec.ref_x = OrientedValue::Fixed(coords.x);
                    spec.ref_y = OrientedValue::Fixed(coords.y);
                    spec.anchor_x = OrientedValue::Fixed(coords.z);
                    spec.anchor_y = OrientedValue::Fixed(coords.w);
                });
            stage
                .graph
                .set_uniform_scale(self.anchor, self.visual.scale.max(0.0));
        }

        if let Some(node) = stage.graph.get_mut(self.cube) {
            node.rotation = Quat::from_rotation_y(self.spin_angle);
        }
        if let Some(node) = stage.graph.get_mut(self.ring) {
            node.rotation = Quat::from_rotation_z(self.orbit_angle);
        }
    }
}

/// The landing menu screen.
pub struct LandingScreen {
    items: Vec<LandingItem>,
    app_paths: Vec<String>,
    title_node: NodeId,
    title_overlay: OverlayItem,
    clicks: Rc<RefCell<Vec<Option<RayHit>>>>,
    pending_hide: Option<HideToken>,
    clicked_origin: Option<OriginData>,
}

impl LandingScreen {
    pub fn new(stage: &mut Stage, config: &SiteConfig) -> Self {
        let count = config.apps.len();
        let items = config
            .apps
            .iter()
            .enumerate()
            .map(|(index, route)| LandingItem::new(stage, &route.title, index, count))
            .collect();

        let app_paths = config.apps.iter().map(|route| route.path.clone()).collect();

        // HUD title keeps a fixed pixel size regardless of reference zoom.
        let title_node = stage.graph.add_node();
        if let Some(node) = stage.graph.get_mut(title_node) {
            node.anchor = Some(AnchorSpec::new(0.0, -1.2, 0.5, 1.0).negate_scale());
        }
        stage
            .hud_scaler
            .attach_to_root(&mut stage.graph, title_node);

        Self {
            items,
            app_paths,
            title_node,
            title_overlay: OverlayItem::new(title_node),
            clicks: Rc::new(RefCell::new(Vec::new())),
            pending_hide: None,
            clicked_origin: None,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, index: usize) -> Option<&LandingItem> {
        self.items.get(index)
    }

    /// Origin snapshot for the landing item behind the given app registry
    /// index, used when navigation resolves an app route directly.
    pub fn origin_for_item(&self, index: usize, stage: &Stage) -> Option<OriginData> {
        self.items.get(index).map(|item| OriginData {
            item_index: index,
            world_position: stage.graph.world_position(item.anchor),
        })
    }

    pub fn title_placement(&self) -> &crate::overlay::ScreenPlacement {
        self.title_overlay.placement()
    }
}

impl Screen for LandingScreen {
    fn show(&mut self, stage: &mut Stage, _link: &NavLink, _origin: Option<OriginData>) {
        self.pending_hide = None;
        self.clicked_origin = None;

        for (index, item) in self.items.iter_mut().enumerate() {
            item.show(stage, index as f32 * SHOW_STAGGER_SECONDS);
        }

        let clicks = Rc::clone(&self.clicks);
        stage.interact.add_click_listener(LISTENER_KEY, move |hit| {
            clicks.borrow_mut().push(hit.copied());
        });
    }

    fn hide(&mut self, stage: &mut Stage, token: HideToken, origin: Option<OriginData>) {
        self.pending_hide = Some(token);
        self.clicked_origin = origin;

        for (index, item) in self.items.iter_mut().enumerate() {
            let is_origin = origin.map_or(false, |data| data.item_index == index);
            if is_origin {
                // The clicked item grows towards the centre while everything
                // else clears out.
                item.set_animation(&item_animations().enter, false, None);
            } else {
                item.hide();
            }
            item.disable_interaction(stage);
        }

        stage.interact.remove_click_listener(LISTENER_KEY);
    }

    fn update(&mut self, dt: f32, stage: &mut Stage, link: &mut NavLink) {
        let events: Vec<Option<RayHit>> = self.clicks.borrow_mut().drain(..).collect();
        if self.pending_hide.is_none() {
            for event in events.into_iter().flatten() {
                if let Some(index) = self
                    .items
                    .iter()
                    .position(|item| item.cube() == event.node)
                {
                    let origin = OriginData {
                        item_index: index,
                        world_position: stage.graph.world_position(self.items[index].anchor()),
                    };
                    link.set_destination(self.app_paths[index].clone(), Some(origin));
                }
            }
        }

        let animations = item_animations();
        let hit = stage.interact.first_hit().copied();
        let mut hide_in_progress = false;

        for item in &mut self.items {
            item.update(dt, stage);

            if self.pending_hide.is_none() {
                if hit.map_or(false, |h| h.node == item.cube()) {
                    item.set_animation(&animations.selected, false, None);
                } else if item.animator.is_playing(&animations.selected) {
                    item.set_animation(&animations.deselected, false, None);
                }
            } else {
                hide_in_progress = hide_in_progress || item.is_animating();
            }
        }

        if !hide_in_progress {
            if let Some(token) = self.pending_hide.take() {
                token.finish(self.clicked_origin.take());
            }
        }

        self.title_overlay.update(
            &stage.graph,
            &stage.hud_camera,
            &stage.viewport,
            &stage.hud_scaler,
        );
    }

    fn dispose(&mut self, stage: &mut Stage) {
        // The landing screen is a cached singleton; navigation never disposes
        // it. Kept for contract completeness and teardown on shutdown.
        for item in &mut self.items {
            item.disable_interaction(stage);
            stage.graph.destroy_node(item.anchor);
        }
        stage.graph.destroy_node(self.title_node);
        self.items.clear();
    }
}
