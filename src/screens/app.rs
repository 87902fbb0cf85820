//! Tabbed app screens: a row of pip selectors plus one page of content per
//! tab, switched in place through sub-route changes.

use crate::animation::{
    same_tracks, AnimationTracks, Curve, Easing, Keyframe, KeyValue, Track, TracksHandle,
};
use crate::animator::{Animator, BindingTable};
use crate::config::{RouteConfig, TabConfig};
use crate::navigation::{route_root, route_sub};
use crate::overlay::OverlayItem;
use crate::raycast::RayHit;
use crate::scaler::AnchorSpec;
use crate::scene::HitShape;
use crate::screen::{HideToken, NavLink, Screen};
use crate::screens::content::{create_content_item, ContentItem};
use crate::stage::Stage;
use crate::types::{lerp, NodeId, OriginData, Range};
use glam::{Quat, Vec3, Vec4};
use rand::Rng;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::OnceLock;

const LISTENER_KEY: &str = "app_screen";
const PIP_SPACING: f32 = 1.8;

/// Animated properties of one page. The animator writes here; the page
/// applies the values to its scene nodes afterwards.
#[derive(Clone, Debug)]
struct PageVisual {
    /// 0 = collapsed onto the pip, 1 = filling the content area.
    page_blend: f32,
    title_scale: f32,
    pip_scale: f32,
    pip_inner_scale: f32,
}

impl Default for PageVisual {
    fn default() -> Self {
        Self {
            page_blend: 0.0,
            title_scale: 0.0,
            pip_scale: 1.0,
            pip_inner_scale: 1.0,
        }
    }
}

fn page_bindings() -> BindingTable<PageVisual> {
    BindingTable::new()
        .bind_with_accessor(
            "page",
            |visual: &mut PageVisual, value: KeyValue| {
                if let Some(blend) = value.as_scalar() {
                    visual.page_blend = blend;
                }
            },
            |visual| KeyValue::Scalar(visual.page_blend),
        )
        .bind("title_scale", |visual, value| {
            if let Some(scale) = value.as_scalar() {
                visual.title_scale = scale;
            }
        })
        .bind("pip_scale", |visual, value| {
            if let Some(scale) = value.as_scalar() {
                visual.pip_scale = scale;
            }
        })
        .bind("pip_inner_scale", |visual, value| {
            if let Some(scale) = value.as_scalar() {
                visual.pip_inner_scale = scale;
            }
        })
}

struct PageAnimations {
    show: TracksHandle,
    show_title: TracksHandle,
    hover_pip: TracksHandle,
    unhover_pip: TracksHandle,
    selected: TracksHandle,
    deselected: TracksHandle,
}

fn page_animations() -> &'static PageAnimations {
    static ANIMATIONS: OnceLock<PageAnimations> = OnceLock::new();
    ANIMATIONS.get_or_init(|| PageAnimations {
        // The position track is unbound on pages and skipped; only hosts that
        // bind a position property pick it up.
        show: AnimationTracks::new()
            .with_track(
                "position",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(
                            0.0,
                            Vec4::new(2.5, -1.5, 0.0, 1.0),
                            Easing::InvExponential,
                        ),
                        Keyframe::unresolved(1.0, Easing::Linear),
                    ]),
                    Range::new(0.3, 0.6),
                ),
            )
            .into_handle(),
        show_title: AnimationTracks::new()
            .with_track(
                "title_scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 0.0, Easing::InvExponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.2,
                ),
            )
            .into_handle(),
        hover_pip: AnimationTracks::new()
            .with_track(
                "pip_scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 1.0, Easing::InvExponential),
                        Keyframe::new(1.0, 1.5, Easing::Linear),
                    ]),
                    0.2,
                ),
            )
            .into_handle(),
        unhover_pip: AnimationTracks::new()
            .with_track(
                "pip_scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 1.5, Easing::Exponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.1,
                ),
            )
            .into_handle(),
        selected: AnimationTracks::new()
            .with_track(
                "pip_scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 1.0, Easing::Exponential),
                        Keyframe::new(1.0, 0.5, Easing::Linear),
                    ]),
                    0.1,
                ),
            )
            .with_track(
                "pip_inner_scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 1.0, Easing::Exponential),
                        Keyframe::new(1.0, 0.0, Easing::Linear),
                    ]),
                    0.1,
                ),
            )
            .with_track(
                "page",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 0.0, Easing::InvExponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.3,
                ),
            )
            .into_handle(),
        deselected: AnimationTracks::new()
            .with_track(
                "pip_scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 0.5, Easing::Exponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.05,
                ),
            )
            .with_track(
                "pip_inner_scale",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 0.0, Easing::Exponential),
                        Keyframe::new(1.0, 1.0, Easing::Linear),
                    ]),
                    0.05,
                ),
            )
            .with_track(
                "page",
                Track::new(
                    Curve::new(vec![
                        Keyframe::new(0.0, 1.0, Easing::Exponential),
                        Keyframe::new(1.0, 0.0, Easing::Linear),
                    ]),
                    0.1,
                ),
            )
            .into_handle(),
    })
}

/// One tab's worth of content, collapsed onto its pip until selected.
pub struct Page {
    tab: TabConfig,
    content_group: NodeId,
    title_group: NodeId,
    title_backing: NodeId,
    pip: NodeId,
    pip_inner: NodeId,
    content: Vec<Box<dyn ContentItem>>,
    title_overlay: OverlayItem,
    visual: PageVisual,
    animator: Animator<PageVisual>,
    attached: bool,
    spin_angle: f32,
    spin_speed: f32,
    pip_base_rotation: Quat,
}

impl Page {
    fn new(stage: &mut Stage, tab: &TabConfig, pip: NodeId, pip_inner: NodeId) -> Self {
        let content_group = stage.graph.add_node();

        let title_group = stage.graph.spawn_child(content_group);
        if let Some(node) = stage.graph.get_mut(title_group) {
            node.scale = Vec3::ZERO;
            node.position = Vec3::new(0.0, -1.0, 0.0);
        }
        let title_backing = stage.graph.spawn_child(title_group);

        let content = tab
            .content
            .iter()
            .map(|entry| create_content_item(stage, content_group, entry))
            .collect();

        let pip_base_rotation = stage
            .graph
            .get(pip)
            .map(|node| node.rotation)
            .unwrap_or(Quat::IDENTITY);

        Self {
            tab: tab.clone(),
            content_group,
            title_group,
            title_backing,
            pip,
            pip_inner,
            content,
            title_overlay: OverlayItem::new(title_group),
            visual: PageVisual::default(),
            animator: Animator::new(page_bindings()),
            attached: false,
            spin_angle: 0.0,
            spin_speed: rand::thread_rng().gen_range(0.3..0.5),
            pip_base_rotation,
        }
    }

    pub fn tab_id(&self) -> &str {
        &self.tab.id
    }

    pub fn pip(&self) -> NodeId {
        self.pip
    }

    pub fn title(&self) -> &str {
        &self.tab.title
    }

    /// Backing frame node behind the title, sized by the host's text metrics.
    pub fn title_backing(&self) -> NodeId {
        self.title_backing
    }

    fn is_playing(&self, tracks: &TracksHandle) -> bool {
        self.animator.is_playing(tracks)
    }

    /// Plays `tracks` unless they are already active, or `wait` is set and
    /// another animation is still running.
    fn play_animation(&mut self, tracks: &TracksHandle, wait: bool) {
        if self.animator.is_playing(tracks) || (wait && self.animator.is_animating()) {
            return;
        }
        self.animator.play(tracks);
    }

    fn show(&mut self, stage: &mut Stage) {
        if self.attached {
            self.show_content(stage);
            return;
        }

        let root = stage.content_scaler.root();
        stage
            .content_scaler
            .attach(&mut stage.graph, root, self.content_group);
        self.attached = true;
        self.show_content(stage);
    }

    fn hide(&mut self, stage: &mut Stage) {
        self.hide_content(stage);

        if self.attached {
            let root = stage.content_scaler.root();
            stage.graph.remove_child(root, self.content_group);
            self.attached = false;
        }

        if let Some(node) = stage.graph.get_mut(self.title_group) {
            node.scale = Vec3::ZERO;
        }
        self.visual.title_scale = 0.0;

        stage.interact.untrack_object(self.pip);
    }

    fn show_content(&mut self, stage: &mut Stage) {
        for item in &mut self.content {
            item.show(stage);
        }
    }

    fn hide_content(&mut self, stage: &mut Stage) {
        for item in &mut self.content {
            item.hide(stage);
        }
    }

    fn process_click(&mut self, hit: Option<NodeId>, stage: &mut Stage) {
        for item in &mut self.content {
            item.process_click(hit, stage);
        }
    }

    fn update(&mut self, dt: f32, stage: &mut Stage) {
        self.spin_angle = (self.spin_angle + dt * self.spin_speed) % std::f32::consts::TAU;

        if let Some(done) = self.animator.update(dt, &mut self.visual) {
            let animations = page_animations();
            if same_tracks(&done, &animations.show) {
                self.play_animation(&animations.show_title, false);
            } else if same_tracks(&done, &animations.deselected) {
                self.hide_content(stage);
            }
        }

        // Apply the animated properties to the scene.
        if let Some(node) = stage.graph.get_mut(self.pip) {
            node.scale = Vec3::splat(self.visual.pip_scale);
            node.rotation = self.pip_base_rotation * Quat::from_rotation_y(self.spin_angle);
        }
        stage
            .graph
            .set_uniform_scale(self.pip_inner, self.visual.pip_inner_scale);
        stage
            .graph
            .set_uniform_scale(self.title_group, self.visual.title_scale);

        let blend = self.visual.page_blend;
        let scaler_scale = stage.content_scaler.metrics().scale;
        let pip_local = stage.graph.world_position(self.pip) / scaler_scale;
        if let Some(node) = stage.graph.get_mut(self.content_group) {
            node.scale = Vec3::splat(blend);
            node.position = Vec3::new(
                lerp(pip_local.x, 0.0, blend),
                lerp(pip_local.y, 0.0, blend),
                0.0,
            );
        }

        for item in &mut self.content {
            item.update(dt, stage);
        }

        self.title_overlay.update(
            &stage.graph,
            &stage.content_camera,
            &stage.viewport,
            &stage.content_scaler,
        );
    }

    fn dispose(&mut self, stage: &mut Stage) {
        for item in &mut self.content {
            item.dispose(stage);
        }
        stage.interact.untrack_object(self.pip);
        stage.graph.destroy_node(self.content_group);
    }
}

/// A tabbed content screen resolved from an app route.
pub struct AppScreen {
    route_index: usize,
    route: RouteConfig,
    pages: Vec<Page>,
    pips: Vec<NodeId>,
    pip_group: NodeId,
    shown: Option<usize>,
    clicks: Rc<RefCell<Vec<Option<RayHit>>>>,
}

impl AppScreen {
    pub fn new(stage: &mut Stage, route: &RouteConfig, route_index: usize) -> Self {
        let pip_group = stage.graph.add_node();
        if let Some(node) = stage.graph.get_mut(pip_group) {
            node.anchor = Some(AnchorSpec::new(0.0, 1.3, 0.5, 0.0));
            node.scale = Vec3::ZERO;
        }
        stage
            .content_scaler
            .attach_to_root(&mut stage.graph, pip_group);

        let rot = std::f32::consts::FRAC_PI_4;
        let group_width = (route.tabs.len().saturating_sub(1)) as f32 * PIP_SPACING;
        let mut x = -group_width * 0.5;

        let mut pips = Vec::new();
        let mut pages = Vec::new();

        for tab in &route.tabs {
            let pip = stage.graph.spawn_child(pip_group);
            if let Some(node) = stage.graph.get_mut(pip) {
                node.position = Vec3::new(x, 0.0, 0.0);
                node.rotation = Quat::from_euler(glam::EulerRot::XYZ, rot, 0.0, rot);
                node.hit_shape = Some(HitShape::Box {
                    half_extents: Vec3::splat(0.5),
                });
            }
            x += PIP_SPACING;

            let pip_inner = stage.graph.spawn_child(pip);
            if let Some(node) = stage.graph.get_mut(pip_inner) {
                node.scale = Vec3::splat(0.6);
            }

            stage.interact.track_object(pip);
            pips.push(pip);
            pages.push(Page::new(stage, tab, pip, pip_inner));
        }

        Self {
            route_index,
            route: route.clone(),
            pages,
            pips,
            pip_group,
            shown: None,
            clicks: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn route_index(&self) -> usize {
        self.route_index
    }

    pub fn shown_tab(&self) -> Option<&str> {
        self.shown.map(|index| self.pages[index].tab_id())
    }

    /// Selects the tab the path's sub-segment names, falling back to the
    /// first tab. The previously shown page is deselected in place.
    fn open_tab_from_path(&mut self, stage: &mut Stage, path: &str) {
        let animations = page_animations();

        if let Some(previous) = self.shown {
            stage.interact.track_object(self.pages[previous].pip());
            self.pages[previous].play_animation(&animations.deselected, false);
        }

        let tab_id = route_sub(path).unwrap_or(self.route.tabs[0].id.as_str());
        let index = self
            .route
            .tabs
            .iter()
            .position(|tab| tab.id == tab_id)
            .unwrap_or(0);

        self.shown = Some(index);
        self.pages[index].show(stage);
        stage.interact.untrack_object(self.pips[index]);
        self.pages[index].play_animation(&animations.selected, false);
    }
}

impl Screen for AppScreen {
    fn show(&mut self, stage: &mut Stage, link: &NavLink, _origin: Option<OriginData>) {
        stage.graph.set_uniform_scale(self.pip_group, 1.0);

        self.open_tab_from_path(stage, link.current_path());

        let clicks = Rc::clone(&self.clicks);
        stage.interact.add_click_listener(LISTENER_KEY, move |hit| {
            clicks.borrow_mut().push(hit.copied());
        });
    }

    fn hide(&mut self, stage: &mut Stage, token: HideToken, origin: Option<OriginData>) {
        for page in &mut self.pages {
            page.hide(stage);
        }

        stage.interact.remove_click_listener(LISTENER_KEY);

        // Pages collapse instantly, so the transition resolves synchronously.
        token.finish(origin);
    }

    fn update(&mut self, dt: f32, stage: &mut Stage, link: &mut NavLink) {
        let events: Vec<Option<RayHit>> = self.clicks.borrow_mut().drain(..).collect();
        for event in events {
            match event {
                Some(hit) => {
                    if let Some(index) = self.pips.iter().position(|&pip| pip == hit.node) {
                        let root = route_root(link.current_path()).to_owned();
                        let origin = OriginData {
                            item_index: index,
                            world_position: stage.graph.world_position(self.pips[index]),
                        };
                        link.set_destination(
                            format!("{}.{}", root, self.route.tabs[index].id),
                            Some(origin),
                        );
                    } else {
                        for page in &mut self.pages {
                            page.process_click(Some(hit.node), stage);
                        }
                    }
                }
                None => {
                    for page in &mut self.pages {
                        page.process_click(None, stage);
                    }
                }
            }
        }

        let animations = page_animations();
        let hit = stage.interact.first_hit().copied();

        for page in &mut self.pages {
            page.update(dt, stage);

            if hit.map_or(false, |h| h.node == page.pip()) {
                page.play_animation(&animations.hover_pip, true);
            } else if page.is_playing(&animations.hover_pip) {
                page.play_animation(&animations.unhover_pip, true);
            }
        }
    }

    fn dispose(&mut self, stage: &mut Stage) {
        stage.interact.remove_click_listener(LISTENER_KEY);

        for page in &mut self.pages {
            page.dispose(stage);
        }
        for &pip in &self.pips {
            stage.interact.untrack_object(pip);
        }
        stage.graph.destroy_node(self.pip_group);
    }

    fn on_path_changed(&mut self, stage: &mut Stage, path: &str) {
        self.open_tab_from_path(stage, path);
    }
}
