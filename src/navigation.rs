//! URL-driven navigation between screens.
//!
//! The navigation layer polls a [`PathProvider`] once per frame, resolves the
//! target screen through the ordered route tables, and sequences the
//! hide-then-show choreography: the outgoing screen hides, finishes its
//! [`HideToken`](crate::screen::HideToken), is disposed (unless it is the
//! cached landing singleton), and the incoming screen shows with the origin
//! data carried across. Exactly one screen is current at any time; path
//! changes observed while a transition is in flight are handled on the first
//! idle frame.

use crate::config::{ScreenKind, SiteConfig};
use crate::screen::{HideToken, NavLink, Screen};
use crate::screens::{AppScreen, LandingScreen};
use crate::stage::Stage;
use crate::types::OriginData;
use crossbeam_channel::Receiver;
use tracing::debug;

/// Pull-based source of the current navigation path.
///
/// Decouples navigation from any global location binding: a browser host
/// wraps the real URL fragment, tests and headless drivers use
/// [`MemoryPathProvider`].
pub trait PathProvider {
    fn current_path(&self) -> String;

    /// Mutates the path; observed by the next [`Navigation::update`] poll.
    fn navigate(&mut self, path: &str);

    fn has_changed(&self, last_seen: &str) -> bool {
        self.current_path() != last_seen
    }
}

/// In-memory path provider for deterministic navigation.
#[derive(Clone, Debug, Default)]
pub struct MemoryPathProvider {
    path: String,
}

impl MemoryPathProvider {
    pub fn new(initial: &str) -> Self {
        Self {
            path: initial.to_owned(),
        }
    }
}

impl PathProvider for MemoryPathProvider {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&mut self, path: &str) {
        self.path = path.to_owned();
    }
}

/// The root segment of a path: everything before the first `.`.
pub fn route_root(path: &str) -> &str {
    match path.find('.') {
        Some(index) => &path[..index],
        None => path,
    }
}

/// The sub-segment of a path: everything after the last `.`, when present.
pub fn route_sub(path: &str) -> Option<&str> {
    path.rfind('.').map(|index| &path[index + 1..])
}

/// Identity of a resolved screen. Two paths that resolve to the same identity
/// reuse the live screen instance (tab switches); different identities run a
/// full hide/show transition.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScreenId {
    Landing,
    App(usize),
}

enum CurrentScreen {
    Landing,
    App(AppScreen),
}

enum TransitionState {
    Idle,
    Hiding {
        target: ScreenId,
        done: Receiver<Option<OriginData>>,
    },
}

/// Lifecycle counters, exposed for diagnostics HUDs and tests.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NavStats {
    /// App screens constructed (the landing singleton is not counted).
    pub screens_created: u32,
    /// App screens disposed.
    pub screens_disposed: u32,
}

/// Owns the current screen and drives transitions from path changes.
pub struct Navigation {
    provider: Box<dyn PathProvider>,
    config: SiteConfig,
    link: NavLink,
    last_path: String,
    landing: LandingScreen,
    current: CurrentScreen,
    current_id: ScreenId,
    state: TransitionState,
    origin_data: Option<OriginData>,
    stats: NavStats,
}

impl Navigation {
    /// Builds the landing singleton and shows it. The initial provider path
    /// is resolved on the first update.
    pub fn new(stage: &mut Stage, provider: Box<dyn PathProvider>, config: SiteConfig) -> Self {
        let mut landing = LandingScreen::new(stage, &config);

        let link = NavLink::default();
        landing.show(stage, &link, None);

        Self {
            provider,
            config,
            link,
            last_path: String::new(),
            landing,
            current: CurrentScreen::Landing,
            current_id: ScreenId::Landing,
            state: TransitionState::Idle,
            origin_data: None,
            stats: NavStats::default(),
        }
    }

    pub fn current_path(&self) -> &str {
        self.link.current_path()
    }

    pub fn stats(&self) -> NavStats {
        self.stats
    }

    pub fn landing(&self) -> &LandingScreen {
        &self.landing
    }

    /// The route index of the current app screen, `None` on landing.
    pub fn current_app_route(&self) -> Option<usize> {
        match self.current_id {
            ScreenId::App(index) => Some(index),
            ScreenId::Landing => None,
        }
    }

    /// The live app screen, when one is current.
    pub fn current_app(&self) -> Option<&AppScreen> {
        match &self.current {
            CurrentScreen::App(app) => Some(app),
            CurrentScreen::Landing => None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.state, TransitionState::Hiding { .. })
    }

    /// Requests navigation programmatically, equivalent to a screen calling
    /// [`NavLink::set_destination`].
    pub fn set_destination(&mut self, path: &str, origin: Option<OriginData>) {
        self.origin_data = origin;
        self.provider.navigate(path);
    }

    /// Resolves `path` against a route table; among containment matches the
    /// longest route path wins.
    fn match_route(routes: &[crate::config::RouteConfig], path: &str) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (index, route) in routes.iter().enumerate() {
            if path.contains(route.path.as_str()) {
                let len = route.path.len();
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((index, len));
                }
            }
        }
        best.map(|(index, _)| index)
    }

    fn navigate_to_path(&mut self, path: &str, stage: &mut Stage) {
        self.link.set_current_path(path);

        // App table first, then the "other" table; anything unmatched lands
        // on the landing screen. There is no 404 state.
        let target = match Self::match_route(&self.config.apps, path) {
            Some(index) => {
                // Resolved from the landing registry, so the origin is that
                // registry index's landing item regardless of what the caller
                // passed along.
                self.origin_data = self.landing.origin_for_item(index, stage);
                ScreenId::App(index)
            }
            None => match Self::match_route(&self.config.other, path) {
                Some(index) => {
                    debug_assert_eq!(self.config.other[index].screen, ScreenKind::Landing);
                    ScreenId::Landing
                }
                None => ScreenId::Landing,
            },
        };

        if target != self.current_id {
            debug!(?target, path, "screen transition");

            let (token, done) = HideToken::channel();
            self.state = TransitionState::Hiding { target, done };

            let origin = self.origin_data.take();
            match &mut self.current {
                CurrentScreen::Landing => self.landing.hide(stage, token, origin),
                CurrentScreen::App(app) => app.hide(stage, token, origin),
            }
        } else {
            if let CurrentScreen::App(app) = &mut self.current {
                app.on_path_changed(stage, path);
            }
            self.origin_data = None;
        }
    }

    fn on_hide_done(&mut self, target: ScreenId, origin: Option<OriginData>, stage: &mut Stage) {
        // Outgoing app screens are released; the landing singleton survives.
        if let CurrentScreen::App(app) = &mut self.current {
            app.dispose(stage);
            self.stats.screens_disposed += 1;
        }

        match target {
            ScreenId::Landing => {
                self.current = CurrentScreen::Landing;
                self.landing.show(stage, &self.link, origin);
            }
            ScreenId::App(index) => {
                let mut app = AppScreen::new(stage, &self.config.apps[index], index);
                self.stats.screens_created += 1;
                app.show(stage, &self.link, origin);
                self.current = CurrentScreen::App(app);
            }
        }

        self.current_id = target;
    }

    /// Per-frame drive: applies pending destination requests, completes an
    /// in-flight hide, polls the path (only while idle), and updates the
    /// current screen.
    pub fn update(&mut self, dt: f32, stage: &mut Stage) {
        if let Some((path, origin)) = self.link.take_request() {
            self.origin_data = origin;
            self.provider.navigate(&path);
        }

        if let TransitionState::Hiding { target, done } = &self.state {
            if let Ok(origin) = done.try_recv() {
                let target = *target;
                self.state = TransitionState::Idle;
                self.on_hide_done(target, origin, stage);
            }
        }

        if matches!(self.state, TransitionState::Idle) {
            let path = self.provider.current_path();
            if path != self.last_path {
                self.navigate_to_path(&path, stage);
                self.last_path = path;
            }
        }

        match &mut self.current {
            CurrentScreen::Landing => self.landing.update(dt, stage, &mut self.link),
            CurrentScreen::App(app) => app.update(dt, stage, &mut self.link),
        }
    }
}
