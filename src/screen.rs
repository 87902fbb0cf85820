//! The screen plugin contract and the supporting transition plumbing.
//!
//! Any screen variant the navigation layer can own implements [`Screen`]:
//! it is shown with optional origin data, told to hide with a [`HideToken`]
//! it must finish exactly once (synchronously or frames later), updated every
//! frame, and disposed when replaced.

use crate::stage::Stage;
use crate::types::OriginData;
use crossbeam_channel::{bounded, Receiver, Sender};

/// Single-shot completion token for a hide transition.
///
/// Finishing consumes the token, so a screen cannot signal completion twice;
/// dropping it unfinished stalls the transition, which is a screen bug.
pub struct HideToken {
    sender: Sender<Option<OriginData>>,
}

impl HideToken {
    /// Creates a token and the receiver the navigation layer polls.
    pub fn channel() -> (HideToken, Receiver<Option<OriginData>>) {
        let (sender, receiver) = bounded(1);
        (HideToken { sender }, receiver)
    }

    /// Signals that the hide transition completed, forwarding the origin data
    /// to the incoming screen.
    pub fn finish(self, origin: Option<OriginData>) {
        let _ = self.sender.send(origin);
    }
}

/// The navigation facade handed to screens during update: read the current
/// path, or request a new destination.
#[derive(Debug, Default)]
pub struct NavLink {
    current_path: String,
    requested: Option<(String, Option<OriginData>)>,
}

impl NavLink {
    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    /// Requests navigation to `path`, carrying the clicked item so the
    /// destination screen can animate from its visual position. Handled by
    /// the navigation layer on the next poll.
    pub fn set_destination(&mut self, path: impl Into<String>, origin: Option<OriginData>) {
        self.requested = Some((path.into(), origin));
    }

    pub(crate) fn set_current_path(&mut self, path: &str) {
        self.current_path.clear();
        self.current_path.push_str(path);
    }

    pub(crate) fn take_request(&mut self) -> Option<(String, Option<OriginData>)> {
        self.requested.take()
    }
}

/// Contract between the navigation layer and any screen variant.
pub trait Screen {
    /// Brings the screen in. `origin` is the item the navigation came from,
    /// when there was one.
    fn show(&mut self, stage: &mut Stage, link: &NavLink, origin: Option<OriginData>);

    /// Starts hiding. The screen must finish the token exactly once, either
    /// here or from a later `update` once its exit choreography is done.
    fn hide(&mut self, stage: &mut Stage, token: HideToken, origin: Option<OriginData>);

    /// Per-frame update. Runs after the interaction manager so raycast hits
    /// are fresh.
    fn update(&mut self, dt: f32, stage: &mut Stage, link: &mut NavLink);

    /// Releases scene nodes, tracked objects and listeners. Called once when
    /// the screen is replaced; never called on the landing singleton.
    fn dispose(&mut self, stage: &mut Stage);

    /// In-place path change for screens that resolve sub-routes themselves
    /// (tab switches). Default: ignore.
    fn on_path_changed(&mut self, _stage: &mut Stage, _path: &str) {}
}
