//! Named-track animation playback over an explicit binding table.
//!
//! An [`Animator`] plays an [`AnimationTracks`] set against a property struct
//! `T` owned by the caller. Bindings are plain function pointers constructed
//! once per owning object — no captured context. The animator holds no
//! rendering state; applying the animated properties to scene nodes is the
//! owner's job each frame.

use crate::animation::{AnimationTracks, KeyValue, TracksHandle};
use rand::Rng;
use std::collections::HashMap;

/// Binds one named track to a property of `T`.
pub struct Binding<T> {
    /// Writes the evaluated value into the target.
    pub apply: fn(&mut T, KeyValue),
    /// Reads the property's current live value, used to resolve keyframes
    /// without a literal value. Tracks whose curves only carry literals can
    /// leave this unset.
    pub current: Option<fn(&T) -> KeyValue>,
}

// Manual impls: derive would put a `T: Clone` bound on the fn pointers.
impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            apply: self.apply,
            current: self.current,
        }
    }
}

/// The fixed binding table owned by an [`Animator`]: property name to binding.
///
/// Tracks present in a played [`AnimationTracks`] set but absent from the
/// table are silently skipped, so track sets can grow independently of the
/// objects that play them.
pub struct BindingTable<T> {
    bindings: HashMap<&'static str, Binding<T>>,
}

impl<T> BindingTable<T> {
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn bind(mut self, name: &'static str, apply: fn(&mut T, KeyValue)) -> Self {
        self.bindings.insert(
            name,
            Binding {
                apply,
                current: None,
            },
        );
        self
    }

    pub fn bind_with_accessor(
        mut self,
        name: &'static str,
        apply: fn(&mut T, KeyValue),
        current: fn(&T) -> KeyValue,
    ) -> Self {
        self.bindings.insert(
            name,
            Binding {
                apply,
                current: Some(current),
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&Binding<T>> {
        self.bindings.get(name)
    }
}

impl<T> Default for BindingTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Plays one [`AnimationTracks`] set at a time against a binding table.
///
/// All tracks share a single elapsed timer; each track resolves its own
/// duration once at play start (ranges are sampled once, not per frame).
/// Playback completes when every bound track has reached ratio 1, at which
/// point [`Animator::update`] returns the finished handle exactly once.
pub struct Animator<T> {
    bindings: BindingTable<T>,
    tracks: Option<TracksHandle>,
    timer: f32,
    length: f32,
    durations: HashMap<String, f32>,
    animating: bool,
}

impl<T> Animator<T> {
    pub fn new(bindings: BindingTable<T>) -> Self {
        Self {
            bindings,
            tracks: None,
            timer: 0.0,
            length: 0.0,
            durations: HashMap::new(),
            animating: false,
        }
    }

    /// Starts playing a track set from ratio 0.
    ///
    /// Calling `play` while another set is active abandons the previous
    /// playback without a completion event. Re-playing the currently active
    /// set restarts it — callers that want play-if-not-already-playing guard
    /// with [`Animator::current_tracks`].
    pub fn play(&mut self, tracks: &TracksHandle) {
        let mut rng = rand::thread_rng();
        self.play_with_rng(tracks, &mut rng);
    }

    /// As [`Animator::play`], with an explicit random source for duration
    /// range sampling.
    pub fn play_with_rng<R: Rng + ?Sized>(&mut self, tracks: &TracksHandle, rng: &mut R) {
        self.timer = 0.0;
        self.length = 0.0;
        self.animating = true;
        self.durations.clear();

        for (name, track) in tracks.iter() {
            let duration = match track.duration {
                crate::animation::TrackDuration::Fixed(seconds) => seconds,
                crate::animation::TrackDuration::Range(range) => range.sample(rng),
            };
            self.durations.insert(name.clone(), duration);
            self.length = self.length.max(duration);
        }

        self.tracks = Some(tracks.clone());
    }

    /// The longest resolved track duration of the current playback.
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    pub fn current_tracks(&self) -> Option<&TracksHandle> {
        self.tracks.as_ref()
    }

    /// `true` when the animator is currently playing the given set.
    pub fn is_playing(&self, tracks: &TracksHandle) -> bool {
        self.tracks
            .as_ref()
            .map_or(false, |current| std::sync::Arc::ptr_eq(current, tracks))
    }

    /// Seeks the shared timer directly.
    ///
    /// Negative values implement start delays; the full length seeks to the
    /// end. Seeking never evaluates tracks or fires completion by itself —
    /// only a subsequent [`Animator::update`] call does.
    pub fn set_time(&mut self, time: f32) {
        self.timer = time;
    }

    /// Advances the playback and applies every bound track to `target`.
    ///
    /// Returns the finished [`TracksHandle`] exactly once per `play` call, on
    /// the update that brings the last bound track to ratio 1.
    pub fn update(&mut self, dt: f32, target: &mut T) -> Option<TracksHandle> {
        let tracks = match &self.tracks {
            Some(tracks) if self.animating => tracks.clone(),
            _ => return None,
        };

        self.timer += dt;
        self.animating = false;

        Self::evaluate_tracks(
            &tracks,
            &self.bindings,
            &self.durations,
            self.timer,
            &mut self.animating,
            target,
        );

        if !self.animating {
            return Some(tracks);
        }
        None
    }

    fn evaluate_tracks(
        tracks: &AnimationTracks,
        bindings: &BindingTable<T>,
        durations: &HashMap<String, f32>,
        timer: f32,
        still_animating: &mut bool,
        target: &mut T,
    ) {
        for (name, track) in tracks.iter() {
            let binding = match bindings.get(name) {
                Some(binding) => binding,
                // Unbound track: a forward-compatible extension point, not an error.
                None => continue,
            };

            let duration = durations.get(name).copied().unwrap_or(0.0);
            // Zero-length tracks resolve immediately at ratio 1.
            let ratio = if duration <= 0.0 {
                1.0
            } else {
                (timer / duration).clamp(0.0, 1.0)
            };

            let value = match binding.current {
                Some(current) => {
                    let mut accessor = || current(target);
                    track.curve.evaluate(ratio, Some(&mut accessor))
                }
                None => track.curve.evaluate(ratio, None),
            };

            if let Some(value) = value {
                (binding.apply)(target, value);
            }

            *still_animating = *still_animating || ratio < 1.0;
        }
    }
}
