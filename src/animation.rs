//! Animation primitives: easing curves, keyframes and named track sets.
//!
//! A [`Curve`] maps a normalised playback ratio in `[0, 1]` to an interpolated
//! [`KeyValue`]. Keyframes may leave their value *unresolved* (`None`), which
//! substitutes the animated property's current live value at evaluation time —
//! this lets a track start or end at wherever the property happens to sit.

use crate::types::Range;
use glam::{Vec2, Vec3, Vec4};
use keyframe::functions;
use keyframe::EasingFunction;
use std::collections::HashMap;
use std::sync::Arc;

/// Supported easing functions for keyframe segments.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Slow start, fast end (`r * r`).
    Exponential,
    /// Fast start, slow end (`1 - (1 - r)^2`).
    InvExponential,
}

impl EasingFunction for Easing {
    fn y(&self, x: f64) -> f64 {
        match self {
            Easing::Linear => functions::Linear.y(x),
            Easing::Exponential => functions::EaseInQuad.y(x),
            Easing::InvExponential => functions::EaseOutQuad.y(x),
        }
    }
}

impl Easing {
    /// Evaluates the easing curve at `x` in `[0, 1]`.
    pub fn apply(&self, x: f32) -> f32 {
        self.y(x as f64) as f32
    }
}

/// A value animatable by a track: a scalar or a 2/3/4-component vector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum KeyValue {
    Scalar(f32),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
}

impl KeyValue {
    /// Component-wise linear interpolation. Mismatched variants resolve to the
    /// target value; track curves are expected to be homogeneous.
    pub fn lerp(from: &KeyValue, to: &KeyValue, ratio: f32) -> KeyValue {
        match (from, to) {
            (KeyValue::Scalar(a), KeyValue::Scalar(b)) => {
                KeyValue::Scalar(crate::types::lerp(*a, *b, ratio))
            }
            (KeyValue::Vector2(a), KeyValue::Vector2(b)) => KeyValue::Vector2(a.lerp(*b, ratio)),
            (KeyValue::Vector3(a), KeyValue::Vector3(b)) => KeyValue::Vector3(a.lerp(*b, ratio)),
            (KeyValue::Vector4(a), KeyValue::Vector4(b)) => KeyValue::Vector4(a.lerp(*b, ratio)),
            (_, other) => *other,
        }
    }

    pub fn as_scalar(&self) -> Option<f32> {
        match self {
            KeyValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vec4(&self) -> Option<Vec4> {
        match self {
            KeyValue::Vector4(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<f32> for KeyValue {
    fn from(value: f32) -> Self {
        KeyValue::Scalar(value)
    }
}

impl From<Vec2> for KeyValue {
    fn from(value: Vec2) -> Self {
        KeyValue::Vector2(value)
    }
}

impl From<Vec3> for KeyValue {
    fn from(value: Vec3) -> Self {
        KeyValue::Vector3(value)
    }
}

impl From<Vec4> for KeyValue {
    fn from(value: Vec4) -> Self {
        KeyValue::Vector4(value)
    }
}

/// A single keyframe on a curve.
///
/// `value: None` marks the keyframe as unresolved: evaluation substitutes the
/// animated property's current value, obtained through the accessor supplied
/// to [`Curve::evaluate`].
#[derive(Clone, Debug)]
pub struct Keyframe {
    /// Position on the normalised playback ratio, in `[0, 1]`.
    pub time: f32,
    pub value: Option<KeyValue>,
    pub easing: Easing,
}

impl Keyframe {
    pub fn new(time: f32, value: impl Into<KeyValue>, easing: Easing) -> Self {
        Self {
            time,
            value: Some(value.into()),
            easing,
        }
    }

    /// A keyframe whose value is resolved from the live property at
    /// evaluation time.
    pub fn unresolved(time: f32, easing: Easing) -> Self {
        Self {
            time,
            value: None,
            easing,
        }
    }
}

/// Accessor supplying the live property value for unresolved keyframes.
pub type ValueAccessor<'a> = &'a mut dyn FnMut() -> KeyValue;

/// An ordered sequence of keyframes over the normalised ratio `[0, 1]`.
///
/// Invariant: keyframe times are non-decreasing. Evaluation before the first
/// keyframe or after the last clamps to the respective endpoint value.
#[derive(Clone, Debug)]
pub struct Curve {
    keyframes: Vec<Keyframe>,
}

impl Curve {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        debug_assert!(
            keyframes.windows(2).all(|w| w[0].time <= w[1].time),
            "keyframe times must be non-decreasing"
        );
        Self { keyframes }
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    /// Evaluates the curve at `ratio`.
    ///
    /// Returns `None` only when an unresolved endpoint is needed and no
    /// accessor was supplied; callers treat that as "skip this update". The
    /// accessor is never invoked for literal endpoints.
    pub fn evaluate(&self, ratio: f32, mut accessor: Option<ValueAccessor>) -> Option<KeyValue> {
        if self.keyframes.is_empty() {
            return None;
        }

        // Locate the bracketing pair: first keyframe with time > ratio and
        // its predecessor.
        let mut bracket = None;
        for i in 1..self.keyframes.len() {
            if self.keyframes[i].time > ratio {
                bracket = Some((&self.keyframes[i - 1], &self.keyframes[i]));
                break;
            }
        }

        let (current, next) = match bracket {
            Some(pair) => pair,
            None => {
                // Past the last keyframe (or a single-frame curve): clamp.
                let last = self.keyframes.last().unwrap();
                return Self::resolve(last, accessor.as_mut().map(|a| &mut **a));
            }
        };

        if ratio <= current.time {
            return Self::resolve(current, accessor.as_mut().map(|a| &mut **a));
        }

        let from = Self::resolve(current, accessor.as_mut().map(|a| &mut **a))?;
        let to = Self::resolve(next, accessor.as_mut().map(|a| &mut **a))?;

        let span = next.time - current.time;
        let local = current.easing.apply((ratio - current.time) / span);

        Some(KeyValue::lerp(&from, &to, local))
    }

    fn resolve<'a, 'b>(
        frame: &Keyframe,
        accessor: Option<&'a mut (dyn FnMut() -> KeyValue + 'b)>,
    ) -> Option<KeyValue>
    where
        'b: 'a,
    {
        match frame.value {
            Some(value) => Some(value),
            None => accessor.map(|get| get()),
        }
    }
}

/// Playback duration of one track: a fixed number of seconds, or a range
/// sampled uniformly once per play.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TrackDuration {
    Fixed(f32),
    Range(Range),
}

impl From<f32> for TrackDuration {
    fn from(seconds: f32) -> Self {
        TrackDuration::Fixed(seconds)
    }
}

impl From<Range> for TrackDuration {
    fn from(range: Range) -> Self {
        TrackDuration::Range(range)
    }
}

/// One named animatable property within an [`AnimationTracks`] set.
#[derive(Clone, Debug)]
pub struct Track {
    pub curve: Arc<Curve>,
    pub duration: TrackDuration,
}

impl Track {
    pub fn new(curve: Curve, duration: impl Into<TrackDuration>) -> Self {
        Self {
            curve: Arc::new(curve),
            duration: duration.into(),
        }
    }
}

/// An immutable set of named tracks describing one logical transition
/// ("show", "hide", "selected", ...). Defined once and shared by reference
/// across every instance that plays the transition; curves carry no mutable
/// per-playback state.
#[derive(Clone, Debug, Default)]
pub struct AnimationTracks {
    tracks: HashMap<String, Track>,
}

impl AnimationTracks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, name: &str, track: Track) -> Self {
        self.tracks.insert(name.to_owned(), track);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Track> {
        self.tracks.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Track)> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Wraps the set into the shared handle form used for playback.
    pub fn into_handle(self) -> TracksHandle {
        Arc::new(self)
    }
}

/// Shared reference to an [`AnimationTracks`] set. Identity (`Arc::ptr_eq`)
/// is how callers recognise which transition an animator is playing.
pub type TracksHandle = Arc<AnimationTracks>;

/// Convenience: `true` when both handles refer to the same track set.
pub fn same_tracks(a: &TracksHandle, b: &TracksHandle) -> bool {
    Arc::ptr_eq(a, b)
}
