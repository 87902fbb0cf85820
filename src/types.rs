//! Shared data types used across the engine.
//!
//! ## Key Types
//! - `NodeId`: arena index into the scene graph (`usize`).
//! - `Range`: inclusive numeric range with uniform sampling.
//! - `OrientedValue`: a value that may differ between landscape and portrait.
//! - `OriginData`: snapshot of the clicked item carried across a screen transition.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A unique identifier for a node in the scene graph.
pub type NodeId = usize;

/// An inclusive `[min, max]` range of `f32` values.
///
/// Used for randomised animation durations, particle lifetimes, speeds and
/// sizes. A degenerate range (`min == max`) always yields `min`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f32,
    pub max: f32,
}

impl Range {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range containing a single value.
    pub fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    /// Samples a value uniformly from the range.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.span() <= 0.0 {
            return self.min;
        }
        rng.gen_range(self.min..self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Viewport orientation, derived from the canvas client dimensions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    Landscape,
    Portrait,
}

/// A scalar that may carry distinct values for landscape and portrait layouts.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrientedValue {
    Fixed(f32),
    PerOrientation { landscape: f32, portrait: f32 },
}

impl OrientedValue {
    pub fn resolve(&self, orientation: Orientation) -> f32 {
        match *self {
            OrientedValue::Fixed(value) => value,
            OrientedValue::PerOrientation {
                landscape,
                portrait,
            } => match orientation {
                Orientation::Landscape => landscape,
                Orientation::Portrait => portrait,
            },
        }
    }
}

impl Default for OrientedValue {
    fn default() -> Self {
        OrientedValue::Fixed(0.0)
    }
}

impl From<f32> for OrientedValue {
    fn from(value: f32) -> Self {
        OrientedValue::Fixed(value)
    }
}

/// Snapshot of the item that triggered a navigation, passed from the outgoing
/// screen to the incoming one so the destination can animate out of the
/// origin's visual position.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OriginData {
    /// Index of the item in its owning screen's registry.
    pub item_index: usize,
    /// World position of the item at the moment it was clicked.
    pub world_position: Vec3,
}

/// Linear interpolation between two scalars.
pub fn lerp(min: f32, max: f32, ratio: f32) -> f32 {
    min + (max - min) * ratio
}
