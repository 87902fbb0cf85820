//! # Vitrine Engine
//!
//! `vitrine-engine` is the presentation core of a scene-graph based showcase
//! site: screens of 3D-placed content, navigated by URL path changes with
//! animated transitions, raycast pointer interaction and a canvas-to-world
//! scaling layer that keeps anchored content positioned across any aspect
//! ratio.
//!
//! ## Core Features
//!
//! *   **Keyframe Animation**: named property tracks with easing, randomised
//!     durations and "continue from current value" keyframes.
//! *   **Screen Navigation**: a URL-driven state machine sequencing
//!     hide-then-show transitions between the landing menu and app screens.
//! *   **Canvas Scaling**: a fixed-reference world coordinate system projected
//!     onto arbitrary canvas sizes, cascading to anchored nodes on resize.
//! *   **Interaction**: tracked-object raycasting with multi-touch
//!     bookkeeping and tap-vs-drag disambiguation.
//! *   **Overlay Projection**: world-to-screen placement for host-rendered
//!     DOM content.
//!
//! Rendering itself is a collaborator: the engine owns transforms, timing and
//! input, and exposes the scene graph and particle buffers for a renderer to
//! draw.
//!
//! ## Usage
//!
//! The entry points are [`Stage`] (the per-canvas composition root) and
//! [`Navigation`] (the screen state machine):
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vitrine_engine::{
//!     DefaultAssetLoader, MemoryPathProvider, Navigation, SiteConfig, Stage,
//! };
//!
//! let mut stage = Stage::new(1280.0, 720.0, Arc::new(DefaultAssetLoader));
//! let provider = MemoryPathProvider::new("/");
//! let mut navigation = Navigation::new(&mut stage, Box::new(provider), SiteConfig::default());
//!
//! // Per frame:
//! let dt = 1.0 / 60.0;
//! stage.resize_if_needed(1280.0, 720.0);
//! stage.update_interactions(dt);
//! navigation.update(dt, &mut stage);
//! ```

/// Animation primitives: easing, keyframes, curves and named tracks.
pub mod animation;

/// Named-track playback over explicit binding tables.
pub mod animator;

/// Asset loading and caching.
pub mod assets;

/// Perspective camera and viewport math.
pub mod camera;

/// Site configuration: routes, tabs and content entries.
pub mod config;

pub mod errors;

/// Pointer/touch interaction and click dispatch.
pub mod interact;

/// The URL-driven screen state machine.
pub mod navigation;

/// World-to-screen placement for host-rendered overlays.
pub mod overlay;

/// Particle emitter simulation.
pub mod particles;

/// Ray construction and shape intersection.
pub mod raycast;

/// Canvas-to-world scaling and anchored placement.
pub mod scaler;

/// The scene graph data structure.
pub mod scene;

/// The screen plugin contract.
pub mod screen;

/// Concrete screen variants.
pub mod screens;

/// The per-canvas composition root.
pub mod stage;

/// Shared data types.
pub mod types;

pub use assets::{AssetCache, AssetLoader, DefaultAssetLoader};
pub use config::SiteConfig;
pub use errors::StageError;
pub use navigation::{MemoryPathProvider, Navigation, PathProvider};
pub use screen::Screen;
pub use stage::Stage;
