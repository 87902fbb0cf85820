//! Site configuration: route tables, tabs and content entries.
//!
//! Screens and content items are described by data and resolved through
//! closed variant registries ([`ScreenKind`], [`ContentKind`]) at load time —
//! configuration never carries live constructor references.

use crate::errors::StageError;
use crate::types::OrientedValue;
use serde::{Deserialize, Serialize};

/// The closed set of screen variants a route can resolve to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenKind {
    /// The landing menu; the common root of all other pages.
    Landing,
    /// A tabbed content screen.
    App,
}

/// The closed set of content entry variants a tab can host.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Text,
    Image,
}

/// One content entry within a tab.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContentConfig {
    pub kind: ContentKind,
    /// Body copy for text entries.
    #[serde(default)]
    pub text: Option<String>,
    /// Resource path for image entries, resolved through the asset cache.
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub anchor_x: OrientedValue,
    #[serde(default)]
    pub anchor_y: OrientedValue,
    #[serde(default)]
    pub ref_x: OrientedValue,
    #[serde(default)]
    pub ref_y: OrientedValue,
    #[serde(default = "default_content_extent")]
    pub width: f32,
    #[serde(default = "default_content_extent")]
    pub height: f32,
}

fn default_content_extent() -> f32 {
    2.0
}

/// One tab of an app screen.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TabConfig {
    /// Sub-route id appended to the app path after a `.`.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: Vec<ContentConfig>,
}

/// One route entry: the path fragment it matches and the screen it opens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RouteConfig {
    pub title: String,
    /// Path fragment matched by containment, e.g. `/#lightning`.
    pub path: String,
    pub screen: ScreenKind,
    #[serde(default)]
    pub tabs: Vec<TabConfig>,
}

/// The full site definition: the ordered app route table, then the ordered
/// "other" route table. Unmatched paths resolve to the landing screen.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default)]
    pub apps: Vec<RouteConfig>,
    #[serde(default)]
    pub other: Vec<RouteConfig>,
}

impl SiteConfig {
    pub fn from_json(json: &str) -> Result<Self, StageError> {
        let config: SiteConfig =
            serde_json::from_str(json).map_err(|e| StageError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load-time validation so bad data fails here, not mid-transition.
    pub fn validate(&self) -> Result<(), StageError> {
        for route in self.apps.iter().chain(self.other.iter()) {
            if route.path.is_empty() {
                return Err(StageError::ConfigError(format!(
                    "route '{}' has an empty path",
                    route.title
                )));
            }
            if route.screen == ScreenKind::App && route.tabs.is_empty() {
                return Err(StageError::ConfigError(format!(
                    "app route '{}' has no tabs",
                    route.title
                )));
            }
        }
        // App screens are indexed through the landing registry, which is
        // built from the apps table alone.
        for route in &self.other {
            if route.screen == ScreenKind::App {
                return Err(StageError::ConfigError(format!(
                    "app route '{}' must live in the apps table",
                    route.title
                )));
            }
        }
        Ok(())
    }
}
