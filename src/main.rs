//! Headless demo driver: builds a stage from a bundled site definition and
//! simulates a short browsing session, logging transitions as they happen.

use std::sync::Arc;
use tracing::info;
use vitrine_engine::{
    DefaultAssetLoader, MemoryPathProvider, Navigation, SiteConfig, Stage,
};

const SITE_JSON: &str = r#"
{
    "apps": [
        {
            "title": "Lightning Wallpaper",
            "path": "/#lightning",
            "screen": "app",
            "tabs": [
                {
                    "id": "overview",
                    "title": "Overview",
                    "content": [
                        { "kind": "text", "text": "Procedural lightning, rendered live.", "anchor_y": 0.6 },
                        { "kind": "image", "resource": "thumbs/lightning.png", "anchor_y": 0.4 }
                    ]
                },
                {
                    "id": "gallery",
                    "title": "Gallery",
                    "content": [
                        { "kind": "image", "resource": "thumbs/lightning_night.png" }
                    ]
                }
            ]
        },
        {
            "title": "Geo Prism Wallpaper",
            "path": "/#geogrid",
            "screen": "app",
            "tabs": [
                {
                    "id": "overview",
                    "title": "Overview",
                    "content": [
                        { "kind": "text", "text": "Faceted terrain that drifts with the clock." }
                    ]
                }
            ]
        }
    ],
    "other": [
        { "title": "About", "path": "/#about", "screen": "landing" },
        { "title": "Contact", "path": "/#contact", "screen": "landing" }
    ]
}
"#;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let config = SiteConfig::from_json(SITE_JSON)?;

    let mut stage = Stage::new(1280.0, 720.0, Arc::new(DefaultAssetLoader));
    let mut navigation = Navigation::new(
        &mut stage,
        Box::new(MemoryPathProvider::new("/")),
        config,
    );

    let dt = 1.0 / 60.0;
    let frame = |stage: &mut Stage, navigation: &mut Navigation, seconds: f32| {
        let steps = (seconds / dt).ceil() as usize;
        for _ in 0..steps {
            stage.resize_if_needed(1280.0, 720.0);
            stage.update_interactions(dt);
            navigation.update(dt, stage);
        }
    };

    // Let the landing settle, then walk through the site the way a visitor
    // would: open an app, switch tabs, jump to the other app, head home.
    frame(&mut stage, &mut navigation, 1.0);
    info!(path = navigation.current_path(), "landing shown");

    navigation.set_destination("/#lightning", None);
    frame(&mut stage, &mut navigation, 1.5);
    info!(
        path = navigation.current_path(),
        route = ?navigation.current_app_route(),
        "app screen open"
    );

    navigation.set_destination("/#lightning.gallery", None);
    frame(&mut stage, &mut navigation, 0.5);
    info!(path = navigation.current_path(), "tab switched in place");

    navigation.set_destination("/#geogrid", None);
    frame(&mut stage, &mut navigation, 1.5);
    info!(
        path = navigation.current_path(),
        route = ?navigation.current_app_route(),
        "second app open"
    );

    navigation.set_destination("/", None);
    frame(&mut stage, &mut navigation, 1.5);

    let stats = navigation.stats();
    info!(
        created = stats.screens_created,
        disposed = stats.screens_disposed,
        nodes = stage.graph.len(),
        "session complete"
    );

    Ok(())
}
