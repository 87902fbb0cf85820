//! Navigation state machine tests: routing, transition choreography and
//! screen lifecycle.

use std::sync::Arc;
use vitrine_engine::{
    DefaultAssetLoader, MemoryPathProvider, Navigation, SiteConfig, Stage,
};

const SITE_JSON: &str = r#"
{
    "apps": [
        {
            "title": "Alpha",
            "path": "/#alpha",
            "screen": "app",
            "tabs": [
                { "id": "overview", "title": "Overview", "content": [
                    { "kind": "text", "text": "alpha body" }
                ] },
                { "id": "gallery", "title": "Gallery", "content": [
                    { "kind": "image", "resource": "thumbs/alpha.png" }
                ] }
            ]
        },
        {
            "title": "Beta",
            "path": "/#beta",
            "screen": "app",
            "tabs": [
                { "id": "overview", "title": "Overview", "content": [] }
            ]
        }
    ],
    "other": [
        { "title": "About", "path": "/#about", "screen": "landing" }
    ]
}
"#;

struct Site {
    stage: Stage,
    navigation: Navigation,
}

impl Site {
    fn new() -> Self {
        let config = SiteConfig::from_json(SITE_JSON).expect("test site config");
        let mut stage = Stage::new(1280.0, 720.0, Arc::new(DefaultAssetLoader));
        let navigation = Navigation::new(
            &mut stage,
            Box::new(MemoryPathProvider::new("/")),
            config,
        );
        Self { stage, navigation }
    }

    /// Drives whole frames for the given wall-clock span.
    fn run(&mut self, seconds: f32) {
        let dt = 1.0 / 60.0;
        let steps = (seconds / dt).ceil() as usize;
        for _ in 0..steps {
            self.stage.update_interactions(dt);
            self.navigation.update(dt, &mut self.stage);
        }
    }

    fn go(&mut self, path: &str) {
        self.navigation.set_destination(path, None);
        // Generous budget: landing hide animations top out well under 2s.
        self.run(2.0);
    }
}

#[test]
fn unknown_paths_resolve_to_the_landing_screen() {
    let mut site = Site::new();
    site.run(0.5);

    site.go("/#does-not-exist");

    assert_eq!(site.navigation.current_app_route(), None, "still on landing");
    assert!(!site.navigation.is_transitioning());
    assert_eq!(site.navigation.stats().screens_created, 0);
}

#[test]
fn other_routes_stay_on_the_landing_screen() {
    let mut site = Site::new();
    site.run(0.5);

    site.go("/#about");

    assert_eq!(site.navigation.current_app_route(), None);
    assert_eq!(site.navigation.stats().screens_created, 0);
}

#[test]
fn app_navigation_disposes_the_old_screen_exactly_once() {
    let mut site = Site::new();
    site.run(0.5);
    let landing_items = site.navigation.landing().item_count();

    site.go("/#alpha");
    assert_eq!(site.navigation.current_app_route(), Some(0), "alpha current");
    let stats = site.navigation.stats();
    assert_eq!(stats.screens_created, 1, "one alpha instance");
    assert_eq!(stats.screens_disposed, 0);

    site.go("/#beta");
    assert_eq!(site.navigation.current_app_route(), Some(1), "beta current");
    let stats = site.navigation.stats();
    assert_eq!(stats.screens_created, 2, "beta freshly constructed");
    assert_eq!(stats.screens_disposed, 1, "alpha disposed exactly once");

    assert_eq!(
        site.navigation.landing().item_count(),
        landing_items,
        "the landing singleton is never disposed"
    );
}

#[test]
fn returning_home_releases_the_app_screen() {
    let mut site = Site::new();
    site.run(0.5);
    let baseline_nodes = site.stage.graph.len();

    site.go("/#alpha");
    assert!(
        site.stage.graph.len() > baseline_nodes,
        "app screen adds scene nodes"
    );

    site.go("/");
    assert_eq!(site.navigation.current_app_route(), None);
    let stats = site.navigation.stats();
    assert_eq!(stats.screens_created, 1);
    assert_eq!(stats.screens_disposed, 1);
    assert_eq!(
        site.stage.graph.len(),
        baseline_nodes,
        "disposing the app screen returns the graph to its baseline"
    );
}

#[test]
fn sub_route_changes_switch_tabs_in_place() {
    let mut site = Site::new();
    site.run(0.5);

    site.go("/#alpha");
    let created = site.navigation.stats().screens_created;
    assert_eq!(
        site.navigation.current_app().and_then(|app| app.shown_tab()),
        Some("overview"),
        "no sub-segment opens the first tab"
    );

    site.go("/#alpha.gallery");
    assert_eq!(
        site.navigation.stats().screens_created,
        created,
        "tab switch reuses the live screen instance"
    );
    assert_eq!(
        site.navigation.current_app().and_then(|app| app.shown_tab()),
        Some("gallery")
    );

    // A sub-route that matches nothing degrades to the first tab.
    site.go("/#alpha.bogus");
    assert_eq!(
        site.navigation.current_app().and_then(|app| app.shown_tab()),
        Some("overview")
    );
    assert_eq!(site.navigation.stats().screens_created, created);
}

#[test]
fn mid_transition_navigation_is_deferred_not_lost() {
    let mut site = Site::new();
    site.run(0.5);

    // Request alpha, then beta one frame later, while the landing hide is
    // still animating.
    site.navigation.set_destination("/#alpha", None);
    site.run(1.0 / 60.0);
    assert!(site.navigation.is_transitioning(), "landing hide in flight");
    site.navigation.set_destination("/#beta", None);

    site.run(3.0);

    assert_eq!(
        site.navigation.current_app_route(),
        Some(1),
        "the later request wins once the transition resolves"
    );
    let stats = site.navigation.stats();
    assert_eq!(
        stats.screens_created - stats.screens_disposed,
        1,
        "exactly one live app screen after the dust settles"
    );
}

#[test]
fn landing_items_mirror_the_app_registry() {
    let site = Site::new();
    let landing = site.navigation.landing();

    assert_eq!(landing.item_count(), 2);
    assert_eq!(landing.item(0).unwrap().title(), "Alpha");
    assert_eq!(landing.item(1).unwrap().title(), "Beta");

    let origin = landing
        .origin_for_item(0, &site.stage)
        .expect("registry index resolves to an origin");
    assert_eq!(origin.item_index, 0);
}

#[test]
fn config_rejects_app_routes_without_tabs() {
    let json = r#"{ "apps": [ { "title": "X", "path": "/#x", "screen": "app", "tabs": [] } ] }"#;
    assert!(
        SiteConfig::from_json(json).is_err(),
        "an app route with no tabs cannot open a screen"
    );
}

#[test]
fn longest_route_match_wins_over_table_order() {
    let json = r#"
    {
        "apps": [
            { "title": "App", "path": "/#app", "screen": "app",
              "tabs": [ { "id": "a", "title": "A", "content": [] } ] },
            { "title": "App Two", "path": "/#app2", "screen": "app",
              "tabs": [ { "id": "b", "title": "B", "content": [] } ] }
        ],
        "other": []
    }
    "#;
    let config = SiteConfig::from_json(json).expect("config");
    let mut stage = Stage::new(1280.0, 720.0, Arc::new(DefaultAssetLoader));
    let mut navigation = Navigation::new(
        &mut stage,
        Box::new(MemoryPathProvider::new("/")),
        config,
    );

    let dt = 1.0 / 60.0;
    for _ in 0..30 {
        stage.update_interactions(dt);
        navigation.update(dt, &mut stage);
    }

    navigation.set_destination("/#app2", None);
    for _ in 0..180 {
        stage.update_interactions(dt);
        navigation.update(dt, &mut stage);
    }

    assert_eq!(
        navigation.current_app_route(),
        Some(1),
        "/#app2 must not be swallowed by the shorter /#app entry"
    );
}
