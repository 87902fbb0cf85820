//! Asset cache tests: memoization and failure reporting.

use anyhow::Result;
use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use vitrine_engine::assets::{AssetCache, AssetLoader};
use vitrine_engine::StageError;

struct CountingLoader {
    loads: Rc<Cell<u32>>,
}

impl AssetLoader for CountingLoader {
    fn load_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.loads.set(self.loads.get() + 1);
        if path.ends_with(".missing") {
            anyhow::bail!("no such asset: {path}");
        }
        Ok(path.as_bytes().to_vec())
    }
}

#[test]
fn loads_are_memoized_by_path() {
    let loads = Rc::new(Cell::new(0));
    let mut cache = AssetCache::new(Arc::new(CountingLoader {
        loads: Rc::clone(&loads),
    }));

    let first = cache.load("meshes/cube.glb").expect("load succeeds");
    let second = cache.load("meshes/cube.glb").expect("cached load succeeds");

    assert_eq!(loads.get(), 1, "the loader runs once per path");
    assert!(Arc::ptr_eq(&first, &second), "cached bytes are shared");
    assert!(cache.contains("meshes/cube.glb"));
    assert_eq!(cache.len(), 1);
}

#[test]
fn failures_surface_as_errors_and_are_not_cached() {
    let loads = Rc::new(Cell::new(0));
    let mut cache = AssetCache::new(Arc::new(CountingLoader {
        loads: Rc::clone(&loads),
    }));

    let err = cache.load("tex/gone.missing").expect_err("load fails");
    assert!(matches!(err, StageError::AssetNotFound(path) if path == "tex/gone.missing"));
    assert!(!cache.contains("tex/gone.missing"));

    // The caller decides whether to retry; the cache does not.
    let _ = cache.load("tex/gone.missing").expect_err("still fails");
    assert_eq!(loads.get(), 2, "each explicit call hits the loader again");
}
