//! FILENAME: core/persistence/src/layout.rs
//! Saves and restores the pivot layout across sessions.

use pivot_engine::Layout;

use crate::store::KeyValueStore;
use crate::PersistenceError;

/// Well-known key the layout is stored under.
pub const LAYOUT_STORAGE_KEY: &str = "pivot_layout";

/// Layout persistence over an injected key-value store.
pub struct LayoutStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> LayoutStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_key(store, LAYOUT_STORAGE_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        LayoutStore {
            store,
            key: key.into(),
        }
    }

    /// Writes `layout` as JSON. A layout with no rows, cols or values is not
    /// written, so an initial empty layout never overwrites a saved one.
    /// Returns whether anything was written.
    pub fn save(&mut self, layout: &Layout) -> Result<bool, PersistenceError> {
        if !layout.has_report_fields() {
            log::debug!("skipping save of empty pivot layout");
            return Ok(false);
        }

        let json = serde_json::to_string(layout)?;
        self.store.set(&self.key, &json)?;
        log::info!(
            "saved pivot layout: rows={:?} cols={:?} values={:?} filters={:?}",
            layout.rows(),
            layout.cols(),
            layout.values(),
            layout.filters()
        );
        Ok(true)
    }

    /// Reads the saved layout. Missing, unreadable or malformed data all
    /// yield `None`; failures are logged, never returned.
    pub fn load(&self) -> Option<Layout> {
        let saved = match self.store.get(&self.key) {
            Ok(Some(saved)) => saved,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("failed to read pivot layout: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<Layout>(&saved) {
            Ok(layout) => {
                log::info!("restored pivot layout from {}", self.key);
                Some(layout)
            }
            Err(e) => {
                log::error!("Failed to load pivot layout: {}", e);
                None
            }
        }
    }

    /// The saved layout, or an empty one.
    pub fn load_or_default(&self) -> Layout {
        self.load().unwrap_or_default()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}
