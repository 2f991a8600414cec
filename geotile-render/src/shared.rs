//! Mutex-serialized handle for hosts that touch the map from several threads.

use crate::map_view::MapView;
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct SharedMapView {
    inner: Arc<Mutex<MapView>>,
}

impl SharedMapView {
    pub fn new(view: MapView) -> Self {
        Self {
            inner: Arc::new(Mutex::new(view)),
        }
    }

    /// Run `f` with exclusive access to the view.
    pub fn with<R>(&self, f: impl FnOnce(&mut MapView) -> R) -> R {
        let mut guard = self.inner.lock();
        f(&mut guard)
    }
}
