//! Change notifications raised toward the host.

use crate::types::{GeoPoint, GridPosition, ZoomScale};
use std::sync::mpsc::Sender;

#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A tile was stored (inserted or replaced)
    TileAdded { scale: ZoomScale, position: GridPosition },
    ScaleChanged(ZoomScale),
    CenterChanged(GeoPoint),
    /// Cached output is stale; the host should schedule a repaint
    DisplayChanged,
}

/// Receiver of [`MapEvent`]s, supplied at construction time.
pub trait EventSink {
    fn notify(&self, event: &MapEvent);
}

impl<F> EventSink for F
where
    F: Fn(&MapEvent),
{
    fn notify(&self, event: &MapEvent) {
        self(event)
    }
}

impl EventSink for Sender<MapEvent> {
    fn notify(&self, event: &MapEvent) {
        // A dropped receiver means nobody is listening any more.
        if self.send(event.clone()).is_err() {
            log::trace!("event receiver gone, dropping {:?}", event);
        }
    }
}

pub type BoxedSink = Box<dyn EventSink + Send>;
