//! Two-state render cache.
//!
//! `Dirty` remembers the last surface (if any) so a degenerate paint request
//! can still hand something back; `Clean` holds the composite that is valid
//! for the current store and viewport.

use image::RgbaImage;

#[derive(Debug, Clone)]
pub enum RenderCache {
    Dirty { previous: Option<RgbaImage> },
    Clean { surface: RgbaImage },
}

impl Default for RenderCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderCache {
    pub fn new() -> Self {
        Self::Dirty { previous: None }
    }

    pub fn is_dirty(&self) -> bool {
        matches!(self, Self::Dirty { .. })
    }

    /// Mark the cached composite stale. The surface is kept as `previous`.
    pub fn invalidate(&mut self) {
        if let Self::Clean { .. } = self {
            if let Self::Clean { surface } = std::mem::replace(self, Self::new()) {
                *self = Self::Dirty { previous: Some(surface) };
            }
        }
    }

    /// Last surface produced, stale or not.
    pub fn surface(&self) -> Option<&RgbaImage> {
        match self {
            Self::Clean { surface } => Some(surface),
            Self::Dirty { previous } => previous.as_ref(),
        }
    }

    /// Run `regenerate` and store its result as the clean surface if the
    /// cache is dirty. Returns whether regeneration happened.
    pub fn regenerate_if_dirty<F>(&mut self, regenerate: F) -> bool
    where
        F: FnOnce() -> RgbaImage,
    {
        match self {
            Self::Clean { .. } => false,
            Self::Dirty { .. } => {
                *self = Self::Clean { surface: regenerate() };
                true
            }
        }
    }
}
