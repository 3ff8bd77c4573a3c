//! Context Settings
//!
//! Construction-time configuration for [`Context`](crate::Context).
//!
//! ```rust,ignore
//! use myth_gl::{Context, ContextSettings, HeadlessDriver};
//!
//! let settings = ContextSettings {
//!     max_pooled_textures: 16,
//!     ..Default::default()
//! };
//! let context = Context::with_settings(HeadlessDriver::new(), settings);
//! ```

/// Number of texture units whose bindings are mirrored by default.
pub const DEFAULT_TEXTURE_UNITS: usize = 2;

/// Default size of a texture allocation batch, and default pool cap.
pub const TEXTURE_MAX: usize = 64;

/// Tunables for a [`Context`](crate::Context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextSettings {
    /// Number of texture units whose bound texture is cached.
    ///
    /// Binding through a unit at or beyond this index is rejected.
    pub texture_units: usize,

    /// How many texture handles are generated at once when the pool runs dry.
    ///
    /// Clamped to at least 1.
    pub texture_batch_size: usize,

    /// Upper bound on released textures kept for reuse.
    ///
    /// Released textures past this cap are abandoned and deleted on the next
    /// cleanup instead of being pooled.
    pub max_pooled_textures: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            texture_units: DEFAULT_TEXTURE_UNITS,
            texture_batch_size: TEXTURE_MAX,
            max_pooled_textures: TEXTURE_MAX,
        }
    }
}

impl ContextSettings {
    #[inline]
    #[must_use]
    pub(crate) fn batch_size(&self) -> usize {
        self.texture_batch_size.max(1)
    }
}
