//! Textures
//!
//! A [`Texture`] owns one pooled texture name and remembers the sampling
//! parameters last applied to it, so rebinding with identical settings is free.

use glam::UVec2;

use crate::object::{TextureId, UniqueTexture};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFilter {
    #[default]
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureMipMap {
    #[default]
    No,
    Yes,
}

/// A 2D RGBA8 texture of fixed size.
#[derive(Debug)]
pub struct Texture {
    size: UVec2,
    texture: UniqueTexture,
    pub(crate) filter: TextureFilter,
    pub(crate) mipmap: TextureMipMap,
}

impl Texture {
    pub(crate) fn new(size: UVec2, texture: UniqueTexture) -> Self {
        // Freshly created textures are configured with nearest, non-mipmapped sampling.
        Self {
            size,
            texture,
            filter: TextureFilter::Nearest,
            mipmap: TextureMipMap::No,
        }
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> UVec2 {
        self.size
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TextureId {
        self.texture.id()
    }

    /// Filter last applied by [`Context::bind_texture`](crate::Context::bind_texture).
    #[inline]
    #[must_use]
    pub fn filter(&self) -> TextureFilter {
        self.filter
    }

    #[inline]
    #[must_use]
    pub fn mipmap(&self) -> TextureMipMap {
        self.mipmap
    }

    /// Byte length of tightly packed RGBA8 data for `size`.
    #[inline]
    #[must_use]
    pub fn rgba_len(size: UVec2) -> usize {
        size.x as usize * size.y as usize * 4
    }
}
