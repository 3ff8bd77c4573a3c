//! Vertex & Index Buffers
//!
//! Write-once GPU buffers. The element type is kept as a phantom parameter so
//! a drawable can derive its vertex stride without the caller repeating it.

use std::fmt;
use std::marker::PhantomData;

use crate::object::{BufferId, UniqueBuffer};

/// Which binding point a buffer upload targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Vertex,
    Element,
}

pub struct VertexBuffer<V> {
    vertex_count: usize,
    buffer: UniqueBuffer,
    _marker: PhantomData<fn() -> V>,
}

impl<V> VertexBuffer<V> {
    pub(crate) fn new(vertex_count: usize, buffer: UniqueBuffer) -> Self {
        Self {
            vertex_count,
            buffer,
            _marker: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Stride of one vertex in bytes.
    #[inline]
    #[must_use]
    pub fn vertex_size(&self) -> usize {
        std::mem::size_of::<V>()
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }
}

impl<V> fmt::Debug for VertexBuffer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexBuffer")
            .field("vertex_count", &self.vertex_count)
            .field("buffer", &self.buffer)
            .finish()
    }
}

pub struct IndexBuffer<P> {
    index_count: usize,
    buffer: UniqueBuffer,
    _marker: PhantomData<fn() -> P>,
}

impl<P> IndexBuffer<P> {
    pub(crate) fn new(index_count: usize, buffer: UniqueBuffer) -> Self {
        Self {
            index_count,
            buffer,
            _marker: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> BufferId {
        self.buffer.id()
    }
}

impl<P> fmt::Debug for IndexBuffer<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexBuffer")
            .field("index_count", &self.index_count)
            .field("buffer", &self.buffer)
            .finish()
    }
}
