//! Vertex Array Cache
//!
//! Building a vertex array object means binding buffers and issuing one
//! attribute pointer call per attribute. The result only depends on the
//! program, the two buffers and the base vertex, so it is cached under a
//! [`VertexArrayKey`] and rebuilt only when one of those changes.
//!
//! Entries are never evicted during normal rendering. The number of distinct
//! keys is bounded by the number of (program, buffer, segment) combinations the
//! application draws, and the whole cache is dropped by
//! [`Context::reset`](crate::Context::reset).

use std::hash::{Hash, Hasher};

use rustc_hash::FxHashMap;

use crate::object::{BufferId, ProgramId, UniqueVertexArray, VertexArrayId};

/// Structural identity of a vertex array object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexArrayKey {
    pub program: ProgramId,
    pub vertex_buffer: BufferId,
    pub index_buffer: Option<BufferId>,
    /// Base vertex the attribute pointers were set up for.
    pub vertex_offset: usize,
}

#[inline]
fn hash_combine(seed: u64, value: u64) -> u64 {
    seed ^ value
        .wrapping_add(0x9e37_79b9_7f4a_7c15)
        .wrapping_add(seed << 6)
        .wrapping_add(seed >> 2)
}

impl VertexArrayKey {
    /// Combined hash of all four components.
    #[must_use]
    pub fn combined_hash(&self) -> u64 {
        let mut seed = u64::from(self.program.get());
        seed = hash_combine(seed, u64::from(self.vertex_buffer.get()));
        // 0 never names a buffer, so it stands in for "no index buffer".
        seed = hash_combine(seed, u64::from(self.index_buffer.map_or(0, BufferId::get)));
        hash_combine(seed, self.vertex_offset as u64)
    }
}

impl Hash for VertexArrayKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.combined_hash());
    }
}

/// Vertex array objects keyed by [`VertexArrayKey`].
///
/// Keys hold raw driver names. Once a program or buffer is deleted, the driver
/// may hand its name out again, and a later object reusing the name with the
/// same base vertex hits the old entry, whose attribute pointers still point
/// at the deleted storage. Call [`Context::reset`](crate::Context::reset)
/// after tearing down programs or buffers whose names may come back.
#[derive(Debug, Default)]
pub struct VertexArrayCache {
    entries: FxHashMap<VertexArrayKey, UniqueVertexArray>,
}

impl VertexArrayCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: &VertexArrayKey) -> Option<VertexArrayId> {
        self.entries.get(key).map(UniqueVertexArray::id)
    }

    pub fn insert(&mut self, key: VertexArrayKey, vertex_array: UniqueVertexArray) {
        let previous = self.entries.insert(key, vertex_array);
        debug_assert!(previous.is_none(), "vertex array cached twice for {key:?}");
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops every entry, abandoning the vertex arrays they own.
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}
