//! Drawables
//!
//! A [`Drawable`] is everything [`Context::draw`](crate::Context::draw) needs
//! for one submission: the program, buffers, vertex layout, fixed-function
//! modes and the segments to draw. It borrows the layout and segment slices, so
//! building one per frame allocates nothing.

use crate::buffer::{IndexBuffer, VertexBuffer};
use crate::mode::{ColorMode, DepthMode, DrawMode, StencilMode};
use crate::object::{BufferId, ProgramId, UniqueProgram};

/// Component type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Byte,
    UnsignedByte,
    Short,
    UnsignedShort,
    Float,
}

/// One attribute of the vertex layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeBinding {
    /// Shader attribute location.
    pub location: u32,
    /// Number of components, 1 to 4.
    pub components: i32,
    pub kind: AttributeType,
    pub normalized: bool,
    /// Byte offset of the attribute within one vertex.
    pub offset: usize,
}

/// A contiguous range of vertices and indices drawn with one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Segment {
    /// First vertex; attribute pointers are based here.
    pub vertex_offset: usize,
    /// First index, in indices.
    pub index_offset: usize,
    pub vertex_length: usize,
    pub index_length: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Drawable<'a> {
    pub mode: DrawMode,
    pub depth: DepthMode,
    pub stencil: StencilMode,
    pub color: ColorMode,
    pub program: ProgramId,
    pub vertex_buffer: BufferId,
    /// Vertex stride in bytes.
    pub vertex_size: usize,
    /// `u16` element buffer; `None` draws arrays.
    pub index_buffer: Option<BufferId>,
    pub attribute_bindings: &'a [AttributeBinding],
    pub segments: &'a [Segment],
}

impl<'a> Drawable<'a> {
    /// A non-indexed drawable with depth, stencil and blending disabled.
    #[must_use]
    pub fn new<V>(
        mode: DrawMode,
        program: &UniqueProgram,
        vertices: &VertexBuffer<V>,
        attribute_bindings: &'a [AttributeBinding],
        segments: &'a [Segment],
    ) -> Self {
        Self {
            mode,
            depth: DepthMode::disabled(),
            stencil: StencilMode::disabled(),
            color: ColorMode::unblended(),
            program: program.id(),
            vertex_buffer: vertices.id(),
            vertex_size: vertices.vertex_size(),
            index_buffer: None,
            attribute_bindings,
            segments,
        }
    }

    #[must_use]
    pub fn with_index_buffer(mut self, indices: &IndexBuffer<u16>) -> Self {
        self.index_buffer = Some(indices.id());
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: DepthMode) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_stencil(mut self, stencil: StencilMode) -> Self {
        self.stencil = stencil;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }
}
