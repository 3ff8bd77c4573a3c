//! Driver Seam
//!
//! [`Driver`] is the only place the context talks to the GPU. Every method maps
//! to one driver entry point (or a short fixed sequence of them), so call
//! counts observed at this boundary are the state changes actually issued.
//!
//! Two backends ship with the crate:
//!
//! | Backend | Purpose |
//! |---------|---------|
//! | [`GlowDriver`] | Native OpenGL / GLES through `glow` |
//! | [`HeadlessDriver`] | No GPU; hands out sequential names and counts calls |
//!
//! All methods must be called on the thread that currently owns the GL context.

mod headless;
mod native;

pub use headless::{AttributePointer, CallStats, DrawCommand, DriverCall, HeadlessDriver};
pub use native::GlowDriver;

use glam::{UVec2, Vec4};

use crate::buffer::BufferTarget;
use crate::drawable::AttributeBinding;
use crate::mode::{
    BlendEquation, BlendFunc, Capability, ClearMask, ColorMask, CompareFunction, DepthRange,
    Primitive, StencilFunc, StencilOps, TextureUnit, Viewport,
};
use crate::object::{
    BufferId, FramebufferId, ProgramId, ShaderId, ShaderKind, TextureId, VertexArrayId,
};
use crate::texture::{TextureFilter, TextureMipMap};

/// Raw GPU entry points used by [`Context`](crate::Context).
///
/// Allocation methods return the driver's error message on failure; the
/// context turns it into [`GlError::ResourceAllocation`](crate::GlError).
pub trait Driver {
    // ── Allocation ──────────────────────────────────────────────────────────

    fn create_program(&mut self) -> Result<ProgramId, String>;
    fn create_shader(&mut self, kind: ShaderKind) -> Result<ShaderId, String>;
    fn create_buffer(&mut self) -> Result<BufferId, String>;
    /// Generates `count` texture names in one go.
    fn create_textures(&mut self, count: usize) -> Result<Vec<TextureId>, String>;
    fn create_vertex_array(&mut self) -> Result<VertexArrayId, String>;
    fn create_framebuffer(&mut self) -> Result<FramebufferId, String>;

    /// Whether vertex array objects are available.
    ///
    /// Without them the context re-binds attributes on every draw.
    fn supports_vertex_arrays(&self) -> bool {
        true
    }

    // ── Bulk deletion ───────────────────────────────────────────────────────

    fn delete_programs(&mut self, ids: &[ProgramId]);
    fn delete_shaders(&mut self, ids: &[ShaderId]);
    fn delete_buffers(&mut self, ids: &[BufferId]);
    fn delete_textures(&mut self, ids: &[TextureId]);
    fn delete_vertex_arrays(&mut self, ids: &[VertexArrayId]);
    fn delete_framebuffers(&mut self, ids: &[FramebufferId]);

    // ── Uploads (act on the currently bound object) ─────────────────────────

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]);
    /// Allocates RGBA8 storage for the bound 2D texture, optionally filled.
    fn texture_image(&mut self, size: UVec2, data: Option<&[u8]>);
    fn texture_filter(&mut self, filter: TextureFilter, mipmap: TextureMipMap);
    fn texture_wrap_clamp(&mut self);
    /// Enables `binding.location` and points it at the bound vertex buffer.
    fn vertex_attrib_pointer(&mut self, binding: &AttributeBinding, stride: usize, offset: usize);

    // ── Fixed-function state ────────────────────────────────────────────────

    fn bind_framebuffer(&mut self, id: Option<FramebufferId>);
    fn viewport(&mut self, viewport: &Viewport);
    fn active_texture(&mut self, unit: TextureUnit);
    fn bind_texture(&mut self, id: Option<TextureId>);
    /// Never called by [`Context`](crate::Context) when
    /// [`supports_vertex_arrays`](Self::supports_vertex_arrays) is `false`.
    fn bind_vertex_array(&mut self, id: Option<VertexArrayId>);
    fn set_capability(&mut self, capability: Capability, enabled: bool);
    fn stencil_func(&mut self, func: &StencilFunc);
    fn stencil_mask(&mut self, mask: u32);
    fn stencil_op(&mut self, ops: &StencilOps);
    fn depth_range(&mut self, range: &DepthRange);
    fn depth_mask(&mut self, enabled: bool);
    fn depth_func(&mut self, func: CompareFunction);
    fn blend_func(&mut self, func: &BlendFunc);
    fn blend_equation(&mut self, equation: BlendEquation);
    fn blend_color(&mut self, color: Vec4);
    fn color_mask(&mut self, mask: ColorMask);
    fn clear_depth(&mut self, depth: f32);
    fn clear_color(&mut self, color: Vec4);
    fn clear_stencil(&mut self, stencil: i32);
    fn use_program(&mut self, id: Option<ProgramId>);
    /// Rasterized point size.
    ///
    /// Core profiles and GLES take the size from `gl_PointSize` in the vertex
    /// shader, so `GlowDriver` issues no GL call here. The cached value is
    /// still tracked for callers that feed it to their shaders.
    fn point_size(&mut self, size: f32);
    fn line_width(&mut self, width: f32);
    fn bind_buffer(&mut self, target: BufferTarget, id: Option<BufferId>);

    // ── Commands ────────────────────────────────────────────────────────────

    fn clear(&mut self, mask: ClearMask);
    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize);
    /// Draws `count` `u16` indices starting `byte_offset` into the element buffer.
    fn draw_elements(&mut self, primitive: Primitive, count: usize, byte_offset: usize);
}
