//! Headless Driver
//!
//! A [`Driver`] that never touches a GPU. Object names are handed out
//! sequentially per kind, every call is counted in [`CallStats`], and draw
//! commands and attribute pointers are recorded for inspection.
//!
//! Deleting a name the driver never handed out (or already deleted) is logged
//! and counted as an invalid deletion instead of panicking, so tests can assert
//! the context never double-frees.

use glam::{UVec2, Vec4};
use rustc_hash::{FxHashMap, FxHashSet};

use super::Driver;
use crate::buffer::BufferTarget;
use crate::drawable::AttributeBinding;
use crate::mode::{
    BlendEquation, BlendFunc, Capability, ClearMask, ColorMask, CompareFunction, DepthRange,
    Primitive, StencilFunc, StencilOps, TextureUnit, Viewport,
};
use crate::object::{
    BufferId, FramebufferId, ObjectKind, ProgramId, ShaderId, ShaderKind, TextureId,
    VertexArrayId,
};
use crate::texture::{TextureFilter, TextureMipMap};

/// Category of a counted driver call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverCall {
    Create(ObjectKind),
    Delete(ObjectKind),
    BufferData(BufferTarget),
    TextureImage,
    TextureFilter,
    TextureWrap,
    VertexAttribPointer,
    BindFramebuffer,
    Viewport,
    ActiveTexture,
    BindTexture,
    BindVertexArray,
    Capability(Capability),
    StencilFunc,
    StencilMask,
    StencilOp,
    DepthRange,
    DepthMask,
    DepthFunc,
    BlendFunc,
    BlendEquation,
    BlendColor,
    ColorMask,
    ClearDepth,
    ClearColor,
    ClearStencil,
    UseProgram,
    PointSize,
    LineWidth,
    BindBuffer(BufferTarget),
    Clear,
    DrawArrays,
    DrawElements,
}

/// Counters accumulated by a [`HeadlessDriver`].
#[derive(Debug, Clone, Default)]
pub struct CallStats {
    calls: FxHashMap<DriverCall, usize>,
    allocated: FxHashMap<ObjectKind, usize>,
    deleted: FxHashMap<ObjectKind, usize>,
    invalid_deletes: usize,
}

impl CallStats {
    /// Number of times `call` was issued.
    #[must_use]
    pub fn count(&self, call: DriverCall) -> usize {
        self.calls.get(&call).copied().unwrap_or(0)
    }

    /// Total number of driver calls of every category.
    #[must_use]
    pub fn total(&self) -> usize {
        self.calls.values().sum()
    }

    /// Number of object names generated for `kind`.
    #[must_use]
    pub fn allocated(&self, kind: ObjectKind) -> usize {
        self.allocated.get(&kind).copied().unwrap_or(0)
    }

    /// Number of object names deleted for `kind`.
    #[must_use]
    pub fn deleted(&self, kind: ObjectKind) -> usize {
        self.deleted.get(&kind).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn invalid_deletes(&self) -> usize {
        self.invalid_deletes
    }

    fn record(&mut self, call: DriverCall) {
        *self.calls.entry(call).or_default() += 1;
    }
}

/// A draw command observed by the headless driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawCommand {
    Arrays {
        primitive: Primitive,
        first: usize,
        count: usize,
    },
    Elements {
        primitive: Primitive,
        count: usize,
        byte_offset: usize,
    },
}

/// An attribute pointer observed by the headless driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributePointer {
    pub location: u32,
    pub stride: usize,
    pub offset: usize,
}

#[derive(Debug)]
pub struct HeadlessDriver {
    next_name: FxHashMap<ObjectKind, u32>,
    live: FxHashSet<(ObjectKind, u32)>,
    failing: FxHashSet<ObjectKind>,
    vertex_arrays: bool,
    stats: CallStats,
    draws: Vec<DrawCommand>,
    attribute_pointers: Vec<AttributePointer>,
}

impl Default for HeadlessDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_name: FxHashMap::default(),
            live: FxHashSet::default(),
            failing: FxHashSet::default(),
            vertex_arrays: true,
            stats: CallStats::default(),
            draws: Vec::new(),
            attribute_pointers: Vec::new(),
        }
    }

    /// A driver reporting no vertex array object support.
    #[must_use]
    pub fn without_vertex_arrays() -> Self {
        Self {
            vertex_arrays: false,
            ..Self::new()
        }
    }

    /// Makes every subsequent allocation of `kind` fail until
    /// [`restore_allocations`](Self::restore_allocations) is called.
    pub fn fail_allocations(&mut self, kind: ObjectKind) {
        self.failing.insert(kind);
    }

    pub fn restore_allocations(&mut self) {
        self.failing.clear();
    }

    #[must_use]
    pub fn stats(&self) -> &CallStats {
        &self.stats
    }

    /// Clears counters and recorded commands; live objects are kept.
    pub fn reset_stats(&mut self) {
        self.stats = CallStats::default();
        self.draws.clear();
        self.attribute_pointers.clear();
    }

    /// Number of names of `kind` generated and not yet deleted.
    #[must_use]
    pub fn live_objects(&self, kind: ObjectKind) -> usize {
        self.live.iter().filter(|(k, _)| *k == kind).count()
    }

    #[must_use]
    pub fn draws(&self) -> &[DrawCommand] {
        &self.draws
    }

    #[must_use]
    pub fn attribute_pointers(&self) -> &[AttributePointer] {
        &self.attribute_pointers
    }

    fn allocate(&mut self, kind: ObjectKind) -> Result<u32, String> {
        self.stats.record(DriverCall::Create(kind));
        if self.failing.contains(&kind) {
            return Err(format!("out of {kind} names"));
        }
        let next = self.next_name.entry(kind).or_insert(1);
        let name = *next;
        *next += 1;
        self.live.insert((kind, name));
        *self.stats.allocated.entry(kind).or_default() += 1;
        Ok(name)
    }

    fn delete(&mut self, kind: ObjectKind, names: impl IntoIterator<Item = u32>) {
        self.stats.record(DriverCall::Delete(kind));
        for name in names {
            if self.live.remove(&(kind, name)) {
                *self.stats.deleted.entry(kind).or_default() += 1;
            } else {
                log::warn!("HeadlessDriver: deleting unknown {kind} {name}");
                self.stats.invalid_deletes += 1;
            }
        }
    }
}

fn named<T>(raw: Result<u32, String>, wrap: fn(u32) -> Option<T>) -> Result<T, String> {
    raw.and_then(|name| wrap(name).ok_or_else(|| "driver returned name 0".to_owned()))
}

impl Driver for HeadlessDriver {
    fn create_program(&mut self) -> Result<ProgramId, String> {
        named(self.allocate(ObjectKind::Program), ProgramId::new)
    }

    fn create_shader(&mut self, _kind: ShaderKind) -> Result<ShaderId, String> {
        named(self.allocate(ObjectKind::Shader), ShaderId::new)
    }

    fn create_buffer(&mut self) -> Result<BufferId, String> {
        named(self.allocate(ObjectKind::Buffer), BufferId::new)
    }

    fn create_textures(&mut self, count: usize) -> Result<Vec<TextureId>, String> {
        let kind = ObjectKind::Texture;
        self.stats.record(DriverCall::Create(kind));
        if self.failing.contains(&kind) {
            return Err(format!("out of {kind} names"));
        }
        let next = self.next_name.entry(kind).or_insert(1);
        let first = *next;
        *next += count as u32;
        let names: Vec<u32> = (first..first + count as u32).collect();
        self.live.extend(names.iter().map(|&name| (kind, name)));
        *self.stats.allocated.entry(kind).or_default() += count;
        Ok(names.into_iter().filter_map(TextureId::new).collect())
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, String> {
        if !self.vertex_arrays {
            return Err("vertex array objects are not supported".to_owned());
        }
        named(self.allocate(ObjectKind::VertexArray), VertexArrayId::new)
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId, String> {
        named(self.allocate(ObjectKind::Framebuffer), FramebufferId::new)
    }

    fn supports_vertex_arrays(&self) -> bool {
        self.vertex_arrays
    }

    fn delete_programs(&mut self, ids: &[ProgramId]) {
        self.delete(ObjectKind::Program, ids.iter().copied().map(ProgramId::get));
    }

    fn delete_shaders(&mut self, ids: &[ShaderId]) {
        self.delete(ObjectKind::Shader, ids.iter().copied().map(ShaderId::get));
    }

    fn delete_buffers(&mut self, ids: &[BufferId]) {
        self.delete(ObjectKind::Buffer, ids.iter().copied().map(BufferId::get));
    }

    fn delete_textures(&mut self, ids: &[TextureId]) {
        self.delete(ObjectKind::Texture, ids.iter().copied().map(TextureId::get));
    }

    fn delete_vertex_arrays(&mut self, ids: &[VertexArrayId]) {
        self.delete(ObjectKind::VertexArray, ids.iter().copied().map(VertexArrayId::get));
    }

    fn delete_framebuffers(&mut self, ids: &[FramebufferId]) {
        self.delete(ObjectKind::Framebuffer, ids.iter().copied().map(FramebufferId::get));
    }

    fn buffer_data(&mut self, target: BufferTarget, _data: &[u8]) {
        self.stats.record(DriverCall::BufferData(target));
    }

    fn texture_image(&mut self, _size: UVec2, _data: Option<&[u8]>) {
        self.stats.record(DriverCall::TextureImage);
    }

    fn texture_filter(&mut self, _filter: TextureFilter, _mipmap: TextureMipMap) {
        self.stats.record(DriverCall::TextureFilter);
    }

    fn texture_wrap_clamp(&mut self) {
        self.stats.record(DriverCall::TextureWrap);
    }

    fn vertex_attrib_pointer(&mut self, binding: &AttributeBinding, stride: usize, offset: usize) {
        self.stats.record(DriverCall::VertexAttribPointer);
        self.attribute_pointers.push(AttributePointer {
            location: binding.location,
            stride,
            offset,
        });
    }

    fn bind_framebuffer(&mut self, _id: Option<FramebufferId>) {
        self.stats.record(DriverCall::BindFramebuffer);
    }

    fn viewport(&mut self, _viewport: &Viewport) {
        self.stats.record(DriverCall::Viewport);
    }

    fn active_texture(&mut self, _unit: TextureUnit) {
        self.stats.record(DriverCall::ActiveTexture);
    }

    fn bind_texture(&mut self, _id: Option<TextureId>) {
        self.stats.record(DriverCall::BindTexture);
    }

    fn bind_vertex_array(&mut self, _id: Option<VertexArrayId>) {
        self.stats.record(DriverCall::BindVertexArray);
    }

    fn set_capability(&mut self, capability: Capability, _enabled: bool) {
        self.stats.record(DriverCall::Capability(capability));
    }

    fn stencil_func(&mut self, _func: &StencilFunc) {
        self.stats.record(DriverCall::StencilFunc);
    }

    fn stencil_mask(&mut self, _mask: u32) {
        self.stats.record(DriverCall::StencilMask);
    }

    fn stencil_op(&mut self, _ops: &StencilOps) {
        self.stats.record(DriverCall::StencilOp);
    }

    fn depth_range(&mut self, _range: &DepthRange) {
        self.stats.record(DriverCall::DepthRange);
    }

    fn depth_mask(&mut self, _enabled: bool) {
        self.stats.record(DriverCall::DepthMask);
    }

    fn depth_func(&mut self, _func: CompareFunction) {
        self.stats.record(DriverCall::DepthFunc);
    }

    fn blend_func(&mut self, _func: &BlendFunc) {
        self.stats.record(DriverCall::BlendFunc);
    }

    fn blend_equation(&mut self, _equation: BlendEquation) {
        self.stats.record(DriverCall::BlendEquation);
    }

    fn blend_color(&mut self, _color: Vec4) {
        self.stats.record(DriverCall::BlendColor);
    }

    fn color_mask(&mut self, _mask: ColorMask) {
        self.stats.record(DriverCall::ColorMask);
    }

    fn clear_depth(&mut self, _depth: f32) {
        self.stats.record(DriverCall::ClearDepth);
    }

    fn clear_color(&mut self, _color: Vec4) {
        self.stats.record(DriverCall::ClearColor);
    }

    fn clear_stencil(&mut self, _stencil: i32) {
        self.stats.record(DriverCall::ClearStencil);
    }

    fn use_program(&mut self, _id: Option<ProgramId>) {
        self.stats.record(DriverCall::UseProgram);
    }

    fn point_size(&mut self, _size: f32) {
        self.stats.record(DriverCall::PointSize);
    }

    fn line_width(&mut self, _width: f32) {
        self.stats.record(DriverCall::LineWidth);
    }

    fn bind_buffer(&mut self, target: BufferTarget, _id: Option<BufferId>) {
        self.stats.record(DriverCall::BindBuffer(target));
    }

    fn clear(&mut self, _mask: ClearMask) {
        self.stats.record(DriverCall::Clear);
    }

    fn draw_arrays(&mut self, primitive: Primitive, first: usize, count: usize) {
        self.stats.record(DriverCall::DrawArrays);
        self.draws.push(DrawCommand::Arrays {
            primitive,
            first,
            count,
        });
    }

    fn draw_elements(&mut self, primitive: Primitive, count: usize, byte_offset: usize) {
        self.stats.record(DriverCall::DrawElements);
        self.draws.push(DrawCommand::Elements {
            primitive,
            count,
            byte_offset,
        });
    }
}
