//! OpenGL backend through `glow`.
//!
//! Every `unsafe` GL call in the crate lives in this file. Safety rests on the
//! contract stated on [`GlowDriver::new`]: the wrapped context is current on
//! the calling thread whenever a method runs.

use glam::{UVec2, Vec4};
use glow::{HasContext, PixelUnpackData};

use super::Driver;
use crate::buffer::BufferTarget;
use crate::drawable::{AttributeBinding, AttributeType};
use crate::mode::{
    BlendEquation, BlendFactor, BlendFunc, Capability, ClearMask, ColorMask, CompareFunction,
    DepthRange, Primitive, StencilFunc, StencilOp, StencilOps, TextureUnit, Viewport,
};
use crate::object::{
    BufferId, FramebufferId, ProgramId, ShaderId, ShaderKind, TextureId, VertexArrayId,
};
use crate::texture::{TextureFilter, TextureMipMap};

pub struct GlowDriver {
    gl: glow::Context,
    vertex_arrays: bool,
}

impl GlowDriver {
    /// Wraps a loaded `glow` context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the thread calling any [`Driver`] method of the
    /// returned value, and no other thread may issue GL calls on it meanwhile.
    #[must_use]
    pub unsafe fn new(gl: glow::Context) -> Self {
        let version = gl.version();
        let extensions = gl.supported_extensions();
        let vertex_arrays = version.major >= 3
            || extensions.contains("GL_ARB_vertex_array_object")
            || extensions.contains("GL_OES_vertex_array_object")
            || (cfg!(target_vendor = "apple")
                && extensions.contains("GL_APPLE_vertex_array_object"));
        if !vertex_arrays {
            log::warn!(
                "GlowDriver: vertex array objects unavailable on GL {}.{}; attributes will be re-bound per draw",
                version.major,
                version.minor
            );
        }
        Self { gl, vertex_arrays }
    }

    #[must_use]
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn into_inner(self) -> glow::Context {
        self.gl
    }
}

// ─── Enum Mapping ────────────────────────────────────────────────────────────

fn compare_function(func: CompareFunction) -> u32 {
    match func {
        CompareFunction::Never => glow::NEVER,
        CompareFunction::Less => glow::LESS,
        CompareFunction::Equal => glow::EQUAL,
        CompareFunction::LessEqual => glow::LEQUAL,
        CompareFunction::Greater => glow::GREATER,
        CompareFunction::NotEqual => glow::NOTEQUAL,
        CompareFunction::GreaterEqual => glow::GEQUAL,
        CompareFunction::Always => glow::ALWAYS,
    }
}

fn stencil_op(op: StencilOp) -> u32 {
    match op {
        StencilOp::Zero => glow::ZERO,
        StencilOp::Keep => glow::KEEP,
        StencilOp::Replace => glow::REPLACE,
        StencilOp::Increment => glow::INCR,
        StencilOp::Decrement => glow::DECR,
        StencilOp::Invert => glow::INVERT,
        StencilOp::IncrementWrap => glow::INCR_WRAP,
        StencilOp::DecrementWrap => glow::DECR_WRAP,
    }
}

fn blend_factor(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcColor => glow::SRC_COLOR,
        BlendFactor::OneMinusSrcColor => glow::ONE_MINUS_SRC_COLOR,
        BlendFactor::DstColor => glow::DST_COLOR,
        BlendFactor::OneMinusDstColor => glow::ONE_MINUS_DST_COLOR,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DstAlpha => glow::DST_ALPHA,
        BlendFactor::OneMinusDstAlpha => glow::ONE_MINUS_DST_ALPHA,
        BlendFactor::ConstantColor => glow::CONSTANT_COLOR,
        BlendFactor::OneMinusConstantColor => glow::ONE_MINUS_CONSTANT_COLOR,
        BlendFactor::ConstantAlpha => glow::CONSTANT_ALPHA,
        BlendFactor::OneMinusConstantAlpha => glow::ONE_MINUS_CONSTANT_ALPHA,
        BlendFactor::SrcAlphaSaturate => glow::SRC_ALPHA_SATURATE,
    }
}

fn primitive(primitive: Primitive) -> u32 {
    match primitive {
        Primitive::Points => glow::POINTS,
        Primitive::Lines => glow::LINES,
        Primitive::LineStrip => glow::LINE_STRIP,
        Primitive::Triangles => glow::TRIANGLES,
        Primitive::TriangleStrip => glow::TRIANGLE_STRIP,
    }
}

fn buffer_target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Vertex => glow::ARRAY_BUFFER,
        BufferTarget::Element => glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn attribute_type(kind: AttributeType) -> u32 {
    match kind {
        AttributeType::Byte => glow::BYTE,
        AttributeType::UnsignedByte => glow::UNSIGNED_BYTE,
        AttributeType::Short => glow::SHORT,
        AttributeType::UnsignedShort => glow::UNSIGNED_SHORT,
        AttributeType::Float => glow::FLOAT,
    }
}

fn min_filter(filter: TextureFilter, mipmap: TextureMipMap) -> u32 {
    match (filter, mipmap) {
        (TextureFilter::Nearest, TextureMipMap::No) => glow::NEAREST,
        (TextureFilter::Nearest, TextureMipMap::Yes) => glow::NEAREST_MIPMAP_NEAREST,
        (TextureFilter::Linear, TextureMipMap::No) => glow::LINEAR,
        (TextureFilter::Linear, TextureMipMap::Yes) => glow::LINEAR_MIPMAP_NEAREST,
    }
}

// ─── Driver ──────────────────────────────────────────────────────────────────

impl Driver for GlowDriver {
    fn create_program(&mut self) -> Result<ProgramId, String> {
        unsafe { self.gl.create_program() }.map(|p| ProgramId::from(p.0))
    }

    fn create_shader(&mut self, kind: ShaderKind) -> Result<ShaderId, String> {
        let stage = match kind {
            ShaderKind::Vertex => glow::VERTEX_SHADER,
            ShaderKind::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe { self.gl.create_shader(stage) }.map(|s| ShaderId::from(s.0))
    }

    fn create_buffer(&mut self) -> Result<BufferId, String> {
        unsafe { self.gl.create_buffer() }.map(|b| BufferId::from(b.0))
    }

    fn create_textures(&mut self, count: usize) -> Result<Vec<TextureId>, String> {
        let mut ids = Vec::with_capacity(count);
        for _ in 0..count {
            match unsafe { self.gl.create_texture() } {
                Ok(texture) => ids.push(TextureId::from(texture.0)),
                Err(err) => {
                    // Hand back whatever was generated before the failure.
                    self.delete_textures(&ids);
                    return Err(err);
                }
            }
        }
        Ok(ids)
    }

    fn create_vertex_array(&mut self) -> Result<VertexArrayId, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| VertexArrayId::from(v.0))
    }

    fn create_framebuffer(&mut self) -> Result<FramebufferId, String> {
        unsafe { self.gl.create_framebuffer() }.map(|f| FramebufferId::from(f.0))
    }

    fn supports_vertex_arrays(&self) -> bool {
        self.vertex_arrays
    }

    fn delete_programs(&mut self, ids: &[ProgramId]) {
        for id in ids {
            unsafe { self.gl.delete_program(glow::NativeProgram(id.as_non_zero())) };
        }
    }

    fn delete_shaders(&mut self, ids: &[ShaderId]) {
        for id in ids {
            unsafe { self.gl.delete_shader(glow::NativeShader(id.as_non_zero())) };
        }
    }

    fn delete_buffers(&mut self, ids: &[BufferId]) {
        for id in ids {
            unsafe { self.gl.delete_buffer(glow::NativeBuffer(id.as_non_zero())) };
        }
    }

    fn delete_textures(&mut self, ids: &[TextureId]) {
        for id in ids {
            unsafe { self.gl.delete_texture(glow::NativeTexture(id.as_non_zero())) };
        }
    }

    fn delete_vertex_arrays(&mut self, ids: &[VertexArrayId]) {
        for id in ids {
            unsafe {
                self.gl
                    .delete_vertex_array(glow::NativeVertexArray(id.as_non_zero()));
            }
        }
    }

    fn delete_framebuffers(&mut self, ids: &[FramebufferId]) {
        for id in ids {
            unsafe {
                self.gl
                    .delete_framebuffer(glow::NativeFramebuffer(id.as_non_zero()));
            }
        }
    }

    fn buffer_data(&mut self, target: BufferTarget, data: &[u8]) {
        unsafe {
            self.gl
                .buffer_data_u8_slice(buffer_target(target), data, glow::STATIC_DRAW);
        }
    }

    fn texture_image(&mut self, size: UVec2, data: Option<&[u8]>) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA as i32,
                size.x as i32,
                size.y as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(data),
            );
        }
    }

    fn texture_filter(&mut self, filter: TextureFilter, mipmap: TextureMipMap) {
        let mag = match filter {
            TextureFilter::Nearest => glow::NEAREST,
            TextureFilter::Linear => glow::LINEAR,
        };
        unsafe {
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                min_filter(filter, mipmap) as i32,
            );
            self.gl
                .tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, mag as i32);
        }
    }

    fn texture_wrap_clamp(&mut self) {
        unsafe {
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_S,
                glow::CLAMP_TO_EDGE as i32,
            );
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_WRAP_T,
                glow::CLAMP_TO_EDGE as i32,
            );
        }
    }

    fn vertex_attrib_pointer(&mut self, binding: &AttributeBinding, stride: usize, offset: usize) {
        unsafe {
            self.gl.enable_vertex_attrib_array(binding.location);
            self.gl.vertex_attrib_pointer_f32(
                binding.location,
                binding.components,
                attribute_type(binding.kind),
                binding.normalized,
                stride as i32,
                offset as i32,
            );
        }
    }

    fn bind_framebuffer(&mut self, id: Option<FramebufferId>) {
        let framebuffer = id.map(|id| glow::NativeFramebuffer(id.as_non_zero()));
        unsafe { self.gl.bind_framebuffer(glow::FRAMEBUFFER, framebuffer) };
    }

    fn viewport(&mut self, viewport: &Viewport) {
        unsafe {
            self.gl.viewport(
                viewport.origin.x,
                viewport.origin.y,
                viewport.size.x as i32,
                viewport.size.y as i32,
            );
        }
    }

    fn active_texture(&mut self, unit: TextureUnit) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + u32::from(unit.0)) };
    }

    fn bind_texture(&mut self, id: Option<TextureId>) {
        let texture = id.map(|id| glow::NativeTexture(id.as_non_zero()));
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) };
    }

    fn bind_vertex_array(&mut self, id: Option<VertexArrayId>) {
        // glow panics on an entry point that was never loaded.
        if !self.vertex_arrays {
            return;
        }
        let vertex_array = id.map(|id| glow::NativeVertexArray(id.as_non_zero()));
        unsafe { self.gl.bind_vertex_array(vertex_array) };
    }

    fn set_capability(&mut self, capability: Capability, enabled: bool) {
        let cap = match capability {
            Capability::Blend => glow::BLEND,
            Capability::DepthTest => glow::DEPTH_TEST,
            Capability::StencilTest => glow::STENCIL_TEST,
        };
        unsafe {
            if enabled {
                self.gl.enable(cap);
            } else {
                self.gl.disable(cap);
            }
        }
    }

    fn stencil_func(&mut self, func: &StencilFunc) {
        unsafe {
            self.gl
                .stencil_func(compare_function(func.func), func.reference, func.mask);
        }
    }

    fn stencil_mask(&mut self, mask: u32) {
        unsafe { self.gl.stencil_mask(mask) };
    }

    fn stencil_op(&mut self, ops: &StencilOps) {
        unsafe {
            self.gl.stencil_op(
                stencil_op(ops.fail),
                stencil_op(ops.depth_fail),
                stencil_op(ops.pass),
            );
        }
    }

    fn depth_range(&mut self, range: &DepthRange) {
        unsafe { self.gl.depth_range_f32(range.near, range.far) };
    }

    fn depth_mask(&mut self, enabled: bool) {
        unsafe { self.gl.depth_mask(enabled) };
    }

    fn depth_func(&mut self, func: CompareFunction) {
        unsafe { self.gl.depth_func(compare_function(func)) };
    }

    fn blend_func(&mut self, func: &BlendFunc) {
        unsafe {
            self.gl
                .blend_func(blend_factor(func.src), blend_factor(func.dst));
        }
    }

    fn blend_equation(&mut self, equation: BlendEquation) {
        let mode = match equation {
            BlendEquation::Add => glow::FUNC_ADD,
            BlendEquation::Subtract => glow::FUNC_SUBTRACT,
            BlendEquation::ReverseSubtract => glow::FUNC_REVERSE_SUBTRACT,
        };
        unsafe { self.gl.blend_equation(mode) };
    }

    fn blend_color(&mut self, color: Vec4) {
        unsafe { self.gl.blend_color(color.x, color.y, color.z, color.w) };
    }

    fn color_mask(&mut self, mask: ColorMask) {
        unsafe {
            self.gl.color_mask(
                mask.contains(ColorMask::RED),
                mask.contains(ColorMask::GREEN),
                mask.contains(ColorMask::BLUE),
                mask.contains(ColorMask::ALPHA),
            );
        }
    }

    fn clear_depth(&mut self, depth: f32) {
        unsafe { self.gl.clear_depth_f32(depth) };
    }

    fn clear_color(&mut self, color: Vec4) {
        unsafe { self.gl.clear_color(color.x, color.y, color.z, color.w) };
    }

    fn clear_stencil(&mut self, stencil: i32) {
        unsafe { self.gl.clear_stencil(stencil) };
    }

    fn use_program(&mut self, id: Option<ProgramId>) {
        let program = id.map(|id| glow::NativeProgram(id.as_non_zero()));
        unsafe { self.gl.use_program(program) };
    }

    fn point_size(&mut self, _size: f32) {}

    fn line_width(&mut self, width: f32) {
        unsafe { self.gl.line_width(width) };
    }

    fn bind_buffer(&mut self, target: BufferTarget, id: Option<BufferId>) {
        let buffer = id.map(|id| glow::NativeBuffer(id.as_non_zero()));
        unsafe { self.gl.bind_buffer(buffer_target(target), buffer) };
    }

    fn clear(&mut self, mask: ClearMask) {
        let mut bits = 0;
        if mask.contains(ClearMask::COLOR) {
            bits |= glow::COLOR_BUFFER_BIT;
        }
        if mask.contains(ClearMask::DEPTH) {
            bits |= glow::DEPTH_BUFFER_BIT;
        }
        if mask.contains(ClearMask::STENCIL) {
            bits |= glow::STENCIL_BUFFER_BIT;
        }
        unsafe { self.gl.clear(bits) };
    }

    fn draw_arrays(&mut self, primitive_type: Primitive, first: usize, count: usize) {
        unsafe {
            self.gl
                .draw_arrays(primitive(primitive_type), first as i32, count as i32);
        }
    }

    fn draw_elements(&mut self, primitive_type: Primitive, count: usize, byte_offset: usize) {
        unsafe {
            self.gl.draw_elements(
                primitive(primitive_type),
                count as i32,
                glow::UNSIGNED_SHORT,
                byte_offset as i32,
            );
        }
    }
}
