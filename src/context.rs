//! GL Context
//!
//! [`Context`] is the façade the rest of the renderer talks to. It owns the
//! [`Driver`], the mirrored fixed-function state, the vertex array cache and
//! the shared [`Reclaimer`].
//!
//! # Thread Affinity
//!
//! Every method taking `&mut self` may issue driver calls and must run on the
//! thread that currently holds the GL context. `Context` is `Send` so it can
//! move between threads together with the GL context, but it is not `Sync`.
//!
//! The [`Unique`] wrappers it hands out may be dropped anywhere; their ids wait
//! in the reclaimer until [`perform_cleanup`](Context::perform_cleanup) runs
//! on the owning thread. Debug builds assert that cleanup happens on the thread
//! that last called [`activate`](Context::activate) (or created the context).
//!
//! # Frame Loop
//!
//! ```rust,ignore
//! context.activate();
//! context.set_viewport(Viewport::new(0, 0, width, height));
//! context.clear(Some(Vec4::ZERO), Some(1.0), None);
//! context.draw(&drawable)?;
//! context.perform_cleanup();
//! context.deactivate();
//! ```

use std::cell::Cell;
use std::marker::PhantomData;
use std::sync::Arc;
use std::thread::{self, ThreadId};

use bytemuck::Pod;
use glam::{UVec2, Vec4};

use crate::buffer::{BufferTarget, IndexBuffer, VertexBuffer};
use crate::drawable::{Drawable, Segment};
use crate::driver::Driver;
use crate::errors::{GlError, Result};
use crate::mode::{
    ClearMask, ColorMask, ColorMode, DepthMode, DrawMode, Primitive, StencilMode, TextureUnit,
    Viewport as ViewportRect,
};
use crate::object::{
    BufferId, FramebufferId, Handle, ObjectKind, PendingObjects, ProgramId, Reclaimer, ShaderId,
    ShaderKind, TextureId, Unique, UniqueBuffer, UniqueFramebuffer, UniqueProgram, UniqueShader,
    UniqueTexture, VertexArrayId,
};
use crate::settings::ContextSettings;
use crate::state::State;
use crate::texture::{Texture, TextureFilter, TextureMipMap};
use crate::value::{
    ActiveTexture, BindElementBuffer, BindFramebuffer, BindTexture, BindVertexArray,
    BindVertexBuffer, Blend, BlendColor, BlendEquation, BlendFunc, ClearColor, ClearDepth,
    ClearStencil, ColorMask as ColorMaskValue, DepthFunc, DepthMask, DepthRange, DepthTest,
    LineWidth, PointSize, Program, StencilFunc, StencilMask, StencilOp, StencilTest, Value,
    Viewport,
};
use crate::vertex_array::{VertexArrayCache, VertexArrayKey};

/// Applies `$method($args)` to every cached state cell except the vertex array
/// binding, the per-unit texture bindings and the active unit.
macro_rules! for_each_state {
    ($self:ident, $method:ident $(, $arg:expr)?) => {{
        $self.bind_framebuffer.$method($($arg)?);
        $self.viewport.$method($($arg)?);
        $self.stencil_func.$method($($arg)?);
        $self.stencil_mask.$method($($arg)?);
        $self.stencil_test.$method($($arg)?);
        $self.stencil_op.$method($($arg)?);
        $self.depth_range.$method($($arg)?);
        $self.depth_mask.$method($($arg)?);
        $self.depth_test.$method($($arg)?);
        $self.depth_func.$method($($arg)?);
        $self.blend.$method($($arg)?);
        $self.blend_equation.$method($($arg)?);
        $self.blend_func.$method($($arg)?);
        $self.blend_color.$method($($arg)?);
        $self.color_mask.$method($($arg)?);
        $self.clear_depth.$method($($arg)?);
        $self.clear_color.$method($($arg)?);
        $self.clear_stencil.$method($($arg)?);
        $self.program.$method($($arg)?);
        $self.point_size.$method($($arg)?);
        $self.line_width.$method($($arg)?);
        $self.vertex_buffer.$method($($arg)?);
        // Element buffer binding belongs to the bound vertex array, so it
        // follows `vertex_array_object`.
        $self.element_buffer.$method($($arg)?);
    }};
}

/// Marks `cell` dirty when it still names one of the ids being deleted.
fn invalidate_bound<V, T>(cell: &mut State<V>, dying: &[T])
where
    V: Value<Type = Option<T>>,
    T: Handle,
{
    if cell.current().is_some_and(|id| dying.contains(&id)) {
        cell.set_dirty();
    }
}

pub struct Context<D: Driver> {
    driver: D,
    settings: ContextSettings,
    reclaimer: Arc<Reclaimer>,
    vertex_arrays: VertexArrayCache,
    owner: Option<ThreadId>,

    bind_framebuffer: State<BindFramebuffer>,
    viewport: State<Viewport>,
    active_texture: State<ActiveTexture>,
    texture: Vec<State<BindTexture>>,
    vertex_array_object: State<BindVertexArray>,

    stencil_func: State<StencilFunc>,
    stencil_mask: State<StencilMask>,
    stencil_test: State<StencilTest>,
    stencil_op: State<StencilOp>,
    depth_range: State<DepthRange>,
    depth_mask: State<DepthMask>,
    depth_test: State<DepthTest>,
    depth_func: State<DepthFunc>,
    blend: State<Blend>,
    blend_equation: State<BlendEquation>,
    blend_func: State<BlendFunc>,
    blend_color: State<BlendColor>,
    color_mask: State<ColorMaskValue>,
    clear_depth: State<ClearDepth>,
    clear_color: State<ClearColor>,
    clear_stencil: State<ClearStencil>,
    program: State<Program>,
    point_size: State<PointSize>,
    line_width: State<LineWidth>,
    vertex_buffer: State<BindVertexBuffer>,
    element_buffer: State<BindElementBuffer>,

    _not_sync: PhantomData<Cell<()>>,
}

impl<D: Driver> Context<D> {
    /// Wraps `driver` with default settings, owned by the calling thread.
    ///
    /// The cache assumes the driver is in its default state. Call
    /// [`reset_state`](Self::reset_state) or
    /// [`set_dirty_state`](Self::set_dirty_state) first if that is not known.
    #[must_use]
    pub fn new(driver: D) -> Self {
        Self::with_settings(driver, ContextSettings::default())
    }

    #[must_use]
    pub fn with_settings(driver: D, settings: ContextSettings) -> Self {
        let reclaimer = Arc::new(Reclaimer::new(settings.max_pooled_textures));
        // Units are addressed by `u8`.
        let units = settings.texture_units.min(usize::from(u8::MAX) + 1);
        let texture = (0..units).map(|_| State::new()).collect();
        Self {
            driver,
            reclaimer,
            vertex_arrays: VertexArrayCache::new(),
            owner: Some(thread::current().id()),
            texture,
            settings,

            bind_framebuffer: State::new(),
            viewport: State::new(),
            active_texture: State::new(),
            vertex_array_object: State::new(),
            stencil_func: State::new(),
            stencil_mask: State::new(),
            stencil_test: State::new(),
            stencil_op: State::new(),
            depth_range: State::new(),
            depth_mask: State::new(),
            depth_test: State::new(),
            depth_func: State::new(),
            blend: State::new(),
            blend_equation: State::new(),
            blend_func: State::new(),
            blend_color: State::new(),
            color_mask: State::new(),
            clear_depth: State::new(),
            clear_color: State::new(),
            clear_stencil: State::new(),
            program: State::new(),
            point_size: State::new(),
            line_width: State::new(),
            vertex_buffer: State::new(),
            element_buffer: State::new(),

            _not_sync: PhantomData,
        }
    }

    #[inline]
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Direct driver access. Calls made here bypass the cache; follow them
    /// with [`set_dirty_state`](Self::set_dirty_state) if they touch state.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &ContextSettings {
        &self.settings
    }

    // ── Thread ownership ────────────────────────────────────────────────────

    /// Records the calling thread as the one holding the GL context.
    pub fn activate(&mut self) {
        self.owner = Some(thread::current().id());
    }

    /// Records that no thread holds the GL context.
    pub fn deactivate(&mut self) {
        self.owner = None;
    }

    #[must_use]
    pub fn is_owned_by_current_thread(&self) -> bool {
        self.owner == Some(thread::current().id())
    }

    fn assert_owner(&self, operation: &str) {
        if cfg!(debug_assertions) {
            assert!(
                self.is_owned_by_current_thread(),
                "Context::{operation} called without exclusive access to the GL context"
            );
        }
    }

    // ── Object creation ─────────────────────────────────────────────────────

    fn unique<T: Handle>(&self, id: T) -> Unique<T> {
        Unique::new(id, Arc::clone(&self.reclaimer))
    }

    pub fn create_program(&mut self) -> Result<UniqueProgram> {
        let id = self
            .driver
            .create_program()
            .map_err(|reason| GlError::allocation(ObjectKind::Program, reason))?;
        Ok(self.unique(id))
    }

    pub fn create_vertex_shader(&mut self) -> Result<UniqueShader> {
        self.create_shader(ShaderKind::Vertex)
    }

    pub fn create_fragment_shader(&mut self) -> Result<UniqueShader> {
        self.create_shader(ShaderKind::Fragment)
    }

    fn create_shader(&mut self, kind: ShaderKind) -> Result<UniqueShader> {
        let id = self
            .driver
            .create_shader(kind)
            .map_err(|reason| GlError::allocation(ObjectKind::Shader, reason))?;
        Ok(self.unique(id))
    }

    pub fn create_framebuffer(&mut self) -> Result<UniqueFramebuffer> {
        let id = self
            .driver
            .create_framebuffer()
            .map_err(|reason| GlError::allocation(ObjectKind::Framebuffer, reason))?;
        Ok(self.unique(id))
    }

    fn create_buffer(&mut self) -> Result<UniqueBuffer> {
        let id = self
            .driver
            .create_buffer()
            .map_err(|reason| GlError::allocation(ObjectKind::Buffer, reason))?;
        Ok(self.unique(id))
    }

    /// Takes a texture name from the pool, generating a new batch when empty.
    ///
    /// The texture has no storage and nothing is bound.
    pub fn create_texture(&mut self) -> Result<UniqueTexture> {
        if let Some(id) = self.reclaimer.pop_pooled_texture() {
            return Ok(self.unique(id));
        }

        let batch = self
            .driver
            .create_textures(self.settings.batch_size())
            .map_err(|reason| GlError::allocation(ObjectKind::Texture, reason))?;
        log::debug!("Texture pool refilled with {} names", batch.len());
        self.reclaimer.fill_pool(batch);

        let id = self.reclaimer.pop_pooled_texture().ok_or_else(|| {
            GlError::allocation(ObjectKind::Texture, "driver returned an empty batch")
        })?;
        Ok(self.unique(id))
    }

    /// Uploads `vertices` into a new static buffer.
    pub fn create_vertex_buffer<V: Pod>(&mut self, vertices: &[V]) -> Result<VertexBuffer<V>> {
        let buffer = self.create_buffer()?;
        self.vertex_buffer.set(&mut self.driver, Some(buffer.id()));
        self.driver
            .buffer_data(BufferTarget::Vertex, bytemuck::cast_slice(vertices));
        Ok(VertexBuffer::new(vertices.len(), buffer))
    }

    /// Uploads `indices` into a new static element buffer.
    pub fn create_index_buffer<P: Pod>(&mut self, indices: &[P]) -> Result<IndexBuffer<P>> {
        let buffer = self.create_buffer()?;
        // The element binding is vertex array state; keep it out of cached arrays.
        self.bind_vertex_array(None);
        self.element_buffer.set(&mut self.driver, Some(buffer.id()));
        self.driver
            .buffer_data(BufferTarget::Element, bytemuck::cast_slice(indices));
        Ok(IndexBuffer::new(indices.len(), buffer))
    }

    /// Creates an empty RGBA8 texture bound to `unit`.
    pub fn create_texture_with_size(&mut self, size: UVec2, unit: TextureUnit) -> Result<Texture> {
        self.create_texture_storage(size, None, unit)
    }

    /// Creates an RGBA8 texture bound to `unit` and filled with `data`.
    ///
    /// `data` must hold exactly `width * height * 4` bytes.
    pub fn create_texture_with_data(
        &mut self,
        size: UVec2,
        data: &[u8],
        unit: TextureUnit,
    ) -> Result<Texture> {
        self.create_texture_storage(size, Some(data), unit)
    }

    fn create_texture_storage(
        &mut self,
        size: UVec2,
        data: Option<&[u8]>,
        unit: TextureUnit,
    ) -> Result<Texture> {
        if let Some(data) = data {
            let expected = Texture::rgba_len(size);
            if data.len() != expected {
                return Err(GlError::InvalidTextureData {
                    expected,
                    actual: data.len(),
                });
            }
        }
        self.check_unit(unit)?;

        let texture = self.create_texture()?;
        self.active_texture.set(&mut self.driver, unit);
        self.texture[unit.index()].set(&mut self.driver, Some(texture.id()));
        self.driver
            .texture_filter(TextureFilter::Nearest, TextureMipMap::No);
        self.driver.texture_wrap_clamp();
        self.driver.texture_image(size, data);
        Ok(Texture::new(size, texture))
    }

    fn check_unit(&self, unit: TextureUnit) -> Result<()> {
        if unit.index() < self.texture.len() {
            Ok(())
        } else {
            Err(GlError::TextureUnitOutOfRange {
                unit: unit.0,
                available: self.texture.len(),
            })
        }
    }

    // ── Composite operations ────────────────────────────────────────────────

    /// Binds `texture` to `unit` with the requested sampling.
    ///
    /// Issues no driver call when the texture is already bound there with the
    /// same filter and mipmap settings.
    pub fn bind_texture(
        &mut self,
        texture: &mut Texture,
        unit: TextureUnit,
        filter: TextureFilter,
        mipmap: TextureMipMap,
    ) -> Result<()> {
        self.check_unit(unit)?;
        let id = Some(texture.id());

        if filter != texture.filter || mipmap != texture.mipmap {
            self.active_texture.set(&mut self.driver, unit);
            self.texture[unit.index()].set(&mut self.driver, id);
            self.driver.texture_filter(filter, mipmap);
            texture.filter = filter;
            texture.mipmap = mipmap;
        } else if !self.texture[unit.index()].holds(&id) {
            // Checked first so the unit isn't activated without a bind following.
            self.active_texture.set(&mut self.driver, unit);
            self.texture[unit.index()].set(&mut self.driver, id);
        }
        Ok(())
    }

    /// Clears the requested buffers of the bound framebuffer.
    ///
    /// Write masks that would block a requested clear are opened first.
    pub fn clear(&mut self, color: Option<Vec4>, depth: Option<f32>, stencil: Option<i32>) {
        let mut mask = ClearMask::empty();

        if let Some(color) = color {
            mask |= ClearMask::COLOR;
            self.clear_color.set(&mut self.driver, color);
            self.color_mask.set(&mut self.driver, ColorMask::all());
        }
        if let Some(depth) = depth {
            mask |= ClearMask::DEPTH;
            self.clear_depth.set(&mut self.driver, depth);
            self.depth_mask.set(&mut self.driver, true);
        }
        if let Some(stencil) = stencil {
            mask |= ClearMask::STENCIL;
            self.clear_stencil.set(&mut self.driver, stencil);
            self.stencil_mask.set(&mut self.driver, 0xFF);
        }

        if !mask.is_empty() {
            self.driver.clear(mask);
        }
    }

    pub fn set_depth(&mut self, depth: &DepthMode) {
        if depth.is_disabled() {
            self.depth_test.set(&mut self.driver, false);
        } else {
            self.depth_test.set(&mut self.driver, true);
            self.depth_func.set(&mut self.driver, depth.func);
            self.depth_mask.set(&mut self.driver, depth.mask);
            self.depth_range.set(&mut self.driver, depth.range);
        }
    }

    pub fn set_stencil(&mut self, stencil: &StencilMode) {
        if stencil.is_disabled() {
            self.stencil_test.set(&mut self.driver, false);
        } else {
            self.stencil_test.set(&mut self.driver, true);
            self.stencil_mask.set(&mut self.driver, stencil.mask);
            self.stencil_op.set(&mut self.driver, stencil.ops());
            self.stencil_func.set(&mut self.driver, stencil.func());
        }
    }

    pub fn set_color(&mut self, color: &ColorMode) {
        match color.blend_function.resolve() {
            None => {
                self.blend.set(&mut self.driver, false);
            }
            Some((equation, func)) => {
                self.blend.set(&mut self.driver, true);
                self.blend_color.set(&mut self.driver, color.blend_color);
                self.blend_equation.set(&mut self.driver, equation);
                self.blend_func.set(&mut self.driver, func);
            }
        }
        self.color_mask.set(&mut self.driver, color.mask);
    }

    fn apply_draw_mode(&mut self, mode: &DrawMode) -> Primitive {
        match *mode {
            DrawMode::Points { point_size } => {
                self.point_size.set(&mut self.driver, point_size);
            }
            DrawMode::Lines { line_width } | DrawMode::LineStrip { line_width } => {
                self.line_width.set(&mut self.driver, line_width);
            }
            DrawMode::Triangles | DrawMode::TriangleStrip => {}
        }
        mode.primitive()
    }

    /// Submits every segment of `drawable`.
    ///
    /// Attribute pointers are based at each segment's vertex offset, so array
    /// draws start at vertex 0 of the segment.
    pub fn draw(&mut self, drawable: &Drawable<'_>) -> Result<()> {
        if drawable.segments.is_empty() {
            return Ok(());
        }

        let primitive = self.apply_draw_mode(&drawable.mode);
        self.set_depth(&drawable.depth);
        self.set_stencil(&drawable.stencil);
        self.set_color(&drawable.color);
        self.program.set(&mut self.driver, Some(drawable.program));

        for segment in drawable.segments {
            if self.prepare_vertex_array(drawable, segment)? {
                self.bind_attributes(drawable, segment);
            }

            if drawable.index_buffer.is_some() {
                self.driver.draw_elements(
                    primitive,
                    segment.index_length,
                    std::mem::size_of::<u16>() * segment.index_offset,
                );
            } else {
                self.driver
                    .draw_arrays(primitive, 0, segment.vertex_length);
            }
        }
        Ok(())
    }

    /// Binds the cached vertex array for this segment, creating it on a miss.
    ///
    /// Returns `true` when attribute bindings still have to be issued.
    fn prepare_vertex_array(&mut self, drawable: &Drawable<'_>, segment: &Segment) -> Result<bool> {
        if !self.driver.supports_vertex_arrays() {
            return Ok(true);
        }

        let key = VertexArrayKey {
            program: drawable.program,
            vertex_buffer: drawable.vertex_buffer,
            index_buffer: drawable.index_buffer,
            vertex_offset: segment.vertex_offset,
        };
        if let Some(id) = self.vertex_arrays.get(&key) {
            self.vertex_array_object.set(&mut self.driver, Some(id));
            return Ok(false);
        }

        let id = self
            .driver
            .create_vertex_array()
            .map_err(|reason| GlError::allocation(ObjectKind::VertexArray, reason))?;
        let vertex_array = self.unique(id);
        self.vertex_array_object.set(&mut self.driver, Some(id));
        self.vertex_arrays.insert(key, vertex_array);
        log::trace!(
            "Vertex array {} created for {key:?} ({} cached)",
            id.get(),
            self.vertex_arrays.len()
        );

        // A fresh vertex array carries no buffer bindings.
        self.vertex_buffer.set_dirty();
        self.element_buffer.set_dirty();
        Ok(true)
    }

    fn bind_attributes(&mut self, drawable: &Drawable<'_>, segment: &Segment) {
        self.vertex_buffer
            .set(&mut self.driver, Some(drawable.vertex_buffer));
        self.element_buffer
            .set(&mut self.driver, drawable.index_buffer);

        let base = drawable.vertex_size * segment.vertex_offset;
        for binding in drawable.attribute_bindings {
            self.driver
                .vertex_attrib_pointer(binding, drawable.vertex_size, base + binding.offset);
        }
    }

    // ── Reclamation ─────────────────────────────────────────────────────────

    /// Deletes every abandoned object.
    ///
    /// Only call this while the GL context is exclusive to this thread.
    pub fn perform_cleanup(&mut self) {
        self.assert_owner("perform_cleanup");

        let programs = self.reclaimer.take::<ProgramId>();
        if !programs.is_empty() {
            invalidate_bound(&mut self.program, &programs);
            self.driver.delete_programs(&programs);
        }

        let shaders = self.reclaimer.take::<ShaderId>();
        if !shaders.is_empty() {
            self.driver.delete_shaders(&shaders);
        }

        let buffers = self.reclaimer.take::<BufferId>();
        if !buffers.is_empty() {
            invalidate_bound(&mut self.vertex_buffer, &buffers);
            invalidate_bound(&mut self.element_buffer, &buffers);
            self.driver.delete_buffers(&buffers);
        }

        let textures = self.reclaimer.take::<TextureId>();
        if !textures.is_empty() {
            for unit in &mut self.texture {
                invalidate_bound(unit, &textures);
            }
            self.driver.delete_textures(&textures);
        }

        let vertex_arrays = self.reclaimer.take::<VertexArrayId>();
        if !vertex_arrays.is_empty() {
            invalidate_bound(&mut self.vertex_array_object, &vertex_arrays);
            self.driver.delete_vertex_arrays(&vertex_arrays);
        }

        let framebuffers = self.reclaimer.take::<FramebufferId>();
        if !framebuffers.is_empty() {
            invalidate_bound(&mut self.bind_framebuffer, &framebuffers);
            self.driver.delete_framebuffers(&framebuffers);
        }

        let reclaimed = programs.len()
            + shaders.len()
            + buffers.len()
            + textures.len()
            + vertex_arrays.len()
            + framebuffers.len();
        if reclaimed > 0 {
            log::debug!(
                "Reclaimed {reclaimed} GL objects (programs: {}, shaders: {}, buffers: {}, textures: {}, vertex arrays: {}, framebuffers: {})",
                programs.len(),
                shaders.len(),
                buffers.len(),
                textures.len(),
                vertex_arrays.len(),
                framebuffers.len()
            );
        }
    }

    /// Drains the texture pool and the vertex array cache, then deletes every
    /// abandoned object. Used before tearing the context down.
    ///
    /// Only call this while the GL context is exclusive to this thread.
    pub fn reset(&mut self) {
        self.assert_owner("reset");

        let pooled = self.reclaimer.abandon_pool();
        let cached = self.vertex_arrays.clear();
        log::debug!("Context reset: {pooled} pooled textures, {cached} vertex arrays released");
        self.perform_cleanup();
    }

    /// True when the texture pool and every abandonment queue are empty.
    #[must_use]
    pub fn empty(&self) -> bool {
        self.reclaimer.is_empty()
    }

    #[must_use]
    pub fn pending(&self) -> PendingObjects {
        self.reclaimer.pending()
    }

    /// Number of vertex array objects held by the cache.
    #[must_use]
    pub fn vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    // ── Whole-state control ─────────────────────────────────────────────────

    /// Forgets every cached value so the next assignment to each cell reaches
    /// the driver. Use after foreign code has touched GL state.
    pub fn set_dirty_state(&mut self) {
        self.vertex_array_object.set_dirty();
        for_each_state!(self, set_dirty);
        self.active_texture.set_dirty();
        for unit in &mut self.texture {
            unit.set_dirty();
        }
    }

    /// Writes the default of every cell through the driver.
    ///
    /// Each default is applied exactly once. Per-unit texture bindings need
    /// their unit activated first, so the active unit is also switched once
    /// for every tracked unit other than unit 0.
    pub fn reset_state(&mut self) {
        if self.driver.supports_vertex_arrays() {
            self.vertex_array_object.reset(&mut self.driver);
        }
        for_each_state!(self, reset, &mut self.driver);

        for index in (0..self.texture.len()).rev() {
            if index == 0 {
                self.active_texture.reset(&mut self.driver);
            } else {
                self.active_texture
                    .set(&mut self.driver, TextureUnit(index as u8));
            }
            self.texture[index].reset(&mut self.driver);
        }
        if self.texture.is_empty() {
            self.active_texture.reset(&mut self.driver);
        }
    }

    // ── Public state cells ──────────────────────────────────────────────────

    #[must_use]
    pub fn bound_framebuffer(&self) -> &State<BindFramebuffer> {
        &self.bind_framebuffer
    }

    /// Returns `true` when a driver call was issued.
    pub fn bind_framebuffer(&mut self, framebuffer: Option<FramebufferId>) -> bool {
        self.bind_framebuffer.set(&mut self.driver, framebuffer)
    }

    #[must_use]
    pub fn viewport(&self) -> &State<Viewport> {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: ViewportRect) -> bool {
        self.viewport.set(&mut self.driver, viewport)
    }

    #[must_use]
    pub fn active_texture(&self) -> &State<ActiveTexture> {
        &self.active_texture
    }

    pub fn set_active_texture(&mut self, unit: TextureUnit) -> bool {
        self.active_texture.set(&mut self.driver, unit)
    }

    /// Cached binding of `unit`, or `None` for an untracked unit.
    #[must_use]
    pub fn texture_binding(&self, unit: TextureUnit) -> Option<&State<BindTexture>> {
        self.texture.get(unit.index())
    }

    /// Activates `unit` and binds `texture` there.
    pub fn bind_texture_unit(
        &mut self,
        unit: TextureUnit,
        texture: Option<TextureId>,
    ) -> Result<bool> {
        self.check_unit(unit)?;
        let activated = self.active_texture.set(&mut self.driver, unit);
        let bound = self.texture[unit.index()].set(&mut self.driver, texture);
        Ok(activated || bound)
    }

    #[must_use]
    pub fn vertex_array_object(&self) -> &State<BindVertexArray> {
        &self.vertex_array_object
    }

    /// Returns `true` when a driver call was issued. Always `false` on drivers
    /// without vertex array support, where the binding is never forwarded.
    pub fn bind_vertex_array(&mut self, vertex_array: Option<VertexArrayId>) -> bool {
        if !self.driver.supports_vertex_arrays() {
            return false;
        }
        self.vertex_array_object.set(&mut self.driver, vertex_array)
    }
}

impl<D: Driver> Drop for Context<D> {
    fn drop(&mut self) {
        if self.is_owned_by_current_thread() {
            self.reset();
        } else {
            let pending = self.reclaimer.pending();
            log::warn!(
                "Context dropped without owning the GL context; leaking {} abandoned and {} pooled objects",
                pending.abandoned(),
                pending.pooled_textures
            );
        }
    }
}
