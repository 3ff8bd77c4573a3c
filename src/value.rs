//! Driver State Values
//!
//! One zero-sized marker per piece of fixed-function state. Each marker names
//! the payload type, its documented default, and the driver call that applies
//! it. [`State<V>`](crate::state::State) is generic over these markers.

use std::fmt;

use glam::Vec4;

use crate::buffer::BufferTarget;
use crate::driver::Driver;
use crate::mode::{
    self, BlendEquation as BlendEquationKind, Capability, ColorMask as ColorMaskBits,
    CompareFunction, StencilOp as StencilOpKind,
};
use crate::object::{BufferId, FramebufferId, ProgramId, TextureId, VertexArrayId};

/// A piece of driver state that can be cached.
pub trait Value {
    type Type: Clone + PartialEq + fmt::Debug;

    fn default_value() -> Self::Type;

    /// Issues the driver call setting this state to `value`.
    fn apply<D: Driver + ?Sized>(driver: &mut D, value: &Self::Type);
}

macro_rules! define_value {
    ($(#[$meta:meta])* $name:ident: $ty:ty = $default:expr, |$driver:ident, $value:ident| $apply:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl Value for $name {
            type Type = $ty;

            #[inline]
            fn default_value() -> Self::Type {
                $default
            }

            #[inline]
            fn apply<D: Driver + ?Sized>($driver: &mut D, $value: &Self::Type) {
                $apply
            }
        }
    };
}

// ─── Bindings ────────────────────────────────────────────────────────────────

define_value!(
    /// Framebuffer bound for drawing; `None` is the default framebuffer.
    BindFramebuffer: Option<FramebufferId> = None,
    |driver, value| driver.bind_framebuffer(*value)
);
define_value!(
    Viewport: mode::Viewport = mode::Viewport::default(),
    |driver, value| driver.viewport(value)
);
define_value!(
    ActiveTexture: mode::TextureUnit = mode::TextureUnit(0),
    |driver, value| driver.active_texture(*value)
);
define_value!(
    /// 2D texture bound to the active unit.
    BindTexture: Option<TextureId> = None,
    |driver, value| driver.bind_texture(*value)
);
define_value!(
    BindVertexArray: Option<VertexArrayId> = None,
    |driver, value| driver.bind_vertex_array(*value)
);
define_value!(
    Program: Option<ProgramId> = None,
    |driver, value| driver.use_program(*value)
);
define_value!(
    BindVertexBuffer: Option<BufferId> = None,
    |driver, value| driver.bind_buffer(BufferTarget::Vertex, *value)
);
define_value!(
    BindElementBuffer: Option<BufferId> = None,
    |driver, value| driver.bind_buffer(BufferTarget::Element, *value)
);

// ─── Stencil ─────────────────────────────────────────────────────────────────

define_value!(
    StencilFunc: mode::StencilFunc = mode::StencilFunc {
        func: CompareFunction::Always,
        reference: 0,
        mask: !0,
    },
    |driver, value| driver.stencil_func(value)
);
define_value!(
    StencilMask: u32 = !0,
    |driver, value| driver.stencil_mask(*value)
);
define_value!(
    StencilTest: bool = false,
    |driver, value| driver.set_capability(Capability::StencilTest, *value)
);
define_value!(
    StencilOp: mode::StencilOps = mode::StencilOps {
        fail: StencilOpKind::Keep,
        depth_fail: StencilOpKind::Keep,
        pass: StencilOpKind::Keep,
    },
    |driver, value| driver.stencil_op(value)
);

// ─── Depth ───────────────────────────────────────────────────────────────────

define_value!(
    DepthRange: mode::DepthRange = mode::DepthRange::default(),
    |driver, value| driver.depth_range(value)
);
define_value!(
    DepthMask: bool = true,
    |driver, value| driver.depth_mask(*value)
);
define_value!(
    DepthTest: bool = false,
    |driver, value| driver.set_capability(Capability::DepthTest, *value)
);
define_value!(
    DepthFunc: CompareFunction = CompareFunction::Less,
    |driver, value| driver.depth_func(*value)
);

// ─── Color ───────────────────────────────────────────────────────────────────

define_value!(
    Blend: bool = true,
    |driver, value| driver.set_capability(Capability::Blend, *value)
);
define_value!(
    BlendEquation: BlendEquationKind = BlendEquationKind::Add,
    |driver, value| driver.blend_equation(*value)
);
define_value!(
    BlendFunc: mode::BlendFunc = mode::BlendFunc {
        src: mode::BlendFactor::One,
        dst: mode::BlendFactor::OneMinusSrcAlpha,
    },
    |driver, value| driver.blend_func(value)
);
define_value!(
    BlendColor: Vec4 = Vec4::ZERO,
    |driver, value| driver.blend_color(*value)
);
define_value!(
    ColorMask: ColorMaskBits = ColorMaskBits::all(),
    |driver, value| driver.color_mask(*value)
);

// ─── Clear Values ────────────────────────────────────────────────────────────

define_value!(
    ClearDepth: f32 = 1.0,
    |driver, value| driver.clear_depth(*value)
);
define_value!(
    ClearColor: Vec4 = Vec4::ZERO,
    |driver, value| driver.clear_color(*value)
);
define_value!(
    ClearStencil: i32 = 0,
    |driver, value| driver.clear_stencil(*value)
);

// ─── Rasterization ───────────────────────────────────────────────────────────

define_value!(
    PointSize: f32 = 1.0,
    |driver, value| driver.point_size(*value)
);
define_value!(
    LineWidth: f32 = 1.0,
    |driver, value| driver.line_width(*value)
);
