//! Fixed-Function Modes
//!
//! Plain value types describing depth, stencil, color and primitive
//! configuration. They carry no driver handles and are cheap to copy, so a
//! render pass can build them once and push them through
//! [`Context::set_depth`](crate::Context::set_depth) and friends per draw.

use bitflags::bitflags;
use glam::{IVec2, UVec2, Vec4};

// ─── Comparison & Operations ─────────────────────────────────────────────────

/// Comparison function shared by depth and stencil tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// Action taken on the stencil buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Zero,
    Keep,
    Replace,
    Increment,
    Decrement,
    Invert,
    IncrementWrap,
    DecrementWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    ConstantColor,
    OneMinusConstantColor,
    ConstantAlpha,
    OneMinusConstantAlpha,
    SrcAlphaSaturate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendEquation {
    Add,
    Subtract,
    ReverseSubtract,
}

/// Server-side capabilities toggled with enable/disable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Blend,
    DepthTest,
    StencilTest,
}

bitflags! {
    /// Per-channel color write mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorMask: u8 {
        const RED = 1 << 0;
        const GREEN = 1 << 1;
        const BLUE = 1 << 2;
        const ALPHA = 1 << 3;
    }

    /// Buffers affected by a clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ClearMask: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
        const STENCIL = 1 << 2;
    }
}

// ─── Cell Payloads ───────────────────────────────────────────────────────────

/// Arguments of a stencil function call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFunc {
    pub func: CompareFunction,
    pub reference: i32,
    pub mask: u32,
}

/// Stencil actions for fail / depth-fail / pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilOps {
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub near: f32,
    pub far: f32,
}

impl Default for DepthRange {
    fn default() -> Self {
        Self { near: 0.0, far: 1.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlendFunc {
    pub src: BlendFactor,
    pub dst: BlendFactor,
}

/// Viewport rectangle in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Viewport {
    pub origin: IVec2,
    pub size: UVec2,
}

impl Viewport {
    #[must_use]
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            origin: IVec2::new(x, y),
            size: UVec2::new(width, height),
        }
    }
}

/// Texture unit index, `0` being the first unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TextureUnit(pub u8);

impl TextureUnit {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// ─── Composite Modes ─────────────────────────────────────────────────────────

/// Depth configuration of a draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthMode {
    pub func: CompareFunction,
    /// Depth writes enabled.
    pub mask: bool,
    pub range: DepthRange,
}

impl DepthMode {
    /// Depth test off, no writes.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            func: CompareFunction::Always,
            mask: false,
            range: DepthRange::default(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.func == CompareFunction::Always && !self.mask
    }
}

impl Default for DepthMode {
    fn default() -> Self {
        Self::disabled()
    }
}

/// The comparison half of a stencil configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilTest {
    pub func: CompareFunction,
    pub mask: u32,
}

impl StencilTest {
    pub const ALWAYS: Self = Self {
        func: CompareFunction::Always,
        mask: 0,
    };
}

/// Stencil configuration of a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilMode {
    pub test: StencilTest,
    pub reference: i32,
    /// Stencil write mask.
    pub mask: u32,
    pub fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

impl StencilMode {
    /// Stencil test off, no writes.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            test: StencilTest::ALWAYS,
            reference: 0,
            mask: 0,
            fail: StencilOp::Keep,
            depth_fail: StencilOp::Keep,
            pass: StencilOp::Keep,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.test.func == CompareFunction::Always && self.mask == 0
    }

    #[must_use]
    pub fn func(&self) -> StencilFunc {
        StencilFunc {
            func: self.test.func,
            reference: self.reference,
            mask: self.test.mask,
        }
    }

    #[must_use]
    pub fn ops(&self) -> StencilOps {
        StencilOps {
            fail: self.fail,
            depth_fail: self.depth_fail,
            pass: self.pass,
        }
    }
}

impl Default for StencilMode {
    fn default() -> Self {
        Self::disabled()
    }
}

/// How fragment color combines with the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFunction {
    /// Blending disabled; the fragment overwrites the destination.
    Replace,
    Add { src: BlendFactor, dst: BlendFactor },
    Subtract { src: BlendFactor, dst: BlendFactor },
    ReverseSubtract { src: BlendFactor, dst: BlendFactor },
}

impl BlendFunction {
    /// Premultiplied-alpha "over".
    pub const ALPHA_BLENDED: Self = Self::Add {
        src: BlendFactor::One,
        dst: BlendFactor::OneMinusSrcAlpha,
    };

    /// Equation and factors to apply, or `None` for [`Replace`](Self::Replace).
    #[must_use]
    pub fn resolve(&self) -> Option<(BlendEquation, BlendFunc)> {
        match *self {
            Self::Replace => None,
            Self::Add { src, dst } => Some((BlendEquation::Add, BlendFunc { src, dst })),
            Self::Subtract { src, dst } => Some((BlendEquation::Subtract, BlendFunc { src, dst })),
            Self::ReverseSubtract { src, dst } => {
                Some((BlendEquation::ReverseSubtract, BlendFunc { src, dst }))
            }
        }
    }
}

/// Color configuration of a draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorMode {
    pub blend_function: BlendFunction,
    pub blend_color: Vec4,
    pub mask: ColorMask,
}

impl ColorMode {
    #[must_use]
    pub fn unblended() -> Self {
        Self {
            blend_function: BlendFunction::Replace,
            blend_color: Vec4::ZERO,
            mask: ColorMask::all(),
        }
    }

    #[must_use]
    pub fn alpha_blended() -> Self {
        Self {
            blend_function: BlendFunction::ALPHA_BLENDED,
            ..Self::unblended()
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self {
            mask: ColorMask::empty(),
            ..Self::unblended()
        }
    }
}

impl Default for ColorMode {
    fn default() -> Self {
        Self::unblended()
    }
}

// ─── Draw Modes ──────────────────────────────────────────────────────────────

/// Primitive topology understood by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Points,
    Lines,
    LineStrip,
    Triangles,
    TriangleStrip,
}

/// Topology of a drawable together with the rasterization state it implies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawMode {
    Points { point_size: f32 },
    Lines { line_width: f32 },
    LineStrip { line_width: f32 },
    Triangles,
    TriangleStrip,
}

impl DrawMode {
    #[inline]
    #[must_use]
    pub fn primitive(&self) -> Primitive {
        match self {
            DrawMode::Points { .. } => Primitive::Points,
            DrawMode::Lines { .. } => Primitive::Lines,
            DrawMode::LineStrip { .. } => Primitive::LineStrip,
            DrawMode::Triangles => Primitive::Triangles,
            DrawMode::TriangleStrip => Primitive::TriangleStrip,
        }
    }
}
