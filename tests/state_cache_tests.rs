//! State Cache Tests
//!
//! Tests for:
//! - Redundant assignment elision through the public state cells
//! - set_dirty_state / reset_state
//! - clear: write masks opened for requested buffers
//! - set_depth / set_stencil / set_color call sequences
//! - bind_texture: sampling changes and per-unit bindings

use glam::{UVec2, Vec4};

use myth_gl::mode::{Capability, StencilOp};
use myth_gl::{
    AttributeBinding, AttributeType, BlendFactor, BlendFunction, BufferTarget, ColorMode,
    CompareFunction, Context, DepthMode, DepthRange, DrawMode, Drawable, DriverCall, GlError,
    HeadlessDriver, ObjectKind, Segment, StencilMode, StencilTest, TextureFilter, TextureMipMap,
    TextureUnit, Viewport,
};

fn context() -> Context<HeadlessDriver> {
    let _ = env_logger::builder().is_test(true).try_init();
    Context::new(HeadlessDriver::new())
}

fn calls(context: &Context<HeadlessDriver>, call: DriverCall) -> usize {
    context.driver().stats().count(call)
}

// ============================================================================
// Elision
// ============================================================================

#[test]
fn fresh_context_elides_default_assignments() {
    let mut context = context();

    assert!(!context.bind_framebuffer(None));
    assert!(!context.set_viewport(Viewport::default()));
    assert!(!context.set_active_texture(TextureUnit(0)));
    assert!(!context.bind_vertex_array(None));
    assert_eq!(context.driver().stats().total(), 0);
}

#[test]
fn repeated_viewport_is_applied_once() {
    let mut context = context();
    let rect = Viewport::new(0, 0, 1280, 720);

    assert!(context.set_viewport(rect));
    assert!(!context.set_viewport(rect));
    assert!(context.set_viewport(Viewport::new(0, 0, 640, 360)));

    assert_eq!(calls(&context, DriverCall::Viewport), 2);
    assert_eq!(*context.viewport().current(), Viewport::new(0, 0, 640, 360));
}

#[test]
fn set_dirty_state_forces_next_assignment() {
    let mut context = context();
    let rect = Viewport::new(0, 0, 800, 600);
    context.set_viewport(rect);

    context.set_dirty_state();
    assert!(context.viewport().is_dirty());
    assert!(context.bound_framebuffer().is_dirty());
    assert!(context.texture_binding(TextureUnit(1)).unwrap().is_dirty());

    assert!(context.set_viewport(rect));
    assert!(context.bind_framebuffer(None));
    assert!(context.bind_vertex_array(None));
    assert_eq!(calls(&context, DriverCall::Viewport), 2);
    assert_eq!(calls(&context, DriverCall::BindFramebuffer), 1);
}

#[test]
fn set_dirty_state_reaches_every_cell_once() -> anyhow::Result<()> {
    let mut context = context();
    let program = context.create_program()?;
    let vertices = context.create_vertex_buffer(&[[0.0_f32; 2]; 3])?;
    let indices = context.create_index_buffer(&[0_u16, 1, 2])?;
    let bindings = [AttributeBinding {
        location: 0,
        components: 2,
        kind: AttributeType::Float,
        normalized: false,
        offset: 0,
    }];
    let segments = [Segment {
        vertex_length: 3,
        index_length: 3,
        ..Default::default()
    }];
    let depth = DepthMode {
        func: CompareFunction::Less,
        mask: true,
        range: DepthRange::default(),
    };
    let stencil = StencilMode {
        test: StencilTest {
            func: CompareFunction::Always,
            mask: 0xFF,
        },
        mask: 0xFF,
        ..StencilMode::disabled()
    };
    let points = Drawable::new(
        DrawMode::Points { point_size: 1.0 },
        &program,
        &vertices,
        &bindings,
        &segments,
    )
    .with_index_buffer(&indices)
    .with_depth(depth)
    .with_stencil(stencil)
    .with_color(ColorMode::alpha_blended());
    let lines = Drawable {
        mode: DrawMode::Lines { line_width: 1.0 },
        ..points
    };
    // Builds the vertex array so the next draw is a cache hit.
    context.draw(&points)?;

    context.set_dirty_state();
    context.driver_mut().reset_stats();

    context.bind_framebuffer(None);
    context.set_viewport(Viewport::default());
    context.bind_texture_unit(TextureUnit(1), None)?;
    context.bind_texture_unit(TextureUnit(0), None)?;
    context.clear(Some(Vec4::ZERO), Some(1.0), Some(0));
    context.draw(&points)?;
    context.draw(&lines)?;

    let once = [
        DriverCall::BindFramebuffer,
        DriverCall::Viewport,
        DriverCall::BindVertexArray,
        DriverCall::ClearColor,
        DriverCall::ColorMask,
        DriverCall::ClearDepth,
        DriverCall::DepthMask,
        DriverCall::ClearStencil,
        DriverCall::StencilMask,
        DriverCall::PointSize,
        DriverCall::LineWidth,
        DriverCall::Capability(Capability::DepthTest),
        DriverCall::DepthFunc,
        DriverCall::DepthRange,
        DriverCall::Capability(Capability::StencilTest),
        DriverCall::StencilOp,
        DriverCall::StencilFunc,
        DriverCall::Capability(Capability::Blend),
        DriverCall::BlendColor,
        DriverCall::BlendEquation,
        DriverCall::BlendFunc,
        DriverCall::UseProgram,
    ];
    for call in once {
        assert_eq!(calls(&context, call), 1, "{call:?}");
    }
    // One activation and one binding per tracked unit.
    assert_eq!(calls(&context, DriverCall::ActiveTexture), 2);
    assert_eq!(calls(&context, DriverCall::BindTexture), 2);
    Ok(())
}

#[test]
fn reset_state_applies_every_default_once() {
    let mut context = context();
    context.reset_state();

    let once = [
        DriverCall::BindFramebuffer,
        DriverCall::Viewport,
        DriverCall::BindVertexArray,
        DriverCall::StencilFunc,
        DriverCall::StencilMask,
        DriverCall::Capability(Capability::StencilTest),
        DriverCall::StencilOp,
        DriverCall::DepthRange,
        DriverCall::DepthMask,
        DriverCall::Capability(Capability::DepthTest),
        DriverCall::DepthFunc,
        DriverCall::Capability(Capability::Blend),
        DriverCall::BlendEquation,
        DriverCall::BlendFunc,
        DriverCall::BlendColor,
        DriverCall::ColorMask,
        DriverCall::ClearDepth,
        DriverCall::ClearColor,
        DriverCall::ClearStencil,
        DriverCall::UseProgram,
        DriverCall::PointSize,
        DriverCall::LineWidth,
        DriverCall::BindBuffer(BufferTarget::Vertex),
        DriverCall::BindBuffer(BufferTarget::Element),
    ];
    for call in once {
        assert_eq!(calls(&context, call), 1, "{call:?}");
    }

    // One binding per tracked unit, each preceded by activating that unit.
    assert_eq!(calls(&context, DriverCall::BindTexture), 2);
    assert_eq!(calls(&context, DriverCall::ActiveTexture), 2);
    assert_eq!(*context.active_texture().current(), TextureUnit(0));

    // Everything is clean and at its default afterwards.
    context.driver_mut().reset_stats();
    assert!(!context.set_viewport(Viewport::default()));
    assert!(!context.bind_framebuffer(None));
    context.set_depth(&DepthMode::disabled());
    context.set_stencil(&StencilMode::disabled());
    assert_eq!(context.driver().stats().total(), 0);
}

// ============================================================================
// Clear
// ============================================================================

#[test]
fn clear_without_buffers_issues_nothing() {
    let mut context = context();
    context.clear(None, None, None);
    assert_eq!(context.driver().stats().total(), 0);
}

#[test]
fn clear_opens_write_masks() {
    let mut context = context();
    context.set_color(&ColorMode::disabled());
    context.set_depth(&DepthMode {
        func: CompareFunction::Less,
        mask: false,
        range: DepthRange::default(),
    });
    assert_eq!(calls(&context, DriverCall::ColorMask), 1);
    assert_eq!(calls(&context, DriverCall::DepthMask), 1);

    context.clear(Some(Vec4::new(0.1, 0.2, 0.3, 1.0)), Some(1.0), Some(0));

    assert_eq!(calls(&context, DriverCall::ColorMask), 2);
    assert_eq!(calls(&context, DriverCall::DepthMask), 2);
    assert_eq!(calls(&context, DriverCall::StencilMask), 1);
    assert_eq!(calls(&context, DriverCall::ClearColor), 1);
    // 1.0 and 0 are the cached defaults.
    assert_eq!(calls(&context, DriverCall::ClearDepth), 0);
    assert_eq!(calls(&context, DriverCall::ClearStencil), 0);
    assert_eq!(calls(&context, DriverCall::Clear), 1);
}

#[test]
fn clear_color_only_leaves_depth_alone() {
    let mut context = context();
    context.clear(Some(Vec4::ONE), None, None);

    assert_eq!(calls(&context, DriverCall::ClearColor), 1);
    assert_eq!(calls(&context, DriverCall::DepthMask), 0);
    assert_eq!(calls(&context, DriverCall::StencilMask), 0);
    assert_eq!(calls(&context, DriverCall::Clear), 1);
}

// ============================================================================
// Depth / Stencil / Color
// ============================================================================

#[test]
fn disabled_depth_only_toggles_the_test() {
    let mut context = context();
    context.set_depth(&DepthMode {
        func: CompareFunction::LessEqual,
        mask: true,
        range: DepthRange::default(),
    });
    assert_eq!(calls(&context, DriverCall::Capability(Capability::DepthTest)), 1);
    assert_eq!(calls(&context, DriverCall::DepthFunc), 1);
    assert_eq!(calls(&context, DriverCall::DepthMask), 0);
    assert_eq!(calls(&context, DriverCall::DepthRange), 0);

    context.set_depth(&DepthMode::disabled());
    assert_eq!(calls(&context, DriverCall::Capability(Capability::DepthTest)), 2);
    assert_eq!(calls(&context, DriverCall::DepthFunc), 1);
    assert_eq!(calls(&context, DriverCall::DepthMask), 0);
}

#[test]
fn enabled_stencil_pushes_mask_ops_and_func() {
    let mut context = context();
    let stencil = StencilMode {
        test: StencilTest {
            func: CompareFunction::Equal,
            mask: 0xFF,
        },
        reference: 1,
        mask: 0xFF,
        fail: StencilOp::Keep,
        depth_fail: StencilOp::Keep,
        pass: StencilOp::Replace,
    };

    context.set_stencil(&stencil);
    assert_eq!(calls(&context, DriverCall::Capability(Capability::StencilTest)), 1);
    assert_eq!(calls(&context, DriverCall::StencilMask), 1);
    assert_eq!(calls(&context, DriverCall::StencilOp), 1);
    assert_eq!(calls(&context, DriverCall::StencilFunc), 1);

    context.set_stencil(&stencil);
    assert_eq!(context.driver().stats().total(), 4);

    context.set_stencil(&StencilMode::disabled());
    assert_eq!(calls(&context, DriverCall::Capability(Capability::StencilTest)), 2);
    assert_eq!(context.driver().stats().total(), 5);
}

#[test]
fn replace_blending_disables_blend() {
    let mut context = context();

    context.set_color(&ColorMode::unblended());
    assert_eq!(calls(&context, DriverCall::Capability(Capability::Blend)), 1);
    assert_eq!(calls(&context, DriverCall::ColorMask), 0);
    assert_eq!(calls(&context, DriverCall::BlendFunc), 0);

    // Alpha blending matches every cached default except the capability.
    context.set_color(&ColorMode::alpha_blended());
    assert_eq!(calls(&context, DriverCall::Capability(Capability::Blend)), 2);
    assert_eq!(calls(&context, DriverCall::BlendEquation), 0);
    assert_eq!(calls(&context, DriverCall::BlendFunc), 0);
    assert_eq!(calls(&context, DriverCall::BlendColor), 0);

    context.set_color(&ColorMode {
        blend_function: BlendFunction::Subtract {
            src: BlendFactor::SrcAlpha,
            dst: BlendFactor::One,
        },
        ..ColorMode::alpha_blended()
    });
    assert_eq!(calls(&context, DriverCall::Capability(Capability::Blend)), 2);
    assert_eq!(calls(&context, DriverCall::BlendEquation), 1);
    assert_eq!(calls(&context, DriverCall::BlendFunc), 1);
}

// ============================================================================
// Textures
// ============================================================================

#[test]
fn texture_creation_binds_and_configures() -> anyhow::Result<()> {
    let mut context = context();
    let texture = context.create_texture_with_size(UVec2::new(4, 4), TextureUnit(0))?;

    assert_eq!(calls(&context, DriverCall::Create(ObjectKind::Texture)), 1);
    assert_eq!(calls(&context, DriverCall::ActiveTexture), 0);
    assert_eq!(calls(&context, DriverCall::BindTexture), 1);
    assert_eq!(calls(&context, DriverCall::TextureFilter), 1);
    assert_eq!(calls(&context, DriverCall::TextureWrap), 1);
    assert_eq!(calls(&context, DriverCall::TextureImage), 1);

    let binding = context.texture_binding(TextureUnit(0)).unwrap();
    assert!(binding.holds(&Some(texture.id())));
    assert_eq!(texture.size(), UVec2::new(4, 4));
    Ok(())
}

#[test]
fn bind_texture_elides_identical_binding() -> anyhow::Result<()> {
    let mut context = context();
    let mut texture = context.create_texture_with_size(UVec2::new(4, 4), TextureUnit(0))?;
    context.driver_mut().reset_stats();

    context.bind_texture(
        &mut texture,
        TextureUnit(0),
        TextureFilter::Nearest,
        TextureMipMap::No,
    )?;
    assert_eq!(context.driver().stats().total(), 0);

    context.bind_texture(
        &mut texture,
        TextureUnit(1),
        TextureFilter::Nearest,
        TextureMipMap::No,
    )?;
    assert_eq!(calls(&context, DriverCall::ActiveTexture), 1);
    assert_eq!(calls(&context, DriverCall::BindTexture), 1);
    assert_eq!(calls(&context, DriverCall::TextureFilter), 0);
    Ok(())
}

#[test]
fn bind_texture_applies_changed_sampling() -> anyhow::Result<()> {
    let mut context = context();
    let mut texture = context.create_texture_with_size(UVec2::new(8, 8), TextureUnit(1))?;
    context.driver_mut().reset_stats();

    context.bind_texture(
        &mut texture,
        TextureUnit(1),
        TextureFilter::Linear,
        TextureMipMap::No,
    )?;
    assert_eq!(calls(&context, DriverCall::TextureFilter), 1);
    assert_eq!(calls(&context, DriverCall::BindTexture), 0);
    assert_eq!(texture.filter(), TextureFilter::Linear);
    assert_eq!(texture.mipmap(), TextureMipMap::No);

    context.bind_texture(
        &mut texture,
        TextureUnit(1),
        TextureFilter::Linear,
        TextureMipMap::No,
    )?;
    assert_eq!(calls(&context, DriverCall::TextureFilter), 1);
    Ok(())
}

#[test]
fn texture_data_length_is_validated() {
    let mut context = context();
    let result = context.create_texture_with_data(UVec2::new(2, 2), &[0; 15], TextureUnit(0));

    assert_eq!(
        result.unwrap_err(),
        GlError::InvalidTextureData {
            expected: 16,
            actual: 15
        }
    );
    assert_eq!(context.driver().stats().allocated(ObjectKind::Texture), 0);
}

#[test]
fn texture_unit_beyond_tracked_range_is_rejected() {
    let mut context = context();
    let result = context.bind_texture_unit(TextureUnit(2), None);

    assert_eq!(
        result.unwrap_err(),
        GlError::TextureUnitOutOfRange {
            unit: 2,
            available: 2
        }
    );
    assert!(context.texture_binding(TextureUnit(2)).is_none());
    assert_eq!(context.driver().stats().total(), 0);
}
