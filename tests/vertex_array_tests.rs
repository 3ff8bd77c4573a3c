//! Vertex Array & Draw Tests
//!
//! Tests for:
//! - VertexArrayCache reuse keyed by (program, vertex buffer, index buffer, base vertex)
//! - Attribute pointer offsets per segment
//! - Indexed / array draw commands
//! - Drivers without vertex array object support
//! - Draw mode rasterization state (point size, line width)

use myth_gl::{
    AttributeBinding, AttributePointer, AttributeType, BufferTarget, ColorMode, CompareFunction,
    Context, DepthMode, DepthRange, DrawCommand, DrawMode, Drawable, DriverCall, HeadlessDriver,
    IndexBuffer, ObjectKind, Primitive, Segment, UniqueProgram, VertexBuffer,
};

type Vertex = [f32; 4];

const BINDINGS: [AttributeBinding; 2] = [
    AttributeBinding {
        location: 0,
        components: 2,
        kind: AttributeType::Float,
        normalized: false,
        offset: 0,
    },
    AttributeBinding {
        location: 1,
        components: 2,
        kind: AttributeType::Float,
        normalized: false,
        offset: 8,
    },
];

struct Scene {
    context: Context<HeadlessDriver>,
    program: UniqueProgram,
    buffer_a: VertexBuffer<Vertex>,
    buffer_b: VertexBuffer<Vertex>,
    indices: IndexBuffer<u16>,
}

fn scene_with(driver: HeadlessDriver) -> anyhow::Result<Scene> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut context = Context::new(driver);
    let program = context.create_program()?;
    let buffer_a = context.create_vertex_buffer(&[[0.0; 4]; 3])?;
    let buffer_b = context.create_vertex_buffer(&[[0.0; 4]; 5])?;
    let indices = context.create_index_buffer(&[0_u16, 1, 2, 2, 1, 0])?;
    context.driver_mut().reset_stats();
    Ok(Scene {
        context,
        program,
        buffer_a,
        buffer_b,
        indices,
    })
}

fn scene() -> anyhow::Result<Scene> {
    scene_with(HeadlessDriver::new())
}

fn segment(vertex_offset: usize, index_offset: usize) -> Segment {
    Segment {
        vertex_offset,
        index_offset,
        vertex_length: 3,
        index_length: 3,
    }
}

fn calls(context: &Context<HeadlessDriver>, call: DriverCall) -> usize {
    context.driver().stats().count(call)
}

// ============================================================================
// Cache Keys
// ============================================================================

#[test]
fn identical_keys_share_one_vertex_array() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        buffer_b,
        indices,
    } = scene()?;
    assert_eq!(buffer_a.vertex_count(), 3);
    assert_eq!(buffer_b.vertex_count(), 5);

    let at_zero = [segment(0, 0)];
    let drawable = Drawable::new(DrawMode::Triangles, &program, &buffer_a, &BINDINGS, &at_zero)
        .with_index_buffer(&indices);

    context.draw(&drawable)?;
    context.draw(&drawable)?;
    assert_eq!(context.vertex_array_count(), 1);
    assert_eq!(calls(&context, DriverCall::Create(ObjectKind::VertexArray)), 1);
    assert_eq!(calls(&context, DriverCall::VertexAttribPointer), 2);

    let shifted = [segment(2, 0)];
    context.draw(&Drawable { segments: &shifted, ..drawable })?;
    assert_eq!(context.vertex_array_count(), 2);

    let other_buffer = Drawable::new(DrawMode::Triangles, &program, &buffer_b, &BINDINGS, &at_zero)
        .with_index_buffer(&indices);
    context.draw(&other_buffer)?;
    assert_eq!(context.vertex_array_count(), 3);
    assert_eq!(calls(&context, DriverCall::Create(ObjectKind::VertexArray)), 3);
    Ok(())
}

#[test]
fn cached_vertex_arrays_are_rebound_on_switch() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        indices,
        ..
    } = scene()?;
    let first = [segment(0, 0)];
    let second = [segment(3, 0)];
    let a = Drawable::new(DrawMode::Triangles, &program, &buffer_a, &BINDINGS, &first)
        .with_index_buffer(&indices);
    let b = Drawable { segments: &second, ..a };

    context.draw(&a)?;
    context.draw(&b)?;
    context.draw(&a)?;
    context.draw(&a)?;

    assert_eq!(calls(&context, DriverCall::Create(ObjectKind::VertexArray)), 2);
    assert_eq!(calls(&context, DriverCall::BindVertexArray), 3);
    assert_eq!(calls(&context, DriverCall::VertexAttribPointer), 4);
    Ok(())
}

#[test]
fn new_vertex_array_rebinds_buffers() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        indices,
        ..
    } = scene()?;
    let segments = [segment(0, 0)];
    let drawable = Drawable::new(DrawMode::Triangles, &program, &buffer_a, &BINDINGS, &segments)
        .with_index_buffer(&indices);

    context.draw(&drawable)?;

    // Both buffers were bound before the draw, but the fresh vertex array
    // carries no bindings of its own.
    assert_eq!(calls(&context, DriverCall::BindBuffer(BufferTarget::Vertex)), 1);
    assert_eq!(calls(&context, DriverCall::BindBuffer(BufferTarget::Element)), 1);
    Ok(())
}

#[test]
fn index_buffer_creation_unbinds_vertex_array() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        ..
    } = scene()?;
    let segments = [segment(0, 0)];
    context.draw(&Drawable::new(
        DrawMode::Triangles,
        &program,
        &buffer_a,
        &BINDINGS,
        &segments,
    ))?;
    assert!(context.vertex_array_object().current().is_some());

    let _indices = context.create_index_buffer(&[0_u16, 1, 2])?;
    assert_eq!(*context.vertex_array_object().current(), None);
    assert_eq!(calls(&context, DriverCall::BufferData(BufferTarget::Element)), 1);
    Ok(())
}

// ============================================================================
// Draw Commands
// ============================================================================

#[test]
fn attribute_pointers_start_at_segment_base() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_b,
        ..
    } = scene()?;
    let segments = [segment(3, 0)];
    context.draw(&Drawable::new(
        DrawMode::Triangles,
        &program,
        &buffer_b,
        &BINDINGS,
        &segments,
    ))?;

    assert_eq!(
        context.driver().attribute_pointers(),
        &[
            AttributePointer {
                location: 0,
                stride: 16,
                offset: 48,
            },
            AttributePointer {
                location: 1,
                stride: 16,
                offset: 56,
            },
        ]
    );
    Ok(())
}

#[test]
fn indexed_segments_draw_elements_at_byte_offsets() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_b,
        indices,
        ..
    } = scene()?;
    let segments = [segment(0, 0), segment(2, 3)];
    context.draw(
        &Drawable::new(DrawMode::TriangleStrip, &program, &buffer_b, &BINDINGS, &segments)
            .with_index_buffer(&indices),
    )?;

    assert_eq!(
        context.driver().draws(),
        &[
            DrawCommand::Elements {
                primitive: Primitive::TriangleStrip,
                count: 3,
                byte_offset: 0,
            },
            DrawCommand::Elements {
                primitive: Primitive::TriangleStrip,
                count: 3,
                byte_offset: 6,
            },
        ]
    );
    assert_eq!(context.vertex_array_count(), 2);
    Ok(())
}

#[test]
fn unindexed_segments_draw_arrays() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        ..
    } = scene()?;
    let segments = [Segment {
        vertex_length: 3,
        ..Default::default()
    }];
    context.draw(&Drawable::new(
        DrawMode::Triangles,
        &program,
        &buffer_a,
        &BINDINGS,
        &segments,
    ))?;

    assert_eq!(
        context.driver().draws(),
        &[DrawCommand::Arrays {
            primitive: Primitive::Triangles,
            first: 0,
            count: 3,
        }]
    );
    assert_eq!(calls(&context, DriverCall::DrawElements), 0);
    Ok(())
}

#[test]
fn empty_segment_list_touches_nothing() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        ..
    } = scene()?;
    let drawable = Drawable::new(
        DrawMode::Points { point_size: 4.0 },
        &program,
        &buffer_a,
        &BINDINGS,
        &[],
    )
    .with_depth(DepthMode {
        func: CompareFunction::Less,
        mask: true,
        range: DepthRange::default(),
    })
    .with_color(ColorMode::alpha_blended());

    context.draw(&drawable)?;
    assert_eq!(context.driver().stats().total(), 0);
    assert_eq!(context.vertex_array_count(), 0);
    Ok(())
}

#[test]
fn draw_applies_modes_and_program_once() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        ..
    } = scene()?;
    let segments = [segment(0, 0)];
    let points = Drawable::new(
        DrawMode::Points { point_size: 4.0 },
        &program,
        &buffer_a,
        &BINDINGS,
        &segments,
    );

    context.draw(&points)?;
    context.draw(&points)?;
    assert_eq!(calls(&context, DriverCall::PointSize), 1);
    assert_eq!(calls(&context, DriverCall::UseProgram), 1);
    // Unblended color turns off the default-on blend capability once.
    assert_eq!(
        calls(&context, DriverCall::Capability(myth_gl::mode::Capability::Blend)),
        1
    );

    let lines = Drawable {
        mode: DrawMode::Lines { line_width: 1.0 },
        ..points
    };
    context.draw(&lines)?;
    assert_eq!(calls(&context, DriverCall::LineWidth), 0);
    assert_eq!(calls(&context, DriverCall::DrawArrays), 3);
    Ok(())
}

// ============================================================================
// No Vertex Array Support
// ============================================================================

#[test]
fn attributes_rebound_every_draw_without_vertex_arrays() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        indices,
        ..
    } = scene_with(HeadlessDriver::without_vertex_arrays())?;
    let segments = [segment(0, 0)];
    let drawable = Drawable::new(DrawMode::Triangles, &program, &buffer_a, &BINDINGS, &segments)
        .with_index_buffer(&indices);

    context.draw(&drawable)?;
    context.draw(&drawable)?;

    assert_eq!(context.vertex_array_count(), 0);
    assert_eq!(calls(&context, DriverCall::Create(ObjectKind::VertexArray)), 0);
    assert_eq!(calls(&context, DriverCall::BindVertexArray), 0);
    assert_eq!(calls(&context, DriverCall::VertexAttribPointer), 4);
    assert_eq!(calls(&context, DriverCall::DrawElements), 2);
    Ok(())
}

#[test]
fn vertex_array_binding_never_reaches_unsupporting_driver() -> anyhow::Result<()> {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut context = Context::new(HeadlessDriver::without_vertex_arrays());

    context.reset_state();
    assert_eq!(calls(&context, DriverCall::BindVertexArray), 0);

    context.set_dirty_state();
    let _indices = context.create_index_buffer(&[0_u16, 1, 2])?;
    assert!(!context.bind_vertex_array(None));
    assert_eq!(calls(&context, DriverCall::BindVertexArray), 0);
    Ok(())
}

#[test]
fn dirty_buffer_cells_rebind_without_vertex_arrays() -> anyhow::Result<()> {
    let Scene {
        mut context,
        program,
        buffer_a,
        indices,
        ..
    } = scene_with(HeadlessDriver::without_vertex_arrays())?;
    let segments = [segment(0, 0)];
    let drawable = Drawable::new(DrawMode::Triangles, &program, &buffer_a, &BINDINGS, &segments)
        .with_index_buffer(&indices);
    context.draw(&drawable)?;

    context.set_dirty_state();
    context.driver_mut().reset_stats();
    context.draw(&drawable)?;

    assert_eq!(calls(&context, DriverCall::BindBuffer(BufferTarget::Vertex)), 1);
    assert_eq!(calls(&context, DriverCall::BindBuffer(BufferTarget::Element)), 1);
    assert_eq!(calls(&context, DriverCall::UseProgram), 1);
    assert_eq!(calls(&context, DriverCall::BindVertexArray), 0);
    Ok(())
}
