//! Headless Frame
//!
//! Drives a [`Context`] through a few frames without a GPU and prints how many
//! driver calls each frame needed. The first frame pays for state setup and
//! vertex array creation; later frames only issue the draws.
//!
//! Run with `RUST_LOG=debug` to see pool refills and cleanup summaries.

use bytemuck::{Pod, Zeroable};
use glam::{UVec2, Vec4};

use myth_gl::{
    AttributeBinding, AttributeType, ColorMode, CompareFunction, Context, DepthMode, DepthRange,
    DrawMode, Drawable, DriverCall, HeadlessDriver, ObjectKind, Segment, TextureFilter,
    TextureMipMap, TextureUnit, Viewport,
};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct Vertex {
    position: [f32; 2],
    uv: [f32; 2],
}

const QUAD: [Vertex; 4] = [
    Vertex {
        position: [-1.0, -1.0],
        uv: [0.0, 0.0],
    },
    Vertex {
        position: [1.0, -1.0],
        uv: [1.0, 0.0],
    },
    Vertex {
        position: [1.0, 1.0],
        uv: [1.0, 1.0],
    },
    Vertex {
        position: [-1.0, 1.0],
        uv: [0.0, 1.0],
    },
];

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

const FRAMES: usize = 4;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut context = Context::new(HeadlessDriver::new());
    context.reset_state();

    let program = context.create_program()?;
    let vertices = context.create_vertex_buffer(&QUAD)?;
    let indices = context.create_index_buffer(&[0_u16, 1, 2, 0, 2, 3])?;
    let pixels = vec![0xFF_u8; 16 * 16 * 4];
    let mut texture =
        context.create_texture_with_data(UVec2::new(16, 16), &pixels, TextureUnit(0))?;

    let segments = [Segment {
        vertex_offset: 0,
        index_offset: 0,
        vertex_length: QUAD.len(),
        index_length: 6,
    }];
    let drawable = Drawable::new(DrawMode::Triangles, &program, &vertices, &BINDINGS, &segments)
        .with_index_buffer(&indices)
        .with_depth(DepthMode {
            func: CompareFunction::LessEqual,
            mask: true,
            range: DepthRange::default(),
        })
        .with_color(ColorMode::alpha_blended());

    for frame in 0..FRAMES {
        context.driver_mut().reset_stats();

        context.set_viewport(Viewport::new(0, 0, 1280, 720));
        context.clear(Some(Vec4::new(0.1, 0.1, 0.1, 1.0)), Some(1.0), None);
        context.bind_texture(
            &mut texture,
            TextureUnit(0),
            TextureFilter::Linear,
            TextureMipMap::No,
        )?;
        context.draw(&drawable)?;

        // Scratch texture released mid-frame, recycled on the next one.
        drop(context.create_texture()?);
        context.perform_cleanup();

        let stats = context.driver().stats();
        log::info!(
            "Frame {frame}: {} driver calls ({} draws, {} vertex arrays cached)",
            stats.total(),
            stats.count(DriverCall::DrawElements),
            context.vertex_array_count()
        );
    }

    drop(texture);
    drop(indices);
    drop(vertices);
    drop(program);
    context.reset();

    let stats = context.driver().stats();
    log::info!(
        "Teardown: deleted {} textures, {} buffers, {} vertex arrays; empty = {}",
        stats.deleted(ObjectKind::Texture),
        stats.deleted(ObjectKind::Buffer),
        stats.deleted(ObjectKind::VertexArray),
        context.empty()
    );

    Ok(())
}
