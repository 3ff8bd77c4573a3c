#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

//! # Myth GL
//!
//! GPU object lifetime tracking and redundant-state elision for OpenGL-style
//! drivers.
//!
//! - [`Unique`] handles can be dropped on any thread. Their names are deleted
//!   in bulk by [`Context::perform_cleanup`] on the thread owning the context.
//! - Every piece of fixed-function state is mirrored in a [`State`] cell, and
//!   assignments that would not change anything never reach the driver.
//! - Vertex array objects are built once per (program, buffers, base vertex)
//!   and reused on later draws.
//!
//! [`GlowDriver`] talks to a real GL context through `glow`; [`HeadlessDriver`]
//! records calls for tests and tools.

pub mod buffer;
pub mod context;
pub mod drawable;
pub mod driver;
pub mod errors;
pub mod mode;
pub mod object;
pub mod settings;
pub mod state;
pub mod texture;
pub mod value;
pub mod vertex_array;

pub use buffer::{BufferTarget, IndexBuffer, VertexBuffer};
pub use context::Context;
pub use drawable::{AttributeBinding, AttributeType, Drawable, Segment};
pub use driver::{
    AttributePointer, CallStats, DrawCommand, Driver, DriverCall, GlowDriver, HeadlessDriver,
};
pub use errors::{GlError, Result};
pub use mode::{
    BlendEquation, BlendFactor, BlendFunction, ClearMask, ColorMask, ColorMode, CompareFunction,
    DepthMode, DepthRange, DrawMode, Primitive, StencilMode, StencilOp, StencilTest, TextureUnit,
    Viewport,
};
pub use object::{
    BufferId, FramebufferId, Handle, ObjectKind, PendingObjects, ProgramId, Reclaimer, ShaderId,
    ShaderKind, TextureId, Unique, UniqueBuffer, UniqueFramebuffer, UniqueProgram, UniqueShader,
    UniqueTexture, UniqueVertexArray, VertexArrayId,
};
pub use settings::ContextSettings;
pub use state::State;
pub use texture::{Texture, TextureFilter, TextureMipMap};
pub use vertex_array::{VertexArrayCache, VertexArrayKey};
