//! GPU Object Handles & Deferred Reclamation
//!
//! Driver objects are named by plain integers that are only meaningful on the
//! thread owning the GL context. This module gives every object kind its own
//! id newtype and wraps owned ids in [`Unique`], whose `Drop` never talks to
//! the driver.
//!
//! # Two-Phase Destruction
//!
//! ```text
//!  any thread                         context thread
//!  ──────────                         ──────────────
//!  drop(Unique<T>)                    Context::perform_cleanup()
//!        │                                   │
//!        ▼                                   ▼
//!  Reclaimer::abandoned_T.push(id)  ──►  take queue, glDelete*(ids)
//!  (textures: pooled_textures)
//! ```
//!
//! Releasing is a queue push guarded by a `parking_lot::Mutex`, so a `Unique`
//! may be dropped from any thread. Only the context thread drains the queues.

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroU32;
use std::sync::Arc;

use parking_lot::Mutex;

// ─── Object Kinds ────────────────────────────────────────────────────────────

/// The six families of driver objects the context manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Program,
    Shader,
    Buffer,
    Texture,
    VertexArray,
    Framebuffer,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjectKind::Program => "program",
            ObjectKind::Shader => "shader",
            ObjectKind::Buffer => "buffer",
            ObjectKind::Texture => "texture",
            ObjectKind::VertexArray => "vertex array",
            ObjectKind::Framebuffer => "framebuffer",
        };
        f.write_str(name)
    }
}

/// Shader stage requested from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

// ─── Handle Trait ────────────────────────────────────────────────────────────

/// A typed driver object id.
///
/// Each implementor knows which [`Reclaimer`] queue it is returned to when its
/// owning [`Unique`] is dropped.
pub trait Handle: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    const KIND: ObjectKind;

    /// The abandonment queue for this kind.
    fn abandoned(reclaimer: &Reclaimer) -> &Mutex<Vec<Self>>;

    /// Hands the id back to the reclaimer without touching the driver.
    fn release(self, reclaimer: &Reclaimer) {
        Self::abandoned(reclaimer).lock().push(self);
    }
}

macro_rules! define_object_id {
    ($(#[$meta:meta])* $name:ident => $kind:ident, $queue:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(NonZeroU32);

        impl $name {
            /// Wraps a raw driver name. Returns `None` for the reserved name `0`.
            #[inline]
            #[must_use]
            pub const fn new(raw: u32) -> Option<Self> {
                match NonZeroU32::new(raw) {
                    Some(value) => Some(Self(value)),
                    None => None,
                }
            }

            /// The raw driver name.
            #[inline]
            #[must_use]
            pub const fn get(self) -> u32 {
                self.0.get()
            }

            #[inline]
            #[must_use]
            pub const fn as_non_zero(self) -> NonZeroU32 {
                self.0
            }
        }

        impl From<NonZeroU32> for $name {
            fn from(raw: NonZeroU32) -> Self {
                Self(raw)
            }
        }

        impl Handle for $name {
            const KIND: ObjectKind = ObjectKind::$kind;

            #[inline]
            fn abandoned(reclaimer: &Reclaimer) -> &Mutex<Vec<Self>> {
                &reclaimer.$queue
            }
        }
    };
}

define_object_id!(
    /// Linked shader program.
    ProgramId => Program, programs
);
define_object_id!(
    /// Vertex or fragment shader object.
    ShaderId => Shader, shaders
);
define_object_id!(
    /// Vertex or element buffer.
    BufferId => Buffer, buffers
);
define_object_id!(VertexArrayId => VertexArray, vertex_arrays);
define_object_id!(FramebufferId => Framebuffer, framebuffers);

/// 2D texture object.
///
/// Unlike the other kinds, a released texture goes back to the reuse pool
/// first and is only abandoned once the pool is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(NonZeroU32);

impl TextureId {
    /// Wraps a raw driver name. Returns `None` for the reserved name `0`.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Option<Self> {
        match NonZeroU32::new(raw) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// The raw driver name.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    #[inline]
    #[must_use]
    pub const fn as_non_zero(self) -> NonZeroU32 {
        self.0
    }
}

impl From<NonZeroU32> for TextureId {
    fn from(raw: NonZeroU32) -> Self {
        Self(raw)
    }
}

impl Handle for TextureId {
    const KIND: ObjectKind = ObjectKind::Texture;

    #[inline]
    fn abandoned(reclaimer: &Reclaimer) -> &Mutex<Vec<Self>> {
        &reclaimer.textures
    }

    fn release(self, reclaimer: &Reclaimer) {
        reclaimer.release_texture(self);
    }
}

// ─── Unique Ownership ────────────────────────────────────────────────────────

/// Sole owner of one driver object.
///
/// Dropping it enqueues the id on the shared [`Reclaimer`]; the driver object
/// stays alive until the context thread runs a cleanup.
pub struct Unique<T: Handle> {
    id: T,
    reclaimer: Arc<Reclaimer>,
}

pub type UniqueProgram = Unique<ProgramId>;
pub type UniqueShader = Unique<ShaderId>;
pub type UniqueBuffer = Unique<BufferId>;
pub type UniqueTexture = Unique<TextureId>;
pub type UniqueVertexArray = Unique<VertexArrayId>;
pub type UniqueFramebuffer = Unique<FramebufferId>;

impl<T: Handle> Unique<T> {
    pub(crate) fn new(id: T, reclaimer: Arc<Reclaimer>) -> Self {
        Self { id, reclaimer }
    }

    /// The owned id. Valid as long as `self` is alive.
    #[inline]
    #[must_use]
    pub fn id(&self) -> T {
        self.id
    }
}

impl<T: Handle> Drop for Unique<T> {
    fn drop(&mut self) {
        self.id.release(&self.reclaimer);
    }
}

impl<T: Handle> fmt::Debug for Unique<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Unique").field(&self.id).finish()
    }
}

impl<T: Handle> PartialEq<T> for Unique<T> {
    fn eq(&self, other: &T) -> bool {
        self.id == *other
    }
}

// ─── Reclaimer ───────────────────────────────────────────────────────────────

/// Per-kind queues of abandoned ids plus the reusable texture pool.
///
/// Shared between the [`Context`](crate::Context) and every [`Unique`] it has
/// handed out.
#[derive(Debug, Default)]
pub struct Reclaimer {
    max_pooled_textures: usize,
    pooled_textures: Mutex<Vec<TextureId>>,

    programs: Mutex<Vec<ProgramId>>,
    shaders: Mutex<Vec<ShaderId>>,
    buffers: Mutex<Vec<BufferId>>,
    textures: Mutex<Vec<TextureId>>,
    vertex_arrays: Mutex<Vec<VertexArrayId>>,
    framebuffers: Mutex<Vec<FramebufferId>>,
}

/// Snapshot of the work waiting in a [`Reclaimer`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PendingObjects {
    pub pooled_textures: usize,
    pub programs: usize,
    pub shaders: usize,
    pub buffers: usize,
    pub textures: usize,
    pub vertex_arrays: usize,
    pub framebuffers: usize,
}

impl PendingObjects {
    /// Number of ids waiting for deletion (pooled textures excluded).
    #[must_use]
    pub fn abandoned(&self) -> usize {
        self.programs
            + self.shaders
            + self.buffers
            + self.textures
            + self.vertex_arrays
            + self.framebuffers
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pooled_textures == 0 && self.abandoned() == 0
    }
}

impl Reclaimer {
    #[must_use]
    pub fn new(max_pooled_textures: usize) -> Self {
        Self {
            max_pooled_textures,
            ..Default::default()
        }
    }

    fn release_texture(&self, id: TextureId) {
        let mut pool = self.pooled_textures.lock();
        if pool.len() >= self.max_pooled_textures {
            drop(pool);
            self.textures.lock().push(id);
        } else {
            pool.push(id);
        }
    }

    /// Pops the most recently pooled texture.
    pub(crate) fn pop_pooled_texture(&self) -> Option<TextureId> {
        self.pooled_textures.lock().pop()
    }

    /// Adds freshly generated texture names to the pool, ignoring the cap.
    pub(crate) fn fill_pool(&self, ids: impl IntoIterator<Item = TextureId>) {
        self.pooled_textures.lock().extend(ids);
    }

    /// Moves every pooled texture into the abandoned-texture queue.
    pub(crate) fn abandon_pool(&self) -> usize {
        let pooled = std::mem::take(&mut *self.pooled_textures.lock());
        let count = pooled.len();
        self.textures.lock().extend(pooled);
        count
    }

    /// Empties the abandonment queue for `T`, returning its contents.
    pub(crate) fn take<T: Handle>(&self) -> Vec<T> {
        std::mem::take(&mut *T::abandoned(self).lock())
    }

    #[must_use]
    pub fn pending(&self) -> PendingObjects {
        PendingObjects {
            pooled_textures: self.pooled_textures.lock().len(),
            programs: self.programs.lock().len(),
            shaders: self.shaders.lock().len(),
            buffers: self.buffers.lock().len(),
            textures: self.textures.lock().len(),
            vertex_arrays: self.vertex_arrays.lock().len(),
            framebuffers: self.framebuffers.lock().len(),
        }
    }

    /// True when the pool and every abandonment queue are drained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending().is_empty()
    }
}
