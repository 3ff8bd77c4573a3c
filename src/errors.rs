//! Error Types
//!
//! This module defines the error types returned by the GL context.
//!
//! # Overview
//!
//! The main error type [`GlError`] covers the recoverable failure modes:
//! - Driver refusing to allocate an object handle
//! - Texture uploads whose payload does not match the requested size
//! - Texture units outside the tracked range
//!
//! Calling a driver-touching operation from a thread that does not own the
//! context is a programming error. It is caught by a debug assertion and is
//! never reported through [`GlError`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_gl::errors::Result;
//!
//! fn upload(context: &mut Context<GlowDriver>) -> Result<()> {
//!     let program = context.create_program()?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::object::ObjectKind;

/// The main error type for the GL context.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlError {
    /// The driver could not allocate a handle of the requested kind.
    #[error("Failed to allocate {kind} object: {reason}")]
    ResourceAllocation {
        /// Kind of object that was requested
        kind: ObjectKind,
        /// Driver-provided detail
        reason: String,
    },

    /// A texture unit index beyond the number of tracked units.
    #[error("Texture unit {unit} out of range (tracked units: {available})")]
    TextureUnitOutOfRange {
        /// The requested unit
        unit: u8,
        /// Number of units the context tracks
        available: usize,
    },

    /// Pixel data does not match `width * height * 4` bytes.
    #[error("Texture data size mismatch: expected {expected} bytes, got {actual}")]
    InvalidTextureData {
        /// Byte length implied by the texture size
        expected: usize,
        /// Byte length actually supplied
        actual: usize,
    },
}

impl GlError {
    pub(crate) fn allocation(kind: ObjectKind, reason: impl Into<String>) -> Self {
        GlError::ResourceAllocation {
            kind,
            reason: reason.into(),
        }
    }
}

/// Alias for `Result<T, GlError>`.
pub type Result<T> = std::result::Result<T, GlError>;
