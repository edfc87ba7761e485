//! The graphics backend seam.
//!
//! Everything the frame loop asks of the GPU goes through
//! [`GraphicsBackend`]. The trait mirrors a fixed-function API: matrices are
//! loaded into a matrix stack selected by [`MatrixMode`], and 2D overlay
//! batches are handed over as recorded by the UI layer.

use std::path::Path;

use tessera_shared::Mat4;
use tessera_ui::{Extent, UIBatch};
use thiserror::Error;

/// Backend failure.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The device rejected a call.
    #[error("graphics device error: {0}")]
    Device(String),

    /// A handle was already released or never existed.
    #[error("invalid {kind} handle {id}")]
    InvalidHandle {
        /// Resource kind.
        kind: &'static str,
        /// Raw handle.
        id: u32,
    },

    /// Reading back or writing an image failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for backend calls.
pub type BackendResult<T> = Result<T, BackendError>;

/// Index buffer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexBufferId(pub u32);

/// Texture handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Matrix stack selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixMode {
    /// Projection matrix.
    Projection,
    /// Model-view matrix.
    Modelview,
}

/// Depth and alpha comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareFunc {
    /// Always passes.
    Always,
    /// Passes if less.
    Less,
    /// Passes if less or equal.
    LessEqual,
    /// Passes if greater.
    Greater,
}

/// Blend factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFunc {
    /// Factor of one.
    One,
    /// Source alpha.
    SourceAlpha,
    /// One minus source alpha.
    InvSourceAlpha,
}

/// What the frame loop needs from a graphics API.
pub trait GraphicsBackend {
    /// Starts a frame.
    fn begin_frame(&mut self);

    /// Presents the frame.
    fn end_frame(&mut self);

    /// Builds the shared quad index buffer.
    fn make_default_index_buffer(&mut self) -> BackendResult<IndexBufferId>;

    /// Binds an index buffer.
    fn bind_index_buffer(&mut self, ib: IndexBufferId);

    /// Frees an index buffer.
    fn delete_index_buffer(&mut self, ib: IndexBufferId) -> BackendResult<()>;

    /// Frees a texture.
    fn delete_texture(&mut self, texture: TextureId) -> BackendResult<()>;

    /// Selects the matrix stack `load_matrix` writes to.
    fn set_matrix_mode(&mut self, mode: MatrixMode);

    /// Replaces the top of the selected matrix stack.
    fn load_matrix(&mut self, matrix: &Mat4);

    /// Clears color and depth.
    fn clear(&mut self);

    /// Enables depth testing with `func`.
    fn set_depth_test(&mut self, enabled: bool, func: CompareFunc);

    /// Sets the alpha blend equation.
    fn set_alpha_blend_func(&mut self, src: BlendFunc, dst: BlendFunc);

    /// Sets the alpha test.
    fn set_alpha_test_func(&mut self, func: CompareFunc, reference: f32);

    /// Turns vertical sync on or off.
    fn set_vsync(&mut self, enabled: bool);

    /// The window's client area changed.
    fn on_window_resize(&mut self, size: Extent);

    /// Switches to orthographic 2D over `size`.
    fn mode_2d(&mut self, size: Extent);

    /// Restores the 3D state saved by `mode_2d`.
    fn mode_3d(&mut self);

    /// Draws recorded overlay batches.
    fn draw_ui(&mut self, batches: &[UIBatch]);

    /// Writes the back buffer, `size` pixels, as a PNG at `path`.
    fn take_screenshot(&mut self, path: &Path, size: Extent) -> BackendResult<()>;
}
