//! # TESSERA Rendering
//!
//! Everything between the frame loop and the graphics API.
//!
//! ## Per-frame flow
//!
//! ```text
//! CameraController ──view──▶ Frustum::from_matrices(projection, view)
//!        │                              │
//!        └──pick──▶ PickedPos           └──▶ SceneRenderer passes
//!                                               │
//!                                      GraphicsBackend (draw calls)
//! ```
//!
//! The backend and scene renderer are traits. This crate links no GPU API.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod backend;
pub mod camera;
pub mod frustum;
pub mod picking;
pub mod scene;
pub mod screenshot;

pub use backend::{
    BackendError, BackendResult, BlendFunc, CompareFunc, GraphicsBackend, IndexBufferId, MatrixMode,
    TextureId,
};
pub use camera::{
    CameraController, CameraKind, CameraSettings, CameraState, CameraSubject, Projection,
};
pub use frustum::{Aabb, Frustum, Plane};
pub use picking::{pick_block, BlockAccess, BlockFace, BlockId, PickedPos, AIR};
pub use scene::{FrameTime, SceneRenderer};
pub use screenshot::{capture, screenshot_file_name, ScreenshotError};
