//! The 3D pass seam.
//!
//! The frame loop decides what runs and in which order; the scene renderer
//! owns the actual drawing. Every pass defaults to a no-op so partial
//! renderers (tests, headless clients) only implement what they need.

use tessera_core::TeardownResult;

use crate::picking::{BlockId, PickedPos};

/// Timing handed to every pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the previous frame.
    pub delta: f64,
    /// Interpolation fraction between the last tick and the next.
    pub t: f32,
}

/// World, entity and effect renderers behind one interface.
#[allow(unused_variables)]
pub trait SceneRenderer {
    /// Entity models.
    fn render_entities(&mut self, time: FrameTime) {}

    /// Name tags above entities.
    fn render_entity_names(&mut self, time: FrameTime) {}

    /// Particles.
    fn render_particles(&mut self, time: FrameTime) {}

    /// Sky, clouds, fog and map borders.
    fn render_environment(&mut self, time: FrameTime) {}

    /// Outline around the picked block.
    fn render_picking(&mut self, time: FrameTime, picked: &PickedPos) {}

    /// Chunk geometry.
    fn render_map(&mut self, time: FrameTime) {}

    /// Selection cuboids.
    fn render_selections(&mut self, time: FrameTime) {}

    /// Rain and snow.
    fn render_weather(&mut self, time: FrameTime) {}

    /// Name of the entity under the reticle.
    fn render_hovered_names(&mut self, time: FrameTime) {}

    /// The block in the player's hand.
    fn render_held_item(&mut self, time: FrameTime) {}

    /// Rebuilds the chunk containing a changed block.
    ///
    /// `old_height` and `new_height` are the lighting heights of the column
    /// before and after the change, so lighting below can be updated too.
    fn redraw_block(&mut self, x: i32, y: i32, z: i32, block: BlockId, old_height: i32, new_height: i32) {}

    /// Throws away all chunk meshes, e.g. after a map reset.
    fn reset(&mut self) {}

    /// Releases GPU resources.
    fn release(&mut self) -> TeardownResult<()> {
        Ok(())
    }
}
