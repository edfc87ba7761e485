//! Tick fan-out.
//!
//! [`TickDispatcher`] borrows exactly the session parts a tick touches, so
//! the clock can drive it while the rest of the session stays borrowable.

use tessera_core::{DownloadCache, TickHandler};
use tessera_rendering::{CameraController, CameraSubject};

use crate::collaborators::{NetworkSession, Simulated};

/// Routes clock work to the session's collaborators.
pub struct TickDispatcher<'a> {
    /// Server connection.
    pub network: &'a mut dyn NetworkSession,
    /// Entity list.
    pub entities: &'a mut dyn Simulated,
    /// Particle system.
    pub particles: &'a mut dyn Simulated,
    /// Animated textures.
    pub animations: &'a mut dyn Simulated,
    /// Camera being smoothed.
    pub camera: &'a mut CameraController,
    /// The player the camera turns.
    pub player: &'a mut dyn CameraSubject,
    /// Maintenance target.
    pub downloads: &'a DownloadCache,
}

impl TickHandler for TickDispatcher<'_> {
    fn tick(&mut self, period: f64) {
        self.network.tick(period);
        self.entities.tick(period);
        self.particles.tick(period);
        self.animations.tick(period);
    }

    fn camera_tick(&mut self, period: f64) {
        self.camera.tick(period, &mut *self.player);
    }

    fn maintenance(&mut self, max_age: f64) {
        self.downloads.purge_old_entries(max_age);
    }
}
