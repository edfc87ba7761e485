//! # Options
//!
//! User settings persisted as TOML next to the client.
//!
//! ```text
//! load ──▶ clamp ──▶ apply to session ──▶ setters mark changed ──▶ save on teardown
//! ```
//!
//! A missing file is not an error: the session starts with defaults and
//! only writes the file once something changes. Out-of-range values are
//! clamped, never rejected, so a hand-edited file always loads.

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tessera_core::FpsLimitMethod;

use crate::error::OptionsError;

// =============================================================================
// RANGES
// =============================================================================

/// Far plane distance in blocks.
pub const VIEW_DISTANCE_RANGE: RangeInclusive<u32> = 16..=4096;
/// HUD scale factor.
pub const HUD_SCALE_RANGE: RangeInclusive<f32> = 0.25..=5.0;
/// Chat scale factor.
pub const CHAT_SCALE_RANGE: RangeInclusive<f32> = 0.35..=5.0;
/// Mouse sensitivity.
pub const SENSITIVITY_RANGE: RangeInclusive<u32> = 1..=100;
/// Chat lines shown on the HUD.
pub const CHAT_LINES_RANGE: RangeInclusive<usize> = 1..=30;
/// Field of view in degrees.
pub const FIELD_OF_VIEW_RANGE: RangeInclusive<u32> = 1..=179;
/// Movement speed multiplier.
pub const SPEED_MULTIPLIER_RANGE: RangeInclusive<f32> = 0.1..=50.0;

fn clamp_to<T: PartialOrd + Copy>(value: T, range: &RangeInclusive<T>) -> T {
    if value < *range.start() {
        *range.start()
    } else if value > *range.end() {
        *range.end()
    } else {
        value
    }
}

/// Persisted user settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    view_distance: u32,
    hud_scale: f32,
    chat_scale: f32,
    sensitivity: u32,
    chat_lines: usize,
    field_of_view: u32,
    speed_multiplier: f32,
    fps_limit: FpsLimitMethod,
    show_hovered_names: bool,
    clickable_chat: bool,
    view_bobbing: bool,
    third_person_allowed: bool,
    #[serde(skip)]
    changed: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            view_distance: 512,
            hud_scale: 1.0,
            chat_scale: 1.0,
            sensitivity: 30,
            chat_lines: 12,
            field_of_view: 70,
            speed_multiplier: 10.0,
            fps_limit: FpsLimitMethod::LimitVSync,
            show_hovered_names: true,
            clickable_chat: true,
            view_bobbing: false,
            third_person_allowed: true,
            changed: false,
        }
    }
}

impl Options {
    /// Loads options from `path`. A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, OptionsError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no options file at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(OptionsError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let mut options: Self = toml::from_str(&text).map_err(|source| OptionsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        options.clamp_all();
        options.changed = false;
        tracing::debug!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Writes options to `path` and clears the changed flag.
    pub fn save(&mut self, path: &Path) -> Result<(), OptionsError> {
        let text = toml::to_string_pretty(self)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| OptionsError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, text).map_err(|source| OptionsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.changed = false;
        tracing::info!("saved options to {}", path.display());
        Ok(())
    }

    /// Whether any setter ran since the last load or save.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.changed
    }

    fn clamp_all(&mut self) {
        self.view_distance = clamp_to(self.view_distance, &VIEW_DISTANCE_RANGE);
        self.hud_scale = clamp_to(self.hud_scale, &HUD_SCALE_RANGE);
        self.chat_scale = clamp_to(self.chat_scale, &CHAT_SCALE_RANGE);
        self.sensitivity = clamp_to(self.sensitivity, &SENSITIVITY_RANGE);
        self.chat_lines = clamp_to(self.chat_lines, &CHAT_LINES_RANGE);
        self.field_of_view = clamp_to(self.field_of_view, &FIELD_OF_VIEW_RANGE);
        self.speed_multiplier = clamp_to(self.speed_multiplier, &SPEED_MULTIPLIER_RANGE);
    }

    // =========================================================================
    // GETTERS
    // =========================================================================

    /// Far plane distance in blocks.
    #[must_use]
    pub fn view_distance(&self) -> u32 {
        self.view_distance
    }

    /// HUD scale factor.
    #[must_use]
    pub fn hud_scale(&self) -> f32 {
        self.hud_scale
    }

    /// Chat scale factor.
    #[must_use]
    pub fn chat_scale(&self) -> f32 {
        self.chat_scale
    }

    /// Mouse sensitivity.
    #[must_use]
    pub fn sensitivity(&self) -> u32 {
        self.sensitivity
    }

    /// Chat lines shown on the HUD.
    #[must_use]
    pub fn chat_lines(&self) -> usize {
        self.chat_lines
    }

    /// Field of view in degrees.
    #[must_use]
    pub fn field_of_view(&self) -> u32 {
        self.field_of_view
    }

    /// Movement speed multiplier.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    /// Frame rate limiting method.
    #[must_use]
    pub fn fps_limit(&self) -> FpsLimitMethod {
        self.fps_limit
    }

    /// Name tag of the entity under the reticle.
    #[must_use]
    pub fn show_hovered_names(&self) -> bool {
        self.show_hovered_names
    }

    /// Links in chat can be clicked.
    #[must_use]
    pub fn clickable_chat(&self) -> bool {
        self.clickable_chat
    }

    /// Camera bobs while walking.
    #[must_use]
    pub fn view_bobbing(&self) -> bool {
        self.view_bobbing
    }

    /// Third-person cameras may be used.
    #[must_use]
    pub fn third_person_allowed(&self) -> bool {
        self.third_person_allowed
    }

    // =========================================================================
    // SETTERS
    // =========================================================================

    /// Sets the view distance, clamped.
    pub fn set_view_distance(&mut self, value: u32) {
        self.view_distance = clamp_to(value, &VIEW_DISTANCE_RANGE);
        self.changed = true;
    }

    /// Sets the HUD scale, clamped.
    pub fn set_hud_scale(&mut self, value: f32) {
        self.hud_scale = clamp_to(value, &HUD_SCALE_RANGE);
        self.changed = true;
    }

    /// Sets the chat scale, clamped.
    pub fn set_chat_scale(&mut self, value: f32) {
        self.chat_scale = clamp_to(value, &CHAT_SCALE_RANGE);
        self.changed = true;
    }

    /// Sets the mouse sensitivity, clamped.
    pub fn set_sensitivity(&mut self, value: u32) {
        self.sensitivity = clamp_to(value, &SENSITIVITY_RANGE);
        self.changed = true;
    }

    /// Sets the HUD chat line count, clamped.
    pub fn set_chat_lines(&mut self, value: usize) {
        self.chat_lines = clamp_to(value, &CHAT_LINES_RANGE);
        self.changed = true;
    }

    /// Sets the field of view, clamped.
    pub fn set_field_of_view(&mut self, value: u32) {
        self.field_of_view = clamp_to(value, &FIELD_OF_VIEW_RANGE);
        self.changed = true;
    }

    /// Sets the speed multiplier, clamped.
    pub fn set_speed_multiplier(&mut self, value: f32) {
        self.speed_multiplier = clamp_to(value, &SPEED_MULTIPLIER_RANGE);
        self.changed = true;
    }

    /// Sets the frame rate limiting method.
    pub fn set_fps_limit(&mut self, value: FpsLimitMethod) {
        self.fps_limit = value;
        self.changed = true;
    }

    /// Toggles hovered name tags.
    pub fn set_show_hovered_names(&mut self, value: bool) {
        self.show_hovered_names = value;
        self.changed = true;
    }

    /// Toggles clickable chat.
    pub fn set_clickable_chat(&mut self, value: bool) {
        self.clickable_chat = value;
        self.changed = true;
    }

    /// Toggles view bobbing.
    pub fn set_view_bobbing(&mut self, value: bool) {
        self.view_bobbing = value;
        self.changed = true;
    }

    /// Allows or forbids third-person cameras.
    pub fn set_third_person_allowed(&mut self, value: bool) {
        self.third_person_allowed = value;
        self.changed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.view_distance(), 512);
        assert_eq!(options.sensitivity(), 30);
        assert_eq!(options.chat_lines(), 12);
        assert_eq!(options.fps_limit(), FpsLimitMethod::LimitVSync);
        assert!(options.third_person_allowed());
        assert!(!options.view_bobbing());
        assert!(!options.has_changed());
    }

    #[test]
    fn test_setters_clamp_and_mark_changed() {
        let mut options = Options::default();
        options.set_view_distance(8);
        assert_eq!(options.view_distance(), 16);
        assert!(options.has_changed());

        options.set_hud_scale(9.0);
        assert!((options.hud_scale() - 5.0).abs() < f32::EPSILON);
        options.set_chat_scale(0.1);
        assert!((options.chat_scale() - 0.35).abs() < f32::EPSILON);
        options.set_field_of_view(0);
        assert_eq!(options.field_of_view(), 1);
        options.set_chat_lines(100);
        assert_eq!(options.chat_lines(), 30);
    }

    #[test]
    fn test_partial_file_fills_defaults_and_clamps() {
        let mut options: Options = toml::from_str("view_distance = 99999\nsensitivity = 0\n")
            .expect("valid toml");
        options.clamp_all();
        assert_eq!(options.view_distance(), 4096);
        assert_eq!(options.sensitivity(), 1);
        assert_eq!(options.chat_lines(), 12);
    }

    #[test]
    fn test_fps_limit_is_stored_by_name() {
        let mut options = Options::default();
        options.set_fps_limit(FpsLimitMethod::Limit60Fps);
        let text = toml::to_string(&options).expect("encodes");
        assert!(text.contains("fps_limit = \"Limit60Fps\""));
        assert!(!text.contains("changed"));
    }
}
