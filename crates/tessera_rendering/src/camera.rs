//! # Camera Controller
//!
//! Three viewpoints over one subject:
//!
//! ```text
//! FirstPerson         eye at the subject's head, looking along yaw/pitch
//! ForwardThirdPerson  chase view, in front of the subject looking back at it
//! ThirdPerson         orbit view, behind the subject looking at it
//! ```
//!
//! Switching into third person picks the chase view when coming from first
//! person, the orbit view otherwise. Without the subject's permission every
//! switch lands in first person. Each switch copies the mouse-smoothing
//! state from the outgoing camera to the incoming one.

use tessera_shared::constants::{HELD_ITEM_FOV, NEAR_PLANE};
use tessera_shared::{Mat4, Vec2, Vec3};

use crate::picking::{pick_block, BlockAccess, PickedPos};

/// Default distance of the third-person views from the subject's eye.
pub const THIRD_PERSON_DISTANCE: f32 = 5.0;

/// Degrees of rotation per pixel of mouse motion at sensitivity 1.
const DEGREES_PER_PIXEL: f32 = 0.0075;

/// Camera variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraKind {
    /// Through the subject's eyes.
    FirstPerson,
    /// Orbit view behind the subject.
    ThirdPerson,
    /// Chase view in front of the subject.
    ForwardThirdPerson,
}

impl CameraKind {
    /// Every variant.
    pub const ALL: [Self; 3] = [Self::FirstPerson, Self::ThirdPerson, Self::ForwardThirdPerson];

    const fn index(self) -> usize {
        match self {
            Self::FirstPerson => 0,
            Self::ThirdPerson => 1,
            Self::ForwardThirdPerson => 2,
        }
    }

    /// Whether the subject's body is visible.
    #[must_use]
    pub const fn is_third_person(self) -> bool {
        !matches!(self, Self::FirstPerson)
    }
}

/// Mouse-look smoothing state, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraState {
    /// Rotation sampled on the latest camera tick.
    pub delta: Vec2,
    /// Rotation sampled on the tick before.
    pub previous: Vec2,
}

/// What the camera follows.
pub trait CameraSubject {
    /// Eye position interpolated `t` of the way to the next tick.
    fn eye_position(&self, t: f32) -> Vec3;

    /// Yaw and pitch in degrees.
    fn orientation(&self) -> (f32, f32);

    /// Turns by the given yaw and pitch deltas, in degrees.
    fn rotate(&mut self, yaw: f32, pitch: f32);

    /// Whether the server lets this subject use third-person views.
    fn can_use_third_person(&self) -> bool;
}

/// Projection and held-item projection, built together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// World projection.
    pub projection: Mat4,
    /// Projection for the item in the player's hand, fixed field of view.
    pub held_item: Mat4,
}

/// One camera variant with its own smoothing state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    kind: CameraKind,
    state: CameraState,
}

impl PerspectiveCamera {
    const fn new(kind: CameraKind) -> Self {
        Self {
            kind,
            state: CameraState {
                delta: Vec2::ZERO,
                previous: Vec2::ZERO,
            },
        }
    }

    fn view(&self, eye: Vec3, forward: Vec3, distance: f32) -> Mat4 {
        match self.kind {
            CameraKind::FirstPerson => Mat4::look_at(eye, eye + forward, Vec3::Y),
            CameraKind::ThirdPerson => Mat4::look_at(eye - forward * distance, eye, Vec3::Y),
            CameraKind::ForwardThirdPerson => Mat4::look_at(eye + forward * distance, eye, Vec3::Y),
        }
    }
}

/// Camera settings loaded from options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    /// Vertical field of view, degrees.
    pub field_of_view: f32,
    /// Far plane distance, blocks.
    pub view_distance: f32,
    /// Mouse sensitivity, 1 to 100.
    pub sensitivity: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            field_of_view: 70.0,
            view_distance: 512.0,
            sensitivity: 30.0,
        }
    }
}

/// Owns the three cameras and which one is active.
#[derive(Debug, Clone)]
pub struct CameraController {
    cameras: [PerspectiveCamera; 3],
    active: CameraKind,
    settings: CameraSettings,
    aspect: f32,
    /// Mouse motion not yet consumed by a camera tick, in pixels.
    pending_mouse: Vec2,
    distance: f32,
}

impl CameraController {
    /// Starts in first person.
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            cameras: CameraKind::ALL.map(PerspectiveCamera::new),
            active: CameraKind::FirstPerson,
            settings,
            aspect: 1.0,
            pending_mouse: Vec2::ZERO,
            distance: THIRD_PERSON_DISTANCE,
        }
    }

    /// The active variant.
    #[must_use]
    pub fn kind(&self) -> CameraKind {
        self.active
    }

    /// The active camera's smoothing state.
    #[must_use]
    pub fn state(&self) -> CameraState {
        self.cameras[self.active.index()].state
    }

    /// Overwrites the active camera's smoothing state.
    pub fn set_state(&mut self, state: CameraState) {
        self.cameras[self.active.index()].state = state;
    }

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> CameraSettings {
        self.settings
    }

    /// Switches between first and third person.
    ///
    /// Returns the variant now active.
    pub fn set_third_person(&mut self, third_person: bool, can_use_third_person: bool) -> CameraKind {
        let next = if third_person && can_use_third_person {
            match self.active {
                CameraKind::FirstPerson => CameraKind::ForwardThirdPerson,
                CameraKind::ThirdPerson | CameraKind::ForwardThirdPerson => CameraKind::ThirdPerson,
            }
        } else {
            CameraKind::FirstPerson
        };
        self.switch_to(next);
        next
    }

    /// First person → chase → orbit → first person.
    pub fn cycle(&mut self, can_use_third_person: bool) -> CameraKind {
        let third = self.active != CameraKind::ThirdPerson;
        self.set_third_person(third, can_use_third_person)
    }

    fn switch_to(&mut self, next: CameraKind) {
        let carried = self.state();
        self.active = next;
        self.set_state(carried);
        tracing::debug!("camera switched to {:?}", next);
    }

    /// Sets the field of view in degrees.
    pub fn set_field_of_view(&mut self, degrees: f32) {
        self.settings.field_of_view = degrees;
    }

    /// Sets the far plane distance.
    pub fn set_view_distance(&mut self, distance: f32) {
        self.settings.view_distance = distance;
    }

    /// Sets the mouse sensitivity.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.settings.sensitivity = sensitivity;
    }

    /// Sets the aspect ratio from a window size. Zero-sized windows are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Queues relative mouse motion for the next camera tick.
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        self.pending_mouse = self.pending_mouse + Vec2::new(dx, dy);
    }

    /// World and held-item projections.
    #[must_use]
    pub fn get_projection(&self) -> Projection {
        let far = self.settings.view_distance;
        Projection {
            projection: Mat4::perspective(
                self.settings.field_of_view.to_radians(),
                self.aspect,
                NEAR_PLANE,
                far,
            ),
            held_item: Mat4::perspective(HELD_ITEM_FOV.to_radians(), self.aspect, NEAR_PLANE, far),
        }
    }

    /// View matrix for the active camera.
    #[must_use]
    pub fn get_view<S: CameraSubject + ?Sized>(&self, subject: &S, t: f32) -> Mat4 {
        let eye = subject.eye_position(t);
        let (yaw, pitch) = subject.orientation();
        let forward = Vec3::from_yaw_pitch(yaw, pitch);
        self.cameras[self.active.index()].view(eye, forward, self.distance)
    }

    /// One camera tick: smooth queued mouse motion and turn the subject.
    ///
    /// `period` is the simulation tick period.
    pub fn tick<S: CameraSubject + ?Sized>(&mut self, period: f64, subject: &mut S) {
        let raw = std::mem::take(&mut self.pending_mouse);
        let scale = DEGREES_PER_PIXEL * self.settings.sensitivity;
        let camera = &mut self.cameras[self.active.index()];
        camera.state.previous = camera.state.delta;
        camera.state.delta = raw * scale;
        let turn = camera.state.previous.lerp(camera.state.delta, 0.5);
        if turn != Vec2::ZERO {
            subject.rotate(turn.x, -turn.y);
        }

        // Ease the third-person distance back to its default after zooming.
        let ease = (period as f32 * 10.0).min(1.0);
        self.distance += (THIRD_PERSON_DISTANCE - self.distance) * ease;
    }

    /// Pushes the third-person views in or out by `amount` blocks.
    pub fn zoom(&mut self, amount: f32) {
        if self.active.is_third_person() {
            self.distance = (self.distance - amount).clamp(1.0, 20.0);
        }
    }

    /// Finds the block under the reticle, writing into `out`.
    ///
    /// Picking always starts at the subject's eye, whichever camera is active.
    pub fn get_picked_block<S, W>(&self, subject: &S, world: &W, reach: f32, out: &mut PickedPos)
    where
        S: CameraSubject + ?Sized,
        W: BlockAccess + ?Sized,
    {
        let (yaw, pitch) = subject.orientation();
        pick_block(
            subject.eye_position(1.0),
            Vec3::from_yaw_pitch(yaw, pitch),
            reach,
            world,
            out,
        );
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(CameraSettings::default())
    }
}
