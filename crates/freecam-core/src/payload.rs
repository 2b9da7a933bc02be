//! Camera-configuration payloads pushed to the client.
//!
//! Freecam detaches the view completely and drives it through a custom
//! payload. Tripod keeps the default avatar-attached camera, so it only ever
//! sends [`CameraUpdate::DefaultView`].

use glam::{DVec3, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::store::Mode;
use crate::transform::{Orientation, Transform};

/// Which scene targets mouse input may interact with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseInputTarget {
    /// No interaction with the scene.
    None,
    /// Any target.
    Any,
}

/// How client movement input is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyMovement {
    /// Move the camera position directly.
    Position,
    /// Feed the avatar's character controller.
    CharacterController,
}

/// How client look input is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyLook {
    /// Rotate the camera directly.
    Rotation,
    /// Rotate the local avatar's look orientation.
    LocalPlayerLookOrientation,
}

/// How the mouse ray is resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseInput {
    /// Project onto the plane given by `plane_normal`.
    LookAtPlane,
    /// Pick the entity or block under the cursor.
    LookAtTarget,
}

/// Full custom camera configuration. Every changed tick resends all fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraPayload {
    pub position_lerp_speed: f32,
    pub rotation_lerp_speed: f32,
    pub speed_modifier: f32,
    pub allow_pitch_controls: bool,
    pub display_cursor: bool,
    pub display_reticle: bool,
    pub mouse_input_target: MouseInputTarget,
    /// Whether the client reports raw mouse motion. Off while look-locked.
    pub send_mouse_motion: bool,
    pub skip_character_physics: bool,
    pub is_first_person: bool,
    pub eye_offset: bool,
    /// Eye position: camera position raised by the eye height.
    pub position: DVec3,
    pub rotation: Orientation,
    pub apply_movement: ApplyMovement,
    /// Horizontal, vertical, horizontal movement rates.
    pub movement_multiplier: Vec3,
    pub apply_look: ApplyLook,
    /// Zero on both axes while look-locked.
    pub look_multiplier: Vec2,
    pub mouse_input: MouseInput,
    pub plane_normal: Vec3,
}

/// What the client camera should do next.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CameraUpdate {
    /// Switch to (or refresh) a custom camera.
    Custom(Box<CameraPayload>),
    /// Drop any custom camera and return to the default view.
    DefaultView,
}

impl CameraUpdate {
    /// The custom payload, if this update carries one.
    pub fn payload(&self) -> Option<&CameraPayload> {
        match self {
            Self::Custom(payload) => Some(payload),
            Self::DefaultView => None,
        }
    }
}

/// Per-second movement rates derived from a player's speed setting.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementRates {
    pub horizontal: f64,
    pub vertical: f64,
}

impl MovementRates {
    /// `horizontal = max(1, speed)`, `vertical = max(0.5, 0.4 + 0.12 * speed)`.
    pub fn for_speed(speed: i32) -> Self {
        let speed = f64::from(speed);
        Self {
            horizontal: speed.max(1.0),
            vertical: (0.4 + speed * 0.12).max(0.5),
        }
    }
}

/// Builds the freecam payload for a camera at `transform` looking along
/// `orientation`.
pub fn build_freecam_settings(
    transform: Transform,
    orientation: Orientation,
    speed: i32,
    look_locked: bool,
    eye_height: f32,
) -> CameraPayload {
    let rates = MovementRates::for_speed(speed);
    let look = if look_locked { 0.0 } else { 1.0 };
    CameraPayload {
        position_lerp_speed: 1.0,
        rotation_lerp_speed: 1.0,
        speed_modifier: 1.0,
        allow_pitch_controls: true,
        display_cursor: false,
        display_reticle: false,
        mouse_input_target: MouseInputTarget::None,
        send_mouse_motion: !look_locked,
        skip_character_physics: true,
        is_first_person: false,
        eye_offset: false,
        position: eye_position(transform, eye_height),
        rotation: orientation,
        apply_movement: ApplyMovement::Position,
        movement_multiplier: Vec3::new(
            rates.horizontal as f32,
            rates.vertical as f32,
            rates.horizontal as f32,
        ),
        apply_look: ApplyLook::Rotation,
        look_multiplier: Vec2::splat(look),
        mouse_input: MouseInput::LookAtPlane,
        plane_normal: Vec3::Y,
    }
}

/// Builds the camera update for `mode`. Only freecam gets a custom payload.
pub fn build_camera_update(
    mode: Mode,
    transform: Transform,
    orientation: Orientation,
    speed: i32,
    look_locked: bool,
    eye_height: f32,
) -> CameraUpdate {
    match mode {
        Mode::Freecam => CameraUpdate::Custom(Box::new(build_freecam_settings(
            transform,
            orientation,
            speed,
            look_locked,
            eye_height,
        ))),
        Mode::Tripod | Mode::Inactive => CameraUpdate::DefaultView,
    }
}

fn eye_position(transform: Transform, eye_height: f32) -> DVec3 {
    transform.position + DVec3::new(0.0, f64::from(eye_height), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYE: f32 = 1.62;

    #[test]
    fn test_movement_rates_formula() {
        let slow = MovementRates::for_speed(1);
        assert!((slow.horizontal - 1.0).abs() < 1e-9);
        assert!((slow.vertical - 0.52).abs() < 1e-9);

        let default = MovementRates::for_speed(5);
        assert!((default.horizontal - 5.0).abs() < 1e-9);
        assert!((default.vertical - 1.0).abs() < 1e-9);

        let fast = MovementRates::for_speed(10);
        assert!((fast.horizontal - 10.0).abs() < 1e-9);
        assert!((fast.vertical - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_movement_rates_floors() {
        let rates = MovementRates::for_speed(0);
        assert!((rates.horizontal - 1.0).abs() < 1e-9);
        assert!((rates.vertical - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_eye_height_added_to_position() {
        let transform = Transform::new(1.0, 10.0, -2.0);
        let payload = build_freecam_settings(transform, Orientation::ZERO, 5, false, EYE);
        assert!((payload.position.x - 1.0).abs() < 1e-9);
        assert!((payload.position.y - (10.0 + f64::from(EYE))).abs() < 1e-6);
        assert!((payload.position.z + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_freecam_detaches_from_avatar() {
        let payload = build_freecam_settings(Transform::ZERO, Orientation::ZERO, 5, false, EYE);
        assert!(payload.skip_character_physics);
        assert!(!payload.display_cursor);
        assert!(!payload.display_reticle);
        assert_eq!(payload.mouse_input_target, MouseInputTarget::None);
        assert_eq!(payload.apply_movement, ApplyMovement::Position);
        assert_eq!(payload.movement_multiplier, Vec3::new(5.0, 1.0, 5.0));
    }

    #[test]
    fn test_look_lock_zeroes_look_multiplier() {
        let unlocked = build_freecam_settings(Transform::ZERO, Orientation::ZERO, 5, false, EYE);
        assert_eq!(unlocked.look_multiplier, Vec2::ONE);
        assert!(unlocked.send_mouse_motion);

        let locked = build_freecam_settings(Transform::ZERO, Orientation::ZERO, 5, true, EYE);
        assert_eq!(locked.look_multiplier, Vec2::ZERO);
        assert!(!locked.send_mouse_motion);
    }

    #[test]
    fn test_rotation_copied_from_orientation() {
        let orientation = Orientation::new(0.3, -0.2, 0.1);
        let payload = build_freecam_settings(Transform::ZERO, orientation, 5, false, EYE);
        assert_eq!(payload.rotation, orientation);
    }

    #[test]
    fn test_only_freecam_gets_custom_payload() {
        let update = |mode| {
            build_camera_update(mode, Transform::ZERO, Orientation::ZERO, 5, false, EYE)
        };
        assert!(update(Mode::Freecam).payload().is_some());
        assert_eq!(update(Mode::Tripod), CameraUpdate::DefaultView);
        assert_eq!(update(Mode::Inactive), CameraUpdate::DefaultView);
    }

    #[test]
    fn test_payload_serializes_field_names() {
        let payload = build_freecam_settings(Transform::ZERO, Orientation::ZERO, 3, true, EYE);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["send_mouse_motion"], serde_json::Value::Bool(false));
        assert_eq!(json["apply_movement"], "Position");
        assert!(json["movement_multiplier"].is_array());
    }
}
