//! Per-tick integration for active freecam and tripod players.

use std::time::Instant;

use glam::DVec3;
use tracing::{debug, info};

use crate::host::PlayerHost;
use crate::input::{read_input_snapshot, replay_orientation};
use crate::payload::MovementRates;
use crate::service::FreecamService;
use crate::store::{Mode, PlayerId};

/// Converts a local wish vector (x = strafe, y = vertical, z = forward) into a
/// world displacement over `delta_seconds`.
///
/// The horizontal components are rotated by `yaw`; the vertical component is
/// applied as-is.
pub fn integrate_wish(
    position: DVec3,
    wish: DVec3,
    yaw: f32,
    speed: i32,
    delta_seconds: f64,
) -> DVec3 {
    let (sin, cos) = f64::from(yaw).sin_cos();
    let world_x = wish.x * cos - wish.z * sin;
    let world_z = wish.x * sin + wish.z * cos;
    let rates = MovementRates::for_speed(speed);
    position
        + DVec3::new(
            world_x * rates.horizontal,
            wish.y * rates.vertical,
            world_z * rates.horizontal,
        ) * delta_seconds
}

impl FreecamService {
    /// Advances `id` by one simulation step. Call once per step for every
    /// player that may be in freecam or tripod.
    pub fn on_tick(&self, host: &mut impl PlayerHost, id: PlayerId, delta_seconds: f32) {
        match self.store().mode(id) {
            Mode::Freecam => self.tick_freecam(host, id, delta_seconds),
            Mode::Tripod => self.tick_tripod(host, id),
            Mode::Inactive => {}
        }
    }

    /// Replays new input onto the detached camera and resends its payload.
    /// Does nothing at all when no new input arrived.
    fn tick_freecam(&self, host: &mut impl PlayerHost, id: PlayerId, delta_seconds: f32) {
        let speed = self.store().speed(id);
        let Some(mut record) = self.store().freecam_mut(id) else {
            return;
        };
        let Some(snapshot) = read_input_snapshot(
            record.transform,
            record.orientation,
            host.input_queue(id),
            record.input_cursor,
        ) else {
            return;
        };

        if !record.logged_input_sample {
            info!(
                player = %id,
                has_movement = snapshot.has_movement,
                wish = ?snapshot.wish,
                set_head_updates = snapshot.set_head_updates,
                set_body_updates = snapshot.set_body_updates,
                orientation = %snapshot.orientation,
                "freecam input sample"
            );
            record.logged_input_sample = true;
        }

        let mut transform = snapshot.transform;
        if let Some(wish) = snapshot.wish {
            transform.position = integrate_wish(
                transform.position,
                wish,
                snapshot.orientation.yaw,
                speed,
                f64::from(delta_seconds),
            );
        }
        record.transform = transform;
        record.orientation = snapshot.orientation;
        record.input_cursor = snapshot.next_index;
        drop(record);

        self.send_camera(host, id, Mode::Freecam, transform, snapshot.orientation);
    }

    /// Pins the avatar to the frozen camera and replays head/body turns onto
    /// it. The camera itself never moves.
    fn tick_tripod(&self, host: &mut impl PlayerHost, id: PlayerId) {
        let Some(mut record) = self.store().tripod_mut(id) else {
            return;
        };

        let current = host.transform_or_zero(id);
        if !current.is_close(&record.transform, self.tuning().tripod_stick_distance) {
            let orientation = host.orientation_or_zero(id);
            host.update_position(id, record.transform, orientation);
        }

        let replay = replay_orientation(host.input_queue(id), record.input_cursor);
        record.input_cursor = replay.next_index;
        if let Some(orientation) = replay.orientation {
            record.avatar_orientation = orientation;
            let transform = host.transform_or_zero(id);
            host.update_position(id, transform, orientation);
        }

        let now = Instant::now();
        let interval = self.tuning().tripod_diagnostic_interval;
        if now.duration_since(record.last_diagnostic_at) >= interval {
            debug!(
                player = %id,
                camera = %record.orientation,
                avatar = %record.avatar_orientation,
                set_head_updates = replay.set_head_updates,
                set_body_updates = replay.set_body_updates,
                "tripod tick"
            );
            record.last_diagnostic_at = now;
        }
    }
}
