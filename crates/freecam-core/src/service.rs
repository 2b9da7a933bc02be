//! Mode transitions between normal play, freecam and tripod.
//!
//! Transitions:
//!
//! | From     | Event          | To       |
//! |----------|----------------|----------|
//! | Inactive | toggle freecam | Freecam  |
//! | Freecam  | toggle freecam | Inactive |
//! | Tripod   | toggle freecam | Freecam  |
//! | Freecam  | toggle tripod  | Tripod   |
//! | Tripod   | toggle tripod  | Inactive |
//! | Inactive | toggle tripod  | rejected |
//!
//! Every transition either commits fully or returns before touching state.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::error::FreecamError;
use crate::host::{GameMode, PlayerHost};
use crate::payload::{CameraUpdate, build_camera_update};
use crate::store::{FreecamRecord, Mode, PlayerId, PlayerStateStore, TripodRecord};
use crate::transform::{Orientation, Transform};
use crate::tuning::FreecamTuning;

/// Game mode forced on the avatar while its camera is detached.
pub const FREECAM_GAME_MODE: GameMode = GameMode::Adventure;

/// Per-player freecam/tripod engine.
///
/// Shared between threads by reference; calls for different players may run
/// concurrently, calls for the same player must not overlap.
pub struct FreecamService {
    store: Arc<PlayerStateStore>,
    tuning: FreecamTuning,
}

impl FreecamService {
    /// Creates a service over an existing store.
    pub fn new(store: Arc<PlayerStateStore>, tuning: FreecamTuning) -> Self {
        Self { store, tuning }
    }

    /// Creates a service with a fresh store seeded from `tuning`.
    pub fn from_tuning(tuning: FreecamTuning) -> Self {
        let store = PlayerStateStore::new(tuning.default_speed, tuning.look_locked_by_default);
        Self::new(Arc::new(store), tuning)
    }

    pub fn store(&self) -> &Arc<PlayerStateStore> {
        &self.store
    }

    pub fn tuning(&self) -> &FreecamTuning {
        &self.tuning
    }

    pub fn mode(&self, id: PlayerId) -> Mode {
        self.store.mode(id)
    }

    pub fn is_active(&self, id: PlayerId) -> bool {
        self.store.is_active(id)
    }

    pub fn is_tripod_active(&self, id: PlayerId) -> bool {
        self.store.is_tripod_active(id)
    }

    pub fn is_look_locked(&self, id: PlayerId) -> bool {
        self.store.is_look_locked(id)
    }

    pub fn speed(&self, id: PlayerId) -> i32 {
        self.store.speed(id)
    }

    /// Enters freecam, or leaves it when already active. Returns whether
    /// freecam is enabled afterwards.
    pub fn toggle_freecam(&self, host: &mut impl PlayerHost, id: PlayerId) -> bool {
        if self.store.is_active(id) {
            self.disable(host, id, true);
            return false;
        }
        if self.store.is_tripod_active(id) {
            self.disable_tripod(id);
        }
        self.enable(host, id);
        true
    }

    /// Freezes the freecam camera in place, or releases an active tripod.
    /// Returns whether tripod is enabled afterwards.
    pub fn toggle_tripod(
        &self,
        host: &mut impl PlayerHost,
        id: PlayerId,
    ) -> Result<bool, FreecamError> {
        if self.disable_tripod(id) {
            return Ok(false);
        }
        let Some((transform, orientation, input_cursor)) = self
            .store
            .freecam_record(id)
            .map(|record| (record.transform, record.orientation, record.input_cursor))
        else {
            info!(player = %id, "tripod requested without an active freecam");
            return Err(FreecamError::TripodRequiresFreecam(id));
        };
        info!(
            player = %id,
            position = %transform,
            orientation = %orientation,
            "tripod snapshot"
        );
        self.disable(host, id, false);
        self.enable_tripod(host, id, transform, orientation, input_cursor);
        Ok(true)
    }

    /// Stores the clamped speed and refreshes an active freecam camera.
    /// Returns the stored value.
    pub fn set_speed(&self, host: &mut impl PlayerHost, id: PlayerId, speed: i32) -> i32 {
        let stored = self.store.store_speed(id, speed);
        if self.store.is_active(id) {
            self.resend_from_avatar(host, id);
        }
        stored
    }

    /// Stores the look-lock flag and refreshes an active freecam camera.
    pub fn set_look_locked(&self, host: &mut impl PlayerHost, id: PlayerId, locked: bool) -> bool {
        self.store.store_look_locked(id, locked);
        if self.store.is_active(id) {
            self.resend_from_avatar(host, id);
        }
        locked
    }

    /// Leaves freecam and restores the avatar. No-op without a record.
    pub fn disable_freecam(&self, host: &mut impl PlayerHost, id: PlayerId) -> bool {
        self.disable(host, id, true)
    }

    /// Drops the tripod record. No-op without a record.
    pub fn disable_tripod(&self, id: PlayerId) -> bool {
        let removed = self.store.remove_tripod(id).is_some();
        if removed {
            info!(player = %id, "tripod disabled");
        }
        removed
    }

    /// Returns the player to normal play from any mode, e.g. on disconnect.
    pub fn release(&self, host: &mut impl PlayerHost, id: PlayerId) {
        self.disable_tripod(id);
        self.disable(host, id, true);
    }

    fn enable(&self, host: &mut impl PlayerHost, id: PlayerId) {
        host.dismount(id);
        let transform = host.transform_or_zero(id);
        let orientation = host.orientation_or_zero(id);
        // Inputs queued before activation belong to the avatar, not the camera.
        let record = FreecamRecord {
            transform,
            orientation,
            avatar_transform: transform,
            avatar_orientation: orientation,
            previous_game_mode: host.game_mode(id),
            previous_block_damage: host.block_damage(id),
            input_cursor: host.input_queue(id).len(),
            logged_input_sample: false,
        };
        if record.previous_game_mode.is_none() || record.previous_block_damage.is_none() {
            debug!(player = %id, "avatar flags unreadable, restore will be skipped");
        }
        self.store.insert_freecam(id, record);

        host.send_fly_mode(id, true);
        host.set_game_mode(id, FREECAM_GAME_MODE);
        host.set_block_damage(id, false);
        host.update_position(id, transform, orientation);
        self.send_camera(host, id, Mode::Freecam, transform, orientation);
        info!(player = %id, position = %transform, "freecam enabled");
    }

    fn disable(&self, host: &mut impl PlayerHost, id: PlayerId, restore_position: bool) -> bool {
        let Some(record) = self.store.remove_freecam(id) else {
            return false;
        };

        // Camera and fly mode go off before any teleport so the client never
        // applies a position update under the wrong camera.
        host.send_camera(id, CameraUpdate::DefaultView);
        host.send_fly_mode(id, false);
        if restore_position {
            host.update_position(id, record.avatar_transform, record.avatar_orientation);
        }
        if let Some(mode) = record.previous_game_mode {
            host.set_game_mode(id, mode);
        }
        if let Some(allowed) = record.previous_block_damage {
            host.set_block_damage(id, allowed);
        }
        info!(player = %id, restore_position, "freecam disabled");
        true
    }

    fn enable_tripod(
        &self,
        host: &mut impl PlayerHost,
        id: PlayerId,
        transform: Transform,
        orientation: Orientation,
        input_cursor: usize,
    ) {
        // Inputs the freecam already consumed are not replayed onto the avatar.
        self.store.insert_tripod(
            id,
            TripodRecord {
                transform,
                orientation,
                avatar_orientation: host.orientation_or_zero(id),
                input_cursor,
                last_diagnostic_at: Instant::now(),
            },
        );
        info!(
            player = %id,
            position = %transform,
            orientation = %orientation,
            "tripod enabled"
        );
        host.send_camera(id, CameraUpdate::DefaultView);
    }

    fn resend_from_avatar(&self, host: &mut impl PlayerHost, id: PlayerId) {
        let transform = host.transform_or_zero(id);
        let orientation = host.orientation_or_zero(id);
        self.send_camera(host, id, Mode::Freecam, transform, orientation);
    }

    pub(crate) fn send_camera(
        &self,
        host: &mut impl PlayerHost,
        id: PlayerId,
        mode: Mode,
        transform: Transform,
        orientation: Orientation,
    ) {
        let update = build_camera_update(
            mode,
            transform,
            orientation,
            self.store.speed(id),
            self.store.is_look_locked(id),
            self.tuning.eye_height,
        );
        host.send_camera(id, update);
    }
}

impl Default for FreecamService {
    fn default() -> Self {
        Self::from_tuning(FreecamTuning::default())
    }
}
