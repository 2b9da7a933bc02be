//! In-memory host that records every side effect, for unit tests.

use std::collections::HashMap;

use crate::host::{GameMode, PlayerHost};
use crate::input::InputUpdate;
use crate::payload::CameraUpdate;
use crate::store::PlayerId;
use crate::transform::{Orientation, Transform};

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum HostEvent {
    Camera(PlayerId, CameraUpdate),
    FlyMode(PlayerId, bool),
    Reposition(PlayerId, Transform, Orientation),
    GameMode(PlayerId, GameMode),
    BlockDamage(PlayerId, bool),
    Dismount(PlayerId),
}

#[derive(Clone, Debug)]
pub(crate) struct Avatar {
    pub transform: Option<Transform>,
    pub orientation: Option<Orientation>,
    pub game_mode: Option<GameMode>,
    pub block_damage: Option<bool>,
    pub mounted: bool,
    pub queue: Vec<InputUpdate>,
}

impl Default for Avatar {
    fn default() -> Self {
        Self {
            transform: Some(Transform::ZERO),
            orientation: Some(Orientation::ZERO),
            game_mode: Some(GameMode::Creative),
            block_damage: Some(true),
            mounted: false,
            queue: Vec::new(),
        }
    }
}

#[derive(Default)]
pub(crate) struct RecordingHost {
    pub avatars: HashMap<PlayerId, Avatar>,
    pub events: Vec<HostEvent>,
}

impl RecordingHost {
    pub fn with_player(id: PlayerId, avatar: Avatar) -> Self {
        let mut host = Self::default();
        host.avatars.insert(id, avatar);
        host
    }

    pub fn avatar(&self, id: PlayerId) -> &Avatar {
        &self.avatars[&id]
    }

    pub fn push_input(&mut self, id: PlayerId, update: InputUpdate) {
        self.avatars.entry(id).or_default().queue.push(update);
    }

    pub fn camera_updates(&self, id: PlayerId) -> Vec<&CameraUpdate> {
        self.events
            .iter()
            .filter_map(|event| match event {
                HostEvent::Camera(target, update) if *target == id => Some(update),
                _ => None,
            })
            .collect()
    }

    pub fn last_payload_position(&self, id: PlayerId) -> Option<glam::DVec3> {
        self.camera_updates(id)
            .last()
            .and_then(|update| update.payload())
            .map(|payload| payload.position)
    }
}

impl PlayerHost for RecordingHost {
    fn transform(&self, id: PlayerId) -> Option<Transform> {
        self.avatars.get(&id).and_then(|a| a.transform)
    }

    fn orientation(&self, id: PlayerId) -> Option<Orientation> {
        self.avatars.get(&id).and_then(|a| a.orientation)
    }

    fn update_position(&mut self, id: PlayerId, transform: Transform, orientation: Orientation) {
        let avatar = self.avatars.entry(id).or_default();
        avatar.transform = Some(transform);
        avatar.orientation = Some(orientation);
        self.events.push(HostEvent::Reposition(id, transform, orientation));
    }

    fn input_queue(&self, id: PlayerId) -> &[InputUpdate] {
        self.avatars
            .get(&id)
            .map(|a| a.queue.as_slice())
            .unwrap_or(&[])
    }

    fn game_mode(&self, id: PlayerId) -> Option<GameMode> {
        self.avatars.get(&id).and_then(|a| a.game_mode)
    }

    fn set_game_mode(&mut self, id: PlayerId, mode: GameMode) {
        self.avatars.entry(id).or_default().game_mode = Some(mode);
        self.events.push(HostEvent::GameMode(id, mode));
    }

    fn block_damage(&self, id: PlayerId) -> Option<bool> {
        self.avatars.get(&id).and_then(|a| a.block_damage)
    }

    fn set_block_damage(&mut self, id: PlayerId, allowed: bool) {
        self.avatars.entry(id).or_default().block_damage = Some(allowed);
        self.events.push(HostEvent::BlockDamage(id, allowed));
    }

    fn dismount(&mut self, id: PlayerId) {
        if let Some(avatar) = self.avatars.get_mut(&id) {
            avatar.mounted = false;
        }
        self.events.push(HostEvent::Dismount(id));
    }

    fn send_camera(&mut self, id: PlayerId, update: CameraUpdate) {
        self.events.push(HostEvent::Camera(id, update));
    }

    fn send_fly_mode(&mut self, id: PlayerId, enabled: bool) {
        self.events.push(HostEvent::FlyMode(id, enabled));
    }
}
