//! [`PlayerHost`] backed by a Bevy ECS [`World`].
//!
//! Every player is an entity carrying its avatar state as components. Mounts
//! are plain entities with a passenger list. Messages the service sends to a
//! client land in that player's [`ClientInbox`].

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use glam::DVec3;
use tracing::{debug, warn};

use freecam_core::{
    CameraUpdate, GameMode, InputUpdate, Orientation, PlayerHost, PlayerId, Transform,
};

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Identifies a player entity.
#[derive(Debug, Clone, Copy, Component)]
pub struct PlayerTag(pub PlayerId);

#[derive(Debug, Clone, Copy, Component)]
pub struct AvatarTransform(pub Transform);

#[derive(Debug, Clone, Copy, Component)]
pub struct AvatarOrientation(pub Orientation);

#[derive(Debug, Clone, Copy, Component)]
pub struct AvatarGameMode(pub GameMode);

/// Whether the avatar may damage blocks.
#[derive(Debug, Clone, Copy, Component)]
pub struct AvatarBlockDamage(pub bool);

/// Movement and look updates received from the client, oldest first.
/// Append-only for the life of the entity.
#[derive(Debug, Clone, Default, Component)]
pub struct InputQueue(pub Vec<InputUpdate>);

/// A message delivered to a client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    Camera(CameraUpdate),
    FlyMode(bool),
}

/// Messages sent to the client, in send order.
#[derive(Debug, Clone, Default, Component)]
pub struct ClientInbox(pub Vec<ClientMessage>);

/// The mount an avatar is riding.
#[derive(Debug, Clone, Copy, Component)]
pub struct Mounted(pub Entity);

/// Passengers riding a mount entity.
#[derive(Debug, Clone, Default, Component)]
pub struct MountedBy(pub Vec<Entity>);

/// World position of a mount.
#[derive(Debug, Clone, Copy, Component)]
pub struct MountPosition(pub DVec3);

// ---------------------------------------------------------------------------
// EcsHost
// ---------------------------------------------------------------------------

/// Player host over an ECS world.
pub struct EcsHost {
    world: World,
    players: HashMap<PlayerId, Entity>,
}

impl EcsHost {
    /// Creates a host with an empty world.
    pub fn new() -> Self {
        Self {
            world: World::new(),
            players: HashMap::new(),
        }
    }

    /// Spawns a player avatar in creative mode with block damage allowed.
    pub fn spawn_player(
        &mut self,
        id: PlayerId,
        transform: Transform,
        orientation: Orientation,
    ) -> Entity {
        let entity = self
            .world
            .spawn((
                PlayerTag(id),
                AvatarTransform(transform),
                AvatarOrientation(orientation),
                AvatarGameMode(GameMode::Creative),
                AvatarBlockDamage(true),
                InputQueue::default(),
                ClientInbox::default(),
            ))
            .id();
        if let Some(previous) = self.players.insert(id, entity) {
            warn!(player = %id, ?previous, "player respawned, old entity orphaned");
        }
        debug!(player = %id, ?entity, position = %transform, "spawned player");
        entity
    }

    /// Spawns a mount with no passengers.
    pub fn spawn_mount(&mut self, position: DVec3) -> Entity {
        self.world
            .spawn((MountPosition(position), MountedBy::default()))
            .id()
    }

    /// Seats `id` on `mount`. Returns `false` when either entity is unknown.
    pub fn mount(&mut self, id: PlayerId, mount: Entity) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        match self.world.get_mut::<MountedBy>(mount) {
            Some(mut passengers) => passengers.0.push(entity),
            None => return false,
        }
        self.world.entity_mut(entity).insert(Mounted(mount));
        true
    }

    pub fn entity(&self, id: PlayerId) -> Option<Entity> {
        self.players.get(&id).copied()
    }

    /// Player ids in ascending order.
    pub fn player_ids(&self) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.players.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn is_mounted(&self, id: PlayerId) -> bool {
        self.component::<Mounted>(id).is_some()
    }

    /// Passengers currently riding `mount`.
    pub fn passengers(&self, mount: Entity) -> &[Entity] {
        self.world
            .get::<MountedBy>(mount)
            .map(|by| by.0.as_slice())
            .unwrap_or(&[])
    }

    /// Appends a client input update to the player's queue.
    pub fn push_input(&mut self, id: PlayerId, update: InputUpdate) {
        if let Some(mut queue) = self.component_mut::<InputQueue>(id) {
            queue.0.push(update);
        }
    }

    /// Moves the avatar without going through the service, as physics or a
    /// knockback would.
    pub fn nudge(&mut self, id: PlayerId, delta: DVec3) {
        if let Some(mut transform) = self.component_mut::<AvatarTransform>(id) {
            transform.0 = transform.0.translated(delta);
        }
    }

    /// Messages delivered to the client so far.
    pub fn inbox(&self, id: PlayerId) -> &[ClientMessage] {
        self.component::<ClientInbox>(id)
            .map(|inbox| inbox.0.as_slice())
            .unwrap_or(&[])
    }

    fn component<C: Component>(&self, id: PlayerId) -> Option<&C> {
        self.entity(id).and_then(|entity| self.world.get::<C>(entity))
    }

    fn component_mut<C: Component>(&mut self, id: PlayerId) -> Option<Mut<'_, C>> {
        let entity = self.entity(id)?;
        self.world.get_mut::<C>(entity)
    }

    fn deliver(&mut self, id: PlayerId, message: ClientMessage) {
        match self.component_mut::<ClientInbox>(id) {
            Some(mut inbox) => inbox.0.push(message),
            None => debug!(player = %id, ?message, "dropped message for unknown player"),
        }
    }
}

impl Default for EcsHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerHost for EcsHost {
    fn transform(&self, id: PlayerId) -> Option<Transform> {
        self.component::<AvatarTransform>(id).map(|t| t.0)
    }

    fn orientation(&self, id: PlayerId) -> Option<Orientation> {
        self.component::<AvatarOrientation>(id).map(|o| o.0)
    }

    fn update_position(&mut self, id: PlayerId, transform: Transform, orientation: Orientation) {
        let Some(entity) = self.entity(id) else {
            return;
        };
        self.world
            .entity_mut(entity)
            .insert((AvatarTransform(transform), AvatarOrientation(orientation)));
    }

    fn input_queue(&self, id: PlayerId) -> &[InputUpdate] {
        self.component::<InputQueue>(id)
            .map(|queue| queue.0.as_slice())
            .unwrap_or(&[])
    }

    fn game_mode(&self, id: PlayerId) -> Option<GameMode> {
        self.component::<AvatarGameMode>(id).map(|m| m.0)
    }

    fn set_game_mode(&mut self, id: PlayerId, mode: GameMode) {
        if let Some(mut current) = self.component_mut::<AvatarGameMode>(id) {
            current.0 = mode;
        }
    }

    fn block_damage(&self, id: PlayerId) -> Option<bool> {
        self.component::<AvatarBlockDamage>(id).map(|d| d.0)
    }

    fn set_block_damage(&mut self, id: PlayerId, allowed: bool) {
        if let Some(mut current) = self.component_mut::<AvatarBlockDamage>(id) {
            current.0 = allowed;
        }
    }

    fn dismount(&mut self, id: PlayerId) {
        let Some(entity) = self.entity(id) else {
            return;
        };
        let Some(Mounted(mount)) = self.world.get::<Mounted>(entity).copied() else {
            return;
        };
        if let Some(mut passengers) = self.world.get_mut::<MountedBy>(mount) {
            passengers.0.retain(|passenger| *passenger != entity);
        }
        self.world.entity_mut(entity).remove::<Mounted>();
        debug!(player = %id, ?mount, "dismounted");
    }

    fn send_camera(&mut self, id: PlayerId, update: CameraUpdate) {
        self.deliver(id, ClientMessage::Camera(update));
    }

    fn send_fly_mode(&mut self, id: PlayerId, enabled: bool) {
        self.deliver(id, ClientMessage::FlyMode(enabled));
    }
}
