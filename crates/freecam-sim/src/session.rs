//! Scripted multi-player session over an [`EcsHost`].
//!
//! A script is a list of actions, each due at a step index. Every step the
//! due actions are applied in script order, then each player is ticked once.

use std::collections::VecDeque;
use std::f32::consts::FRAC_PI_2;

use glam::DVec3;
use tracing::{info, warn};

use freecam_core::{
    BlockAction, FreecamService, InputUpdate, Mode, Orientation, PlayerHost, PlayerId, Transform,
    execute_command,
};

use crate::ecs_host::EcsHost;

/// Something a scripted player does.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// A chat command line such as `"/fc 7"`.
    Command(String),
    /// An input update from the client.
    Input(InputUpdate),
    /// Moves the avatar as physics would.
    Nudge(DVec3),
    /// The avatar tries to break or damage a block.
    Block(BlockAction),
}

/// An action due at `step` for `player`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedAction {
    pub step: u64,
    pub player: PlayerId,
    pub action: Action,
}

impl ScriptedAction {
    fn new(step: u64, player: PlayerId, action: Action) -> Self {
        Self {
            step,
            player,
            action,
        }
    }

    fn command(step: u64, player: PlayerId, line: &str) -> Self {
        Self::new(step, player, Action::Command(line.to_string()))
    }

    fn input(step: u64, player: PlayerId, update: InputUpdate) -> Self {
        Self::new(step, player, Action::Input(update))
    }
}

/// Spawns `count` players in a row at y = 64. The first one starts seated on
/// a cart so entering freecam has something to dismount from.
pub fn spawn_players(host: &mut EcsHost, count: u32) -> Vec<PlayerId> {
    let ids: Vec<PlayerId> = (1..=u64::from(count)).map(PlayerId).collect();
    for (slot, &id) in ids.iter().enumerate() {
        let transform = Transform::new(slot as f64 * 4.0, 64.0, 0.0);
        host.spawn_player(id, transform, Orientation::ZERO);
    }
    if let Some(&first) = ids.first() {
        let cart = host.spawn_mount(DVec3::new(0.0, 64.0, 0.0));
        host.mount(first, cart);
    }
    ids
}

/// The demo script.
///
/// The first player flies forward at speed 7 with a head turn midway, locks
/// the look, tries to break a block, parks a tripod, gets pushed around and
/// turns the avatar's head, then leaves tripod. The second player climbs at
/// speed 3 after a couple of rejected commands and exits freecam. Any further
/// players just enter freecam and are released when the session ends.
pub fn demo_script(players: &[PlayerId]) -> Vec<ScriptedAction> {
    let mut script = Vec::new();

    if let Some(&pilot) = players.first() {
        script.push(ScriptedAction::command(5, pilot, "/freecam 7"));
        for step in 6..66 {
            script.push(ScriptedAction::input(
                step,
                pilot,
                InputUpdate::WishMovement(DVec3::Z),
            ));
        }
        script.push(ScriptedAction::input(
            30,
            pilot,
            InputUpdate::SetHead(Orientation::new(0.5, -0.1, 0.0)),
        ));
        script.push(ScriptedAction::command(70, pilot, "/fc lock"));
        script.push(ScriptedAction::new(
            75,
            pilot,
            Action::Block(BlockAction::Break),
        ));
        script.push(ScriptedAction::command(80, pilot, "/tripod"));
        script.push(ScriptedAction::new(
            90,
            pilot,
            Action::Nudge(DVec3::new(1.5, 0.0, 0.0)),
        ));
        for (i, step) in [95, 110, 125].into_iter().enumerate() {
            let yaw = FRAC_PI_2 * (i as f32 + 1.0) / 3.0;
            script.push(ScriptedAction::input(
                step,
                pilot,
                InputUpdate::SetHead(Orientation::new(yaw, 0.0, 0.0)),
            ));
        }
        script.push(ScriptedAction::command(140, pilot, "/t"));
        script.push(ScriptedAction::new(
            150,
            pilot,
            Action::Block(BlockAction::Break),
        ));
    }

    if let Some(&climber) = players.get(1) {
        script.push(ScriptedAction::command(10, climber, "/fc 42"));
        script.push(ScriptedAction::command(12, climber, "/tripod"));
        script.push(ScriptedAction::command(15, climber, "/fc --speed=3"));
        for step in 16..46 {
            script.push(ScriptedAction::input(
                step,
                climber,
                InputUpdate::WishMovement(DVec3::Y),
            ));
        }
        script.push(ScriptedAction::command(60, climber, "/fc"));
    }

    for &idle in players.iter().skip(2) {
        script.push(ScriptedAction::command(20, idle, "/fc"));
    }

    script
}

/// Outcome for one player, captured before the final release.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub mode: Mode,
    pub speed: i32,
    pub look_locked: bool,
    pub position: Transform,
    pub mounted: bool,
    pub messages: usize,
}

/// Outcome of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub steps: u64,
    pub replies: usize,
    pub rejected_commands: usize,
    pub cancelled_block_actions: usize,
    /// Players still in freecam or tripod when the session ended.
    pub engaged: Vec<PlayerId>,
    pub players: Vec<PlayerSummary>,
}

impl SessionSummary {
    pub fn log(&self) {
        info!(
            steps = self.steps,
            replies = self.replies,
            rejected_commands = self.rejected_commands,
            cancelled_block_actions = self.cancelled_block_actions,
            engaged = self.engaged.len(),
            "session finished"
        );
        for player in &self.players {
            info!(
                player = %player.id,
                mode = ?player.mode,
                speed = player.speed,
                look_locked = player.look_locked,
                position = %player.position,
                mounted = player.mounted,
                messages = player.messages,
                "player summary"
            );
        }
    }
}

/// Drives a [`FreecamService`] against an [`EcsHost`] from a script.
pub struct Session {
    service: FreecamService,
    host: EcsHost,
    script: VecDeque<ScriptedAction>,
    steps: u64,
    replies: usize,
    rejected_commands: usize,
    cancelled_block_actions: usize,
}

impl Session {
    pub fn new(service: FreecamService, host: EcsHost, mut script: Vec<ScriptedAction>) -> Self {
        script.sort_by_key(|action| action.step);
        Self {
            service,
            host,
            script: script.into(),
            steps: 0,
            replies: 0,
            rejected_commands: 0,
            cancelled_block_actions: 0,
        }
    }

    pub fn service(&self) -> &FreecamService {
        &self.service
    }

    pub fn host(&self) -> &EcsHost {
        &self.host
    }

    /// Applies the actions due at or before `step`, then ticks every player.
    pub fn step(&mut self, step: u64, delta_seconds: f64) {
        while self.script.front().is_some_and(|next| next.step <= step) {
            if let Some(scripted) = self.script.pop_front() {
                self.apply(scripted);
            }
        }

        for id in self.host.player_ids() {
            self.service
                .on_tick(&mut self.host, id, delta_seconds as f32);
        }
        self.steps += 1;
    }

    /// Releases every player and returns the summary.
    pub fn finish(mut self) -> SessionSummary {
        let ids = self.host.player_ids();
        let players = ids
            .iter()
            .map(|&id| PlayerSummary {
                id,
                mode: self.service.mode(id),
                speed: self.service.speed(id),
                look_locked: self.service.is_look_locked(id),
                position: self.host.transform_or_zero(id),
                mounted: self.host.is_mounted(id),
                messages: self.host.inbox(id).len(),
            })
            .collect();
        let engaged = self.service.store().engaged_players();

        for id in ids {
            self.service.release(&mut self.host, id);
        }

        SessionSummary {
            steps: self.steps,
            replies: self.replies,
            rejected_commands: self.rejected_commands,
            cancelled_block_actions: self.cancelled_block_actions,
            engaged,
            players,
        }
    }

    fn apply(&mut self, scripted: ScriptedAction) {
        let id = scripted.player;
        match scripted.action {
            Action::Command(line) => {
                match execute_command(&self.service, &mut self.host, id, &line) {
                    Ok(replies) => {
                        for reply in &replies {
                            info!(player = %id, command = %line, "{reply}");
                        }
                        self.replies += replies.len();
                    }
                    Err(err) => {
                        warn!(player = %id, command = %line, "{err}");
                        self.rejected_commands += 1;
                    }
                }
            }
            Action::Input(update) => self.host.push_input(id, update),
            Action::Nudge(delta) => self.host.nudge(id, delta),
            Action::Block(action) => {
                if self.service.should_cancel_block_action(id, action) {
                    self.cancelled_block_actions += 1;
                }
            }
        }
    }
}
