//! Game manager: the player's persistent data, save/load, and respawn.
//!
//! One `GameManager` resource lives for the whole process and survives every scene
//! change. Registering the plugin again is logged and ignored, so the first instance
//! (and its loaded data) always wins.
//!
//! Failure policy:
//! - missing save file → new game (defaults, written immediately)
//! - unreadable/corrupted save file → warning, new game; the bad data is lost
//! - failed write → error log, the previous file on disk stays as it was
//!
//! Every successful write is announced as `GameSaved` in `PostUpdate`, whoever did it.
//! `GameLoaded` is only written when an existing save was actually read.

pub mod storage;

use std::path::{Path, PathBuf};

use avian2d::prelude::*;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::plugins::health::Health;
use crate::plugins::player::{Player, PlayerEntity};
use crate::plugins::scene::{SceneAnnounce, SceneConfig, SceneLoaded};

/// Everything that persists between sessions.
///
/// `#[serde(default)]` lets files written by older builds (with fewer fields) still load.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlayerSaveData {
    pub current_health: f32,
    pub max_health: f32,
    pub spawn_position: [f32; 3],
    pub music_volume: f32,
    pub sfx_volume: f32,
}

impl Default for PlayerSaveData {
    fn default() -> Self {
        Self {
            current_health: 100.0,
            max_health: 100.0,
            spawn_position: [0.0, 2.0, 0.0],
            music_volume: 1.0,
            sfx_volume: 1.0,
        }
    }
}

impl PlayerSaveData {
    #[inline]
    pub fn spawn_point(&self) -> Vec3 {
        Vec3::from_array(self.spawn_position)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Existing save parsed.
    Loaded,
    /// No save on disk; defaults written.
    NewGame,
    /// Save existed but could not be read; defaults written.
    Recovered,
}

#[derive(Resource, Debug)]
pub struct GameManager {
    pub data: PlayerSaveData,
    save_path: PathBuf,
    /// Successful writes not yet announced as `GameSaved`.
    unannounced_saves: u32,
}

impl GameManager {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            data: PlayerSaveData::default(),
            save_path: save_path.into(),
            unannounced_saves: 0,
        }
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Write current data. Returns whether the write succeeded.
    pub fn save_game(&mut self) -> bool {
        match storage::write(&self.save_path, &self.data) {
            Ok(()) => {
                info!("Game saved to {}", self.save_path.display());
                self.unannounced_saves += 1;
                true
            }
            Err(e) => {
                error!("Failed to save game: {e}");
                false
            }
        }
    }

    /// Reset health, spawn point and volumes to defaults and persist them.
    pub fn start_new_game(&mut self) -> bool {
        self.data = PlayerSaveData::default();
        self.save_game()
    }

    /// Drain the count of writes since the last call.
    pub fn take_unannounced_saves(&mut self) -> u32 {
        std::mem::take(&mut self.unannounced_saves)
    }

    pub fn load_game(&mut self) -> LoadOutcome {
        match storage::read(&self.save_path) {
            Ok(Some(data)) => {
                info!("Loaded save data from {}", self.save_path.display());
                self.data = data;
                LoadOutcome::Loaded
            }
            Ok(None) => {
                info!("No save file at {}, starting new", self.save_path.display());
                self.start_new_game();
                LoadOutcome::NewGame
            }
            Err(e) => {
                warn!("{e}. Starting new game.");
                self.start_new_game();
                LoadOutcome::Recovered
            }
        }
    }
}

/// An existing save file was read.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameLoaded;

/// Ask the game manager to persist its data. Handled once per frame.
#[derive(Message, Clone, Copy, Debug, Default)]
pub struct SaveGameRequest;

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameSaved;

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerRespawned {
    pub entity: Entity,
}

/// Marker: collision and body response were switched off for a teleport and get
/// switched back on at the start of the next frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct RespawnLock;

#[derive(Default)]
pub struct GameManagerPlugin {
    /// `None` uses `storage::default_save_path()`.
    pub save_path: Option<PathBuf>,
}

impl GameManagerPlugin {
    pub fn with_save_path(path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: Some(path.into()),
        }
    }
}

impl Plugin for GameManagerPlugin {
    fn build(&self, app: &mut App) {
        if app.world().contains_resource::<GameManager>() {
            warn!("GameManager already exists; ignoring duplicate registration");
            return;
        }

        let path = self
            .save_path
            .clone()
            .unwrap_or_else(storage::default_save_path);

        app.insert_resource(GameManager::new(path))
            .add_message::<GameLoaded>()
            .add_message::<SaveGameRequest>()
            .add_message::<GameSaved>()
            .add_message::<PlayerRespawned>()
            .add_systems(PreStartup, load_on_startup)
            .add_systems(PreUpdate, release_respawn_lock)
            .add_systems(
                Update,
                (
                    respawn_on_scene_loaded.after(SceneAnnounce),
                    mirror_player_health,
                    process_save_requests,
                ),
            )
            .add_systems(PostUpdate, announce_saves);
    }

    // A second registration must reach `build` so it can be refused there.
    fn is_unique(&self) -> bool {
        false
    }
}

fn load_on_startup(mut game: ResMut<GameManager>, mut loaded: MessageWriter<GameLoaded>) {
    if game.load_game() == LoadOutcome::Loaded {
        loaded.write(GameLoaded);
    }
}

pub fn process_save_requests(mut game: ResMut<GameManager>, mut requests: MessageReader<SaveGameRequest>) {
    // Collapse any number of requests into one write.
    if requests.read().count() == 0 {
        return;
    }
    game.save_game();
}

/// One `GameSaved` per successful write since the last frame.
pub fn announce_saves(mut game: ResMut<GameManager>, mut saved: MessageWriter<GameSaved>) {
    if game.unannounced_saves == 0 {
        return;
    }
    for _ in 0..game.take_unannounced_saves() {
        saved.write(GameSaved);
    }
}

/// Mutable view of the player's body used while teleporting it.
pub struct PlayerBody<'a> {
    pub transform: &'a mut Transform,
    pub health: Option<&'a mut Health>,
    pub position: Option<&'a mut Position>,
    pub rotation: Option<&'a mut Rotation>,
    pub velocity: Option<&'a mut LinearVelocity>,
}

/// Respawn the registered player whenever a non-menu scene finishes loading.
pub fn respawn_on_scene_loaded(
    mut commands: Commands,
    config: Res<SceneConfig>,
    player: Res<PlayerEntity>,
    mut game: ResMut<GameManager>,
    mut loaded: MessageReader<SceneLoaded>,
    mut q_player: Query<
        (
            &mut Transform,
            Option<&mut Health>,
            Option<&mut Position>,
            Option<&mut Rotation>,
            Option<&mut LinearVelocity>,
        ),
        With<Player>,
    >,
    mut respawned: MessageWriter<PlayerRespawned>,
) {
    for SceneLoaded(scene) in loaded.read() {
        if config.is_menu(scene) {
            continue;
        }
        let Some(entity) = player.0 else {
            debug!("Scene '{scene}' loaded without a player");
            continue;
        };
        let Ok((mut tf, mut health, mut position, mut rotation, mut velocity)) = q_player.get_mut(entity) else {
            continue;
        };

        let body = PlayerBody {
            transform: &mut *tf,
            health: health.as_deref_mut(),
            position: position.as_deref_mut(),
            rotation: rotation.as_deref_mut(),
            velocity: velocity.as_deref_mut(),
        };
        respawn_player(&mut commands, &mut game.data, entity, body);
        respawned.write(PlayerRespawned { entity });
    }
}

/// Teleport to the stored spawn point with neutral rotation and full health.
///
/// Collision and body response are off while the teleport is applied; see `RespawnLock`.
pub fn respawn_player(commands: &mut Commands, data: &mut PlayerSaveData, entity: Entity, body: PlayerBody<'_>) {
    commands
        .entity(entity)
        .insert((ColliderDisabled, RigidBodyDisabled, RespawnLock));

    let spawn = data.spawn_point();
    body.transform.translation = spawn;
    body.transform.rotation = Quat::IDENTITY;

    if let Some(pos) = body.position {
        pos.0 = spawn.truncate();
    }
    if let Some(rot) = body.rotation {
        *rot = Rotation::default();
    }
    if let Some(vel) = body.velocity {
        vel.0 = Vec2::ZERO;
    }

    data.current_health = data.max_health;
    if let Some(hp) = body.health {
        hp.max = data.max_health;
        hp.restore_full();
    }
}

fn release_respawn_lock(mut commands: Commands, q: Query<Entity, With<RespawnLock>>) {
    for e in &q {
        commands
            .entity(e)
            .remove::<(ColliderDisabled, RigidBodyDisabled, RespawnLock)>();
    }
}

/// Keep `data.current_health` in step with the live player.
pub fn mirror_player_health(
    game: Option<ResMut<GameManager>>,
    q: Query<&Health, (With<Player>, Changed<Health>)>,
) {
    let Some(mut game) = game else { return; };
    let Ok(hp) = q.single() else { return; };
    game.data.current_health = hp.hp.max(0.0);
}

#[cfg(test)]
mod tests;
