//! Scene plugin: named scene requests on top of `GameState`.
//!
//! ```text
//! anyone            PreUpdate                 StateTransition        Update
//! LoadSceneRequest → apply_scene_requests  →  OnEnter(..) spawns  →  announce_scene_loaded
//!                    (ActiveScene, NextState)                        writes SceneLoaded
//! ```
//!
//! `SceneLoaded` is written only after the target state's `OnEnter` commands were applied,
//! so listeners (respawn, music) see the freshly spawned level.

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::game_manager::GameManager;

/// Scene names the game knows about.
#[derive(Resource, Debug, Clone)]
pub struct SceneConfig {
    pub menu_scene: String,
    pub first_level: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            menu_scene: "MainMenu".into(),
            first_level: "Level1".into(),
        }
    }
}

impl SceneConfig {
    #[inline]
    pub fn is_menu(&self, scene: &str) -> bool {
        scene == self.menu_scene
    }

    pub fn state_for(&self, scene: &str) -> GameState {
        if self.is_menu(scene) {
            GameState::MainMenu
        } else {
            GameState::InGame
        }
    }
}

/// The scene currently loaded (or being loaded this frame).
#[derive(Resource, Debug, Clone, Default)]
pub struct ActiveScene {
    pub name: String,
    announce: bool,
}

/// Ask for a scene to be loaded. Fire-and-forget.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct LoadSceneRequest(pub String);

/// A scene finished loading.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct SceneLoaded(pub String);

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SceneAnnounce;

pub fn plugin(app: &mut App) {
    let config = SceneConfig::default();
    // The app boots into the menu; announce it on the first frame.
    let active = ActiveScene {
        name: config.menu_scene.clone(),
        announce: true,
    };

    app.insert_resource(config)
        .insert_resource(active)
        .add_message::<LoadSceneRequest>()
        .add_message::<SceneLoaded>()
        .add_systems(PreUpdate, apply_scene_requests)
        .add_systems(Update, announce_scene_loaded.in_set(SceneAnnounce))
        .add_systems(
            Update,
            menu_input.run_if(in_state(GameState::MainMenu)),
        );
}

/// Consume scene requests. If several arrive in one frame the last one wins.
pub fn apply_scene_requests(
    config: Res<SceneConfig>,
    mut requests: MessageReader<LoadSceneRequest>,
    mut active: ResMut<ActiveScene>,
    mut next: ResMut<NextState<GameState>>,
) {
    let Some(LoadSceneRequest(name)) = requests.read().last() else {
        return;
    };

    info!("Loading scene '{name}'");
    active.name = name.clone();
    active.announce = true;
    next.set(config.state_for(name));
}

pub fn announce_scene_loaded(mut active: ResMut<ActiveScene>, mut loaded: MessageWriter<SceneLoaded>) {
    if !active.announce {
        return;
    }
    active.announce = false;
    debug!("Scene '{}' loaded", active.name);
    loaded.write(SceneLoaded(active.name.clone()));
}

/// Main menu bindings: Enter continues, N starts over, Q quits.
fn menu_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    config: Res<SceneConfig>,
    game: Option<ResMut<GameManager>>,
    mut requests: MessageWriter<LoadSceneRequest>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(keys) = keys else { return; };

    if keys.just_pressed(KeyCode::Enter) {
        requests.write(LoadSceneRequest(config.first_level.clone()));
    } else if keys.just_pressed(KeyCode::KeyN) {
        if let Some(mut game) = game {
            game.start_new_game();
        }
        requests.write(LoadSceneRequest(config.first_level.clone()));
    } else if keys.just_pressed(KeyCode::KeyQ) {
        info!("Quitting game");
        exit.write(AppExit::Success);
    }
}
