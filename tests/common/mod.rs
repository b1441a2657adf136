//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - every update advances time by a fixed amount so the fixed loop runs deterministically.
//! - saves go to a unique temp file, registered before the game's default game manager.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use aliens_vs_cowboys::plugins::game_manager::GameManagerPlugin;
use aliens_vs_cowboys::plugins::player::PlayerEntity;
use aliens_vs_cowboys::plugins::scene::LoadSceneRequest;

/// Two fixed steps (64 Hz) per update.
pub const FRAME: Duration = Duration::from_millis(32);

pub fn temp_save_path(tag: &str) -> PathBuf {
    static NEXT: AtomicU32 = AtomicU32::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("avc-it-{}-{tag}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("savefile.ron")
}

pub fn app_with_save(save_path: PathBuf) -> App {
    let mut app = App::new();

    // AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app.add_plugins(GameManagerPlugin::with_save_path(save_path));

    aliens_vs_cowboys::game::configure_headless(&mut app);
    // `App::run` would do this; tests drive `update()` by hand.
    app.finish();
    app.cleanup();
    app
}

pub fn app_headless() -> App {
    app_with_save(temp_save_path("app"))
}

pub fn update_n(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

/// Boot, then load the first level. Returns the player entity.
pub fn boot_into_level(app: &mut App) -> Entity {
    app.update();
    app.world_mut()
        .write_message(LoadSceneRequest("Level1".into()));
    app.update();
    app.world()
        .resource::<PlayerEntity>()
        .0
        .expect("player spawned on level entry")
}

/// Collects every message of type `M` seen by the app, in order.
#[derive(Resource)]
pub struct Recorded<M: Message + Clone>(pub Vec<M>);

impl<M: Message + Clone> Default for Recorded<M> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

pub fn record<M: Message + Clone>(app: &mut App) {
    fn collect<M: Message + Clone>(mut reader: MessageReader<M>, mut out: ResMut<Recorded<M>>) {
        out.0.extend(reader.read().cloned());
    }
    app.init_resource::<Recorded<M>>()
        .add_systems(Last, collect::<M>);
}

pub fn recorded<M: Message + Clone>(app: &App) -> &[M] {
    &app.world().resource::<Recorded<M>>().0
}
