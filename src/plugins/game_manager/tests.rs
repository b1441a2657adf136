use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};

use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{run_system_once, TestRng};
use crate::plugins::health::Health;
use crate::plugins::player::{Player, PlayerEntity};
use crate::plugins::scene::{SceneConfig, SceneLoaded};

use super::*;

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

/// A save path no other test uses. The file does not exist yet.
fn temp_save_path(tag: &str) -> PathBuf {
    static NEXT: AtomicU32 = AtomicU32::new(0);
    let n = NEXT.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "avc-gm-{}-{tag}-{n}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("savefile.ron")
}

fn random_data(rng: &mut TestRng) -> PlayerSaveData {
    PlayerSaveData {
        current_health: rng.range_f32(-50.0, 500.0),
        max_health: rng.range_f32(1.0, 500.0),
        spawn_position: [
            rng.range_f32(-1e4, 1e4),
            rng.range_f32(-1e4, 1e4),
            rng.range_f32(-10.0, 10.0),
        ],
        music_volume: rng.next_f32(),
        sfx_volume: rng.next_f32(),
    }
}

// -----------------------------------------------------------------------------
// Persistence
// -----------------------------------------------------------------------------

#[test]
fn new_game_defaults() {
    let data = PlayerSaveData::default();
    assert_eq!(data.current_health, 100.0);
    assert_eq!(data.max_health, 100.0);
    assert_eq!(data.spawn_point(), Vec3::new(0.0, 2.0, 0.0));
    assert_eq!(data.music_volume, 1.0);
    assert_eq!(data.sfx_volume, 1.0);
}

#[test]
fn save_then_load_reproduces_state_exactly() {
    let path = temp_save_path("roundtrip");
    let mut rng = TestRng::new(0x5A7E_5A7E_1234_5678);

    for _case in 0..200 {
        let original = random_data(&mut rng);

        let mut writer = GameManager::new(&path);
        writer.data = original.clone();
        assert!(writer.save_game());

        let mut reader = GameManager::new(&path);
        assert_eq!(reader.load_game(), LoadOutcome::Loaded);
        assert_eq!(reader.data, original);
    }
}

#[test]
fn missing_file_starts_new_game_and_writes_it() {
    let path = temp_save_path("missing");
    let mut gm = GameManager::new(&path);
    gm.data.current_health = 3.0;

    assert_eq!(gm.load_game(), LoadOutcome::NewGame);
    assert_eq!(gm.data, PlayerSaveData::default());
    assert!(path.exists());
}

#[test]
fn corrupted_file_falls_back_to_defaults() {
    let path = temp_save_path("corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "(current_health: oops, ]]]").unwrap();

    let mut gm = GameManager::new(&path);
    gm.data.max_health = 7.0;

    assert_eq!(gm.load_game(), LoadOutcome::Recovered);
    assert_eq!(gm.data, PlayerSaveData::default());

    // The bad file was replaced by a readable one.
    let mut again = GameManager::new(&path);
    assert_eq!(again.load_game(), LoadOutcome::Loaded);
}

#[test]
fn older_file_with_missing_fields_loads_with_defaults() {
    let path = temp_save_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "(current_health: 42.0, max_health: 80.0)").unwrap();

    let mut gm = GameManager::new(&path);
    assert_eq!(gm.load_game(), LoadOutcome::Loaded);
    assert_eq!(gm.data.current_health, 42.0);
    assert_eq!(gm.data.max_health, 80.0);
    assert_eq!(gm.data.spawn_position, [0.0, 2.0, 0.0]);
    assert_eq!(gm.data.music_volume, 1.0);
}

#[test]
fn failed_write_is_non_fatal_and_keeps_previous_file() {
    let path = temp_save_path("blocked");

    let mut gm = GameManager::new(&path);
    gm.data.current_health = 55.0;
    assert!(gm.save_game());

    // Block the path: a directory can't be written as a file.
    std::fs::remove_file(&path).unwrap();
    std::fs::create_dir_all(&path).unwrap();

    gm.data.current_health = 11.0;
    assert!(!gm.save_game());
    assert_eq!(gm.data.current_health, 11.0);
    assert!(path.is_dir());
}

#[test]
fn start_new_game_resets_and_persists() {
    let path = temp_save_path("newgame");
    let mut gm = GameManager::new(&path);
    gm.data.music_volume = 0.2;
    gm.data.spawn_position = [9.0, 9.0, 9.0];

    assert!(gm.start_new_game());
    assert_eq!(gm.data, PlayerSaveData::default());

    let mut reader = GameManager::new(&path);
    reader.load_game();
    assert_eq!(reader.data, PlayerSaveData::default());
}

#[test]
fn duplicate_plugin_registration_keeps_the_first_manager() {
    let first = temp_save_path("first");
    let second = temp_save_path("second");

    let mut app = App::new();
    app.add_plugins(GameManagerPlugin::with_save_path(&first));
    app.add_plugins(GameManagerPlugin::with_save_path(&second));

    assert_eq!(app.world().resource::<GameManager>().save_path(), first.as_path());
}

#[test]
fn save_requests_collapse_into_one_write() {
    let path = temp_save_path("requests");
    let mut world = World::new();
    world.insert_resource(GameManager::new(&path));
    world.init_resource::<Messages<SaveGameRequest>>();
    world.init_resource::<Messages<GameSaved>>();

    world.write_message(SaveGameRequest);
    world.write_message(SaveGameRequest);
    run_system_once(&mut world, process_save_requests);
    run_system_once(&mut world, announce_saves);

    let saved = world.resource::<Messages<GameSaved>>();
    assert_eq!(saved.len(), 1);
    assert!(path.exists());
}

#[test]
fn every_successful_write_is_announced() {
    let path = temp_save_path("announce");
    let mut world = World::new();
    world.insert_resource(GameManager::new(&path));
    world.init_resource::<Messages<GameSaved>>();

    {
        let mut gm = world.resource_mut::<GameManager>();
        // Missing file: the fallback new game writes once, then the menu's New Game again.
        assert_eq!(gm.load_game(), LoadOutcome::NewGame);
        assert!(gm.start_new_game());
    }
    run_system_once(&mut world, announce_saves);
    assert_eq!(world.resource::<Messages<GameSaved>>().len(), 2);

    // Nothing new to announce.
    world.resource_mut::<Messages<GameSaved>>().clear();
    run_system_once(&mut world, announce_saves);
    assert!(world.resource::<Messages<GameSaved>>().is_empty());
}

#[test]
fn failed_write_is_not_announced() {
    let path = temp_save_path("silent");
    std::fs::create_dir_all(&path).unwrap();

    let mut gm = GameManager::new(&path);
    assert!(!gm.save_game());
    assert_eq!(gm.take_unannounced_saves(), 0);
}

#[test]
fn game_loaded_only_for_an_existing_save() {
    let path = temp_save_path("loaded-msg");

    let mut world = World::new();
    world.insert_resource(GameManager::new(&path));
    world.init_resource::<Messages<GameLoaded>>();
    run_system_once(&mut world, load_on_startup);
    assert!(world.resource::<Messages<GameLoaded>>().is_empty());

    let mut world = World::new();
    world.insert_resource(GameManager::new(&path));
    world.init_resource::<Messages<GameLoaded>>();
    run_system_once(&mut world, load_on_startup);
    assert_eq!(world.resource::<Messages<GameLoaded>>().len(), 1);
}

// -----------------------------------------------------------------------------
// Respawn
// -----------------------------------------------------------------------------

fn respawn_world(save_tag: &str) -> (World, Entity) {
    let mut world = World::new();
    world.insert_resource(SceneConfig::default());
    world.init_resource::<Messages<SceneLoaded>>();
    world.init_resource::<Messages<PlayerRespawned>>();

    let mut gm = GameManager::new(temp_save_path(save_tag));
    gm.data.spawn_position = [10.0, 20.0, 1.0];
    gm.data.max_health = 100.0;
    gm.data.current_health = 0.0;
    world.insert_resource(gm);

    let mut hp = Health::primary(100.0, 100.0);
    hp.take_damage(150.0);

    let player = world
        .spawn((
            Player,
            hp,
            Transform::from_xyz(-300.0, 40.0, 1.0).with_rotation(Quat::from_rotation_z(1.0)),
            Position(Vec2::new(-300.0, 40.0)),
            LinearVelocity(Vec2::new(5.0, 5.0)),
        ))
        .id();
    world.insert_resource(PlayerEntity(Some(player)));

    (world, player)
}

#[test]
fn level_load_respawns_player_at_spawn_with_full_health() {
    let (mut world, player) = respawn_world("respawn");

    world.write_message(SceneLoaded("Level1".into()));
    run_system_once(&mut world, respawn_on_scene_loaded);

    let tf = world.get::<Transform>(player).unwrap();
    assert_eq!(tf.translation, Vec3::new(10.0, 20.0, 1.0));
    assert_eq!(tf.rotation, Quat::IDENTITY);
    assert_eq!(world.get::<Position>(player).unwrap().0, Vec2::new(10.0, 20.0));
    assert_eq!(world.get::<LinearVelocity>(player).unwrap().0, Vec2::ZERO);

    let hp = world.get::<Health>(player).unwrap();
    assert_eq!(hp.hp, 100.0);
    assert!(!hp.is_depleted());
    assert_eq!(world.resource::<GameManager>().data.current_health, 100.0);

    assert!(world.get::<ColliderDisabled>(player).is_some());
    assert!(world.get::<RespawnLock>(player).is_some());
    assert_eq!(world.resource::<Messages<PlayerRespawned>>().len(), 1);

    run_system_once(&mut world, release_respawn_lock);
    assert!(world.get::<ColliderDisabled>(player).is_none());
    assert!(world.get::<RigidBodyDisabled>(player).is_none());
    assert!(world.get::<RespawnLock>(player).is_none());
}

#[test]
fn menu_load_does_not_respawn() {
    let (mut world, player) = respawn_world("menu");

    world.write_message(SceneLoaded("MainMenu".into()));
    run_system_once(&mut world, respawn_on_scene_loaded);

    assert_eq!(world.get::<Transform>(player).unwrap().translation.x, -300.0);
    assert!(world.get::<RespawnLock>(player).is_none());
    assert_eq!(world.resource::<Messages<PlayerRespawned>>().len(), 0);
}

#[test]
fn no_registered_player_is_a_no_op() {
    let (mut world, _player) = respawn_world("noplayer");
    world.insert_resource(PlayerEntity(None));

    world.write_message(SceneLoaded("Level1".into()));
    run_system_once(&mut world, respawn_on_scene_loaded);

    assert_eq!(world.resource::<Messages<PlayerRespawned>>().len(), 0);
}

#[test]
fn player_health_is_mirrored_into_save_data_and_floored_at_zero() {
    let (mut world, player) = respawn_world("mirror");
    world.get_mut::<Health>(player).unwrap().hp = 37.5;

    run_system_once(&mut world, mirror_player_health);
    assert_eq!(world.resource::<GameManager>().data.current_health, 37.5);

    world.get_mut::<Health>(player).unwrap().hp = -20.0;
    run_system_once(&mut world, mirror_player_health);
    assert_eq!(world.resource::<GameManager>().data.current_health, 0.0);
}
