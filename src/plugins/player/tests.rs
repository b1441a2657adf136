use avian2d::prelude::*;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::math::facing_rotation;
use crate::common::test_utils::{run_system_once, time_with_delta, TestRng};
use crate::common::tunables::Tunables;
use crate::plugins::game_manager::GameManager;
use crate::plugins::health::Health;
use crate::plugins::input::{InputAction, PlayerInput};
use crate::plugins::projectiles::{BulletKind, FireRequest};

use super::*;

fn player_world(input: PlayerInput) -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(input);
    world.init_resource::<Messages<InputAction>>();
    world.init_resource::<Messages<FireRequest>>();
    world
}

fn spawn_test_player(world: &mut World, rotation: Quat) -> Entity {
    let t = Tunables::default();
    world
        .spawn((
            Player,
            Dash::new(t.dash_duration, t.dash_cooldown),
            LinearVelocity::ZERO,
            Transform::from_xyz(0.0, 0.0, 1.0).with_rotation(rotation),
        ))
        .id()
}

fn fire_requests(world: &World) -> Vec<FireRequest> {
    let msgs = world.resource::<Messages<FireRequest>>();
    let mut cursor = msgs.get_cursor();
    cursor.read(msgs).copied().collect()
}

// -----------------------------------------------------------------------------
// Dash state machine (pure)
// -----------------------------------------------------------------------------

#[test]
fn dash_runs_both_stages_then_rearms() {
    let mut d = Dash::new(0.2, 0.5);
    assert!(d.try_begin());
    assert!(d.is_dashing());

    d.tick(0.1);
    assert!(d.is_dashing());

    d.tick(0.15);
    assert!(!d.is_dashing());
    assert!(!d.can_dash());
    assert!(matches!(d.phase(), DashPhase::Cooldown { remaining } if (remaining - 0.45).abs() < 1e-5));

    d.tick(0.5);
    assert!(d.can_dash());
}

#[test]
fn dash_never_retriggers_while_dashing_or_cooling_down() {
    let mut rng = TestRng::new(0xDA54_0000_C001_D0E5);
    let (duration, cooldown) = (0.2, 0.5);

    for _case in 0..200 {
        let mut d = Dash::new(duration, cooldown);
        // Simulated time since the last dash started.
        let mut since_start: Option<f32> = None;

        for _step in 0..300 {
            if rng.chance(0.3) {
                let was_ready = d.can_dash();
                let started = d.try_begin();
                assert_eq!(started, was_ready);
                if started {
                    if let Some(t) = since_start {
                        assert!(t + 1e-4 >= duration + cooldown, "re-dashed after {t}s");
                    }
                    since_start = Some(0.0);
                }
            }

            let dt = rng.range_f32(0.0, 0.05);
            d.tick(dt);
            if let Some(t) = since_start.as_mut() {
                *t += dt;
            }
        }
    }
}

#[test]
fn dash_direction_prefers_input_then_facing() {
    assert_eq!(dash::dash_direction(Vec2::new(3.0, 0.0), Vec2::Y), Vec2::X);
    assert_eq!(dash::dash_direction(Vec2::ZERO, Vec2::NEG_Y), Vec2::NEG_Y);
}

// -----------------------------------------------------------------------------
// Systems
// -----------------------------------------------------------------------------

#[test]
fn spawn_uses_saved_health_and_spawn_point_and_registers_handle() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(PlayerEntity::default());

    let mut gm = GameManager::new(std::env::temp_dir().join("avc-player-spawn-unused.ron"));
    gm.data.current_health = 60.0;
    gm.data.spawn_position = [4.0, 5.0, 0.0];
    world.insert_resource(gm);

    run_system_once(&mut world, super::spawn);

    let e = world.resource::<PlayerEntity>().0.expect("player handle");
    let hp = world.get::<Health>(e).unwrap();
    assert_eq!((hp.hp, hp.max, hp.primary), (60.0, 100.0, true));
    assert_eq!(world.get::<Transform>(e).unwrap().translation, Vec3::new(4.0, 5.0, 0.0));
    assert!(world.get::<Dash>(e).unwrap().can_dash());
}

#[test]
fn apply_movement_sets_velocity_and_faces_cursor() {
    let mut world = player_world(PlayerInput {
        move_axis: Vec2::new(1.0, 0.0),
        aim_world: Some(Vec2::new(-10.0, 0.0)),
    });
    let e = spawn_test_player(&mut world, Quat::IDENTITY);

    run_system_once(&mut world, apply_movement);

    let speed = Tunables::default().player_speed;
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(speed, 0.0));

    let facing = crate::common::math::facing_dir(world.get::<Transform>(e).unwrap().rotation);
    assert!((facing - Vec2::NEG_X).length() < 1e-5);
}

#[test]
fn dash_impulse_follows_input_and_suspends_movement() {
    let mut world = player_world(PlayerInput {
        move_axis: Vec2::Y,
        aim_world: None,
    });
    let e = spawn_test_player(&mut world, Quat::IDENTITY);

    world.write_message(InputAction::Dash);
    run_system_once(&mut world, start_dash);

    let dash_speed = Tunables::default().dash_speed;
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(0.0, dash_speed));
    assert!(world.get::<Dash>(e).unwrap().is_dashing());

    // Normal integration must not overwrite the dash velocity.
    run_system_once(&mut world, apply_movement);
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(0.0, dash_speed));

    // After the dash stage, movement takes over again.
    world.insert_resource(time_with_delta(Tunables::default().dash_duration + 0.01));
    run_system_once(&mut world, tick_dash);
    run_system_once(&mut world, apply_movement);

    let speed = Tunables::default().player_speed;
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::new(0.0, speed));
    assert!(!world.get::<Dash>(e).unwrap().can_dash());
}

#[test]
fn dash_without_input_goes_where_the_player_faces() {
    let mut world = player_world(PlayerInput::default());
    let e = spawn_test_player(&mut world, facing_rotation(Vec2::X));

    world.write_message(InputAction::Dash);
    run_system_once(&mut world, start_dash);

    let v = world.get::<LinearVelocity>(e).unwrap().0.normalize();
    assert!((v - Vec2::X).length() < 1e-5);
}

#[test]
fn second_dash_press_during_dash_is_ignored() {
    let mut world = player_world(PlayerInput {
        move_axis: Vec2::X,
        aim_world: None,
    });
    let e = spawn_test_player(&mut world, Quat::IDENTITY);

    world.write_message(InputAction::Dash);
    run_system_once(&mut world, start_dash);
    let before = world.get::<Dash>(e).unwrap().clone();

    world.resource_mut::<PlayerInput>().move_axis = Vec2::NEG_X;
    world.write_message(InputAction::Dash);
    run_system_once(&mut world, start_dash);

    assert_eq!(*world.get::<Dash>(e).unwrap(), before);
    assert!(world.get::<LinearVelocity>(e).unwrap().0.x > 0.0);
}

#[test]
fn every_attack_press_fires_one_shot_from_the_muzzle() {
    let mut world = player_world(PlayerInput::default());
    let e = spawn_test_player(&mut world, facing_rotation(Vec2::X));

    world.write_message(InputAction::Attack);
    world.write_message(InputAction::Attack);
    world.write_message(InputAction::Dash);
    run_system_once(&mut world, shoot_on_attack);

    let shots = fire_requests(&world);
    assert_eq!(shots.len(), 2);

    let t = Tunables::default();
    for shot in shots {
        assert_eq!(shot.kind, BulletKind::Player);
        assert_eq!(shot.owner, Some(e));
        assert!((shot.dir - Vec2::X).length() < 1e-5);
        assert!((shot.pos - Vec2::new(t.muzzle_offset, 0.0)).length() < 1e-4);
        assert_eq!(shot.force, t.player_bullet_force);
    }
}

#[test]
fn presses_made_while_paused_are_dropped_not_replayed() {
    use crate::common::state::PauseState;

    let mut world = player_world(PlayerInput {
        move_axis: Vec2::X,
        aim_world: None,
    });
    let e = spawn_test_player(&mut world, Quat::IDENTITY);
    world.insert_resource(State::new(PauseState::Paused));

    // Readers keep their cursors across runs, like in the app.
    let mut schedule = Schedule::default();
    schedule.add_systems((start_dash, shoot_on_attack));

    for _frame in 0..3 {
        world.write_message(InputAction::Attack);
        world.write_message(InputAction::Attack);
        world.write_message(InputAction::Dash);
        schedule.run(&mut world);
    }
    assert!(fire_requests(&world).is_empty());
    assert!(world.get::<Dash>(e).unwrap().can_dash());

    world.insert_resource(State::new(PauseState::Running));
    schedule.run(&mut world);
    assert!(fire_requests(&world).is_empty());
    assert!(world.get::<Dash>(e).unwrap().can_dash());
    assert_eq!(world.get::<LinearVelocity>(e).unwrap().0, Vec2::ZERO);

    // Fresh presses after resuming work as usual.
    world.write_message(InputAction::Attack);
    world.write_message(InputAction::Dash);
    schedule.run(&mut world);
    assert_eq!(fire_requests(&world).len(), 1);
    assert!(world.get::<Dash>(e).unwrap().is_dashing());
}
