//! Player plugin: movement, aim, dash and shooting.
//!
//! Pipeline:
//! - Update: `InputAction::Dash` starts a dash (velocity impulse), `InputAction::Attack`
//!   writes a `FireRequest`
//! - FixedUpdate: advance dash timers, then integrate move input and face the cursor
//!   unless dashing
//!
//! Everything except spawning is gated off while paused. The fixed loop is frozen anyway
//! (virtual time speed 0), but discrete actions arrive in `Update`. Message buffers are only
//! rotated by the fixed loop, so the action readers keep running while paused and drop
//! what they read; otherwise presses made on the pause screen would replay on resume.
//!
//! The player entity is published once in `PlayerEntity`, so enemies, the camera and the
//! game manager use a stored handle instead of scanning for it.

pub mod dash;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::player_layers;
use crate::common::math::{facing_dir, facing_rotation};
use crate::common::state::{is_paused, GameState, PauseState};
use crate::common::tunables::Tunables;
use crate::plugins::audio::AudioManager;
use crate::plugins::game_manager::{GameManager, PlayerSaveData};
use crate::plugins::health::Health;
use crate::plugins::input::{InputAction, InputSystems, PlayerInput};
use crate::plugins::projectiles::{BulletKind, FireRequest, FireSystems};

pub use dash::{Dash, DashPhase};

#[derive(Component)]
pub struct Player;

/// Handle to the live player, if one is spawned.
#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PlayerEntity(pub Option<Entity>);

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerEntity::default())
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(OnExit(GameState::InGame), forget_player)
        .add_systems(
            Update,
            (
                start_dash,
                shoot_on_attack.in_set(FireSystems::Request),
            )
                .after(InputSystems)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedUpdate,
            (tick_dash, apply_movement)
                .chain()
                .run_if(in_state(GameState::InGame).and(not(is_paused))),
        );
}

fn spawn(
    mut commands: Commands,
    tunables: Res<Tunables>,
    game: Option<Res<GameManager>>,
    mut player_e: ResMut<PlayerEntity>,
) {
    let defaults = PlayerSaveData::default();
    let data = game.as_ref().map_or(&defaults, |g| &g.data);

    let e = commands
        .spawn((
            Name::new("Player"),
            Player,
            Health::primary(data.current_health, data.max_health),
            Dash::new(tunables.dash_duration, tunables.dash_cooldown),
            Sprite {
                color: Color::srgb(0.2, 0.75, 0.9),
                custom_size: Some(Vec2::new(22.0, 30.0)),
                ..default()
            },
            Transform::from_translation(data.spawn_point()),
            RigidBody::Kinematic,
            Collider::circle(13.0),
            player_layers(),
            LinearVelocity::ZERO,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    player_e.0 = Some(e);
}

fn forget_player(mut player_e: ResMut<PlayerEntity>) {
    player_e.0 = None;
}

pub fn start_dash(
    mut actions: MessageReader<InputAction>,
    pause: Option<Res<State<PauseState>>>,
    input: Res<PlayerInput>,
    tunables: Res<Tunables>,
    audio: Option<Res<AudioManager>>,
    mut commands: Commands,
    mut q_player: Query<(&mut Dash, &mut LinearVelocity, &Transform), With<Player>>,
) {
    let dash_pressed = actions.read().filter(|a| **a == InputAction::Dash).count() > 0;
    if !dash_pressed || is_paused(pause) {
        return;
    }
    let Ok((mut dash, mut vel, tf)) = q_player.single_mut() else {
        return;
    };
    if !dash.try_begin() {
        return;
    }

    let dir = dash::dash_direction(input.move_axis, facing_dir(tf.rotation));
    vel.0 = dir * tunables.dash_speed;

    if let Some(audio) = audio {
        audio.play_dash(&mut commands);
    }
}

pub fn tick_dash(time: Res<Time>, mut q: Query<&mut Dash, With<Player>>) {
    let dt = time.delta_secs();
    for mut dash in &mut q {
        dash.tick(dt);
    }
}

pub fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&Dash, &mut LinearVelocity, &mut Transform), With<Player>>,
) {
    let Ok((dash, mut vel, mut tf)) = q_player.single_mut() else {
        return;
    };
    if dash.is_dashing() {
        return;
    }

    vel.0 = input.move_axis * tunables.player_speed;

    if let Some(aim) = input.aim_world {
        let look = aim - tf.translation.truncate();
        if look.length_squared() > 1e-4 {
            tf.rotation = facing_rotation(look);
        }
    }
}

/// One shot per attack press. Deliberately no rate limit.
pub fn shoot_on_attack(
    mut actions: MessageReader<InputAction>,
    pause: Option<Res<State<PauseState>>>,
    tunables: Res<Tunables>,
    audio: Option<Res<AudioManager>>,
    mut commands: Commands,
    q_player: Query<(Entity, &Transform), With<Player>>,
    mut fire: MessageWriter<FireRequest>,
) {
    let shots = actions.read().filter(|a| **a == InputAction::Attack).count();
    if shots == 0 || is_paused(pause) {
        return;
    }
    let Ok((player, tf)) = q_player.single() else {
        debug!("Attack without a player");
        return;
    };

    let dir = facing_dir(tf.rotation);
    let muzzle = tf.translation.truncate() + dir * tunables.muzzle_offset;

    for _ in 0..shots {
        fire.write(FireRequest {
            kind: BulletKind::Player,
            pos: muzzle,
            dir,
            force: tunables.player_bullet_force,
            damage: tunables.player_bullet_damage,
            owner: Some(player),
        });
        if let Some(audio) = audio.as_ref() {
            audio.play_attack(&mut commands);
        }
    }
}

#[cfg(test)]
mod tests;
