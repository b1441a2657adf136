//! Enemies plugin: ranged grunts that keep their distance and shoot on a timer.
//!
//! Per frame, for every enemy:
//! - steer by stance (approach, retreat or hold) and turn to face the player
//! - tick the fire cooldown; in range and ready -> `FireRequest` along the facing
//!
//! Both steps are chained so a shot always leaves along this frame's facing.
//! Deaths go through the shared health pipeline; nothing here despawns.

pub mod behaviour;

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::Occluder2d;

use crate::common::layers::enemy_layers;
use crate::common::math::{facing_dir, facing_rotation};
use crate::common::state::{is_paused, GameState};
use crate::common::tunables::Tunables;
use crate::plugins::health::Health;
use crate::plugins::player::{Player, PlayerEntity};
use crate::plugins::projectiles::{BulletKind, FireRequest, FireSystems};
use crate::plugins::world::ENEMY_SPAWNS;

pub use behaviour::{EnemyBehaviour, Stance};

#[derive(Component)]
pub struct Enemy;

const ENEMY_RADIUS: f32 = 14.0;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_enemies)
        .add_systems(
            Update,
            (enemy_pursuit, enemy_fire.in_set(FireSystems::Request))
                .chain()
                .run_if(in_state(GameState::InGame).and(not(is_paused))),
        );
}

fn spawn_enemies(mut commands: Commands, tunables: Res<Tunables>) {
    let behaviour = EnemyBehaviour {
        bullet_damage: tunables.enemy_bullet_damage,
        ..EnemyBehaviour::default().scaled(tunables.pixels_per_meter)
    };

    for (i, at) in ENEMY_SPAWNS.into_iter().enumerate() {
        commands.spawn((
            Name::new(format!("Enemy{i}")),
            Enemy,
            behaviour.clone(),
            Health::new(tunables.enemy_health),
            Sprite {
                color: Color::srgb(0.9, 0.25, 0.25),
                custom_size: Some(Vec2::splat(ENEMY_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_translation(at.extend(1.0)),
            RigidBody::Kinematic,
            Collider::circle(ENEMY_RADIUS),
            enemy_layers(),
            Occluder2d::circle(ENEMY_RADIUS),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn player_position(
    player_e: &PlayerEntity,
    q_player: &Query<&Transform, (With<Player>, Without<Enemy>)>,
) -> Option<Vec2> {
    let e = player_e.0?;
    q_player.get(e).ok().map(|tf| tf.translation.truncate())
}

pub fn enemy_pursuit(
    time: Res<Time>,
    player_e: Res<PlayerEntity>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<(&EnemyBehaviour, &mut Transform), With<Enemy>>,
) {
    let Some(target) = player_position(&player_e, &q_player) else {
        return;
    };
    let dt = time.delta_secs();

    for (behaviour, mut tf) in &mut q_enemies {
        let pos = tf.translation.truncate();
        let next = behaviour.step(pos, target, dt);
        tf.translation.x = next.x;
        tf.translation.y = next.y;

        // Facing uses the pre-move position.
        let look = target - pos;
        if look != Vec2::ZERO {
            tf.rotation = facing_rotation(look);
        }
    }
}

pub fn enemy_fire(
    time: Res<Time>,
    player_e: Res<PlayerEntity>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q_enemies: Query<(Entity, &mut EnemyBehaviour, &Transform), With<Enemy>>,
    mut fire: MessageWriter<FireRequest>,
) {
    let Some(target) = player_position(&player_e, &q_player) else {
        return;
    };
    let dt = time.delta_secs();

    for (e, mut behaviour, tf) in &mut q_enemies {
        let pos = tf.translation.truncate();
        if !behaviour.tick_fire(dt, pos.distance(target)) {
            continue;
        }

        let dir = facing_dir(tf.rotation);
        fire.write(FireRequest {
            kind: BulletKind::Enemy,
            pos: pos + dir * behaviour.muzzle_offset,
            dir,
            force: behaviour.bullet_force,
            damage: behaviour.bullet_damage,
            owner: Some(e),
        });
    }
}
