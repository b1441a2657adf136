//! Fire request consumer + lifetime expiry.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::{enemy_bullet_layers, player_bullet_layers};
use crate::common::state::GameState;
use crate::common::tunables::Tunables;

use super::components::{Bullet, BulletKind, Lifetime};
use super::messages::FireRequest;

const BULLET_RADIUS: f32 = 4.0;

pub fn spawn_bullets(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut requests: MessageReader<FireRequest>,
) {
    for req in requests.read() {
        let (layers, color) = match req.kind {
            BulletKind::Player => (player_bullet_layers(), Color::srgb(1.0, 0.85, 0.3)),
            BulletKind::Enemy => (enemy_bullet_layers(), Color::srgb(0.5, 1.0, 0.4)),
        };

        commands.spawn((
            Name::new("Bullet"),
            Bullet {
                damage: req.damage,
                owner: req.owner,
            },
            Lifetime::from_seconds(tunables.bullet_max_lifetime),
            Sprite {
                color,
                custom_size: Some(Vec2::splat(BULLET_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_translation(req.pos.extend(2.0)),
            RigidBody::Dynamic,
            Collider::circle(BULLET_RADIUS),
            layers,
            LinearVelocity(req.dir * req.force),
            // Avian only emits CollisionStart if one side opts in.
            CollisionEventsEnabled,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

pub fn expire_lifetimes(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Lifetime)>,
) {
    for (e, mut lt) in &mut q {
        lt.tick(time.delta());
        if lt.is_finished() {
            commands.entity(e).try_despawn();
        }
    }
}
