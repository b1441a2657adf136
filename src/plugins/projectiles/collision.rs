//! Bullet hit resolution.
//!
//! Contract per bullet: the first contact applies damage once (if the other side has
//! `Health`), leaves a `HitEffect`, and removes the bullet. Touching the shooter does not
//! count as a contact. Several `CollisionStart`
//! messages for the same bullet in one step are collapsed by the `seen` set; the bullet
//! is gone by the next step because commands apply at the end of the schedule.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::health::{Died, Health};

use super::components::{Bullet, HitEffect, Lifetime};

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    /// Health lives on the rigid body, which may differ from the collider entity.
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget {
            collider: ev.collider1,
            body: ev.body1,
        },
        CollisionTarget {
            collider: ev.collider2,
            body: ev.body2,
        },
    )
}

pub fn process_bullet_hits(
    mut commands: Commands,
    tunables: Res<Tunables>,
    mut started: MessageReader<CollisionStart>,
    q_bullets: Query<(&Bullet, &Transform)>,
    mut q_health: Query<&mut Health>,
    mut died: MessageWriter<Died>,
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        let (bullet_side, other_side) = if q_bullets.contains(t1.collider) {
            (t1, t2)
        } else if q_bullets.contains(t2.collider) {
            (t2, t1)
        } else {
            continue;
        };

        let Ok((bullet, bullet_tf)) = q_bullets.get(bullet_side.collider) else {
            continue;
        };

        let victim = other_side.gameplay_owner();
        if bullet.owner == Some(victim) {
            continue;
        }

        if !seen.insert(bullet_side.collider) {
            continue;
        }

        if let Ok(mut hp) = q_health.get_mut(victim) {
            if let Some(death) = hp.take_damage(bullet.damage) {
                died.write(Died {
                    entity: victim,
                    primary: death.primary,
                });
            }
        }

        commands.spawn((
            Name::new("HitEffect"),
            HitEffect,
            Lifetime::from_seconds(tunables.hit_effect_lifetime),
            Sprite {
                color: Color::srgba(1.0, 0.95, 0.7, 0.8),
                custom_size: Some(Vec2::splat(10.0)),
                ..default()
            },
            Transform::from_translation(bullet_tf.translation.truncate().extend(3.0)),
            DespawnOnExit(GameState::InGame),
        ));

        commands.entity(bullet_side.collider).despawn();
    }
}
