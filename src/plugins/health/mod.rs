//! Health plugin: hit points, the one-shot death transition, and what death means.
//!
//! - `Health::take_damage` is the only place hp goes down. It reports `Death` exactly once,
//!   on the transition into depletion; callers turn that into a `Died` message.
//! - `handle_deaths` decides the consequence: the primary entity (the player) sends the
//!   game back to the menu scene, anything else is marked `PendingDespawn`.
//! - Despawning happens in `PostUpdate`, never inside the fixed step, so systems that
//!   still hold queued work for the entity in this tick don't trip over it.

use bevy::prelude::*;

use crate::plugins::scene::{LoadSceneRequest, SceneConfig};

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Health {
    pub hp: f32,
    pub max: f32,
    /// The entity whose death ends the run (the player).
    pub primary: bool,
    depleted: bool,
}

/// Result of a damage application that crossed into depletion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Death {
    pub primary: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            hp: max,
            max,
            primary: false,
            depleted: false,
        }
    }

    pub fn primary(current: f32, max: f32) -> Self {
        Self {
            hp: current,
            max,
            primary: true,
            depleted: false,
        }
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.depleted
    }

    /// Subtract `amount`. Returns `Some(Death)` only on the hit that depletes.
    pub fn take_damage(&mut self, amount: f32) -> Option<Death> {
        self.hp -= amount;

        if self.hp <= 0.0 && !self.depleted {
            self.depleted = true;
            return Some(Death {
                primary: self.primary,
            });
        }
        None
    }

    /// Full heal; re-arms the death transition.
    pub fn restore_full(&mut self) {
        self.hp = self.max;
        self.depleted = false;
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Died {
    pub entity: Entity,
    pub primary: bool,
}

/// Marker: remove this entity in `PostUpdate`.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeathSystems;

pub fn plugin(app: &mut App) {
    app.add_message::<Died>()
        .add_systems(FixedPostUpdate, handle_deaths.in_set(DeathSystems))
        .add_systems(PostUpdate, despawn_pending);
}

pub fn handle_deaths(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut died: MessageReader<Died>,
    mut scenes: MessageWriter<LoadSceneRequest>,
) {
    for d in died.read() {
        if d.primary {
            info!("Player died, returning to '{}'", config.menu_scene);
            scenes.write(LoadSceneRequest(config.menu_scene.clone()));
        } else {
            commands.entity(d.entity).try_insert(PendingDespawn);
        }
    }
}

fn despawn_pending(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).try_despawn();
    }
}
