//! Projectiles plugin: message-based producer → consumer spawning, contact damage.
//!
//! ```text
//!   Update (variable dt)
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ producers: player::shoot_on_attack, enemies::enemy_fire      │
//!   │     └─ write FireRequest                                     │
//!   │ consumer:  spawn_bullets (in FireSystems::Spawn)             │
//!   │     └─ spawns Bullet + dynamic body + CollisionEventsEnabled │
//!   └──────────────────────────────────────────────────────────────┘
//!                 │
//!                 v
//!   FixedPostUpdate (fixed dt)
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │ Avian writes CollisionStart                                  │
//!   │ process_bullet_hits: Health::take_damage → Died, HitEffect   │
//!   │ health::handle_deaths (after)                                │
//!   └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Producers never spawn entities themselves, so firing logic stays testable with a bare
//! `World` and a `Messages<FireRequest>` buffer.

pub mod collision;
pub mod components;
pub mod messages;
pub mod spawn;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::health::DeathSystems;

pub use components::{Bullet, BulletKind, HitEffect, Lifetime};
pub use messages::FireRequest;

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FireSystems {
    /// Systems that write `FireRequest`.
    Request,
    /// The single consumer.
    Spawn,
}

pub struct ProjectilesPlugin;

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<FireRequest>();

        app.configure_sets(Update, FireSystems::Request.before(FireSystems::Spawn));

        app.add_systems(
            Update,
            spawn::spawn_bullets
                .in_set(FireSystems::Spawn)
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(FixedUpdate, spawn::expire_lifetimes);

        app.add_systems(
            FixedPostUpdate,
            collision::process_bullet_hits
                .after(CollisionEventSystems)
                .before(DeathSystems)
                .run_if(in_state(GameState::InGame)),
        );
    }
}
