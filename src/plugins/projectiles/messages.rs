//! Buffered fire requests.
//!
//! Producers (player attack, enemy fire gate) only write intent.
//! `spawn::spawn_bullets` is the single consumer that creates bullet entities.

use bevy::prelude::*;

use super::components::BulletKind;

#[derive(Message, Clone, Copy, Debug)]
pub struct FireRequest {
    pub kind: BulletKind,
    /// Muzzle position in world space.
    pub pos: Vec2,
    /// Unit launch direction.
    pub dir: Vec2,
    /// Launch impulse. Bullets have unit mass, so this is also the launch speed.
    pub force: f32,
    pub damage: f32,
    pub owner: Option<Entity>,
}
