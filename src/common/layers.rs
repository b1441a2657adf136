//! Collision layers and the membership/filter sets each kind of body uses.
//!
//! Keeping every `CollisionLayers` constructor here means "who collides with
//! whom" is decided in one table instead of at each spawn site.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerBullet,
    EnemyBullet,
}

#[inline]
pub fn wall_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::World,
        [Layer::Player, Layer::Enemy, Layer::PlayerBullet, Layer::EnemyBullet],
    )
}

#[inline]
pub fn player_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Player, [Layer::World, Layer::Enemy, Layer::EnemyBullet])
}

#[inline]
pub fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [Layer::World, Layer::Player, Layer::PlayerBullet])
}

/// Player shots hit walls and enemies, never the shooter.
#[inline]
pub fn player_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [Layer::World, Layer::Enemy])
}

#[inline]
pub fn enemy_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyBullet, [Layer::World, Layer::Player])
}
