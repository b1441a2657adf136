use bevy::prelude::*;

/// Which side fired a projectile. Decides collision layers and colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BulletKind {
    Player,
    Enemy,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Bullet {
    pub damage: f32,
    /// Whoever fired it. Contacts with the shooter are ignored.
    pub owner: Option<Entity>,
}

/// Despawn the entity once the timer finishes.
///
/// Shared by bullets (max flight time) and hit effects.
#[derive(Component, Deref, DerefMut, Debug)]
pub struct Lifetime(pub Timer);

impl Lifetime {
    pub fn from_seconds(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }
}

/// Short-lived visual left where a bullet hit something.
#[derive(Component, Debug, Clone, Copy)]
pub struct HitEffect;
