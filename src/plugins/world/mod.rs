//! World plugin: the level arena (walls and floor) and where enemies stand at level start.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::layers::wall_layers;
use crate::common::state::GameState;

const TILE: i32 = 64;
const HALF_W: i32 = TILE * 12;
const HALF_H: i32 = TILE * 7;
const WALL_THICKNESS: f32 = 30.0;

pub const ENEMY_SPAWNS: [Vec2; 3] = [
    Vec2::new(-320.0, 240.0),
    Vec2::new(0.0, 320.0),
    Vec2::new(320.0, 240.0),
];

/// One wall: name, centre, size.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSpec {
    pub name: &'static str,
    pub center: Vec2,
    pub size: Vec2,
}

/// The four walls enclosing the arena. Horizontal walls cover the corners.
pub fn arena_walls() -> [WallSpec; 4] {
    let (hw, hh, t) = (HALF_W as f32, HALF_H as f32, WALL_THICKNESS);
    let horizontal = Vec2::new(hw * 2.0 + t * 2.0, t);
    let vertical = Vec2::new(t, hh * 2.0);
    [
        WallSpec { name: "WallTop", center: Vec2::new(0.0, hh + t * 0.5), size: horizontal },
        WallSpec { name: "WallBottom", center: Vec2::new(0.0, -hh - t * 0.5), size: horizontal },
        WallSpec { name: "WallLeft", center: Vec2::new(-hw - t * 0.5, 0.0), size: vertical },
        WallSpec { name: "WallRight", center: Vec2::new(hw + t * 0.5, 0.0), size: vertical },
    ]
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), (spawn_arena, spawn_floor));
}

fn spawn_arena(mut commands: Commands) {
    let wall_color = Color::srgb(0.25, 0.27, 0.33);

    for wall in arena_walls() {
        commands.spawn((
            Name::new(wall.name),
            Sprite {
                color: wall_color,
                custom_size: Some(wall.size),
                ..default()
            },
            Transform::from_translation(wall.center.extend(0.0)),
            RigidBody::Static,
            Collider::rectangle(wall.size.x, wall.size.y),
            wall_layers(),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Checkerboard floor from plain sprites.
fn spawn_floor(mut commands: Commands) {
    (-(HALF_H / TILE)..=HALF_H / TILE)
        .flat_map(|y| (-(HALF_W / TILE)..=HALF_W / TILE).map(move |x| (x, y)))
        .for_each(|(x, y)| {
            let world_pos = Vec3::new(x as f32 * TILE as f32, y as f32 * TILE as f32, -1.0);
            let color = if (x + y) % 2 == 0 {
                Color::srgb(0.76, 0.62, 0.42)
            } else {
                Color::srgb(0.72, 0.58, 0.39)
            };

            commands.spawn((
                Sprite::from_color(color, Vec2::splat(TILE as f32)),
                Transform::from_translation(world_pos),
                DespawnOnExit(GameState::InGame),
            ));
        });
}
