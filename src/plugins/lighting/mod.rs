//! Lighting plugin (Firefly) (render-only).
//!
//! A warm light follows the player; every bullet impact glows briefly for as long as
//! its hit effect lives.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::{Player, PlayerEntity};
use crate::plugins::projectiles::HitEffect;

#[derive(Component)]
pub struct PlayerLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(
            Update,
            (follow_player_light, light_hit_effects).run_if(in_state(GameState::InGame)),
        );
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("PlayerLight"),
        PlayerLight,
        PointLight2d {
            color: Color::srgb(1.0, 0.9, 0.75),
            radius: 450.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_player_light(
    player_e: Res<PlayerEntity>,
    q_player: Query<&Transform, (With<Player>, Without<PlayerLight>)>,
    mut q_light: Query<&mut Transform, (With<PlayerLight>, Without<Player>)>,
) {
    let Some(Ok(tf_player)) = player_e.0.map(|e| q_player.get(e)) else {
        return;
    };
    let Ok(mut tf_light) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_player.translation.x;
    tf_light.translation.y = tf_player.translation.y;
}

fn light_hit_effects(mut commands: Commands, q_new: Query<Entity, Added<HitEffect>>) {
    for e in &q_new {
        commands.entity(e).try_insert(PointLight2d {
            color: Color::srgb(1.0, 0.7, 0.3),
            radius: 60.0,
            ..default()
        });
    }
}
