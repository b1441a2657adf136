//! Camera plugin (render-only).
//!
//! A system cannot hold `Query<&Transform>` and `Query<&mut Transform>` at the same time
//! unless Bevy can prove the two are disjoint. `Without<...>` filters encode that proof.
//!
//! ```text
//! Startup:    spawn MainCamera -> write MainCameraEntity resource
//! PostUpdate: follow_player snaps to the player (+ offset) before transform propagation
//! ```
//!
//! The camera lives for the whole process so menu and pause screens always have one.

use bevy::prelude::*;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::player::{Player, PlayerEntity};

#[derive(Component, Debug, Clone, Copy)]
pub struct MainCamera {
    /// Added to the player's position. No smoothing.
    pub offset: Vec2,
}

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct MainCameraEntity(pub Option<Entity>);

pub fn plugin(app: &mut App) {
    app.init_resource::<MainCameraEntity>()
        .add_systems(Startup, spawn_camera)
        .add_systems(OnEnter(GameState::MainMenu), recenter)
        .add_systems(
            PostUpdate,
            follow_player
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands, mut cam_e: ResMut<MainCameraEntity>) {
    let e = commands
        .spawn((
            Name::new("MainCamera"),
            Camera2d,
            MainCamera { offset: Vec2::ZERO },
            FireflyConfig::default(),
            Transform::from_xyz(0.0, 0.0, 999.0),
        ))
        .id();

    cam_e.0 = Some(e);
}

fn recenter(cam_e: Res<MainCameraEntity>, mut q_cam: Query<&mut Transform, With<MainCamera>>) {
    let Some(cam) = cam_e.0 else { return; };
    if let Ok(mut tf) = q_cam.get_mut(cam) {
        tf.translation.x = 0.0;
        tf.translation.y = 0.0;
    }
}

pub fn follow_player(
    player_e: Res<PlayerEntity>,
    cam_e: Res<MainCameraEntity>,
    // Disjointness proof: Player entities are not MainCamera entities.
    q_player: Query<&Transform, (With<Player>, Without<MainCamera>)>,
    // Disjointness proof: MainCamera entities are not Player entities.
    mut q_cam: Query<(&mut Transform, &MainCamera), Without<Player>>,
) {
    let (Some(player), Some(cam)) = (player_e.0, cam_e.0) else {
        return;
    };
    let Ok(tf_player) = q_player.get(player) else {
        debug!("Camera target {player} has no transform");
        return;
    };
    let Ok((mut tf_cam, main_cam)) = q_cam.get_mut(cam) else {
        return;
    };

    let target = tf_player.translation.truncate() + main_cam.offset;
    tf_cam.translation.x = target.x;
    tf_cam.translation.y = target.y;
}
