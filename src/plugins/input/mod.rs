//! Input plugin: device bindings → gameplay intent.
//!
//! Pipeline (Update, `InputSystems` set):
//! - continuous reads land in the `PlayerInput` resource (move axis, aim point)
//! - discrete presses become `InputAction` messages
//!
//! Gameplay systems only ever read these two, never `ButtonInput` directly,
//! so tests drive the game by writing `InputAction` / `PlayerInput` themselves.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::plugins::camera::MainCamera;

/// A discrete "performed" input event.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Attack,
    Dash,
    Pause,
}

#[derive(Resource, Default, Debug, Clone, Copy)]
pub struct PlayerInput {
    /// Normalized, or zero.
    pub move_axis: Vec2,
    /// Cursor projected into world space; `None` when the cursor is outside the window.
    pub aim_world: Option<Vec2>,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputSystems;

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_message::<InputAction>()
        .add_systems(
            Update,
            (gather_movement, gather_aim, emit_actions).in_set(InputSystems),
        );
}

/// WASD → unit move axis.
pub fn axis_from_keys(keys: &ButtonInput<KeyCode>) -> Vec2 {
    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    axis.normalize_or_zero()
}

fn gather_movement(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    input.move_axis = keys.map_or(Vec2::ZERO, |k| axis_from_keys(&k));
}

fn gather_aim(
    windows: Query<&Window, With<PrimaryWindow>>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    mut input: ResMut<PlayerInput>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_tf)) = q_camera.single() else {
        return;
    };

    input.aim_world = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_tf, cursor).ok());
}

fn emit_actions(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    mut actions: MessageWriter<InputAction>,
) {
    if let Some(buttons) = buttons {
        if buttons.just_pressed(MouseButton::Left) {
            actions.write(InputAction::Attack);
        }
    }

    let Some(keys) = keys else { return; };

    if keys.any_just_pressed([KeyCode::Space, KeyCode::ShiftLeft]) {
        actions.write(InputAction::Dash);
    }
    if keys.just_pressed(KeyCode::Escape) {
        actions.write(InputAction::Pause);
    }
}
