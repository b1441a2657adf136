//! Feature plugins.

use bevy::prelude::*;

use crate::plugins::{
    audio::AudioManagerPlugin, game_manager::GameManagerPlugin, projectiles::ProjectilesPlugin,
};

pub mod audio;
pub mod core;
pub mod enemies;
pub mod game_manager;
pub mod health;
pub mod input;
pub mod pause;
pub mod physics;
pub mod player;
pub mod projectiles;
pub mod scene;
pub mod world;

// Render-only
pub mod camera;
pub mod lighting;
pub mod ui;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    scene::plugin(app);
    input::plugin(app);
    health::plugin(app);
    app.add_plugins((GameManagerPlugin::default(), AudioManagerPlugin));
    pause::plugin(app);
    world::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    app.add_plugins(ProjectilesPlugin);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    ui::plugin(app);
}
