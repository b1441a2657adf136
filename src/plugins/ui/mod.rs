//! Screen text (render-only): title screen, pause and options overlays, health readout.
//!
//! Everything here only reads gameplay state. Menu "buttons" are the key bindings
//! listed on screen.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::{GameState, PauseState};
use crate::plugins::audio::AudioManager;
use crate::plugins::health::Health;
use crate::plugins::player::Player;

#[derive(Component)]
struct OptionsText;

#[derive(Component)]
struct HealthText;

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::MainMenu), spawn_title_screen)
        .add_systems(OnEnter(GameState::InGame), spawn_health_readout)
        .add_systems(OnEnter(PauseState::Paused), spawn_pause_overlay)
        .add_systems(OnEnter(PauseState::Options), spawn_options_overlay)
        .add_systems(
            Update,
            (
                update_health_readout,
                update_options_text.run_if(in_state(PauseState::Options)),
            )
                .run_if(in_state(GameState::InGame)),
        );
}

fn centered() -> Node {
    Node {
        width: Val::Percent(100.0),
        height: Val::Percent(100.0),
        flex_direction: FlexDirection::Column,
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        row_gap: Val::Px(16.0),
        ..default()
    }
}

fn line(text: impl Into<String>, size: f32) -> impl Bundle {
    (
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
        TextLayout::new_with_justify(Justify::Center),
    )
}

fn spawn_title_screen(mut commands: Commands) {
    commands
        .spawn((Name::new("TitleScreen"), centered(), DespawnOnExit(GameState::MainMenu)))
        .with_children(|parent| {
            parent.spawn(line("ALIENS VS COWBOYS", 72.0));
            parent.spawn(line("[Enter] Continue   [N] New Game   [Q] Quit", 26.0));
        });
}

fn spawn_pause_overlay(mut commands: Commands) {
    commands
        .spawn((
            Name::new("PauseOverlay"),
            centered(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
            DespawnOnExit(PauseState::Paused),
        ))
        .with_children(|parent| {
            parent.spawn(line("PAUSED", 64.0));
            parent.spawn(line("[Esc] Resume", 26.0));
        });
}

fn options_label(audio: &AudioManager) -> String {
    format!(
        "Music {:>3.0}%   [Left/Right]\nEffects {:>3.0}%   [Down/Up]\n\n[Esc] Back",
        audio.music_volume() * 100.0,
        audio.sfx_volume() * 100.0
    )
}

fn spawn_options_overlay(mut commands: Commands, audio: Option<Res<AudioManager>>) {
    let label = audio.as_deref().map_or_else(String::new, options_label);
    commands
        .spawn((
            Name::new("OptionsOverlay"),
            centered(),
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
            DespawnOnExit(PauseState::Options),
        ))
        .with_children(|parent| {
            parent.spawn(line("OPTIONS", 56.0));
            parent.spawn((OptionsText, line(label, 26.0)));
        });
}

fn update_options_text(audio: Option<Res<AudioManager>>, mut q_text: Query<&mut Text, With<OptionsText>>) {
    let Some(audio) = audio.filter(|a| a.is_changed()) else {
        return;
    };
    for mut text in &mut q_text {
        text.0 = options_label(&audio);
    }
}

fn spawn_health_readout(mut commands: Commands) {
    commands.spawn((
        Name::new("HealthReadout"),
        HealthText,
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(16.0),
            top: Val::Px(12.0),
            ..default()
        },
        Text::new(""),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::WHITE),
        DespawnOnExit(GameState::InGame),
    ));
}

fn update_health_readout(
    q_player: Query<&Health, (With<Player>, Changed<Health>)>,
    mut q_text: Query<&mut Text, With<HealthText>>,
) {
    let Ok(hp) = q_player.single() else {
        return;
    };
    for mut text in &mut q_text {
        text.0 = format!("HP {:.0} / {:.0}", hp.hp.max(0.0), hp.max);
    }
}
