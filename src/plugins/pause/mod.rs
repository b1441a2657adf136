//! Pause manager: freezes the level behind a pause menu with an options sub-screen.
//!
//! ```text
//!            Pause key                 OpenOptions
//!  Running ------------> Paused ----------------------> Options
//!     ^   <------------    |   <----------------------     |
//!     |  Pause key/Resume  |   Pause key/BackToPause       |
//!     +---------- MainMenu (any state) -> menu scene <-----+
//! ```
//!
//! Freezing is done with virtual time: relative speed 0 stops the fixed loop and zeroes
//! `Update` deltas. Discrete actions still arrive, so gameplay systems are also gated by
//! `is_paused`.
//!
//! Menu buttons are `PauseCommand` messages. Every accepted transition plays the
//! button click.

use bevy::prelude::*;
use bevy::window::{CursorGrabMode, CursorOptions, PrimaryWindow};

use crate::common::state::{GameState, PauseState};
use crate::plugins::audio::AudioManager;
use crate::plugins::game_manager::{GameManager, SaveGameRequest};
use crate::plugins::input::{InputAction, InputSystems};
use crate::plugins::scene::{LoadSceneRequest, SceneConfig};

const VOLUME_STEP: f32 = 0.1;

#[derive(Resource, Debug, Clone)]
pub struct PauseManager {
    /// Confine the cursor to the window while playing.
    pub lock_cursor_on_resume: bool,
}

impl Default for PauseManager {
    fn default() -> Self {
        Self {
            lock_cursor_on_resume: true,
        }
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseCommand {
    Resume,
    OpenOptions,
    BackToPause,
    MainMenu,
}

/// What a pause input or command does from a given state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PauseTransition {
    Pause,
    Resume,
    OpenOptions,
    BackToPause,
    MainMenu,
}

impl PauseTransition {
    /// The pause key toggles, and backs out of the options screen first.
    pub fn from_pause_key(state: PauseState) -> Self {
        match state {
            PauseState::Running => Self::Pause,
            PauseState::Paused => Self::Resume,
            PauseState::Options => Self::BackToPause,
        }
    }

    /// Buttons only work on the screen that shows them. Main menu works everywhere.
    pub fn from_command(state: PauseState, command: PauseCommand) -> Option<Self> {
        match (command, state) {
            (PauseCommand::Resume, PauseState::Paused | PauseState::Options) => Some(Self::Resume),
            (PauseCommand::OpenOptions, PauseState::Paused) => Some(Self::OpenOptions),
            (PauseCommand::BackToPause, PauseState::Options) => Some(Self::BackToPause),
            (PauseCommand::MainMenu, _) => Some(Self::MainMenu),
            _ => None,
        }
    }

    /// Pause state after the transition.
    pub fn target(self) -> PauseState {
        match self {
            Self::Pause | Self::BackToPause => PauseState::Paused,
            Self::OpenOptions => PauseState::Options,
            Self::Resume | Self::MainMenu => PauseState::Running,
        }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<PauseManager>()
        .add_message::<PauseCommand>()
        .add_message::<InputAction>()
        .add_message::<SaveGameRequest>()
        .add_message::<LoadSceneRequest>()
        .add_systems(OnEnter(GameState::InGame), reset_on_level_enter)
        .add_systems(OnEnter(GameState::MainMenu), reset_on_menu_enter)
        .add_systems(
            Update,
            (
                drive_pause.after(InputSystems),
                options_volume_keys.run_if(in_state(PauseState::Options)),
            )
                .chain()
                .run_if(in_state(GameState::InGame)),
        );
}

fn set_cursor_locked(q_cursor: &mut Query<&mut CursorOptions, With<PrimaryWindow>>, locked: bool) {
    let Ok(mut cursor) = q_cursor.single_mut() else {
        return;
    };
    cursor.grab_mode = if locked {
        CursorGrabMode::Confined
    } else {
        CursorGrabMode::None
    };
    cursor.visible = true;
}

#[allow(clippy::too_many_arguments)]
pub fn drive_pause(
    mut actions: MessageReader<InputAction>,
    mut buttons: MessageReader<PauseCommand>,
    state: Res<State<PauseState>>,
    mut next: ResMut<NextState<PauseState>>,
    mut time: ResMut<Time<Virtual>>,
    manager: Res<PauseManager>,
    config: Res<SceneConfig>,
    audio: Option<Res<AudioManager>>,
    mut saves: MessageWriter<SaveGameRequest>,
    mut scenes: MessageWriter<LoadSceneRequest>,
    mut q_cursor: Query<&mut CursorOptions, With<PrimaryWindow>>,
    mut commands: Commands,
) {
    let key_presses = actions.read().filter(|a| **a == InputAction::Pause).count();
    let pressed: Vec<PauseCommand> = buttons.read().copied().collect();
    if key_presses == 0 && pressed.is_empty() {
        return;
    }

    // Several inputs in one frame apply in order on top of each other.
    let initial = *state.get();
    let mut current = initial;
    let transitions = (0..key_presses)
        .map(|_| None)
        .chain(pressed.into_iter().map(Some));

    for button in transitions {
        let transition = match button {
            None => PauseTransition::from_pause_key(current),
            Some(cmd) => match PauseTransition::from_command(current, cmd) {
                Some(t) => t,
                None => {
                    debug!("Ignoring {cmd:?} while {current:?}");
                    continue;
                }
            },
        };

        match transition {
            PauseTransition::Pause => {
                time.set_relative_speed(0.0);
                set_cursor_locked(&mut q_cursor, false);
            }
            PauseTransition::Resume => {
                if let Some(audio) = audio.as_ref() {
                    audio.save_volume_settings(&mut saves);
                }
                time.set_relative_speed(1.0);
                if manager.lock_cursor_on_resume {
                    set_cursor_locked(&mut q_cursor, true);
                }
            }
            PauseTransition::OpenOptions | PauseTransition::BackToPause => {}
            PauseTransition::MainMenu => {
                time.set_relative_speed(1.0);
                scenes.write(LoadSceneRequest(config.menu_scene.clone()));
            }
        }

        if let Some(audio) = audio.as_ref() {
            audio.play_button_click(&mut commands);
        }
        debug!("Pause: {current:?} -> {:?}", transition.target());
        current = transition.target();
    }

    if current != initial {
        next.set(current);
    }
}

/// Options screen: Left/Right change music volume, Down/Up change effects volume.
fn options_volume_keys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    audio: Option<ResMut<AudioManager>>,
    mut game: Option<ResMut<GameManager>>,
) {
    let (Some(keys), Some(mut audio)) = (keys, audio) else {
        return;
    };

    let step = |neg: KeyCode, pos: KeyCode| {
        let mut d = 0.0;
        if keys.just_pressed(neg) {
            d -= VOLUME_STEP;
        }
        if keys.just_pressed(pos) {
            d += VOLUME_STEP;
        }
        d
    };

    let music = step(KeyCode::ArrowLeft, KeyCode::ArrowRight);
    let sfx = step(KeyCode::ArrowDown, KeyCode::ArrowUp);

    if music != 0.0 {
        let v = audio.music_volume() + music;
        audio.set_music_volume(v, game.as_deref_mut());
    }
    if sfx != 0.0 {
        let v = audio.sfx_volume() + sfx;
        audio.set_sfx_volume(v, game.as_deref_mut());
    }
}

pub fn reset_on_level_enter(
    manager: Res<PauseManager>,
    mut next: ResMut<NextState<PauseState>>,
    mut time: ResMut<Time<Virtual>>,
    mut q_cursor: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    next.set(PauseState::Running);
    time.set_relative_speed(1.0);
    set_cursor_locked(&mut q_cursor, manager.lock_cursor_on_resume);
}

pub fn reset_on_menu_enter(
    mut next: ResMut<NextState<PauseState>>,
    mut time: ResMut<Time<Virtual>>,
    mut q_cursor: Query<&mut CursorOptions, With<PrimaryWindow>>,
) {
    next.set(PauseState::Running);
    time.set_relative_speed(1.0);
    set_cursor_locked(&mut q_cursor, false);
}
