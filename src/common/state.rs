//! Global state machines.
//!
//! `GameState` is the coarse scene switch (menu vs. a loaded level).
//! `PauseState` is orthogonal to it and only meaningful while `InGame`;
//! the pause plugin resets it to `Running` every time a level is entered.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    MainMenu,
    InGame,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum PauseState {
    #[default]
    Running,
    Paused,
    /// Options sub-screen, only reachable from `Paused`.
    Options,
}

/// Run condition: simulation is frozen.
///
/// Missing state resource (tests that never installed `PauseState`) counts as running.
pub fn is_paused(state: Option<Res<State<PauseState>>>) -> bool {
    state.is_some_and(|s| *s.get() != PauseState::Running)
}
