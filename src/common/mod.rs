//! Shared types: collision layers, 2D math helpers, state machines, tunables.

pub mod layers;
pub mod math;
pub mod state;
pub mod tunables;

#[cfg(test)]
pub mod test_utils;
