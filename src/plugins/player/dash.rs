//! Dash: an explicit two-stage timer advanced each fixed tick.
//!
//! ```text
//! Ready --try_begin--> Dashing { remaining } --elapsed--> Cooldown { remaining } --elapsed--> Ready
//! ```
//!
//! Movement integration is locked out while `Dashing`; only re-triggering is locked out
//! during `Cooldown`. A started dash always runs to completion.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DashPhase {
    Ready,
    Dashing { remaining: f32 },
    Cooldown { remaining: f32 },
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Dash {
    pub duration: f32,
    pub cooldown: f32,
    phase: DashPhase,
}

impl Dash {
    pub fn new(duration: f32, cooldown: f32) -> Self {
        Self {
            duration,
            cooldown,
            phase: DashPhase::Ready,
        }
    }

    #[inline]
    pub fn phase(&self) -> DashPhase {
        self.phase
    }

    #[inline]
    pub fn is_dashing(&self) -> bool {
        matches!(self.phase, DashPhase::Dashing { .. })
    }

    #[inline]
    pub fn can_dash(&self) -> bool {
        matches!(self.phase, DashPhase::Ready)
    }

    /// Enter `Dashing` if ready. Returns whether a dash started.
    pub fn try_begin(&mut self) -> bool {
        if !self.can_dash() {
            return false;
        }
        self.phase = DashPhase::Dashing {
            remaining: self.duration,
        };
        true
    }

    /// Advance by `dt`. Overshoot carries into the next stage so long ticks don't
    /// stretch the total lockout.
    pub fn tick(&mut self, dt: f32) {
        let mut dt = dt;
        loop {
            match self.phase {
                DashPhase::Ready => return,
                DashPhase::Dashing { remaining } => {
                    if remaining > dt {
                        self.phase = DashPhase::Dashing { remaining: remaining - dt };
                        return;
                    }
                    dt -= remaining;
                    self.phase = DashPhase::Cooldown {
                        remaining: self.cooldown,
                    };
                }
                DashPhase::Cooldown { remaining } => {
                    if remaining > dt {
                        self.phase = DashPhase::Cooldown { remaining: remaining - dt };
                    } else {
                        self.phase = DashPhase::Ready;
                    }
                    return;
                }
            }
        }
    }
}

/// Dash direction: the move input if there is any, else where the player is facing.
#[inline]
pub fn dash_direction(move_axis: Vec2, facing: Vec2) -> Vec2 {
    move_axis.try_normalize().unwrap_or(facing)
}
