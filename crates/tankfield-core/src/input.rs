//! Discrete player intents.
//!
//! The input collaborator turns raw key events into [`Intent`]s. Movement
//! and turning intents are *held*: they stay active from press to release.
//! `Fire` is a *trigger*: each press queues exactly one shot, and repeated
//! presses while the key is still held (keyboard auto-repeat) are ignored
//! until the key is released.
//!
//! ```
//! use tankfield_core::input::{InputState, Intent, Intents};
//!
//! let mut input = InputState::default();
//! input.press(Intent::MoveForward);
//! input.press(Intent::Fire);
//! input.press(Intent::Fire); // auto-repeat, ignored
//!
//! assert!(input.held().contains(Intents::MOVE_FORWARD));
//! assert_eq!(input.queued_shots(), 1);
//! ```

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Set of currently held intents.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Intents: u8 {
        /// Rotate counter-clockwise.
        const TURN_LEFT = 1 << 0;
        /// Rotate clockwise.
        const TURN_RIGHT = 1 << 1;
        /// Drive along the heading.
        const MOVE_FORWARD = 1 << 2;
        /// Drive against the heading.
        const MOVE_BACK = 1 << 3;
        /// Fire key is down.
        const FIRE = 1 << 4;
    }
}

/// A named input signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    /// Rotate counter-clockwise while held.
    TurnLeft,
    /// Rotate clockwise while held.
    TurnRight,
    /// Drive forward while held.
    MoveForward,
    /// Drive backward while held.
    MoveBack,
    /// Fire once per press.
    Fire,
}

impl Intent {
    /// Maps a browser-style key name to an intent.
    ///
    /// Arrow keys steer and drive, the space bar fires. Anything else is
    /// not an intent.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Self::MoveForward),
            "ArrowDown" => Some(Self::MoveBack),
            "ArrowLeft" => Some(Self::TurnLeft),
            "ArrowRight" => Some(Self::TurnRight),
            " " | "Space" => Some(Self::Fire),
            _ => None,
        }
    }

    /// Returns the flag tracking this intent.
    #[must_use]
    pub const fn flag(self) -> Intents {
        match self {
            Self::TurnLeft => Intents::TURN_LEFT,
            Self::TurnRight => Intents::TURN_RIGHT,
            Self::MoveForward => Intents::MOVE_FORWARD,
            Self::MoveBack => Intents::MOVE_BACK,
            Self::Fire => Intents::FIRE,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TurnLeft => write!(f, "turn-left"),
            Self::TurnRight => write!(f, "turn-right"),
            Self::MoveForward => write!(f, "move-forward"),
            Self::MoveBack => write!(f, "move-back"),
            Self::Fire => write!(f, "fire"),
        }
    }
}

/// Held intents plus the queue of pending fire triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InputState {
    held: Intents,
    queued_shots: u32,
}

impl InputState {
    /// Records a press. Returns `true` if the press changed anything.
    pub fn press(&mut self, intent: Intent) -> bool {
        let flag = intent.flag();
        if self.held.contains(flag) {
            return false;
        }
        self.held.insert(flag);
        if intent == Intent::Fire {
            self.queued_shots += 1;
        }
        true
    }

    /// Records a release. Returns `true` if the intent was held.
    pub fn release(&mut self, intent: Intent) -> bool {
        let flag = intent.flag();
        let was_held = self.held.contains(flag);
        self.held.remove(flag);
        was_held
    }

    /// Currently held intents.
    #[must_use]
    pub const fn held(&self) -> Intents {
        self.held
    }

    /// Number of shots waiting to be fired.
    #[must_use]
    pub const fn queued_shots(&self) -> u32 {
        self.queued_shots
    }

    /// Removes one queued shot. Returns `false` if none was queued.
    pub fn consume_shot(&mut self) -> bool {
        if self.queued_shots == 0 {
            return false;
        }
        self.queued_shots -= 1;
        true
    }

    /// Releases everything and drops queued shots.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
