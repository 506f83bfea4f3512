//! Scripted input timelines.
//!
//! A script is a JSON array of key transitions:
//!
//! ```json
//! [
//!   { "tick": 0, "key": "ArrowUp" },
//!   { "tick": 30, "key": "ArrowUp", "pressed": false },
//!   { "tick": 45, "key": " " }
//! ]
//! ```
//!
//! Keys use the browser key names understood by [`Intent::from_key`].
//! `pressed` defaults to `true`. Transitions apply before the frame with
//! the given index.

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tankfield_core::Intent;

#[derive(Debug, Deserialize)]
struct Entry {
    tick: u64,
    key: String,
    #[serde(default = "pressed_by_default")]
    pressed: bool,
}

const fn pressed_by_default() -> bool {
    true
}

/// One key transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub intent: Intent,
    pub pressed: bool,
}

/// Key transitions grouped by frame index.
#[derive(Debug, Default)]
pub struct Script {
    frames: BTreeMap<u64, Vec<Transition>>,
}

impl Script {
    /// Parses a script from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(json).context("malformed input script")?;
        let mut frames: BTreeMap<u64, Vec<Transition>> = BTreeMap::new();
        for entry in entries {
            let Some(intent) = Intent::from_key(&entry.key) else {
                bail!("unknown key {:?} at tick {}", entry.key, entry.tick);
            };
            frames.entry(entry.tick).or_default().push(Transition {
                intent,
                pressed: entry.pressed,
            });
        }
        Ok(Self { frames })
    }

    /// Transitions to apply before frame `tick`.
    pub fn at(&self, tick: u64) -> &[Transition] {
        self.frames.get(&tick).map_or(&[], Vec::as_slice)
    }

    /// Total number of transitions.
    pub fn len(&self) -> usize {
        self.frames.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
