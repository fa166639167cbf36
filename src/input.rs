//! Per-frame keyboard snapshot consumed by the simulation.
//!
//! The core never talks to a terminal: the front-end folds raw key events
//! into one [`InputSnapshot`] per frame.  `InputSnapshot::default()` is the
//! "no input" snapshot and is always a valid no-op.

/// State of one key during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct KeyState {
    /// Key is held down this frame.
    pub down: bool,
    /// Key went down this frame.
    pub pressed: bool,
    /// Key went up this frame.
    pub released: bool,
}

impl KeyState {
    pub const HELD: KeyState = KeyState { down: true, pressed: false, released: false };
    pub const PRESSED: KeyState = KeyState { down: true, pressed: true, released: false };
    pub const RELEASED: KeyState = KeyState { down: false, pressed: false, released: true };

    /// Derive this frame's state from whether the key was held last frame
    /// and whether it is held now.
    pub fn from_transition(was_down: bool, is_down: bool) -> Self {
        KeyState {
            down: is_down,
            pressed: is_down && !was_down,
            released: was_down && !is_down,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub up: KeyState,
    pub down: KeyState,
    pub left: KeyState,
    pub right: KeyState,
}

impl InputSnapshot {
    /// Snapshot with UP held, the usual "drive forward" frame.
    pub fn forward() -> Self {
        InputSnapshot { up: KeyState::HELD, ..Default::default() }
    }
}
