// Keyboard movement state machine.
//
// Tracks which direction keys are held, in press order, and derives the one
// active movement direction. Diagonal chords resolve to whichever key was
// pressed first. Each input event yields a `Transition` that the shell in
// lib.rs maps onto the wire and the resend timer; the machine itself touches
// neither, which keeps it runnable in plain host tests.

use protocol::Direction;

/// Resend period for the active move intent, in milliseconds.
pub const MOVE_RESEND_INTERVAL_MS: i32 = 100;

/// Effect of one input event on continuous movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed. Keep the current timer and intent.
    None,
    /// (Re)start continuous movement: cancel any resend timer, send one move
    /// intent for the direction, arm a fresh timer.
    Start(Direction),
    /// Stop: cancel the resend timer and send a single stop intent.
    Stop,
}

#[derive(Debug, Default)]
pub struct MovementController {
    /// Held direction keys, oldest press first.
    pressed: Vec<Direction>,
    active: Option<Direction>,
}

impl MovementController {
    pub fn new() -> Self {
        Self::default()
    }

    /// The direction currently driving move intents, if any.
    pub fn active(&self) -> Option<Direction> {
        self.active
    }

    /// Key-down for `key`. OS auto-repeat (the key is already in the held
    /// set) and unrecognized keys leave the state untouched.
    pub fn key_down(&mut self, key: &str) -> Transition {
        let Some(direction) = direction_for_key(key) else {
            return Transition::None;
        };
        if self.pressed.contains(&direction) {
            return Transition::None;
        }
        self.pressed.push(direction);
        self.recompute()
    }

    /// Key-up for `key`. Releasing a key that was never tracked is a no-op.
    pub fn key_up(&mut self, key: &str) -> Transition {
        let Some(direction) = direction_for_key(key) else {
            return Transition::None;
        };
        let before = self.pressed.len();
        self.pressed.retain(|&held| held != direction);
        if self.pressed.len() == before {
            return Transition::None;
        }
        self.recompute()
    }

    /// The window lost input focus: every key is considered released.
    pub fn focus_lost(&mut self) -> Transition {
        self.pressed.clear();
        self.recompute()
    }

    fn recompute(&mut self) -> Transition {
        match self.pressed.first().copied() {
            None => {
                if self.active.take().is_some() {
                    Transition::Stop
                } else {
                    Transition::None
                }
            }
            Some(direction) if self.active == Some(direction) => Transition::None,
            Some(direction) => {
                self.active = Some(direction);
                Transition::Start(direction)
            }
        }
    }
}

fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// True when `key` is one of the movement bindings (used by the shell to
/// suppress default browser scrolling).
pub fn is_direction_key(key: &str) -> bool {
    direction_for_key(key).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pressed_key_wins_ties() {
        let mut movement = MovementController::new();
        assert_eq!(movement.key_down("ArrowRight"), Transition::Start(Direction::Right));
        // Up joins the chord but Right was first; no restart.
        assert_eq!(movement.key_down("ArrowUp"), Transition::None);
        assert_eq!(movement.active(), Some(Direction::Right));
        // Releasing Right hands control to Up and restarts the timer.
        assert_eq!(movement.key_up("ArrowRight"), Transition::Start(Direction::Up));
        assert_eq!(movement.active(), Some(Direction::Up));
    }

    #[test]
    fn repeated_key_down_is_idempotent() {
        let mut movement = MovementController::new();
        assert_eq!(movement.key_down("ArrowLeft"), Transition::Start(Direction::Left));
        // OS key-repeat floods key-down for the held key.
        for _ in 0..5 {
            assert_eq!(movement.key_down("ArrowLeft"), Transition::None);
        }
        assert_eq!(movement.active(), Some(Direction::Left));
    }

    #[test]
    fn releasing_all_keys_stops_exactly_once() {
        let mut movement = MovementController::new();
        movement.key_down("ArrowDown");
        assert_eq!(movement.key_up("ArrowDown"), Transition::Stop);
        assert_eq!(movement.active(), None);
        // Already stopped; a stray key-up changes nothing.
        assert_eq!(movement.key_up("ArrowDown"), Transition::None);
    }

    #[test]
    fn focus_lost_clears_everything() {
        let mut movement = MovementController::new();
        movement.key_down("ArrowUp");
        movement.key_down("ArrowLeft");
        assert_eq!(movement.focus_lost(), Transition::Stop);
        assert_eq!(movement.active(), None);
        // Idle focus loss is a no-op.
        assert_eq!(movement.focus_lost(), Transition::None);
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let mut movement = MovementController::new();
        assert_eq!(movement.key_down("w"), Transition::None);
        assert_eq!(movement.key_down("Escape"), Transition::None);
        assert_eq!(movement.key_up(" "), Transition::None);
        assert_eq!(movement.active(), None);
    }

    #[test]
    fn active_direction_tracks_earliest_held_key() {
        // Property over an arbitrary event sequence: active == direction of
        // the earliest-pressed key still held.
        let mut movement = MovementController::new();
        let events = [
            ("down", "ArrowUp"),
            ("down", "ArrowRight"),
            ("down", "ArrowDown"),
            ("up", "ArrowUp"),
            ("up", "ArrowRight"),
            ("down", "ArrowLeft"),
            ("up", "ArrowDown"),
        ];
        let mut held: Vec<Direction> = Vec::new();
        for (kind, key) in events {
            let direction = direction_for_key(key).unwrap();
            match kind {
                "down" => {
                    movement.key_down(key);
                    if !held.contains(&direction) {
                        held.push(direction);
                    }
                }
                _ => {
                    movement.key_up(key);
                    held.retain(|&d| d != direction);
                }
            }
            assert_eq!(movement.active(), held.first().copied());
        }
    }
}
