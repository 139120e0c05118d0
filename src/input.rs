//! Input router: keyboard and touch normalized to one command vocabulary
//!
//! Both input sources produce the same [`Command`] values, so the cores
//! never know where a command came from. The router accumulates commands
//! into an [`InputState`] that the active core reads once, at step start.

use serde::{Deserialize, Serialize};

/// Cardinal direction for grid movement and move-axis input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The exact reverse of this direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit cell offset for one grid step
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Rotation sense for ship turning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Turn {
    Left,
    Right,
}

/// The full command vocabulary shared by every game core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Directional intent (grid games buffer this until the next step)
    Direction(Direction),
    /// Thrust held / released
    Thrust(bool),
    /// Fire held / released
    Fire(bool),
    /// Rotate held / released
    Rotate(Turn, bool),
    /// Axis movement held / released (clamp-variant player)
    MoveAxis(Direction, bool),
    /// One-shot reload request
    Reload,
    /// One-shot start / restart request
    Start,
}

/// Accumulated command state, read by the active core at step start
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    /// Most recent directional intent (committed at the next grid step)
    pub direction: Option<Direction>,
    pub thrust: bool,
    pub fire: bool,
    pub rotate_left: bool,
    pub rotate_right: bool,
    /// Held axis keys for clamp-variant movement
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// One-shot flags, cleared by [`InputState::clear_one_shot`]
    pub reload: bool,
    pub start: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one command into the state
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Direction(dir) => self.direction = Some(dir),
            Command::Thrust(held) => self.thrust = held,
            Command::Fire(held) => self.fire = held,
            Command::Rotate(Turn::Left, held) => self.rotate_left = held,
            Command::Rotate(Turn::Right, held) => self.rotate_right = held,
            Command::MoveAxis(dir, held) => match dir {
                Direction::Up => self.move_up = held,
                Direction::Down => self.move_down = held,
                Direction::Left => self.move_left = held,
                Direction::Right => self.move_right = held,
            },
            Command::Reload => self.reload = true,
            Command::Start => self.start = true,
        }
    }

    /// Clear one-shot flags after a step has consumed them
    pub fn clear_one_shot(&mut self) {
        self.reload = false;
        self.start = false;
    }

    /// Horizontal axis as -1/0/1
    pub fn axis_x(&self) -> f32 {
        (self.move_right as i32 - self.move_left as i32) as f32
    }

    /// Vertical axis as -1/0/1 (screen coordinates, +y down)
    pub fn axis_y(&self) -> f32 {
        (self.move_down as i32 - self.move_up as i32) as f32
    }
}

/// Translate a key event into a command for grid games. Directional
/// intent fires on key-down only; key-up carries no meaning on a grid.
pub fn grid_key_command(key: &str, pressed: bool) -> Option<Command> {
    if !pressed {
        return None;
    }
    match key {
        "ArrowUp" | "w" | "W" => Some(Command::Direction(Direction::Up)),
        "ArrowDown" | "s" | "S" => Some(Command::Direction(Direction::Down)),
        "ArrowLeft" | "a" | "A" => Some(Command::Direction(Direction::Left)),
        "ArrowRight" | "d" | "D" => Some(Command::Direction(Direction::Right)),
        "Enter" => Some(Command::Start),
        _ => None,
    }
}

/// Translate a key event into a command for continuous games.
/// `pressed` distinguishes key-down from key-up for held controls.
pub fn arena_key_command(key: &str, pressed: bool) -> Option<Command> {
    match key {
        "ArrowUp" => Some(Command::Thrust(pressed)),
        "ArrowLeft" => Some(Command::Rotate(Turn::Left, pressed)),
        "ArrowRight" => Some(Command::Rotate(Turn::Right, pressed)),
        "w" | "W" => Some(Command::MoveAxis(Direction::Up, pressed)),
        "s" | "S" => Some(Command::MoveAxis(Direction::Down, pressed)),
        "a" | "A" => Some(Command::MoveAxis(Direction::Left, pressed)),
        "d" | "D" => Some(Command::MoveAxis(Direction::Right, pressed)),
        " " => Some(Command::Fire(pressed)),
        "r" | "R" => pressed.then_some(Command::Reload),
        "Enter" => pressed.then_some(Command::Start),
        _ => None,
    }
}

/// Translate a touch swipe into a directional command. The dominant
/// axis wins; degenerate swipes (no movement) produce nothing.
pub fn swipe_command(dx: f32, dy: f32) -> Option<Command> {
    if dx == 0.0 && dy == 0.0 {
        return None;
    }
    let dir = if dx.abs() >= dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(Command::Direction(dir))
}

/// Translate a tap into a command by screen zone: left/right thirds
/// rotate, the middle fires. Width is the touch surface width.
pub fn tap_command(x: f32, width: f32) -> Command {
    if x < width / 3.0 {
        Command::Rotate(Turn::Left, true)
    } else if x > width * 2.0 / 3.0 {
        Command::Rotate(Turn::Right, true)
    } else {
        Command::Fire(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyboard_and_swipe_normalize_to_same_command() {
        let from_key = grid_key_command("ArrowUp", true);
        let from_swipe = swipe_command(2.0, -10.0);
        assert_eq!(from_key, Some(Command::Direction(Direction::Up)));
        assert_eq!(from_key, from_swipe);
    }

    #[test]
    fn swipe_picks_dominant_axis() {
        assert_eq!(
            swipe_command(30.0, 10.0),
            Some(Command::Direction(Direction::Right))
        );
        assert_eq!(
            swipe_command(-5.0, 40.0),
            Some(Command::Direction(Direction::Down))
        );
        assert_eq!(swipe_command(0.0, 0.0), None);
    }

    #[test]
    fn held_keys_toggle_state() {
        let mut state = InputState::new();
        state.apply(arena_key_command(" ", true).unwrap());
        assert!(state.fire);
        state.apply(arena_key_command(" ", false).unwrap());
        assert!(!state.fire);

        state.apply(arena_key_command("a", true).unwrap());
        state.apply(arena_key_command("d", true).unwrap());
        assert_eq!(state.axis_x(), 0.0);
        state.apply(arena_key_command("a", false).unwrap());
        assert_eq!(state.axis_x(), 1.0);
    }

    #[test]
    fn one_shot_flags_clear() {
        let mut state = InputState::new();
        state.apply(Command::Reload);
        state.apply(Command::Start);
        assert!(state.reload && state.start);
        state.clear_one_shot();
        assert!(!state.reload && !state.start);
    }

    #[test]
    fn direction_buffer_keeps_latest() {
        let mut state = InputState::new();
        state.apply(Command::Direction(Direction::Up));
        state.apply(Command::Direction(Direction::Left));
        assert_eq!(state.direction, Some(Direction::Left));
    }
}
