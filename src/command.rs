use crate::direction::Direction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Command {
    Quit,
    Turn(Direction),
    Pause,
    /// Any other key press
    Other,
}

impl Command {
    pub(crate) fn from_key_event(ev: KeyEvent) -> Command {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        match (ev.modifiers, ev.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Command::Quit,
            (m, _) if !normal_modifiers.contains(m) => Command::Other,
            (_, KeyCode::Char('w' | 'W' | 'i' | 'I') | KeyCode::Up) => {
                Command::Turn(Direction::Up)
            }
            (_, KeyCode::Char('s' | 'S' | 'k' | 'K') | KeyCode::Down) => {
                Command::Turn(Direction::Down)
            }
            (_, KeyCode::Char('a' | 'A' | 'j' | 'J') | KeyCode::Left) => {
                Command::Turn(Direction::Left)
            }
            (_, KeyCode::Char('d' | 'D' | 'l' | 'L') | KeyCode::Right) => {
                Command::Turn(Direction::Right)
            }
            (_, KeyCode::Char('p' | 'P') | KeyCode::Esc) => Command::Pause,
            (_, KeyCode::Char('q' | 'Q')) => Command::Quit,
            _ => Command::Other,
        }
    }
}
