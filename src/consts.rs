//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Default time between movements of the snake
pub(crate) const TICK_PERIOD: Duration = Duration::from_millis(93);

/// Default minimum time between redraws of the screen
pub(crate) const FRAME_PERIOD: Duration = Duration::from_millis(16);

/// If the program falls behind (e.g., because it was suspended), run at most
/// this many ticks in a row before discarding the rest of the backlog.
pub(crate) const MAX_TICKS_PER_FRAME: u32 = 3;

/// Default side length of a cell of the grid
pub(crate) const CELL_SIZE: u32 = 50;

/// Maximum number of turns that can be queued up ahead of the snake
pub(crate) const MAX_QUEUED_TURNS: usize = 3;

/// Number of random cells to try when placing an apple before falling back
/// to a scan of the whole grid
pub(crate) const MAX_SPAWN_ATTEMPTS: usize = 64;

/// Number of terminal rows & columns used by the display around the grid:
/// the score bar, the border, and the two message lines beneath.
pub(crate) const CHROME_SIZE: Size = Size {
    width: 2,
    height: 5,
};

/// Glyph for the snake's head when it is moving up
pub(crate) const SNAKE_HEAD_UP_SYMBOL: char = 'v';

/// Glyph for the snake's head when it is moving down
pub(crate) const SNAKE_HEAD_DOWN_SYMBOL: char = '^';

/// Glyph for the snake's head when it is moving right
pub(crate) const SNAKE_HEAD_RIGHT_SYMBOL: char = '<';

/// Glyph for the snake's head when it is moving left
pub(crate) const SNAKE_HEAD_LEFT_SYMBOL: char = '>';

/// Glyph for the snake's head before it starts moving
pub(crate) const SNAKE_HEAD_IDLE_SYMBOL: char = '@';

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: char = '⚬';

/// Glyph for the apple
pub(crate) const APPLE_SYMBOL: char = '●';

/// Glyph for the snake's head when it's collided with itself
pub(crate) const COLLISION_SYMBOL: char = '×';

/// Style for the snake's head
pub(crate) const SNAKE_HEAD_STYLE: Style = Style::new()
    .fg(Color::LightGreen)
    .add_modifier(Modifier::BOLD);

/// Style for the snake's body
pub(crate) const SNAKE_BODY_STYLE: Style = Style::new().fg(Color::Green);

/// Style for the apple
pub(crate) const APPLE_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the score bar at the top of the game screen
pub(crate) const SCORE_BAR_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the "Game Over!" banner
pub(crate) const GAME_OVER_STYLE: Style = Style::new().fg(Color::LightRed).add_modifier(Modifier::BOLD);

/// Style for the "Play Again" button when the mouse is elsewhere
pub(crate) const BUTTON_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for the "Play Again" button when the mouse is over it
pub(crate) const BUTTON_HOVER_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::UNDERLINED);

/// Style for the "Play Again" button while it's being clicked
pub(crate) const BUTTON_HELD_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);
