use crate::clock::TickClock;
use crate::command::Command;
use crate::consts;
use crate::direction::Direction;
use crate::grid::{Cell, Grid};
use crate::simulation::{GameState, SnakeSimulation};
use crate::util::center_rect;
use crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use rand::Rng;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Position, Rect, Size},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Clear, Widget},
    Frame,
};
use std::time::Duration;

/// Label drawn on the button for starting a new game
const PLAY_AGAIN: &str = "[ Play Again ]";

/// Size of the pop-up shown when the game ends
const POPUP_SIZE: Size = Size {
    width: 20,
    height: 5,
};

/// The game screen: a simulation, the clock that drives it, and the state of
/// the "Play Again" button
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Game<R = rand::rngs::ThreadRng> {
    sim: SnakeSimulation<R>,
    clock: TickClock,
    button: ButtonState,
    /// The area of the terminal the game was last drawn in
    screen: Rect,
}

impl<R: Rng> Game<R> {
    pub(crate) fn new(sim: SnakeSimulation<R>, tick_period: Duration) -> Game<R> {
        let clock = TickClock::new(tick_period);
        log::debug!("Snake moves every {:?}", clock.period());
        Game {
            sim,
            clock,
            button: ButtonState::Base,
            screen: Rect::ZERO,
        }
    }

    /// Account for `elapsed` time passing, moving the snake once for each
    /// tick that has come due
    pub(crate) fn advance(&mut self, elapsed: Duration) {
        if self.sim.state() != GameState::Running {
            return;
        }
        for _ in 0..self.clock.advance(elapsed) {
            self.sim.step();
            if self.sim.state() != GameState::Running {
                break;
            }
        }
    }

    /// Handle an input event.  Returns `true` if the user asked to quit.
    pub(crate) fn handle_event(&mut self, event: Event) -> bool {
        match event {
            Event::FocusLost => {
                if self.sim.state() == GameState::Running {
                    log::debug!("Lost focus; pausing");
                    self.sim.toggle_pause();
                }
            }
            Event::Key(_) => {
                let Some(ev) = event.as_key_press_event() else {
                    return false;
                };
                return self.handle_command(Command::from_key_event(ev));
            }
            Event::Mouse(ev) => self.handle_mouse(ev),
            _ => (),
        }
        false
    }

    fn handle_command(&mut self, cmd: Command) -> bool {
        if cmd == Command::Quit {
            return true;
        }
        if self.sim.state().is_over() {
            self.restart();
            return false;
        }
        match cmd {
            Command::Turn(d) => self.sim.turn(d),
            Command::Pause => {
                self.sim.toggle_pause();
                log::debug!("Game state is now {:?}", self.sim.state());
            }
            Command::Quit | Command::Other => (),
        }
        false
    }

    fn handle_mouse(&mut self, ev: MouseEvent) {
        if !self.sim.state().is_over() {
            return;
        }
        let button = GameLayout::new(self.screen, self.sim.grid()).button;
        let inside = button.contains(Position::new(ev.column, ev.row));
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => self.button = ButtonState::Held,
            MouseEventKind::Up(MouseButton::Left) if inside => self.restart(),
            MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved if inside => {
                if self.button != ButtonState::Held {
                    self.button = ButtonState::Hover;
                }
            }
            MouseEventKind::Down(_)
            | MouseEventKind::Up(_)
            | MouseEventKind::Drag(_)
            | MouseEventKind::Moved => self.button = ButtonState::Base,
            _ => (),
        }
    }

    fn restart(&mut self) {
        self.sim.reset();
        self.clock.reset();
        self.button = ButtonState::Base;
    }
}

impl<R> Game<R> {
    pub(crate) fn draw(&mut self, frame: &mut Frame<'_>) {
        self.screen = frame.area();
        frame.render_widget(&*self, frame.area());
    }

    /// Time until the snake next moves, if it's moving
    pub(crate) fn until_next_tick(&self) -> Option<Duration> {
        (self.sim.state() == GameState::Running && self.sim.heading().is_some())
            .then(|| self.clock.until_next_tick())
    }

    fn head_symbol(&self) -> char {
        match self.sim.heading() {
            None => consts::SNAKE_HEAD_IDLE_SYMBOL,
            Some(Direction::Up) => consts::SNAKE_HEAD_UP_SYMBOL,
            Some(Direction::Down) => consts::SNAKE_HEAD_DOWN_SYMBOL,
            Some(Direction::Left) => consts::SNAKE_HEAD_LEFT_SYMBOL,
            Some(Direction::Right) => consts::SNAKE_HEAD_RIGHT_SYMBOL,
        }
    }
}

impl<R> Widget for &Game<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = GameLayout::new(area, self.sim.grid());
        Line::styled(
            format!(" Score: {}", self.sim.score()),
            consts::SCORE_BAR_STYLE,
        )
        .render(layout.score, buf);

        DottedBorder.render(layout.field, buf);
        let grid = self.sim.grid();
        let mut level = Canvas {
            area: layout.field.inner(Margin::new(1, 1)),
            buf,
        };
        for pos in self.sim.body().iter().filter_map(|&c| field_position(grid, c)) {
            level.draw_cell(pos, consts::SNAKE_BODY_SYMBOL, consts::SNAKE_BODY_STYLE);
        }
        if let Some(pos) = self.sim.apple().and_then(|c| field_position(grid, c)) {
            level.draw_cell(pos, consts::APPLE_SYMBOL, consts::APPLE_STYLE);
        }
        // Draw the head last so that it's on top of any other body segment
        // it's colliding with
        if let Some(pos) = field_position(grid, self.sim.head()) {
            if self.sim.state() == GameState::GameOver {
                level.draw_cell(pos, consts::COLLISION_SYMBOL, consts::COLLISION_STYLE);
            } else {
                level.draw_cell(pos, self.head_symbol(), consts::SNAKE_HEAD_STYLE);
            }
        }

        let quit = [Span::raw("Quit ("), Span::styled("q", consts::KEY_STYLE), Span::raw(")")];
        match self.sim.state() {
            GameState::Running => {
                if self.sim.heading().is_none() {
                    Line::from_iter([
                        Span::raw(" Move with the arrow keys, "),
                        Span::styled("wasd", consts::KEY_STYLE),
                        Span::raw(", or "),
                        Span::styled("ijkl", consts::KEY_STYLE),
                    ])
                    .render(layout.message, buf);
                }
                Line::from_iter(
                    [
                        Span::raw(" Pause ("),
                        Span::styled("p", consts::KEY_STYLE),
                        Span::raw(") — "),
                    ]
                    .into_iter()
                    .chain(quit),
                )
                .render(layout.help, buf);
            }
            GameState::Paused => {
                Span::from(" — PAUSED —").render(layout.message, buf);
                Line::from_iter(
                    [
                        Span::raw(" Resume ("),
                        Span::styled("p", consts::KEY_STYLE),
                        Span::raw(") — "),
                    ]
                    .into_iter()
                    .chain(quit),
                )
                .render(layout.help, buf);
            }
            GameState::GameOver | GameState::Cleared => {
                let title = if self.sim.state() == GameState::Cleared {
                    " YOU WIN! "
                } else {
                    " GAME OVER! "
                };
                GameOverPopup {
                    title,
                    score: self.sim.score(),
                    button: self.button,
                }
                .render(layout.popup, buf);
                Line::from_iter(
                    [Span::raw(" Press any key to play again — ")]
                        .into_iter()
                        .chain(quit),
                )
                .render(layout.help, buf);
            }
        }
    }
}

/// Where each part of the game screen goes within the terminal
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct GameLayout {
    score: Rect,
    /// The playfield, including its border
    field: Rect,
    message: Rect,
    help: Rect,
    popup: Rect,
    button: Rect,
}

impl GameLayout {
    fn new(area: Rect, grid: Grid) -> GameLayout {
        let columns = u16::try_from(grid.columns()).unwrap_or(u16::MAX);
        let rows = u16::try_from(grid.rows()).unwrap_or(u16::MAX);
        let display = center_rect(
            area,
            Size {
                width: columns.saturating_add(consts::CHROME_SIZE.width),
                height: rows.saturating_add(consts::CHROME_SIZE.height),
            },
        );
        let [score, field, message, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(rows.saturating_add(2)),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(display);
        let popup = center_rect(display, POPUP_SIZE);
        let [_, _, button_row] = Layout::vertical([Constraint::Length(1); 3])
            .areas(popup.inner(Margin::new(1, 1)));
        let button = center_rect(
            button_row,
            Size {
                width: u16::try_from(PLAY_AGAIN.len()).unwrap_or(u16::MAX),
                height: 1,
            },
        );
        GameLayout {
            score,
            field,
            message,
            help,
            popup,
            button,
        }
    }
}

/// Appearance of the "Play Again" button
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ButtonState {
    Base,
    /// The mouse is over the button
    Hover,
    /// The mouse button was pressed on the button and hasn't been released
    Held,
}

impl ButtonState {
    fn style(self) -> Style {
        match self {
            ButtonState::Base => consts::BUTTON_STYLE,
            ButtonState::Hover => consts::BUTTON_HOVER_STYLE,
            ButtonState::Held => consts::BUTTON_HELD_STYLE,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct GameOverPopup {
    title: &'static str,
    score: usize,
    button: ButtonState,
}

impl Widget for GameOverPopup {
    /*
     * ┌─── GAME OVER! ───┐
     * │    Score: 12     │
     * │                  │
     * │  [ Play Again ]  │
     * └──────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::bordered()
            .title(Span::styled(self.title, consts::GAME_OVER_STYLE))
            .title_alignment(Alignment::Center)
            .style(Style::reset());
        let inner = block.inner(area);
        block.render(area, buf);
        let [score_row, _, button_row] = Layout::vertical([Constraint::Length(1); 3]).areas(inner);
        Line::from(format!("Score: {}", self.score))
            .alignment(Alignment::Center)
            .render(score_row, buf);
        Line::styled(PLAY_AGAIN, self.button.style())
            .alignment(Alignment::Center)
            .render(button_row, buf);
    }
}

#[derive(Debug, Eq, PartialEq)]
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn cell_mut(&mut self, pos: Position) -> Option<&mut ratatui::buffer::Cell> {
        if pos.x >= self.area.width || pos.y >= self.area.height {
            return None;
        }
        let x = self.area.x.checked_add(pos.x)?;
        let y = self.area.y.checked_add(pos.y)?;
        self.buf.cell_mut((x, y))
    }

    fn draw_char(&mut self, pos: Position, symbol: char) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
        }
    }

    fn draw_cell(&mut self, pos: Position, symbol: char, style: Style) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.set_char(symbol);
            cell.set_style(Style::reset().patch(style));
        }
    }
}

/// Return the position within the playfield at which to draw `cell`
fn field_position(grid: Grid, cell: Cell) -> Option<Position> {
    let (col, row) = grid.column_row(cell);
    Some(Position::new(u16::try_from(col).ok()?, u16::try_from(row).ok()?))
}

/// Border drawn around the playfield to show that the snake can pass
/// through the edges
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct DottedBorder;

impl Widget for DottedBorder {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }
        let size = area.as_size();
        let max_x = size.width.saturating_sub(1);
        let max_y = size.height.saturating_sub(1);
        let mut canvas = Canvas { area, buf };
        canvas.draw_char(Position::ORIGIN, '·');
        canvas.draw_char(Position::new(max_x, 0), '·');
        canvas.draw_char(Position::new(max_x, max_y), '·');
        canvas.draw_char(Position::new(0, max_y), '·');
        for x in 1..max_x {
            canvas.draw_char(Position::new(x, 0), '⋯');
            canvas.draw_char(Position::new(x, max_y), '⋯');
        }
        for y in 1..max_y {
            canvas.draw_char(Position::new(0, y), '⋮');
            canvas.draw_char(Position::new(max_x, y), '⋮');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    const TICK: Duration = Duration::from_millis(100);

    fn new_game(columns: u32, rows: u32) -> Game<ChaCha12Rng> {
        let grid = Grid::with_cells(columns, rows, 50).expect("test grid should be valid");
        let sim = SnakeSimulation::new_with_rng(grid, ChaCha12Rng::seed_from_u64(RNG_SEED));
        Game::new(sim, TICK)
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::from(code))
    }

    fn mouse(kind: MouseEventKind, pos: Position) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column: pos.x,
            row: pos.y,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn render(game: &Game<ChaCha12Rng>, area: Rect) -> Buffer {
        let mut buffer = Buffer::empty(area);
        game.render(area, &mut buffer);
        buffer
    }

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol())
            .collect()
    }

    /// Put the game in a state where the next tick upwards ends it
    fn doomed_game(columns: u32, rows: u32) -> Game<ChaCha12Rng> {
        let mut game = new_game(columns, rows);
        game.sim.arrange(
            [
                Cell::new(0, 0),
                Cell::new(50, 0),
                Cell::new(100, 0),
                Cell::new(100, 50),
                Cell::new(50, 50),
            ],
            Some(Cell::new(300, 200)),
        );
        assert!(!game.handle_event(key(KeyCode::Char('w'))), "should not quit");
        game.advance(TICK);
        assert_eq!(game.sim.state(), GameState::GameOver);
        game
    }

    #[test]
    fn draw_new_game() {
        let mut game = new_game(10, 5);
        game.sim.arrange([Cell::new(0, 0)], Some(Cell::new(150, 100)));
        let buffer = render(&game, Rect::new(0, 0, 12, 10));
        assert_eq!(row_text(&buffer, 0), " Score: 0   ");
        assert_eq!(row_text(&buffer, 1), "·⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯·");
        assert_eq!(row_text(&buffer, 2), "⋮@         ⋮");
        assert_eq!(row_text(&buffer, 4), "⋮   ●      ⋮");
        assert_eq!(row_text(&buffer, 7), "·⋯⋯⋯⋯⋯⋯⋯⋯⋯⋯·");
        assert!(row_text(&buffer, 8).starts_with(" Move with"), "{buffer:?}");
        assert!(row_text(&buffer, 9).starts_with(" Pause (p)"), "{buffer:?}");
        assert_eq!(buffer[(1, 2)].style().fg, consts::SNAKE_HEAD_STYLE.fg);
        assert_eq!(buffer[(4, 4)].style().fg, consts::APPLE_STYLE.fg);
    }

    #[test]
    fn draw_moving_snake() {
        let mut game = new_game(10, 5);
        game.sim.arrange(
            [Cell::new(0, 0), Cell::new(50, 0)],
            Some(Cell::new(150, 100)),
        );
        assert!(!game.handle_event(key(KeyCode::Right)), "should not quit");
        game.advance(TICK);
        let buffer = render(&game, Rect::new(0, 0, 12, 10));
        assert_eq!(row_text(&buffer, 2), "⋮ ⚬<       ⋮");
        assert_eq!(row_text(&buffer, 8), " ".repeat(12));
    }

    #[test]
    fn draw_wrapped_snake() {
        let mut game = new_game(10, 5);
        game.sim.arrange(
            [Cell::new(400, 0), Cell::new(450, 0)],
            Some(Cell::new(150, 100)),
        );
        assert!(!game.handle_event(key(KeyCode::Char('l'))), "should not quit");
        game.advance(TICK);
        let buffer = render(&game, Rect::new(0, 0, 12, 10));
        assert_eq!(row_text(&buffer, 2), "⋮<        ⚬⋮");
    }

    #[test]
    fn advance_waits_for_tick() {
        let mut game = new_game(10, 5);
        game.sim.arrange([Cell::new(0, 0)], Some(Cell::new(150, 100)));
        assert_eq!(game.until_next_tick(), None);
        assert!(!game.handle_event(key(KeyCode::Down)), "should not quit");
        assert_eq!(game.until_next_tick(), Some(TICK));
        game.advance(Duration::from_millis(60));
        assert_eq!(game.sim.head(), Cell::new(0, 0));
        game.advance(Duration::from_millis(60));
        assert_eq!(game.sim.head(), Cell::new(0, 50));
        assert_eq!(game.until_next_tick(), Some(Duration::from_millis(80)));
    }

    #[test]
    fn pause_and_resume() {
        let mut game = new_game(10, 5);
        game.sim.arrange([Cell::new(0, 0)], Some(Cell::new(150, 100)));
        assert!(!game.handle_event(key(KeyCode::Char('d'))), "should not quit");
        game.advance(TICK);
        assert!(!game.handle_event(key(KeyCode::Char('p'))), "should not quit");
        assert_eq!(game.sim.state(), GameState::Paused);
        game.advance(TICK * 3);
        assert_eq!(game.sim.head(), Cell::new(50, 0));
        let buffer = render(&game, Rect::new(0, 0, 12, 10));
        assert_eq!(row_text(&buffer, 8), " — PAUSED — ");
        assert!(!game.handle_event(key(KeyCode::Esc)), "should not quit");
        assert_eq!(game.sim.state(), GameState::Running);
        game.advance(TICK);
        assert_eq!(game.sim.head(), Cell::new(100, 0));
    }

    #[test]
    fn focus_lost_pauses() {
        let mut game = new_game(10, 5);
        assert!(!game.handle_event(Event::FocusLost), "should not quit");
        assert_eq!(game.sim.state(), GameState::Paused);
        assert!(!game.handle_event(Event::FocusLost), "should not quit");
        assert_eq!(game.sim.state(), GameState::Paused);
    }

    #[test]
    fn quit() {
        let mut game = new_game(10, 5);
        assert!(game.handle_event(key(KeyCode::Char('q'))), "should quit");
        let mut game = doomed_game(10, 5);
        assert!(
            game.handle_event(Event::Key(KeyEvent::new(
                KeyCode::Char('c'),
                KeyModifiers::CONTROL
            ))),
            "should quit"
        );
    }

    #[test]
    fn any_key_restarts() {
        let mut game = doomed_game(20, 10);
        let buffer = render(&game, Rect::new(0, 0, 22, 15));
        assert_eq!(buffer[(2, 3)].symbol(), "×");
        assert!(!game.handle_event(key(KeyCode::Char('x'))), "should not quit");
        assert_eq!(game.sim.state(), GameState::Running);
        assert_eq!(game.sim.body().len(), 1);
        assert_eq!(game.sim.heading(), None);
    }

    #[test]
    fn draw_game_over() {
        let game = doomed_game(20, 10);
        let area = Rect::new(0, 0, 22, 15);
        let layout = GameLayout::new(area, game.sim.grid());
        let buffer = render(&game, area);
        assert!(
            row_text(&buffer, layout.popup.y).contains("GAME OVER!"),
            "{buffer:?}"
        );
        assert!(
            row_text(&buffer, layout.button.y).contains(PLAY_AGAIN),
            "{buffer:?}"
        );
        assert_eq!(
            buffer[(layout.button.x, layout.button.y)].symbol(),
            "["
        );
        assert!(
            row_text(&buffer, layout.popup.y + 1).contains("Score: 4"),
            "{buffer:?}"
        );
    }

    #[test]
    fn click_play_again() {
        let mut game = doomed_game(20, 10);
        game.screen = Rect::new(0, 0, 22, 15);
        let button = GameLayout::new(game.screen, game.sim.grid()).button;
        let inside = Position::new(button.x + 3, button.y);
        assert!(
            !game.handle_event(mouse(MouseEventKind::Moved, inside)),
            "should not quit"
        );
        assert_eq!(game.button, ButtonState::Hover);
        assert!(
            !game.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), inside)),
            "should not quit"
        );
        assert_eq!(game.button, ButtonState::Held);
        assert_eq!(game.sim.state(), GameState::GameOver);
        assert!(
            !game.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), inside)),
            "should not quit"
        );
        assert_eq!(game.sim.state(), GameState::Running);
        assert_eq!(game.button, ButtonState::Base);
        assert_eq!(game.sim.body().len(), 1);
    }

    #[test]
    fn click_elsewhere() {
        let mut game = doomed_game(20, 10);
        game.screen = Rect::new(0, 0, 22, 15);
        let outside = Position::new(0, 0);
        assert!(
            !game.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), outside)),
            "should not quit"
        );
        assert_eq!(game.sim.state(), GameState::GameOver);
        assert_eq!(game.button, ButtonState::Base);
    }

    #[test]
    fn mouse_ignored_while_running() {
        let mut game = new_game(20, 10);
        game.screen = Rect::new(0, 0, 22, 15);
        let button = GameLayout::new(game.screen, game.sim.grid()).button;
        let pos = Position::new(button.x, button.y);
        assert!(
            !game.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), pos)),
            "should not quit"
        );
        assert_eq!(game.sim.state(), GameState::Running);
        assert_eq!(game.button, ButtonState::Base);
    }
}
