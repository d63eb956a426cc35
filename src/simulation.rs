use crate::buffer::DirectionBuffer;
use crate::consts;
use crate::direction::Direction;
use crate::grid::{Cell, Grid};
use rand::{seq::IteratorRandom, Rng};
use std::collections::{HashSet, VecDeque};

/// The cell that the snake starts in
pub(crate) const ORIGIN: Cell = Cell::new(0, 0);

/// Authoritative state of a game of snake: the snake's body, the apple, the
/// pending turns, and whether the game is still going.
///
/// Nothing here knows about time; call [`SnakeSimulation::step()`] once per
/// tick.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SnakeSimulation<R = rand::rngs::ThreadRng> {
    rng: R,
    grid: Grid,

    /// The cells of the snake, tail first, head last.  Never empty.
    body: VecDeque<Cell>,

    /// `None` once the snake fills the grid
    apple: Option<Cell>,

    directions: DirectionBuffer,
    state: GameState,
}

impl SnakeSimulation<rand::rngs::ThreadRng> {
    pub(crate) fn new(grid: Grid) -> Self {
        SnakeSimulation::new_with_rng(grid, rand::rng())
    }
}

impl<R: Rng> SnakeSimulation<R> {
    pub(crate) fn new_with_rng(grid: Grid, rng: R) -> SnakeSimulation<R> {
        let mut sim = SnakeSimulation {
            rng,
            grid,
            body: VecDeque::from([ORIGIN]),
            apple: None,
            directions: DirectionBuffer::new(),
            state: GameState::Running,
        };
        sim.place_apple();
        sim
    }

    /// Advance the game by one tick: move the snake one cell along its next
    /// heading, growing it if it reaches the apple and ending the game if it
    /// runs into itself.  Does nothing unless the game is running or if the
    /// snake has not been given a direction yet.
    pub(crate) fn step(&mut self) {
        if self.state != GameState::Running {
            return;
        }
        let Some(direction) = self.directions.dequeue(self.body.len()) else {
            return;
        };
        let new_head = self.grid.wrap(self.head(), direction);
        debug_assert_eq!(
            self.grid.cell_at(new_head.x, new_head.y),
            Some(new_head),
            "wrapped head should be a cell of the grid"
        );
        if self.collides(new_head) {
            log::info!(
                "Snake ran into itself at ({}, {}); final score: {}",
                new_head.x,
                new_head.y,
                self.score()
            );
            self.state = GameState::GameOver;
            return;
        }
        self.body.push_back(new_head);
        if self.apple == Some(new_head) {
            log::debug!("Ate apple; snake is now {} cells long", self.body.len());
            self.place_apple();
        } else {
            let _ = self.body.pop_front();
        }
    }

    /// Put the game back the way it was at the start
    pub(crate) fn reset(&mut self) {
        log::info!("Starting new game");
        self.body = VecDeque::from([ORIGIN]);
        self.directions.clear();
        self.state = GameState::Running;
        self.place_apple();
    }

    fn place_apple(&mut self) {
        self.apple = self.free_cell();
        if self.apple.is_none() {
            log::info!("No free cells left; board cleared");
            self.state = GameState::Cleared;
        }
    }

    /// Pick a random cell not occupied by the snake.  Random cells are tried
    /// a limited number of times, after which a free cell is chosen from a
    /// scan of the whole grid.  Returns `None` if the snake fills the grid.
    fn free_cell(&mut self) -> Option<Cell> {
        if self.body.len() < self.grid.cell_count() {
            for _ in 0..consts::MAX_SPAWN_ATTEMPTS {
                let cell = self.grid.random_cell(&mut self.rng);
                if !self.body.contains(&cell) {
                    return Some(cell);
                }
            }
            log::debug!("Random apple placement failed; scanning grid for free cells");
        }
        let occupied = self.body.iter().copied().collect::<HashSet<_>>();
        self.grid
            .cells()
            .filter(|c| !occupied.contains(c))
            .choose(&mut self.rng)
    }
}

impl<R> SnakeSimulation<R> {
    /// Request that the snake turn in `direction` on an upcoming tick.
    /// Ignored unless the game is running.
    pub(crate) fn turn(&mut self, direction: Direction) {
        if self.state == GameState::Running {
            self.directions.enqueue(direction, self.body.len());
        }
    }

    /// Pause a running game or resume a paused one
    pub(crate) fn toggle_pause(&mut self) {
        self.state = match self.state {
            GameState::Running => GameState::Paused,
            GameState::Paused => GameState::Running,
            st => st,
        };
    }

    pub(crate) fn grid(&self) -> Grid {
        self.grid
    }

    /// The cells of the snake, tail first, head last
    pub(crate) fn body(&self) -> &VecDeque<Cell> {
        &self.body
    }

    pub(crate) fn head(&self) -> Cell {
        *self
            .body
            .back()
            .expect("snake body should never be empty")
    }

    pub(crate) fn apple(&self) -> Option<Cell> {
        self.apple
    }

    pub(crate) fn state(&self) -> GameState {
        self.state
    }

    pub(crate) fn heading(&self) -> Option<Direction> {
        self.directions.heading()
    }

    /// Number of apples eaten so far
    pub(crate) fn score(&self) -> usize {
        self.body.len() - 1
    }

    /// Replace the snake & apple with the given ones
    #[cfg(test)]
    pub(crate) fn arrange<I: IntoIterator<Item = Cell>>(&mut self, body: I, apple: Option<Cell>) {
        self.body = body.into_iter().collect();
        self.apple = apple;
    }

    /// Would moving the head to `new_head` run the snake into itself?  The
    /// current head never counts.  The tail only counts if the snake is about
    /// to grow, as otherwise it moves out of the way on the same tick.
    fn collides(&self, new_head: Cell) -> bool {
        let len = self.body.len();
        if len > 1 && new_head == self.head() {
            // Only possible on a grid one cell wide or tall
            return true;
        }
        let tail_moves = usize::from(self.apple != Some(new_head));
        self.body
            .iter()
            .take(len - 1)
            .skip(tail_moves)
            .any(|&c| c == new_head)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum GameState {
    Running,
    Paused,
    /// The snake ran into itself
    GameOver,
    /// The snake fills the grid and there is nowhere left to put an apple
    Cleared,
}

impl GameState {
    /// Has the game ended?
    pub(crate) fn is_over(self) -> bool {
        matches!(self, GameState::GameOver | GameState::Cleared)
    }
}
