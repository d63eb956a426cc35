use crate::game::Game;
use crossterm::event::{poll, read};
use rand::Rng;
use ratatui::{backend::Backend, Terminal};
use std::io;
use std::time::{Duration, Instant};

/// The running program: a game plus the event loop that drives it
#[derive(Clone, Debug)]
pub(crate) struct App<R = rand::rngs::ThreadRng> {
    game: Game<R>,
    /// Longest time to wait for input before redrawing
    frame_period: Duration,
}

impl<R: Rng> App<R> {
    pub(crate) fn new(game: Game<R>, frame_period: Duration) -> App<R> {
        App { game, frame_period }
    }

    /// Draw the game, wait for input or the next tick, and repeat until the
    /// user quits
    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        let mut last = Instant::now();
        loop {
            terminal.draw(|frame| self.game.draw(frame))?;
            let wait = self
                .game
                .until_next_tick()
                .map_or(self.frame_period, |d| d.min(self.frame_period));
            if poll(wait)? {
                // Take everything that's queued up so that several key
                // presses in quick succession all land before the next tick
                loop {
                    if self.game.handle_event(read()?) {
                        log::info!("Quitting");
                        return Ok(());
                    }
                    if !poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
            let now = Instant::now();
            self.game.advance(now.saturating_duration_since(last));
            last = now;
        }
    }
}
