use crate::consts;
use std::time::Duration;

/// Fixed-timestep accumulator deciding when the simulation should tick,
/// independently of how often the screen is redrawn or input arrives.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct TickClock {
    period: Duration,
    /// Time elapsed since the last tick
    accumulated: Duration,
}

impl TickClock {
    /// Create a clock that ticks every `period`.  A zero period is treated as
    /// one millisecond.
    pub(crate) fn new(period: Duration) -> TickClock {
        TickClock {
            period: period.max(Duration::from_millis(1)),
            accumulated: Duration::ZERO,
        }
    }

    pub(crate) fn period(&self) -> Duration {
        self.period
    }

    /// Record that `elapsed` time has passed and return the number of ticks
    /// that are now due.  At most [`consts::MAX_TICKS_PER_FRAME`] ticks are
    /// returned at once; any further backlog is dropped.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accumulated = self.accumulated.saturating_add(elapsed);
        let mut ticks = 0;
        while self.accumulated >= self.period {
            self.accumulated -= self.period;
            ticks += 1;
            if ticks == consts::MAX_TICKS_PER_FRAME {
                if self.accumulated >= self.period {
                    log::debug!("Fell behind by {:?}; skipping ticks", self.accumulated);
                    self.accumulated = Duration::ZERO;
                }
                break;
            }
        }
        ticks
    }

    /// Time remaining until the next tick is due
    pub(crate) fn until_next_tick(&self) -> Duration {
        self.period.saturating_sub(self.accumulated)
    }

    /// Start counting from zero again
    pub(crate) fn reset(&mut self) {
        self.accumulated = Duration::ZERO;
    }
}
