use crate::consts;
use crate::direction::Direction;
use std::collections::VecDeque;

/// Queue of turns requested by the player, handed out to the simulation one
/// per tick.
///
/// Turns that would reverse the snake onto its own neck are refused, both
/// when they're requested and when they're handed out, so that pressing two
/// keys within one tick (e.g., Up then Left while moving Right) can never
/// make the snake double back on itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DirectionBuffer {
    /// The most recently committed heading, or `None` if the snake has never
    /// moved
    heading: Option<Direction>,

    /// Whether `heading` has been handed out by `dequeue()` since it was last
    /// set.  While this is `false`, new requests go into `queue`.
    consumed: bool,

    /// Requested turns not yet handed out, oldest first
    queue: VecDeque<Direction>,
}

impl DirectionBuffer {
    pub(crate) fn new() -> DirectionBuffer {
        DirectionBuffer {
            heading: None,
            consumed: true,
            queue: VecDeque::new(),
        }
    }

    /// The currently committed heading
    pub(crate) fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Request a turn in `requested` for a snake that is `body_len` cells
    /// long.  Returns `true` if the request was accepted.
    ///
    /// A request is refused if it repeats the most recent pending heading or
    /// if it's the reverse of that heading and the snake is longer than one
    /// cell.  If nothing is pending, the request becomes the current heading
    /// straight away.
    pub(crate) fn enqueue(&mut self, requested: Direction, body_len: usize) -> bool {
        if let Some(latest) = self.queue.back().copied().or(self.heading) {
            if latest == requested {
                return false;
            }
            if body_len > 1 && latest.is_opposite(requested) {
                log::trace!("Refusing to reverse from {latest:?} to {requested:?}");
                return false;
            }
        }
        if self.queue.is_empty() && self.consumed {
            self.heading = Some(requested);
            self.consumed = false;
            true
        } else if self.queue.len() < consts::MAX_QUEUED_TURNS {
            self.queue.push_back(requested);
            true
        } else {
            log::trace!("Turn queue full; dropping {requested:?}");
            false
        }
    }

    /// Return the heading to use for the next tick of a snake that is
    /// `body_len` cells long: the oldest pending turn if there is one,
    /// otherwise the current heading again.
    pub(crate) fn dequeue(&mut self, body_len: usize) -> Option<Direction> {
        if self.consumed {
            while let Some(next) = self.queue.pop_front() {
                // The snake may have grown since this turn was accepted.
                if body_len > 1 && self.heading.is_some_and(|h| h.is_opposite(next)) {
                    continue;
                }
                self.heading = Some(next);
                break;
            }
        }
        self.consumed = true;
        self.heading
    }

    /// Forget all pending turns and the current heading
    pub(crate) fn clear(&mut self) {
        *self = DirectionBuffer::new();
    }
}

impl Default for DirectionBuffer {
    fn default() -> DirectionBuffer {
        DirectionBuffer::new()
    }
}
