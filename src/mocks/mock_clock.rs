// This file is only compiled during tests

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::clock::Clock;

/// Virtual clock: `sleep` advances time instantly, clones share one timeline.
#[derive(Clone, Debug, Default)]
pub struct MockClock {
    now: Rc<Cell<Duration>>,
    slept: Rc<Cell<Duration>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, duration: Duration) {
        self.now.set(self.now.get() + duration);
    }

    /// Total time spent in `sleep` so far.
    pub fn slept(&self) -> Duration {
        self.slept.get()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Duration {
        self.now.get()
    }

    fn sleep(&self, duration: Duration) {
        self.slept.set(self.slept.get() + duration);
        self.advance(duration);
    }
}
