//! Time source and delay primitive injected into every task.

use embassy_time::{Duration, Instant, Timer};

use crate::task::TaskSlot;

pub trait Clock {
    fn now(&self) -> Instant;

    /// Suspends the caller for at least `duration`.
    async fn delay(&mut self, duration: Duration);
}

/// The embassy time driver.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn delay(&mut self, duration: Duration) {
        Timer::after(duration).await
    }
}

/// Wraps a clock and records `Blocked` / `Running` on a task slot around each delay.
pub struct TrackedClock<'a, C> {
    inner: C,
    slot: &'a TaskSlot,
}

impl<'a, C: Clock> TrackedClock<'a, C> {
    pub fn new(inner: C, slot: &'a TaskSlot) -> Self {
        Self { inner, slot }
    }
}

impl<C: Clock> Clock for TrackedClock<'_, C> {
    fn now(&self) -> Instant {
        self.inner.now()
    }

    async fn delay(&mut self, duration: Duration) {
        self.slot.mark_blocked();
        self.inner.delay(duration).await;
        self.slot.mark_running();
    }
}
