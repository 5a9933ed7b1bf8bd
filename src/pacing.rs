#![allow(async_fn_in_trait)]

use std::cell::Cell;
use std::time::Duration;

use tokio::time::Instant;

/// Gate called before every remote request.
pub trait Pacer {
    async fn wait(&self);
}

/// Enforces a minimum interval between consecutive requests.
///
/// The first call returns immediately. A zero interval never sleeps.
pub struct IntervalPacer {
    interval: Duration,
    last: Cell<Option<Instant>>,
}

impl IntervalPacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Cell::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Pacer for IntervalPacer {
    async fn wait(&self) {
        if self.interval.is_zero() {
            return;
        }
        if let Some(last) = self.last.get() {
            tokio::time::sleep_until(last + self.interval).await;
        }
        self.last.set(Some(Instant::now()));
    }
}
