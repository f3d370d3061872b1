//! Sleeper doubles for cold-start retry tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::domain::RetrySleeper;

/// Sleeper that returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl RetrySleeper for ImmediateSleeper {
    async fn sleep(&self, _duration: Duration) {}
}

/// Sleeper that records each requested delay and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper(Mutex<Vec<Duration>>);

impl RecordingSleeper {
    /// Delays requested so far, in order.
    #[must_use]
    pub fn delays(&self) -> Vec<Duration> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl RetrySleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

/// Sleeper that never wakes, so tests can cancel a pending retry.
#[derive(Debug, Default)]
pub struct ParkingSleeper {
    parked: Notify,
    sleeps: AtomicUsize,
}

impl ParkingSleeper {
    /// Resolve once a retry has parked in [`RetrySleeper::sleep`].
    pub async fn wait_until_parked(&self) {
        self.parked.notified().await;
    }

    /// Number of sleeps entered.
    #[must_use]
    pub fn sleeps(&self) -> usize {
        self.sleeps.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RetrySleeper for ParkingSleeper {
    async fn sleep(&self, _duration: Duration) {
        self.sleeps.fetch_add(1, Ordering::SeqCst);
        self.parked.notify_one();
        std::future::pending::<()>().await;
    }
}
