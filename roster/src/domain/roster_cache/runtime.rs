//! Port and runtime dependency bundles for the roster cache.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ports::{DeletionConfirmation, EmployeeGateway};

/// Async sleeping abstraction used between cold-start attempts.
#[async_trait]
pub trait RetrySleeper: Send + Sync {
    /// Suspend execution for `duration`.
    ///
    /// ```rust,no_run
    /// use async_trait::async_trait;
    /// use roster::domain::RetrySleeper;
    /// use std::sync::{Arc, Mutex};
    /// use std::time::Duration;
    /// #[derive(Default)]
    /// struct CountingSleeper {
    ///     calls: Arc<Mutex<u32>>,
    /// }
    /// #[async_trait]
    /// impl RetrySleeper for CountingSleeper {
    ///     async fn sleep(&self, _duration: Duration) {
    ///         *self.calls.lock().expect("calls mutex") += 1;
    ///     }
    /// }
    /// # async fn demo() {
    /// let sleeper = CountingSleeper::default();
    /// sleeper.sleep(Duration::from_secs(2)).await;
    /// assert_eq!(*sleeper.calls.lock().expect("calls mutex"), 1);
    /// # }
    /// ```
    async fn sleep(&self, duration: Duration);
}

/// Port bundle required by the roster cache.
pub struct RosterCachePorts {
    /// Remote employee service adapter.
    pub gateway: Arc<dyn EmployeeGateway>,
    /// Yes/no gate consulted before deletes.
    pub confirmation: Arc<dyn DeletionConfirmation>,
}

impl RosterCachePorts {
    /// Build a strongly-typed port bundle.
    #[must_use]
    pub const fn new(
        gateway: Arc<dyn EmployeeGateway>,
        confirmation: Arc<dyn DeletionConfirmation>,
    ) -> Self {
        Self {
            gateway,
            confirmation,
        }
    }
}

/// Runtime helpers used by the cold-start retry loop.
pub struct RosterCacheRuntime {
    /// Async sleep implementation.
    pub sleeper: Arc<dyn RetrySleeper>,
}

impl Default for RosterCacheRuntime {
    fn default() -> Self {
        Self {
            sleeper: Arc::new(TokioSleeper),
        }
    }
}

/// Tokio-based sleeper implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl RetrySleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
