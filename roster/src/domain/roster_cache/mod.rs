//! Local roster cache mirroring the remote employee service.
//!
//! The cache owns the cold-start retry policy for loading (fixed delay,
//! unbounded attempts, cancellable) and the reconciliation applied after each
//! acknowledged mutation. Local state is only patched once the remote call
//! has succeeded; remote operations are serialised through a single-flight
//! guard.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::domain::ports::{DeletionConfirmation, EmployeeGateway, EmployeeSubmission};
use crate::domain::{DomainError, Employee, EmployeeId, RosterOperation};

mod mapping;
mod reconcile;
mod runtime;

use reconcile::Patched;
pub use runtime::{RetrySleeper, RosterCachePorts, RosterCacheRuntime, TokioSleeper};

/// Delay between cold-start load attempts unless configured otherwise.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// How local state is brought back in line after a successful mutation.
///
/// One strategy applies uniformly to create, update and delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reconciliation {
    /// Patch local state from the acknowledged mutation: append the
    /// server-returned record on create, replace on update, drop on delete.
    #[default]
    Merge,
    /// Refetch the whole roster after every mutation. When that refetch
    /// fails the merge patch is applied instead so the mutation stays
    /// visible.
    Refetch,
}

/// Error returned when parsing an unknown reconciliation strategy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown reconciliation strategy '{0}'; expected 'merge' or 'refetch'")]
pub struct UnknownReconciliation(pub String);

impl FromStr for Reconciliation {
    type Err = UnknownReconciliation;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "merge" => Ok(Self::Merge),
            "refetch" => Ok(Self::Refetch),
            _ => Err(UnknownReconciliation(raw.to_owned())),
        }
    }
}

/// Cache configuration controlling retries and reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RosterCacheConfig {
    /// Fixed delay between cold-start load attempts.
    pub retry_delay: Duration,
    /// Post-mutation reconciliation strategy.
    pub reconciliation: Reconciliation,
}

impl Default for RosterCacheConfig {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            reconciliation: Reconciliation::default(),
        }
    }
}

/// Result of a [`RosterCache::load`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The roster was fetched and replaced.
    Loaded {
        /// Fetch attempts used, including the successful one.
        attempts: u32,
        /// Number of employees now cached.
        employees: usize,
    },
    /// The load was superseded, cancelled, or the cache was shut down.
    Cancelled {
        /// Fetch attempts started before cancellation, including one
        /// abandoned mid-flight.
        attempts: u32,
    },
}

/// Result of a [`RosterCache::remove`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The service acknowledged the delete and the local record was dropped.
    Removed,
    /// Confirmation was declined; nothing was sent.
    Declined,
}

/// Domain-owned roster cache.
pub struct RosterCache {
    gateway: Arc<dyn EmployeeGateway>,
    confirmation: Arc<dyn DeletionConfirmation>,
    sleeper: Arc<dyn RetrySleeper>,
    config: RosterCacheConfig,
    employees: RwLock<Vec<Employee>>,
    flight: tokio::sync::Mutex<()>,
    pending_load: Mutex<Option<CancellationToken>>,
    lifetime: CancellationToken,
}

impl RosterCache {
    /// Build a cache using default runtime dependencies.
    /// ```rust,ignore
    /// let cache = RosterCache::new(ports, RosterCacheConfig::default());
    /// ```
    #[must_use]
    pub fn new(ports: RosterCachePorts, config: RosterCacheConfig) -> Self {
        Self::with_runtime(ports, RosterCacheRuntime::default(), config)
    }

    /// Build a cache with injected runtime abstractions.
    /// ```rust,ignore
    /// let cache = RosterCache::with_runtime(ports, runtime, config);
    /// ```
    #[must_use]
    pub fn with_runtime(
        ports: RosterCachePorts,
        runtime: RosterCacheRuntime,
        config: RosterCacheConfig,
    ) -> Self {
        Self {
            gateway: ports.gateway,
            confirmation: ports.confirmation,
            sleeper: runtime.sleeper,
            config,
            employees: RwLock::new(Vec::new()),
            flight: tokio::sync::Mutex::new(()),
            pending_load: Mutex::new(None),
            lifetime: CancellationToken::new(),
        }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &RosterCacheConfig {
        &self.config
    }

    /// Snapshot of the cached roster in service order.
    #[must_use]
    pub fn employees(&self) -> Vec<Employee> {
        self.read_state().clone()
    }

    /// Look up one cached employee.
    #[must_use]
    pub fn find(&self, employee_id: EmployeeId) -> Option<Employee> {
        self.read_state()
            .iter()
            .find(|employee| employee.employee_id == employee_id)
            .cloned()
    }

    /// Number of cached employees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_state().len()
    }

    /// Whether the cache holds no employees.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_state().is_empty()
    }

    /// Fetch the full roster, retrying transport and service failures.
    ///
    /// Retries wait [`RosterCacheConfig::retry_delay`] and continue until a
    /// fetch succeeds or the load is cancelled. Starting another load
    /// cancels this one. A failed attempt never touches cached state.
    ///
    /// ```rust,ignore
    /// match cache.load().await? {
    ///     LoadOutcome::Loaded { attempts, employees } => println!("{employees} after {attempts}"),
    ///     LoadOutcome::Cancelled { .. } => {}
    /// }
    /// ```
    ///
    /// # Errors
    ///
    /// Returns the first non-retryable failure.
    pub async fn load(&self) -> Result<LoadOutcome, DomainError> {
        let token = self.begin_load();
        let delay = self.config.retry_delay;
        let mut attempts = 0_u32;

        loop {
            if token.is_cancelled() {
                return Ok(Self::cancelled(attempts));
            }
            attempts = attempts.saturating_add(1);
            let fetched = tokio::select! {
                biased;
                () = token.cancelled() => return Ok(Self::cancelled(attempts)),
                result = self.fetch_serialised(RosterOperation::Load) => result,
            };

            match fetched {
                Ok(employees) => {
                    info!(attempts, employees, "roster loaded");
                    return Ok(LoadOutcome::Loaded {
                        attempts,
                        employees,
                    });
                }
                Err(error) if error.is_retryable() => {
                    warn!(
                        attempt = attempts,
                        retry_in_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %error,
                        "roster load failed; retrying while the backend wakes up"
                    );
                    tokio::select! {
                        biased;
                        () = token.cancelled() => return Ok(Self::cancelled(attempts)),
                        () = self.sleeper.sleep(delay) => {}
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    /// Cancel a pending cold-start load, if any.
    pub fn cancel_load(&self) {
        let pending = self
            .pending_load
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(token) = pending {
            token.cancel();
        }
    }

    /// Tear down the cache: cancel pending loads and refuse new retries.
    pub fn shutdown(&self) {
        self.lifetime.cancel();
    }

    /// Refetch the roster once, without retrying.
    ///
    /// # Errors
    ///
    /// Returns the fetch failure; cached state is left as it was.
    pub async fn refresh(&self) -> Result<usize, DomainError> {
        self.fetch_serialised(RosterOperation::Refresh).await
    }

    /// Create an employee remotely, then reconcile.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; cached state is left as it was.
    pub async fn create(&self, employee: Employee) -> Result<Employee, DomainError> {
        let employee_id = employee.employee_id;
        let _flight = self.flight.lock().await;
        let created = self
            .gateway
            .create_employee(&employee)
            .await
            .map_err(|error| {
                mapping::map_gateway_error(&error, RosterOperation::Create, Some(employee_id))
            })?;

        let stored = created.clone();
        self.reconcile(RosterOperation::Create, move |employees| {
            reconcile::upsert(employees, stored)
        })
        .await;
        info!(employee_id = %created.employee_id, "employee created");
        Ok(created)
    }

    /// Update an employee remotely, then reconcile.
    ///
    /// The path id is authoritative: the stored record always carries
    /// `employee_id`, whatever id `employee` holds.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure, including
    /// [`crate::domain::ErrorCode::NotFound`] when the record vanished
    /// remotely; cached state is left as it was.
    pub async fn update(
        &self,
        employee_id: EmployeeId,
        employee: Employee,
    ) -> Result<Employee, DomainError> {
        let record = employee.with_id(employee_id);
        let _flight = self.flight.lock().await;
        self.gateway
            .update_employee(employee_id, &record)
            .await
            .map_err(|error| {
                mapping::map_gateway_error(&error, RosterOperation::Update, Some(employee_id))
            })?;

        let stored = record.clone();
        self.reconcile(RosterOperation::Update, move |employees| {
            reconcile::upsert(employees, stored)
        })
        .await;
        info!(%employee_id, "employee updated");
        Ok(record)
    }

    /// Delete an employee remotely after confirmation, then reconcile.
    ///
    /// # Errors
    ///
    /// Returns the gateway failure; cached state is left as it was.
    pub async fn remove(&self, employee_id: EmployeeId) -> Result<RemoveOutcome, DomainError> {
        if !self.confirmation.confirm_removal(employee_id) {
            debug!(%employee_id, "employee removal declined");
            return Ok(RemoveOutcome::Declined);
        }

        let _flight = self.flight.lock().await;
        self.gateway
            .delete_employee(employee_id)
            .await
            .map_err(|error| {
                mapping::map_gateway_error(&error, RosterOperation::Delete, Some(employee_id))
            })?;

        self.reconcile(RosterOperation::Delete, move |employees| {
            reconcile::remove(employees, employee_id)
        })
        .await;
        info!(%employee_id, "employee removed");
        Ok(RemoveOutcome::Removed)
    }

    async fn fetch_serialised(&self, operation: RosterOperation) -> Result<usize, DomainError> {
        let _flight = self.flight.lock().await;
        self.fetch_and_replace(operation).await
    }

    /// Caller must hold the single-flight guard.
    async fn fetch_and_replace(&self, operation: RosterOperation) -> Result<usize, DomainError> {
        let fetched = self
            .gateway
            .list_employees()
            .await
            .map_err(|error| mapping::map_gateway_error(&error, operation, None))?;

        let (employees, dropped) = reconcile::dedupe_by_id(fetched);
        if dropped > 0 {
            warn!(dropped, "service returned duplicate employee ids; kept first occurrences");
        }
        let count = employees.len();
        *self.write_state() = employees;
        Ok(count)
    }

    /// Caller must hold the single-flight guard.
    async fn reconcile<F>(&self, operation: RosterOperation, patch: F)
    where
        F: FnOnce(&mut Vec<Employee>) -> Patched + Send,
    {
        if self.config.reconciliation == Reconciliation::Refetch {
            match self.fetch_and_replace(RosterOperation::Refresh).await {
                Ok(_) => return,
                Err(error) => warn!(
                    %operation,
                    error = %error,
                    "post-mutation refetch failed; patching local roster instead"
                ),
            }
        }

        let mut state = self.write_state();
        let patched = patch(&mut *state);
        debug!(%operation, ?patched, "local roster reconciled");
    }

    fn begin_load(&self) -> CancellationToken {
        let token = self.lifetime.child_token();
        let previous = self
            .pending_load
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(token.clone());
        if let Some(previous) = previous {
            debug!("superseding pending roster load");
            previous.cancel();
        }
        token
    }

    fn cancelled(attempts: u32) -> LoadOutcome {
        info!(attempts, "roster load cancelled");
        LoadOutcome::Cancelled { attempts }
    }

    fn read_state(&self) -> RwLockReadGuard<'_, Vec<Employee>> {
        self.employees.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Vec<Employee>> {
        self.employees.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for RosterCache {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}

#[async_trait]
impl EmployeeSubmission for RosterCache {
    async fn submit_new(&self, employee: Employee) -> Result<Employee, DomainError> {
        self.create(employee).await
    }

    async fn submit_edit(
        &self,
        employee_id: EmployeeId,
        employee: Employee,
    ) -> Result<Employee, DomainError> {
        self.update(employee_id, employee).await
    }
}

#[cfg(test)]
mod tests;
