//! Domain primitives, services and ports.
//!
//! Purpose: hold the employee model, the roster cache that mirrors the
//! remote service, and the form workflow that produces validated records.
//! Adapters live outside this module and talk to it through [`ports`].
//!
//! Public surface:
//! - Employee, EmployeeId, DepartmentId: the record model.
//! - DomainError, ErrorCode, RosterOperation: attributed domain errors.
//! - EmployeeDraft, EmployeeField: raw form input and its validation.
//! - RosterCache: load, refresh and mutations with reconciliation.
//! - FormWorkflow, FormMode: the create/edit state machine.

pub mod draft;
pub mod employee;
pub mod error;
pub mod form_workflow;
pub mod ports;
pub mod roster_cache;

pub use self::draft::{DraftValidationError, EmployeeDraft, EmployeeField, UnknownFieldError};
pub use self::employee::{DepartmentId, Employee, EmployeeId, SalaryError, validate_salary};
pub use self::error::{DomainError, ErrorCode, RosterOperation};
pub use self::form_workflow::{FormMode, FormWorkflow};
pub use self::roster_cache::{
    DEFAULT_RETRY_DELAY, LoadOutcome, Reconciliation, RemoveOutcome, RetrySleeper, RosterCache,
    RosterCacheConfig, RosterCachePorts, RosterCacheRuntime, TokioSleeper, UnknownReconciliation,
};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use roster::domain::{DomainError, DomainResult};
///
/// fn reject() -> DomainResult<()> {
///     Err(DomainError::invalid_state("no form is open"))
/// }
/// assert!(reject().is_err());
/// ```
pub type DomainResult<T> = Result<T, DomainError>;
