//! Driven port for the yes/no gate in front of deletes.

use crate::domain::EmployeeId;

/// Synchronous confirmation capability consulted before a delete.
///
/// Closures of the shape `Fn(EmployeeId) -> bool` implement the port, so
/// tests can stub it inline.
///
/// # Examples
///
/// ```rust
/// use roster::domain::EmployeeId;
/// use roster::domain::ports::DeletionConfirmation;
///
/// let decline = |_id: EmployeeId| false;
/// assert!(!decline.confirm_removal(EmployeeId::new(2)));
/// ```
pub trait DeletionConfirmation: Send + Sync {
    /// Return `true` when the employee may be deleted.
    fn confirm_removal(&self, employee_id: EmployeeId) -> bool;
}

impl<F> DeletionConfirmation for F
where
    F: Fn(EmployeeId) -> bool + Send + Sync,
{
    fn confirm_removal(&self, employee_id: EmployeeId) -> bool {
        self(employee_id)
    }
}

/// Confirmation that approves every delete.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl DeletionConfirmation for AlwaysConfirm {
    fn confirm_removal(&self, _employee_id: EmployeeId) -> bool {
        true
    }
}
