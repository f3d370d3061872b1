//! Create/edit form state machine.
//!
//! The workflow is either idle, creating a new employee from a blank draft,
//! or editing a copy of an existing record. Submitting validates the draft
//! locally and only then hands the record to an [`EmployeeSubmission`]
//! implementation, usually the roster cache.

use std::fmt;

use tracing::debug;

use crate::domain::ports::EmployeeSubmission;
use crate::domain::{
    DomainError, Employee, EmployeeDraft, EmployeeField, RosterOperation,
};

static BLANK_DRAFT: EmployeeDraft = EmployeeDraft::blank();

/// Externally visible form mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    /// No form is open.
    Idle,
    /// A new employee is being drafted.
    Creating,
    /// An existing employee is being edited.
    Editing,
}

impl FormMode {
    /// Lower-case label used in logs and terminal output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Creating => "creating",
            Self::Editing => "editing",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FormState {
    Idle,
    Creating { draft: EmployeeDraft },
    Editing { target: Employee, draft: EmployeeDraft },
}

/// Form workflow for creating and editing employees.
///
/// ## Invariants
/// - `target` is present exactly while editing.
/// - While editing, the draft's `employeeId` always equals the target's.
/// - A failed submit leaves mode, target and draft unchanged.
///
/// # Examples
/// ```
/// use roster::domain::{EmployeeField, FormMode, FormWorkflow};
///
/// let mut form = FormWorkflow::new();
/// form.begin_create().expect("idle form can start creating");
/// form.set_field(EmployeeField::Name, "B").expect("creating accepts edits");
/// assert_eq!(form.mode(), FormMode::Creating);
/// assert_eq!(form.draft().field(EmployeeField::Name), "B");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FormWorkflow {
    state: FormState,
}

impl Default for FormWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl FormWorkflow {
    /// Idle workflow with a blank draft.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FormState::Idle,
        }
    }

    /// Current mode.
    #[must_use]
    pub const fn mode(&self) -> FormMode {
        match self.state {
            FormState::Idle => FormMode::Idle,
            FormState::Creating { .. } => FormMode::Creating,
            FormState::Editing { .. } => FormMode::Editing,
        }
    }

    /// Draft currently shown; blank while idle.
    #[must_use]
    pub fn draft(&self) -> &EmployeeDraft {
        match &self.state {
            FormState::Idle => &BLANK_DRAFT,
            FormState::Creating { draft } | FormState::Editing { draft, .. } => draft,
        }
    }

    /// Record being edited, present only while editing.
    #[must_use]
    pub const fn target(&self) -> Option<&Employee> {
        match &self.state {
            FormState::Editing { target, .. } => Some(target),
            FormState::Idle | FormState::Creating { .. } => None,
        }
    }

    /// Open the form with a blank draft.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidState`] unless idle.
    pub fn begin_create(&mut self) -> Result<(), DomainError> {
        self.require_idle("start creating")?;
        self.state = FormState::Creating {
            draft: EmployeeDraft::blank(),
        };
        debug!(mode = %self.mode(), "form opened");
        Ok(())
    }

    /// Open the form on a copy of `employee`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidState`] unless idle.
    pub fn begin_edit(&mut self, employee: &Employee) -> Result<(), DomainError> {
        self.require_idle("start editing")?;
        self.state = FormState::Editing {
            target: employee.clone(),
            draft: EmployeeDraft::from_employee(employee),
        };
        debug!(mode = %self.mode(), employee_id = %employee.employee_id, "form opened");
        Ok(())
    }

    /// Replace the raw text of one draft field.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidState`] while idle, or when
    /// changing `employeeId` while editing.
    pub fn set_field(&mut self, field: EmployeeField, value: impl Into<String>) -> Result<(), DomainError> {
        match &mut self.state {
            FormState::Idle => Err(DomainError::invalid_state(format!(
                "cannot edit {field} while no form is open"
            ))),
            FormState::Editing { target, .. } if field == EmployeeField::EmployeeId => {
                Err(DomainError::invalid_state(format!(
                    "employeeId of employee {} cannot be changed while editing",
                    target.employee_id
                )))
            }
            FormState::Creating { draft } | FormState::Editing { draft, .. } => {
                draft.set(field, value);
                Ok(())
            }
        }
    }

    /// Discard the draft and return to idle.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidState`] while idle.
    pub fn cancel(&mut self) -> Result<(), DomainError> {
        if self.state == FormState::Idle {
            return Err(DomainError::invalid_state("no form is open to cancel"));
        }
        debug!(mode = %self.mode(), "form cancelled");
        self.state = FormState::Idle;
        Ok(())
    }

    /// Validate the draft and submit it.
    ///
    /// Creating submits a new record; editing submits an update targeting the
    /// original record's id. On success the form returns to idle.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::ErrorCode::InvalidState`] while idle,
    /// [`crate::domain::ErrorCode::Validation`] for a malformed draft (nothing
    /// is sent), or the submission failure. The form is unchanged on error.
    pub async fn submit<S>(&mut self, roster: &S) -> Result<Employee, DomainError>
    where
        S: EmployeeSubmission + ?Sized,
    {
        let stored = match &self.state {
            FormState::Idle => return Err(DomainError::invalid_state("no form is open to submit")),
            FormState::Creating { draft } => {
                let employee = draft.validate().map_err(|error| {
                    DomainError::from(error).for_operation(RosterOperation::Create, None)
                })?;
                roster.submit_new(employee).await?
            }
            FormState::Editing { target, draft } => {
                let employee_id = target.employee_id;
                let employee = draft.validate().map_err(|error| {
                    DomainError::from(error).for_operation(RosterOperation::Update, Some(employee_id))
                })?;
                roster.submit_edit(employee_id, employee).await?
            }
        };

        debug!(employee_id = %stored.employee_id, "form submitted");
        self.state = FormState::Idle;
        Ok(stored)
    }

    fn require_idle(&self, action: &str) -> Result<(), DomainError> {
        match self.state {
            FormState::Idle => Ok(()),
            FormState::Creating { .. } | FormState::Editing { .. } => Err(DomainError::invalid_state(
                format!("cannot {action} while the form is {}", self.mode()),
            )),
        }
    }
}
