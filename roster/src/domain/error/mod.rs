//! Domain-level error types.
//!
//! These errors are transport agnostic. Port errors raised by adapters are
//! mapped into [`DomainError`] at the roster cache boundary so callers always
//! see which operation failed and for which record.

use std::fmt;

use super::EmployeeId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The remote service could not be reached; no response was received.
    Network,
    /// The remote service answered with a non-success status.
    Service,
    /// The remote service answered successfully with a payload the client
    /// rejects. Retrying returns the same payload.
    MalformedResponse,
    /// The target employee does not exist on the remote service.
    NotFound,
    /// Local input was malformed and never left the client.
    Validation,
    /// The operation is not allowed in the current workflow state.
    InvalidState,
}

impl ErrorCode {
    /// Stable snake-case label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Service => "service",
            Self::MalformedResponse => "malformed_response",
            Self::NotFound => "not_found",
            Self::Validation => "validation",
            Self::InvalidState => "invalid_state",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roster operation an error is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterOperation {
    /// Initial or explicit roster load.
    Load,
    /// Single post-mutation refetch.
    Refresh,
    /// Employee creation.
    Create,
    /// Employee update.
    Update,
    /// Employee deletion.
    Delete,
}

impl RosterOperation {
    const fn verb(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Refresh => "refresh",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    const fn noun(self) -> &'static str {
        match self {
            Self::Load | Self::Refresh => "roster",
            Self::Create | Self::Update | Self::Delete => "employee",
        }
    }
}

impl fmt::Display for RosterOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb(), self.noun())
    }
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` is a human-readable summary; transport internals stay in logs.
///
/// # Examples
/// ```
/// use roster::domain::{DomainError, EmployeeId, ErrorCode, RosterOperation};
///
/// let err = DomainError::not_found("employee 7 no longer exists on the server")
///     .for_operation(RosterOperation::Update, Some(EmployeeId::new(7)));
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(
///     err.to_string(),
///     "update employee 7 failed: employee 7 no longer exists on the server"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    code: ErrorCode,
    message: String,
    operation: Option<RosterOperation>,
    employee_id: Option<EmployeeId>,
}

impl DomainError {
    /// Create a new error without operation context.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            operation: None,
            employee_id: None,
        }
    }

    /// Attach the operation and, when known, the record it targeted.
    #[must_use]
    pub fn for_operation(
        mut self,
        operation: RosterOperation,
        employee_id: Option<EmployeeId>,
    ) -> Self {
        self.operation = Some(operation);
        self.employee_id = employee_id;
        self
    }

    /// Stable machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable summary without operation context.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Operation the error is attributed to, if any.
    #[must_use]
    pub const fn operation(&self) -> Option<RosterOperation> {
        self.operation
    }

    /// Employee the failed operation targeted, if any.
    #[must_use]
    pub const fn employee_id(&self) -> Option<EmployeeId> {
        self.employee_id
    }

    /// Whether the cold-start loop should try again after this error.
    ///
    /// Only failures that can heal on their own qualify: an unreachable or
    /// failing service. Rejected payloads are returned as-is.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self.code, ErrorCode::Network | ErrorCode::Service)
    }

    /// Convenience constructor for [`ErrorCode::Network`].
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Network, message)
    }

    /// Convenience constructor for [`ErrorCode::Service`].
    #[must_use]
    pub fn service(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Service, message)
    }

    /// Convenience constructor for [`ErrorCode::MalformedResponse`].
    #[must_use]
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MalformedResponse, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Validation`].
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// Convenience constructor for [`ErrorCode::InvalidState`].
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidState, message)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.operation, self.employee_id) {
            (Some(operation), Some(id)) => {
                write!(f, "{operation} {id} failed: {}", self.message)
            }
            (Some(operation), None) => write!(f, "{operation} failed: {}", self.message),
            (None, _) => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for DomainError {}
