//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod deletion_confirmation;
mod employee_gateway;
mod employee_submission;

pub use deletion_confirmation::{AlwaysConfirm, DeletionConfirmation};
#[cfg(test)]
pub use employee_gateway::MockEmployeeGateway;
pub use employee_gateway::{EmployeeGateway, EmployeeGatewayError, FixtureEmployeeGateway};
#[cfg(test)]
pub use employee_submission::MockEmployeeSubmission;
pub use employee_submission::EmployeeSubmission;
