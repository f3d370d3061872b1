//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **employee_api**: reqwest-backed implementation of the
//!   `EmployeeGateway` port against the employee REST service.
//!
//! Adapters are thin translators between domain types and wire
//! representations. They contain no retry or reconciliation logic.

pub mod employee_api;
