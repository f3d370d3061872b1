//! Employee REST service adapter.
//!
//! This module provides a thin HTTP implementation of the `EmployeeGateway`
//! port.

mod dto;
mod http_gateway;

pub use http_gateway::EmployeeHttpGateway;
