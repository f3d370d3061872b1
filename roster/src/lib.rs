//! Client-side employee roster kept in sync with a remote REST service.
//!
//! The crate follows a ports-and-adapters layout:
//! - [`domain`] holds the employee model, the roster cache, the form
//!   workflow, and the port traits they depend on;
//! - [`outbound`] implements the remote gateway port over HTTP;
//! - [`inbound`] holds terminal-facing adapters used by the `roster` binary;
//! - [`config`] resolves settings from the environment and config files.

pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use config::{ApiBaseUrl, RosterSettings};
