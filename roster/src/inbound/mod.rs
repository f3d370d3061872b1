//! Inbound adapters translating terminal interaction into domain calls.
//!
//! - **terminal**: delete confirmation prompts, `field=value` parsing and
//!   roster rendering for the `roster` binary.

pub mod terminal;
