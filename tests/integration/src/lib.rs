//! Integration test utilities for the audit logger
//!
//! Provides a scripted mock gateway, a temporary log directory, and payload
//! fixtures for end-to-end tests of the binding layer, adapter, and store.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
