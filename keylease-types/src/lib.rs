//! Core type definitions for keylease.
//!
//! This crate defines the types every other crate agrees on:
//! - The closed status taxonomy and its descriptions
//! - The structured error wrapping a status and a message
//! - The lifecycle states of a credential handle

mod error;
mod state;
mod status;

pub use error::{LeaseError, LeaseResult};
pub use state::LifecycleState;
pub use status::{describe, Status, UnknownStatus, UNRECOGNIZED_STATUS};
