//! Session lifecycle for keylease license clients.
//!
//! This crate turns a secret file into a [`CredentialHandle`] and drives it
//! through authentication, keepalive and release:
//! - Every failure is a [`LeaseError`] carrying a [`Status`] code
//! - A failed operation leaves the handle as it was; release always cleans
//!   up locally
//! - The engine resource behind a handle is freed exactly once, by
//!   [`CredentialHandle::release`] or by dropping the handle
//!
//! All operations block. Nothing here schedules keepalives; callers do that
//! on their own threads, using [`SharedHandle`] when more than one thread
//! touches a handle.
//!
//! # Example
//!
//! ```no_run
//! use keylease_session::{EngineConfig, LicenseClient};
//!
//! # fn main() -> keylease_session::LeaseResult<()> {
//! let client = LicenseClient::new(EngineConfig::from_env());
//! let mut handle = client.parse_secret_file("client.enc.json", Some("123"))?;
//! handle.authenticate()?;
//! handle.keepalive()?;
//! handle.release()?;
//! # Ok(())
//! # }
//! ```

mod client;
mod handle;
mod lifecycle;
mod shared;
mod slot;

pub use client::LicenseClient;
pub use handle::CredentialHandle;
pub use shared::SharedHandle;
pub use slot::ResourceSlot;

pub use keylease_engine::{EngineConfig, Grant, HttpEngine, LicenseEngine, ParsedSecret};
pub use keylease_types::{describe, LeaseError, LeaseResult, LifecycleState, Status};
