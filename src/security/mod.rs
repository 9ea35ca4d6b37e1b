//! Security subsystem.
//!
//! # Responsibilities
//! - Hold the demo credentials checked by the basic-auth endpoints
//!
//! # Design Decisions
//! - Credentials are injected at construction, never hardcoded in handlers
//! - The store is behind a trait so tests can swap in their own pairs

pub mod credentials;

pub use credentials::{CredentialStore, StaticCredentials};
