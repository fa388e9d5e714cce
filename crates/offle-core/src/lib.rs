//! Core types and error definitions for the Offle Assistant client.
//!
//! This crate provides the types shared by every other Offle crate: the
//! records the backend owns and the unified error enum.
//!
//! # Main types
//!
//! - [`OffleError`] — Unified error enum for all client operations.
//! - [`OffleResult`] — Convenience alias for `Result<T, OffleError>`.
//! - [`Role`] — Coarse account role used for UI gating.
//! - [`Persona`] / [`PersonaSummary`] / [`PersonaDraft`] — Persona records.
//! - [`ChatMessage`] / [`MessageHistory`] — Chat turns and conversations.
//! - [`UserRecord`] / [`UserProfile`] — Account records.

pub mod error;
pub mod message;
pub mod persona;
pub mod user;

pub use error::{OffleError, OffleResult};
pub use message::{ChatMessage, MessageHistory, MessageRole, NO_CONTENT};
pub use persona::{Persona, PersonaDraft, PersonaSummary, NO_DESCRIPTION, UNNAMED_PERSONA};
pub use user::{Credentials, Role, UserProfile, UserRecord};
