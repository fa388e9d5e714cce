//! REST client for the Offle Assistant backend.
//!
//! [`ApiClient`] wraps `reqwest` with the base URL, JSON headers, cookie
//! handling and bearer token the backend expects, and escalates a 401 into
//! a forced logout through the shared [`offle_session::SessionStore`].
//! Responses are validated by [`decode`] before callers see them.

pub mod api;
pub mod client;
pub mod config;
pub mod decode;
pub mod token;

pub use api::{ChatReply, ChatRequest, PersonaCreated, RegisterResponse, TokenResponse};
pub use client::ApiClient;
pub use config::{ClientConfig, BASE_URL_ENV, DATA_DIR_ENV, DEFAULT_BASE_URL};
pub use token::{decode_claims, TokenClaims};
