//! View models for the Offle Assistant client.
//!
//! Each page of the assistant is a plain struct holding its own state and
//! an [`std::sync::Arc`] of the shared [`offle_client::ApiClient`]:
//!
//! - [`AuthForm`]: login and registration.
//! - [`PersonaView`]: list, inspect, create and edit personas.
//! - [`ChatView`]: talk to one persona, continuing its stored history.
//! - [`AdminUsersView`]: user management for admins.
//! - [`NavShell`]: the navigation bar.
//!
//! [`App`] owns the shared pieces and applies the auth gate when a route
//! is opened.

pub mod admin;
pub mod app;
pub mod auth_form;
pub mod chat;
pub mod nav;
pub mod personas;

pub use admin::AdminUsersView;
pub use app::App;
pub use auth_form::{AuthForm, AuthMode};
pub use chat::{ChatExchange, ChatView};
pub use nav::{NavLink, NavShell, APP_TITLE};
pub use personas::{PersonaEdit, PersonaView};
