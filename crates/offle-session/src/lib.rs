//! Client-side session state for the Offle Assistant client.
//!
//! - [`SessionStore`] persists the bearer token and role through a
//!   [`SessionStorage`] backend and publishes changes to subscribers.
//! - [`Navigator`] owns the current [`Route`].
//! - [`AuthGate`] guards the protected routes.

pub mod gate;
pub mod navigation;
pub mod storage;
pub mod store;

pub use gate::{AuthGate, GateOutcome, GateState};
pub use navigation::{Navigator, Route};
pub use storage::{FileStorage, MemoryStorage, SessionStorage};
pub use store::{SessionState, SessionStore, ROLE_KEY, TOKEN_KEY};
