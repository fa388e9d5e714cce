use crate::navigation::Route;
use crate::store::SessionStore;
use tracing::debug;

/// Where the gate is in its one-shot check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    /// Not yet mounted; the session has not been read.
    Unknown,
    Authenticated,
    Unauthenticated,
}

/// What the protected area should show for the current gate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Loading placeholder.
    Loading,
    /// Render the protected subtree.
    Render,
    /// Leave for another route.
    Redirect(Route),
}

/// Route guard in front of the protected views.
///
/// The session is read exactly once, on [`AuthGate::mount`]. A session that
/// the backend revokes later is only noticed on the next failed request.
#[derive(Debug)]
pub struct AuthGate {
    state: GateState,
}

impl AuthGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Unknown,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Reads the session and settles the gate. Later calls are no-ops that
    /// return the settled outcome.
    pub fn mount(&mut self, session: &SessionStore) -> GateOutcome {
        if self.state != GateState::Unknown {
            return self.outcome();
        }

        self.state = if session.token().is_some() {
            GateState::Authenticated
        } else {
            GateState::Unauthenticated
        };
        debug!(state = ?self.state, "Auth gate mounted");

        let outcome = self.outcome();
        if let GateOutcome::Redirect(route) = outcome {
            session.navigator().navigate(route);
        }
        outcome
    }

    pub fn outcome(&self) -> GateOutcome {
        match self.state {
            GateState::Unknown => GateOutcome::Loading,
            GateState::Authenticated => GateOutcome::Render,
            GateState::Unauthenticated => GateOutcome::Redirect(Route::Login),
        }
    }
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}
