use dioxus::prelude::*;

use scraplink_common::identity::Session;

/// Auth context shared across all components.
///
/// Holds the session issued at sign-in; cleared wholesale at sign-out.
/// Components read identity from here instead of any ambient global.
#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub session: Option<Session>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(&self) -> bool {
        self.session.is_some()
    }

    pub fn sign_in(&mut self, session: Session) {
        self.session = Some(session);
    }

    pub fn sign_out(&mut self) {
        self.session = None;
    }
}

/// Read the auth context provided at the top of the app.
pub fn use_auth_state() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}
