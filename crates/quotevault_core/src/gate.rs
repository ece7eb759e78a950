//! crates/quotevault_core/src/gate.rs
//!
//! The session-gated navigation controller.
//!
//! The gate observes authentication state from the identity port and
//! deterministically selects which screen group is reachable. It blocks
//! (reports a loading phase) until the one-time initial lookup resolves,
//! then re-evaluates on every session-change notification fed into it.

use std::sync::Arc;

use crate::domain::Session;
use crate::ports::IdentityService;

/// Every screen the application knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Profile,
    Favorites,
    Login,
    Signup,
    ForgotPassword,
}

/// One of the two disjoint screen groups. Exactly one is reachable at any
/// instant after the initial session lookup resolves; there is no combined
/// or intermediate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenSet {
    Authenticated,
    Unauthenticated,
}

impl ScreenSet {
    /// The pure mapping from session presence to screen group.
    pub fn for_session(session: Option<&Session>) -> Self {
        if session.is_some() {
            ScreenSet::Authenticated
        } else {
            ScreenSet::Unauthenticated
        }
    }

    /// The screens reachable within this group.
    pub fn screens(&self) -> &'static [Screen] {
        match self {
            ScreenSet::Authenticated => &[Screen::Home, Screen::Profile, Screen::Favorites],
            ScreenSet::Unauthenticated => {
                &[Screen::Login, Screen::Signup, Screen::ForgotPassword]
            }
        }
    }
}

/// The navigation controller itself.
///
/// The gate only reads session state; the subscription that feeds
/// [`SessionGate::apply_session_change`] lives with the caller so that
/// tearing the caller down deterministically unsubscribes.
pub struct SessionGate {
    identity: Arc<dyn IdentityService>,
    session: Option<Session>,
    resolved: bool,
}

impl SessionGate {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self {
            identity,
            session: None,
            resolved: false,
        }
    }

    /// Perform the one-time initial session lookup.
    ///
    /// A failed lookup is treated identically to "no session": the
    /// unauthenticated group is rendered and no retry is attempted.
    pub async fn activate(&mut self) -> ScreenSet {
        self.session = match self.identity.current_session().await {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!("Initial session lookup failed: {err}");
                None
            }
        };
        self.resolved = true;
        ScreenSet::for_session(self.session.as_ref())
    }

    /// The currently reachable screen group, or `None` while the initial
    /// lookup is still outstanding (the loading phase).
    pub fn screen_set(&self) -> Option<ScreenSet> {
        if self.resolved {
            Some(ScreenSet::for_session(self.session.as_ref()))
        } else {
            None
        }
    }

    /// Apply one session-change notification. The new value fully replaces
    /// the remembered one.
    pub fn apply_session_change(&mut self, session: Option<Session>) -> ScreenSet {
        self.session = session;
        self.resolved = true;
        ScreenSet::for_session(self.session.as_ref())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
}
