//! services/app/src/navigator.rs
//!
//! The application shell around the core `SessionGate`.
//!
//! The navigator owns both the gate and the session-change subscription,
//! so dropping it deterministically unsubscribes and no state update can
//! reach a torn-down shell.

use std::sync::Arc;

use futures::StreamExt;

use quotevault_core::domain::Session;
use quotevault_core::gate::{ScreenSet, SessionGate};
use quotevault_core::ports::{IdentityService, SessionStream};

pub struct Navigator {
    gate: SessionGate,
    changes: SessionStream,
}

impl Navigator {
    /// Subscribes immediately, before the initial lookup, so a change that
    /// races activation is not lost.
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        let changes = identity.session_changes();
        Self {
            gate: SessionGate::new(identity),
            changes,
        }
    }

    /// Resolve the initial session lookup and report the reachable group.
    pub async fn activate(&mut self) -> ScreenSet {
        self.gate.activate().await
    }

    /// `None` while the initial lookup is outstanding.
    pub fn screen_set(&self) -> Option<ScreenSet> {
        self.gate.screen_set()
    }

    pub fn session(&self) -> Option<&Session> {
        self.gate.session()
    }

    /// Wait for the next session change and apply it to the gate.
    /// Returns `None` once the identity provider closes the stream.
    pub async fn next_transition(&mut self) -> Option<ScreenSet> {
        let session = self.changes.next().await?;
        Some(self.gate.apply_session_change(session))
    }
}
