//! Current-identity signal.
//!
//! Token issuance and verification happen elsewhere; this is only the "who is
//! signed in right now" state the realtime channel observes. Backed by a
//! `tokio::sync::watch` channel so observers see every identity change in
//! order, and see the gate itself going away when the session ends.

use crate::model::Identity;
use tokio::sync::watch;

/// Owner side of the identity signal.
///
/// Dropping the gate closes the signal, which observers treat as identity loss.
#[derive(Debug)]
pub struct AuthGate {
    current: watch::Sender<Option<Identity>>,
}

impl Default for AuthGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthGate {
    /// A gate with nobody signed in.
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    pub fn sign_in(&self, identity: Identity) {
        self.current.send_replace(Some(identity));
    }

    pub fn sign_out(&self) {
        self.current.send_replace(None);
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    /// Observer handle for the channel actor.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}
