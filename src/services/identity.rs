// src/services/identity.rs

use tokio::sync::watch;

use crate::models::participant::Session;

/// Emits the current session (or `None`) and every later change.
pub trait IdentityProvider: Send + Sync {
    fn subscribe(&self) -> watch::Receiver<Option<Session>>;
}

/// Identity provider backed by a watch channel.
///
/// The HTTP layer builds one per request from the bearer token; long-lived
/// callers keep it and push sign-in/sign-out events through it.
#[derive(Debug)]
pub struct SessionChannel {
    sender: watch::Sender<Option<Session>>,
}

impl SessionChannel {
    pub fn new(initial: Option<Session>) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn sign_in(&self, session: Session) {
        self.sender.send_replace(Some(session));
    }

    pub fn sign_out(&self) {
        self.sender.send_replace(None);
    }
}

impl IdentityProvider for SessionChannel {
    fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.sender.subscribe()
    }
}
