//! Session lifecycle notifications.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

/// A change in the session's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A login succeeded and credentials were stored.
    LoggedIn,
    /// The credential pair was replaced after a refresh.
    Refreshed,
    /// The user logged out.
    LoggedOut,
    /// The session ended without the user asking; a new login is required.
    Invalidated {
        /// Why the session ended.
        reason: String,
    },
}

/// Broadcast channel for [`SessionEvent`]s.
///
/// The presentation layer subscribes and navigates to the login screen on
/// [`SessionEvent::Invalidated`].
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    /// Creates a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribes to events emitted from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Emits an event. Having no subscribers is not an error.
    pub fn emit(&self, event: SessionEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
