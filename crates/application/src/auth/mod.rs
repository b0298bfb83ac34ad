//! Session authentication: credential storage, the refreshing client and
//! login/logout.

mod client;
mod events;
mod session;
mod token_store;

pub use client::AuthenticatedClient;
pub use events::{SessionEvent, SessionEvents};
pub use session::Session;
pub use token_store::TokenStore;
