//! crates/quotevault_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the
//! core to be independent of the hosted identity/data backend that actually
//! serves the requests.

use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;
use uuid::Uuid;

use crate::domain::{FeedFilter, PageRange, Profile, Quote, QuoteId, Session, User};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from the external backend
/// (HTTP status codes, transport failures, malformed payloads).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Asynchronous session-change notifications.
///
/// Each item fully replaces the previously observed session value.
/// Dropping the stream unsubscribes; no further notifications are delivered.
pub type SessionStream = Pin<Box<dyn Stream<Item = Option<Session>> + Send>>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The external identity provider.
///
/// The core only ever observes session state through this port; sign-in,
/// sign-up and sign-out are the only mutations, and they happen server-side.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// The session as currently known, without touching the network.
    async fn current_session(&self) -> PortResult<Option<Session>>;

    /// The user behind the current session, if any.
    async fn current_user(&self) -> PortResult<Option<User>>;

    /// Register for session-change notifications.
    fn session_changes(&self) -> SessionStream;

    /// Rejections carry the server-provided message as `PortError::Auth`.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> PortResult<()>;

    /// Depending on backend settings this may or may not establish a session
    /// immediately (email confirmation flows).
    async fn sign_up(&self, email: &str, password: &str) -> PortResult<()>;

    async fn sign_out(&self) -> PortResult<()>;

    async fn reset_password_for_email(&self, email: &str) -> PortResult<()>;
}

/// The external quote/favorite/profile store.
#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// One window of the quote listing, ordered by creation time descending,
    /// narrowed by the filter's category (unless "All") and by a
    /// case-insensitive substring match on text OR author (when a search
    /// term is present).
    async fn fetch_quotes(&self, filter: &FeedFilter, range: PageRange) -> PortResult<Vec<Quote>>;

    /// The full, unfiltered, unpaginated quote set (quote-of-the-day input).
    async fn fetch_all_quotes(&self) -> PortResult<Vec<Quote>>;

    /// Ids of every quote the user has favorited.
    async fn favorite_ids(&self, user_id: Uuid) -> PortResult<Vec<QuoteId>>;

    /// The user's favorites projected onto full quote records, most recently
    /// favorited first.
    async fn favorite_quotes(&self, user_id: Uuid) -> PortResult<Vec<Quote>>;

    async fn add_favorite(&self, user_id: Uuid, quote_id: QuoteId) -> PortResult<()>;

    async fn remove_favorite(&self, user_id: Uuid, quote_id: QuoteId) -> PortResult<()>;

    async fn fetch_profile(&self, user_id: Uuid) -> PortResult<Option<Profile>>;

    async fn upsert_profile(&self, profile: &Profile) -> PortResult<()>;
}
