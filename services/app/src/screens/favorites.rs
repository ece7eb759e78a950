//! services/app/src/screens/favorites.rs

use std::sync::Arc;

use tracing::warn;

use quotevault_core::domain::Quote;
use quotevault_core::ports::{IdentityService, QuoteStore};

/// The full-favorites listing, most recently favorited first.
pub struct FavoritesScreen {
    identity: Arc<dyn IdentityService>,
    store: Arc<dyn QuoteStore>,
}

impl FavoritesScreen {
    pub fn new(identity: Arc<dyn IdentityService>, store: Arc<dyn QuoteStore>) -> Self {
        Self { identity, store }
    }

    /// Load the list. An absent session or a failed fetch both render as an
    /// empty list; the screen never errors.
    pub async fn load(&self) -> Vec<Quote> {
        let user = match self.identity.current_user().await {
            Ok(Some(user)) => user,
            _ => return Vec::new(),
        };

        match self.store.favorite_quotes(user.id).await {
            Ok(quotes) => quotes,
            Err(err) => {
                warn!("Favorites fetch failed: {err}");
                Vec::new()
            }
        }
    }
}
