//! services/app/src/screens/profile.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use quotevault_core::domain::Profile;
use quotevault_core::ports::{IdentityService, QuoteStore};

use crate::screens::ScreenError;

/// The editable fields of the profile form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub name: String,
    pub avatar_url: String,
}

/// The profile editor.
pub struct ProfileScreen {
    identity: Arc<dyn IdentityService>,
    store: Arc<dyn QuoteStore>,
}

impl ProfileScreen {
    pub fn new(identity: Arc<dyn IdentityService>, store: Arc<dyn QuoteStore>) -> Self {
        Self { identity, store }
    }

    /// Load the current user's profile into the form. An absent session or
    /// a fetch failure both yield an empty form.
    pub async fn load(&self) -> ProfileForm {
        let user = match self.identity.current_user().await {
            Ok(Some(user)) => user,
            _ => return ProfileForm::default(),
        };

        match self.store.fetch_profile(user.id).await {
            Ok(Some(profile)) => ProfileForm {
                name: profile.name,
                avatar_url: profile.avatar_url,
            },
            Ok(None) => ProfileForm::default(),
            Err(err) => {
                warn!("Profile fetch failed: {err}");
                ProfileForm::default()
            }
        }
    }

    /// Upsert the form. Without a session this is a silent no-op; a
    /// rejected upsert surfaces its message to the screen.
    pub async fn save(&self, form: &ProfileForm) -> Result<(), ScreenError> {
        let user = match self.identity.current_user().await {
            Ok(Some(user)) => user,
            _ => return Ok(()),
        };

        let profile = Profile {
            id: user.id,
            name: form.name.clone(),
            avatar_url: form.avatar_url.clone(),
            updated_at: Utc::now(),
        };
        self.store.upsert_profile(&profile).await?;
        Ok(())
    }

    /// Sign the user out. The gate picks the transition up through its
    /// subscription.
    pub async fn logout(&self) -> Result<(), ScreenError> {
        self.identity.sign_out().await?;
        Ok(())
    }
}
