//! services/app/src/screens/mod.rs
//!
//! Headless screen controllers: input validation plus port calls, no
//! rendering. The Home screen has no controller here; it is the
//! `QuoteFeed` from the core crate.

pub mod favorites;
pub mod forgot_password;
pub mod login;
pub mod profile;
pub mod signup;

pub use favorites::FavoritesScreen;
pub use forgot_password::ForgotPasswordScreen;
pub use login::LoginScreen;
pub use profile::{ProfileForm, ProfileScreen};
pub use signup::SignupScreen;

use quotevault_core::ports::PortError;

/// A user-visible screen failure, shown inline on the screen that
/// initiated the action. Never retried automatically.
#[derive(Debug, thiserror::Error)]
pub enum ScreenError {
    /// Input rejected locally before any request was made.
    #[error("{0}")]
    Validation(String),
    /// The backend rejected the action; carries the server message.
    #[error("{0}")]
    Rejected(String),
}

impl From<PortError> for ScreenError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::Auth(message) => ScreenError::Rejected(message),
            other => ScreenError::Rejected(other.to_string()),
        }
    }
}
