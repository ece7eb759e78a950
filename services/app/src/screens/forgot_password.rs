//! services/app/src/screens/forgot_password.rs

use std::sync::Arc;

use quotevault_core::ports::IdentityService;

use crate::screens::ScreenError;

/// The password reset form.
pub struct ForgotPasswordScreen {
    identity: Arc<dyn IdentityService>,
}

impl ForgotPasswordScreen {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    /// Request a reset link for `email`.
    pub async fn submit(&self, email: &str) -> Result<(), ScreenError> {
        if email.is_empty() {
            return Err(ScreenError::Validation("Please enter email".to_string()));
        }
        self.identity.reset_password_for_email(email).await?;
        Ok(())
    }
}
