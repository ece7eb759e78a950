//! services/app/src/screens/login.rs

use std::sync::Arc;

use quotevault_core::ports::IdentityService;

use crate::screens::ScreenError;

/// The sign-in form.
pub struct LoginScreen {
    identity: Arc<dyn IdentityService>,
}

impl LoginScreen {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    /// Submit the form. Empty fields are rejected before any request is
    /// made; an auth rejection carries the server's message.
    pub async fn submit(&self, email: &str, password: &str) -> Result<(), ScreenError> {
        if email.is_empty() || password.is_empty() {
            return Err(ScreenError::Validation(
                "Email and Password required".to_string(),
            ));
        }
        self.identity.sign_in_with_password(email, password).await?;
        Ok(())
    }
}
