//! services/app/src/screens/signup.rs

use std::sync::Arc;

use quotevault_core::ports::IdentityService;

use crate::screens::ScreenError;

/// The account creation form.
pub struct SignupScreen {
    identity: Arc<dyn IdentityService>,
}

impl SignupScreen {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        Self { identity }
    }

    /// Submit the form. Whether a session is established immediately
    /// depends on the backend's email confirmation settings; the gate
    /// reacts either way through its subscription.
    pub async fn submit(&self, email: &str, password: &str) -> Result<(), ScreenError> {
        if email.is_empty() || password.is_empty() {
            return Err(ScreenError::Validation(
                "Email and Password required".to_string(),
            ));
        }
        self.identity.sign_up(email, password).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::tests::ScriptedIdentity;
    use quotevault_core::ports::PortError;

    #[tokio::test]
    async fn empty_fields_are_rejected() {
        let screen = SignupScreen::new(Arc::new(ScriptedIdentity::default()));
        let err = screen.submit("reader@vault.test", "").await.unwrap_err();
        assert!(matches!(err, ScreenError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_account_message_is_surfaced() {
        let identity = Arc::new(ScriptedIdentity::rejecting(PortError::Auth(
            "User already registered".to_string(),
        )));
        let screen = SignupScreen::new(identity);

        let err = screen
            .submit("reader@vault.test", "hunter2")
            .await
            .unwrap_err();
        assert!(matches!(err, ScreenError::Rejected(m) if m == "User already registered"));
    }
}
