//! services/app/src/adapters/identity.rs
//!
//! This module contains the identity adapter, which is the concrete
//! implementation of the `IdentityService` port from the `core` crate.
//! It speaks to the hosted backend's auth API over HTTP and owns the
//! local session value, broadcasting every change over a watch channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

use quotevault_core::domain::{Session, User};
use quotevault_core::ports::{IdentityService, PortError, PortResult, SessionStream};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `IdentityService` port against the hosted
/// backend's auth endpoints.
pub struct HttpIdentityAdapter {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    sessions: watch::Sender<Option<Session>>,
}

impl HttpIdentityAdapter {
    /// Creates a new `HttpIdentityAdapter` with no session established.
    pub fn new(http: reqwest::Client, base_url: String, api_key: String) -> Self {
        let (sessions, _) = watch::channel(None);
        Self {
            http,
            base_url,
            api_key,
            sessions,
        }
    }

    /// A receiver over the current session, for collaborators that need the
    /// access token on their own requests (e.g. the quote store adapter).
    pub fn watch_sessions(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }

    fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn publish(&self, session: Option<Session>) {
        self.sessions.send_replace(session);
    }
}

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Serialize)]
struct CredentialsPayload<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RecoverPayload<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct UserPayload {
    id: Uuid,
    email: Option<String>,
}

/// Sign-in always carries a token; sign-up only does when the backend is
/// configured to skip email confirmation.
#[derive(Deserialize)]
struct SessionPayload {
    access_token: Option<String>,
    user: Option<UserPayload>,
}

impl SessionPayload {
    fn into_session(self) -> Option<Session> {
        let access_token = self.access_token?;
        let user = self.user?;
        Some(Session {
            user_id: user.id,
            email: user.email,
            access_token,
        })
    }
}

/// The auth API is not consistent about which field carries the message.
#[derive(Deserialize, Default)]
struct AuthErrorPayload {
    error_description: Option<String>,
    msg: Option<String>,
    message: Option<String>,
}

impl AuthErrorPayload {
    fn message(self, status: reqwest::StatusCode) -> String {
        self.error_description
            .or(self.msg)
            .or(self.message)
            .unwrap_or_else(|| format!("authentication request failed ({status})"))
    }
}

/// Turn a non-success auth response into the server-provided message.
async fn auth_rejection(response: reqwest::Response) -> PortError {
    let status = response.status();
    let payload = response
        .json::<AuthErrorPayload>()
        .await
        .unwrap_or_default();
    PortError::Auth(payload.message(status))
}

fn transport_error(err: reqwest::Error) -> PortError {
    PortError::Unexpected(err.to_string())
}

//=========================================================================================
// `IdentityService` Trait Implementation
//=========================================================================================

#[async_trait]
impl IdentityService for HttpIdentityAdapter {
    async fn current_session(&self) -> PortResult<Option<Session>> {
        Ok(self.sessions.borrow().clone())
    }

    async fn current_user(&self) -> PortResult<Option<User>> {
        Ok(self.sessions.borrow().as_ref().map(|session| User {
            id: session.user_id,
            email: session.email.clone(),
        }))
    }

    fn session_changes(&self) -> SessionStream {
        let mut rx = self.sessions.subscribe();
        Box::pin(async_stream::stream! {
            while rx.changed().await.is_ok() {
                let session = rx.borrow_and_update().clone();
                yield session;
            }
        })
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> PortResult<()> {
        let response = self
            .http
            .post(self.auth_endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&CredentialsPayload { email, password })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(auth_rejection(response).await);
        }

        let payload = response
            .json::<SessionPayload>()
            .await
            .map_err(transport_error)?;
        let session = payload.into_session().ok_or_else(|| {
            PortError::Unexpected("sign-in response carried no session".to_string())
        })?;

        self.publish(Some(session));
        Ok(())
    }

    async fn sign_up(&self, email: &str, password: &str) -> PortResult<()> {
        let response = self
            .http
            .post(self.auth_endpoint("signup"))
            .header("apikey", &self.api_key)
            .json(&CredentialsPayload { email, password })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(auth_rejection(response).await);
        }

        let payload = response
            .json::<SessionPayload>()
            .await
            .map_err(transport_error)?;

        // With email confirmation enabled the account exists but no session
        // does yet; only publish when the backend actually signed us in.
        if let Some(session) = payload.into_session() {
            self.publish(Some(session));
        }
        Ok(())
    }

    async fn sign_out(&self) -> PortResult<()> {
        let Some(session) = self.sessions.borrow().clone() else {
            return Ok(());
        };

        let result = self
            .http
            .post(self.auth_endpoint("logout"))
            .header("apikey", &self.api_key)
            .bearer_auth(&session.access_token)
            .send()
            .await;

        // The local session is dropped regardless: the server-side token may
        // outlive us briefly, but this client is signed out.
        self.publish(None);

        if let Err(err) = result {
            warn!("Sign-out request failed after clearing local session: {err}");
        }
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str) -> PortResult<()> {
        let response = self
            .http
            .post(self.auth_endpoint("recover"))
            .header("apikey", &self.api_key)
            .json(&RecoverPayload { email })
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(auth_rejection(response).await);
        }
        Ok(())
    }
}
