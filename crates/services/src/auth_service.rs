use std::sync::Arc;

use tracing::{debug, info, warn};

use conceptly_core::model::{Credentials, Registration, UserProfile};
use storage::repository::TokenRepository;

use crate::Clock;
use crate::api::ConceptlyApi;
use crate::error::{ApiError, AuthError};

/// Sign-in state: exchanges credentials for tokens, keeps the pair on disk
/// and installs the access token in the API client.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    api: Arc<dyn ConceptlyApi>,
    tokens: Arc<dyn TokenRepository>,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, api: Arc<dyn ConceptlyApi>, tokens: Arc<dyn TokenRepository>) -> Self {
        Self { clock, api, tokens }
    }

    /// Sign in and persist the issued token pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credentials` for blank input, `AuthError::Rejected`
    /// with the backend message for refused credentials, or storage/API errors.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), AuthError> {
        let credentials = Credentials::new(email, password)?;
        self.login_with(&credentials).await
    }

    /// Create an account, then sign in with it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credentials` when the form is invalid and
    /// `AuthError::Rejected` when the backend refuses the account.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), AuthError> {
        let registration = Registration::new(name, email, password, confirm)?;
        self.api
            .register(&registration)
            .await
            .map_err(rejection)?;
        info!(email = registration.credentials().email(), "account registered");
        self.login_with(registration.credentials()).await
    }

    /// Reinstall a persisted token pair and check it against the backend.
    ///
    /// Returns `Ok(None)` when nothing is stored or the backend refuses the
    /// token; the stale pair is cleared in the latter case.
    ///
    /// # Errors
    ///
    /// Returns storage errors, or API errors other than an authorization failure.
    pub async fn restore(&self) -> Result<Option<UserProfile>, AuthError> {
        let Some(stored) = self.tokens.load_tokens().await? else {
            debug!("no stored session");
            return Ok(None);
        };
        self.api
            .set_access_token(Some(stored.tokens.access_token.clone()));

        match self.api.profile().await {
            Ok(profile) => {
                info!(saved_at = %stored.saved_at, "restored stored session");
                Ok(Some(profile))
            }
            Err(err) if err.is_unauthorized() => {
                warn!("stored token was rejected, signing out");
                self.api.set_access_token(None);
                self.tokens.clear_tokens().await?;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Forget the token pair, both in memory and on disk.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the stored pair cannot be removed.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.api.set_access_token(None);
        self.tokens.clear_tokens().await?;
        info!("signed out");
        Ok(())
    }

    /// Profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::SignedOut` when the backend refuses the token.
    pub async fn profile(&self) -> Result<UserProfile, AuthError> {
        self.api.profile().await.map_err(|err| {
            if err.is_unauthorized() {
                AuthError::SignedOut
            } else {
                AuthError::Api(err)
            }
        })
    }

    async fn login_with(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let tokens = self.api.login(credentials).await.map_err(rejection)?;
        self.tokens.save_tokens(&tokens, self.clock.now()).await?;
        self.api.set_access_token(Some(tokens.access_token));
        info!(email = credentials.email(), "signed in");
        Ok(())
    }
}

/// Backend refusals carry a message meant for the user.
fn rejection(err: ApiError) -> AuthError {
    match err {
        ApiError::Rejected {
            detail: Some(detail),
            ..
        } => AuthError::Rejected(detail),
        other => AuthError::Api(other),
    }
}
