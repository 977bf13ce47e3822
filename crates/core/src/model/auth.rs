use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TutorMode;

/// Bearer token pair issued at login. The only state persisted on the client.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
}

impl AuthTokens {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Debug for AuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthTokens")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .finish()
    }
}

/// Signed-in learner as reported by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub tutor_mode: String,
    #[serde(default)]
    pub xp: u32,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

impl UserProfile {
    /// Selected tutor personality; unknown or missing values fall back to the default.
    #[must_use]
    pub fn mode(&self) -> TutorMode {
        self.tutor_mode.parse().unwrap_or(TutorMode::DEFAULT)
    }

    /// XP needed to reach the next level (100 per level).
    #[must_use]
    pub fn xp_for_next_level(&self) -> u32 {
        self.level.max(1) * 100
    }

    /// Progress within the current level in percent.
    #[must_use]
    pub fn level_progress_percent(&self) -> u32 {
        let span = self.xp_for_next_level();
        (self.xp % span) * 100 / span
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CredentialsError {
    #[error("All fields are required")]
    MissingField,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("Password must be less than {max} characters")]
    PasswordTooLong { max: usize },
    #[error("Password must contain letters and numbers")]
    PasswordTooWeak,
}

const MIN_PASSWORD_CHARS: usize = 6;
const MAX_PASSWORD_CHARS: usize = 72;
const PASSWORD_SYMBOLS: &str = "@$!%*#?&";

/// Email + password pair for signing in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    /// # Errors
    ///
    /// Returns `CredentialsError::MissingField` when either value is blank.
    pub fn new(email: &str, password: &str) -> Result<Self, CredentialsError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(CredentialsError::MissingField);
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated sign-up form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    credentials: Credentials,
}

impl Registration {
    /// Validate the sign-up form the same way the backend expects it.
    ///
    /// # Errors
    ///
    /// Returns the first `CredentialsError` that applies.
    pub fn new(
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Self, CredentialsError> {
        let name = name.trim();
        let password = password.trim();
        let confirm = confirm.trim();
        if name.is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(CredentialsError::MissingField);
        }
        if password != confirm {
            return Err(CredentialsError::PasswordMismatch);
        }
        let len = password.chars().count();
        if len < MIN_PASSWORD_CHARS {
            return Err(CredentialsError::PasswordTooShort {
                min: MIN_PASSWORD_CHARS,
            });
        }
        if len > MAX_PASSWORD_CHARS {
            return Err(CredentialsError::PasswordTooLong {
                max: MAX_PASSWORD_CHARS,
            });
        }
        let allowed = password
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
        let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
        let has_digit = password.chars().any(|c| c.is_ascii_digit());
        if !(allowed && has_letter && has_digit) {
            return Err(CredentialsError::PasswordTooWeak);
        }

        Ok(Self {
            name: name.to_string(),
            credentials: Credentials::new(email, password)?,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}
