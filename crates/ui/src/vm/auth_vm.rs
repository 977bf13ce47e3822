use services::{ApiError, AuthError};

const UNREACHABLE_BACKEND: &str = "Could not reach the server. Please try again.";
const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Text shown under the login and register forms.
#[must_use]
pub fn auth_error_message(err: &AuthError) -> String {
    match err {
        AuthError::Credentials(err) => err.to_string(),
        AuthError::Rejected(detail) => detail.clone(),
        AuthError::Api(ApiError::Network(_)) => UNREACHABLE_BACKEND.to_string(),
        _ => GENERIC_FAILURE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conceptly_core::model::CredentialsError;

    #[test]
    fn validation_and_backend_messages_pass_through() {
        let err = AuthError::Credentials(CredentialsError::PasswordMismatch);
        assert_eq!(auth_error_message(&err), "Passwords do not match");

        let err = AuthError::Rejected("Email already registered".into());
        assert_eq!(auth_error_message(&err), "Email already registered");

        let err = AuthError::Api(ApiError::Network("refused".into()));
        assert_eq!(auth_error_message(&err), UNREACHABLE_BACKEND);

        assert_eq!(auth_error_message(&AuthError::SignedOut), GENERIC_FAILURE);
    }
}
