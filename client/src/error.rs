use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Auth provider failure codes as they appear on the wire.
///
/// Unknown codes decode to `Other`, so a provider rolling out new codes
/// degrades to the generic banner instead of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthError {
    #[error("no account matches this email")]
    UserNotFound,
    #[error("wrong password")]
    WrongPassword,
    #[error("email already registered")]
    EmailAlreadyInUse,
    #[error("password below minimum length")]
    WeakPassword,
    #[error("malformed email address")]
    InvalidEmail,
    #[error("too many failed attempts")]
    TooManyRequests,
    #[error("auth service failure")]
    #[serde(other)]
    Other,
}

impl AuthError {
    /// Fixed banner text per failure code.
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::UserNotFound => "No account found with this email address.",
            AuthError::WrongPassword => "Incorrect password. Please try again.",
            AuthError::EmailAlreadyInUse => "An account with this email already exists.",
            AuthError::WeakPassword => "Password should be at least 6 characters long.",
            AuthError::InvalidEmail => "Please enter a valid email address.",
            AuthError::TooManyRequests => "Too many failed attempts. Please try again later.",
            AuthError::Other => "An error occurred. Please try again.",
        }
    }
}

/// Store failure codes as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreError {
    #[error("write denied by store rules")]
    PermissionDenied,
    #[error("store unreachable")]
    Unavailable,
    #[error("backend not configured")]
    NotConfigured,
    #[error("store failure")]
    #[serde(other)]
    Other,
}

impl StoreError {
    /// Alert suffix; the caller prepends the action ("Failed to send
    /// message. " and so on).
    pub fn user_message(&self) -> &'static str {
        match self {
            StoreError::PermissionDenied => "Please check the data store's security rules.",
            StoreError::Unavailable => "Please check your internet connection.",
            StoreError::NotConfigured => "The backend is not configured yet.",
            StoreError::Other => "Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_decode_from_the_wire() {
        let decode = |s: &str| serde_json::from_value::<AuthError>(serde_json::json!(s)).unwrap();
        assert_eq!(decode("user-not-found"), AuthError::UserNotFound);
        assert_eq!(decode("wrong-password"), AuthError::WrongPassword);
        assert_eq!(decode("email-already-in-use"), AuthError::EmailAlreadyInUse);
        assert_eq!(decode("weak-password"), AuthError::WeakPassword);
        assert_eq!(decode("invalid-email"), AuthError::InvalidEmail);
        assert_eq!(decode("too-many-requests"), AuthError::TooManyRequests);
    }

    #[test]
    fn unknown_codes_fall_back_to_other() {
        let auth: AuthError = serde_json::from_value(serde_json::json!("quota-exceeded")).unwrap();
        assert_eq!(auth, AuthError::Other);
        let store: StoreError = serde_json::from_value(serde_json::json!("aborted")).unwrap();
        assert_eq!(store, StoreError::Other);
    }

    #[test]
    fn every_auth_code_has_its_banner_text() {
        assert_eq!(
            AuthError::UserNotFound.user_message(),
            "No account found with this email address."
        );
        assert_eq!(
            AuthError::WeakPassword.user_message(),
            "Password should be at least 6 characters long."
        );
        assert_eq!(
            AuthError::TooManyRequests.user_message(),
            "Too many failed attempts. Please try again later."
        );
        assert_eq!(
            AuthError::Other.user_message(),
            "An error occurred. Please try again."
        );
    }

    #[test]
    fn store_messages_are_alert_suffixes() {
        assert_eq!(
            StoreError::Unavailable.user_message(),
            "Please check your internet connection."
        );
        assert_eq!(StoreError::Other.user_message(), "Please try again.");
    }
}
