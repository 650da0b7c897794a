//! Credentials, local validation and the outcome vocabulary of the
//! login/register handshake.

use std::fmt;

use thiserror::Error;

use crate::{Identity, Role, SessionToken};

/// Minimum password length accepted at registration, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Display name used when the user did not provide one.
pub const DEFAULT_DISPLAY_NAME: &str = "User";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
    Email,
    Password,
    ConfirmPassword,
    DisplayName,
    OrganizationName,
}

/// Form input. Empty strings stand for fields the user has not filled in.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub display_name: String,
    pub organization_name: String,
}

impl Credentials {
    pub fn login(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    pub fn set(&mut self, field: AuthField, value: String) {
        match field {
            AuthField::Email => self.email = value,
            AuthField::Password => self.password = value,
            AuthField::ConfirmPassword => self.confirm_password = value,
            AuthField::DisplayName => self.display_name = value,
            AuthField::OrganizationName => self.organization_name = value,
        }
    }

    /// Trimmed display name, or [`DEFAULT_DISPLAY_NAME`].
    pub fn display_name_or_default(&self) -> String {
        let name = self.display_name.trim();
        if name.is_empty() {
            DEFAULT_DISPLAY_NAME.to_string()
        } else {
            name.to_string()
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("organization_name", &self.organization_name)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Full name is required")]
    NameRequired,
    #[error("Hospital/Clinic name is required")]
    OrganizationRequired,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least 8 characters long")]
    PasswordTooShort,
}

/// Registration pre-flight checks, in order: name, organization, password
/// match, password length. Stops at the first failure.
pub fn validate_registration(credentials: &Credentials) -> Result<(), ValidationError> {
    if credentials.display_name.trim().is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if credentials.organization_name.trim().is_empty() {
        return Err(ValidationError::OrganizationRequired);
    }
    if credentials.password != credentials.confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// One login or registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthRequest {
    pub mode: AuthMode,
    pub role: Role,
    pub credentials: Credentials,
}

#[derive(Clone, PartialEq, Eq)]
pub struct AuthSuccess {
    pub role: Role,
    pub email: String,
    pub session_token: Option<SessionToken>,
    pub display_name: String,
}

impl AuthSuccess {
    pub fn into_identity(self) -> Identity {
        Identity {
            role: self.role,
            display_name: self.display_name,
            email: self.email,
            session_token: self.session_token,
        }
    }
}

impl fmt::Debug for AuthSuccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthSuccess")
            .field("role", &self.role)
            .field("email", &self.email)
            .field("session_token", &self.session_token)
            .field("display_name", &self.display_name)
            .finish()
    }
}

/// Every variant displays as the single message shown under the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Local pre-flight failure; the network was never contacted.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// The server rejected the credentials or the account already exists.
    #[error("{0}")]
    Rejected(String),
    /// Network failure, timeout or an unreadable response.
    #[error("{0}")]
    Transport(String),
}

pub type AuthResult = Result<AuthSuccess, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Credentials {
        Credentials {
            email: "asha@example.com".to_string(),
            password: "password1".to_string(),
            confirm_password: "password1".to_string(),
            display_name: "Sita".to_string(),
            organization_name: "PHC Rampur".to_string(),
        }
    }

    #[test]
    fn complete_registration_passes() {
        assert_eq!(validate_registration(&registration()), Ok(()));
    }

    #[test]
    fn checks_short_circuit_in_order() {
        let mut creds = registration();
        creds.display_name = "   ".to_string();
        creds.organization_name.clear();
        creds.confirm_password = "different".to_string();
        assert_eq!(validate_registration(&creds), Err(ValidationError::NameRequired));

        creds.display_name = "Sita".to_string();
        assert_eq!(
            validate_registration(&creds),
            Err(ValidationError::OrganizationRequired)
        );

        creds.organization_name = "PHC".to_string();
        assert_eq!(
            validate_registration(&creds),
            Err(ValidationError::PasswordMismatch)
        );
    }

    #[test]
    fn password_length_boundary() {
        let mut creds = registration();
        creds.password = "1234567".to_string();
        creds.confirm_password = creds.password.clone();
        assert_eq!(
            validate_registration(&creds),
            Err(ValidationError::PasswordTooShort)
        );

        creds.password = "12345678".to_string();
        creds.confirm_password = creds.password.clone();
        assert_eq!(validate_registration(&creds), Ok(()));
    }

    #[test]
    fn password_length_counts_characters_not_bytes() {
        let mut creds = registration();
        creds.password = "पासवर्डअभी".to_string();
        creds.confirm_password = creds.password.clone();
        assert!(creds.password.chars().count() >= MIN_PASSWORD_LENGTH);
        assert_eq!(validate_registration(&creds), Ok(()));

        creds.password = "ééééééé".to_string();
        creds.confirm_password = creds.password.clone();
        assert_eq!(
            validate_registration(&creds),
            Err(ValidationError::PasswordTooShort)
        );
    }

    #[test]
    fn auth_error_displays_user_message() {
        let err = AuthError::from(ValidationError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match");
        assert_eq!(
            AuthError::Rejected("User already exists".into()).to_string(),
            "User already exists"
        );
    }

    #[test]
    fn credentials_debug_redacts_passwords() {
        let rendered = format!("{:?}", registration());
        assert!(!rendered.contains("password1"));
    }
}
