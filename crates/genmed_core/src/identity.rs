use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Who is using the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Doctor,
    /// ASHA worker.
    CommunityHealthWorker,
    Guest,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Doctor, Role::CommunityHealthWorker, Role::Guest];

    /// Role tag understood by the registration endpoint. Anything that is not
    /// a doctor registers as a health worker.
    pub fn api_tag(self) -> &'static str {
        match self {
            Role::Doctor => "doctor",
            Role::CommunityHealthWorker | Role::Guest => "asha",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Doctor => "Doctor",
            Role::CommunityHealthWorker => "ASHA Worker",
            Role::Guest => "Guest",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role tag '{0}' (expected doctor, asha or guest)")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "doctor" => Ok(Role::Doctor),
            "asha" | "chw" | "community_health_worker" => Ok(Role::CommunityHealthWorker),
            "guest" => Ok(Role::Guest),
            _ => Err(UnknownRole(raw.to_string())),
        }
    }
}

/// Bearer credentials issued by a successful login.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub access_token: String,
    pub token_type: String,
}

impl SessionToken {
    pub fn new(access_token: impl Into<String>, token_type: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: token_type.into(),
        }
    }

    /// Value for the `Authorization` header, e.g. `bearer abc`.
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// The authenticated (or guest) user behind the current session.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    pub role: Role,
    pub display_name: String,
    /// Empty for guests.
    pub email: String,
    /// Absent for guests and freshly registered accounts.
    pub session_token: Option<SessionToken>,
}

impl Identity {
    pub fn guest() -> Self {
        Self {
            role: Role::Guest,
            display_name: "Guest".to_string(),
            email: String::new(),
            session_token: None,
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("role", &self.role)
            .field("display_name", &self.display_name)
            .field("email", &self.email)
            .field("session_token", &self.session_token)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.identity.is_none()
    }

    pub(crate) fn establish(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    pub(crate) fn clear(&mut self) {
        self.identity = None;
    }

    pub(crate) fn identity_mut(&mut self) -> Option<&mut Identity> {
        self.identity.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tags_parse_case_insensitively() {
        assert_eq!("Doctor".parse::<Role>(), Ok(Role::Doctor));
        assert_eq!(" ASHA ".parse::<Role>(), Ok(Role::CommunityHealthWorker));
        assert_eq!("chw".parse::<Role>(), Ok(Role::CommunityHealthWorker));
        assert_eq!("guest".parse::<Role>(), Ok(Role::Guest));
    }

    #[test]
    fn unknown_role_tag_is_rejected() {
        let err = "nurse".parse::<Role>().unwrap_err();
        assert_eq!(err, UnknownRole("nurse".to_string()));
    }

    #[test]
    fn registration_tags_match_backend_vocabulary() {
        assert_eq!(Role::Doctor.api_tag(), "doctor");
        assert_eq!(Role::CommunityHealthWorker.api_tag(), "asha");
    }

    #[test]
    fn debug_output_hides_session_token() {
        let identity = Identity {
            role: Role::Doctor,
            display_name: "Dr. Rao".to_string(),
            email: "rao@example.com".to_string(),
            session_token: Some(SessionToken::new("secret-token", "bearer")),
        };
        let rendered = format!("{identity:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn authorization_header_joins_type_and_token() {
        let token = SessionToken::new("abc", "bearer");
        assert_eq!(token.authorization_header(), "bearer abc");
    }
}
