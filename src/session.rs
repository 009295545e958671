//! Explicit session context passed to every service call.
//!
//! Identity is verified by the external provider; this module only maps a
//! verified email to a role and guards operations by role.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::types::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    /// Landing path for the role.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::User => "/user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub email: String,
    pub role: Role,
}

impl Session {
    /// Build a session for a verified email. Admins are listed in config.
    pub fn for_email(email: &str, config: &Config) -> Self {
        let email = email.trim().to_string();
        let is_admin = config
            .admin_emails
            .iter()
            .any(|admin| admin.trim().eq_ignore_ascii_case(&email));
        Self {
            email,
            role: if is_admin { Role::Admin } else { Role::User },
        }
    }

    pub fn require(&self, role: Role) -> Result<(), AccessError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AccessError::Forbidden {
                required: role,
                redirect_to: self.role,
            })
        }
    }
}

/// Guard for an optional session: missing sessions are sent to sign-in.
pub fn require_role(session: Option<&Session>, role: Role) -> Result<&Session, AccessError> {
    let session = session.ok_or(AccessError::NotSignedIn)?;
    session.require(role)?;
    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            admin_emails: vec!["Ops@Example.com".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_admin_email_match_is_case_insensitive() {
        let session = Session::for_email("ops@example.com", &config());
        assert_eq!(session.role, Role::Admin);
    }

    #[test]
    fn test_other_emails_are_users() {
        let session = Session::for_email("rep@example.com", &config());
        assert_eq!(session.role, Role::User);
    }

    #[test]
    fn test_require_wrong_role_redirects_home() {
        let session = Session::for_email("rep@example.com", &config());
        assert_eq!(
            session.require(Role::Admin),
            Err(AccessError::Forbidden {
                required: Role::Admin,
                redirect_to: Role::User,
            })
        );
        assert!(session.require(Role::User).is_ok());
    }

    #[test]
    fn test_missing_session_is_not_signed_in() {
        assert_eq!(require_role(None, Role::User), Err(AccessError::NotSignedIn));
    }
}
