//! Mock member session.
//!
//! A single [`SessionStore`] holds at most one logged-in member. It is created by the service
//! wiring and shared through an `Arc`, so every component that needs membership status receives
//! it explicitly instead of reaching for process-wide state.

use std::sync::RwLock;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

/// Account that signs in with the administrator profile.
pub const ADMIN_EMAIL: &str = "admin@donapina.coop";
/// Account that signs in without cooperative membership.
pub const NON_MEMBER_EMAIL: &str = "noSocio@example.com";

/// Logged-in member record shared by the dashboard and the loan form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub is_member: bool,
    pub is_admin: bool,
}

impl MemberProfile {
    /// Profile the mocked authentication hands out for `email`.
    pub fn mock_for(email: &str) -> Self {
        let email = email.trim();
        let is_admin = email.eq_ignore_ascii_case(ADMIN_EMAIL);
        let name = if is_admin {
            "Administrator"
        } else {
            "Demo User"
        };

        Self {
            id: "1".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            is_member: !email.eq_ignore_ascii_case(NON_MEMBER_EMAIL),
            is_admin,
        }
    }

    pub const fn membership_label(&self) -> &'static str {
        if self.is_member {
            "member"
        } else {
            "non_member"
        }
    }
}

/// Errors raised by the session store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("email and password are required and the email must contain '@'")]
    InvalidCredentials,
    #[error("no member is logged in")]
    NotAuthenticated,
}

/// Holds the single current-member record for the lifetime of a login.
#[derive(Debug)]
pub struct SessionStore {
    current: RwLock<Option<MemberProfile>>,
    login_delay: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

impl SessionStore {
    pub fn new(login_delay: Duration) -> Self {
        Self {
            current: RwLock::new(None),
            login_delay,
        }
    }

    /// Authenticate against the mock directory, replacing any existing session.
    pub async fn login(&self, email: &str, password: &str) -> Result<MemberProfile, SessionError> {
        validate_credentials(email, password)?;

        tokio::time::sleep(self.login_delay).await;

        let profile = MemberProfile::mock_for(email);
        *self.current.write().expect("session lock poisoned") = Some(profile.clone());

        info!(
            member = %profile.email,
            is_member = profile.is_member,
            is_admin = profile.is_admin,
            "member session established"
        );
        Ok(profile)
    }

    /// Destroy the current session. Returns the profile that was logged out, if any.
    pub fn logout(&self) -> Option<MemberProfile> {
        let previous = self.current.write().expect("session lock poisoned").take();
        if let Some(profile) = &previous {
            info!(member = %profile.email, "member session closed");
        }
        previous
    }

    pub fn current(&self) -> Option<MemberProfile> {
        self.current.read().expect("session lock poisoned").clone()
    }

    /// Guard for member-only pages.
    pub fn require_member(&self) -> Result<MemberProfile, SessionError> {
        self.current().ok_or(SessionError::NotAuthenticated)
    }

    /// Membership flag of the logged-in member; `None` when nobody is logged in.
    pub fn is_member(&self) -> Option<bool> {
        self.current().map(|profile| profile.is_member)
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), SessionError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') || password.is_empty() {
        return Err(SessionError::InvalidCredentials);
    }
    Ok(())
}
