use crate::error::{Result, SharedError};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

lazy_static! {
    /// Lowercase alphanumerics and dashes, starting with an alphanumeric.
    pub static ref TENANT_SLUG_RE: Regex = Regex::new(r"^[a-z0-9][a-z0-9-]{0,62}$").unwrap();
}

/// Checks a tenant slug before it is sent as the tenant header.
pub fn validate_tenant_slug(slug: &str) -> Result<()> {
    if TENANT_SLUG_RE.is_match(slug) {
        Ok(())
    } else {
        Err(SharedError::InvalidTenantSlug(slug.to_string()))
    }
}

/// Account role inside a tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Developer,
    Admin,
    Student,
    Owner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Developer => "DEVELOPER",
            Role::Admin => "ADMIN",
            Role::Student => "STUDENT",
            Role::Owner => "OWNER",
        }
    }

    /// Dashboard a user lands on after login.
    pub fn home_route(&self) -> &'static str {
        match self {
            Role::Developer => "/developer",
            Role::Admin => "/admin",
            Role::Student => "/student",
            Role::Owner => "/owner",
        }
    }

    /// Whether the role sees the academy management navigation.
    pub fn is_staff(&self) -> bool {
        match self {
            Role::Developer | Role::Admin | Role::Owner => true,
            Role::Student => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "DEVELOPER" => Ok(Role::Developer),
            "ADMIN" => Ok(Role::Admin),
            "STUDENT" => Ok(Role::Student),
            "OWNER" => Ok(Role::Owner),
            _ => Err(SharedError::UnknownRole(s.to_string())),
        }
    }
}

/// The authenticated user as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,

    #[validate(length(min = 1, max = 100))]
    pub login_id: String,

    #[validate(length(min = 1, max = 100))]
    pub name: String,

    pub role: Role,

    #[validate(regex = "TENANT_SLUG_RE")]
    pub tenant_slug: String,

    pub tenant_id: i64,
}

impl User {
    /// Validates the user's data, including the tenant slug that will be
    /// stored and sent with later requests.
    pub fn validate_fields(&self) -> Result<()> {
        self.validate()
            .map_err(|e| SharedError::Validation(e.to_string()))
    }
}

/// Client-held record of who is signed in.
///
/// `is_authenticated` always mirrors whether a user is present. The record
/// is (de)serialized through [`SessionRecord`] so a persisted flag that
/// disagrees with its user cannot survive a reload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "SessionRecord", into = "SessionRecord")]
pub struct Session {
    user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn authenticated(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn tenant_slug(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.tenant_slug.as_str())
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// Persisted shape of a [`Session`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub user: Option<User>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl From<SessionRecord> for Session {
    fn from(record: SessionRecord) -> Self {
        Self { user: record.user }
    }
}

impl From<Session> for SessionRecord {
    fn from(session: Session) -> Self {
        let is_authenticated = session.is_authenticated();
        Self {
            user: session.user,
            is_authenticated,
        }
    }
}
