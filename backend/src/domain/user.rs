//! User account model.
//!
//! Accounts cover both staff (reception, technicians, admins) and customers.
//! The `password` field is an opaque credential hash owned by the external
//! sign-in flow; it is persisted but must never reach a public projection —
//! inbound adapters serialize [`PublicUser`](crate::inbound::http::users)
//! views, not this aggregate.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::role::Role;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Email was empty or not of the basic `local@domain.tld` shape.
    #[error("email is not valid")]
    InvalidEmail,
    /// Fullname shorter than the minimum.
    #[error("fullname must be at least {min} characters")]
    FullnameTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// Fullname longer than the maximum.
    #[error("fullname must be at most {max} characters")]
    FullnameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Stable account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Accepts any address with a plausible local@domain.tld shape.
        let pattern = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Validated email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        if !email_regex().is_match(&value) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value))
    }

    /// Borrow the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum accepted fullname length.
pub const FULLNAME_MIN: usize = 3;
/// Maximum accepted fullname length.
pub const FULLNAME_MAX: usize = 50;

/// Validated display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fullname(String);

impl Fullname {
    /// Validate and construct a [`Fullname`].
    pub fn new(value: impl Into<String>) -> Result<Self, UserValidationError> {
        let value = value.into();
        let length = value.trim().chars().count();
        if length < FULLNAME_MIN {
            return Err(UserValidationError::FullnameTooShort { min: FULLNAME_MIN });
        }
        if length > FULLNAME_MAX {
            return Err(UserValidationError::FullnameTooLong { max: FULLNAME_MAX });
        }
        Ok(Self(value))
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Fullname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Fullname> for String {
    fn from(value: Fullname) -> Self {
        value.0
    }
}

impl TryFrom<String> for Fullname {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Account activity state, in the store's historical Spanish wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AccountStatus {
    /// Account in good standing.
    #[serde(rename = "activo")]
    Active,
    /// Account disabled by the owner.
    #[serde(rename = "inactivo")]
    Inactive,
    /// Account disabled by an administrator.
    #[serde(rename = "suspendido")]
    Suspended,
}

/// User account aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable account identifier.
    pub id: UserId,
    /// Unique sign-in address.
    pub email: Email,
    /// Display name.
    pub fullname: Fullname,
    /// Account role; assigned at creation, changed only administratively.
    pub role: Role,
    /// Opaque credential hash from the external sign-in flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Sign-in provider ("credentials" or an OAuth provider name).
    pub provider: String,
    /// OAuth subject identifier when the account was linked to Google.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    /// Avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Country of residence.
    #[serde(default)]
    pub country: String,
    /// State or province.
    #[serde(default)]
    pub state: String,
    /// City or locality.
    #[serde(default)]
    pub locality: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// WhatsApp contact number.
    #[serde(default)]
    pub whatsapp: String,
    /// Postal code.
    #[serde(default)]
    pub postalcode: String,
    /// Account activity state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Construct a minimal account with empty profile fields.
    #[must_use]
    pub fn new(email: Email, fullname: Fullname, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::random(),
            email,
            fullname,
            role,
            password: None,
            provider: "credentials".to_owned(),
            google_id: None,
            image: None,
            country: String::new(),
            state: String::new(),
            locality: String::new(),
            address: String::new(),
            whatsapp: String::new(),
            postalcode: String::new(),
            status: None,
            created_at: now,
            updated_at: now,
        }
    }
}
