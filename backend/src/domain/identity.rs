//! Identity primitives: user ids, email addresses, and credentials.
//!
//! Inbound adapters parse raw strings through these constructors before a
//! handler talks to a port, so ports only ever see validated values.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Minimum password length accepted when registering an account.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    EmptyUserId,
    InvalidUserId,
    EmptyEmail,
    InvalidEmail,
    EmptyPassword,
    WeakPassword { min: usize },
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "user id must not be empty"),
            Self::InvalidUserId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "Please enter a valid email address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::WeakPassword { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyUserId);
        }
        if raw.trim() != raw {
            return Err(IdentityValidationError::InvalidUserId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidUserId)
    }

    /// Generate a fresh identifier for a new account.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // One `@`, no whitespace, and a dot somewhere in the domain part.
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address normalised to lower case.
///
/// # Examples
/// ```
/// use learnhub::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Jane@Example.com ").expect("valid email");
/// assert_eq!(email.as_ref(), "jane@example.com");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim, lower-case, and validate an address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let normalized = email.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&normalized) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authenticated user's stable reference.
///
/// Enrollments are attributed to the [`UserId`]; the email doubles as the
/// name shown in page headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    user_id: UserId,
    email: EmailAddress,
}

impl Identity {
    /// Pair a user id with its email address.
    pub fn new(user_id: UserId, email: EmailAddress) -> Self {
        Self { user_id, email }
    }

    /// Stable identifier.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Account email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }
}

/// Validated email/password pair.
///
/// ## Invariants
/// - `email` satisfies [`EmailAddress`] validation.
/// - `password` is non-empty; whitespace is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, IdentityValidationError> {
        let email = EmailAddress::new(email)?;
        if password.is_empty() {
            return Err(IdentityValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for account lookups.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Reject passwords shorter than [`PASSWORD_MIN_LEN`] characters.
    pub fn ensure_strong_password(&self) -> Result<(), IdentityValidationError> {
        if self.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(IdentityValidationError::WeakPassword {
                min: PASSWORD_MIN_LEN,
            });
        }
        Ok(())
    }
}
