//! Authentication primitives: login credentials, registrations and stored
//! password digests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2};
use zeroize::Zeroizing;

use crate::domain::{UserValidationError, Username};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login or registration values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Username failed shape validation.
    InvalidUsername(UserValidationError),
    /// Password was blank.
    EmptyPassword,
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::InvalidUsername(err) => write!(f, "{err}"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use skymarket::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("admin", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated account registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate a registration from raw inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let trimmed = username.trim();
        if trimmed.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        let username = Username::new(trimmed).map_err(LoginValidationError::InvalidUsername)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while hashing a password or decoding a stored hash.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordDigestError {
    /// The stored value is not an Argon2id PHC string.
    #[error("password digest is malformed: {0}")]
    Malformed(String),
    /// Argon2 rejected the password or salt.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Argon2id password hash kept in PHC string form
/// (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`).
///
/// # Examples
/// ```
/// use skymarket::domain::PasswordDigest;
///
/// let digest = PasswordDigest::generate("correct horse").expect("hashes");
/// assert!(digest.verify("correct horse"));
/// assert!(!digest.verify("wrong horse"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    phc: String,
}

impl PasswordDigest {
    /// Hash `password` with a freshly generated random salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordDigestError::Hashing`] when Argon2 rejects the input.
    pub fn generate(password: &str) -> Result<Self, PasswordDigestError> {
        let salt_bytes: [u8; 16] = rand::random();
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordDigestError::Hashing(err.to_string()))?;
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordDigestError::Hashing(err.to_string()))?;
        Ok(Self {
            phc: hash.to_string(),
        })
    }

    /// Decode a stored PHC string.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordDigestError::Malformed`] for anything other than an
    /// Argon2id PHC string.
    pub fn parse(encoded: &str) -> Result<Self, PasswordDigestError> {
        let hash = PasswordHash::new(encoded)
            .map_err(|err| PasswordDigestError::Malformed(err.to_string()))?;
        if hash.algorithm.as_str() != Algorithm::Argon2id.as_str() {
            return Err(PasswordDigestError::Malformed(format!(
                "unsupported algorithm {}",
                hash.algorithm
            )));
        }
        if hash.salt.is_none() || hash.hash.is_none() {
            return Err(PasswordDigestError::Malformed(
                "missing salt or hash output".to_owned(),
            ));
        }
        Ok(Self {
            phc: encoded.to_owned(),
        })
    }

    /// Whether `password` matches this hash.
    pub fn verify(&self, password: &str) -> bool {
        PasswordHash::new(&self.phc).is_ok_and(|hash| {
            Argon2::default()
                .verify_password(password.as_bytes(), &hash)
                .is_ok()
        })
    }

    /// Storage encoding.
    pub fn encode(&self) -> String {
        self.phc.clone()
    }
}
