//! Credentials: login payloads, plaintext passwords, and stored hashes.
//!
//! Plaintext passwords live in [`Zeroizing`] buffers and never leave the
//! domain except through the [`PasswordHasher`](super::ports::PasswordHasher)
//! port. Storage only ever sees [`PasswordHash`].

use std::fmt;

use zeroize::Zeroizing;

/// Upper bound on accepted password length in bytes.
pub const PASSWORD_MAX_BYTES: usize = 1024;

/// Domain error returned when credential values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// Password exceeded [`PASSWORD_MAX_BYTES`].
    PasswordTooLong { max: usize },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} bytes")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Plaintext password supplied by a caller.
///
/// Whitespace is preserved; only emptiness and length are checked.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a raw password.
    pub fn new(raw: &str) -> Result<Self, CredentialValidationError> {
        if raw.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        if raw.len() > PASSWORD_MAX_BYTES {
            return Err(CredentialValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES,
            });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Expose the plaintext to a hasher.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Stored password hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded PHC string produced by a hasher or read from storage.
    pub fn from_phc(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only the algorithm prefix is safe to show.
        let algorithm = self.0.split('$').nth(1).unwrap_or("unknown");
        write!(f, "PasswordHash({algorithm})")
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` satisfies the [`Password`] rules.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" admin ", "password").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password().expose(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        let password = Password::new(password)?;
        Ok(Self {
            username: normalized.to_owned(),
            password,
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialValidationError::EmptyUsername)]
    #[case("   ", "pw", CredentialValidationError::EmptyUsername)]
    #[case("user", "", CredentialValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("jane", " padded password ")]
    fn valid_credentials_trim_username_only(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password().expose(), password);
    }

    #[rstest]
    fn oversized_passwords_are_rejected() {
        let raw = "x".repeat(PASSWORD_MAX_BYTES + 1);
        assert_eq!(
            Password::new(&raw).expect_err("too long"),
            CredentialValidationError::PasswordTooLong {
                max: PASSWORD_MAX_BYTES
            }
        );
        assert!(Password::new(&raw[..PASSWORD_MAX_BYTES]).is_ok());
    }

    #[rstest]
    fn debug_output_never_contains_secrets() {
        let password = Password::new("hunter2").expect("password");
        assert!(!format!("{password:?}").contains("hunter2"));

        let hash = PasswordHash::from_phc("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA");
        let rendered = format!("{hash:?}");
        assert_eq!(rendered, "PasswordHash(argon2id)");
    }
}
