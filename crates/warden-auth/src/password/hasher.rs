//! Argon2id password hashing with a hex salt prefix.
//!
//! Stored values have the layout `salt || digest`: 32 hex characters of salt
//! (16 random bytes) followed by the hex-encoded 32-byte Argon2id digest of
//! the password under that salt.

use argon2::password_hash::Output;
use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::{Algorithm, Argon2, Params, Version};

use warden_core::config::AuthConfig;
use warden_core::error::AppError;

/// Random salt bytes per password.
const SALT_BYTES: usize = 16;

/// Length of the hex salt prefix in a stored value.
pub const SALT_HEX_LEN: usize = SALT_BYTES * 2;

/// Length of the derived key in bytes.
const DIGEST_BYTES: usize = 32;

/// Hashes and verifies passwords using Argon2id.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params = self.argon2.params();
        f.debug_struct("PasswordHasher")
            .field("memory_kib", &params.m_cost())
            .field("iterations", &params.t_cost())
            .finish()
    }
}

impl PasswordHasher {
    /// Creates a hasher with the KDF cost from auth configuration.
    pub fn new(config: &AuthConfig) -> Result<Self, AppError> {
        let params = Params::new(
            config.password_memory_kib,
            config.password_iterations,
            1,
            Some(DIGEST_BYTES),
        )
        .map_err(|e| AppError::configuration(format!("Invalid password KDF parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let mut salt = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt);
        let salt = hex::encode(salt);

        let digest = self
            .derive(password, &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(format!("{salt}{}", hex::encode(digest)))
    }

    /// Verifies `password` against a stored `salt || digest` value.
    ///
    /// Any malformed stored value verifies as `false`.
    pub fn verify_password(&self, password: &str, stored: &str) -> bool {
        if stored.len() <= SALT_HEX_LEN || !stored.is_char_boundary(SALT_HEX_LEN) {
            return false;
        }
        let (salt, digest_hex) = stored.split_at(SALT_HEX_LEN);

        let Ok(expected) = hex::decode(digest_hex) else {
            return false;
        };
        let Ok(actual) = self.derive(password, salt) else {
            return false;
        };

        // `Output` equality is constant-time.
        match (Output::new(&expected), Output::new(&actual)) {
            (Ok(expected), Ok(actual)) => expected == actual,
            _ => false,
        }
    }

    fn derive(&self, password: &str, salt: &str) -> Result<[u8; DIGEST_BYTES], argon2::Error> {
        let mut digest = [0u8; DIGEST_BYTES];
        self.argon2
            .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut digest)?;
        Ok(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> PasswordHasher {
        let config = AuthConfig {
            password_memory_kib: 1024,
            password_iterations: 1,
            ..AuthConfig::default()
        };
        PasswordHasher::new(&config).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let stored = hasher.hash_password("secret").unwrap();
        assert!(hasher.verify_password("secret", &stored));
        assert!(!hasher.verify_password("Secret", &stored));
        assert!(!hasher.verify_password("", &stored));
    }

    #[test]
    fn test_stored_layout() {
        let stored = hasher().hash_password("secret").unwrap();
        assert_eq!(stored.len(), SALT_HEX_LEN + DIGEST_BYTES * 2);
        assert!(stored.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_salts_differ_between_hashes() {
        let hasher = hasher();
        let a = hasher.hash_password("secret").unwrap();
        let b = hasher.hash_password("secret").unwrap();
        assert_ne!(a, b);
        assert_ne!(&a[..SALT_HEX_LEN], &b[..SALT_HEX_LEN]);
        assert!(hasher.verify_password("secret", &a));
        assert!(hasher.verify_password("secret", &b));
    }

    #[test]
    fn test_malformed_stored_values_fail_closed() {
        let hasher = hasher();
        let stored = hasher.hash_password("secret").unwrap();

        assert!(!hasher.verify_password("secret", ""));
        assert!(!hasher.verify_password("secret", &stored[..SALT_HEX_LEN]));
        assert!(!hasher.verify_password("secret", &format!("{}zz", &stored[..SALT_HEX_LEN])));
        assert!(!hasher.verify_password("secret", &stored[..stored.len() - 2]));
        assert!(!hasher.verify_password("secret", "ééééééééééééééééééééééééééééééééé"));
    }

    #[test]
    fn test_default_cost_parameters_are_accepted() {
        let hasher = PasswordHasher::new(&AuthConfig::default()).unwrap();
        let stored = hasher.hash_password("secret").unwrap();
        assert!(hasher.verify_password("secret", &stored));
    }

    #[test]
    fn test_invalid_cost_parameters_rejected() {
        let config = AuthConfig {
            password_memory_kib: 1,
            ..AuthConfig::default()
        };
        assert!(PasswordHasher::new(&config).is_err());
    }
}
