//! Argon2id password hashing and verification.
//!
//! All password hashes use the Argon2id variant with a cryptographically random
//! salt generated via [`OsRng`]. The PHC string format is used for storage so
//! that algorithm parameters and salt are embedded in the hash itself, which
//! lets hashes made under an older work factor keep verifying after it changes.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Default Argon2 time cost (passes over memory).
const DEFAULT_ITERATIONS: u32 = 3;
/// Default Argon2 memory cost in KiB.
const DEFAULT_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;

/// Work factor for password hashing.
#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// Argon2 time cost.
    pub iterations: u32,
    /// Argon2 memory cost in KiB.
    pub memory_kib: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            memory_kib: DEFAULT_MEMORY_KIB,
        }
    }
}

/// Salted, adaptive password hasher. Cheap to clone.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    params: Params,
}

impl PasswordHasher {
    /// Build a hasher for the given work factor.
    ///
    /// Fails if the parameters are outside what Argon2 accepts
    /// (e.g. zero iterations, or less than 8 KiB of memory).
    pub fn new(config: &PasswordConfig) -> Result<Self, argon2::Error> {
        let params = Params::new(
            config.memory_kib,
            config.iterations,
            Params::DEFAULT_P_COST,
            None,
        )?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// Returns the PHC-formatted hash string (includes algorithm, params, salt, and hash).
    pub fn hash(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2().hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Check `password` against a stored PHC hash.
    ///
    /// Any failure, including a malformed hash string, is reported as `false`.
    /// The digest comparison itself is constant time inside `argon2`.
    pub fn verify(&self, hash: &str, password: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
