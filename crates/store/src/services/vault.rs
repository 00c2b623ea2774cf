//! Credential vault: one-way password hashing and verification.
//!
//! Passwords are hashed with Argon2id into PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`). The salt and cost
//! parameters travel inside the string, so a hash produced under an older work
//! factor keeps verifying after the configured cost is raised.
//!
//! Plaintext enters the vault as an owned [`SecretString`] and is zeroized
//! when the call returns. Callers never keep a second copy.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

use backstock_core::StoredHash;

/// Plaintext behind the decoy hash used when no account matches.
const DUMMY_PASSWORD: &str = "backstock-decoy-credential";

/// Errors raised by the credential vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Cost parameters were rejected by Argon2.
    #[error("invalid hashing parameters: {0}")]
    Params(String),

    /// Salt generation or hashing failed.
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Argon2id work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashingConfig {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u32,
}

impl Default for HashingConfig {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashingConfig {
    /// Validate and convert into Argon2 parameters.
    ///
    /// # Errors
    ///
    /// Returns `argon2::Error` if any cost is out of range (for example zero
    /// iterations, or less than 8 KiB of memory per lane).
    pub fn params(&self) -> Result<Params, argon2::Error> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
    }
}

/// Hashes and verifies customer passwords.
///
/// Cheap to clone; the coordinator moves clones onto the blocking pool.
#[derive(Debug, Clone)]
pub struct CredentialVault {
    params: Params,
    decoy: StoredHash,
}

impl CredentialVault {
    /// Create a vault with the given work factor.
    ///
    /// Computes one decoy hash up front so [`CredentialVault::verify_decoy`]
    /// costs the same as a real verification.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Params` for unusable cost parameters and
    /// `VaultError::Hashing` if the decoy hash cannot be produced.
    pub fn new(config: HashingConfig) -> Result<Self, VaultError> {
        let params = config
            .params()
            .map_err(|e| VaultError::Params(e.to_string()))?;

        let mut vault = Self {
            params,
            decoy: StoredHash::new(String::new()),
        };
        vault.decoy = vault.hash(SecretString::from(DUMMY_PASSWORD))?;

        Ok(vault)
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// The plaintext is consumed. Empty passwords are valid input.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::Hashing` if the underlying hash computation fails.
    pub fn hash(&self, plaintext: SecretString) -> Result<StoredHash, VaultError> {
        let salt = SaltString::generate(&mut OsRng);

        self.hasher()
            .hash_password(plaintext.expose_secret().as_bytes(), &salt)
            .map(|hash| StoredHash::new(hash.to_string()))
            .map_err(|e| VaultError::Hashing(e.to_string()))
    }

    /// Check a candidate password against a stored hash.
    ///
    /// Uses the algorithm, parameters, and salt recorded in `stored`; the final
    /// digest comparison is constant time. A malformed or foreign-format hash
    /// never matches.
    #[must_use]
    pub fn verify(&self, stored: &StoredHash, candidate: SecretString) -> bool {
        let Ok(parsed) = PasswordHash::new(stored.as_str()) else {
            return false;
        };

        self.hasher()
            .verify_password(candidate.expose_secret().as_bytes(), &parsed)
            .is_ok()
    }

    /// Burn one verification's worth of work against the decoy hash.
    ///
    /// Used when there is no stored hash to check so the caller's latency
    /// does not reveal that the account is missing.
    pub fn verify_decoy(&self, candidate: SecretString) {
        let _matched = self.verify(&self.decoy, candidate);
    }

    /// Whether a stored hash should be recomputed under the current work factor.
    ///
    /// True for unparseable hashes, non-Argon2id hashes, and hashes whose
    /// recorded costs differ from this vault's.
    #[must_use]
    pub fn needs_rehash(&self, stored: &StoredHash) -> bool {
        let Ok(parsed) = PasswordHash::new(stored.as_str()) else {
            return true;
        };
        if parsed.algorithm != argon2::ARGON2ID_IDENT
            || parsed.version != Some(Version::V0x13.into())
        {
            return true;
        }

        Params::try_from(&parsed).map_or(true, |recorded| {
            recorded.m_cost() != self.params.m_cost()
                || recorded.t_cost() != self.params.t_cost()
                || recorded.p_cost() != self.params.p_cost()
        })
    }
}
