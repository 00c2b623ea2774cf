//! Stored credential types.

use core::fmt;

/// A persisted password hash in PHC string format.
///
/// The value is produced by the credential vault and is opaque to everything
/// else. It deliberately implements neither `Serialize` nor `Display`, and its
/// `Debug` output is redacted, so a hash cannot leak through a returned
/// record or a log line by accident.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredHash(String);

impl StoredHash {
    /// Wrap an encoded hash string (e.g. read back from the database).
    #[must_use]
    pub const fn new(encoded: String) -> Self {
        Self(encoded)
    }

    /// Get the encoded hash for storage or verification.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoredHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredHash([REDACTED])")
    }
}

impl From<String> for StoredHash {
    fn from(encoded: String) -> Self {
        Self(encoded)
    }
}
