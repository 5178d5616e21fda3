use hmac::Hmac;
use hmac::Mac;
use rand_core::OsRng;
use rand_core::RngCore;
use sha2::Sha512;

use super::errors::PasswordError;

type HmacSha512 = Hmac<Sha512>;

/// Password hash together with the salt it was computed under.
///
/// The two values are only ever produced and stored as a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaltedPassword {
    pub hash: String,
    pub salt: String,
}

/// Salted password hashing implementation.
///
/// Digests are HMAC-SHA512 over the password, keyed by a random hex salt.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    salt_length: usize,
}

impl PasswordHasher {
    /// Default salt length in hex characters.
    pub const DEFAULT_SALT_LENGTH: usize = 32;

    /// Create a new password hasher with the default salt length.
    pub fn new() -> Self {
        Self {
            salt_length: Self::DEFAULT_SALT_LENGTH,
        }
    }

    /// Create a password hasher producing salts of `salt_length` hex characters.
    pub fn with_salt_length(salt_length: usize) -> Self {
        Self { salt_length }
    }

    /// Generate a random hex-encoded salt of exactly `length` characters.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - The operating system random source failed
    pub fn generate_salt(length: usize) -> Result<String, PasswordError> {
        let mut bytes = vec![0u8; length.div_ceil(2)];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| PasswordError::EntropyUnavailable(e.to_string()))?;

        let mut salt = hex::encode(bytes);
        salt.truncate(length);
        Ok(salt)
    }

    /// Hash a plaintext password under the given salt.
    ///
    /// Deterministic: the same `(password, salt)` pair always yields the same digest.
    ///
    /// # Returns
    /// Lower-case hex HMAC-SHA512 digest
    ///
    /// # Errors
    /// * `HashingFailed` - The MAC could not be keyed
    pub fn hash(&self, password: &str, salt: &str) -> Result<String, PasswordError> {
        let mac = Self::keyed_mac(password, salt)?;
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    /// Generate a fresh salt and hash the password under it.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - Salt generation failed
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash_with_new_salt(&self, password: &str) -> Result<SaltedPassword, PasswordError> {
        let salt = Self::generate_salt(self.salt_length)?;
        let hash = self.hash(password, &salt)?;
        Ok(SaltedPassword { hash, salt })
    }

    /// Verify a password against a stored hash and salt.
    ///
    /// The digest comparison runs in constant time.
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Stored hash is not valid hex
    pub fn verify(&self, password: &str, salt: &str, hash: &str) -> Result<bool, PasswordError> {
        let expected = hex::decode(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        let mac = Self::keyed_mac(password, salt)?;
        Ok(mac.verify_slice(&expected).is_ok())
    }

    fn keyed_mac(password: &str, salt: &str) -> Result<HmacSha512, PasswordError> {
        let mut mac = HmacSha512::new_from_slice(salt.as_bytes())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        mac.update(password.as_bytes());
        Ok(mac)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let salted = hasher
            .hash_with_new_salt(password)
            .expect("Failed to hash password");

        assert!(hasher
            .verify(password, &salted.salt, &salted.hash)
            .expect("Failed to verify password"));

        assert!(!hasher
            .verify("wrong_password", &salted.salt, &salted.hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hash_is_deterministic() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("pw1", "0123abcd").unwrap();
        let second = hasher.hash("pw1", "0123abcd").unwrap();

        assert_eq!(first, second);
        // SHA-512 digest, hex encoded
        assert_eq!(first.len(), 128);
    }

    #[test]
    fn test_different_salts_give_unrelated_digests() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("same_password", "salt-one").unwrap();
        let second = hasher.hash("same_password", "salt-two").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_known_digest() {
        // RFC 4231 test case 2: key "Jefe", data "what do ya want for nothing?"
        let hasher = PasswordHasher::new();
        let digest = hasher
            .hash("what do ya want for nothing?", "Jefe")
            .unwrap();

        assert_eq!(
            digest,
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn test_generate_salt_length() {
        for length in [1, 16, 31, 32, 64] {
            let salt = PasswordHasher::generate_salt(length).unwrap();
            assert_eq!(salt.len(), length);
            assert!(salt.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_generated_salts_differ() {
        let first = PasswordHasher::generate_salt(32).unwrap();
        let second = PasswordHasher::generate_salt(32).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_with_new_salt_uses_configured_length() {
        let hasher = PasswordHasher::with_salt_length(16);
        let salted = hasher.hash_with_new_salt("password").unwrap();
        assert_eq!(salted.salt.len(), 16);
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "salt", "not-hex");
        assert!(result.is_err());
    }
}
