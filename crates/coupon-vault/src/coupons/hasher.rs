//! Passcode hashing.

use coupon_common::{PassCode, SerialNumber};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::config::Salt;

/// Computes and checks the `hash` field of a coupon record.
///
/// Format: the serial number followed by the lowercase hex SHA-256 of
/// `"{passCode}:{salt}"`. Records written by earlier deployments use the same
/// format and stay redeemable.
pub struct PassCodeHasher {
    salt: Salt,
}

impl PassCodeHasher {
    pub fn new(salt: Salt) -> Self {
        Self { salt }
    }

    pub fn hash(&self, serial: &SerialNumber, pass_code: &PassCode) -> String {
        let mut hasher = Sha256::new();
        hasher.update(pass_code.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(self.salt.expose().as_bytes());
        format!("{}{}", serial, hex::encode(hasher.finalize()))
    }

    /// Constant-time comparison against a stored hash
    pub fn verify(&self, serial: &SerialNumber, pass_code: &PassCode, stored: &str) -> bool {
        let expected = self.hash(serial, pass_code);
        expected.as_bytes().ct_eq(stored.as_bytes()).into()
    }
}
