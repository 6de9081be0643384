//! Ed25519 signatures.
//!
//! Login challenges are signed with the user's key and the 64-byte result is
//! sent to the auth endpoint as lowercase hex.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use std::fmt;

use crate::error::{CryptoError, CryptoResult};

/// Length of an Ed25519 signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// An Ed25519 signature (64 bytes).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature([u8; SIGNATURE_LENGTH]);

impl Signature {
    /// Create from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Try to create from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSignatureLength`] if the slice is not exactly 64 bytes.
    pub fn try_from_slice(slice: &[u8]) -> CryptoResult<Self> {
        let bytes = slice
            .try_into()
            .map_err(|_| CryptoError::InvalidSignatureLength {
                expected: SIGNATURE_LENGTH,
                actual: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.0
    }

    /// Encode as lowercase hex (128 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode from hex string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid hex or not 64 bytes.
    pub fn from_hex(s: &str) -> CryptoResult<Self> {
        let bytes = hex::decode(s).map_err(|_| CryptoError::InvalidHexEncoding)?;
        Self::try_from_slice(&bytes)
    }

    /// Verify this signature against a message and public key.
    ///
    /// # Errors
    ///
    /// Returns an error if the public key is invalid or signature verification fails.
    pub fn verify(&self, message: &[u8], public_key: &[u8; 32]) -> CryptoResult<()> {
        let verifying_key = VerifyingKey::from_bytes(public_key)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

        verifying_key
            .verify(message, &DalekSignature::from_bytes(&self.0))
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Signature({}...)", hex.get(..16).unwrap_or_default())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<DalekSignature> for Signature {
    fn from(sig: DalekSignature) -> Self {
        Self(sig.to_bytes())
    }
}

impl From<[u8; SIGNATURE_LENGTH]> for Signature {
    fn from(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::KeyPair;

    #[test]
    fn test_signature_hex_encoding() {
        let keypair = KeyPair::generate().unwrap();
        let sig = keypair.sign(b"challenge");

        let hex = sig.to_hex();
        assert_eq!(hex.len(), 128);
        assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));

        let decoded = Signature::from_hex(&hex).unwrap();
        assert_eq!(sig, decoded);
    }

    #[test]
    fn test_signature_verification() {
        let keypair = KeyPair::generate().unwrap();
        let message = b"challenge";
        let sig = keypair.sign(message);

        assert!(sig.verify(message, keypair.public_key_bytes()).is_ok());
        assert!(sig.verify(b"other", keypair.public_key_bytes()).is_err());

        let other_keypair = KeyPair::generate().unwrap();
        assert!(matches!(
            sig.verify(message, other_keypair.public_key_bytes()),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_empty_message_signs() {
        let keypair = KeyPair::generate().unwrap();
        let sig = keypair.sign(b"");
        assert!(keypair.verify(b"", &sig).is_ok());
    }

    #[test]
    fn test_invalid_signature_length() {
        let result = Signature::try_from_slice(&[0u8; 63]);
        assert!(matches!(
            result,
            Err(CryptoError::InvalidSignatureLength { expected: 64, actual: 63 })
        ));
        assert!(matches!(
            Signature::from_hex("zz"),
            Err(CryptoError::InvalidHexEncoding)
        ));
    }
}
