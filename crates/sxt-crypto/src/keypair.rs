//! Ed25519 key pairs with secure memory handling.
//!
//! A key pair is the user's platform identity: its public half is registered
//! with the auth endpoint and its private half signs login challenges and
//! roots capability tokens.
//!
//! Two private key layouts are recognized:
//! - the 32-byte seed
//! - the 64-byte `seed || public` form produced by most Ed25519 libraries
//!
//! Anything else is rejected instead of being reinterpreted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{CryptoError, CryptoResult};
use crate::signature::Signature;

/// Length of an Ed25519 seed (the 32-byte private key form).
pub const SEED_LENGTH: usize = 32;

/// Length of an Ed25519 public key.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Length of the `seed || public` private key form.
pub const KEYPAIR_LENGTH: usize = 64;

/// An Ed25519 key pair with secure memory handling.
///
/// The secret key is zeroized on drop to prevent leaking sensitive material.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyPair {
    #[zeroize(skip)] // VerifyingKey doesn't implement Zeroize
    verifying_key: VerifyingKey,
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair from the operating system RNG.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyGeneration`] if the random source fails.
    pub fn generate() -> CryptoResult<Self> {
        let mut seed = Zeroizing::new([0u8; SEED_LENGTH]);
        OsRng
            .try_fill_bytes(&mut *seed)
            .map_err(|e| CryptoError::KeyGeneration(e.to_string()))?;

        if seed.iter().all(|b| *b == 0) {
            return Err(CryptoError::KeyGeneration(
                "random source returned an all-zero seed".into(),
            ));
        }

        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    /// Create from a secret key seed (32 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 32 bytes.
    pub fn from_secret_key(bytes: &[u8]) -> CryptoResult<Self> {
        let seed: Zeroizing<[u8; SEED_LENGTH]> =
            Zeroizing::new(bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: SEED_LENGTH,
                actual: bytes.len(),
            })?);

        Ok(Self::from_signing_key(SigningKey::from_bytes(&seed)))
    }

    /// Create from the 64-byte `seed || public` layout.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] on a wrong length, or
    /// [`CryptoError::KeyMismatch`] if the trailing public half was not derived
    /// from the seed.
    pub fn from_keypair_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let full: Zeroizing<[u8; KEYPAIR_LENGTH]> =
            Zeroizing::new(bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: KEYPAIR_LENGTH,
                actual: bytes.len(),
            })?);

        let signing_key =
            SigningKey::from_keypair_bytes(&full).map_err(|_| CryptoError::KeyMismatch)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Assemble a key pair from externally supplied material.
    ///
    /// `private` must be a 32-byte seed or the 64-byte `seed || public` form.
    /// When `public` is given it must equal the key derived from `private`.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::UnrecognizedKeyLayout`] for any other length,
    /// [`CryptoError::InvalidKeyLength`] for a malformed public key, and
    /// [`CryptoError::KeyMismatch`] when the halves disagree.
    pub fn from_key_material(private: &[u8], public: Option<&[u8]>) -> CryptoResult<Self> {
        let keypair = match private.len() {
            SEED_LENGTH => Self::from_secret_key(private)?,
            KEYPAIR_LENGTH => Self::from_keypair_bytes(private)?,
            actual => return Err(CryptoError::UnrecognizedKeyLayout { actual }),
        };

        if let Some(public) = public {
            let claimed = PublicKey::try_from_slice(public)?;
            if claimed != keypair.export_public_key() {
                return Err(CryptoError::KeyMismatch);
            }
        }

        Ok(keypair)
    }

    /// Assemble a key pair from standard base64 strings, as typed by a user.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidBase64Encoding`] if either string fails to
    /// decode, otherwise the errors of [`from_key_material`](Self::from_key_material).
    pub fn from_base64(private: &str, public: &str) -> CryptoResult<Self> {
        let private = Zeroizing::new(
            STANDARD
                .decode(private.trim())
                .map_err(|_| CryptoError::InvalidBase64Encoding)?,
        );
        let public = STANDARD
            .decode(public.trim())
            .map_err(|_| CryptoError::InvalidBase64Encoding)?;
        Self::from_key_material(&private, Some(&public))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let verifying_key = signing_key.verifying_key();
        Self {
            verifying_key,
            signing_key,
        }
    }

    /// Get the public key bytes (32 bytes).
    #[must_use]
    pub fn public_key_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        self.verifying_key.as_bytes()
    }

    /// Get a short key ID (first 8 bytes of public key).
    ///
    /// Useful for identifying keys in logs without exposing the full key.
    #[must_use]
    pub fn key_id(&self) -> [u8; 8] {
        self.export_public_key().key_id()
    }

    /// Get the key ID as a hex string.
    #[must_use]
    pub fn key_id_hex(&self) -> String {
        hex::encode(self.key_id())
    }

    /// Sign a message.
    ///
    /// Pure Ed25519: the raw bytes are signed without pre-hashing, so the same
    /// key and message always yield the same signature.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::from(self.signing_key.sign(message))
    }

    /// Verify a signature (convenience method using our public key).
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SignatureVerificationFailed`] if verification fails.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> CryptoResult<()> {
        signature.verify(message, self.public_key_bytes())
    }

    /// Export the public key for serialization.
    #[must_use]
    pub fn export_public_key(&self) -> PublicKey {
        PublicKey::from_bytes(*self.public_key_bytes())
    }

    /// Export the secret seed (careful - sensitive!).
    #[must_use]
    pub fn secret_key_bytes(&self) -> Zeroizing<[u8; SEED_LENGTH]> {
        Zeroizing::new(self.signing_key.to_bytes())
    }

    /// Export the `seed || public` private key form (careful - sensitive!).
    ///
    /// This is the layout written to session records.
    #[must_use]
    pub fn keypair_bytes(&self) -> Zeroizing<[u8; KEYPAIR_LENGTH]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("key_id", &self.key_id_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.verifying_key == other.verifying_key
            && self.signing_key.to_bytes() == other.signing_key.to_bytes()
    }
}

impl Eq for KeyPair {}

/// A public key (safe to share, serialize, etc.).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LENGTH]);

impl PublicKey {
    /// Create from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Try to create from a slice.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKeyLength`] if the slice is not exactly 32 bytes.
    pub fn try_from_slice(slice: &[u8]) -> CryptoResult<Self> {
        let bytes = slice
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                actual: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    /// Get the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// Get a short key ID (first 8 bytes).
    #[must_use]
    pub fn key_id(&self) -> [u8; 8] {
        let mut id = [0u8; 8];
        id.copy_from_slice(&self.0[..8]);
        id
    }

    /// Get the key ID as a hex string.
    #[must_use]
    pub fn key_id_hex(&self) -> String {
        hex::encode(self.key_id())
    }

    /// Encode as hex string.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Encode as standard, padded base64 (the auth endpoint's `key` field).
    #[must_use]
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Decode from standard base64.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid base64 or not 32 bytes.
    pub fn from_base64(s: &str) -> CryptoResult<Self> {
        let bytes = STANDARD
            .decode(s)
            .map_err(|_| CryptoError::InvalidBase64Encoding)?;
        Self::try_from_slice(&bytes)
    }

    /// Verify a signature against this public key.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SignatureVerificationFailed`] if verification fails.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> CryptoResult<()> {
        signature.verify(message, &self.0)
    }
}

impl std::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PublicKey({})", self.key_id_hex())
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_base64())
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for PublicKey {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
