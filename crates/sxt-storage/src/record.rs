//! Session records and their persisted JSON form.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sxt_core::{TokenPair, UserId};
use sxt_crypto::KeyPair;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::{StorageError, StorageResult};

/// A user's session: identity, current tokens, and the enrolled key pair.
///
/// Tokens are replaced on every refresh or re-login. The key pair only
/// changes if a re-login is configured to regenerate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Platform user id; the storage key.
    pub user_id: UserId,
    /// Current bearer tokens.
    pub tokens: TokenPair,
    /// Key pair enrolled with the platform.
    pub keypair: KeyPair,
}

impl SessionRecord {
    /// Create a record.
    #[must_use]
    pub fn new(user_id: UserId, tokens: TokenPair, keypair: KeyPair) -> Self {
        Self {
            user_id,
            tokens,
            keypair,
        }
    }

    /// Replace the tokens, keeping identity and keys.
    #[must_use]
    pub fn with_tokens(mut self, tokens: TokenPair) -> Self {
        self.tokens = tokens;
        self
    }

    /// Check the record may be persisted.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::EmptyToken`] if either token is empty.
    pub fn ensure_persistable(&self) -> StorageResult<()> {
        if self.tokens.is_complete() {
            return Ok(());
        }
        if self.tokens.access_token.is_empty() {
            return Err(StorageError::EmptyToken { which: "access" });
        }
        Err(StorageError::EmptyToken { which: "refresh" })
    }
}

/// On-disk JSON shape of a session record.
///
/// Keys are standard base64. The private key is always written in the
/// 64-byte `seed || public` layout; either recognized layout is accepted on
/// read. The user id is not part of the document; backends key by it.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    access_token_expires: i64,
    #[serde(default)]
    refresh_token_expires: i64,
    private_key: String,
    public_key: String,
}

impl PersistedSession {
    /// Build the persisted form of a record.
    #[must_use]
    pub fn from_record(record: &SessionRecord) -> Self {
        Self {
            access_token: record.tokens.access_token.clone(),
            refresh_token: record.tokens.refresh_token.clone(),
            access_token_expires: record.tokens.access_token_expires,
            refresh_token_expires: record.tokens.refresh_token_expires,
            private_key: STANDARD.encode(*record.keypair.keypair_bytes()),
            public_key: record.keypair.export_public_key().to_base64(),
        }
    }

    /// Rebuild the record for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the key material does not
    /// decode or its halves do not belong together.
    pub fn to_record(&self, user_id: UserId) -> StorageResult<SessionRecord> {
        let private = Zeroizing::new(
            STANDARD
                .decode(&self.private_key)
                .map_err(|e| StorageError::Serialization(format!("privateKey: {e}")))?,
        );
        let public = STANDARD
            .decode(&self.public_key)
            .map_err(|e| StorageError::Serialization(format!("publicKey: {e}")))?;

        let keypair = KeyPair::from_key_material(&private, Some(&public))
            .map_err(|e| StorageError::Serialization(format!("key material: {e}")))?;

        let tokens = TokenPair::new(self.access_token.clone(), self.refresh_token.clone())
            .with_expiries(self.access_token_expires, self.refresh_token_expires);

        Ok(SessionRecord::new(user_id, tokens, keypair))
    }

    /// Encode as JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if encoding fails.
    pub fn to_json(&self) -> StorageResult<Zeroizing<Vec<u8>>> {
        serde_json::to_vec_pretty(self)
            .map(Zeroizing::new)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Decode from JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Serialization`] if the document is malformed.
    pub fn from_json(bytes: &[u8]) -> StorageResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }
}
