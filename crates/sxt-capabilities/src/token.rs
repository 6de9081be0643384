//! Biscuit-backed capability tokens.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use biscuit_auth::{Biscuit, KeyPair as BiscuitKeyPair, PrivateKey, PublicKey as BiscuitPublicKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use sxt_crypto::{KeyPair, PublicKey};
use tracing::debug;

use crate::capability::{Capability, check_term};
use crate::error::{CapabilityError, CapabilityResult};

/// Datalog predicate carrying one capability.
pub const CAPABILITY_PREDICATE: &str = "sxt:capability";

/// A sealed capability token: URL-safe, padded base64 of the biscuit bytes.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityToken(String);

impl CapabilityToken {
    /// Wrap an encoded token received from elsewhere. Nothing is checked
    /// until [`verify`](Self::verify).
    #[must_use]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// The encoded token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the base64 envelope into the raw biscuit bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidToken`] if the string is not URL-safe base64.
    pub fn to_bytes(&self) -> CapabilityResult<Vec<u8>> {
        URL_SAFE
            .decode(&self.0)
            .map_err(|e| CapabilityError::InvalidToken(format!("base64: {e}")))
    }

    fn parse(&self, root: &PublicKey) -> CapabilityResult<Biscuit> {
        let bytes = self.to_bytes()?;
        let root = to_biscuit_public_key(root)?;
        Biscuit::from(&bytes, root).map_err(|e| CapabilityError::InvalidToken(e.to_string()))
    }

    /// Check the token's signature chain against the root public key.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::InvalidToken`] if the token is malformed or
    /// was not signed by `root`.
    pub fn verify(&self, root: &PublicKey) -> CapabilityResult<()> {
        self.parse(root).map(|_| ())
    }

    /// The distinct capabilities the token grants, after verifying it.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not verify under `root` or its
    /// facts cannot be read back.
    pub fn capabilities(&self, root: &PublicKey) -> CapabilityResult<Vec<Capability>> {
        let biscuit = self.parse(root)?;
        let mut authorizer = biscuit
            .authorizer()
            .map_err(|e| CapabilityError::Authorization(e.to_string()))?;
        authorizer
            .add_policy("allow if true")
            .map_err(|e| CapabilityError::Authorization(e.to_string()))?;
        authorizer
            .authorize()
            .map_err(|e| CapabilityError::Authorization(e.to_string()))?;

        let rows: Vec<(String, String)> = authorizer
            .query(format!("granted($op, $res) <- {CAPABILITY_PREDICATE}($op, $res)").as_str())
            .map_err(|e| CapabilityError::Authorization(e.to_string()))?;

        let mut capabilities = rows
            .into_iter()
            .map(|(op, res)| Capability::new(op, res))
            .collect::<CapabilityResult<Vec<_>>>()?;
        capabilities.sort_by(|a, b| a.to_string().cmp(&b.to_string()));
        Ok(capabilities)
    }

    /// Whether the token grants `operation` on `resource`, either directly or
    /// through the wildcard operation.
    ///
    /// Returns `Ok(false)` when the token is valid but does not grant it.
    ///
    /// # Errors
    ///
    /// Returns an error if the token does not verify under `root`, or the
    /// query terms cannot be expressed as Datalog strings.
    pub fn authorizes(
        &self,
        root: &PublicKey,
        operation: &str,
        resource: &str,
    ) -> CapabilityResult<bool> {
        check_term("operation", operation)?;
        check_term("resource", resource)?;

        let biscuit = self.parse(root)?;
        let mut authorizer = biscuit
            .authorizer()
            .map_err(|e| CapabilityError::Authorization(e.to_string()))?;

        for op in [operation, crate::operation::WILDCARD] {
            authorizer
                .add_policy(
                    format!("allow if {CAPABILITY_PREDICATE}(\"{op}\", \"{resource}\")").as_str(),
                )
                .map_err(|e| CapabilityError::Authorization(e.to_string()))?;
        }

        match authorizer.authorize() {
            Ok(_) => Ok(true),
            Err(biscuit_auth::error::Token::FailedLogic(_)) => Ok(false),
            Err(e) => Err(CapabilityError::Authorization(e.to_string())),
        }
    }
}

impl fmt::Debug for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CapabilityToken({} chars)", self.0.len())
    }
}

impl fmt::Display for CapabilityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CapabilityToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builder for capability tokens.
///
/// Capabilities are appended in order; duplicates are kept.
#[derive(Debug, Clone, Default)]
pub struct CapabilityTokenBuilder {
    capabilities: Vec<Capability>,
}

impl CapabilityTokenBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one capability.
    #[must_use]
    pub fn capability(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Append several capabilities.
    #[must_use]
    pub fn capabilities(mut self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities.extend(capabilities);
        self
    }

    /// Capabilities queued so far.
    #[must_use]
    pub fn pending(&self) -> &[Capability] {
        &self.capabilities
    }

    /// Seal the token with `root`.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::EmptyCapabilities`] if nothing was added,
    /// [`CapabilityError::InvalidFact`] if a fact fails to parse, or
    /// [`CapabilityError::Signing`] if sealing fails. No partial token is
    /// ever returned.
    pub fn build(self, root: &KeyPair) -> CapabilityResult<CapabilityToken> {
        if self.capabilities.is_empty() {
            return Err(CapabilityError::EmptyCapabilities);
        }

        let root_key = to_biscuit_keypair(root)?;
        let mut builder = Biscuit::builder();

        for capability in &self.capabilities {
            let fact = format!(
                "{CAPABILITY_PREDICATE}(\"{}\", \"{}\")",
                capability.operation(),
                capability.resource()
            );
            builder
                .add_fact(fact.as_str())
                .map_err(|e| CapabilityError::InvalidFact {
                    fact: fact.clone(),
                    reason: e.to_string(),
                })?;
        }

        let biscuit = builder
            .build(&root_key)
            .map_err(|e| CapabilityError::Signing(e.to_string()))?;
        let bytes = biscuit
            .to_vec()
            .map_err(|e| CapabilityError::SerializationError(e.to_string()))?;

        debug!(
            key_id = %root.key_id_hex(),
            capabilities = self.capabilities.len(),
            "Capability token built"
        );

        Ok(CapabilityToken(URL_SAFE.encode(bytes)))
    }

    /// Seal the token with raw private key material (32-byte seed or
    /// 64-byte `seed || public`).
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityError::CryptoError`] for unusable key material,
    /// otherwise the errors of [`build`](Self::build).
    pub fn build_with_key_bytes(self, private_key: &[u8]) -> CapabilityResult<CapabilityToken> {
        let root = KeyPair::from_key_material(private_key, None)?;
        self.build(&root)
    }
}

fn to_biscuit_keypair(root: &KeyPair) -> CapabilityResult<BiscuitKeyPair> {
    let private = PrivateKey::from_bytes(&*root.secret_key_bytes())
        .map_err(|e| CapabilityError::Signing(e.to_string()))?;
    Ok(BiscuitKeyPair::from(&private))
}

fn to_biscuit_public_key(root: &PublicKey) -> CapabilityResult<BiscuitPublicKey> {
    BiscuitPublicKey::from_bytes(root.as_bytes())
        .map_err(|e| CapabilityError::InvalidToken(e.to_string()))
}
