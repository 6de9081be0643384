//! Several capability tokens presented together.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::token::CapabilityToken;

/// Conventional request field carrying the token list.
pub const BISCUITS_FIELD: &str = "biscuits";

/// An ordered list of capability tokens attached to one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttenuationSet(Vec<CapabilityToken>);

impl AttenuationSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a token.
    pub fn push(&mut self, token: CapabilityToken) {
        self.0.push(token);
    }

    /// Number of tokens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the tokens in order.
    pub fn iter(&self) -> impl Iterator<Item = &CapabilityToken> {
        self.0.iter()
    }

    /// Encoded tokens, in order.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(|t| t.as_str().to_string()).collect()
    }

    /// Insert the set into a JSON request body under [`BISCUITS_FIELD`].
    ///
    /// Bodies that are not JSON objects are left untouched.
    pub fn attach_to(&self, body: &mut Value) {
        if let Value::Object(map) = body {
            map.insert(BISCUITS_FIELD.to_string(), Value::from(self.to_strings()));
        }
    }
}

impl From<CapabilityToken> for AttenuationSet {
    fn from(token: CapabilityToken) -> Self {
        Self(vec![token])
    }
}

impl FromIterator<CapabilityToken> for AttenuationSet {
    fn from_iter<I: IntoIterator<Item = CapabilityToken>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AttenuationSet {
    type Item = &'a CapabilityToken;
    type IntoIter = std::slice::Iter<'a, CapabilityToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_as_list() {
        let set: AttenuationSet = ["a=", "b="]
            .into_iter()
            .map(CapabilityToken::from_encoded)
            .collect();

        assert_eq!(serde_json::to_value(&set).unwrap(), json!(["a=", "b="]));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_attach_to_body() {
        let set = AttenuationSet::from(CapabilityToken::from_encoded("tok="));
        let mut body = json!({ "sqlText": "SELECT 1" });
        set.attach_to(&mut body);

        assert_eq!(body["biscuits"], json!(["tok="]));
        assert_eq!(body["sqlText"], "SELECT 1");

        let mut not_object = json!("text");
        set.attach_to(&mut not_object);
        assert_eq!(not_object, json!("text"));
    }
}
