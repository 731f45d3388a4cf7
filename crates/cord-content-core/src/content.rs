//! Content: the structured claim a credential commits to.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A structured claim about a holder, issued under a schema.
///
/// `schema_uri` is the hashing vocabulary: every statement predicate is
/// `"<schema_uri>#<property>"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Schema the contents conform to.
    pub schema_uri: String,

    /// The issuer's identity.
    pub issuer_uri: String,

    /// The holder's identity, if the claim is about a specific holder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub holder_uri: Option<String>,

    /// Top-level properties.
    #[serde(default)]
    pub contents: BTreeMap<String, Value>,
}

impl Content {
    /// Create empty content for a schema and issuer.
    pub fn new(schema_uri: impl Into<String>, issuer_uri: impl Into<String>) -> Self {
        Self {
            schema_uri: schema_uri.into(),
            issuer_uri: issuer_uri.into(),
            holder_uri: None,
            contents: BTreeMap::new(),
        }
    }

    /// Set the holder.
    pub fn holder(mut self, holder_uri: impl Into<String>) -> Self {
        self.holder_uri = Some(holder_uri.into());
        self
    }

    /// Add or replace a property.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.contents.insert(key.into(), value.into());
        self
    }

    /// Property names, in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.contents.keys().map(String::as_str)
    }

    /// A copy of this content without the named properties.
    ///
    /// Names that are not present are ignored.
    pub fn without<'a, I>(&self, excluded: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut reduced = self.clone();
        for key in excluded {
            reduced.contents.remove(key);
        }
        reduced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_and_keys() {
        let content = Content::new("schema:cord:abc", "did:cord:issuer")
            .holder("did:cord:alice")
            .property("name", "Alice")
            .property("age", 29);

        let keys: Vec<&str> = content.keys().collect();
        assert_eq!(keys, vec!["age", "name"]);
        assert_eq!(content.holder_uri.as_deref(), Some("did:cord:alice"));
    }

    #[test]
    fn test_without_is_pure() {
        let content = Content::new("s", "i")
            .property("name", "Alice")
            .property("age", 29);

        let reduced = content.without(["age", "missing"]);
        assert_eq!(reduced.contents.len(), 1);
        assert_eq!(content.contents.len(), 2);
    }

    #[test]
    fn test_json_field_names() {
        let content = Content::new("schema:cord:abc", "did:cord:issuer").property("name", "Alice");
        let value = serde_json::to_value(&content).unwrap();

        assert_eq!(
            value,
            json!({
                "schemaUri": "schema:cord:abc",
                "issuerUri": "did:cord:issuer",
                "contents": { "name": "Alice" }
            })
        );
    }
}
