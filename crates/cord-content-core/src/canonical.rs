//! Canonicalization of content into atomic statements.
//!
//! Each top-level property becomes one statement: the compact JSON text of
//! the single-key object `{"<schema_uri>#<property>": value}`. Nested values
//! are serialized as-is, with object keys in sorted order, so issuer and
//! verifier always produce identical bytes.
//!
//! Content with a holder carries one more statement, `{"@id": holder_uri}`,
//! which binds the holder into the commitment. It is never removed by
//! disclosure.

use serde_json::{Map, Value};

use crate::content::Content;
use crate::error::CoreError;

/// Separator between vocabulary and property name in a predicate.
pub const PREDICATE_SEPARATOR: char = '#';

/// Predicate of the holder statement.
pub const HOLDER_PREDICATE: &str = "@id";

/// One atomic statement derived from a single top-level property.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Statement {
    /// The property the statement was derived from.
    pub property: String,
    /// The serialized statement text that gets hashed.
    pub text: String,
}

impl Statement {
    /// Statement bytes as hashed.
    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Build the predicate for a property under a vocabulary.
pub fn predicate(schema_uri: &str, property: &str) -> String {
    format!("{schema_uri}{PREDICATE_SEPARATOR}{property}")
}

/// Turn content into statements: the holder statement first, if any, then
/// one per property sorted by property name.
pub fn canonicalize(content: &Content) -> Result<Vec<Statement>, CoreError> {
    if content.schema_uri.trim().is_empty() {
        return Err(CoreError::MissingVocabulary);
    }

    let holder = content.holder_uri.as_deref().map(holder_statement).transpose()?;
    let properties = content
        .contents
        .iter()
        .map(|(property, value)| statement(&content.schema_uri, property, value));

    holder.into_iter().map(Ok).chain(properties).collect()
}

/// The statement binding a holder: `{"@id": holder_uri}`.
pub fn holder_statement(holder_uri: &str) -> Result<Statement, CoreError> {
    let mut object = Map::with_capacity(1);
    object.insert(HOLDER_PREDICATE.to_string(), Value::from(holder_uri));
    let text = serde_json::to_string(&Value::Object(object))
        .map_err(|e| CoreError::EncodingError(e.to_string()))?;

    Ok(Statement {
        property: HOLDER_PREDICATE.to_string(),
        text,
    })
}

/// Serialize a single property as a statement.
pub fn statement(schema_uri: &str, property: &str, value: &Value) -> Result<Statement, CoreError> {
    if property.is_empty() {
        return Err(CoreError::MalformedStatementValue {
            key: String::new(),
            reason: "property name is empty".into(),
        });
    }
    if value.is_null() {
        return Err(CoreError::MalformedStatementValue {
            key: property.to_string(),
            reason: "null is not a statement value".into(),
        });
    }

    let mut object = Map::with_capacity(1);
    object.insert(predicate(schema_uri, property), sorted(value));
    let text = serde_json::to_string(&Value::Object(object))
        .map_err(|e| CoreError::EncodingError(e.to_string()))?;

    Ok(Statement {
        property: property.to_string(),
        text,
    })
}

/// Copy of `value` with every object's keys in sorted order.
fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k.clone(), sorted(v))).collect())
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_statement_text() {
        let content = Content::new("schema:cord:abc", "did:cord:issuer").property("name", "Alice");
        let statements = canonicalize(&content).unwrap();

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].property, "name");
        assert_eq!(statements[0].text, r#"{"schema:cord:abc#name":"Alice"}"#);
    }

    #[test]
    fn test_one_statement_per_top_level_property() {
        let content = Content::new("s", "i")
            .property("address", json!({"zip": "12345", "city": "Berlin"}))
            .property("tags", json!(["a", "b"]))
            .property("age", 29)
            .property("verified", true);

        let statements = canonicalize(&content).unwrap();
        let texts: Vec<&str> = statements.iter().map(|s| s.text.as_str()).collect();

        assert_eq!(
            texts,
            vec![
                r#"{"s#address":{"city":"Berlin","zip":"12345"}}"#,
                r#"{"s#age":29}"#,
                r#"{"s#tags":["a","b"]}"#,
                r#"{"s#verified":true}"#,
            ]
        );
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = Content::new("s", "i").property("a", 1).property("b", 2);
        let b = Content::new("s", "i").property("b", 2).property("a", 1);
        assert_eq!(canonicalize(&a).unwrap(), canonicalize(&b).unwrap());
    }

    #[test]
    fn test_empty_contents_yield_no_statements() {
        let content = Content::new("s", "i");
        assert!(canonicalize(&content).unwrap().is_empty());
    }

    #[test]
    fn test_missing_vocabulary() {
        let content = Content::new("", "i").property("a", 1);
        assert!(matches!(canonicalize(&content), Err(CoreError::MissingVocabulary)));
    }

    #[test]
    fn test_null_value_rejected() {
        let content = Content::new("s", "i").property("gone", Value::Null);
        let err = canonicalize(&content).unwrap_err();
        assert!(
            matches!(err, CoreError::MalformedStatementValue { ref key, .. } if key == "gone")
        );
    }

    #[test]
    fn test_holder_is_a_statement() {
        let content = Content::new("s", "i")
            .holder("did:cord:alice")
            .property("name", "Alice");
        let statements = canonicalize(&content).unwrap();
        let texts: Vec<&str> = statements.iter().map(|s| s.text.as_str()).collect();

        assert_eq!(texts, vec![r#"{"@id":"did:cord:alice"}"#, r#"{"s#name":"Alice"}"#]);
        assert_eq!(statements[0].property, HOLDER_PREDICATE);
    }

    #[test]
    fn test_holder_statement_survives_without() {
        let content = Content::new("s", "i")
            .holder("did:cord:alice")
            .property("name", "Alice");
        let statements = canonicalize(&content.without(["name"])).unwrap();

        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].text, r#"{"@id":"did:cord:alice"}"#);
    }

    #[test]
    fn test_string_escaping_is_json() {
        let content = Content::new("s", "i").property("quote", "say \"hi\"");
        let statements = canonicalize(&content).unwrap();
        assert_eq!(statements[0].text, r#"{"s#quote":"say \"hi\""}"#);
    }
}
