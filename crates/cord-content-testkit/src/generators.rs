//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value;

use cord_content_core::identifier::{ALLOWED_PAYLOAD_LENGTHS, MAX_KIND, RESERVED_KINDS};
use cord_content_core::{Content, Digest, IdentifierKind, Keypair};

/// Generate a random keypair.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a random Digest.
pub fn digest() -> impl Strategy<Value = Digest> {
    any::<[u8; 32]>().prop_map(Digest::from_bytes)
}

/// Generate a registered identifier kind.
pub fn identifier_kind() -> impl Strategy<Value = IdentifierKind> {
    prop::sample::select(IdentifierKind::ALL.to_vec())
}

/// Generate any encodable kind tag (reserved tags excluded).
pub fn kind_tag() -> impl Strategy<Value = u16> {
    (0u16..=MAX_KIND).prop_filter("reserved kind", |k| !RESERVED_KINDS.contains(k))
}

/// Generate a `(payload, kind)` pair the codec accepts.
///
/// Two-byte kinds only carry 1, 32 or 33-byte payloads.
pub fn codec_input() -> impl Strategy<Value = (Vec<u8>, u16)> {
    (kind_tag(), prop::sample::select(ALLOWED_PAYLOAD_LENGTHS.to_vec()))
        .prop_filter("undecodable length", |(kind, len)| {
            *kind < 64 || matches!(len, 1 | 32 | 33)
        })
        .prop_flat_map(|(kind, len)| {
            (prop::collection::vec(any::<u8>(), len), Just(kind))
        })
}

/// Generate a property name.
pub fn property_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,15}".prop_map(String::from)
}

/// Generate a non-null JSON value, nested up to two levels.
pub fn property_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[ -~]{0,24}".prop_map(Value::from),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
            prop::collection::btree_map(property_name(), inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

/// Parameters for generating content.
#[derive(Debug, Clone)]
pub struct ContentParams {
    pub schema_uri: String,
    pub holder_uri: Option<String>,
    pub properties: Vec<(String, Value)>,
}

impl Arbitrary for ContentParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (
            "schema:cord:[a-zA-Z0-9]{8,16}",
            prop::option::of("did:cord:[a-z]{3,12}"),
            prop::collection::btree_map(property_name(), property_value(), 1..8),
        )
            .prop_map(|(schema_uri, holder_uri, properties)| ContentParams {
                schema_uri,
                holder_uri,
                properties: properties.into_iter().collect(),
            })
            .boxed()
    }
}

/// Build content from parameters.
pub fn content_from_params(params: &ContentParams) -> Content {
    let mut content = Content::new(params.schema_uri.as_str(), "did:cord:issuer");
    if let Some(holder) = &params.holder_uri {
        content = content.holder(holder.as_str());
    }
    params
        .properties
        .iter()
        .fold(content, |c, (k, v)| c.property(k.as_str(), v.clone()))
}
