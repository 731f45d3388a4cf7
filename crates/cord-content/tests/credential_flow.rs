//! End-to-end issuance, disclosure, presentation and verification.

use cord_content::core::canonical::statement;
use cord_content::core::statement::statement_digest;
use cord_content::core::Presentation;
use cord_content::{
    Content, ContentKernel, Credential, Digest, Disclosure, KernelConfig, KernelError, KeyRegistry,
    Keypair, KeypairSigner, PresentOptions, VerificationError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn alice_content() -> Content {
    Content::new("schema:cord:person", "did:cord:issuer")
        .holder("did:cord:alice")
        .property("name", "Alice")
        .property("age", 29)
}

fn alice_signer() -> KeypairSigner {
    KeypairSigner::new(Keypair::from_seed(&[0xA1; 32]), "did:cord:alice#key-1")
}

fn registry() -> KeyRegistry {
    let signer = alice_signer();
    KeyRegistry::new().with_key("did:cord:alice#key-1", signer.public_key())
}

#[test]
fn test_selective_disclosure_soundness() {
    init_tracing();
    let kernel = ContentKernel::default();
    let credential = kernel.issue(alice_content(), vec![]).unwrap();

    // Hiding age still verifies against the full hash list. The holder
    // statement stays disclosed.
    let hidden = kernel.remove_properties(&credential, ["age"]).unwrap();
    assert_eq!(hidden.content_hashes.len(), 3);
    assert_eq!(hidden.content_nonce_map.len(), 2);
    assert!(kernel.verify_credential(&hidden).verified);

    // A fabricated name reusing the real name's nonce fails.
    let digest_of = |value: &str| {
        let stmt = statement("schema:cord:person", "name", &serde_json::json!(value)).unwrap();
        statement_digest(kernel.hasher(), &stmt)
    };
    let mut forged = hidden.clone();
    forged.content = forged.content.property("name", "Mallory");
    let nonce = forged.content_nonce_map.remove(&digest_of("Alice")).unwrap();
    forged.content_nonce_map.insert(digest_of("Mallory"), nonce);

    let result = kernel.verify_credential(&forged);
    assert!(!result.verified);
    assert!(matches!(
        result.errors.as_slice(),
        [VerificationError::InvalidProofForStatement { .. }]
    ));
}

#[test]
fn test_holder_cannot_be_reassigned() {
    init_tracing();
    let kernel = ContentKernel::default();
    let mallory = KeypairSigner::new(Keypair::from_seed(&[0x66; 32]), "did:cord:mallory#key-1");
    let registry = KeyRegistry::new().with_key("did:cord:mallory#key-1", mallory.public_key());

    let mut stolen = kernel.issue(alice_content(), vec![]).unwrap();
    stolen.content.holder_uri = Some("did:cord:mallory".into());
    let presentation = kernel
        .present(&stolen, PresentOptions::new().challenge("c").signer(&mallory))
        .unwrap();

    let result = kernel.verify_presentation(&presentation, &registry, Some("c"));
    assert!(!result.verified);
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, VerificationError::NoProofForStatement { .. })));
}

#[test]
fn test_order_independence_with_supplied_nonces() {
    let kernel = ContentKernel::default();
    let credential = kernel.issue(alice_content(), vec![]).unwrap();

    // Same properties inserted in the other order.
    let reordered = Content::new("schema:cord:person", "did:cord:issuer")
        .holder("did:cord:alice")
        .property("age", 29)
        .property("name", "Alice");
    let rehashed = kernel
        .hash_with_nonces(&reordered, &credential.content_nonce_map)
        .unwrap();

    assert_eq!(rehashed.hashes, credential.content_hashes);
    assert_eq!(
        cord_content::core::aggregate(kernel.hasher(), &rehashed.hashes, &[]),
        credential.root_hash
    );
}

#[test]
fn test_every_bit_flip_is_detected() {
    let kernel = ContentKernel::default();
    let credential = kernel.issue(alice_content(), vec![]).unwrap();

    for index in 0..credential.content_hashes.len() {
        for bit in 0..256 {
            let mut tampered = credential.clone();
            let mut bytes = *tampered.content_hashes[index].as_bytes();
            bytes[bit / 8] ^= 1 << (bit % 8);
            tampered.content_hashes[index] = Digest::from_bytes(bytes);
            tampered.content_hashes.sort();

            let result = kernel.verify_credential(&tampered);
            assert!(
                result
                    .errors
                    .iter()
                    .any(|e| matches!(e, VerificationError::RootHashUnverifiable { .. })),
                "flip of bit {bit} in hash {index} went unnoticed"
            );
        }
    }
}

#[test]
fn test_evidence_chaining() {
    init_tracing();
    let kernel = ContentKernel::default();
    let kyc = kernel
        .issue(
            Content::new("schema:cord:kyc", "did:cord:bank")
                .holder("did:cord:alice")
                .property("level", 2),
            vec![],
        )
        .unwrap();
    let parent = kernel.issue(alice_content(), vec![kyc.clone()]).unwrap();

    assert_eq!(parent.evidence_root_hashes(), vec![kyc.root_hash]);
    assert!(kernel.verify_credential(&parent).verified);

    // Tamper with the nested evidence's root hash.
    let mut tampered = parent.clone();
    tampered.evidence_ids[0].root_hash = Digest::from_bytes([0x13; 32]);

    let result = kernel.verify_credential(&tampered);
    assert!(!result.verified);
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, VerificationError::RootHashUnverifiable { .. })));
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, VerificationError::InvalidEvidence { index: 0, .. })));
}

#[test]
fn test_issue_refuses_unverifiable_evidence() {
    let kernel = ContentKernel::default();
    let mut kyc = kernel
        .issue(Content::new("schema:cord:kyc", "did:cord:bank").property("level", 2), vec![])
        .unwrap();
    kyc.content = kyc.content.property("level", 3);

    let err = kernel.issue(alice_content(), vec![kyc]).unwrap_err();
    match err {
        KernelError::InvalidEvidence { index, errors } => {
            assert_eq!(index, 0);
            assert!(matches!(
                errors.as_slice(),
                [VerificationError::NoProofForStatement { .. }]
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_evidence_depth_limit() {
    let kernel = ContentKernel::new(KernelConfig {
        max_evidence_depth: 1,
        ..KernelConfig::default()
    });
    let leaf = kernel.issue(Content::new("s", "i").property("n", 0), vec![]).unwrap();
    let middle = kernel.issue(Content::new("s", "i").property("n", 1), vec![leaf]).unwrap();

    // Issuing over `middle` verifies it at depth 0, which is allowed.
    let top = kernel.issue(Content::new("s", "i").property("n", 2), vec![middle]).unwrap();

    let result = kernel.verify_credential(&top);
    assert!(matches!(
        result.errors.as_slice(),
        [VerificationError::InvalidEvidence { source, .. }]
            if matches!(**source, VerificationError::EvidenceTooDeep(1))
    ));
}

#[test]
fn test_json_round_trip_verifies() {
    let kernel = ContentKernel::default();
    let credential = kernel.issue(alice_content(), vec![]).unwrap();
    let reduced = kernel.remove_properties(&credential, ["age"]).unwrap();

    let text = serde_json::to_string(&reduced).unwrap();
    let parsed: Credential = serde_json::from_str(&text).unwrap();

    assert_eq!(parsed, reduced);
    assert!(kernel.verify_credential(&parsed).verified);
}

#[test]
fn test_json_rejects_unprefixed_digest() {
    let kernel = ContentKernel::default();
    let credential = kernel.issue(alice_content(), vec![]).unwrap();

    let mut value = serde_json::to_value(&credential).unwrap();
    value["rootHash"] = serde_json::Value::String(credential.root_hash.to_hex());

    assert!(serde_json::from_value::<Credential>(value).is_err());
}

#[test]
fn test_signed_presentation_round_trip() {
    init_tracing();
    let kernel = ContentKernel::default();
    let signer = alice_signer();
    let credential = kernel.issue(alice_content(), vec![]).unwrap();

    let presentation = kernel
        .present(
            &credential,
            PresentOptions::new()
                .disclosure(Disclosure::show(["name", "unknown"]))
                .challenge("verifier-nonce-7")
                .signer(&signer),
        )
        .unwrap();

    let text = serde_json::to_string(&presentation).unwrap();
    let parsed: Presentation = serde_json::from_str(&text).unwrap();

    let keys: Vec<&str> = parsed.credentials[0].content.keys().collect();
    assert_eq!(keys, vec!["name"]);

    let result = kernel.verify_presentation(&parsed, &registry(), Some("verifier-nonce-7"));
    assert!(result.verified, "{:?}", result.errors);

    let replayed = kernel.verify_presentation(&parsed, &registry(), Some("another-nonce"));
    assert!(matches!(
        replayed.errors.as_slice(),
        [VerificationError::ChallengeMismatch { .. }]
    ));
}

#[test]
fn test_present_many_shares_holder() {
    let kernel = ContentKernel::default();
    let signer = alice_signer();
    let person = kernel.issue(alice_content(), vec![]).unwrap();
    let membership = kernel
        .issue(
            Content::new("schema:cord:member", "did:cord:club")
                .holder("did:cord:alice")
                .property("since", 2019),
            vec![],
        )
        .unwrap();

    let presentation = kernel
        .present_many(
            &[person, membership],
            PresentOptions::new().challenge("c").signer(&signer),
        )
        .unwrap();

    assert_eq!(presentation.credentials.len(), 2);
    assert!(kernel
        .verify_presentation(&presentation, &registry(), Some("c"))
        .verified);

    // Dropping one credential invalidates the signature.
    let mut partial = presentation.clone();
    partial.credentials.pop();
    let result = kernel.verify_presentation(&partial, &registry(), Some("c"));
    assert!(result.errors.contains(&VerificationError::SignatureFailed));
}

#[test]
fn test_unknown_signing_key() {
    let kernel = ContentKernel::default();
    let signer = alice_signer();
    let credential = kernel.issue(alice_content(), vec![]).unwrap();
    let presentation = kernel
        .present(&credential, PresentOptions::new().signer(&signer))
        .unwrap();

    let result = kernel.verify_presentation(&presentation, &KeyRegistry::new(), None);
    assert!(matches!(
        result.errors.as_slice(),
        [VerificationError::SignatureFailed]
    ));
}
