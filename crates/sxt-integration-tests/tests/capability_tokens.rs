//! Login, then mint capability tokens with the session key.

use std::sync::Arc;

use serde_json::json;
use sxt_auth::{AuthClient, AuthSession, Credentials};
use sxt_capabilities::{
    AttenuationSet, BISCUITS_FIELD, Capability, CapabilityError, CapabilityToken,
    CapabilityTokenBuilder, operation,
};
use sxt_core::AuthRoute;
use sxt_crypto::KeyPair;
use sxt_test::{
    MockTransport, RecordingSessionStore, auth_code_response, test_join_code, test_user_id,
    token_response,
};

fn logged_in_keypair() -> KeyPair {
    let transport = Arc::new(
        MockTransport::new()
            .with_json(AuthRoute::Code, 200, &auth_code_response("challenge"))
            .with_json(AuthRoute::Token, 200, &token_response("access", "refresh")),
    );
    let mut session = AuthSession::new(
        AuthClient::new(transport),
        Arc::new(RecordingSessionStore::new()),
    );
    let active = session
        .bootstrap(Credentials::stored(test_user_id(), Some(test_join_code())))
        .unwrap();
    active.keypair().clone()
}

#[test]
fn test_mint_after_login_verifies_under_session_key() {
    let keypair = logged_in_keypair();
    let public = keypair.export_public_key();

    let token = CapabilityTokenBuilder::new()
        .capability(Capability::new(operation::DQL_SELECT, "eth.testtable106").unwrap())
        .build(&keypair)
        .unwrap();

    assert!(!token.as_str().is_empty());
    token.verify(&public).unwrap();
    assert_eq!(
        token.capabilities(&public).unwrap(),
        vec![Capability::new("dql_select", "eth.testtable106").unwrap()]
    );
    assert!(token.authorizes(&public, "dql_select", "eth.testtable106").unwrap());
    assert!(!token.authorizes(&public, "dml_insert", "eth.testtable106").unwrap());
}

#[test]
fn test_token_does_not_verify_under_another_key() {
    let keypair = logged_in_keypair();
    let stranger = KeyPair::generate().unwrap().export_public_key();

    let token = CapabilityTokenBuilder::new()
        .capability(Capability::new(operation::DDL_CREATE, "eth.blocks").unwrap())
        .build(&keypair)
        .unwrap();

    assert!(token.verify(&stranger).is_err());
}

#[test]
fn test_multiple_capabilities_and_wildcard() {
    let keypair = logged_in_keypair();
    let public = keypair.export_public_key();

    let token = CapabilityTokenBuilder::new()
        .capabilities([
            Capability::new(operation::DML_INSERT, "eth.blocks").unwrap(),
            Capability::any_operation("eth.logs").unwrap(),
        ])
        .build(&keypair)
        .unwrap();

    assert_eq!(token.capabilities(&public).unwrap().len(), 2);
    assert!(token.authorizes(&public, "dml_insert", "eth.blocks").unwrap());
    assert!(token.authorizes(&public, "ddl_drop", "eth.logs").unwrap());
    assert!(!token.authorizes(&public, "ddl_drop", "eth.blocks").unwrap());
}

#[test]
fn test_empty_builder_is_rejected_every_time() {
    let keypair = logged_in_keypair();
    for _ in 0..2 {
        assert!(matches!(
            CapabilityTokenBuilder::new().build(&keypair),
            Err(CapabilityError::EmptyCapabilities)
        ));
    }
}

#[test]
fn test_encoded_token_survives_transport_as_string() {
    let keypair = logged_in_keypair();
    let public = keypair.export_public_key();

    let minted = CapabilityTokenBuilder::new()
        .capability("dql_select:eth.testtable106".parse().unwrap())
        .build(&keypair)
        .unwrap();

    let received = CapabilityToken::from_encoded(minted.as_str().to_owned());
    assert!(received.authorizes(&public, "dql_select", "eth.testtable106").unwrap());

    let garbage = CapabilityToken::from_encoded("not-a-biscuit");
    assert!(garbage.verify(&public).is_err());
}

#[test]
fn test_attenuation_set_attaches_to_request_body() {
    let keypair = logged_in_keypair();
    let token = CapabilityTokenBuilder::new()
        .capability(Capability::new(operation::DQL_SELECT, "eth.testtable106").unwrap())
        .build(&keypair)
        .unwrap();

    let set: AttenuationSet = std::iter::once(token.clone()).collect();
    let mut body = json!({ "sqlText": "SELECT * FROM eth.testtable106" });
    set.attach_to(&mut body);

    assert_eq!(body[BISCUITS_FIELD], json!([token.as_str()]));
}
