//! Session lifecycle: identity, cart identifier, proactive token refresh.

#![allow(clippy::unwrap_used)]

use secrecy::SecretString;

use mercadito_client::session::CredentialPair;
use mercadito_core::Email;
use mercadito_integration_tests::{MOCK_PASSWORD, MOCK_USER_ID, MOCK_VENDOR_ID, TestApi};

#[tokio::test]
async fn fresh_session_is_anonymous_with_stable_cart_id() {
    let api = TestApi::start().await;
    let client = api.client();

    assert!(client.session().identity().is_none());

    let cart_id = client.session().cart_id();
    assert_eq!(cart_id.as_str().len(), 30);
    assert_eq!(client.session().cart_id(), cart_id);
}

#[tokio::test]
async fn login_persists_pair_and_decodes_identity() {
    let api = TestApi::start().await;
    let client = api.client();

    let identity = client
        .session()
        .login(&Email::parse("ana@example.com").unwrap(), &SecretString::from(MOCK_PASSWORD))
        .await
        .unwrap();

    assert_eq!(identity.user_id.as_i32(), MOCK_USER_ID);
    assert_eq!(identity.vendor().unwrap().as_i32(), MOCK_VENDOR_ID);

    // The identity read is side-effect free and comes from the stored pair.
    let read_back = client.session().identity().unwrap();
    assert_eq!(read_back.user_id.as_i32(), MOCK_USER_ID);
}

#[tokio::test]
async fn login_rejection_surfaces_server_detail() {
    let api = TestApi::start().await;
    let client = api.client();

    let err = client
        .session()
        .login(&Email::parse("ana@example.com").unwrap(), &SecretString::from("wrong"))
        .await
        .unwrap_err();

    assert!(
        err.to_string().contains("No active account"),
        "unexpected error: {err}"
    );
    assert!(client.session().identity().is_none());
}

#[tokio::test]
async fn valid_access_token_makes_no_refresh_call() {
    let api = TestApi::start().await;
    let client = api.client();

    let (access, refresh) = api.state.issue_pair();
    client
        .session()
        .install(CredentialPair { access, refresh })
        .unwrap();

    let orders = client.my_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(api.refresh_calls(), 0);
}

#[tokio::test]
async fn expired_access_token_triggers_exactly_one_refresh() {
    let api = TestApi::start().await;
    let client = api.client();

    let (_, refresh) = api.state.issue_pair();
    let expired = api.state.expired_access_token();
    client
        .session()
        .install(CredentialPair {
            access: expired,
            refresh,
        })
        .unwrap();

    // The expired token is noticed before the request goes out: one refresh,
    // and the request itself succeeds with the fresh bearer on the first try.
    let orders = client.my_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(api.refresh_calls(), 1);
    assert_eq!(api.protected_calls(), 1);
}

#[tokio::test]
async fn failed_refresh_logs_out_and_rotates_cart_id() {
    let api = TestApi::start().await;
    let client = api.client();

    let (_, refresh) = api.state.issue_pair();
    client
        .session()
        .install(CredentialPair {
            access: api.state.expired_access_token(),
            refresh,
        })
        .unwrap();

    let cart_before = client.session().cart_id();

    api.state.set_refresh_enabled(false);

    let err = client.my_orders().await.unwrap_err();
    assert!(matches!(err, mercadito_client::ApiError::Unauthorized));

    // Forced logout: tokens gone, cart identifier regenerated.
    assert!(client.session().identity().is_none());
    let cart_after = client.session().cart_id();
    assert_ne!(cart_before, cart_after);
    assert_eq!(cart_after, client.session().cart_id());
}

#[tokio::test]
async fn logout_clears_tokens_and_cart_id() {
    let api = TestApi::start().await;
    let client = api.client();

    client
        .session()
        .login(&Email::parse("ana@example.com").unwrap(), &SecretString::from(MOCK_PASSWORD))
        .await
        .unwrap();
    let cart_before = client.session().cart_id();

    client.session().logout();

    assert!(client.session().identity().is_none());
    assert_ne!(client.session().cart_id(), cart_before);
}
