//! Reactive 401 handling: refresh then replay the request at most once.

#![allow(clippy::unwrap_used)]

use mercadito_client::ApiError;
use mercadito_client::session::CredentialPair;
use mercadito_integration_tests::TestApi;

/// An access token that looks fine client-side (future `exp`) but that the
/// server rejects - the reactive path, invisible to the proactive expiry
/// check.
fn stale_looking_pair(api: &TestApi) -> CredentialPair {
    let (_, refresh) = api.state.issue_pair();
    CredentialPair {
        access: api.state.unhonored_access_token(),
        refresh,
    }
}

#[tokio::test]
async fn server_side_401_refreshes_and_replays_once() {
    let api = TestApi::start().await;
    let client = api.client();

    client.session().install(stale_looking_pair(&api)).unwrap();

    let orders = client.my_orders().await.unwrap();
    assert_eq!(orders.len(), 1);

    // First attempt 401s, one refresh, one replay that succeeds.
    assert_eq!(api.protected_calls(), 2);
    assert_eq!(api.refresh_calls(), 1);
    assert!(client.session().identity().is_some());
}

#[tokio::test]
async fn second_401_after_replay_is_terminal() {
    let api = TestApi::start().await;
    let client = api.client();

    client.session().install(stale_looking_pair(&api)).unwrap();
    api.state.set_protected_always_401(true);

    let err = client.my_orders().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    // Exactly one refresh and one replay: no loop on a persistently
    // unauthorized endpoint.
    assert_eq!(api.protected_calls(), 2);
    assert_eq!(api.refresh_calls(), 1);
}

#[tokio::test]
async fn failed_refresh_propagates_the_original_401() {
    let api = TestApi::start().await;
    let client = api.client();

    client.session().install(stale_looking_pair(&api)).unwrap();
    api.state.set_refresh_enabled(false);

    let err = client.my_orders().await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));

    // No replay once the refresh is rejected; the session is cleared.
    assert_eq!(api.protected_calls(), 1);
    assert_eq!(api.refresh_calls(), 1);
    assert!(client.session().identity().is_none());
}

#[tokio::test]
async fn anonymous_401_does_not_attempt_refresh() {
    let api = TestApi::start().await;
    let client = api.client();

    // No stored pair at all: the request goes out bare, the 401 is final,
    // and no refresh is attempted because there is nothing to refresh with.
    api.state.issue_pair();
    let err = client
        .profile(mercadito_core::UserId::new(41))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized));
    assert_eq!(api.refresh_calls(), 0);
}

#[tokio::test]
async fn replayed_request_carries_the_refreshed_bearer() {
    let api = TestApi::start().await;
    let client = api.client();

    client.session().install(stale_looking_pair(&api)).unwrap();

    // The profile endpoint honors only the server's current access token;
    // success after a 401 proves the replay used the refreshed one.
    let profile = client.profile(mercadito_core::UserId::new(41)).await.unwrap();
    assert_eq!(profile.full_name.as_deref(), Some("Ana Torres"));
    assert_eq!(profile.address.as_deref(), Some("Av. Siempre Viva 742"));
    assert_eq!(api.refresh_calls(), 1);
}
