//! Behavioral tests for the token verification flow.

use super::mocks::{build_service, seed_profile, GatedTokenStore, MockLinkNotifier};
use crate::repositories::profile::MockUserProfileStore;
use crate::services::token::TokenVerificationService;
use std::sync::Arc;
use crate::domain::entities::EmailToken;
use crate::domain::value_objects::Caller;
use crate::errors::VerificationError;
use crate::repositories::profile::UserProfileStore;
use crate::repositories::secret::SecretStore;

const USER: &str = "user-1";
const EMAIL: &str = "alice@example.com";

fn extract_token(link: &str) -> String {
    let start = link.find("token=").unwrap() + "token=".len();
    let rest = &link[start..];
    rest[..rest.find('&').unwrap_or(rest.len())].to_string()
}

#[tokio::test]
async fn test_send_welcome_issues_token_and_link() {
    let (service, store, _, notifier) = build_service();
    let caller = Caller::authenticated(USER);

    let result = service
        .send_welcome(&caller, USER, EMAIL, Some("Alice"))
        .await
        .unwrap();

    assert!(result.expires_in_seconds > 0);
    assert!(result.expires_in_seconds <= 24 * 3600);

    let stored = store.get(USER).await.unwrap().unwrap();
    let link = notifier.last_link_for(EMAIL).await.unwrap();
    assert_eq!(extract_token(&link), stored.token);
    assert!(link.contains(&format!("user_id={}", USER)));
    assert!(link.starts_with("https://app.mailproof.dev/verify-email?"));
    assert_eq!(
        notifier.last_name_for(EMAIL).await.unwrap(),
        Some("Alice".to_string())
    );
}

#[tokio::test]
async fn test_send_welcome_requires_authentication() {
    let (service, store, _, notifier) = build_service();

    let result = service
        .send_welcome(&Caller::Anonymous, USER, EMAIL, None)
        .await;

    assert!(matches!(result, Err(VerificationError::Unauthenticated)));
    assert!(store.is_empty().await);
    assert_eq!(notifier.send_count(), 0);
}

#[tokio::test]
async fn test_send_welcome_rejects_malformed_email() {
    let (service, store, _, _) = build_service();
    let caller = Caller::authenticated(USER);

    let result = service
        .send_welcome(&caller, USER, "not-an-email", None)
        .await;

    assert!(matches!(result, Err(VerificationError::Validation { .. })));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_send_welcome_rejects_blank_user_id() {
    let (service, store, _, _) = build_service();
    let caller = Caller::authenticated(USER);

    for blank in ["", "   "] {
        let result = service.send_welcome(&caller, blank, EMAIL, None).await;
        assert!(matches!(result, Err(VerificationError::Validation { .. })));
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_send_welcome_targets_named_account() {
    let (service, store, _, notifier) = build_service();
    // The capability gate accepts any authenticated caller, not just the
    // target account holder
    let caller = Caller::authenticated("admin-1");

    service
        .send_welcome(&caller, USER, EMAIL, None)
        .await
        .unwrap();

    let stored = store.get(USER).await.unwrap().unwrap();
    assert_eq!(stored.user_id, USER);
    let link = notifier.last_link_for(EMAIL).await.unwrap();
    assert!(link.contains(&format!("user_id={}", USER)));
}

#[tokio::test]
async fn test_send_welcome_replaces_pending_token() {
    let (service, store, _, notifier) = build_service();
    let caller = Caller::authenticated(USER);

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let first = store.get(USER).await.unwrap().unwrap();

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let second = store.get(USER).await.unwrap().unwrap();

    assert_ne!(first.token, second.token);
    assert_eq!(notifier.send_count(), 2);
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_send_welcome_delivery_failure_keeps_token() {
    let (service, store, _, notifier) = build_service();
    let caller = Caller::authenticated(USER);
    notifier.simulate_failure(true);

    let result = service.send_welcome(&caller, USER, EMAIL, None).await;

    assert!(matches!(result, Err(VerificationError::Delivery { .. })));
    // The token survives so a later resend can replace it
    assert!(store.get(USER).await.unwrap().is_some());
}

#[tokio::test]
async fn test_confirm_token_success_updates_profile() {
    let (service, store, profiles, notifier) = build_service();
    let caller = Caller::authenticated(USER);
    seed_profile(&profiles, USER, EMAIL).await;

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let token = extract_token(&notifier.last_link_for(EMAIL).await.unwrap());

    let result = service.confirm_token(USER, &token).await.unwrap();
    assert!(result.verified);
    assert!(!result.already_verified);
    assert!(result.profile_updated);

    let profile = profiles.find_by_id(USER).await.unwrap().unwrap();
    assert!(profile.email_verified);
    assert!(profile.email_verified_at.is_some());

    // The consumed record is kept, flagged verified
    let stored = store.get(USER).await.unwrap().unwrap();
    assert!(stored.verified);
    assert!(stored.verified_at.is_some());
}

#[tokio::test]
async fn test_confirm_token_is_idempotent() {
    let (service, _, profiles, notifier) = build_service();
    let caller = Caller::authenticated(USER);
    seed_profile(&profiles, USER, EMAIL).await;

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let token = extract_token(&notifier.last_link_for(EMAIL).await.unwrap());

    service.confirm_token(USER, &token).await.unwrap();
    let replay = service.confirm_token(USER, &token).await.unwrap();

    assert!(replay.verified);
    assert!(replay.already_verified);
    assert!(!replay.profile_updated);
    // The profile flag was flipped exactly once
    assert_eq!(profiles.verified_calls().await.len(), 1);
}

#[tokio::test]
async fn test_confirm_token_already_verified_wins_over_mismatch() {
    let (service, _, profiles, notifier) = build_service();
    let caller = Caller::authenticated(USER);
    seed_profile(&profiles, USER, EMAIL).await;

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let token = extract_token(&notifier.last_link_for(EMAIL).await.unwrap());
    service.confirm_token(USER, &token).await.unwrap();

    // Once consumed, even a wrong token reports already-verified
    let result = service.confirm_token(USER, "deadbeef").await.unwrap();
    assert!(result.already_verified);
}

#[tokio::test]
async fn test_confirm_token_validation() {
    let (service, _, _, _) = build_service();

    assert!(matches!(
        service.confirm_token("", "sometoken").await,
        Err(VerificationError::Validation { .. })
    ));
    assert!(matches!(
        service.confirm_token(USER, "  ").await,
        Err(VerificationError::Validation { .. })
    ));
}

#[tokio::test]
async fn test_confirm_token_unknown_user() {
    let (service, _, _, _) = build_service();

    let result = service.confirm_token("nobody", "sometoken").await;
    assert!(matches!(result, Err(VerificationError::NotFound { .. })));
}

#[tokio::test]
async fn test_confirm_token_expired_destroys_record() {
    let (service, store, _, _) = build_service();

    let token = EmailToken::new_with_ttl(USER.to_string(), EMAIL.to_string(), 0);
    let presented = token.token.clone();
    store.put(USER, &token).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;

    let result = service.confirm_token(USER, &presented).await;
    assert!(matches!(result, Err(VerificationError::Expired)));
    assert!(store.get(USER).await.unwrap().is_none());
}

#[tokio::test]
async fn test_confirm_token_mismatch_keeps_record() {
    let (service, store, profiles, notifier) = build_service();
    let caller = Caller::authenticated(USER);
    seed_profile(&profiles, USER, EMAIL).await;

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let token = extract_token(&notifier.last_link_for(EMAIL).await.unwrap());

    // Tokens have no attempt budget; mismatches never destroy the record
    for _ in 0..10 {
        let result = service.confirm_token(USER, "deadbeef").await;
        assert!(matches!(
            result,
            Err(VerificationError::Mismatch { remaining: None })
        ));
    }

    let result = service.confirm_token(USER, &token).await.unwrap();
    assert!(result.verified);
}

#[tokio::test]
async fn test_confirm_token_profile_failure_is_nonfatal() {
    let (service, store, profiles, notifier) = build_service();
    let caller = Caller::authenticated(USER);
    // No profile seeded: the flag update will fail with NotFound

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let token = extract_token(&notifier.last_link_for(EMAIL).await.unwrap());

    let result = service.confirm_token(USER, &token).await.unwrap();
    assert!(result.verified);
    assert!(!result.profile_updated);

    // The token stays consumed despite the profile failure
    assert!(store.get(USER).await.unwrap().unwrap().verified);
    assert_eq!(profiles.verified_calls().await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_confirms_flip_profile_once() {
    let store = Arc::new(GatedTokenStore::new(2));
    let profiles = Arc::new(MockUserProfileStore::new());
    seed_profile(&profiles, USER, EMAIL).await;

    let token = EmailToken::new(USER.to_string(), EMAIL.to_string());
    let presented = token.token.clone();
    store.seed(USER, &token).await;

    let service = Arc::new(TokenVerificationService::new(
        store,
        profiles.clone(),
        Arc::new(MockLinkNotifier::new()),
    ));

    // Both confirmations read the unverified record before either claims it
    let first = tokio::spawn({
        let service = service.clone();
        let presented = presented.clone();
        async move { service.confirm_token(USER, &presented).await }
    });
    let second = tokio::spawn({
        let service = service.clone();
        let presented = presented.clone();
        async move { service.confirm_token(USER, &presented).await }
    });

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    // Both succeed, but exactly one is the first confirmation and the
    // profile flag flips exactly once
    assert!(first.verified && second.verified);
    assert_eq!(
        (!first.already_verified) as usize + (!second.already_verified) as usize,
        1,
        "exactly one confirmation may be the first"
    );
    assert_eq!(profiles.verified_calls().await.len(), 1);
}

#[tokio::test]
async fn test_resend_requires_authentication() {
    let (service, _, _, _) = build_service();

    let result = service.resend(&Caller::Anonymous, USER).await;
    assert!(matches!(result, Err(VerificationError::Unauthenticated)));
}

#[tokio::test]
async fn test_resend_rejects_blank_user_id() {
    let (service, _, _, _) = build_service();

    let result = service.resend(&Caller::authenticated(USER), " ").await;
    assert!(matches!(result, Err(VerificationError::Validation { .. })));
}

#[tokio::test]
async fn test_resend_unknown_user() {
    let (service, _, _, _) = build_service();

    let result = service.resend(&Caller::authenticated(USER), "nobody").await;
    assert!(matches!(result, Err(VerificationError::NotFound { .. })));
}

#[tokio::test]
async fn test_resend_short_circuits_when_verified() {
    let (service, store, profiles, notifier) = build_service();
    let mut profile = seed_profile(&profiles, USER, EMAIL).await;
    profile.mark_email_verified();
    profiles.insert(profile).await;

    let result = service
        .resend(&Caller::authenticated(USER), USER)
        .await
        .unwrap();

    assert!(result.already_verified);
    assert!(result.message_id.is_none());
    assert_eq!(notifier.send_count(), 0);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_resend_issues_fresh_token() {
    let (service, store, profiles, notifier) = build_service();
    let caller = Caller::authenticated(USER);
    seed_profile(&profiles, USER, EMAIL).await;

    service.send_welcome(&caller, USER, EMAIL, None).await.unwrap();
    let first = store.get(USER).await.unwrap().unwrap();

    let result = service.resend(&caller, USER).await.unwrap();
    assert!(!result.already_verified);
    assert!(result.message_id.is_some());

    // The pending token was replaced and the old link is dead
    let second = store.get(USER).await.unwrap().unwrap();
    assert_ne!(first.token, second.token);

    let stale = service.confirm_token(USER, &first.token).await;
    assert!(matches!(
        stale,
        Err(VerificationError::Mismatch { remaining: None })
    ));

    // The profile's display name travels with the resend
    assert_eq!(
        notifier.last_name_for(EMAIL).await.unwrap(),
        Some("Alice".to_string())
    );
}
