//! Walks both verification flows over in-memory backends.
//!
//! Run with: cargo run --example verification_demo

use std::sync::Arc;

use mp_core::domain::entities::UserProfile;
use mp_core::domain::value_objects::Caller;
use mp_core::repositories::profile::{MockUserProfileStore, UserProfileStore};
use mp_core::repositories::secret::MemorySecretStore;
use mp_core::services::code::CodeVerificationService;
use mp_core::services::rate_limit::SlidingWindowRateLimiter;
use mp_core::services::sweep::SweepService;
use mp_core::services::token::TokenVerificationService;
use mp_infra::email::MockMailer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mailer = Arc::new(MockMailer::new());

    // Code flow: anonymous caller proves control of an address
    let code_store = Arc::new(MemorySecretStore::new());
    let code_service = CodeVerificationService::new(
        code_store.clone(),
        mailer.clone(),
        Arc::new(SlidingWindowRateLimiter::new()),
    );

    let issued = code_service.request_code("alice@example.com").await?;
    println!(
        "Code issued, expires in {}s (message {})",
        issued.expires_in_seconds, issued.message_id
    );

    let code = mailer.last_code_for("alice@example.com").await.unwrap();
    let confirmed = code_service.confirm_code("alice@example.com", &code).await?;
    println!("Code confirmed: verified={}", confirmed.verified);

    // Token flow: authenticated account holder verifies the email on file
    let token_store = Arc::new(MemorySecretStore::new());
    let profiles = Arc::new(MockUserProfileStore::new());
    profiles
        .insert(UserProfile::new(
            "user-1".to_string(),
            "alice@example.com".to_string(),
            Some("Alice".to_string()),
        ))
        .await;

    let token_service =
        TokenVerificationService::new(token_store.clone(), profiles.clone(), mailer.clone());

    let caller = Caller::authenticated("user-1");
    token_service
        .send_welcome(&caller, "user-1", "alice@example.com", Some("Alice"))
        .await?;

    let link = mailer.last_link_for("alice@example.com").await.unwrap();
    println!("Welcome email sent with link: {}", link);

    let token = link
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split('&').next())
        .unwrap()
        .to_string();

    let result = token_service.confirm_token("user-1", &token).await?;
    println!(
        "Token confirmed: verified={} profile_updated={}",
        result.verified, result.profile_updated
    );

    let profile = profiles.find_by_id("user-1").await?.unwrap();
    println!("Profile email_verified={}", profile.email_verified);

    // Sweep: remove whatever has expired
    let sweep = SweepService::new(code_store, token_store);
    let report = sweep.run_sweep().await;
    println!(
        "Sweep removed {} codes and {} tokens",
        report.codes_deleted, report.tokens_deleted
    );

    Ok(())
}
