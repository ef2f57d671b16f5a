//! Tests for the credential and token lifecycle service
//!
//! Runs the service over the in-memory repository seeded with one existing
//! user (id 42, username `alle`, password `oakheart`).

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use ats_domain::{RecoveryMailer, User, UserPatch, UserRepository, SAVE_FAILED};
use ats_providers::MemoryUserRepository;

use crate::auth::claims::Claims;
use crate::auth::password::verify_password;
use crate::auth::{AuthService, SigningKeys};

// Cost 4 bcrypt hash of "oakheart"; low cost keeps tests fast.
const ALLE_PASSWORD_HASH: &str = "$2a$04$Mhlu1.a4QchlVgGQFc/0N.qAw9tsXqm1OMwjJRaPRCWn47bpsRa4S";

const PRIVATE_PEM: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/private.pem");
const PUBLIC_PEM: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/test_data/public.pem");

/// Mailer double recording every dispatch
#[derive(Default)]
struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl RecoveryMailer for RecordingMailer {
    async fn send_recovery_code(&self, email: &str, code: &str) {
        self.sent
            .lock()
            .expect("mailer lock")
            .push((email.to_owned(), code.to_owned()));
    }
}

fn alle() -> User {
    User {
        id: 42,
        username: "alle".into(),
        first_name: "test".into(),
        last_name: "user".into(),
        email: "test@email.com".into(),
        password: ALLE_PASSWORD_HASH.into(),
        ..User::default()
    }
}

fn sarah() -> User {
    User {
        username: "sarah".into(),
        first_name: "Sarah".into(),
        last_name: "Lynn".into(),
        email: "sarah@email.com".into(),
        password: "oakheart".into(),
        ..User::default()
    }
}

fn seeded_service() -> (AuthService, Arc<MemoryUserRepository>, Arc<RecordingMailer>) {
    let repository = Arc::new(MemoryUserRepository::with_users(vec![alle()]));
    let mailer = Arc::new(RecordingMailer::default());
    let service = AuthService::new(
        repository.clone(),
        SigningKeys::new(PRIVATE_PEM, PUBLIC_PEM),
        mailer.clone(),
    );
    (service, repository, mailer)
}

#[tokio::test]
async fn test_create_user_assigns_next_id_and_hashes_password() {
    let (service, repository, _) = seeded_service();

    let mut user = sarah();
    service.create_user(&mut user).await.expect("create");

    assert_eq!(user.id, 43);
    let stored = repository.get(43).await.expect("get").expect("present");
    assert_eq!(stored.username, "sarah");
    assert_ne!(stored.password, "oakheart");
    assert!(verify_password("oakheart", &stored.password).expect("verify"));
}

#[tokio::test]
async fn test_create_user_rejects_duplicate_username_up_to_case() {
    let (service, _, _) = seeded_service();

    let mut duplicate = User {
        username: "Alle".into(),
        password: "whatever".into(),
        ..User::default()
    };
    let err = service
        .create_user(&mut duplicate)
        .await
        .expect_err("duplicate");
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn test_create_user_maps_save_sentinel_to_internal_error() {
    struct SaveFailingRepository;

    #[async_trait]
    impl UserRepository for SaveFailingRepository {
        async fn save(&self, _user: &mut User) -> i64 {
            SAVE_FAILED
        }
        async fn get_by_username(&self, _username: &str) -> ats_domain::Result<Option<User>> {
            Ok(None)
        }
        async fn get_by_email(&self, _email: &str) -> ats_domain::Result<Option<User>> {
            Ok(None)
        }
        async fn get(&self, _id: i64) -> ats_domain::Result<Option<User>> {
            Ok(None)
        }
        async fn get_all(&self) -> ats_domain::Result<Vec<User>> {
            Ok(Vec::new())
        }
        async fn update(&self, _patch: &UserPatch) -> ats_domain::Result<()> {
            Ok(())
        }
        async fn set_recovery_code(&self, _id: i64, _code: &str) -> ats_domain::Result<()> {
            Ok(())
        }
        async fn get_recovery_code(&self, _id: i64) -> ats_domain::Result<String> {
            Ok(String::new())
        }
        async fn set_resetting_code(&self, _id: i64, _code: &str) -> ats_domain::Result<()> {
            Ok(())
        }
        async fn get_resetting_code(&self, _id: i64) -> ats_domain::Result<String> {
            Ok(String::new())
        }
        async fn reset_password(&self, _id: i64, _hash: &str) -> ats_domain::Result<()> {
            Ok(())
        }
        async fn delete_by_id(&self, _id: i64) -> ats_domain::Result<()> {
            Ok(())
        }
    }

    let service = AuthService::new(
        Arc::new(SaveFailingRepository),
        SigningKeys::new(PRIVATE_PEM, PUBLIC_PEM),
        Arc::new(RecordingMailer::default()),
    );

    let mut user = sarah();
    let err = service.create_user(&mut user).await.expect_err("save fails");
    assert_eq!(err.status(), 500);
}

#[tokio::test]
async fn test_basic_auth_issues_token_pair() {
    let (service, _, _) = seeded_service();

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    assert!(!pair.access_token.is_empty());
    assert!(!pair.refresh_token.is_empty());
    assert_eq!(pair.access_token.split('.').count(), 3);
}

#[tokio::test]
async fn test_basic_auth_hides_existence_behind_403() {
    let (service, _, _) = seeded_service();

    let wrong_password = service
        .basic_auth_token("alle", "acorn")
        .await
        .expect_err("wrong password");
    assert_eq!(wrong_password.status(), 403);

    let unknown_user = service
        .basic_auth_token("nobody", "oakheart")
        .await
        .expect_err("unknown user");
    assert_eq!(unknown_user.status(), 403);
}

#[tokio::test]
async fn test_refresh_returns_access_token_only() {
    let (service, _, _) = seeded_service();

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    let refreshed = service
        .refresh_token(&pair.refresh_token)
        .await
        .expect("refresh");

    assert!(!refreshed.access_token.is_empty());
    let json = serde_json::to_value(&refreshed).expect("serialize");
    assert!(json.get("refreshToken").is_none());
}

#[tokio::test]
async fn test_refresh_rejects_garbage_token() {
    let (service, _, _) = seeded_service();
    let err = service
        .refresh_token("not.a.token")
        .await
        .expect_err("invalid");
    assert_eq!(err.status(), 403);
}

#[tokio::test]
async fn test_access_token_resolves_to_issuing_user() {
    let (service, _, _) = seeded_service();

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    let user = service
        .get_user_by_token(&pair.access_token)
        .await
        .expect("resolve")
        .expect("present");
    assert_eq!(user.id, 42);
    assert_eq!(user.username, "alle");
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let (service, _, _) = seeded_service();

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    let mut tampered = pair.access_token.clone();
    let flipped = if tampered.ends_with('A') { 'B' } else { 'A' };
    tampered.pop();
    tampered.push(flipped);

    let err = service
        .get_user_by_token(&tampered)
        .await
        .expect_err("tampered");
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let (service, _, _) = seeded_service();

    let expired = Claims {
        sub: "alle".into(),
        user_id: Some(42),
        exp: chrono::Utc::now().timestamp() - 7200,
    };
    let pem = std::fs::read(PRIVATE_PEM).expect("read key");
    let key = EncodingKey::from_rsa_pem(&pem).expect("parse key");
    let token = encode(&Header::new(Algorithm::RS256), &expired, &key).expect("encode");

    let err = service.get_user_by_token(&token).await.expect_err("expired");
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn test_non_rsa_algorithm_is_rejected() {
    let (service, _, _) = seeded_service();

    let claims = Claims {
        sub: "alle".into(),
        user_id: Some(42),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"shared-secret"),
    )
    .expect("encode");

    let err = service
        .get_user_by_token(&token)
        .await
        .expect_err("wrong algorithm");
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn test_token_for_vanished_subject_resolves_to_none() {
    let (service, repository, _) = seeded_service();

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    repository.delete_by_id(42).await.expect("delete");

    let resolved = service
        .get_user_by_token(&pair.access_token)
        .await
        .expect("resolve");
    assert!(resolved.is_none());
}

#[tokio::test]
async fn test_update_user_applies_sparse_patch() {
    let (service, repository, _) = seeded_service();

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    let patch = UserPatch {
        id: 42,
        email: Some("updated@email.com".into()),
        ..UserPatch::default()
    };
    service
        .update_user(&patch, &pair.access_token)
        .await
        .expect("update");

    let updated = repository.get(42).await.expect("get").expect("present");
    assert_eq!(updated.email, "updated@email.com");
    assert_eq!(updated.first_name, "test");
    assert_eq!(updated.last_name, "user");
    assert_eq!(updated.username, "alle");
}

#[tokio::test]
async fn test_update_user_rejects_credential_changes() {
    let (service, _, _) = seeded_service();

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    let patch = UserPatch {
        id: 42,
        username: Some("other".into()),
        ..UserPatch::default()
    };
    let err = service
        .update_user(&patch, &pair.access_token)
        .await
        .expect_err("credential change");
    assert_eq!(err.status(), 400);

    let patch = UserPatch {
        id: 42,
        password: Some("newpass".into()),
        ..UserPatch::default()
    };
    let err = service
        .update_user(&patch, &pair.access_token)
        .await
        .expect_err("credential change");
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn test_update_user_rejects_mismatched_subject() {
    let (service, repository, _) = seeded_service();

    let mut other = sarah();
    repository.save(&mut other).await;

    let pair = service
        .basic_auth_token("alle", "oakheart")
        .await
        .expect("token pair");
    let patch = UserPatch {
        id: other.id,
        email: Some("sneaky@email.com".into()),
        ..UserPatch::default()
    };
    let err = service
        .update_user(&patch, &pair.access_token)
        .await
        .expect_err("mismatch");
    assert_eq!(err.status(), 401);
}

#[tokio::test]
async fn test_update_user_rejects_invalid_token() {
    let (service, _, _) = seeded_service();

    let patch = UserPatch {
        id: 42,
        email: Some("updated@email.com".into()),
        ..UserPatch::default()
    };
    let err = service
        .update_user(&patch, "garbage")
        .await
        .expect_err("invalid token");
    assert_eq!(err.status(), 401);
}

#[tokio::test]
async fn test_user_info_projections() {
    let (service, _, _) = seeded_service();

    let by_id = service
        .get_user_by_id(42)
        .await
        .expect("get")
        .expect("present");
    assert_eq!(by_id.username, "alle");

    let by_name = service
        .get_user_by_username("ALLE")
        .await
        .expect("get")
        .expect("present");
    assert_eq!(by_name.id, 42);

    assert!(service.get_user_by_id(99).await.expect("get").is_none());

    let all = service.get_users().await.expect("get_users");
    assert_eq!(all.len(), 1);
    let json = serde_json::to_value(&all).expect("serialize");
    assert!(json[0].get("password").is_none());
}

#[tokio::test]
async fn test_recovery_flow_end_to_end() {
    let (service, repository, mailer) = seeded_service();

    service.request_recovery("alle").await.expect("request");

    let sent = mailer.sent.lock().expect("mailer lock").clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "test@email.com");
    let recovery_code = sent[0].1.clone();
    assert_eq!(
        repository.get_recovery_code(42).await.expect("get"),
        recovery_code
    );
    assert_eq!(repository.get_resetting_code(42).await.expect("get"), "");

    let exchanged = service
        .exchange_recovery_code("alle", &recovery_code)
        .await
        .expect("exchange");
    assert!(!exchanged.code.is_empty());
    // Exchanging wipes the recovery code.
    assert_eq!(repository.get_recovery_code(42).await.expect("get"), "");

    service
        .reset_password("alle", &exchanged.code, "ironbark")
        .await
        .expect("reset");
    let updated = repository.get(42).await.expect("get").expect("present");
    assert!(verify_password("ironbark", &updated.password).expect("verify"));
    assert_eq!(updated.resetting_code, "");

    // The resetting code authorizes exactly one change.
    let err = service
        .reset_password("alle", &exchanged.code, "again")
        .await
        .expect_err("consumed");
    assert_eq!(err.status(), 403);
}

#[tokio::test]
async fn test_recovery_rejects_wrong_codes() {
    let (service, _, _) = seeded_service();

    service.request_recovery("alle").await.expect("request");

    let err = service
        .exchange_recovery_code("alle", "wrong")
        .await
        .expect_err("wrong code");
    assert_eq!(err.status(), 403);

    let err = service
        .reset_password("alle", "wrong", "ironbark")
        .await
        .expect_err("wrong code");
    assert_eq!(err.status(), 403);
}

#[tokio::test]
async fn test_recovery_for_unknown_user_is_404() {
    let (service, _, _) = seeded_service();
    let err = service
        .request_recovery("nobody")
        .await
        .expect_err("unknown");
    assert_eq!(err.status(), 404);
}
