use chrono::{Duration, Utc};
use club_core::config::{ClubConfig, ValidationConfig};
use club_core::domain::model::{Club, ClubDraft};
use club_core::domain::ports::EntitySource;
use club_core::{AppError, ClubError, ClubService, InMemoryBackend, ValidationError};
use std::sync::Arc;

fn service(backend: Arc<InMemoryBackend>) -> ClubService {
    ClubService::new(backend, ValidationConfig::default(), &ClubConfig::default())
}

fn draft(name: &str) -> ClubDraft {
    ClubDraft {
        name: name.to_string(),
        image_url: None,
    }
}

#[tokio::test]
async fn test_create_club_sets_owner_and_invite_code() {
    let backend = Arc::new(InMemoryBackend::new());
    let before = Utc::now();
    let club = service(backend.clone())
        .create_club("owner", draft("  FC Blau-Weiß 1920 "))
        .await
        .unwrap();

    assert_eq!(club.name, "FC Blau-Weiß 1920");
    assert_eq!(club.admin_ids, vec!["owner".to_string()]);
    assert_eq!(club.member_ids, vec!["owner".to_string()]);
    assert_eq!(club.invite_code.len(), ValidationConfig::default().invite_code_length);

    let expires_at = club.invite_code_expires_at.unwrap();
    assert!(expires_at >= before + Duration::days(7) - Duration::seconds(1));

    let stored: Option<Club> = backend.fetch(&club.id).await.unwrap();
    assert_eq!(stored.unwrap().invite_code, club.invite_code);
}

#[tokio::test]
async fn test_create_club_rejects_invalid_name() {
    let backend = Arc::new(InMemoryBackend::new());
    let err = service(backend)
        .create_club("owner", draft("Line\nBreak FC"))
        .await
        .unwrap_err();
    match err {
        AppError::InvalidClub(validation) => {
            assert_eq!(validation.name, Some(ValidationError::ContainsNewline))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_create_club_validates_trimmed_name() {
    let backend = Arc::new(InMemoryBackend::new());
    let err = service(backend.clone())
        .create_club("owner", draft("AB "))
        .await
        .unwrap_err();
    match err {
        AppError::InvalidClub(validation) => {
            assert_eq!(validation.name, Some(ValidationError::TooShort { min: 3 }))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_join_with_invite_code() {
    let backend = Arc::new(InMemoryBackend::new());
    let service = service(backend.clone());
    let club = service.create_club("owner", draft("TSV Nord")).await.unwrap();

    let joined = service
        .join_with_invite_code("player", &club.invite_code.to_lowercase())
        .await
        .unwrap();
    assert!(joined.is_member("player"));

    let again = service.join_with_invite_code("player", &club.invite_code).await;
    assert_eq!(again.unwrap_err(), ClubError::AlreadyMember);
}

#[tokio::test]
async fn test_join_rejects_unknown_malformed_and_expired_codes() {
    let backend = Arc::new(InMemoryBackend::new());
    let service = service(backend.clone());
    let club = service.create_club("owner", draft("TSV Nord")).await.unwrap();

    assert_eq!(
        service.join_with_invite_code("player", "ZZZZZZZZ").await.unwrap_err(),
        ClubError::InvalidInviteCode
    );
    assert_eq!(
        service.join_with_invite_code("player", "abc").await.unwrap_err(),
        ClubError::InvalidInviteCode
    );

    let later = Utc::now() + Duration::days(8);
    assert_eq!(
        service
            .join_with_invite_code_at("player", &club.invite_code, later)
            .await
            .unwrap_err(),
        ClubError::ExpiredInviteCode
    );
}

#[tokio::test]
async fn test_backend_failures_map_to_club_errors() {
    let backend = Arc::new(InMemoryBackend::new());
    let service = service(backend.clone());
    let club = service.create_club("owner", draft("TSV Nord")).await.unwrap();

    backend.set_offline(true);
    assert_eq!(
        service.join_with_invite_code("player", &club.invite_code).await.unwrap_err(),
        ClubError::Network
    );
    assert!(matches!(
        service.create_club("owner", draft("SC Süd")).await,
        Err(AppError::Club(ClubError::Network))
    ));
}

#[tokio::test]
async fn test_regenerate_requires_admin() {
    let backend = Arc::new(InMemoryBackend::new());
    let service = service(backend.clone());
    let club = service.create_club("owner", draft("TSV Nord")).await.unwrap();
    service.join_with_invite_code("player", &club.invite_code).await.unwrap();

    assert_eq!(
        service.regenerate_invite_code("player", &club.id).await.unwrap_err(),
        ClubError::PermissionDenied
    );
    assert_eq!(
        service.regenerate_invite_code("owner", "missing").await.unwrap_err(),
        ClubError::NotFound
    );
    assert_eq!(
        service.regenerate_invite_code("", &club.id).await.unwrap_err(),
        ClubError::Unauthenticated
    );

    let updated = service.regenerate_invite_code("owner", &club.id).await.unwrap();
    assert_eq!(updated.invite_code.len(), club.invite_code.len());
    assert!(updated.is_member("player"));
}

#[tokio::test]
async fn test_remove_member_rules() {
    let backend = Arc::new(InMemoryBackend::new());
    let service = service(backend.clone());
    let club = service.create_club("owner", draft("TSV Nord")).await.unwrap();
    service.join_with_invite_code("alice", &club.invite_code).await.unwrap();
    service.join_with_invite_code("bob", &club.invite_code).await.unwrap();

    assert_eq!(
        service.remove_member("alice", &club.id, "bob").await.unwrap_err(),
        ClubError::PermissionDenied
    );
    assert_eq!(
        service.remove_member("owner", &club.id, "owner").await.unwrap_err(),
        ClubError::PermissionDenied
    );

    let left = service.remove_member("alice", &club.id, "alice").await.unwrap();
    assert!(!left.is_member("alice"));

    let removed = service.remove_member("owner", &club.id, "bob").await.unwrap();
    assert_eq!(removed.member_ids, vec!["owner".to_string()]);
}
