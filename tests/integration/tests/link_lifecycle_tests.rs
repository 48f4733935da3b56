//! Link lifecycle integration tests
//!
//! Every scenario runs against the in-memory store. When DATABASE_URL is set
//! the same scenario also runs against PostgreSQL.
//!
//! Run with: cargo test -p integration-tests --test link_lifecycle_tests

use std::sync::Arc;

use tokio::sync::Barrier;

use integration_tests::{assert_unavailable, fixtures::*, TestHarness};
use oncelink_common::LinkConfig;
use oncelink_core::{DomainError, LinkState};
use oncelink_service::{
    CreateLinkRequest, LinkFilter, LinkService, ServiceError, UpdateLinkRequest,
};

async fn harnesses() -> Vec<TestHarness> {
    TestHarness::all().await.expect("Failed to set up stores")
}

// ============================================================================
// Consume Tests
// ============================================================================

#[tokio::test]
async fn test_hello_consumed_once() {
    for h in harnesses().await {
        let link = h
            .service()
            .create_link(h.owner, CreateLinkRequest::new("t", "hello"))
            .await
            .unwrap();

        let view = h.service().consume_by_token(&link.token).await.unwrap();
        assert_eq!(view.payload, "hello", "{}", h.label);

        let second = h.service().consume_by_token(&link.token).await;
        assert_unavailable(&second).unwrap();

        let stored = h.service().get_link(h.owner, link.id).await.unwrap();
        assert_eq!(stored.state, LinkState::Consumed);
        assert_eq!(stored.access_count, 1);
        assert!(stored.consumed_at.is_some());
    }
}

#[tokio::test]
async fn test_expired_on_arrival() {
    for h in harnesses().await {
        let link = h.service().create_link(h.owner, expired_link()).await.unwrap();
        assert!(link.expired, "{}", h.label);

        let result = h.service().consume_by_token(&link.token).await;
        assert_unavailable(&result).unwrap();

        let stored = h.service().get_link(h.owner, link.id).await.unwrap();
        assert_eq!(stored.access_count, 0);
        assert!(stored.consumed_at.is_none());
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_fifty_concurrent_openers() {
    const OPENERS: usize = 50;
    for h in harnesses().await {
        let link = h.service().create_link(h.owner, unique_link()).await.unwrap();
        let start = Arc::new(Barrier::new(OPENERS));

        let handles: Vec<_> = (0..OPENERS)
            .map(|_| {
                let ctx = Arc::clone(&h.ctx);
                let start = Arc::clone(&start);
                let token = link.token.clone();
                tokio::spawn(async move {
                    start.wait().await;
                    LinkService::new(&ctx).consume_by_token(&token).await
                })
            })
            .collect();

        let results: Vec<_> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|joined| joined.expect("consume task panicked"))
            .collect();

        let winners = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(winners, 1, "{}", h.label);
        for result in results.iter().filter(|r| r.is_err()) {
            assert_unavailable(result).unwrap();
        }

        let stored = h.service().get_link(h.owner, link.id).await.unwrap();
        assert_eq!(stored.access_count, 1);
    }
}

#[tokio::test]
async fn test_consume_reveals_nothing_about_state() {
    for h in harnesses().await {
        let service = h.service();

        let consumed = service.create_link(h.owner, unique_link()).await.unwrap();
        service.consume_by_token(&consumed.token).await.unwrap();

        let expired = service.create_link(h.owner, expired_link()).await.unwrap();

        let trashed = service.create_link(h.owner, unique_link()).await.unwrap();
        service.trash_link(h.owner, trashed.id).await.unwrap();

        let purged = service.create_link(h.owner, unique_link()).await.unwrap();
        service.purge_link(h.owner, purged.id).await.unwrap();

        let tokens = [
            consumed.token,
            expired.token,
            trashed.token,
            purged.token,
            "0".repeat(32),
        ];
        let mut messages = Vec::new();
        for token in &tokens {
            let err = service.consume_by_token(token).await.unwrap_err();
            assert!(matches!(err, ServiceError::LinkUnavailable), "{}", h.label);
            messages.push(err.to_string());
        }

        assert!(messages.windows(2).all(|w| w[0] == w[1]), "{messages:?}");
    }
}

// ============================================================================
// Trash / Restore / Purge Tests
// ============================================================================

#[tokio::test]
async fn test_trash_restore_round_trip_preserves_state() {
    for h in harnesses().await {
        let service = h.service();
        let link = service.create_link(h.owner, unique_link()).await.unwrap();
        service.consume_by_token(&link.token).await.unwrap();
        let before = service.get_link(h.owner, link.id).await.unwrap();

        let trashed = service.trash_link(h.owner, link.id).await.unwrap();
        assert_eq!(trashed.state, LinkState::Trashed);
        assert!(trashed.deleted_at.is_some());

        let restored = service.restore_link(h.owner, link.id).await.unwrap();
        assert_eq!(restored.state, before.state, "{}", h.label);
        assert_eq!(restored.consumed_at, before.consumed_at);
        assert_eq!(restored.access_count, before.access_count);
        assert!(restored.deleted_at.is_none());
    }
}

#[tokio::test]
async fn test_trash_allowed_on_expired_link() {
    for h in harnesses().await {
        let service = h.service();
        let link = service.create_link(h.owner, expired_link()).await.unwrap();

        service.trash_link(h.owner, link.id).await.unwrap();
        let restored = service.restore_link(h.owner, link.id).await.unwrap();
        assert_eq!(restored.state, LinkState::Active);
        assert!(restored.expired);

        service.purge_link(h.owner, link.id).await.unwrap();
    }
}

#[tokio::test]
async fn test_other_owner_cannot_touch_link() {
    for h in harnesses().await {
        let link = h.service().create_link(h.owner, unique_link()).await.unwrap();
        let stranger = h.stranger();
        let service = stranger.service();

        assert!(service.trash_link(stranger.owner, link.id).await.unwrap_err().is_not_found());
        assert!(service.purge_link(stranger.owner, link.id).await.unwrap_err().is_not_found());
        assert!(service
            .edit_link(stranger.owner, link.id, rename("hijacked"))
            .await
            .unwrap_err()
            .is_not_found());

        let stored = h.service().get_link(h.owner, link.id).await.unwrap();
        assert_eq!(stored.state, LinkState::Active);
        assert_ne!(stored.title, "hijacked");
    }
}

// ============================================================================
// Edit Tests
// ============================================================================

#[tokio::test]
async fn test_edit_active_link() {
    for h in harnesses().await {
        let service = h.service();
        let link = service.create_link(h.owner, expiring_link()).await.unwrap();

        let edited = service
            .edit_link(h.owner, link.id, replace_payload("<p>new</p>"))
            .await
            .unwrap();
        assert_eq!(edited.payload, "<p>new</p>");
        assert_eq!(edited.title, link.title);
        assert_eq!(edited.token, link.token);
        assert_eq!(edited.id, link.id);
        assert_eq!(edited.access_count, 0);

        let cleared = service
            .edit_link(
                h.owner,
                link.id,
                UpdateLinkRequest {
                    expires_at: Some(None),
                    ..UpdateLinkRequest::default()
                },
            )
            .await
            .unwrap();
        assert!(cleared.expires_at.is_none(), "{}", h.label);
    }
}

#[tokio::test]
async fn test_edit_refused_outside_active() {
    for h in harnesses().await {
        let service = h.service();

        let consumed = service.create_link(h.owner, unique_link()).await.unwrap();
        service.consume_by_token(&consumed.token).await.unwrap();
        let err = service
            .edit_link(h.owner, consumed.id, rename("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidState { state: "consumed", .. })
        ));

        let trashed = service.create_link(h.owner, unique_link()).await.unwrap();
        service.trash_link(h.owner, trashed.id).await.unwrap();
        let err = service
            .edit_link(h.owner, trashed.id, rename("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidState { state: "trashed", .. })
        ));

        let expired = service.create_link(h.owner, expired_link()).await.unwrap();
        let err = service
            .edit_link(h.owner, expired.id, rename("x"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::InvalidState { state: "expired", .. })
        ));
    }
}

#[tokio::test]
async fn test_edit_validation() {
    for h in harnesses().await {
        let link = h.service().create_link(h.owner, unique_link()).await.unwrap();
        let err = h
            .service()
            .edit_link(h.owner, link.id, rename("x".repeat(201)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)), "{}", h.label);
    }
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_listing_and_stats() {
    for h in harnesses().await {
        let service = h.service();
        let open = service.create_link(h.owner, unique_link()).await.unwrap();
        let used = service.create_link(h.owner, unique_link()).await.unwrap();
        service.consume_by_token(&used.token).await.unwrap();
        let late = service.create_link(h.owner, expired_link()).await.unwrap();
        let binned = service.create_link(h.owner, unique_link()).await.unwrap();
        service.trash_link(h.owner, binned.id).await.unwrap();

        let active = service.list_links(h.owner, LinkFilter::Active).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, open.id);

        let inactive: Vec<_> = service
            .list_links(h.owner, LinkFilter::Inactive)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(inactive.len(), 2);
        assert!(inactive.contains(&used.id));
        assert!(inactive.contains(&late.id));

        let all = service.list_links(h.owner, LinkFilter::All).await.unwrap();
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].id, binned.id, "{}: newest first", h.label);

        let stats = service.link_stats(h.owner).await.unwrap();
        assert_eq!((stats.active, stats.inactive, stats.trashed, stats.total), (1, 2, 1, 3));
    }
}

#[tokio::test]
async fn test_owner_response_serialization() {
    let h = TestHarness::memory_with_config(LinkConfig {
        base_url: "https://once.example/".to_string(),
        ..LinkConfig::default()
    })
    .unwrap();

    let link = h.service().create_link(h.owner, unique_link()).await.unwrap();
    let json = serde_json::to_value(&link).unwrap();

    assert_eq!(json["state"], "active");
    assert_eq!(json["url"], format!("https://once.example/link/{}", link.token));
    assert_eq!(json["access_count"], 0);
    assert!(json["consumed_at"].is_null());
}
