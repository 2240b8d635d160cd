//! Tests for the query resolver.

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{MockPostRepository, PostPersistenceError, Storage};
use crate::outbound::memory::MemoryStore;
use crate::test_support::{SocialWorld, social_world};
use rstest::{fixture, rstest};
use std::sync::Arc;

#[fixture]
async fn world() -> SocialWorld {
    social_world().await.expect("fixture world")
}

fn service(world: &SocialWorld) -> QueryService {
    QueryService::new(world.storage.clone())
}

fn ids(posts: &[Post]) -> Vec<PostId> {
    posts.iter().map(|post| post.id).collect()
}

#[rstest]
#[tokio::test]
async fn all_users_lists_every_account(#[future] world: SocialWorld) {
    let world = world.await;
    let users = service(&world).all_users().await.expect("users");
    let names: Vec<_> = users.iter().map(|u| u.username.as_ref().to_owned()).collect();
    assert_eq!(names, ["admin", "john", "jane"]);
}

#[rstest]
#[tokio::test]
async fn user_by_id_finds_existing_user(#[future] world: SocialWorld) {
    let world = world.await;
    let user = service(&world).user_by_id(world.jane.id).await.expect("jane");
    assert_eq!(user, world.jane);
}

#[rstest]
#[tokio::test]
async fn user_by_id_reports_missing_ids(#[future] world: SocialWorld) {
    let world = world.await;
    let err = service(&world)
        .user_by_id(UserId::new(999))
        .await
        .expect_err("absent");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn viewer_resolution_carries_role_and_tolerates_stale_ids(#[future] world: SocialWorld) {
    let world = world.await;
    let svc = service(&world);
    let admin = svc.viewer(world.admin.id).await.expect("lookup").expect("admin");
    assert!(admin.is_admin());
    assert_eq!(admin.id(), world.admin.id);
    assert!(svc.viewer(UserId::new(999)).await.expect("lookup").is_none());
}

#[rstest]
#[tokio::test]
async fn user_by_username_is_exact(#[future] world: SocialWorld) {
    let world = world.await;
    let svc = service(&world);
    assert_eq!(svc.user_by_username("john").await.expect("john"), world.john);
    let err = svc.user_by_username("JOHN").await.expect_err("case sensitive");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn anonymous_viewers_only_see_public_posts(#[future] world: SocialWorld) {
    let world = world.await;
    let posts = service(&world).all_posts(None).await.expect("posts");
    assert_eq!(ids(&posts), [world.welcome.id, world.notes.id]);
}

#[rstest]
#[case::author("john", true)]
#[case::admin("admin", true)]
#[case::stranger("jane", false)]
#[tokio::test]
async fn private_posts_follow_visibility_rule(
    #[future] world: SocialWorld,
    #[case] who: &str,
    #[case] sees_draft: bool,
) {
    let world = world.await;
    let user = match who {
        "john" => &world.john,
        "admin" => &world.admin,
        _ => &world.jane,
    };
    let viewer = SocialWorld::viewer(user);
    let svc = service(&world);

    let posts = svc.all_posts(Some(&viewer)).await.expect("posts");
    assert_eq!(ids(&posts).contains(&world.draft.id), sees_draft);

    let single = svc.post_by_id(world.draft.id, Some(&viewer)).await;
    match (sees_draft, single) {
        (true, Ok(post)) => assert_eq!(post, world.draft),
        (false, Err(err)) => assert_eq!(err.code(), ErrorCode::NotFound),
        (expected, other) => panic!("expected visible={expected}, got {other:?}"),
    }

    let comments = svc.all_comments(Some(&viewer)).await.expect("comments");
    let has_draft_comment = comments.iter().any(|c| c.id == world.draft_comment.id);
    assert_eq!(has_draft_comment, sees_draft);
}

#[rstest]
#[tokio::test]
async fn hidden_and_missing_posts_are_indistinguishable(#[future] world: SocialWorld) {
    let world = world.await;
    let svc = service(&world);
    let hidden = svc.post_by_id(world.draft.id, None).await.expect_err("hidden");
    let missing = svc
        .post_by_id(PostId::new(404), None)
        .await
        .expect_err("missing");
    assert_eq!(hidden.code(), missing.code());
}

#[rstest]
#[tokio::test]
async fn posts_by_author_is_exact(#[future] world: SocialWorld) {
    let world = world.await;
    let svc = service(&world);
    let admin_viewer = SocialWorld::viewer(&world.admin);

    let by_admin = svc
        .posts_by_author(world.admin.id, None)
        .await
        .expect("admin posts");
    assert_eq!(ids(&by_admin), [world.welcome.id]);

    let by_john = svc
        .posts_by_author(world.john.id, Some(&admin_viewer))
        .await
        .expect("john posts");
    assert_eq!(ids(&by_john), [world.draft.id]);
    assert!(by_john.iter().all(|post| post.author_id == world.john.id));
}

#[rstest]
#[tokio::test]
async fn posts_by_author_with_no_posts_is_empty() {
    let world = social_world().await.expect("world");
    let store = Arc::new(MemoryStore::default());
    let svc = QueryService::new(Storage::from_shared(store));
    assert!(
        svc.posts_by_author(world.jane.id, None)
            .await
            .expect("empty store")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn comments_by_post_hides_private_threads(#[future] world: SocialWorld) {
    let world = world.await;
    let svc = service(&world);
    let john = SocialWorld::viewer(&world.john);

    assert!(
        svc.comments_by_post(world.draft.id, None)
            .await
            .expect("anonymous")
            .is_empty()
    );
    let visible = svc
        .comments_by_post(world.draft.id, Some(&john))
        .await
        .expect("author");
    assert_eq!(visible, [world.draft_comment.clone()]);
    assert!(
        svc.comments_by_post(PostId::new(404), None)
            .await
            .expect("missing post")
            .is_empty()
    );
}

#[rstest]
#[tokio::test]
async fn anonymous_comment_listing_skips_hidden_posts(#[future] world: SocialWorld) {
    let world = world.await;
    let comments = service(&world).all_comments(None).await.expect("comments");
    assert_eq!(comments, [world.welcome_comment.clone()]);
}

#[rstest]
#[tokio::test]
async fn repository_outages_surface_as_service_unavailable(#[future] world: SocialWorld) {
    let world = world.await;
    let mut posts = MockPostRepository::new();
    posts
        .expect_list_all()
        .times(1)
        .return_once(|| Err(PostPersistenceError::connection("database offline")));
    let storage = Storage {
        posts: Arc::new(posts),
        ..world.storage.clone()
    };

    let err = QueryService::new(storage)
        .all_posts(None)
        .await
        .expect_err("outage");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
