use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cleancare::{
    model::comment::{CreateCommentDto, UpdateCommentDto},
    server::{
        controller::{
            comment::{create_comment, delete_comment, list_comments, update_comment},
            work::{delete_work, list_works},
        },
        model::{query::ListQuery, redis::RedisKeys},
        service::notification::{NotificationHub, NotificationService},
    },
};
use cleancare_test_utils::{constant::TEST_REDIS_URL, prelude::*, RedisTest};
use fred::{prelude::*, types::Builder};

use super::redis_state;
use crate::util::{auth_user, body_json};

/// Expect a staff comment to show up unread for admins until they read it
#[tokio::test]
async fn staff_comment_is_unread_for_admin() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);

    let admin = test.user().insert_user("NID7001", ROLE_ID_ADMIN).await?;
    let staff = test.user().insert_user("NID7002", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;
    let work = test
        .work()
        .insert_work(staff.id, TASK_ID_DAILY, task_type.id, "1")
        .await?;

    let response = create_comment(
        State(state.clone()),
        auth_user(staff.id, ROLE_ID_STAFF),
        Json(CreateCommentDto {
            work_id: work.id,
            comment: "Floor is wet".to_string(),
        }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let notifications = NotificationService::new(&state.redis, &state.keys);
    assert_eq!(notifications.unread_count(admin.id).await.ok(), Some(1));
    assert_eq!(notifications.unread_count(staff.id).await.ok(), Some(0));

    let works = list_works(
        State(state.clone()),
        auth_user(admin.id, ROLE_ID_ADMIN),
        Query(ListQuery::default()),
    )
    .await
    .into_response();
    assert_eq!(body_json(works).await["data"]["data"][0]["unread_comment"], true);

    let comments = list_comments(
        State(state.clone()),
        auth_user(admin.id, ROLE_ID_ADMIN),
        Path(work.id),
    )
    .await
    .into_response();
    let body = body_json(comments).await;
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["data"][0]["comment"], "Floor is wet");
    assert_eq!(body["data"]["data"][0]["created_by"]["id"], staff.id);

    assert_eq!(notifications.unread_count(admin.id).await.ok(), Some(0));
    let works = list_works(
        State(state),
        auth_user(admin.id, ROLE_ID_ADMIN),
        Query(ListQuery::default()),
    )
    .await
    .into_response();
    assert_eq!(body_json(works).await["data"]["data"][0]["unread_comment"], false);

    Ok(())
}

/// Expect an admin reply to reach the owner and a deletion to clear it again
#[tokio::test]
async fn admin_reply_reaches_owner() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);

    let admin = test.user().insert_user("NID7003", ROLE_ID_ADMIN).await?;
    let other_admin = test.user().insert_user("NID7004", ROLE_ID_ADMIN).await?;
    let staff = test.user().insert_user("NID7005", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;
    let work = test
        .work()
        .insert_work(staff.id, TASK_ID_DAILY, task_type.id, "1")
        .await?;
    let comment = test
        .work()
        .insert_comment(work.id, admin.id, "Please redo")
        .await?;

    let response = update_comment(
        State(state.clone()),
        auth_user(admin.id, ROLE_ID_ADMIN),
        Path(comment.id),
        Json(UpdateCommentDto {
            comment: Some("Please redo the corners".to_string()),
        }),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    let notifications = NotificationService::new(&state.redis, &state.keys);
    assert_eq!(notifications.unread_count(staff.id).await.ok(), Some(1));
    assert_eq!(notifications.unread_count(other_admin.id).await.ok(), Some(1));
    assert_eq!(notifications.unread_count(admin.id).await.ok(), Some(0));

    let response = delete_comment(
        State(state.clone()),
        auth_user(admin.id, ROLE_ID_ADMIN),
        Path(comment.id),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(notifications.unread_count(staff.id).await.ok(), Some(0));
    assert_eq!(notifications.unread_count(other_admin.id).await.ok(), Some(0));

    Ok(())
}

/// Expect a published badge to arrive through the hub with its user id
#[tokio::test]
async fn hub_forwards_published_badge() -> Result<(), TestError> {
    let redis = RedisTest::new().await?;
    let keys = RedisKeys::new(redis.prefix());

    let subscriber =
        Builder::from_config(Config::from_url(TEST_REDIS_URL)?).build_subscriber_client()?;
    subscriber.init().await?;

    let hub = NotificationHub::new();
    let mut events = hub.subscribe();
    hub.listen(subscriber, keys.clone())
        .await
        .expect("pattern subscription succeeds");

    let notifications = NotificationService::new(&redis.redis_pool, &keys);
    notifications
        .mark_unread(41, &[8])
        .await
        .expect("comment marked unread");
    notifications
        .publish(8, true)
        .await
        .expect("badge published");

    let event = events.recv().await.expect("hub delivers the badge");
    assert_eq!(event.user_id, 8);
    assert_eq!(event.notification.count, 1);
    assert!(event.notification.is_new);

    Ok(())
}

/// Expect deleting a work to drop its comments from every badge
#[tokio::test]
async fn deleted_work_clears_unread_comments() -> Result<(), TestError> {
    let test = test_setup_with_work_tables!()?;
    let redis = RedisTest::new().await?;
    let state = redis_state(&test, &redis);

    let first_admin = test.user().insert_user("NID7101", ROLE_ID_ADMIN).await?;
    let second_admin = test.user().insert_user("NID7102", ROLE_ID_ADMIN).await?;
    let staff = test.user().insert_user("NID7103", ROLE_ID_STAFF).await?;
    let task_type = test.work().insert_task_type("Mopping", TASK_ID_DAILY).await?;
    let work = test
        .work()
        .insert_work(staff.id, TASK_ID_DAILY, task_type.id, "4")
        .await?;

    for comment in ["Before photo is blurry", "Corner still dusty"] {
        let response = create_comment(
            State(state.clone()),
            auth_user(staff.id, ROLE_ID_STAFF),
            Json(CreateCommentDto {
                work_id: work.id,
                comment: comment.to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let notifications = NotificationService::new(&state.redis, &state.keys);
    assert_eq!(notifications.unread_count(first_admin.id).await.ok(), Some(2));
    assert_eq!(notifications.unread_count(second_admin.id).await.ok(), Some(2));

    let response = delete_work(
        State(state.clone()),
        auth_user(staff.id, ROLE_ID_STAFF),
        Path(work.id),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(notifications.unread_count(first_admin.id).await.ok(), Some(0));
    assert_eq!(notifications.unread_count(second_admin.id).await.ok(), Some(0));
    assert!(notifications
        .unread_comment_ids(first_admin.id)
        .await
        .expect("unread set readable")
        .is_empty());

    Ok(())
}
