//! Unread comment bookkeeping and real-time badge delivery.
//!
//! Every unread comment is tracked twice: the comment's set holds the users that have not read
//! it and the user's set holds the comments they have not read. The user's set drives the badge
//! count pushed over the `{prefix}:notification:{user_id}` channels, which [`NotificationHub`]
//! bridges to websocket connections.

use std::collections::HashSet;

use fred::{clients::SubscriberClient, prelude::*};
use tokio::sync::broadcast;

use crate::{
    model::notification::NotificationDto,
    server::{error::Error, model::redis::RedisKeys},
};

/// Events buffered per websocket before slow receivers start skipping
const HUB_CAPACITY: usize = 256;

pub struct NotificationService<'a> {
    redis: &'a Pool,
    keys: &'a RedisKeys,
}

impl<'a> NotificationService<'a> {
    /// Creates a new instance of [`NotificationService`]
    pub fn new(redis: &'a Pool, keys: &'a RedisKeys) -> Self {
        Self { redis, keys }
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, Error> {
        Ok(self.redis.scard(self.keys.unread_user(user_id)).await?)
    }

    /// Comment ids the user has not read yet
    pub async fn unread_comment_ids(&self, user_id: i32) -> Result<HashSet<i32>, Error> {
        let ids: Vec<i32> = self.redis.smembers(self.keys.unread_user(user_id)).await?;

        Ok(ids.into_iter().collect())
    }

    /// Publishes the current badge of a user
    pub async fn publish(&self, user_id: i32, is_new: bool) -> Result<(), Error> {
        let notification = NotificationDto {
            count: self.unread_count(user_id).await?,
            is_new,
        };
        let payload = serde_json::to_string(&notification)?;

        let _: i64 = self
            .redis
            .next()
            .publish(self.keys.notification_channel(user_id), payload)
            .await?;

        Ok(())
    }

    /// Marks a comment unread for each recipient and pushes their new badge
    pub async fn mark_unread(&self, comment_id: i32, recipients: &[i32]) -> Result<(), Error> {
        if recipients.is_empty() {
            return Ok(());
        }

        let _: i64 = self
            .redis
            .sadd(self.keys.unread_comment(comment_id), recipients.to_vec())
            .await?;

        for user_id in recipients {
            let _: i64 = self
                .redis
                .sadd(self.keys.unread_user(*user_id), comment_id)
                .await?;

            if let Err(e) = self.publish(*user_id, true).await {
                tracing::warn!("Failed to publish notification to user {}: {}", user_id, e);
            }
        }

        Ok(())
    }

    /// Marks comments read by a user
    pub async fn mark_read(&self, user_id: i32, comment_ids: &[i32]) -> Result<(), Error> {
        if comment_ids.is_empty() {
            return Ok(());
        }

        for comment_id in comment_ids {
            let _: i64 = self
                .redis
                .srem(self.keys.unread_comment(*comment_id), user_id)
                .await?;
        }
        let _: i64 = self
            .redis
            .srem(self.keys.unread_user(user_id), comment_ids.to_vec())
            .await?;

        Ok(())
    }

    /// Forgets a comment entirely; returns the users that still had it unread
    pub async fn clear_comment(&self, comment_id: i32) -> Result<Vec<i32>, Error> {
        let comment_key = self.keys.unread_comment(comment_id);

        let user_ids: Vec<i32> = self.redis.smembers(&comment_key).await?;
        for user_id in &user_ids {
            let _: i64 = self
                .redis
                .srem(self.keys.unread_user(*user_id), comment_id)
                .await?;
        }
        let _: i64 = self.redis.del(&comment_key).await?;

        Ok(user_ids)
    }

    /// Forgets comments that can no longer be read and pushes the lowered badges
    pub async fn clear_comments(&self, comment_ids: &[i32]) -> Result<(), Error> {
        let mut affected = HashSet::new();
        for comment_id in comment_ids {
            affected.extend(self.clear_comment(*comment_id).await?);
        }

        for user_id in affected {
            if let Err(e) = self.publish(user_id, false).await {
                tracing::warn!("Failed to publish notification to user {}: {}", user_id, e);
            }
        }

        Ok(())
    }
}

/// A badge update addressed to one user
#[derive(Debug, Clone, PartialEq)]
pub struct UserNotification {
    pub user_id: i32,
    pub notification: NotificationDto,
}

/// Fans notification channel messages out to the websocket connections of this process
#[derive(Clone)]
pub struct NotificationHub {
    sender: broadcast::Sender<UserNotification>,
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationHub {
    /// Creates a hub that is not yet connected to Redis
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(HUB_CAPACITY);

        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UserNotification> {
        self.sender.subscribe()
    }

    /// Hands a notification to every connection of this process; returns the number of receivers
    pub fn dispatch(&self, notification: UserNotification) -> usize {
        self.sender.send(notification).unwrap_or(0)
    }

    /// Pattern-subscribes to the notification channels and forwards every message to the hub.
    ///
    /// The subscriber must already be connected.
    pub async fn listen(&self, subscriber: SubscriberClient, keys: RedisKeys) -> Result<(), Error> {
        let mut messages = subscriber.message_rx();
        subscriber.psubscribe(keys.notification_pattern()).await?;

        let hub = self.clone();
        tokio::spawn(async move {
            // Keeps the subscription alive for as long as the task runs
            let _subscriber = subscriber;

            loop {
                match messages.recv().await {
                    Ok(message) => {
                        let Some(user_id) = keys.parse_notification_channel(&message.channel)
                        else {
                            continue;
                        };
                        let Some(payload) = message.value.as_string() else {
                            continue;
                        };

                        match serde_json::from_str::<NotificationDto>(&payload) {
                            Ok(notification) => {
                                hub.dispatch(UserNotification {
                                    user_id,
                                    notification,
                                });
                            }
                            Err(e) => {
                                tracing::warn!(
                                    "Invalid notification payload for {}: {}",
                                    user_id,
                                    e
                                )
                            }
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("Notification listener skipped {} messages", skipped);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            tracing::info!("Notification listener stopped");
        });

        Ok(())
    }
}
