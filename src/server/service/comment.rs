use std::collections::{HashMap, HashSet};

use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::ListDto,
        comment::{CommentAuthorDto, CommentDto, CreateCommentDto, UpdateCommentDto},
    },
    server::{
        data::{comment::CommentRepository, user::UserRepository, work::WorkRepository},
        error::{auth::AuthError, Error},
        model::{
            auth::AuthUser,
            db::{CommentModel, UserModel},
        },
        service::notification::NotificationService,
    },
};

/// Users that get a comment marked unread.
///
/// Comments of staff go to every admin. Comments of anyone else go to the owner of the work
/// and every admin, except the author.
pub fn comment_recipients(
    author: &AuthUser,
    work_owner_id: Option<i32>,
    admin_ids: &[i32],
) -> Vec<i32> {
    let mut recipients: Vec<i32> = Vec::with_capacity(admin_ids.len() + 1);

    if !author.is_staff() {
        recipients.extend(work_owner_id);
    }
    recipients.extend(admin_ids.iter().copied());

    let mut seen = HashSet::new();
    recipients.retain(|user_id| *user_id != author.id && seen.insert(*user_id));

    recipients
}

fn author(users: &HashMap<i32, UserModel>, user_id: i32) -> CommentAuthorDto {
    CommentAuthorDto {
        id: user_id,
        name: users
            .get(&user_id)
            .map(|user| user.name.clone())
            .unwrap_or_default(),
    }
}

fn comment_dto(comment: CommentModel, users: &HashMap<i32, UserModel>) -> CommentDto {
    CommentDto {
        id: comment.id,
        work_id: comment.work_id,
        created_by: author(users, comment.created_by),
        updated_by: comment.updated_by.map(|user_id| author(users, user_id)),
        comment: comment.comment,
        created_at: comment.created_at,
        updated_at: comment.updated_at,
    }
}

pub struct CommentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CommentService<'a> {
    /// Creates a new instance of [`CommentService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Marks the comment unread for everyone who should read it
    async fn fan_out(
        &self,
        auth: &AuthUser,
        comment: &CommentModel,
        notifications: &NotificationService<'_>,
    ) -> Result<(), Error> {
        let owner_id = WorkRepository::new(self.db)
            .get(comment.work_id)
            .await?
            .map(|work| work.user_id);
        let admin_ids = UserRepository::new(self.db).admin_ids().await?;

        let recipients = comment_recipients(auth, owner_id, &admin_ids);
        notifications.mark_unread(comment.id, &recipients).await
    }

    /// Comments of a work entry, oldest first.
    ///
    /// Listing marks every comment read for the caller.
    pub async fn list(
        &self,
        auth: &AuthUser,
        work_id: i32,
        notifications: &NotificationService<'_>,
    ) -> Result<ListDto<CommentDto>, Error> {
        if WorkRepository::new(self.db).get(work_id).await?.is_none() {
            return Err(Error::not_found("work not found"));
        }

        let comments = CommentRepository::new(self.db)
            .find_by_work(work_id)
            .await?;

        let mut user_ids: Vec<i32> = comments.iter().map(|comment| comment.created_by).collect();
        user_ids.extend(comments.iter().filter_map(|comment| comment.updated_by));
        let users: HashMap<i32, UserModel> = UserRepository::new(self.db)
            .find_by_ids(user_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let comment_ids: Vec<i32> = comments.iter().map(|comment| comment.id).collect();
        notifications.mark_read(auth.id, &comment_ids).await?;
        if let Err(e) = notifications.publish(auth.id, false).await {
            tracing::warn!("Failed to publish notification to user {}: {}", auth.id, e);
        }

        Ok(ListDto {
            count: comments.len() as u64,
            data: comments
                .into_iter()
                .map(|comment| comment_dto(comment, &users))
                .collect(),
        })
    }

    pub async fn create(
        &self,
        auth: &AuthUser,
        payload: CreateCommentDto,
        notifications: &NotificationService<'_>,
    ) -> Result<(), Error> {
        if payload.comment.trim().is_empty() {
            return Err(Error::Validation("comment is required".to_string()));
        }
        if WorkRepository::new(self.db)
            .get(payload.work_id)
            .await?
            .is_none()
        {
            return Err(Error::not_found("work not found"));
        }

        let comment = CommentRepository::new(self.db)
            .create(payload.work_id, payload.comment, auth.id)
            .await?;

        self.fan_out(auth, &comment, notifications).await
    }

    /// Edits a comment of the caller; a changed text is announced again
    pub async fn update(
        &self,
        auth: &AuthUser,
        comment_id: i32,
        payload: UpdateCommentDto,
        notifications: &NotificationService<'_>,
    ) -> Result<(), Error> {
        let comment_repo = CommentRepository::new(self.db);
        let Some(comment) = comment_repo.get(comment_id).await? else {
            return Err(Error::not_found("comment not found"));
        };
        if comment.created_by != auth.id {
            return Err(AuthError::UserNotPermitted.into());
        }

        let changed = payload
            .comment
            .as_deref()
            .is_some_and(|text| text != comment.comment);

        let comment = comment_repo
            .update(comment, payload.comment, auth.id)
            .await?;

        if changed {
            self.fan_out(auth, &comment, notifications).await?;
        }

        Ok(())
    }

    /// Deletes a comment of the caller, or any comment for admins
    pub async fn delete(
        &self,
        auth: &AuthUser,
        comment_id: i32,
        notifications: &NotificationService<'_>,
    ) -> Result<(), Error> {
        let comment_repo = CommentRepository::new(self.db);
        let Some(comment) = comment_repo.get(comment_id).await? else {
            return Err(Error::not_found("comment not found"));
        };
        if comment.created_by != auth.id && !auth.is_admin() {
            return Err(AuthError::UserNotPermitted.into());
        }

        comment_repo.soft_delete(comment, auth.id).await?;

        notifications.clear_comments(&[comment_id]).await
    }
}
