use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::ListDto,
        task::TaskDto,
        work::{
            DashboardAdminDto, FloorSummaryDto, TaskTypeSummaryDto, UserSummaryDto, WorkDetailDto,
            WorkDto, WorkUserDto,
        },
    },
    server::{
        data::{
            comment::CommentRepository,
            task::TaskRepository,
            task_type::TaskTypeRepository,
            user::UserRepository,
            work::{NewWork, WorkChanges, WorkRepository},
        },
        error::{auth::AuthError, Error},
        model::{
            auth::AuthUser,
            db::{TaskModel, TaskTypeModel, UserModel, WorkModel, TASK_ID_DAILY},
            form::{CreateWorkForm, UpdateWorkForm},
            query::ListQuery,
        },
        service::{
            export::{ExportFile, ExportFormat, Report},
            notification::NotificationService,
            storage::{file_view, DriveClient, StoredFile},
            upload::PendingImage,
        },
        util::time::{export_date, indonesian_date, indonesian_datetime, to_local},
    },
};

const EXPORT_SHEET_NAME: &str = "CleanCare";
const EXPORT_HEADERS: [&str; 9] = [
    "No",
    "Petugas Kebersihan",
    "Pekerjaan",
    "Jenis Pekerjaan",
    "Lantai",
    "Keterangan",
    "Sebelum",
    "Sesudah",
    "Tanggal",
];
const EXPORT_COLUMN_WIDTHS: [f32; 9] = [10.0, 38.0, 30.0, 30.0, 18.0, 52.0, 30.0, 30.0, 39.0];

/// Users, tasks and task types referenced by a page of work entries
struct WorkLabels {
    users: HashMap<i32, UserModel>,
    tasks: HashMap<i32, TaskModel>,
    task_types: HashMap<i32, TaskTypeModel>,
}

impl WorkLabels {
    fn dto(&self, work: &WorkModel, unread_comment: bool) -> WorkDto {
        let user = self.users.get(&work.user_id);

        WorkDto {
            id: work.id,
            user: WorkUserDto {
                id: work.user_id,
                name: user.map(|user| user.name.clone()).unwrap_or_default(),
                profile: user.and_then(|user| {
                    let id = user.profile.as_deref().filter(|id| !id.is_empty())?;
                    Some(file_view(id, user.profile_name.as_deref().unwrap_or_default()))
                }),
            },
            task: TaskDto {
                id: work.task_id,
                name: self
                    .tasks
                    .get(&work.task_id)
                    .map(|task| task.name.clone())
                    .unwrap_or_default(),
            },
            task_type: TaskDto {
                id: work.task_type_id,
                name: self
                    .task_types
                    .get(&work.task_type_id)
                    .map(|task_type| task_type.name.clone())
                    .unwrap_or_default(),
            },
            floor: work.floor.clone(),
            info: work.info.clone(),
            created_at: work.created_at,
            unread_comment,
        }
    }
}

fn stored_file(value: Option<&str>) -> Option<StoredFile> {
    value.and_then(StoredFile::parse)
}

pub struct WorkService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> WorkService<'a> {
    /// Creates a new instance of [`WorkService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn labels(&self, works: &[WorkModel]) -> Result<WorkLabels, Error> {
        let user_ids: Vec<i32> = works.iter().map(|work| work.user_id).collect();
        let task_ids: Vec<i32> = works.iter().map(|work| work.task_id).collect();
        let task_type_ids: Vec<i32> = works.iter().map(|work| work.task_type_id).collect();

        let users = UserRepository::new(self.db).find_by_ids(user_ids).await?;
        let tasks = TaskRepository::new(self.db).find_by_ids(task_ids).await?;
        let task_types = TaskTypeRepository::new(self.db)
            .find_by_ids(task_type_ids)
            .await?;

        Ok(WorkLabels {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
            tasks: tasks.into_iter().map(|task| (task.id, task)).collect(),
            task_types: task_types
                .into_iter()
                .map(|task_type| (task_type.id, task_type))
                .collect(),
        })
    }

    /// Ids of the given work entries that carry one of the unread comments
    async fn works_with_unread(
        &self,
        work_ids: &[i32],
        unread_comment_ids: &HashSet<i32>,
    ) -> Result<HashSet<i32>, Error> {
        if unread_comment_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let pairs = CommentRepository::new(self.db).ids_by_works(work_ids).await?;

        Ok(pairs
            .into_iter()
            .filter(|(comment_id, _)| unread_comment_ids.contains(comment_id))
            .map(|(_, work_id)| work_id)
            .collect())
    }

    async fn ensure_task(&self, task_id: i32, message: &str) -> Result<(), Error> {
        if TaskRepository::new(self.db).get(task_id).await?.is_none() {
            return Err(Error::not_found(message));
        }

        Ok(())
    }

    async fn ensure_task_type(&self, task_type_id: i32, message: &str) -> Result<(), Error> {
        if TaskTypeRepository::new(self.db)
            .get(task_type_id)
            .await?
            .is_none()
        {
            return Err(Error::not_found(message));
        }

        Ok(())
    }

    /// Logs a new work entry of the calling staff member.
    ///
    /// Images are validated before anything is uploaded. Uploaded images are removed again
    /// when the entry cannot be stored.
    pub async fn create(
        &self,
        auth: &AuthUser,
        form: CreateWorkForm,
        drive: &DriveClient,
    ) -> Result<(), Error> {
        auth.require_staff()?;

        self.ensure_task(form.task_id, "task not found").await?;
        self.ensure_task_type(form.task_type_id, "task type not found")
            .await?;

        let now = Utc::now().naive_utc();
        let before = PendingImage::validate_opt(form.image_before, now)?;
        let after = PendingImage::validate_opt(form.image_after, now)?;

        let mut uploaded: Vec<StoredFile> = Vec::new();
        let result = async {
            let mut stored = [None, None];
            for (slot, image) in stored.iter_mut().zip([before, after]) {
                if let Some(image) = image {
                    let file = image.upload(drive).await?;
                    *slot = Some(file.encode());
                    uploaded.push(file);
                }
            }
            let [image_before, image_after] = stored;

            WorkRepository::new(self.db)
                .create(NewWork {
                    user_id: auth.id,
                    task_id: form.task_id,
                    task_type_id: form.task_type_id,
                    floor: form.floor,
                    info: form.info,
                    image_before,
                    image_after,
                })
                .await?;

            Ok::<_, Error>(())
        }
        .await;

        if result.is_err() {
            for file in &uploaded {
                drive.delete_quietly(&file.id).await;
            }
        }

        result
    }

    /// Updates a work entry of the caller.
    ///
    /// Replaced and removed images are deleted from the drive after the update succeeded.
    pub async fn update(
        &self,
        auth: &AuthUser,
        work_id: i32,
        form: UpdateWorkForm,
        drive: &DriveClient,
    ) -> Result<(), Error> {
        let work_repo = WorkRepository::new(self.db);
        let Some(work) = work_repo.get(work_id).await? else {
            return Err(Error::not_found("work not found"));
        };
        if work.user_id != auth.id {
            return Err(AuthError::RoleNotPermitted.into());
        }

        if let Some(task_id) = form.task_id {
            self.ensure_task(task_id, "task id not found").await?;
        }
        if let Some(task_type_id) = form.task_type_id {
            self.ensure_task_type(task_type_id, "task type id not found")
                .await?;
        }

        let now = Utc::now().naive_utc();
        let before = PendingImage::validate_opt(form.image_before, now)?;
        let after = PendingImage::validate_opt(form.image_after, now)?;

        let mut changes = WorkChanges {
            task_id: form.task_id,
            task_type_id: form.task_type_id,
            floor: form.floor,
            info: form.info,
            image_before: None,
            image_after: None,
        };
        let mut uploaded: Vec<StoredFile> = Vec::new();
        let mut replaced: Vec<StoredFile> = Vec::new();

        let slots = [
            (
                before,
                form.delete_image_before,
                work.image_before.as_deref(),
                &mut changes.image_before,
            ),
            (
                after,
                form.delete_image_after,
                work.image_after.as_deref(),
                &mut changes.image_after,
            ),
        ];
        let mut upload_error = None;
        for (image, delete, current, change) in slots {
            match image {
                Some(image) => match image.upload(drive).await {
                    Ok(file) => {
                        *change = Some(Some(file.encode()));
                        uploaded.push(file);
                        replaced.extend(stored_file(current));
                    }
                    Err(e) => {
                        upload_error = Some(e);
                        break;
                    }
                },
                None if delete => {
                    *change = Some(None);
                    replaced.extend(stored_file(current));
                }
                None => {}
            }
        }

        let result = match upload_error {
            Some(e) => Err(e),
            None => work_repo
                .update(work, changes)
                .await
                .map(|_| ())
                .map_err(Error::from),
        };

        if let Err(e) = result {
            for file in &uploaded {
                drive.delete_quietly(&file.id).await;
            }

            return Err(e);
        }

        for file in &replaced {
            drive.delete_quietly(&file.id).await;
        }

        Ok(())
    }

    /// Soft deletes a work entry of the caller.
    ///
    /// Its comments become unreachable, so they stop counting as unread for everyone.
    pub async fn delete(
        &self,
        auth: &AuthUser,
        work_id: i32,
        notifications: &NotificationService<'_>,
    ) -> Result<(), Error> {
        let work_repo = WorkRepository::new(self.db);
        let Some(work) = work_repo.get(work_id).await? else {
            return Err(Error::not_found("work not found"));
        };
        if work.user_id != auth.id {
            return Err(AuthError::RoleNotPermitted.into());
        }

        let comment_ids: Vec<i32> = CommentRepository::new(self.db)
            .ids_by_works(&[work.id])
            .await?
            .into_iter()
            .map(|(comment_id, _)| comment_id)
            .collect();

        work_repo.soft_delete(work).await?;

        if !comment_ids.is_empty() {
            notifications.clear_comments(&comment_ids).await?;
        }

        Ok(())
    }

    /// Lists work entries; staff only ever see their own.
    ///
    /// `unread_comment_ids` are the comments the caller has not read yet.
    pub async fn list(
        &self,
        auth: &AuthUser,
        query: &ListQuery,
        unread_comment_ids: &HashSet<i32>,
    ) -> Result<ListDto<WorkDto>, Error> {
        let created = query.created_range()?;
        let owner_id = auth.is_staff().then_some(auth.id);

        let (works, count) = WorkRepository::new(self.db)
            .find(query, created, owner_id)
            .await?;

        let labels = self.labels(&works).await?;
        let work_ids: Vec<i32> = works.iter().map(|work| work.id).collect();
        let unread = self
            .works_with_unread(&work_ids, unread_comment_ids)
            .await?;

        Ok(ListDto {
            count,
            data: works
                .iter()
                .map(|work| labels.dto(work, unread.contains(&work.id)))
                .collect(),
        })
    }

    pub async fn detail(
        &self,
        work_id: i32,
        unread_comment_ids: &HashSet<i32>,
    ) -> Result<WorkDetailDto, Error> {
        let Some(work) = WorkRepository::new(self.db).get(work_id).await? else {
            return Err(Error::not_found("work not found"));
        };

        let labels = self.labels(std::slice::from_ref(&work)).await?;
        let unread = self
            .works_with_unread(&[work.id], unread_comment_ids)
            .await?;

        Ok(WorkDetailDto {
            work: labels.dto(&work, unread.contains(&work.id)),
            image_before: stored_file(work.image_before.as_deref()).map(|file| file.view()),
            image_after: stored_file(work.image_after.as_deref()).map(|file| file.view()),
        })
    }

    /// Spreadsheet or printable report of every matching work entry.
    ///
    /// The file is named after the first day of the `created_at` filter, or today.
    pub async fn export(
        &self,
        auth: &AuthUser,
        query: &ListQuery,
        format: ExportFormat,
    ) -> Result<ExportFile, Error> {
        let query = ListQuery {
            no_paging: Some("yes".to_string()),
            ..query.clone()
        };
        let created = query.created_range()?;
        let owner_id = auth.is_staff().then_some(auth.id);

        let (works, _) = WorkRepository::new(self.db)
            .find(&query, created, owner_id)
            .await?;
        let labels = self.labels(&works).await?;

        let image_link = |value: Option<&str>| {
            stored_file(value)
                .map(|file| file.view().view)
                .unwrap_or_default()
        };
        let rows: Vec<Vec<String>> = works
            .iter()
            .enumerate()
            .map(|(index, work)| {
                let dto = labels.dto(work, false);

                vec![
                    (index + 1).to_string(),
                    dto.user.name,
                    dto.task.name,
                    dto.task_type.name,
                    dto.floor,
                    dto.info,
                    image_link(work.image_before.as_deref()),
                    image_link(work.image_after.as_deref()),
                    indonesian_datetime(to_local(work.created_at)),
                ]
            })
            .collect();

        let report_day = match created {
            Some(range) => to_local(range.start),
            None => to_local(Utc::now().naive_utc()),
        };
        let report = Report {
            title: format!(
                "CleanCare - Laporan Pekerjaan Petugas Kebersihan ({})",
                indonesian_date(report_day)
            ),
            sheet_name: EXPORT_SHEET_NAME,
            headers: &EXPORT_HEADERS,
            column_widths: &EXPORT_COLUMN_WIDTHS,
            rows,
        };

        report.export(
            format,
            &format!(
                "({}) CleanCare - Laporan Pekerjaan Petugas Kebersihan",
                export_date(report_day)
            ),
        )
    }

    /// Daily work is summarised per floor, any other task per staff member
    pub async fn dashboard_admin(
        &self,
        auth: &AuthUser,
        query: &ListQuery,
    ) -> Result<DashboardAdminDto, Error> {
        auth.require_admin()?;

        let Some(task_id) = query.task_id else {
            return Err(Error::Validation("task_id is required".to_string()));
        };
        let created = query.created_range()?;
        let work_repo = WorkRepository::new(self.db);

        if task_id == TASK_ID_DAILY {
            let floors = work_repo.count_by_floor(task_id, created).await?;

            return Ok(DashboardAdminDto::Floor(
                floors
                    .into_iter()
                    .map(|row| FloorSummaryDto {
                        floor: row.floor,
                        count: row.count,
                    })
                    .collect(),
            ));
        }

        let users = work_repo.count_by_user(task_id, created).await?;

        Ok(DashboardAdminDto::User(
            users
                .into_iter()
                .map(|row| UserSummaryDto {
                    user_id: row.user_id,
                    name: row.name,
                    count: row.count,
                })
                .collect(),
        ))
    }

    /// Work of one task per task type, across all staff
    pub async fn dashboard_staff(
        &self,
        query: &ListQuery,
    ) -> Result<Vec<TaskTypeSummaryDto>, Error> {
        let Some(task_id) = query.task_id else {
            return Err(Error::Validation("task_id is required".to_string()));
        };
        let created = query.created_range()?;
        let task_types = WorkRepository::new(self.db)
            .count_by_task_type(task_id, created)
            .await?;

        Ok(task_types
            .into_iter()
            .map(|row| TaskTypeSummaryDto {
                task_type_id: row.task_type_id,
                name: row.name,
                count: row.count,
            })
            .collect())
    }
}
