use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::ListDto,
        role::RoleDto,
        user::{ChangePasswordDto, CreateUserDto, UserDto},
    },
    server::{
        data::{
            role::RoleRepository,
            user::{UserChanges, UserRepository},
        },
        error::{auth::AuthError, Error},
        model::{
            auth::AuthUser,
            db::{RoleModel, UserModel, ROLE_ID_STAFF},
            form::UpdateUserForm,
            query::ListQuery,
        },
        service::{
            export::{ExportFile, ExportFormat, Report},
            mail::Mailer,
            session::SessionService,
            storage::{file_view, DriveClient},
            upload::PendingImage,
        },
        util::{
            password::{generate_password, hash_password, verify_password, GENERATED_PASSWORD_LEN},
            time::{indonesian_datetime, to_local},
        },
    },
};

const EXPORT_TITLE: &str = "CleanCare - Laporan Data Pengguna";
const EXPORT_SHEET_NAME: &str = "CleanCare";
const EXPORT_HEADERS: [&str; 8] = [
    "No",
    "Nomor ID",
    "Nama",
    "Email",
    "Jabatan",
    "Tanggal Terdaftar",
    "Status Verifikasi",
    "Penempatan",
];
const EXPORT_COLUMN_WIDTHS: [f32; 8] = [8.0, 30.0, 38.0, 48.0, 35.0, 55.0, 30.0, 33.0];

/// Builds the public view of a user
pub fn user_dto(user: UserModel, role: Option<&RoleModel>) -> UserDto {
    let profile = match (user.profile.as_deref(), user.profile_name.as_deref()) {
        (Some(id), name) if !id.is_empty() => Some(file_view(id, name.unwrap_or_default())),
        _ => None,
    };

    UserDto {
        id: user.id,
        number_id: user.number_id,
        name: user.name,
        verified: user.email.is_some(),
        email: user.email.unwrap_or_else(|| "-".to_string()),
        role: RoleDto {
            id: user.role_id,
            name: role.map(|role| role.name.clone()).unwrap_or_default(),
        },
        floor: user.floor,
        profile,
        created_at: user.created_at,
    }
}

pub struct UserService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UserService<'a> {
    /// Creates a new instance of [`UserService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn roles(&self) -> Result<HashMap<i32, RoleModel>, Error> {
        let roles = RoleRepository::new(self.db).all().await?;

        Ok(roles.into_iter().map(|role| (role.id, role)).collect())
    }

    /// Converts a single user, looking up its role
    pub async fn dto(&self, user: UserModel) -> Result<UserDto, Error> {
        let role = RoleRepository::new(self.db).get(user.role_id).await?;

        Ok(user_dto(user, role.as_ref()))
    }

    /// Creates a user that registers later with their number id
    pub async fn create(&self, auth: &AuthUser, payload: CreateUserDto) -> Result<(), Error> {
        auth.require_admin()?;

        let user_repo = UserRepository::new(self.db);
        if user_repo
            .get_by_number_id(&payload.number_id)
            .await?
            .is_some()
        {
            return Err(Error::bad_request("number id already exist"));
        }
        if RoleRepository::new(self.db)
            .get(payload.role_id)
            .await?
            .is_none()
        {
            return Err(Error::not_found("role not found"));
        }

        user_repo
            .create(
                payload.number_id,
                payload.name,
                payload.role_id,
                payload.floor,
            )
            .await?;

        Ok(())
    }

    pub async fn list(&self, query: &ListQuery) -> Result<ListDto<UserDto>, Error> {
        let created = query.created_range()?;
        let (users, count) = UserRepository::new(self.db).find(query, created).await?;

        let roles = self.roles().await?;

        Ok(ListDto {
            count,
            data: users
                .into_iter()
                .map(|user| {
                    let role = roles.get(&user.role_id);
                    user_dto(user, role)
                })
                .collect(),
        })
    }

    pub async fn get(&self, user_id: i32) -> Result<UserDto, Error> {
        let Some(user) = UserRepository::new(self.db).get(user_id).await? else {
            return Err(Error::not_found("user not found"));
        };

        self.dto(user).await
    }

    /// The authenticated user
    pub async fn info(&self, auth: &AuthUser) -> Result<UserDto, Error> {
        self.get(auth.id).await
    }

    /// Updates a user; admins may update anyone, other users only themselves.
    ///
    /// A new profile picture is uploaded before the update and removed again if the update
    /// fails. The replaced picture is deleted once the update succeeded.
    pub async fn update(
        &self,
        auth: &AuthUser,
        user_id: i32,
        form: UpdateUserForm,
        drive: &DriveClient,
    ) -> Result<(), Error> {
        if !auth.is_admin() && auth.id != user_id {
            return Err(AuthError::UserNotPermitted.into());
        }

        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo.get(user_id).await? else {
            return Err(Error::not_found("user not found"));
        };

        if let Some(number_id) = form.number_id.as_deref() {
            if let Some(other) = user_repo.get_by_number_id(number_id).await? {
                if other.id != user.id {
                    return Err(Error::bad_request("number id already exist"));
                }
            }
        }
        if let Some(email) = form.email.as_deref() {
            if let Some(other) = user_repo.get_by_email(email).await? {
                if other.id != user.id {
                    return Err(Error::bad_request("email already exist"));
                }
            }
        }
        if let Some(role_id) = form.role_id {
            if RoleRepository::new(self.db).get(role_id).await?.is_none() {
                return Err(Error::not_found("role not found"));
            }
        }

        let profile = PendingImage::validate_opt(form.profile, Utc::now().naive_utc())?;

        let mut changes = UserChanges {
            number_id: form.number_id,
            name: form.name,
            email: form.email,
            role_id: form.role_id,
            floor: form.floor,
            profile: None,
        };

        let uploaded = match profile {
            Some(image) => {
                let stored = image.upload(drive).await?;
                changes.profile = Some(Some((stored.id.clone(), stored.name.clone())));

                Some(stored)
            }
            None => {
                if form.delete_profile {
                    changes.profile = Some(None);
                }

                None
            }
        };

        let replaced_profile = changes
            .profile
            .is_some()
            .then(|| user.profile.clone())
            .flatten();

        if let Err(e) = user_repo.update(user, changes).await {
            if let Some(stored) = uploaded {
                drive.delete_quietly(&stored.id).await;
            }

            return Err(e.into());
        }

        if let Some(file_id) = replaced_profile {
            drive.delete_quietly(&file_id).await;
        }

        Ok(())
    }

    /// Soft deletes a user and revokes every login of the user
    pub async fn delete(
        &self,
        auth: &AuthUser,
        user_id: i32,
        sessions: &SessionService<'_>,
    ) -> Result<(), Error> {
        auth.require_admin()?;

        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo.get(user_id).await? else {
            return Err(Error::not_found("user not found"));
        };

        user_repo.soft_delete(user).await?;
        sessions.force_logout(user_id).await?;

        Ok(())
    }

    pub async fn change_password(
        &self,
        auth: &AuthUser,
        user_id: i32,
        payload: ChangePasswordDto,
        sessions: &SessionService<'_>,
    ) -> Result<(), Error> {
        if auth.id != user_id {
            return Err(AuthError::UserNotPermitted.into());
        }

        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo.get(user_id).await? else {
            return Err(Error::not_found("user not found"));
        };

        let matches = user
            .password
            .as_deref()
            .is_some_and(|hash| verify_password(&payload.old_password, hash));
        if !matches {
            return Err(Error::bad_request("old password is wrong"));
        }
        if payload.old_password == payload.new_password {
            return Err(Error::bad_request(
                "the new password cannot be the same as the old password",
            ));
        }

        let password_hash = hash_password(&payload.new_password)?;
        user_repo.set_password(user, password_hash).await?;
        sessions.force_logout(user_id).await?;

        Ok(())
    }

    /// Generates a new password for a user and mails it to them
    pub async fn reset_password(
        &self,
        auth: &AuthUser,
        user_id: i32,
        mailer: &Mailer,
        sessions: &SessionService<'_>,
    ) -> Result<(), Error> {
        auth.require_admin()?;

        let user_repo = UserRepository::new(self.db);
        let Some(user) = user_repo.get(user_id).await? else {
            return Err(Error::not_found("user not found"));
        };
        let Some(email) = user.email.clone() else {
            return Err(Error::bad_request("user has not registered"));
        };

        let reset_by = match user_repo.get(auth.id).await? {
            Some(admin) => admin.name,
            None => "Admin".to_string(),
        };

        let password = generate_password(GENERATED_PASSWORD_LEN);
        let password_hash = hash_password(&password)?;

        // The new password only sticks once the user has been told about it
        let txn = self.db.begin().await?;
        let user = UserRepository::new(&txn)
            .set_password(user, password_hash)
            .await?;
        if let Err(e) = mailer
            .send_reset_password(&email, &user.name, &reset_by, &password)
            .await
        {
            txn.rollback().await?;

            return Err(e.into());
        }
        txn.commit().await?;

        sessions.force_logout(user_id).await?;

        Ok(())
    }

    /// Spreadsheet or printable report of every matching user
    pub async fn export(
        &self,
        auth: &AuthUser,
        query: &ListQuery,
        format: ExportFormat,
    ) -> Result<ExportFile, Error> {
        auth.require_admin()?;

        let query = ListQuery {
            no_paging: Some("yes".to_string()),
            ..query.clone()
        };
        let created = query.created_range()?;
        let (users, _) = UserRepository::new(self.db).find(&query, created).await?;

        let rows: Vec<Vec<String>> = users
            .into_iter()
            .enumerate()
            .map(|(index, user)| {
                let position = if user.role_id == ROLE_ID_STAFF {
                    "Petugas Kebersihan"
                } else {
                    "Supervisor"
                };
                let verified = if user.email.is_some() { "Sudah" } else { "Belum" };

                vec![
                    (index + 1).to_string(),
                    user.number_id,
                    user.name,
                    user.email.unwrap_or_else(|| "-".to_string()),
                    position.to_string(),
                    indonesian_datetime(to_local(user.created_at)),
                    verified.to_string(),
                    user.floor
                        .filter(|floor| !floor.is_empty())
                        .unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();

        let report = Report {
            title: EXPORT_TITLE.to_string(),
            sheet_name: EXPORT_SHEET_NAME,
            headers: &EXPORT_HEADERS,
            column_widths: &EXPORT_COLUMN_WIDTHS,
            rows,
        };

        report.export(format, EXPORT_TITLE)
    }
}
