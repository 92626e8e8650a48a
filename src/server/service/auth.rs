//! Login sessions, self registration and password recovery.

use chrono::Utc;
use fred::{prelude::*, types::Expiration};
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    model::{
        auth::{LoginDto, LoginResponseDto},
        user::UserDto,
    },
    server::{
        data::user::UserRepository,
        error::{auth::AuthError, Error},
        model::{
            app::AppState,
            auth::AuthUser,
            form::RegisterForm,
            redis::RateLimitKind,
        },
        service::{
            rate_limit::RateLimiter,
            session::SessionService,
            token::RESET_TOKEN_TTL_SECS,
            upload::PendingImage,
            user::UserService,
        },
        util::password::{generate_password, hash_password, verify_password, GENERATED_PASSWORD_LEN},
    },
};

/// Shown as the initiator of a reset requested through the forgot password email
const SYSTEM_RESET_BY: &str = "System";

pub struct AuthService<'a> {
    state: &'a AppState,
}

impl<'a> AuthService<'a> {
    /// Creates a new instance of [`AuthService`]
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn sessions(&self) -> SessionService<'_> {
        SessionService::new(&self.state.redis, &self.state.keys)
    }

    fn rate_limiter(&self) -> RateLimiter<'_> {
        RateLimiter::new(&self.state.redis, &self.state.keys)
    }

    /// Starts a new login session for a registered user
    pub async fn login(&self, payload: LoginDto) -> Result<LoginResponseDto, Error> {
        let user = UserRepository::new(&self.state.db)
            .get_by_number_id(&payload.number_id)
            .await?
            .filter(|user| user.email.is_some())
            .ok_or(AuthError::InvalidCredentials)?;

        let matches = user
            .password
            .as_deref()
            .is_some_and(|hash| verify_password(&payload.password, hash));
        if !matches {
            return Err(AuthError::InvalidCredentials.into());
        }

        let uuid = Uuid::new_v4().to_string();
        self.sessions().register_login(user.id, &uuid).await?;
        let token = self.state.tokens.issue(&user, &uuid)?;

        tracing::info!("user {} logged in", user.id);

        Ok(LoginResponseDto {
            token,
            data: UserService::new(&self.state.db).dto(user).await?,
        })
    }

    pub async fn logout(&self, auth: &AuthUser) -> Result<(), Error> {
        self.sessions().logout(auth.id, &auth.uuid).await
    }

    /// Issues a fresh token for the same login session
    pub async fn refresh(&self, auth: &AuthUser) -> Result<String, Error> {
        self.sessions().increment_refresh(&auth.uuid).await?;

        self.state.tokens.reissue(auth)
    }

    /// Mails a single use link that resets the password of the account
    pub async fn forgot_password(&self, ip: &str, email: &str) -> Result<(), Error> {
        self.rate_limiter()
            .check(RateLimitKind::ResetPassword, ip)
            .await?;

        let Some(user) = UserRepository::new(&self.state.db)
            .get_by_email(email)
            .await?
        else {
            return Err(AuthError::EmailNotFound.into());
        };

        let token = self.state.tokens.issue_reset(user.id)?;
        let _: () = self
            .state
            .redis
            .set(
                self.state.keys.reset_token(&token),
                user.id,
                Some(Expiration::EX(RESET_TOKEN_TTL_SECS)),
                None,
                false,
            )
            .await?;

        let link = format!(
            "{}/api/auth/validation/reset-password/{}",
            self.state.info.base_url.trim_end_matches('/'),
            token
        );
        self.state
            .mailer
            .send_forgot_password(email, &user.name, &link)
            .await?;

        Ok(())
    }

    /// Consumes a reset token and mails a newly generated password.
    ///
    /// Returns the email the password was sent to.
    pub async fn validate_reset_password(&self, token: &str) -> Result<String, Error> {
        let removed: i64 = self
            .state
            .redis
            .del(self.state.keys.reset_token(token))
            .await?;
        if removed == 0 {
            return Err(AuthError::InvalidResetToken.into());
        }

        let claims = self.state.tokens.decode_reset(token)?;

        let user_repo = UserRepository::new(&self.state.db);
        let Some(user) = user_repo.get(claims.user_id).await? else {
            return Err(AuthError::UnknownUser.into());
        };
        let Some(email) = user.email.clone() else {
            return Err(AuthError::EmailNotFound.into());
        };

        let password = generate_password(GENERATED_PASSWORD_LEN);
        let password_hash = hash_password(&password)?;

        let txn = self.state.db.begin().await?;
        let user = UserRepository::new(&txn)
            .set_password(user, password_hash)
            .await?;
        if let Err(e) = self
            .state
            .mailer
            .send_reset_password(&email, &user.name, SYSTEM_RESET_BY, &password)
            .await
        {
            txn.rollback().await?;

            return Err(e.into());
        }
        txn.commit().await?;

        self.sessions().force_logout(user.id).await?;

        Ok(email)
    }

    /// Looks up a user that has yet to register
    pub async fn verify_number(&self, ip: &str, number_id: &str) -> Result<UserDto, Error> {
        self.rate_limiter()
            .check(RateLimitKind::VerifyNumber, ip)
            .await?;

        let Some(user) = UserRepository::new(&self.state.db)
            .get_by_number_id(number_id)
            .await?
        else {
            return Err(AuthError::WrongNumberId.into());
        };
        if user.password.is_some() {
            return Err(AuthError::AlreadyRegistered.into());
        }

        UserService::new(&self.state.db).dto(user).await
    }

    /// Completes the account an admin created with an email, a password and a profile picture
    pub async fn register(&self, ip: &str, form: RegisterForm) -> Result<(), Error> {
        self.rate_limiter()
            .check(RateLimitKind::Register, ip)
            .await?;

        let user_repo = UserRepository::new(&self.state.db);
        let Some(user) = user_repo.get_by_number_id(&form.number_id).await? else {
            return Err(AuthError::UnknownUser.into());
        };
        if user.password.is_some() {
            return Err(AuthError::AlreadyRegistered.into());
        }
        if let Some(other) = user_repo.get_by_email(&form.email).await? {
            if other.id != user.id {
                return Err(Error::bad_request("email already exist"));
            }
        }

        let password_hash = hash_password(&form.password)?;
        let profile = PendingImage::validate_opt(form.profile, Utc::now().naive_utc())?;

        let uploaded = match profile {
            Some(image) => Some(image.upload(&self.state.storage).await?),
            None => None,
        };
        let stored = uploaded
            .as_ref()
            .map(|file| (file.id.clone(), file.name.clone()));

        if let Err(e) = user_repo
            .register(user, form.email, password_hash, stored)
            .await
        {
            if let Some(file) = uploaded {
                self.state.storage.delete_quietly(&file.id).await;
            }

            return Err(e.into());
        }

        Ok(())
    }
}
