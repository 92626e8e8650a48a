//! Cloud drive file storage.
//!
//! Files are kept in a public-readable folder of a Google Drive account and served through
//! the drive's image CDN. Access tokens are obtained from the account's OAuth2 refresh token
//! and cached until shortly before they expire.

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use oauth2::{
    basic::BasicClient, ClientId, ClientSecret, EndpointNotSet, EndpointSet, RefreshToken,
    TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::{
    model::user::FileViewDto,
    server::{config::Config, error::storage::StorageError},
};

/// Folder created under the configured parent for every uploaded file
pub const APP_FOLDER: &str = "CleanCare_App";

const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";
const FILE_VIEW_URL: &str = "https://lh3.googleusercontent.com/d";
/// Tokens are renewed this long before the drive considers them expired
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);
/// Assumed lifetime when the token endpoint does not report one
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

/// Separates file id and file name in a single stored column
const STORED_FILE_SEPARATOR: &str = "||";

type DriveOAuthClient =
    BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// A file kept in the drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub id: String,
    pub name: String,
}

impl StoredFile {
    /// Parses the `{id}||{name}` form kept in single column fields
    pub fn parse(value: &str) -> Option<Self> {
        let (id, name) = value.split_once(STORED_FILE_SEPARATOR)?;
        if id.is_empty() {
            return None;
        }

        Some(Self {
            id: id.to_string(),
            name: name.to_string(),
        })
    }

    pub fn encode(&self) -> String {
        format!("{}{}{}", self.id, STORED_FILE_SEPARATOR, self.name)
    }

    pub fn view(&self) -> FileViewDto {
        file_view(&self.id, &self.name)
    }
}

/// Public view of a drive file
pub fn file_view(id: &str, name: &str) -> FileViewDto {
    FileViewDto {
        id: id.to_string(),
        name: name.to_string(),
        view: format!("{}/{}", FILE_VIEW_URL, id),
    }
}

/// Connection settings of the drive account
#[derive(Debug, Clone)]
pub struct DriveSettings {
    pub api_url: String,
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub parent_id: String,
}

impl From<&Config> for DriveSettings {
    fn from(config: &Config) -> Self {
        Self {
            api_url: config.drive_api_url.clone(),
            token_url: config.drive_token_url.clone(),
            client_id: config.drive_client_id.clone(),
            client_secret: config.drive_client_secret.clone(),
            refresh_token: config.drive_refresh_token.clone(),
            parent_id: config.drive_parent_id.clone(),
        }
    }
}

#[cfg(test)]
impl DriveSettings {
    /// Settings pointing the drive and token endpoints at a mock server
    pub fn mock(url: &str) -> Self {
        Self {
            api_url: url.to_string(),
            token_url: format!("{}/token", url),
            client_id: "client".to_string(),
            client_secret: "secret".to_string(),
            refresh_token: "refresh".to_string(),
            parent_id: "parent".to_string(),
        }
    }
}

struct CachedToken {
    secret: String,
    expires_at: Instant,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileMetadata<'a> {
    name: &'a str,
    mime_type: &'a str,
    parents: [&'a str; 1],
}

#[derive(Clone)]
pub struct DriveClient {
    http: reqwest::Client,
    oauth: DriveOAuthClient,
    refresh_token: RefreshToken,
    api_url: String,
    parent_id: String,
    folder_id: Arc<RwLock<Option<String>>>,
    token: Arc<RwLock<Option<CachedToken>>>,
}

impl DriveClient {
    pub fn new(settings: DriveSettings) -> Result<Self, StorageError> {
        let token_url =
            TokenUrl::new(settings.token_url).map_err(|e| StorageError::Token(e.to_string()))?;

        let oauth = BasicClient::new(ClientId::new(settings.client_id))
            .set_client_secret(ClientSecret::new(settings.client_secret))
            .set_token_uri(token_url);

        // The token endpoint must not be followed across redirects
        let http = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            oauth,
            refresh_token: RefreshToken::new(settings.refresh_token),
            api_url: settings.api_url.trim_end_matches('/').to_string(),
            parent_id: settings.parent_id,
            folder_id: Arc::new(RwLock::new(None)),
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Returns a valid access token, exchanging the refresh token when the cached one is stale
    async fn access_token(&self) -> Result<String, StorageError> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.secret.clone());
            }
        }

        let mut cached = self.token.write().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Instant::now() {
                return Ok(token.secret.clone());
            }
        }

        let response = self
            .oauth
            .exchange_refresh_token(&self.refresh_token)
            .request_async(&self.http)
            .await
            .map_err(|e| StorageError::Token(e.to_string()))?;

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        let secret = response.access_token().secret().to_string();

        *cached = Some(CachedToken {
            secret: secret.clone(),
            expires_at: Instant::now() + lifetime.saturating_sub(TOKEN_EXPIRY_MARGIN),
        });

        Ok(secret)
    }

    /// Fails with the status and body of an unsuccessful response
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();

        Err(StorageError::Status {
            status: status.as_u16(),
            body,
        })
    }

    /// Finds or creates the application folder under the configured parent.
    ///
    /// Uploads go to the parent folder until this has run.
    pub async fn init_folder(&self, name: &str) -> Result<String, StorageError> {
        let token = self.access_token().await?;

        let query = format!(
            "name='{}' and mimeType='{}' and '{}' in parents and trashed=false",
            name, FOLDER_MIME_TYPE, self.parent_id
        );
        let response = self
            .http
            .get(format!("{}/drive/v3/files", self.api_url))
            .bearer_auth(&token)
            .query(&[("q", query.as_str()), ("fields", "files(id,name)")])
            .send()
            .await?;
        let existing = Self::ensure_success(response)
            .await?
            .json::<DriveFileList>()
            .await?
            .files
            .into_iter()
            .next();

        let folder_id = match existing {
            Some(folder) => {
                tracing::info!("Drive folder {} ready", name);
                folder.id
            }
            None => {
                let folder = self
                    .create_file(&token, name, FOLDER_MIME_TYPE, &self.parent_id)
                    .await?;
                self.grant_public_read(&token, &folder.id).await?;
                tracing::info!("Drive folder {} created", name);
                folder.id
            }
        };

        *self.folder_id.write().await = Some(folder_id.clone());

        Ok(folder_id)
    }

    async fn target_folder(&self) -> String {
        self.folder_id
            .read()
            .await
            .clone()
            .unwrap_or_else(|| self.parent_id.clone())
    }

    async fn create_file(
        &self,
        token: &str,
        name: &str,
        mime_type: &str,
        parent_id: &str,
    ) -> Result<DriveFile, StorageError> {
        let response = self
            .http
            .post(format!("{}/drive/v3/files", self.api_url))
            .bearer_auth(token)
            .json(&FileMetadata {
                name,
                mime_type,
                parents: [parent_id],
            })
            .send()
            .await?;

        Ok(Self::ensure_success(response).await?.json().await?)
    }

    async fn grant_public_read(&self, token: &str, file_id: &str) -> Result<(), StorageError> {
        let response = self
            .http
            .post(format!("{}/drive/v3/files/{}/permissions", self.api_url, file_id))
            .bearer_auth(token)
            .json(&json!({ "role": "reader", "type": "anyone" }))
            .send()
            .await?;
        Self::ensure_success(response).await?;

        Ok(())
    }

    async fn write_content(
        &self,
        token: &str,
        file_id: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<(), StorageError> {
        let response = self
            .http
            .patch(format!("{}/upload/drive/v3/files/{}", self.api_url, file_id))
            .query(&[("uploadType", "media")])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;
        Self::ensure_success(response).await?;

        self.grant_public_read(token, file_id).await
    }

    /// Uploads a file into the application folder and makes it public-readable.
    ///
    /// A file whose content or permission could not be written is deleted again.
    pub async fn upload(
        &self,
        name: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredFile, StorageError> {
        let token = self.access_token().await?;
        let folder_id = self.target_folder().await;

        let file = self.create_file(&token, name, mime_type, &folder_id).await?;

        if let Err(e) = self.write_content(&token, &file.id, mime_type, bytes).await {
            self.delete_quietly(&file.id).await;
            return Err(e);
        }

        Ok(StoredFile {
            id: file.id,
            name: if file.name.is_empty() {
                name.to_string()
            } else {
                file.name
            },
        })
    }

    pub async fn delete(&self, file_id: &str) -> Result<(), StorageError> {
        let token = self.access_token().await?;

        let response = self
            .http
            .delete(format!("{}/drive/v3/files/{}", self.api_url, file_id))
            .bearer_auth(&token)
            .send()
            .await?;
        Self::ensure_success(response).await?;

        Ok(())
    }

    /// Deletes a file, logging instead of failing
    pub async fn delete_quietly(&self, file_id: &str) {
        if let Err(e) = self.delete(file_id).await {
            tracing::warn!("Failed to delete drive file {}: {}", file_id, e);
        }
    }
}
