use chrono::NaiveDateTime;

use crate::server::{
    error::Error,
    model::form::UploadedFile,
    service::storage::{DriveClient, StoredFile},
    util::image::{image_mime_type, validate_image_name},
};

/// An image that passed validation and awaits upload
#[derive(Debug)]
pub struct PendingImage {
    pub name: String,
    pub mime_type: &'static str,
    bytes: Vec<u8>,
}

impl PendingImage {
    /// Validates the file name and derives the name the image is stored under
    pub fn validate(file: UploadedFile, now: NaiveDateTime) -> Result<Self, Error> {
        let name = validate_image_name(&file.name, now)?;
        let mime_type = image_mime_type(&name);

        Ok(Self {
            name,
            mime_type,
            bytes: file.bytes,
        })
    }

    pub fn validate_opt(
        file: Option<UploadedFile>,
        now: NaiveDateTime,
    ) -> Result<Option<Self>, Error> {
        file.map(|file| Self::validate(file, now)).transpose()
    }

    pub async fn upload(self, drive: &DriveClient) -> Result<StoredFile, Error> {
        Ok(drive.upload(&self.name, self.mime_type, self.bytes).await?)
    }
}
