//! Reading multipart bodies into the typed forms the services accept.

use std::{collections::HashMap, str::FromStr};

use axum::extract::Multipart;

use crate::server::{
    error::Error,
    model::form::{CreateWorkForm, RegisterForm, UpdateUserForm, UpdateWorkForm, UploadedFile},
};

/// Text and file parts of a multipart body, keyed by field name
#[derive(Debug, Default)]
pub struct FormFields {
    texts: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormFields {
    /// Drains a multipart body. Empty file parts are treated as absent.
    pub async fn read(mut multipart: Multipart) -> Result<Self, Error> {
        let mut fields = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) if !file_name.is_empty() => {
                    let bytes = field.bytes().await?;
                    if !bytes.is_empty() {
                        fields.files.insert(
                            name,
                            UploadedFile {
                                name: file_name,
                                bytes: bytes.to_vec(),
                            },
                        );
                    }
                }
                _ => {
                    let text = field.text().await?;
                    fields.texts.insert(name, text);
                }
            }
        }

        Ok(fields)
    }

    pub fn with_text(mut self, name: &str, value: &str) -> Self {
        self.texts.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.insert(name.to_string(), file);
        self
    }

    /// Trimmed value of a text field, `None` when missing or blank
    fn text(&mut self, name: &str) -> Option<String> {
        self.texts
            .remove(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required_text(&mut self, name: &str) -> Result<String, Error> {
        self.text(name)
            .ok_or_else(|| Error::Validation(format!("{} is required", name)))
    }

    fn parse<T: FromStr>(&mut self, name: &str) -> Result<Option<T>, Error> {
        self.text(name)
            .map(|value| {
                value
                    .parse()
                    .map_err(|_| Error::Validation(format!("{} is invalid", name)))
            })
            .transpose()
    }

    fn required<T: FromStr>(&mut self, name: &str) -> Result<T, Error> {
        self.parse(name)?
            .ok_or_else(|| Error::Validation(format!("{} is required", name)))
    }

    fn flag(&mut self, name: &str) -> bool {
        matches!(
            self.text(name).map(|value| value.to_lowercase()).as_deref(),
            Some("true" | "1" | "yes")
        )
    }

    fn file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

impl TryFrom<FormFields> for RegisterForm {
    type Error = Error;

    fn try_from(mut fields: FormFields) -> Result<Self, Self::Error> {
        Ok(Self {
            number_id: fields.required_text("number_id")?,
            email: fields.required_text("email")?,
            password: fields.required_text("password")?,
            profile: fields.file("profile"),
        })
    }
}

impl TryFrom<FormFields> for UpdateUserForm {
    type Error = Error;

    fn try_from(mut fields: FormFields) -> Result<Self, Self::Error> {
        Ok(Self {
            number_id: fields.text("number_id"),
            name: fields.text("name"),
            email: fields.text("email"),
            role_id: fields.parse("role_id")?,
            floor: fields.text("floor"),
            profile: fields.file("profile"),
            delete_profile: fields.flag("delete_profile"),
        })
    }
}

impl TryFrom<FormFields> for CreateWorkForm {
    type Error = Error;

    fn try_from(mut fields: FormFields) -> Result<Self, Self::Error> {
        Ok(Self {
            task_id: fields.required("task_id")?,
            task_type_id: fields.required("task_type_id")?,
            floor: fields.required_text("floor")?,
            info: fields.required_text("info")?,
            image_before: fields.file("image_before"),
            image_after: fields.file("image_after"),
        })
    }
}

impl TryFrom<FormFields> for UpdateWorkForm {
    type Error = Error;

    fn try_from(mut fields: FormFields) -> Result<Self, Self::Error> {
        Ok(Self {
            task_id: fields.parse("task_id")?,
            task_type_id: fields.parse("task_type_id")?,
            floor: fields.text("floor"),
            info: fields.text("info"),
            image_before: fields.file("image_before"),
            image_after: fields.file("image_after"),
            delete_image_before: fields.flag("delete_image_before"),
            delete_image_after: fields.flag("delete_image_after"),
        })
    }
}
