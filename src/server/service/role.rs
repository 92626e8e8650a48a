use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    model::{api::ListDto, role::RoleDto},
    server::{
        data::role::RoleRepository,
        error::Error,
        model::{auth::AuthUser, query::ListQuery},
        service::export::{build_sheet, ExportFile, XLSX_CONTENT_TYPE},
        util::time::to_local,
    },
};

pub struct RoleService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RoleService<'a> {
    /// Creates a new instance of [`RoleService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists roles; admins only
    pub async fn list(
        &self,
        auth: &AuthUser,
        query: &ListQuery,
    ) -> Result<ListDto<RoleDto>, Error> {
        auth.require_admin()?;

        let (roles, count) = RoleRepository::new(self.db).find(query).await?;

        Ok(ListDto {
            count,
            data: roles
                .into_iter()
                .map(|role| RoleDto {
                    id: role.id,
                    name: role.name,
                })
                .collect(),
        })
    }

    /// Spreadsheet of every matching role, ignoring paging
    pub async fn export(&self, auth: &AuthUser, query: &ListQuery) -> Result<ExportFile, Error> {
        auth.require_admin()?;

        let query = ListQuery {
            no_paging: Some("yes".to_string()),
            ..query.clone()
        };
        let (roles, _) = RoleRepository::new(self.db).find(&query).await?;

        let rows: Vec<Vec<String>> = roles
            .into_iter()
            .enumerate()
            .map(|(index, role)| vec![(index + 1).to_string(), role.name])
            .collect();
        let bytes = build_sheet("Master Data - Role", &["No", "Nama"], &rows)?;

        let today = to_local(Utc::now().naive_utc()).format("%Y-%m-%d");

        Ok(ExportFile {
            file_name: format!("Master Data - Role ({}).xlsx", today),
            content_type: XLSX_CONTENT_TYPE,
            bytes,
        })
    }
}
