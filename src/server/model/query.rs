use sea_orm::{ColumnTrait, EntityTrait, Order};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::server::{
    error::Error,
    util::time::{parse_date_range, DateRange},
};

const DEFAULT_LIMIT: u64 = 10;

/// Columns a list may be ordered by
const ORDERABLE_COLUMNS: [&str; 12] = [
    "id",
    "name",
    "email",
    "task_id",
    "number_id",
    "role_id",
    "user_id",
    "task_type_id",
    "floor",
    "info",
    "created_at",
    "updated_at",
];

/// Query parameters shared by every list endpoint.
///
/// Each endpoint only applies the filters that make sense for its entity.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Free text matched against the entity's searchable columns
    pub search: Option<String>,
    /// Page size, 10 when omitted
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    /// `yes` returns every row
    pub no_paging: Option<String>,
    /// Column to order by, `id` when omitted or unknown
    pub order: Option<String>,
    /// `ASC` or `DESC`
    pub order_by: Option<String>,

    pub id: Option<i32>,
    pub name: Option<String>,
    pub number_id: Option<String>,
    pub email: Option<String>,
    pub floor: Option<String>,
    pub info: Option<String>,
    pub role_id: Option<i32>,
    pub task_id: Option<i32>,
    pub task_type_id: Option<i32>,
    pub user_id: Option<i32>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    /// `YYYY-MM-DD_YYYY-MM-DD`
    pub created_at: Option<String>,
    /// `YYYY-MM-DD_YYYY-MM-DD`
    pub updated_at: Option<String>,
    /// Export format, `excel` or for users and work entries `pdf`
    pub format: Option<String>,
}

impl ListQuery {
    /// Offset and limit, or `None` when paging is disabled
    pub fn paging(&self) -> Option<(u64, u64)> {
        if self.no_paging.as_deref() == Some("yes") {
            return None;
        }

        let limit = self.limit.filter(|limit| *limit > 0).unwrap_or(DEFAULT_LIMIT);
        Some((self.offset.unwrap_or(0), limit))
    }

    pub fn direction(&self) -> Order {
        match self.order_by.as_deref().map(str::to_uppercase).as_deref() {
            Some("DESC") => Order::Desc,
            _ => Order::Asc,
        }
    }

    /// Resolves `order` against the whitelist and the columns of `E`, falling back to `id`
    pub fn order_column<E: EntityTrait>(&self) -> Option<E::Column> {
        self.order
            .as_deref()
            .filter(|order| ORDERABLE_COLUMNS.contains(order))
            .and_then(|order| order.parse::<E::Column>().ok())
            .or_else(|| "id".parse::<E::Column>().ok())
    }

    pub fn search(&self) -> Option<&str> {
        non_empty(&self.search)
    }

    pub fn created_range(&self) -> Result<Option<DateRange>, Error> {
        non_empty(&self.created_at).map(parse_date_range).transpose()
    }

    pub fn updated_range(&self) -> Result<Option<DateRange>, Error> {
        non_empty(&self.updated_at).map(parse_date_range).transpose()
    }
}

/// Returns the trimmed value unless it is missing or blank
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Applies a range filter on a timestamp column
pub fn in_range<C: ColumnTrait>(column: C, range: DateRange) -> sea_orm::Condition {
    sea_orm::Condition::all()
        .add(column.gte(range.start))
        .add(column.lt(range.end))
}
