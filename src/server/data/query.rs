use sea_orm::{
    sea_query::{Expr, ExprTrait, Func},
    ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Select,
};

use crate::server::model::query::ListQuery;

/// Case-insensitive `LIKE %value%` on a text column
pub fn contains_ci<C: ColumnTrait>(column: C, value: &str) -> Condition {
    let pattern = format!("%{}%", value.to_lowercase());

    Condition::all()
        .add(Expr::expr(Func::lower(Expr::col((column.entity_name(), column)))).like(pattern))
}

/// Counts the rows matched by `select`, then fetches the requested page in the requested order.
pub async fn fetch_page<C, E>(
    db: &C,
    select: Select<E>,
    query: &ListQuery,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync + 'static,
{
    let count = select.clone().count(db).await?;

    let mut select = select;
    if let Some(column) = query.order_column::<E>() {
        select = select.order_by(column, query.direction());
    }
    if let Some((offset, limit)) = query.paging() {
        select = select.offset(offset).limit(limit);
    }

    Ok((select.all(db).await?, count))
}
