use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::{
    db::for_update,
    entity::{users::Column as UserCol, Users},
    error::{AppError, AppResult},
};

/// Take `amount` from the user's stored balance and return the new balance.
///
/// The subtraction re-checks the funds in the write itself
/// (`money = money - x WHERE money >= x`), so the balance cannot go negative
/// even when two debits race on one row.
pub async fn debit<C: ConnectionTrait>(conn: &C, user_id: i32, amount: i64) -> AppResult<i64> {
    if amount < 0 {
        return Err(AppError::validation("amount must not be negative"));
    }

    let backend = conn.get_database_backend();
    let user = for_update(Users::find_by_id(user_id), backend)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    if amount == 0 {
        return Ok(user.money);
    }

    let result = Users::update_many()
        .col_expr(UserCol::Money, Expr::col(UserCol::Money).sub(amount))
        .filter(UserCol::Id.eq(user_id))
        .filter(UserCol::Money.gte(amount))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::InsufficientFunds);
    }

    Ok(user.money - amount)
}

/// Add `amount` to the user's stored balance and return the new balance.
pub async fn credit<C: ConnectionTrait>(conn: &C, user_id: i32, amount: i64) -> AppResult<i64> {
    if amount < 0 {
        return Err(AppError::validation("amount must not be negative"));
    }

    let backend = conn.get_database_backend();
    let user = for_update(Users::find_by_id(user_id), backend)
        .one(conn)
        .await?
        .ok_or(AppError::NotFound)?;

    if amount == 0 {
        return Ok(user.money);
    }

    Users::update_many()
        .col_expr(UserCol::Money, Expr::col(UserCol::Money).add(amount))
        .filter(UserCol::Id.eq(user_id))
        .exec(conn)
        .await?;

    Ok(user.money + amount)
}
