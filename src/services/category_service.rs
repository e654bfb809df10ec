use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    entity::{
        categories::{ActiveModel as CategoryActive, Column as CategoryCol, Entity as Categories},
        movies::{Column as MovieCol, Entity as Movies},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, ensure_admin},
    models::Category,
    response::{ApiResponse, Meta},
    routes::categories::{CategoryList, CreateCategoryRequest, UpdateCategoryRequest},
    routes::params::ListQuery,
    state::AppState,
};

pub async fn list_categories(
    state: &AppState,
    query: ListQuery,
) -> AppResult<ApiResponse<CategoryList>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let finder = Categories::find().order_by_asc(CategoryCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success(
        "Ok",
        CategoryList { items },
        Some(meta),
    ))
}

pub async fn get_category(state: &AppState, id: i32) -> AppResult<ApiResponse<Category>> {
    let category = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "Ok",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn create_category(
    state: &AppState,
    principal: &Principal,
    payload: CreateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(principal)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }

    let exists = Categories::find()
        .filter(CategoryCol::Name.eq(payload.name.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::conflict(
            "a category with that name already exists",
        ));
    }

    let category = CategoryActive {
        id: NotSet,
        name: Set(payload.name),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Category created",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_category(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: UpdateCategoryRequest,
) -> AppResult<ApiResponse<Category>> {
    ensure_admin(principal)?;

    let existing = Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    let clash = Categories::find()
        .filter(CategoryCol::Name.eq(payload.name.as_str()))
        .filter(CategoryCol::Id.ne(id))
        .one(&state.orm)
        .await?;
    if clash.is_some() {
        return Err(AppError::conflict(
            "a category with that name already exists",
        ));
    }

    let mut active: CategoryActive = existing.into();
    active.name = Set(payload.name);
    let category = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        category.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_category(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(principal)?;

    Categories::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let in_use = Movies::find()
        .filter(MovieCol::CategoryId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::conflict(
            "category is still referenced by movies",
        ));
    }

    Categories::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::deleted())
}
