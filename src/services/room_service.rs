use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    entity::{
        rooms::{ActiveModel as RoomActive, Column as RoomCol, Entity as Rooms},
        screenings::{Column as ScreeningCol, Entity as Screenings},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, ensure_admin},
    models::Room,
    response::{ApiResponse, Meta},
    routes::params::ListQuery,
    routes::rooms::{CreateRoomRequest, RoomList, UpdateRoomRequest},
    state::AppState,
};

pub async fn list_rooms(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<RoomList>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let finder = Rooms::find().order_by_asc(RoomCol::Name);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Room::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Ok", RoomList { items }, Some(meta)))
}

pub async fn get_room(state: &AppState, id: i32) -> AppResult<ApiResponse<Room>> {
    let room = Rooms::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Ok", room.into(), Some(Meta::empty())))
}

pub async fn create_room(
    state: &AppState,
    principal: &Principal,
    payload: CreateRoomRequest,
) -> AppResult<ApiResponse<Room>> {
    ensure_admin(principal)?;

    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    if payload.capacity <= 0 {
        return Err(AppError::validation("capacity must be positive"));
    }

    let exists = Rooms::find()
        .filter(RoomCol::Name.eq(payload.name.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::conflict("a room with that name already exists"));
    }

    let room = RoomActive {
        id: NotSet,
        name: Set(payload.name),
        capacity: Set(payload.capacity),
        kind: Set(payload.kind),
        open: Set(payload.open.unwrap_or(true)),
        accessible: Set(payload.accessible.unwrap_or(false)),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Room created",
        room.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_room(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: UpdateRoomRequest,
) -> AppResult<ApiResponse<Room>> {
    ensure_admin(principal)?;

    let existing = Rooms::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(name) = payload.name.as_ref() {
        if name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }
        let clash = Rooms::find()
            .filter(RoomCol::Name.eq(name.as_str()))
            .filter(RoomCol::Id.ne(id))
            .one(&state.orm)
            .await?;
        if clash.is_some() {
            return Err(AppError::conflict("a room with that name already exists"));
        }
    }
    if let Some(capacity) = payload.capacity {
        if capacity <= 0 {
            return Err(AppError::validation("capacity must be positive"));
        }
    }

    let mut active: RoomActive = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name);
    }
    if let Some(capacity) = payload.capacity {
        active.capacity = Set(capacity);
    }
    if let Some(kind) = payload.kind {
        active.kind = Set(kind);
    }
    if let Some(open) = payload.open {
        active.open = Set(open);
    }
    if let Some(accessible) = payload.accessible {
        active.accessible = Set(accessible);
    }

    let room = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        room.into(),
        Some(Meta::empty()),
    ))
}

pub async fn delete_room(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(principal)?;

    Rooms::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let in_use = Screenings::find()
        .filter(ScreeningCol::RoomId.eq(id))
        .count(&state.orm)
        .await?;
    if in_use > 0 {
        return Err(AppError::conflict(
            "room is still referenced by screenings",
        ));
    }

    Rooms::delete_by_id(id).exec(&state.orm).await?;

    Ok(ApiResponse::deleted())
}
