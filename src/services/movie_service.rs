use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

use crate::{
    db::for_update,
    dto::tickets::RefundSummary,
    entity::{
        categories::Entity as Categories,
        movies::{ActiveModel as MovieActive, Column as MovieCol, Entity as Movies},
        screenings::{Column as ScreeningCol, Entity as Screenings},
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, ensure_admin},
    models::Movie,
    response::{ApiResponse, Meta},
    routes::movies::{CreateMovieRequest, MovieList, UpdateMovieRequest},
    routes::params::{MovieQuery, MovieSortBy, SortOrder},
    services::screening_service,
    state::AppState,
};

/// Catalog states a movie moves through; free-form values are rejected.
pub const MOVIE_STATUSES: &[&str] = &["announced", "showing", "archived"];

fn validate_status(status: &str) -> AppResult<()> {
    if !MOVIE_STATUSES.contains(&status) {
        return Err(AppError::validation(format!(
            "status must be one of: {}",
            MOVIE_STATUSES.join(", ")
        )));
    }
    Ok(())
}

pub async fn list_movies(
    state: &AppState,
    query: MovieQuery,
) -> AppResult<ApiResponse<MovieList>> {
    let (page, per_page, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(q) = query.q.as_ref().filter(|q| !q.is_empty()) {
        condition = condition.add(MovieCol::Title.contains(q));
    }
    if let Some(category_id) = query.category_id {
        condition = condition.add(MovieCol::CategoryId.eq(category_id));
    }
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        condition = condition.add(MovieCol::Status.eq(status.clone()));
    }

    let sort_by = query.sort_by.unwrap_or(MovieSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Movies::find().filter(condition);
    let column = match sort_by {
        MovieSortBy::CreatedAt => MovieCol::CreatedAt,
        MovieSortBy::Title => MovieCol::Title,
        MovieSortBy::ReleaseDate => MovieCol::ReleaseDate,
    };
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(column),
        SortOrder::Desc => finder.order_by_desc(column),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(per_page as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Movie::from)
        .collect();

    let meta = Meta::new(page, per_page, total);
    Ok(ApiResponse::success("Ok", MovieList { items }, Some(meta)))
}

pub async fn get_movie(state: &AppState, id: i32) -> AppResult<ApiResponse<Movie>> {
    let movie = Movies::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success("Ok", movie.into(), Some(Meta::empty())))
}

pub async fn create_movie(
    state: &AppState,
    principal: &Principal,
    payload: CreateMovieRequest,
) -> AppResult<ApiResponse<Movie>> {
    ensure_admin(principal)?;

    if payload.duration_minutes <= 0 {
        return Err(AppError::validation("duration_minutes must be positive"));
    }
    validate_status(&payload.status)?;

    Categories::find_by_id(payload.category_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let exists = Movies::find()
        .filter(MovieCol::Title.eq(payload.title.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::conflict("a movie with that title already exists"));
    }

    let result = MovieActive {
        id: NotSet,
        title: Set(payload.title),
        description: Set(payload.description),
        author: Set(payload.author),
        release_date: Set(payload.release_date),
        duration_minutes: Set(payload.duration_minutes),
        status: Set(payload.status),
        category_id: Set(payload.category_id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await;

    let movie = match result {
        Ok(m) => m,
        Err(e)
            if matches!(
                e.sql_err(),
                Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
            ) =>
        {
            return Err(AppError::conflict("a movie with that title already exists"));
        }
        Err(e) => return Err(e.into()),
    };

    Ok(ApiResponse::success(
        "Movie created",
        movie.into(),
        Some(Meta::empty()),
    ))
}

pub async fn update_movie(
    state: &AppState,
    principal: &Principal,
    id: i32,
    payload: UpdateMovieRequest,
) -> AppResult<ApiResponse<Movie>> {
    ensure_admin(principal)?;

    let existing = Movies::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    if let Some(title) = payload.title.as_ref() {
        let clash = Movies::find()
            .filter(MovieCol::Title.eq(title.as_str()))
            .filter(MovieCol::Id.ne(id))
            .one(&state.orm)
            .await?;
        if clash.is_some() {
            return Err(AppError::conflict("a movie with that title already exists"));
        }
    }
    if let Some(category_id) = payload.category_id {
        Categories::find_by_id(category_id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound)?;
    }
    if let Some(status) = payload.status.as_ref() {
        validate_status(status)?;
    }
    if let Some(duration) = payload.duration_minutes {
        if duration <= 0 {
            return Err(AppError::validation("duration_minutes must be positive"));
        }
    }

    let mut active: MovieActive = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(author) = payload.author {
        active.author = Set(author);
    }
    if let Some(release_date) = payload.release_date {
        active.release_date = Set(release_date);
    }
    if let Some(duration) = payload.duration_minutes {
        active.duration_minutes = Set(duration);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }

    let movie = active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Updated",
        movie.into(),
        Some(Meta::empty()),
    ))
}

/// Deleting a movie tears down all of its screenings the way a single
/// screening delete does, refunding every sold ticket along the way.
pub async fn delete_movie(
    state: &AppState,
    principal: &Principal,
    id: i32,
) -> AppResult<ApiResponse<RefundSummary>> {
    ensure_admin(principal)?;

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    Movies::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    // Each screening is locked before its teardown, the same way a single
    // screening delete locks its row.
    let screenings = for_update(
        Screenings::find().filter(ScreeningCol::MovieId.eq(id)),
        backend,
    )
    .all(&txn)
    .await?;

    let mut refunded: u64 = 0;
    for screening in &screenings {
        refunded += screening_service::delete_screening_cascade(&txn, screening.id).await?;
    }

    Movies::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(movie_id = id, refunded, "movie deleted");

    Ok(ApiResponse::success(
        "Movie deleted",
        RefundSummary { refunded },
        Some(Meta::empty()),
    ))
}
