mod common;

use chrono::NaiveDate;
use cinema_booking_api::{
    dto::tickets::BuyTicketRequest,
    entity::{screenings, tickets},
    error::AppError,
    routes::categories::CreateCategoryRequest,
    routes::movies::{CreateMovieRequest, UpdateMovieRequest},
    routes::params::MovieQuery,
    routes::rooms::{CreateRoomRequest, UpdateRoomRequest},
    services::{category_service, movie_service, room_service, screening_service, ticket_service},
};
use sea_orm::{EntityTrait, PaginatorTrait};

use common::{
    admin, at, create_category, create_movie, create_room, create_screening, create_ticket,
    create_user, customer, seed_cinema, setup, staff, user_money,
};

fn movie_request(title: &str, category_id: i32) -> CreateMovieRequest {
    CreateMovieRequest {
        title: title.to_string(),
        description: None,
        author: "M. Petrov".into(),
        release_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        duration_minutes: 110,
        status: "showing".into(),
        category_id,
    }
}

// Tearing down a whole movie refunds every sold ticket on every one of
// its screenings, exactly like deleting the screenings one by one.
#[tokio::test]
async fn deleting_a_movie_refunds_across_all_screenings() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;

    let early = create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 10).await?;
    let late = create_screening(&state, movie_id, room_id, at(17, 0), at(19, 0), 10).await?;
    let first_ticket = create_ticket(&state, early, 1, 10).await?;
    let second_ticket = create_ticket(&state, late, 1, 10).await?;

    let alice = create_user(&state, "alice@example.com", 10).await?;
    let bob = create_user(&state, "bob@example.com", 10).await?;
    ticket_service::buy_ticket(&state, &customer(alice), first_ticket, BuyTicketRequest::default())
        .await?;
    ticket_service::buy_ticket(&state, &customer(bob), second_ticket, BuyTicketRequest::default())
        .await?;
    assert_eq!(user_money(&state, alice).await?, 0);

    let summary = movie_service::delete_movie(&state, &admin(1), movie_id)
        .await?
        .data
        .unwrap();
    assert_eq!(summary.refunded, 2);
    assert_eq!(user_money(&state, alice).await?, 10);
    assert_eq!(user_money(&state, bob).await?, 10);
    assert_eq!(screenings::Entity::find().count(&state.orm).await?, 0);
    assert_eq!(tickets::Entity::find().count(&state.orm).await?, 0);

    let err = movie_service::get_movie(&state, movie_id)
        .await
        .expect_err("the movie is gone");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn a_category_in_use_cannot_be_dropped() -> anyhow::Result<()> {
    let state = setup().await?;
    let category_id = create_category(&state, "Drama").await?;
    let movie_id = create_movie(&state, category_id, "The Long Night", 120).await?;

    let err = category_service::delete_category(&state, &admin(1), category_id)
        .await
        .expect_err("a movie still points at the category");
    assert!(matches!(err, AppError::Conflict(_)));

    movie_service::delete_movie(&state, &admin(1), movie_id).await?;
    category_service::delete_category(&state, &admin(1), category_id).await?;

    Ok(())
}

#[tokio::test]
async fn a_room_hosting_screenings_cannot_be_dropped() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 10).await?;

    let err = room_service::delete_room(&state, &admin(1), room_id)
        .await
        .expect_err("a screening still runs in the room");
    assert!(matches!(err, AppError::Conflict(_)));

    screening_service::delete_screening(&state, &staff(1), screening_id).await?;
    room_service::delete_room(&state, &admin(1), room_id).await?;

    Ok(())
}

#[tokio::test]
async fn catalog_names_are_unique() -> anyhow::Result<()> {
    let state = setup().await?;
    let category_id = create_category(&state, "Drama").await?;
    create_movie(&state, category_id, "The Long Night", 120).await?;

    let err = movie_service::create_movie(
        &state,
        &admin(1),
        movie_request("The Long Night", category_id),
    )
    .await
    .expect_err("movie titles are unique");
    assert!(matches!(err, AppError::Conflict(_)));

    let err = category_service::create_category(
        &state,
        &admin(1),
        CreateCategoryRequest {
            name: "Drama".into(),
        },
    )
    .await
    .expect_err("category names are unique");
    assert!(matches!(err, AppError::Conflict(_)));

    create_room(&state, "Screen 1", 50, true).await?;
    let err = room_service::create_room(
        &state,
        &admin(1),
        CreateRoomRequest {
            name: "Screen 1".into(),
            capacity: 80,
            kind: "imax".into(),
            open: None,
            accessible: None,
        },
    )
    .await
    .expect_err("room names are unique");
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn movies_validate_status_runtime_and_category() -> anyhow::Result<()> {
    let state = setup().await?;
    let category_id = create_category(&state, "Drama").await?;

    let err = movie_service::create_movie(
        &state,
        &admin(1),
        CreateMovieRequest {
            status: "running".into(),
            ..movie_request("The Long Night", category_id)
        },
    )
    .await
    .expect_err("unknown statuses are rejected");
    assert!(matches!(err, AppError::Validation(_)));

    let err = movie_service::create_movie(
        &state,
        &admin(1),
        CreateMovieRequest {
            duration_minutes: 0,
            ..movie_request("The Long Night", category_id)
        },
    )
    .await
    .expect_err("a movie needs a positive runtime");
    assert!(matches!(err, AppError::Validation(_)));

    let err = movie_service::create_movie(&state, &admin(1), movie_request("The Long Night", 999))
        .await
        .expect_err("the category must exist");
    assert!(matches!(err, AppError::NotFound));

    // The same guards hold on update.
    let movie_id = create_movie(&state, category_id, "The Long Night", 120).await?;
    let err = movie_service::update_movie(
        &state,
        &admin(1),
        movie_id,
        UpdateMovieRequest {
            title: None,
            description: None,
            author: None,
            release_date: None,
            duration_minutes: None,
            status: Some("running".into()),
            category_id: None,
        },
    )
    .await
    .expect_err("unknown statuses are rejected on update too");
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn catalog_writes_are_admin_only() -> anyhow::Result<()> {
    let state = setup().await?;
    let user_id = create_user(&state, "ada@example.com", 0).await?;

    let err = category_service::create_category(
        &state,
        &staff(1),
        CreateCategoryRequest {
            name: "Drama".into(),
        },
    )
    .await
    .expect_err("staff do not edit the catalog");
    assert!(matches!(err, AppError::Forbidden));

    let err = movie_service::create_movie(&state, &customer(user_id), movie_request("X", 1))
        .await
        .expect_err("customers do not edit the catalog");
    assert!(matches!(err, AppError::Forbidden));

    let err = room_service::update_room(
        &state,
        &staff(1),
        1,
        UpdateRoomRequest {
            name: None,
            capacity: None,
            kind: None,
            open: Some(false),
            accessible: None,
        },
    )
    .await
    .expect_err("staff do not edit rooms");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn movie_listings_filter_by_category_and_status() -> anyhow::Result<()> {
    let state = setup().await?;
    let drama = create_category(&state, "Drama").await?;
    let horror = create_category(&state, "Horror").await?;
    create_movie(&state, drama, "The Long Night", 120).await?;
    create_movie(&state, horror, "Cellar Door", 95).await?;

    let everything = movie_service::list_movies(
        &state,
        MovieQuery {
            page: None,
            per_page: None,
            q: None,
            category_id: None,
            status: None,
            sort_by: None,
            sort_order: None,
        },
    )
    .await?;
    assert_eq!(everything.data.unwrap().items.len(), 2);

    let dramas = movie_service::list_movies(
        &state,
        MovieQuery {
            page: None,
            per_page: None,
            q: None,
            category_id: Some(drama),
            status: None,
            sort_by: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(dramas.items.len(), 1);
    assert_eq!(dramas.items[0].title, "The Long Night");

    let by_title = movie_service::list_movies(
        &state,
        MovieQuery {
            page: None,
            per_page: None,
            q: Some("Cellar".into()),
            category_id: None,
            status: None,
            sort_by: None,
            sort_order: None,
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(by_title.items.len(), 1);
    assert_eq!(by_title.items[0].title, "Cellar Door");

    Ok(())
}
