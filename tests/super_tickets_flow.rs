mod common;

use cinema_booking_api::{
    dto::{
        super_tickets::{
            BookSeatRequest, BuySuperTicketRequest, CreateSuperTicketRequest,
            UpdateSuperTicketRequest,
        },
        tickets::BuyTicketRequest,
    },
    entity::{SuperTicketSessions, SuperTickets},
    error::AppError,
    services::{screening_service, super_ticket_service, ticket_service},
};
use sea_orm::{EntityTrait, PaginatorTrait};

use common::{
    admin, at, create_super_ticket, create_ticket, create_user, customer, seed_cinema, setup,
    staff, user_money,
};

async fn pass_uses(state: &cinema_booking_api::state::AppState, id: i32) -> anyhow::Result<i32> {
    let pass = SuperTickets::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("super ticket {id} not found"))?;
    Ok(pass.uses)
}

// Buy the pass, spend a use on a seat, hand the seat back.
#[tokio::test]
async fn buy_book_and_cancel_roundtrip() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 30).await?;
    let user_id = create_user(&state, "ada@example.com", 1000).await?;
    let pass_id = create_super_ticket(&state, 400, 10, None).await?;

    let bought = super_ticket_service::buy_super_ticket(
        &state,
        &customer(user_id),
        pass_id,
        BuySuperTicketRequest::default(),
    )
    .await?;
    assert_eq!(bought.data.unwrap().owner_id, Some(user_id));
    assert_eq!(user_money(&state, user_id).await?, 600);

    let seat = BookSeatRequest {
        screening_id,
        seat: 5,
    };
    let booked =
        super_ticket_service::book_seat(&state, &customer(user_id), pass_id, seat).await?;
    assert_eq!(booked.data.unwrap().uses, 9);
    assert_eq!(SuperTicketSessions::find().count(&state.orm).await?, 1);

    let cancelled = super_ticket_service::cancel_booking(
        &state,
        &customer(user_id),
        pass_id,
        BookSeatRequest {
            screening_id,
            seat: 5,
        },
    )
    .await?;
    assert_eq!(cancelled.data.unwrap().uses, 10);
    assert_eq!(SuperTicketSessions::find().count(&state.orm).await?, 0);

    // Nothing left to cancel for that seat.
    let err = super_ticket_service::cancel_booking(
        &state,
        &customer(user_id),
        pass_id,
        BookSeatRequest {
            screening_id,
            seat: 5,
        },
    )
    .await
    .expect_err("cancelling a booking that was never made must fail");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn a_pass_sells_only_once() -> anyhow::Result<()> {
    let state = setup().await?;
    let first = create_user(&state, "ada@example.com", 500).await?;
    let second = create_user(&state, "ben@example.com", 500).await?;
    let pass_id = create_super_ticket(&state, 100, 10, None).await?;

    super_ticket_service::buy_super_ticket(
        &state,
        &customer(first),
        pass_id,
        BuySuperTicketRequest::default(),
    )
    .await?;

    let err = super_ticket_service::buy_super_ticket(
        &state,
        &customer(second),
        pass_id,
        BuySuperTicketRequest::default(),
    )
    .await
    .expect_err("an owned pass must not sell again");
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(user_money(&state, second).await?, 500);

    Ok(())
}

#[tokio::test]
async fn booking_with_an_exhausted_pass_is_rejected() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 30).await?;
    let user_id = create_user(&state, "ada@example.com", 100).await?;
    let pass_id = create_super_ticket(&state, 0, 0, Some(user_id)).await?;

    let err = super_ticket_service::book_seat(
        &state,
        &customer(user_id),
        pass_id,
        BookSeatRequest {
            screening_id,
            seat: 1,
        },
    )
    .await
    .expect_err("an exhausted pass must not book");
    assert!(matches!(err, AppError::NoUsesRemaining));
    assert_eq!(SuperTicketSessions::find().count(&state.orm).await?, 0);

    Ok(())
}

#[tokio::test]
async fn bookings_are_owner_only() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 30).await?;
    let owner = create_user(&state, "ada@example.com", 100).await?;
    let stranger = create_user(&state, "ben@example.com", 100).await?;
    let pass_id = create_super_ticket(&state, 0, 10, Some(owner)).await?;

    let seat = BookSeatRequest {
        screening_id,
        seat: 1,
    };
    let err = super_ticket_service::book_seat(&state, &customer(stranger), pass_id, seat)
        .await
        .expect_err("only the holder books with their pass");
    assert!(matches!(err, AppError::Forbidden));

    // Staff do not hold the pass either.
    let err = super_ticket_service::book_seat(
        &state,
        &staff(1),
        pass_id,
        BookSeatRequest {
            screening_id,
            seat: 1,
        },
    )
    .await
    .expect_err("staff cannot spend a customer's uses");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn a_booked_seat_is_exclusive_across_passes() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 30).await?;
    let first = create_user(&state, "ada@example.com", 100).await?;
    let second = create_user(&state, "ben@example.com", 100).await?;
    let first_pass = create_super_ticket(&state, 0, 10, Some(first)).await?;
    let second_pass = create_super_ticket(&state, 0, 10, Some(second)).await?;

    super_ticket_service::book_seat(
        &state,
        &customer(first),
        first_pass,
        BookSeatRequest {
            screening_id,
            seat: 9,
        },
    )
    .await?;

    let err = super_ticket_service::book_seat(
        &state,
        &customer(second),
        second_pass,
        BookSeatRequest {
            screening_id,
            seat: 9,
        },
    )
    .await
    .expect_err("two passes must not hold one seat");
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(pass_uses(&state, second_pass).await?, 10);

    // The holder of the other pass cannot release the seat either: a booking
    // their pass never made reads as absent.
    let err = super_ticket_service::cancel_booking(
        &state,
        &customer(second),
        second_pass,
        BookSeatRequest {
            screening_id,
            seat: 9,
        },
    )
    .await
    .expect_err("a foreign booking must stay");
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(pass_uses(&state, first_pass).await?, 9);
    assert_eq!(pass_uses(&state, second_pass).await?, 10);

    Ok(())
}

// The other direction of the cross-ledger check: a sold ticket blocks the
// pass booking for that seat.
#[tokio::test]
async fn a_sold_seat_blocks_the_pass_booking() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 20).await?;
    let ticket_id = create_ticket(&state, screening_id, 3, 20).await?;
    let buyer = create_user(&state, "ada@example.com", 100).await?;
    let pass_owner = create_user(&state, "ben@example.com", 100).await?;
    let pass_id = create_super_ticket(&state, 0, 10, Some(pass_owner)).await?;

    ticket_service::buy_ticket(&state, &customer(buyer), ticket_id, BuyTicketRequest::default())
        .await?;

    let err = super_ticket_service::book_seat(
        &state,
        &customer(pass_owner),
        pass_id,
        BookSeatRequest {
            screening_id,
            seat: 3,
        },
    )
    .await
    .expect_err("a sold seat must not be booked");
    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(pass_uses(&state, pass_id).await?, 10);

    Ok(())
}

#[tokio::test]
async fn deleting_a_screening_returns_uses_to_passes() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 30).await?;
    let user_id = create_user(&state, "ada@example.com", 100).await?;
    let pass_id = create_super_ticket(&state, 0, 10, Some(user_id)).await?;

    super_ticket_service::book_seat(
        &state,
        &customer(user_id),
        pass_id,
        BookSeatRequest {
            screening_id,
            seat: 2,
        },
    )
    .await?;
    assert_eq!(pass_uses(&state, pass_id).await?, 9);

    screening_service::delete_screening(&state, &staff(1), screening_id).await?;

    assert_eq!(pass_uses(&state, pass_id).await?, 10);
    assert_eq!(SuperTicketSessions::find().count(&state.orm).await?, 0);

    Ok(())
}

// A use goes back exactly once per booking: one handed back by the holder,
// the other by the teardown.
#[tokio::test]
async fn teardown_returns_each_use_exactly_once() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 30).await?;
    let user_id = create_user(&state, "ada@example.com", 100).await?;
    let pass_id = create_super_ticket(&state, 0, 10, Some(user_id)).await?;

    for seat in [4, 5] {
        super_ticket_service::book_seat(
            &state,
            &customer(user_id),
            pass_id,
            BookSeatRequest { screening_id, seat },
        )
        .await?;
    }
    assert_eq!(pass_uses(&state, pass_id).await?, 8);

    super_ticket_service::cancel_booking(
        &state,
        &customer(user_id),
        pass_id,
        BookSeatRequest {
            screening_id,
            seat: 4,
        },
    )
    .await?;
    assert_eq!(pass_uses(&state, pass_id).await?, 9);

    screening_service::delete_screening(&state, &staff(1), screening_id).await?;

    // Only the booking still live at teardown hands its use back; the pass
    // lands exactly on its cap.
    assert_eq!(pass_uses(&state, pass_id).await?, 10);
    assert_eq!(SuperTicketSessions::find().count(&state.orm).await?, 0);

    Ok(())
}

#[tokio::test]
async fn admin_override_rewrites_the_pass() -> anyhow::Result<()> {
    let state = setup().await?;
    let user_id = create_user(&state, "ada@example.com", 100).await?;
    let pass_id = create_super_ticket(&state, 100, 10, Some(user_id)).await?;

    let err = super_ticket_service::update_super_ticket(
        &state,
        &staff(1),
        pass_id,
        UpdateSuperTicketRequest::default(),
    )
    .await
    .expect_err("raw overrides are for admins");
    assert!(matches!(err, AppError::Forbidden));

    let updated = super_ticket_service::update_super_ticket(
        &state,
        &admin(1),
        pass_id,
        UpdateSuperTicketRequest {
            price: Some(250),
            uses: Some(3),
            owner_id: Some(None),
        },
    )
    .await?;
    let pass = updated.data.unwrap();
    assert_eq!(pass.price, 250);
    assert_eq!(pass.uses, 3);
    assert_eq!(pass.owner_id, None);

    let err = super_ticket_service::update_super_ticket(
        &state,
        &admin(1),
        pass_id,
        UpdateSuperTicketRequest {
            price: None,
            uses: Some(-1),
            owner_id: None,
        },
    )
    .await
    .expect_err("negative uses make no sense even for admins");
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn deleting_a_pass_drops_its_bookings() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        common::create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 30).await?;
    let user_id = create_user(&state, "ada@example.com", 100).await?;
    let pass_id = create_super_ticket(&state, 0, 10, Some(user_id)).await?;

    for seat in [1, 2] {
        super_ticket_service::book_seat(
            &state,
            &customer(user_id),
            pass_id,
            BookSeatRequest { screening_id, seat },
        )
        .await?;
    }
    assert_eq!(SuperTicketSessions::find().count(&state.orm).await?, 2);

    super_ticket_service::delete_super_ticket(&state, &staff(1), pass_id).await?;

    assert!(SuperTickets::find_by_id(pass_id).one(&state.orm).await?.is_none());
    assert_eq!(SuperTicketSessions::find().count(&state.orm).await?, 0);

    Ok(())
}

#[tokio::test]
async fn staff_mint_passes_with_sane_numbers() -> anyhow::Result<()> {
    let state = setup().await?;

    let err = super_ticket_service::create_super_ticket(
        &state,
        &staff(1),
        CreateSuperTicketRequest {
            price: -1,
            uses: 10,
        },
    )
    .await
    .expect_err("negative price must be rejected");
    assert!(matches!(err, AppError::Validation(_)));

    let created = super_ticket_service::create_super_ticket(
        &state,
        &staff(1),
        CreateSuperTicketRequest {
            price: 400,
            uses: 10,
        },
    )
    .await?;
    let pass = created.data.unwrap();
    assert_eq!(pass.uses, 10);
    assert_eq!(pass.owner_id, None);

    Ok(())
}
