mod common;

use cinema_booking_api::{
    dto::auth::{LoginRequest, RegisterRequest},
    dto::tickets::BuyTicketRequest,
    entity::{employees, users, working_shifts},
    error::AppError,
    routes::employees::{CreateEmployeeRequest, UpdateEmployeeRequest},
    routes::params::ListQuery,
    routes::shifts::CreateShiftRequest,
    routes::users::AmountRequest,
    services::{
        auth_service, employee_service, shift_service, super_ticket_service, ticket_service,
        user_service,
    },
};
use sea_orm::{EntityTrait, PaginatorTrait};

use common::{
    admin, at, create_screening, create_super_ticket, create_ticket, create_user, customer,
    seed_cinema, setup, staff, user_money,
};

fn all_pages() -> ListQuery {
    ListQuery {
        page: None,
        per_page: None,
    }
}

fn set_jwt_secret() {
    // SAFETY: every test writes the same value and only reads it afterwards.
    unsafe { std::env::set_var("JWT_SECRET", "test-secret") };
}

#[tokio::test]
async fn register_login_logout_roundtrip() -> anyhow::Result<()> {
    set_jwt_secret();
    let state = setup().await?;

    let registered = auth_service::register_user(
        &state,
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Marsh".into(),
            email: "ada@example.com".into(),
            password: "hunter2!".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(registered.role, "user");
    assert_eq!(registered.money, 0);

    let err = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "wrong".into(),
        },
    )
    .await
    .expect_err("a wrong password must not log in");
    assert!(matches!(err, AppError::Validation(_)));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "hunter2!".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(login.token.starts_with("Bearer "));

    let row = users::Entity::find_by_id(registered.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert!(row.current_token.is_some());

    auth_service::logout(&state, &customer(registered.id)).await?;
    let row = users::Entity::find_by_id(registered.id)
        .one(&state.orm)
        .await?
        .unwrap();
    assert!(row.current_token.is_none());

    Ok(())
}

#[tokio::test]
async fn an_email_registers_only_once() -> anyhow::Result<()> {
    let state = setup().await?;

    let request = || RegisterRequest {
        first_name: "Ada".into(),
        last_name: "Marsh".into(),
        email: "ada@example.com".into(),
        password: "hunter2!".into(),
    };
    auth_service::register_user(&state, request()).await?;

    let err = auth_service::register_user(&state, request())
        .await
        .expect_err("the email is taken");
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

#[tokio::test]
async fn employees_log_in_through_their_own_door() -> anyhow::Result<()> {
    set_jwt_secret();
    let state = setup().await?;

    employee_service::create_employee(
        &state,
        &admin(1),
        CreateEmployeeRequest {
            first_name: "Ben".into(),
            last_name: "Okafor".into(),
            phone: "555-0101".into(),
            email: "ben@example.com".into(),
            password: "letmein!".into(),
            role: "staff".into(),
        },
    )
    .await?;

    let login = auth_service::login_employee(
        &state,
        LoginRequest {
            email: "ben@example.com".into(),
            password: "letmein!".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(login.token.starts_with("Bearer "));

    // A customer email is invisible to the employee login.
    auth_service::register_user(
        &state,
        RegisterRequest {
            first_name: "Ada".into(),
            last_name: "Marsh".into(),
            email: "ada@example.com".into(),
            password: "hunter2!".into(),
        },
    )
    .await?;
    let err = auth_service::login_employee(
        &state,
        LoginRequest {
            email: "ada@example.com".into(),
            password: "hunter2!".into(),
        },
    )
    .await
    .expect_err("customers are not employees");
    assert!(matches!(err, AppError::Validation(_)));

    Ok(())
}

#[tokio::test]
async fn deposits_and_withdrawals_move_real_money() -> anyhow::Result<()> {
    let state = setup().await?;
    let user_id = create_user(&state, "ada@example.com", 0).await?;

    let balance = user_service::deposit(
        &state,
        &customer(user_id),
        user_id,
        AmountRequest { amount: 100 },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(balance.money, 100);

    // Only the account holder or an admin may top up.
    let stranger = create_user(&state, "eve@example.com", 0).await?;
    let err = user_service::deposit(
        &state,
        &customer(stranger),
        user_id,
        AmountRequest { amount: 100 },
    )
    .await
    .expect_err("strangers must not touch the balance");
    assert!(matches!(err, AppError::Forbidden));

    let err = user_service::deposit(
        &state,
        &customer(user_id),
        user_id,
        AmountRequest { amount: -5 },
    )
    .await
    .expect_err("negative amounts are rejected");
    assert!(matches!(err, AppError::Validation(_)));

    let balance = user_service::withdraw(&state, &admin(1), user_id, AmountRequest { amount: 30 })
        .await?
        .data
        .unwrap();
    assert_eq!(balance.money, 70);

    let err = user_service::withdraw(&state, &admin(1), user_id, AmountRequest { amount: 100 })
        .await
        .expect_err("the account holds only 70");
    assert!(matches!(err, AppError::InsufficientFunds));
    assert_eq!(user_money(&state, user_id).await?, 70);

    // Withdrawing nothing succeeds and changes nothing.
    let balance = user_service::withdraw(&state, &admin(1), user_id, AmountRequest { amount: 0 })
        .await?
        .data
        .unwrap();
    assert_eq!(balance.money, 70);

    // Withdrawals are an admin tool, even on one's own account.
    let err = user_service::withdraw(
        &state,
        &customer(user_id),
        user_id,
        AmountRequest { amount: 10 },
    )
    .await
    .expect_err("customers cannot withdraw");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn profiles_resolve_by_principal_kind() -> anyhow::Result<()> {
    let state = setup().await?;
    let user_id = create_user(&state, "ada@example.com", 25).await?;
    let employee_id = common::create_employee(&state, "ben@example.com", "staff").await?;

    let profile = user_service::me(&state, &customer(user_id)).await?.data.unwrap();
    assert_eq!(profile.email, "ada@example.com");
    assert_eq!(profile.money, 25);

    let err = user_service::me(&state, &staff(employee_id))
        .await
        .expect_err("employees have no customer profile");
    assert!(matches!(err, AppError::Forbidden));

    let profile = employee_service::me(&state, &staff(employee_id))
        .await?
        .data
        .unwrap();
    assert_eq!(profile.email, "ben@example.com");

    let err = employee_service::me(&state, &customer(user_id))
        .await
        .expect_err("customers have no employee profile");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn accounts_with_live_claims_cannot_be_deleted() -> anyhow::Result<()> {
    let state = setup().await?;
    let (movie_id, room_id) = seed_cinema(&state, 120, 50).await?;
    let screening_id =
        create_screening(&state, movie_id, room_id, at(14, 0), at(16, 0), 10).await?;
    let ticket_id = create_ticket(&state, screening_id, 1, 10).await?;
    let user_id = create_user(&state, "ada@example.com", 10).await?;

    ticket_service::buy_ticket(
        &state,
        &customer(user_id),
        ticket_id,
        BuyTicketRequest::default(),
    )
    .await?;

    let err = user_service::delete_user(&state, &admin(1), user_id)
        .await
        .expect_err("the user still holds a ticket");
    assert!(matches!(err, AppError::Conflict(_)));

    ticket_service::refund_ticket(&state, &customer(user_id), ticket_id).await?;

    // A pass blocks deletion the same way a ticket does.
    let pass_id = create_super_ticket(&state, 400, 10, Some(user_id)).await?;
    let err = user_service::delete_user(&state, &admin(1), user_id)
        .await
        .expect_err("the user still holds a pass");
    assert!(matches!(err, AppError::Conflict(_)));

    super_ticket_service::delete_super_ticket(&state, &staff(1), pass_id).await?;

    user_service::delete_user(&state, &admin(1), user_id).await?;
    let err = user_service::get_user(&state, &admin(1), user_id)
        .await
        .expect_err("the account is gone");
    assert!(matches!(err, AppError::NotFound));

    Ok(())
}

#[tokio::test]
async fn user_listings_are_an_admin_view() -> anyhow::Result<()> {
    let state = setup().await?;
    let user_id = create_user(&state, "ada@example.com", 0).await?;
    create_user(&state, "eve@example.com", 0).await?;

    let err = user_service::list_users(&state, &staff(1), all_pages())
        .await
        .expect_err("staff do not browse accounts");
    assert!(matches!(err, AppError::Forbidden));

    let listing = user_service::list_users(&state, &admin(1), all_pages()).await?;
    assert_eq!(listing.data.unwrap().items.len(), 2);
    assert_eq!(listing.meta.unwrap().total, Some(2));

    let err = user_service::get_user(&state, &customer(user_id), user_id)
        .await
        .expect_err("account lookup is admin-only");
    assert!(matches!(err, AppError::Forbidden));

    Ok(())
}

#[tokio::test]
async fn employee_management_is_admin_work() -> anyhow::Result<()> {
    let state = setup().await?;

    let request = || CreateEmployeeRequest {
        first_name: "Ben".into(),
        last_name: "Okafor".into(),
        phone: "555-0101".into(),
        email: "ben@example.com".into(),
        password: "letmein!".into(),
        role: "staff".into(),
    };

    let err = employee_service::create_employee(&state, &staff(1), request())
        .await
        .expect_err("staff cannot hire");
    assert!(matches!(err, AppError::Forbidden));

    let err = employee_service::create_employee(
        &state,
        &admin(1),
        CreateEmployeeRequest {
            role: "janitor".into(),
            ..request()
        },
    )
    .await
    .expect_err("unknown roles are rejected");
    assert!(matches!(err, AppError::Validation(_)));

    let created = employee_service::create_employee(&state, &admin(1), request())
        .await?
        .data
        .unwrap();

    let err = employee_service::create_employee(&state, &admin(1), request())
        .await
        .expect_err("the email is taken");
    assert!(matches!(err, AppError::Conflict(_)));

    let updated = employee_service::update_employee(
        &state,
        &admin(1),
        created.id,
        UpdateEmployeeRequest {
            first_name: None,
            last_name: None,
            phone: Some("555-0199".into()),
            email: None,
            password: None,
            role: Some("admin".into()),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(updated.phone, "555-0199");
    assert_eq!(updated.role, "admin");

    Ok(())
}

#[tokio::test]
async fn firing_an_employee_clears_their_rota() -> anyhow::Result<()> {
    let state = setup().await?;
    let employee_id = common::create_employee(&state, "ben@example.com", "staff").await?;

    shift_service::create_shift(
        &state,
        &admin(1),
        CreateShiftRequest {
            employee_id,
            position: "reception".into(),
            start_time: at(9, 0),
            end_time: at(17, 0),
        },
    )
    .await?;

    employee_service::delete_employee(&state, &admin(1), employee_id).await?;

    assert_eq!(
        working_shifts::Entity::find().count(&state.orm).await?,
        0,
        "the shift must go with the employee"
    );
    assert!(
        employees::Entity::find_by_id(employee_id)
            .one(&state.orm)
            .await?
            .is_none()
    );

    Ok(())
}
