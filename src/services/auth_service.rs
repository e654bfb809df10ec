use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::{
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::{
        employees, employees::Column as EmployeeCol, users, users::Column as UserCol, Employees,
        Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{Principal, PrincipalKind},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn issue_token(id: i32, role: &str, kind: &str) -> AppResult<(String, String)> {
    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(24))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let jti = Uuid::new_v4().to_string();
    let claims = Claims {
        sub: id.to_string(),
        role: role.to_string(),
        kind: kind.to_string(),
        jti: jti.clone(),
        exp: expiration.timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?;

    Ok((token, jti))
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let exists = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::conflict("email is already taken"));
    }

    let password_hash = hash_password(&payload.password)?;

    let user = users::ActiveModel {
        id: NotSet,
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
        email: Set(payload.email),
        password_hash: Set(password_hash),
        money: Set(0),
        role: Set("user".to_string()),
        current_token: Set(None),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(ApiResponse::success("User created", user.into(), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let user = Users::find()
        .filter(UserCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::validation("Invalid email or password"))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::validation("Invalid email or password"));
    }

    let (token, jti) = issue_token(user.id, &user.role, "user")?;

    let mut active: users::ActiveModel = user.into();
    active.current_token = Set(Some(jti));
    active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
        },
        Some(Meta::empty()),
    ))
}

pub async fn login_employee(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let employee = Employees::find()
        .filter(EmployeeCol::Email.eq(payload.email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::validation("Invalid email or password"))?;

    if !verify_password(&payload.password, &employee.password_hash)? {
        return Err(AppError::validation("Invalid email or password"));
    }

    let (token, jti) = issue_token(employee.id, &employee.role, "employee")?;

    let mut active: employees::ActiveModel = employee.into();
    active.current_token = Set(Some(jti));
    active.update(&state.orm).await?;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token: format!("Bearer {}", token),
        },
        Some(Meta::empty()),
    ))
}

/// Drop the stored token id for the calling principal.
pub async fn logout(state: &AppState, principal: &Principal) -> AppResult<ApiResponse<()>> {
    match principal.kind {
        PrincipalKind::User => {
            let user = Users::find_by_id(principal.id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
            let mut active: users::ActiveModel = user.into();
            active.current_token = Set(None);
            active.update(&state.orm).await?;
        }
        PrincipalKind::Employee => {
            let employee = Employees::find_by_id(principal.id)
                .one(&state.orm)
                .await?
                .ok_or(AppError::NotFound)?;
            let mut active: employees::ActiveModel = employee.into();
            active.current_token = Set(None);
            active.update(&state.orm).await?;
        }
    }

    Ok(ApiResponse::success("Logged out", (), Some(Meta::empty())))
}
