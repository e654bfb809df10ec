use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};

use crate::{dto::auth::Claims, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrincipalKind {
    User,
    Employee,
}

/// Authenticated caller, either a customer account or an employee account.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: i32,
    pub role: String,
    pub kind: PrincipalKind,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    pub fn is_staff(&self) -> bool {
        self.role == "staff" || self.role == "admin"
    }
}

pub fn ensure_admin(principal: &Principal) -> Result<(), AppError> {
    if !principal.is_admin() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_staff(principal: &Principal) -> Result<(), AppError> {
    if !principal.is_staff() {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// Resolves which user account a purchase lands on. Customers always buy for
/// themselves; an explicit `user_id` is a box-office operation reserved for
/// staff.
pub fn resolve_buyer(principal: &Principal, explicit: Option<i32>) -> Result<i32, AppError> {
    match explicit {
        Some(user_id) => {
            ensure_staff(principal)?;
            Ok(user_id)
        }
        None if principal.kind == PrincipalKind::User => Ok(principal.id),
        None => Err(AppError::validation(
            "user_id is required when an employee buys for a customer",
        )),
    }
}

impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = AppError;
    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::validation("Missing Authorization header"))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::validation("Invalid Authorization header"))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::validation("Invalid Authorization scheme"));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();

        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal(anyhow::anyhow!("JWT_SECRET is not set")))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::validation("Invalid or expired token"))?;

        let id = decoded
            .claims
            .sub
            .parse::<i32>()
            .map_err(|_| AppError::validation("Invalid principal id in token"))?;

        let kind = match decoded.claims.kind.as_str() {
            "user" => PrincipalKind::User,
            "employee" => PrincipalKind::Employee,
            _ => return Err(AppError::validation("Invalid principal kind in token")),
        };

        Ok(Principal {
            id,
            role: decoded.claims.role.clone(),
            kind,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: &str) -> Principal {
        Principal {
            id: 1,
            role: role.to_string(),
            kind: PrincipalKind::Employee,
        }
    }

    #[test]
    fn admin_passes_both_guards() {
        let p = principal("admin");
        assert!(ensure_admin(&p).is_ok());
        assert!(ensure_staff(&p).is_ok());
    }

    #[test]
    fn staff_is_not_admin() {
        let p = principal("staff");
        assert!(matches!(ensure_admin(&p), Err(AppError::Forbidden)));
        assert!(ensure_staff(&p).is_ok());
    }

    #[test]
    fn customer_role_is_rejected_by_guards() {
        let p = principal("user");
        assert!(matches!(ensure_admin(&p), Err(AppError::Forbidden)));
        assert!(matches!(ensure_staff(&p), Err(AppError::Forbidden)));
    }

    #[test]
    fn customer_buys_for_themselves() {
        let p = Principal {
            id: 7,
            role: "user".to_string(),
            kind: PrincipalKind::User,
        };
        assert_eq!(resolve_buyer(&p, None).unwrap(), 7);
        assert!(matches!(
            resolve_buyer(&p, Some(9)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn staff_must_name_the_customer() {
        let p = principal("staff");
        assert_eq!(resolve_buyer(&p, Some(9)).unwrap(), 9);
        assert!(matches!(
            resolve_buyer(&p, None),
            Err(AppError::Validation(_))
        ));
    }
}
