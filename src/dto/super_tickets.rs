use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::models::{SuperTicket, SuperTicketSession};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSuperTicketRequest {
    pub price: i64,
    pub uses: i32,
}

#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct BuySuperTicketRequest {
    pub user_id: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BookSeatRequest {
    pub screening_id: i32,
    pub seat: i32,
}

/// Administrative override: fields present in the payload are written as
/// given. `owner_id: null` clears the owner, an absent field leaves it alone.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct UpdateSuperTicketRequest {
    pub price: Option<i64>,
    pub uses: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub owner_id: Option<Option<i32>>,
}

// Distinguishes an absent field (outer None) from an explicit null
// (Some(None)), which plain Option<Option<T>> cannot.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemainingUses {
    pub uses: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuperTicketList {
    pub items: Vec<SuperTicket>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingList {
    pub items: Vec<SuperTicketSession>,
}
