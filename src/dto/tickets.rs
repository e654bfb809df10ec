use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Ticket;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTicketRequest {
    pub screening_id: i32,
    pub seat: i32,
    pub price: i64,
}

/// Box-office staff may buy on behalf of a customer by passing `user_id`;
/// customers buy for themselves and leave it unset.
#[derive(Debug, Deserialize, Default, ToSchema)]
pub struct BuyTicketRequest {
    pub user_id: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TicketList {
    pub items: Vec<Ticket>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RefundSummary {
    pub refunded: u64,
}
