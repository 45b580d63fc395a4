//! Error types for table events and player actions.

use thiserror::Error;

use super::entities::{Action, PlayerId, Usd};

/// Reasons a bet or raise amount is rejected before it reaches the server.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum AmountError {
    #[error("'{0}' is not a whole number of chips")]
    NotWhole(String),
    #[error("'{0}' is negative")]
    Negative(String),
    #[error("'{0}' is more chips than any table holds")]
    TooLarge(String),
    #[error("{amount} is outside the legal range {min}..={max}")]
    OutOfRange { amount: Usd, min: Usd, max: Usd },
}

/// Errors raised while applying server events or validating user actions.
///
/// None of these are fatal to the client. Event errors drop the event and
/// keep the prior table state; action errors reject the action before
/// anything is sent.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ClientError {
    #[error("malformed {event} event: {reason}")]
    MalformedEvent { event: String, reason: String },
    #[error("invalid card index {0}")]
    InvalidCard(i64),
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
    #[error("{0} isn't seated in this hand")]
    SeatNotFound(PlayerId),
    #[error("can't {action} right now")]
    IllegalAction { action: Action },
}

impl ClientError {
    pub fn malformed(event: &str, reason: impl ToString) -> Self {
        Self::MalformedEvent {
            event: event.to_string(),
            reason: reason.to_string(),
        }
    }
}
