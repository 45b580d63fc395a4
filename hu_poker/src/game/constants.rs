//! Fixed table dimensions and client defaults.

use super::entities::Usd;

/// Heads-up only.
pub const NUM_SEATS: usize = 2;

/// Community cards on a full board.
pub const BOARD_SIZE: usize = 5;

/// Private cards dealt to each seat.
pub const HOLE_CARDS: usize = 2;

/// Number of concrete cards in the deck. Valid indices are `0..CARD_COUNT`.
pub const CARD_COUNT: u8 = 52;

/// Wire index the server uses for a card the client can't see.
pub const FACE_DOWN_INDEX: u8 = CARD_COUNT;

/// Ticks a player has to act once the server requests an action.
pub const DEFAULT_TURN_TICKS: u32 = 30;

/// Remaining-tick marks at which the turn timer raises a warning.
pub const TURN_WARNINGS: [u32; 8] = [1, 2, 3, 4, 5, 10, 20, 30];

pub const DEFAULT_BIG_BLIND: Usd = 10;
pub const DEFAULT_SMALL_BLIND: Usd = DEFAULT_BIG_BLIND / 2;
