//! # Heads-up Poker
//!
//! Client-side model of a two-player Texas Hold'em table.
//!
//! The server is authoritative. This crate decodes its event stream, keeps a
//! consistent local view of the table, works out which actions are legal
//! and for how much, and encodes the user's choice back for the wire.
//!
//! ## Core Modules
//!
//! - [`game`]: Table entities, action choices, turn timer, and the reducer
//! - [`net`]: JSON message envelope in both directions
//!
//! ## Example
//!
//! ```
//! use hu_poker::{InboundEvent, PlayerId, Table};
//!
//! let mut table = Table::new(PlayerId::new("B"), 30);
//! let event = InboundEvent::parse(
//!     r#"{"event": {"HandStart": {"players": ["A", "B"], "stacks": [1000, 1000]}}}"#,
//! )
//! .unwrap();
//! table.apply(&event).unwrap();
//! assert_eq!(table.state().my_seat, Some(1));
//! ```

/// Wire messages exchanged with the server.
pub mod net;
pub use net::messages::{self, InboundEvent, OutboundMessage, parse_amount};

/// Table state, action rules, and event handling.
pub mod game;
pub use game::{
    ActionChoices, Applied, ClientError, Table, TimerChange,
    constants,
    entities::{self, Action, BettingRound, Card, CardSlot, PlayerId, TableState, Usd},
};
