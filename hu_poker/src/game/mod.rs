//! Client-side table model.
//!
//! This module provides everything needed to follow a heads-up hand from
//! the server's event stream:
//! - Card codec and table entities
//! - Action validity and bet bounds
//! - Turn countdown
//! - The event reducer and the [`Table`] that owns its state

pub mod choices;
pub mod constants;
pub mod entities;
pub mod errors;
pub mod reducer;
pub mod table;
pub mod timer;

pub use choices::ActionChoices;
pub use errors::{AmountError, ClientError};
pub use reducer::{Transition, reduce};
pub use table::{Applied, Table, TimerChange};
pub use timer::{Epoch, TimerCommand, TimerState, TimerUpdate, TurnTimer};
