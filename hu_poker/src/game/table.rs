//! The client's single live table: state plus turn timer.

use super::{
    choices::ActionChoices,
    entities::{Action, PlayerId, TableState},
    errors::ClientError,
    reducer::{Transition, reduce},
    timer::{Epoch, TimerCommand, TimerUpdate, TurnTimer},
};
use crate::net::messages::{InboundEvent, OutboundMessage};

/// What happened to the turn timer as a result of an event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimerChange {
    Started(Epoch),
    Canceled,
    Unchanged,
}

/// Summary of one successfully applied event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Applied {
    /// History lines this event added.
    pub log: Vec<String>,
    pub timer: TimerChange,
    pub fault: Option<ClientError>,
}

/// The one live table of a client. Owns the state, the turn timer, and
/// the id the server knows us by.
#[derive(Debug)]
pub struct Table {
    self_id: PlayerId,
    state: TableState,
    timer: TurnTimer,
}

impl Table {
    pub fn new(self_id: PlayerId, turn_ticks: u32) -> Self {
        Self {
            self_id,
            state: TableState::default(),
            timer: TurnTimer::new(turn_ticks),
        }
    }

    pub fn self_id(&self) -> &PlayerId {
        &self.self_id
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn timer(&self) -> &TurnTimer {
        &self.timer
    }

    /// Actions currently open to us.
    pub fn choices(&self) -> ActionChoices {
        ActionChoices::evaluate(&self.state)
    }

    /// Apply one server event.
    ///
    /// # Errors
    ///
    /// A dropped event returns its error and leaves both the state and the
    /// timer untouched.
    pub fn apply(&mut self, event: &InboundEvent) -> Result<Applied, ClientError> {
        let Transition {
            state,
            log,
            timer,
            fault,
        } = reduce(&self.state, &self.self_id, event).inspect_err(|error| {
            log::warn!("dropped {} event: {error}", event.tag());
        })?;

        self.state = state;
        let timer = match timer {
            TimerCommand::Start => TimerChange::Started(self.timer.start()),
            TimerCommand::Cancel if self.timer.cancel() => TimerChange::Canceled,
            TimerCommand::Cancel | TimerCommand::Keep => TimerChange::Unchanged,
        };
        if let Some(fault) = &fault {
            log::warn!("{fault}");
        }
        log::debug!("applied {event} (version {})", self.state.version);

        Ok(Applied { log, timer, fault })
    }

    /// Advance the turn timer. Ticks for stale countdowns are ignored.
    pub fn tick(&mut self, epoch: Epoch) -> Option<TimerUpdate> {
        let update = self.timer.tick(epoch)?;
        if update.expired {
            log::warn!("turn timer expired, leaving the default action to the server");
        }
        Some(update)
    }

    /// Validate a user's action and encode it for the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::IllegalAction`] or [`ClientError::InvalidAmount`]
    /// if the action isn't allowed right now. Nothing should be sent then.
    pub fn prepare(&self, action: Action) -> Result<OutboundMessage, ClientError> {
        self.choices().validate(&action)?;
        Ok(OutboundMessage::encode(action))
    }
}
