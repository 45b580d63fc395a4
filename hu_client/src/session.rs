//! The client's single event loop.
//!
//! Server messages, user input, and countdown ticks all arrive as
//! [`SessionInput`] on one queue and are handled strictly in order. The
//! [`Table`] is only ever touched from [`Session::handle`].

use hu_poker::{
    Action, ClientError, InboundEvent, OutboundMessage, Table, TimerChange, game::Epoch,
};
use std::time::Duration;
use tokio::{
    sync::mpsc::{UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
    time::{Instant, interval_at},
};

use crate::{
    commands::{self, Command},
    display::{Presenter, Record, RecordKind},
    logging,
};

/// Everything the session reacts to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SessionInput {
    /// The connection is up.
    Opened,
    /// A text frame from the server.
    Server(String),
    /// A line typed by the user.
    User(String),
    /// A countdown tick. Only the running countdown's epoch has any effect.
    Tick(Epoch),
    /// The connection or the input went away.
    Closed(Option<String>),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Flow {
    Continue,
    Stop,
}

/// A task feeding ticks for one countdown into the session queue. Dropping
/// it stops the ticks.
#[derive(Debug)]
struct Countdown {
    handle: JoinHandle<()>,
}

impl Countdown {
    fn spawn(epoch: Epoch, period: Duration, inbox: UnboundedSender<SessionInput>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + period, period);
            loop {
                ticks.tick().await;
                if inbox.send(SessionInput::Tick(epoch)).is_err() {
                    break;
                }
            }
        });
        Self { handle }
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct Session<P: Presenter> {
    table: Table,
    presenter: P,
    /// Validated actions on their way to the server.
    outbound: UnboundedSender<OutboundMessage>,
    /// Handed to countdown tasks so their ticks join the queue.
    inbox: UnboundedSender<SessionInput>,
    tick_interval: Duration,
    countdown: Option<Countdown>,
}

impl<P: Presenter> Session<P> {
    pub fn new(
        table: Table,
        presenter: P,
        outbound: UnboundedSender<OutboundMessage>,
        inbox: UnboundedSender<SessionInput>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            table,
            presenter,
            outbound,
            inbox,
            tick_interval,
            countdown: None,
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Handle inputs until the connection closes or the user quits. Returns
    /// the presenter.
    pub async fn run(mut self, mut inputs: UnboundedReceiver<SessionInput>) -> P {
        tracing::info!(player = %self.table.self_id(), "Session starting");

        while let Some(input) = inputs.recv().await {
            if self.handle(input) == Flow::Stop {
                break;
            }
        }

        self.countdown = None;
        tracing::info!("Session closed");
        self.presenter
    }

    /// Handle one input. Never panics and never stops on a bad message.
    pub fn handle(&mut self, input: SessionInput) -> Flow {
        match input {
            SessionInput::Opened => {
                self.presenter
                    .record(Record::new(RecordKind::Ack, "Connected, waiting for the game"));
                Flow::Continue
            }
            SessionInput::Server(text) => {
                self.handle_server(&text);
                Flow::Continue
            }
            SessionInput::User(line) => self.handle_user(&line),
            SessionInput::Tick(epoch) => {
                self.handle_tick(epoch);
                Flow::Continue
            }
            SessionInput::Closed(reason) => {
                let reason = reason.unwrap_or_else(|| "Server closed connection".to_string());
                tracing::info!("Connection closed: {reason}");
                self.presenter.record(Record::new(RecordKind::Error, reason));
                Flow::Stop
            }
        }
    }

    fn handle_server(&mut self, text: &str) {
        let event = match InboundEvent::parse(text) {
            Ok(event) => event,
            Err(error) => return self.drop_event(text, &error),
        };
        let applied = match self.table.apply(&event) {
            Ok(applied) => applied,
            Err(error) => return self.drop_event(text, &error),
        };

        for line in applied.log {
            self.presenter.record(Record::new(RecordKind::Game, line));
        }
        if let Some(fault) = applied.fault {
            self.presenter.record(Record::new(RecordKind::Error, fault.to_string()));
        }

        match applied.timer {
            TimerChange::Started(epoch) => {
                // Replacing the old countdown aborts it.
                self.countdown = Some(Countdown::spawn(
                    epoch,
                    self.tick_interval,
                    self.inbox.clone(),
                ));
                let choices = self.table.choices();
                self.presenter.record(Record::new(
                    RecordKind::Alert,
                    format!("It's your turn! ({choices})"),
                ));
            }
            TimerChange::Canceled => self.countdown = None,
            TimerChange::Unchanged => {}
        }

        match event {
            InboundEvent::GameStart => {
                self.presenter.record(Record::new(RecordKind::Alert, "Game starting"));
            }
            InboundEvent::GameEnd => {
                self.presenter.record(Record::new(RecordKind::Alert, "Game over"));
            }
            InboundEvent::SendAction => {
                self.presenter.record(Record::new(RecordKind::Ack, "Action received"));
            }
            _ => {}
        }

        self.presenter
            .snapshot(self.table.state(), &self.table.choices());
    }

    fn handle_user(&mut self, line: &str) -> Flow {
        if line.trim().is_empty() {
            return Flow::Continue;
        }

        let action = match commands::parse_command(line) {
            Ok(Command::Quit) => {
                self.presenter.record(Record::new(RecordKind::Ack, "Disconnecting..."));
                return Flow::Stop;
            }
            Ok(Command::Help) => {
                self.presenter.record(Record::new(RecordKind::Ack, commands::HELP));
                return Flow::Continue;
            }
            Ok(Command::Act(action)) => action,
            Ok(Command::Sized(size)) => {
                match size.resolve(self.table.state(), &self.table.choices()) {
                    Some(action) => action,
                    None => {
                        self.reject(None, format!("can't bet or raise '{size}' right now"));
                        return Flow::Continue;
                    }
                }
            }
            Err(error) => {
                self.reject(None, error.to_string());
                return Flow::Continue;
            }
        };

        match self.table.prepare(action) {
            Ok(message) => {
                tracing::debug!(%message, "Sending action");
                if self.outbound.send(message).is_err() {
                    self.presenter
                        .record(Record::new(RecordKind::Error, "Connection is gone"));
                    return Flow::Stop;
                }
                self.presenter
                    .record(Record::new(RecordKind::You, action.to_string()));
            }
            Err(error) => self.reject(Some(action), error.to_string()),
        }
        Flow::Continue
    }

    fn handle_tick(&mut self, epoch: Epoch) {
        let Some(update) = self.table.tick(epoch) else {
            return;
        };
        self.presenter.timer(&update);
        if update.expired {
            self.countdown = None;
        }
    }

    fn drop_event(&mut self, text: &str, error: &ClientError) {
        logging::log_dropped_event(text, error);
        self.presenter.record(Record::new(
            RecordKind::Error,
            format!("Ignored server message: {error}"),
        ));
    }

    fn reject(&mut self, action: Option<Action>, reason: String) {
        logging::log_rejected_action(action.as_ref(), &reason);
        self.presenter.record(Record::new(RecordKind::Error, reason));
    }
}
