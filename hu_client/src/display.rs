//! Console rendering of the table and the message log.

use chrono::{DateTime, Utc};
use hu_poker::{
    ActionChoices, CardSlot, TableState,
    game::TimerUpdate,
};
use std::{
    fmt,
    io::{self, Write},
};

/// Receives everything the user should see. The session calls it after
/// every input it handles; implementations never touch the table.
pub trait Presenter {
    /// The table after an event was applied, with the actions now open.
    fn snapshot(&mut self, state: &TableState, choices: &ActionChoices);

    /// One tick of the turn countdown.
    fn timer(&mut self, update: &TimerUpdate);

    /// A line for the message log.
    fn record(&mut self, record: Record);
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RecordKind {
    Ack,
    Alert,
    Error,
    Game,
    You,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Ack => "ACK",
            Self::Alert => "ALERT",
            Self::Error => "ERROR",
            Self::Game => "GAME",
            Self::You => "YOU",
        };
        // Pad so the log lines up.
        f.pad(repr)
    }
}

/// A timestamped message with an importance label to help direct user
/// attention.
#[derive(Clone, Debug)]
pub struct Record {
    pub datetime: DateTime<Utc>,
    pub kind: RecordKind,
    pub content: String,
}

impl Record {
    pub fn new(kind: RecordKind, content: impl Into<String>) -> Self {
        Self {
            datetime: Utc::now(),
            kind,
            content: content.into(),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} {:5}]: {}",
            self.datetime.format("%H:%M:%S"),
            self.kind,
            self.content
        )
    }
}

/// Plain-text presenter for a terminal or any other writer.
pub struct ConsolePresenter<W: Write> {
    out: W,
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}").and_then(|()| self.out.flush()) {
            tracing::debug!("Failed to write to console: {error}");
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn snapshot(&mut self, state: &TableState, choices: &ActionChoices) {
        let text = render_table(state, choices);
        self.emit(&text);
    }

    fn timer(&mut self, update: &TimerUpdate) {
        if update.expired {
            self.emit(&Record::new(RecordKind::Alert, "Out of time").to_string());
        } else if let Some(warning) = update.warning {
            let text = format!("{warning:>2} second(s) left");
            self.emit(&Record::new(RecordKind::Alert, text).to_string());
        }
    }

    fn record(&mut self, record: Record) {
        self.emit(&record.to_string());
    }
}

fn cards(slots: &[CardSlot]) -> String {
    slots
        .iter()
        .map(CardSlot::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the table as a block of text.
pub fn render_table(state: &TableState, choices: &ActionChoices) -> String {
    let mut lines = Vec::new();
    lines.push("═".repeat(60));
    lines.push(format!(
        "HEADS-UP TABLE  hand #{}  blinds {}  {}",
        state.hand_number, state.blinds, state.round
    ));
    lines.push(format!("Board: {}", cards(&state.board)));
    lines.push(format!("Pot: ${}", state.pot));
    lines.push("─".repeat(60));

    match state.my_seat {
        Some(seat) => {
            let opponent = 1 - seat;
            lines.push(format!(
                "  Hero    (seat {seat}) ${:<6} wager {:<6} {}",
                state.stacks[seat],
                state.wagers[seat],
                cards(&state.hero)
            ));
            lines.push(format!(
                "  Villain (seat {opponent}) ${:<6} wager {:<6} {}",
                state.stacks[opponent],
                state.wagers[opponent],
                cards(&state.villain)
            ));
        }
        None => lines.push("  Not seated".to_string()),
    }

    lines.push("─".repeat(60));
    lines.push(format!("Actions: {choices}"));
    lines.push("═".repeat(60));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seated() -> TableState {
        TableState {
            stacks: [985, 990],
            wagers: [15, 10],
            pot: 15,
            my_seat: Some(1),
            hero: [CardSlot::decode(48).unwrap(), CardSlot::decode(49).unwrap()],
            ..Default::default()
        }
    }

    #[test]
    fn test_record_kind_is_padded() {
        assert_eq!(format!("{:5}|", RecordKind::Ack), "ACK  |");
        assert_eq!(format!("{:5}|", RecordKind::Alert), "ALERT|");
    }

    #[test]
    fn test_record_display() {
        let record = Record::new(RecordKind::Game, "Hand Starting");
        let text = record.to_string();
        assert!(text.starts_with('['));
        assert!(text.ends_with("GAME ]: Hand Starting"));
    }

    #[test]
    fn test_render_table_shows_both_seats() {
        let state = seated();
        let text = render_table(&state, &ActionChoices::evaluate(&state));
        assert!(text.contains("Pot: $15"));
        assert!(text.contains("Hero    (seat 1) $990"));
        assert!(text.contains("A♠ A♥"));
        assert!(text.contains("Villain (seat 0) $985"));
        assert!(text.contains("?? ??"));
        assert!(text.contains("Actions: fold, call 5, raise 20..=990"));
    }

    #[test]
    fn test_render_unseated_table() {
        let state = TableState::default();
        let text = render_table(&state, &ActionChoices::evaluate(&state));
        assert!(text.contains("Not seated"));
        assert!(text.contains("Actions: no actions"));
    }

    #[test]
    fn test_console_presenter_writes_records() {
        let mut presenter = ConsolePresenter::new(Vec::new());
        presenter.record(Record::new(RecordKind::You, "CALL"));
        presenter.timer(&TimerUpdate {
            epoch: 1,
            remaining: 5,
            warning: Some(5),
            expired: false,
        });
        presenter.timer(&TimerUpdate {
            epoch: 1,
            remaining: 4,
            warning: None,
            expired: false,
        });
        let output = String::from_utf8(presenter.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("YOU  ]: CALL"));
        assert!(lines[1].ends_with(" 5 second(s) left"));
    }
}
