use hu_poker::{
    ActionChoices,
    entities::{Action, TableState, Usd},
    game::AmountError,
    parse_amount,
};
use std::fmt;

/// A line of user input, understood.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    Act(Action),
    /// A bet or raise sized from the table. Resolved against the current
    /// choices, since the amount depends on the pot and stack.
    Sized(BetSize),
    Help,
    Quit,
}

/// Bet-size shortcuts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BetSize {
    Min,
    HalfPot,
    Pot,
    AllIn,
}

impl BetSize {
    /// The bet or raise this size stands for right now, or `None` if we
    /// can't bet or raise at all. The amount isn't clamped to the legal
    /// range.
    pub fn resolve(self, state: &TableState, choices: &ActionChoices) -> Option<Action> {
        match self {
            Self::Min => choices.min_action(),
            Self::HalfPot => choices.pot_fraction(state, 1, 2),
            Self::Pot => choices.pot_fraction(state, 1, 1),
            Self::AllIn => choices.all_in(),
        }
    }
}

impl fmt::Display for BetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Min => "min",
            Self::HalfPot => "half",
            Self::Pot => "pot",
            Self::AllIn => "allin",
        };
        write!(f, "{repr}")
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Bet or raise given without an amount.
    MissingAmount(&'static str),
    /// Bet or raise amount that isn't a usable chip count.
    InvalidAmount(AmountError),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAmount(verb) => {
                write!(f, "'{verb}' needs an amount (e.g., '{verb} 100')")
            }
            Self::InvalidAmount(error) => write!(f, "Invalid amount: {error}"),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{cmd}'. Type 'help' to see available commands"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
Actions: fold, check, call, bet AMOUNT, raise AMOUNT
Sizes:   min, half (half pot), pot, allin
Other:   help, quit";

/// Parse a command string into a [`Command`].
///
/// Commands are case-insensitive. Amounts are whole chips added by the
/// action; whether they're legal right now is checked later against the
/// table.
///
/// # Examples
///
/// ```
/// use hu_client::commands::{BetSize, Command, parse_command};
/// use hu_poker::Action;
///
/// assert_eq!(parse_command("call"), Ok(Command::Act(Action::Call)));
/// assert_eq!(parse_command("Raise 100"), Ok(Command::Act(Action::Raise(100))));
/// assert_eq!(parse_command("all-in"), Ok(Command::Sized(BetSize::AllIn)));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim().to_ascii_lowercase();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();

    match parts.as_slice() {
        ["fold"] => Ok(Command::Act(Action::Fold)),
        ["check"] => Ok(Command::Act(Action::Check)),
        ["call"] => Ok(Command::Act(Action::Call)),
        ["min"] => Ok(Command::Sized(BetSize::Min)),
        ["half"] => Ok(Command::Sized(BetSize::HalfPot)),
        ["pot"] => Ok(Command::Sized(BetSize::Pot)),
        ["allin" | "all-in"] => Ok(Command::Sized(BetSize::AllIn)),
        ["help" | "?"] => Ok(Command::Help),
        ["quit" | "exit"] => Ok(Command::Quit),
        ["bet", rest @ ..] => parse_amount_arg("bet", rest).map(|n| Command::Act(Action::Bet(n))),
        ["raise", rest @ ..] => {
            parse_amount_arg("raise", rest).map(|n| Command::Act(Action::Raise(n)))
        }
        _ => Err(ParseError::UnrecognizedCommand(input.trim().to_string())),
    }
}

fn parse_amount_arg(verb: &'static str, rest: &[&str]) -> Result<Usd, ParseError> {
    match rest {
        [] => Err(ParseError::MissingAmount(verb)),
        [value] => parse_amount(value).map_err(ParseError::InvalidAmount),
        _ => Err(ParseError::UnrecognizedCommand(
            format!("{verb} {}", rest.join(" ")),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_fold() {
        assert_eq!(parse_command("fold"), Ok(Command::Act(Action::Fold)));
    }

    #[test]
    fn test_parse_check() {
        assert_eq!(parse_command("check"), Ok(Command::Act(Action::Check)));
    }

    #[test]
    fn test_parse_call() {
        assert_eq!(parse_command("call"), Ok(Command::Act(Action::Call)));
    }

    #[test]
    fn test_parse_all_in_spellings() {
        assert_eq!(parse_command("allin"), Ok(Command::Sized(BetSize::AllIn)));
        assert_eq!(parse_command("all-in"), Ok(Command::Sized(BetSize::AllIn)));
    }

    #[test]
    fn test_parse_bet_sizes() {
        assert_eq!(parse_command("min"), Ok(Command::Sized(BetSize::Min)));
        assert_eq!(parse_command("HALF"), Ok(Command::Sized(BetSize::HalfPot)));
        assert_eq!(parse_command("pot"), Ok(Command::Sized(BetSize::Pot)));
    }

    // === Bet size tests ===

    fn open_table(pot: Usd) -> TableState {
        TableState {
            pot,
            stacks: [970, 970],
            my_seat: Some(0),
            ..Default::default()
        }
    }

    #[test]
    fn test_bet_sizes_resolve_against_table() {
        let state = open_table(60);
        let choices = ActionChoices::evaluate(&state);
        assert_eq!(
            BetSize::Min.resolve(&state, &choices),
            Some(Action::Bet(10))
        );
        assert_eq!(
            BetSize::HalfPot.resolve(&state, &choices),
            Some(Action::Bet(30))
        );
        assert_eq!(
            BetSize::Pot.resolve(&state, &choices),
            Some(Action::Bet(60))
        );
        assert_eq!(
            BetSize::AllIn.resolve(&state, &choices),
            Some(Action::Bet(970))
        );
    }

    #[test]
    fn test_bet_sizes_need_an_open_wager() {
        let state = TableState {
            my_seat: None,
            ..open_table(60)
        };
        let choices = ActionChoices::evaluate(&state);
        assert_eq!(BetSize::Pot.resolve(&state, &choices), None);
    }

    #[test]
    fn test_parse_help_and_quit() {
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("?"), Ok(Command::Help));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse_command("  CHECK "), Ok(Command::Act(Action::Check)));
    }

    // === Amount command tests ===

    #[test]
    fn test_parse_bet() {
        assert_eq!(parse_command("bet 40"), Ok(Command::Act(Action::Bet(40))));
    }

    #[test]
    fn test_parse_raise() {
        assert_eq!(
            parse_command("raise   250"),
            Ok(Command::Act(Action::Raise(250)))
        );
    }

    #[test]
    fn test_parse_bet_without_amount() {
        assert_eq!(parse_command("bet"), Err(ParseError::MissingAmount("bet")));
    }

    #[test]
    fn test_parse_raise_negative() {
        let result = parse_command("raise -5");
        assert!(matches!(
            result,
            Err(ParseError::InvalidAmount(AmountError::Negative(_)))
        ));
    }

    #[test]
    fn test_parse_bet_fractional() {
        let result = parse_command("bet 12.5");
        assert!(matches!(
            result,
            Err(ParseError::InvalidAmount(AmountError::NotWhole(_)))
        ));
    }

    #[test]
    fn test_parse_raise_with_extra_words() {
        let result = parse_command("raise 10 20");
        assert!(matches!(result, Err(ParseError::UnrecognizedCommand(_))));
    }

    // === Error tests ===

    #[test]
    fn test_unrecognized_command() {
        let result = parse_command("shove");
        assert_eq!(
            result,
            Err(ParseError::UnrecognizedCommand("shove".to_string()))
        );
    }

    #[test]
    fn test_empty_input_is_unrecognized() {
        assert!(matches!(
            parse_command("   "),
            Err(ParseError::UnrecognizedCommand(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let error = parse_command("bet").unwrap_err();
        assert_eq!(error.to_string(), "'bet' needs an amount (e.g., 'bet 100')");
        let error = parse_command("raise ten").unwrap_err();
        assert!(error.to_string().starts_with("Invalid amount:"));
    }
}
