//! Which actions are legal for us right now, and for how much.
//!
//! Choices are derived from the table state on demand and never stored.
//! Any wager or stack change invalidates them, so callers should call
//! [`ActionChoices::evaluate`] again after every applied event.

use std::{fmt, ops::RangeInclusive};

use super::{
    entities::{Action, TableState, Usd},
    errors::{AmountError, ClientError},
};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ActionChoices {
    pub can_fold: bool,
    pub can_check: bool,
    pub can_call: bool,
    pub can_bet: bool,
    pub can_raise: bool,
    /// Chips needed to match the opponent's wager.
    pub to_call: Usd,
    /// Smallest legal bet or raise.
    pub min_amount: Usd,
    /// Largest legal bet or raise (all-in).
    pub max_amount: Usd,
}

impl ActionChoices {
    /// No actions offered. Used while we aren't seated.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn evaluate(state: &TableState) -> Self {
        let (Some(stack), Some(own), Some(opp)) = (
            state.own_stack(),
            state.own_wager(),
            state.opponent_wager(),
        ) else {
            return Self::none();
        };

        let facing_bet = opp > own;
        if facing_bet {
            let to_call = opp - own;
            let can_raise = stack > to_call;
            let min_raise = opp.saturating_mul(2).saturating_sub(own).min(stack);
            Self {
                can_fold: true,
                can_check: false,
                can_call: true,
                can_bet: false,
                can_raise,
                to_call,
                min_amount: if can_raise { min_raise } else { 0 },
                max_amount: if can_raise { stack } else { 0 },
            }
        } else {
            let can_bet = stack > 0;
            Self {
                can_fold: false,
                can_check: true,
                can_call: false,
                can_bet,
                can_raise: false,
                to_call: 0,
                min_amount: if can_bet { state.blinds.big.min(stack) } else { 0 },
                max_amount: if can_bet { stack } else { 0 },
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.can_fold || self.can_check || self.can_call || self.can_bet || self.can_raise)
    }

    /// Label for the single bet/raise control.
    pub fn wager_label(&self) -> &'static str {
        if self.can_raise { "Raise" } else { "Bet" }
    }

    /// Legal bet/raise amounts, if betting or raising is allowed at all.
    pub fn bounds(&self) -> Option<RangeInclusive<Usd>> {
        (self.can_bet || self.can_raise).then_some(self.min_amount..=self.max_amount)
    }

    /// The bet or raise that puts our whole stack in, whichever applies.
    pub fn all_in(&self) -> Option<Action> {
        self.wager(self.max_amount)
    }

    /// The smallest legal bet or raise.
    pub fn min_action(&self) -> Option<Action> {
        self.wager(self.min_amount)
    }

    /// A bet or raise of `num / den` of the current pot, rounded down.
    ///
    /// The amount is not clamped to the legal range, so the result still
    /// has to pass [`ActionChoices::validate`].
    pub fn pot_fraction(&self, state: &TableState, num: Usd, den: Usd) -> Option<Action> {
        let amount = state.pot.saturating_mul(num).checked_div(den)?;
        self.wager(amount)
    }

    fn wager(&self, amount: Usd) -> Option<Action> {
        if self.can_raise {
            Some(Action::Raise(amount))
        } else if self.can_bet {
            Some(Action::Bet(amount))
        } else {
            None
        }
    }

    /// Check an action against the current choices. Amounts outside the
    /// legal range are rejected, never clamped.
    ///
    /// # Errors
    ///
    /// - [`ClientError::IllegalAction`] if the action's kind isn't offered.
    /// - [`ClientError::InvalidAmount`] if a bet or raise amount is out of range.
    pub fn validate(&self, action: &Action) -> Result<(), ClientError> {
        let allowed = match action {
            Action::Fold => self.can_fold,
            Action::Check => self.can_check,
            Action::Call => self.can_call,
            Action::Bet(_) => self.can_bet,
            Action::Raise(_) => self.can_raise,
        };
        if !allowed {
            return Err(ClientError::IllegalAction { action: *action });
        }
        if let Some(amount) = action.amount()
            && !(self.min_amount..=self.max_amount).contains(&amount)
        {
            return Err(AmountError::OutOfRange {
                amount,
                min: self.min_amount,
                max: self.max_amount,
            }
            .into());
        }
        Ok(())
    }
}

impl fmt::Display for ActionChoices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut choices = Vec::with_capacity(4);
        if self.can_fold {
            choices.push("fold".to_string());
        }
        if self.can_check {
            choices.push("check".to_string());
        }
        if self.can_call {
            choices.push(format!("call {}", self.to_call));
        }
        if let Some(bounds) = self.bounds() {
            choices.push(format!(
                "{} {}..={}",
                self.wager_label().to_lowercase(),
                bounds.start(),
                bounds.end()
            ));
        }
        if choices.is_empty() {
            write!(f, "no actions")
        } else {
            write!(f, "{}", choices.join(", "))
        }
    }
}
