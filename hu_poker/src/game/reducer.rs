//! Applies server events to the table.
//!
//! [`reduce`] is pure: it never touches the previous state, and a returned
//! error means the event was dropped as a whole. Callers commit
//! [`Transition::state`] only on success.

use super::{
    constants::{BOARD_SIZE, HOLE_CARDS},
    entities::{BettingRound, Blinds, CardSlot, PlayerId, TableState},
    errors::ClientError,
    timer::TimerCommand,
};
use crate::net::messages::{
    AlertAction, DealCards, HandEnd, HandStart, InboundEvent, PostBlinds, RequestAction,
};

/// The outcome of applying one event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub state: TableState,
    /// Lines appended to the history by this event, in order.
    pub log: Vec<String>,
    pub timer: TimerCommand,
    /// A problem that didn't stop the event from applying. Only a
    /// [`ClientError::SeatNotFound`] for now.
    pub fault: Option<ClientError>,
}

impl Transition {
    fn new(state: TableState) -> Self {
        Self {
            state,
            log: Vec::new(),
            timer: TimerCommand::Keep,
            fault: None,
        }
    }

    fn push_log(&mut self, line: String) {
        self.state.history.push(line.clone());
        self.log.push(line);
    }
}

/// Apply `event` to `state` on behalf of the client `self_id`.
///
/// # Errors
///
/// Returns [`ClientError::MalformedEvent`] when the event can't be applied
/// without leaving the table inconsistent. The previous state stays valid.
pub fn reduce(
    state: &TableState,
    self_id: &PlayerId,
    event: &InboundEvent,
) -> Result<Transition, ClientError> {
    let mut next = Transition::new(state.clone());
    match event {
        InboundEvent::HandStart(start) => hand_start(&mut next, self_id, start)?,
        InboundEvent::HandEnd(end) => hand_end(&mut next, end),
        InboundEvent::DealCards(deal) => deal_cards(&mut next, deal)?,
        InboundEvent::PostBlinds(PostBlinds { pot, stacks, wagers }) => {
            next.state.pot = *pot;
            next.state.stacks = *stacks;
            next.state.wagers = *wagers;
        }
        InboundEvent::RequestAction(request) => request_action(&mut next, request),
        InboundEvent::AlertAction(alert) => alert_action(&mut next, self_id, alert),
        InboundEvent::GameStart | InboundEvent::GameEnd | InboundEvent::SendAction => {}
    }
    next.state.version += 1;
    Ok(next)
}

fn hand_start(
    next: &mut Transition,
    self_id: &PlayerId,
    start: &HandStart,
) -> Result<(), ClientError> {
    let players = <[PlayerId; 2]>::try_from(start.players.clone()).map_err(|players| {
        ClientError::malformed(
            "HandStart",
            format!("expected 2 players, got {}", players.len()),
        )
    })?;

    let state = &mut next.state;
    state.my_seat = players.iter().position(|id| id == self_id);
    if state.my_seat.is_none() {
        next.fault = Some(ClientError::SeatNotFound(self_id.clone()));
    }
    state.players = Some(players);
    state.stacks = start.stacks;
    state.wagers = [0, 0];
    state.pot = 0;
    state.board = [CardSlot::FaceDown; BOARD_SIZE];
    state.hero = [CardSlot::FaceDown; HOLE_CARDS];
    state.villain = [CardSlot::FaceDown; HOLE_CARDS];
    state.round = BettingRound::Preflop;
    if let Some([big, small]) = start.blinds {
        state.blinds = Blinds { small, big };
    }
    state.hand_number += 1;

    next.push_log("Hand Starting".to_string());
    next.timer = TimerCommand::Cancel;
    Ok(())
}

fn hand_end(next: &mut Transition, end: &HandEnd) {
    next.state.stacks = end.stacks;
    next.state.wagers = [0, 0];
    if let Some(cards) = &end.opponent_cards {
        for (slot, index) in next.state.villain.iter_mut().zip(cards) {
            *slot = CardSlot::decode_or_face_down(*index);
        }
    }

    next.push_log("Hand Over".to_string());
    if let Some(winner) = end.winner {
        let label = seat_label(next.state.my_seat == Some(winner));
        let line = match end.pot {
            Some(pot) => format!("{label} wins {pot}"),
            None => format!("{label} wins"),
        };
        next.push_log(line);
    }
    next.timer = TimerCommand::Cancel;
}

fn deal_cards(next: &mut Transition, deal: &DealCards) -> Result<(), ClientError> {
    let Some(round) = deal.round else {
        log::warn!("ignoring cards dealt for an unknown round");
        return Ok(());
    };

    let needed = match round {
        BettingRound::Preflop => HOLE_CARDS,
        visible => visible.visible_board_cards(),
    };
    if deal.cards.len() < needed {
        return Err(ClientError::malformed(
            "DealCards",
            format!(
                "{round} needs {needed} cards, got {}",
                deal.cards.len()
            ),
        ));
    }
    let slot = |i: usize| CardSlot::decode_or_face_down(deal.cards[i]);

    let state = &mut next.state;
    match round {
        BettingRound::Preflop => {
            state.hero = [slot(0), slot(1)];
            state.board = [CardSlot::FaceDown; BOARD_SIZE];
        }
        BettingRound::Flop => {
            state.board = std::array::from_fn(|i| if i < 3 { slot(i) } else { CardSlot::FaceDown });
        }
        BettingRound::Turn => {
            state.board[3] = slot(3);
            state.board[4] = CardSlot::FaceDown;
        }
        BettingRound::River => {
            state.board = std::array::from_fn(slot);
        }
    }
    if round != BettingRound::Preflop {
        state.wagers = [0, 0];
    }
    state.round = round;
    Ok(())
}

fn request_action(next: &mut Transition, request: &RequestAction) {
    let addressed = request.seat.or(next.state.my_seat);
    next.timer = if addressed.is_some() && addressed == next.state.my_seat {
        TimerCommand::Start
    } else {
        // The turn moved on, so any countdown of ours is stale.
        TimerCommand::Cancel
    };
}

fn alert_action(next: &mut Transition, self_id: &PlayerId, alert: &AlertAction) {
    next.state.pot = alert.pot;
    next.state.stacks = alert.stacks;
    next.state.wagers = alert.wagers;
    next.push_log(format!(
        "{} {}",
        seat_label(&alert.actor == self_id),
        alert.action
    ));
    next.timer = TimerCommand::Cancel;
}

fn seat_label(is_self: bool) -> &'static str {
    if is_self { "Hero" } else { "Villain" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Action, Card, Rank, Suit};

    fn me() -> PlayerId {
        PlayerId::new("B")
    }

    fn apply(state: &TableState, event: InboundEvent) -> Transition {
        reduce(state, &me(), &event).unwrap()
    }

    fn hand_start(players: &[&str]) -> InboundEvent {
        InboundEvent::HandStart(HandStart {
            players: players.iter().map(|p| PlayerId::new(p)).collect(),
            stacks: [1000, 1000],
            blinds: None,
        })
    }

    fn deal(round: BettingRound, cards: &[i64]) -> InboundEvent {
        InboundEvent::DealCards(DealCards {
            round: Some(round),
            cards: cards.to_vec(),
        })
    }

    fn seated() -> TableState {
        apply(&TableState::default(), hand_start(&["A", "B"])).state
    }

    #[test]
    fn test_hand_start_assigns_seat() {
        let next = apply(&TableState::default(), hand_start(&["A", "B"]));
        assert_eq!(next.state.my_seat, Some(1));
        assert_eq!(next.state.stacks, [1000, 1000]);
        assert_eq!(next.state.hand_number, 1);
        assert_eq!(next.state.version, 1);
        assert_eq!(next.log, vec!["Hand Starting".to_string()]);
        assert_eq!(next.timer, TimerCommand::Cancel);
        assert_eq!(next.fault, None);
    }

    #[test]
    fn test_hand_start_without_self_leaves_seat_unassigned() {
        let mut state = seated();
        state.hero = [CardSlot::decode(0).unwrap(), CardSlot::decode(1).unwrap()];
        let next = apply(&state, hand_start(&["A", "C"]));
        assert_eq!(next.state.my_seat, None);
        assert_eq!(next.fault, Some(ClientError::SeatNotFound(me())));
        assert_eq!(next.state.hero, [CardSlot::FaceDown; 2]);
    }

    #[test]
    fn test_hand_start_needs_two_players() {
        let result = reduce(&TableState::default(), &me(), &hand_start(&["B"]));
        assert!(matches!(result, Err(ClientError::MalformedEvent { .. })));
    }

    #[test]
    fn test_hand_start_reads_blinds_big_first() {
        let event = InboundEvent::HandStart(HandStart {
            players: vec![PlayerId::new("A"), PlayerId::new("B")],
            stacks: [500, 500],
            blinds: Some([20, 10]),
        });
        let next = apply(&TableState::default(), event);
        assert_eq!(next.state.blinds, Blinds { small: 10, big: 20 });
    }

    #[test]
    fn test_hand_start_resets_per_hand_fields() {
        let mut state = seated();
        state = apply(&state, deal(BettingRound::River, &[0, 1, 2, 3, 4])).state;
        state.wagers = [40, 40];
        let next = apply(&state, hand_start(&["B", "A"]));
        assert_eq!(next.state.my_seat, Some(0));
        assert_eq!(next.state.wagers, [0, 0]);
        assert_eq!(next.state.visible_board(), 0);
        assert_eq!(next.state.round, BettingRound::Preflop);
        assert_eq!(next.state.hand_number, 2);
    }

    #[test]
    fn test_preflop_deal_sets_hero_cards() {
        let next = apply(&seated(), deal(BettingRound::Preflop, &[48, 49]));
        assert_eq!(
            next.state.hero[0].card(),
            Some(Card::new(Rank::Ace, Suit::Spade))
        );
        assert_eq!(
            next.state.hero[1].card(),
            Some(Card::new(Rank::Ace, Suit::Heart))
        );
        assert_eq!(next.state.visible_board(), 0);
    }

    #[test]
    fn test_board_visibility_follows_round() {
        let mut state = seated();
        state.wagers = [20, 20];

        state = apply(&state, deal(BettingRound::Flop, &[0, 1, 2])).state;
        assert_eq!(state.visible_board(), 3);
        assert_eq!(state.round, BettingRound::Flop);
        assert_eq!(state.wagers, [0, 0]);

        state = apply(&state, deal(BettingRound::Turn, &[0, 1, 2, 3])).state;
        assert_eq!(state.visible_board(), 4);

        state = apply(&state, deal(BettingRound::River, &[0, 1, 2, 3, 4])).state;
        assert_eq!(state.visible_board(), 5);
        assert_eq!(state.round, BettingRound::River);
    }

    #[test]
    fn test_deal_with_too_few_cards_is_dropped() {
        let result = reduce(&seated(), &me(), &deal(BettingRound::Flop, &[0, 1]));
        assert!(matches!(result, Err(ClientError::MalformedEvent { .. })));
    }

    #[test]
    fn test_invalid_card_is_dealt_face_down() {
        let next = apply(&seated(), deal(BettingRound::Preflop, &[77, 5]));
        assert_eq!(next.state.hero[0], CardSlot::FaceDown);
        assert!(next.state.hero[1].is_known());
    }

    #[test]
    fn test_unknown_round_only_bumps_version() {
        let state = seated();
        let event = InboundEvent::DealCards(DealCards {
            round: None,
            cards: vec![0, 1, 2],
        });
        let next = apply(&state, event);
        assert_eq!(next.state.version, state.version + 1);
        assert_eq!(next.state.board, state.board);
        assert_eq!(next.state.round, state.round);
    }

    #[test]
    fn test_post_blinds_copies_verbatim() {
        let event = InboundEvent::PostBlinds(PostBlinds {
            pot: 15,
            stacks: [985, 990],
            wagers: [15, 10],
        });
        let next = apply(&seated(), event);
        assert_eq!(next.state.pot, 15);
        assert_eq!(next.state.stacks, [985, 990]);
        assert_eq!(next.state.wagers, [15, 10]);
        assert!(next.log.is_empty());
    }

    #[test]
    fn test_request_action_for_self_starts_timer() {
        let state = seated();
        let bare = apply(&state, InboundEvent::RequestAction(RequestAction::default()));
        assert_eq!(bare.timer, TimerCommand::Start);

        let mine = apply(
            &state,
            InboundEvent::RequestAction(RequestAction { seat: Some(1) }),
        );
        assert_eq!(mine.timer, TimerCommand::Start);

        let theirs = apply(
            &state,
            InboundEvent::RequestAction(RequestAction { seat: Some(0) }),
        );
        assert_eq!(theirs.timer, TimerCommand::Cancel);
    }

    #[test]
    fn test_request_action_while_unseated_cancels_timer() {
        let next = apply(
            &TableState::default(),
            InboundEvent::RequestAction(RequestAction::default()),
        );
        assert_eq!(next.timer, TimerCommand::Cancel);
    }

    #[test]
    fn test_alert_action_labels_actor() {
        let state = seated();
        let alert = |actor: &str| {
            InboundEvent::AlertAction(AlertAction {
                actor: PlayerId::new(actor),
                action: Action::Call,
                pot: 30,
                stacks: [970, 970],
                wagers: [15, 15],
            })
        };

        let villain = apply(&state, alert("A"));
        assert_eq!(villain.log, vec!["Villain CALL".to_string()]);
        assert_eq!(villain.state.pot, 30);
        assert_eq!(villain.state.wagers, [15, 15]);
        assert_eq!(villain.timer, TimerCommand::Cancel);

        let hero = apply(&state, alert("B"));
        assert_eq!(hero.log, vec!["Hero CALL".to_string()]);
    }

    #[test]
    fn test_hand_end_settles_and_reveals() {
        let mut state = seated();
        state.wagers = [50, 50];
        let event = InboundEvent::HandEnd(HandEnd {
            stacks: [1100, 900],
            winner: Some(0),
            pot: Some(200),
            opponent_cards: Some(vec![44, 45]),
        });
        let next = apply(&state, event);
        assert_eq!(next.state.stacks, [1100, 900]);
        assert_eq!(next.state.wagers, [0, 0]);
        assert!(next.state.villain.iter().all(CardSlot::is_known));
        assert_eq!(
            next.log,
            vec!["Hand Over".to_string(), "Villain wins 200".to_string()]
        );
        assert_eq!(next.timer, TimerCommand::Cancel);
    }

    #[test]
    fn test_history_only_grows() {
        let mut state = seated();
        let before = state.history.clone();
        state = apply(&state, InboundEvent::GameStart).state;
        state = apply(
            &state,
            InboundEvent::HandEnd(HandEnd {
                stacks: [1000, 1000],
                winner: None,
                pot: None,
                opponent_cards: None,
            }),
        )
        .state;
        assert!(state.history.starts_with(&before));
        assert_eq!(state.history.last().map(String::as_str), Some("Hand Over"));
    }
}
