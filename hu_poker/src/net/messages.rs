use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;

use crate::game::{
    entities::{Action, BettingRound, PlayerId, SeatIndex, Usd},
    errors::{AmountError, ClientError},
};

/// Event tags the server may send.
pub const EVENT_TAGS: [&str; 9] = [
    "GameStart",
    "GameEnd",
    "HandStart",
    "HandEnd",
    "DealCards",
    "PostBlinds",
    "RequestAction",
    "SendAction",
    "AlertAction",
];

/// A new hand is starting.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandStart {
    /// Seating order. Our seat is our position in this list.
    pub players: Vec<PlayerId>,
    pub stacks: [Usd; 2],
    /// `[big, small]`, if the server sends them.
    #[serde(default)]
    pub blinds: Option<[Usd; 2]>,
}

/// The hand is over and chips have been settled.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct HandEnd {
    pub stacks: [Usd; 2],
    /// Winning seat, if the server says.
    #[serde(default)]
    pub winner: Option<SeatIndex>,
    #[serde(default)]
    pub pot: Option<Usd>,
    /// The opponent's hole cards, when they were shown down.
    #[serde(default)]
    pub opponent_cards: Option<Vec<i64>>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DealCards {
    /// `None` when the server sent a round this client doesn't know.
    #[serde(deserialize_with = "lenient_round")]
    pub round: Option<BettingRound>,
    /// Raw card indices. Hole cards preflop, the board so far otherwise.
    pub cards: Vec<i64>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PostBlinds {
    pub pot: Usd,
    pub stacks: [Usd; 2],
    pub wagers: [Usd; 2],
}

/// The server wants an action. A bare `RequestAction` tag is addressed to
/// the receiving client.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RequestAction {
    #[serde(default)]
    pub seat: Option<SeatIndex>,
}

/// A player acted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AlertAction {
    /// Taken from the envelope's `from`.
    pub actor: PlayerId,
    pub action: Action,
    pub pot: Usd,
    pub stacks: [Usd; 2],
    pub wagers: [Usd; 2],
}

#[derive(Deserialize)]
struct AlertActionPayload {
    action: Action,
    pot: Usd,
    stacks: [Usd; 2],
    wagers: [Usd; 2],
}

/// A decoded server event.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InboundEvent {
    GameStart,
    GameEnd,
    HandStart(HandStart),
    HandEnd(HandEnd),
    DealCards(DealCards),
    PostBlinds(PostBlinds),
    RequestAction(RequestAction),
    SendAction,
    AlertAction(AlertAction),
}

impl InboundEvent {
    /// Wire tag of this event.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::GameStart => "GameStart",
            Self::GameEnd => "GameEnd",
            Self::HandStart(_) => "HandStart",
            Self::HandEnd(_) => "HandEnd",
            Self::DealCards(_) => "DealCards",
            Self::PostBlinds(_) => "PostBlinds",
            Self::RequestAction(_) => "RequestAction",
            Self::SendAction => "SendAction",
            Self::AlertAction(_) => "AlertAction",
        }
    }

    /// Decode one server message.
    ///
    /// The envelope is `{"event": <tag> | {<tag>: <payload>}, "from": <id>}`.
    /// Tags without a payload may come either way; tags that need one must
    /// come as an object.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MalformedEvent`] for invalid JSON, an unknown
    /// tag, or a payload missing required fields.
    pub fn parse(text: &str) -> Result<Self, ClientError> {
        let envelope: Envelope =
            serde_json::from_str(text).map_err(|e| ClientError::malformed("envelope", e))?;

        let (tag, payload) = match envelope.event {
            Value::String(tag) => (tag, None),
            Value::Object(map) if map.len() == 1 => match map.into_iter().next() {
                Some((tag, Value::Null)) => (tag, None),
                Some((tag, payload)) => (tag, Some(payload)),
                None => return Err(ClientError::malformed("envelope", "empty event object")),
            },
            other => {
                return Err(ClientError::malformed(
                    "envelope",
                    format!("event must be a tag or a single-key object, got {other}"),
                ));
            }
        };

        Self::from_parts(&tag, payload, envelope.from)
    }

    fn from_parts(
        tag: &str,
        payload: Option<Value>,
        from: Option<PlayerId>,
    ) -> Result<Self, ClientError> {
        let event = match tag {
            "GameStart" => Self::GameStart,
            "GameEnd" => Self::GameEnd,
            "SendAction" => Self::SendAction,
            "HandStart" => Self::HandStart(required(tag, payload)?),
            "HandEnd" | "HandOver" => Self::HandEnd(required(tag, payload)?),
            "DealCards" => Self::DealCards(required(tag, payload)?),
            "PostBlinds" => Self::PostBlinds(required(tag, payload)?),
            "RequestAction" => match payload {
                Some(payload) => Self::RequestAction(decode(tag, payload)?),
                None => Self::RequestAction(RequestAction::default()),
            },
            "AlertAction" => {
                let actor = from.ok_or_else(|| ClientError::malformed(tag, "missing `from`"))?;
                let payload: AlertActionPayload = required(tag, payload)?;
                Self::AlertAction(AlertAction {
                    actor,
                    action: payload.action,
                    pot: payload.pot,
                    stacks: payload.stacks,
                    wagers: payload.wagers,
                })
            }
            unknown => {
                return Err(ClientError::malformed(
                    unknown,
                    format!("unknown tag, expected one of {}", EVENT_TAGS.join(", ")),
                ));
            }
        };
        Ok(event)
    }
}

impl fmt::Display for InboundEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlertAction(alert) => write!(f, "{} {}", alert.actor, alert.action),
            Self::DealCards(deal) => match deal.round {
                Some(round) => write!(f, "deal {round}"),
                None => write!(f, "deal (unknown round)"),
            },
            other => write!(f, "{}", other.tag()),
        }
    }
}

#[derive(Deserialize)]
struct Envelope {
    event: Value,
    #[serde(default)]
    from: Option<PlayerId>,
}

fn required<T: DeserializeOwned>(tag: &str, payload: Option<Value>) -> Result<T, ClientError> {
    let payload = payload.ok_or_else(|| ClientError::malformed(tag, "missing payload"))?;
    decode(tag, payload)
}

fn decode<T: DeserializeOwned>(tag: &str, payload: Value) -> Result<T, ClientError> {
    serde_json::from_value(payload).map_err(|e| ClientError::malformed(tag, e))
}

fn lenient_round<'de, D>(deserializer: D) -> Result<Option<BettingRound>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(BettingRound::from_wire(&value))
}

/// A message from this client to the server.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OutboundMessage {
    SendAction { action: Action },
}

impl OutboundMessage {
    /// Encode an action for the wire. No legality checks happen here; run
    /// the action through [`ActionChoices::validate`] first.
    ///
    /// [`ActionChoices::validate`]: crate::game::choices::ActionChoices::validate
    pub fn encode(action: Action) -> Self {
        Self::SendAction { action }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<Action> for OutboundMessage {
    fn from(action: Action) -> Self {
        Self::encode(action)
    }
}

impl fmt::Display for OutboundMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SendAction { action } => write!(f, "{action}"),
        }
    }
}

/// Parse a bet or raise amount typed by the user.
///
/// # Errors
///
/// Returns an [`AmountError`] for negative, fractional, non-numeric, or
/// oversized input.
pub fn parse_amount(input: &str) -> Result<Usd, AmountError> {
    let trimmed = input.trim();
    if let Ok(amount) = trimmed.parse::<Usd>() {
        return Ok(amount);
    }
    if let Ok(amount) = trimmed.parse::<i128>() {
        return Err(if amount < 0 {
            AmountError::Negative(trimmed.to_string())
        } else {
            AmountError::TooLarge(trimmed.to_string())
        });
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_sign_negative() && amount != 0.0 => {
            Err(AmountError::Negative(trimmed.to_string()))
        }
        _ => Err(AmountError::NotWhole(trimmed.to_string())),
    }
}
