use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

use super::{
    constants::{
        BOARD_SIZE, CARD_COUNT, DEFAULT_BIG_BLIND, DEFAULT_SMALL_BLIND, FACE_DOWN_INDEX,
        HOLE_CARDS, NUM_SEATS,
    },
    errors::ClientError,
};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

impl Suit {
    /// Suits in wire order, i.e., `index % 4`.
    pub const ALL: [Self; 4] = [Self::Spade, Self::Heart, Self::Diamond, Self::Club];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Spade => "♠",
            Self::Heart => "♥",
            Self::Diamond => "♦",
            Self::Club => "♣",
        };
        write!(f, "{repr}")
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Ranks in wire order, i.e., `index / 4`.
    pub const ALL: [Self; 13] = [
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Six => "6",
            Self::Seven => "7",
            Self::Eight => "8",
            Self::Nine => "9",
            Self::Ten => "T",
            Self::Jack => "J",
            Self::Queen => "Q",
            Self::King => "K",
            Self::Ace => "A",
        };
        write!(f, "{repr}")
    }
}

/// A concrete card. On the wire a card is a single index `4 * rank + suit`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Decode a wire index. Returns `None` for anything outside `0..52`,
    /// including the face-down sentinel.
    pub fn from_index(index: u8) -> Option<Self> {
        (index < CARD_COUNT).then(|| Self {
            rank: Rank::ALL[usize::from(index / 4)],
            suit: Suit::ALL[usize::from(index % 4)],
        })
    }

    pub fn index(&self) -> u8 {
        4 * self.rank as u8 + self.suit as u8
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// A card position on the table. Either the client knows the card or it
/// doesn't; there's no third state.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CardSlot {
    Known(Card),
    #[default]
    FaceDown,
}

impl CardSlot {
    /// Decode a raw wire index. The face-down sentinel is a valid input.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidCard`] for negative indices and indices
    /// past the sentinel.
    pub fn decode(index: i64) -> Result<Self, ClientError> {
        match u8::try_from(index) {
            Ok(FACE_DOWN_INDEX) => Ok(Self::FaceDown),
            Ok(idx) => Card::from_index(idx)
                .map(Self::Known)
                .ok_or(ClientError::InvalidCard(index)),
            Err(_) => Err(ClientError::InvalidCard(index)),
        }
    }

    /// Like [`CardSlot::decode`], but an invalid index is logged and shown
    /// face down instead of failing the whole event.
    pub fn decode_or_face_down(index: i64) -> Self {
        Self::decode(index).unwrap_or_else(|error| {
            log::warn!("{error}, showing it face down");
            Self::FaceDown
        })
    }

    pub fn index(&self) -> u8 {
        match self {
            Self::Known(card) => card.index(),
            Self::FaceDown => FACE_DOWN_INDEX,
        }
    }

    pub fn card(&self) -> Option<Card> {
        match self {
            Self::Known(card) => Some(*card),
            Self::FaceDown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl From<Card> for CardSlot {
    fn from(card: Card) -> Self {
        Self::Known(card)
    }
}

impl fmt::Display for CardSlot {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Known(card) => card.fmt(f),
            Self::FaceDown => write!(f, "??"),
        }
    }
}

impl Serialize for CardSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.index())
    }
}

/// The ordered phases of a hand.
#[derive(
    Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum BettingRound {
    #[default]
    Preflop,
    Flop,
    Turn,
    River,
}

impl BettingRound {
    /// Interpret a round as the server sends it: either its upper-case
    /// name or its ordinal. Anything else is `None`.
    pub fn from_wire(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => match name.to_ascii_uppercase().as_str() {
                "PREFLOP" => Some(Self::Preflop),
                "FLOP" => Some(Self::Flop),
                "TURN" => Some(Self::Turn),
                "RIVER" => Some(Self::River),
                _ => None,
            },
            Value::Number(ordinal) => match ordinal.as_u64() {
                Some(0) => Some(Self::Preflop),
                Some(1) => Some(Self::Flop),
                Some(2) => Some(Self::Turn),
                Some(3) => Some(Self::River),
                _ => None,
            },
            _ => None,
        }
    }

    /// How many board cards are face up once this round has been dealt.
    pub fn visible_board_cards(self) -> usize {
        match self {
            Self::Preflop => 0,
            Self::Flop => 3,
            Self::Turn => 4,
            Self::River => 5,
        }
    }
}

impl fmt::Display for BettingRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Preflop => "preflop",
            Self::Flop => "flop",
            Self::Turn => "turn",
            Self::River => "river",
        };
        write!(f, "{repr}")
    }
}

/// Type alias for whole chips. Stacks, wagers, and the pot are all
/// unsigned, so none of them can go negative.
pub type Usd = u32;

/// Type alias for seat positions. Only `0` and `1` are meaningful.
pub type SeatIndex = usize;

/// Opaque id the server hands out when a client joins a game.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(s: &str) -> Self {
        Self(s.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PlayerId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Blinds {
    pub small: Usd,
    pub big: Usd,
}

impl Default for Blinds {
    fn default() -> Self {
        Self {
            small: DEFAULT_SMALL_BLIND,
            big: DEFAULT_BIG_BLIND,
        }
    }
}

impl fmt::Display for Blinds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}/{}", self.small, self.big)
    }
}

/// A player action. This is both what a user intends to do and what the
/// server reports a player did.
///
/// Bet and raise amounts are the chips added by the action itself.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(Usd),
    Raise(Usd),
}

impl Action {
    pub fn amount(&self) -> Option<Usd> {
        match self {
            Self::Bet(amount) | Self::Raise(amount) => Some(*amount),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fold => write!(f, "FOLD"),
            Self::Check => write!(f, "CHECK"),
            Self::Call => write!(f, "CALL"),
            Self::Bet(amount) => write!(f, "BET {amount}"),
            Self::Raise(amount) => write!(f, "RAISE {amount}"),
        }
    }
}

/// The client's view of the table.
///
/// Only the reducer produces new values of this type; everyone else gets a
/// shared reference.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct TableState {
    /// Chips behind, per seat.
    pub stacks: [Usd; NUM_SEATS],
    /// Chips committed in the current betting round, per seat.
    pub wagers: [Usd; NUM_SEATS],
    pub pot: Usd,
    pub board: [CardSlot; BOARD_SIZE],
    /// Our own hole cards.
    pub hero: [CardSlot; HOLE_CARDS],
    /// The opponent's hole cards. Unknown until a showdown reveals them.
    pub villain: [CardSlot; HOLE_CARDS],
    pub round: BettingRound,
    /// Where we sit this hand. `None` until a hand starts, or when the
    /// server's seating didn't include us.
    pub my_seat: Option<SeatIndex>,
    /// Seating order for the current hand.
    pub players: Option<[PlayerId; NUM_SEATS]>,
    pub blinds: Blinds,
    /// Number of hands started since the client connected.
    pub hand_number: u64,
    /// Bumped once per applied event.
    pub version: u64,
    /// Human-readable log. Only ever appended to.
    pub history: Vec<String>,
}

impl TableState {
    pub fn opponent_seat(&self) -> Option<SeatIndex> {
        self.my_seat.map(|seat| 1 - seat)
    }

    pub fn own_stack(&self) -> Option<Usd> {
        self.my_seat.map(|seat| self.stacks[seat])
    }

    pub fn own_wager(&self) -> Option<Usd> {
        self.my_seat.map(|seat| self.wagers[seat])
    }

    pub fn opponent_wager(&self) -> Option<Usd> {
        self.opponent_seat().map(|seat| self.wagers[seat])
    }

    /// Number of board cards currently face up.
    pub fn visible_board(&self) -> usize {
        self.board.iter().filter(|slot| slot.is_known()).count()
    }
}
