use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Spades,
    Hearts,
    Clubs,
    Diamonds,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Clubs, Suit::Diamonds];

    pub fn id(self) -> &'static str {
        match self {
            Suit::Spades => "spades",
            Suit::Hearts => "hearts",
            Suit::Clubs => "clubs",
            Suit::Diamonds => "diamonds",
        }
    }

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'S' => Some(Suit::Spades),
            'H' => Some(Suit::Hearts),
            'C' => Some(Suit::Clubs),
            'D' => Some(Suit::Diamonds),
            _ => None,
        }
    }
}

impl FromStr for Suit {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let norm = value.trim().to_lowercase();
        Suit::ALL
            .into_iter()
            .find(|suit| suit.id() == norm)
            .ok_or_else(|| ParseError::UnknownSuit(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
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
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    /// Ordinal used for straights and tie-breaks. Aces are high (14).
    pub fn value(self) -> u8 {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten => 10,
            Rank::Jack => 11,
            Rank::Queen => 12,
            Rank::King => 13,
            Rank::Ace => 14,
        }
    }

    pub fn from_value(value: u8) -> Option<Self> {
        Rank::ALL.into_iter().find(|rank| rank.value() == value)
    }

    pub fn id(self) -> &'static str {
        match self {
            Rank::Two => "two",
            Rank::Three => "three",
            Rank::Four => "four",
            Rank::Five => "five",
            Rank::Six => "six",
            Rank::Seven => "seven",
            Rank::Eight => "eight",
            Rank::Nine => "nine",
            Rank::Ten => "ten",
            Rank::Jack => "jack",
            Rank::Queen => "queen",
            Rank::King => "king",
            Rank::Ace => "ace",
        }
    }

    pub fn is_face(self) -> bool {
        matches!(self, Rank::Jack | Rank::Queen | Rank::King)
    }

    pub fn plural(self) -> &'static str {
        match self {
            Rank::Two => "Twos",
            Rank::Three => "Threes",
            Rank::Four => "Fours",
            Rank::Five => "Fives",
            Rank::Six => "Sixes",
            Rank::Seven => "Sevens",
            Rank::Eight => "Eights",
            Rank::Nine => "Nines",
            Rank::Ten => "Tens",
            Rank::Jack => "Jacks",
            Rank::Queen => "Queens",
            Rank::King => "Kings",
            Rank::Ace => "Aces",
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code.to_ascii_uppercase().as_str() {
            "2" => Some(Rank::Two),
            "3" => Some(Rank::Three),
            "4" => Some(Rank::Four),
            "5" => Some(Rank::Five),
            "6" => Some(Rank::Six),
            "7" => Some(Rank::Seven),
            "8" => Some(Rank::Eight),
            "9" => Some(Rank::Nine),
            "10" | "T" => Some(Rank::Ten),
            "J" => Some(Rank::Jack),
            "Q" => Some(Rank::Queen),
            "K" => Some(Rank::King),
            "A" => Some(Rank::Ace),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Rank::Jack => "Jack",
            Rank::Queen => "Queen",
            Rank::King => "King",
            Rank::Ace => "Ace",
            other => return write!(f, "{}", other.value()),
        };
        f.write_str(label)
    }
}

impl FromStr for Rank {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let norm = value.trim().to_lowercase();
        Rank::ALL
            .into_iter()
            .find(|rank| rank.id() == norm)
            .or_else(|| Rank::from_code(value.trim()))
            .ok_or_else(|| ParseError::UnknownRank(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Enhancement {
    Bonus,
    Mult,
    Wild,
    Glass,
    Steel,
    Stone,
    Gold,
    Lucky,
}

impl Enhancement {
    pub const ALL: [Enhancement; 8] = [
        Enhancement::Bonus,
        Enhancement::Mult,
        Enhancement::Wild,
        Enhancement::Glass,
        Enhancement::Steel,
        Enhancement::Stone,
        Enhancement::Gold,
        Enhancement::Lucky,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Enhancement::Bonus => "bonus",
            Enhancement::Mult => "mult",
            Enhancement::Wild => "wild",
            Enhancement::Glass => "glass",
            Enhancement::Steel => "steel",
            Enhancement::Stone => "stone",
            Enhancement::Gold => "gold",
            Enhancement::Lucky => "lucky",
        }
    }
}

impl FromStr for Enhancement {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let norm = value.trim().to_lowercase();
        Enhancement::ALL
            .into_iter()
            .find(|kind| kind.id() == norm)
            .ok_or_else(|| ParseError::UnknownEnhancement(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Seal {
    Gold,
    Red,
    Blue,
    Purple,
}

impl Seal {
    pub const ALL: [Seal; 4] = [Seal::Gold, Seal::Red, Seal::Blue, Seal::Purple];

    pub fn id(self) -> &'static str {
        match self {
            Seal::Gold => "gold",
            Seal::Red => "red",
            Seal::Blue => "blue",
            Seal::Purple => "purple",
        }
    }
}

impl FromStr for Seal {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let norm = value.trim().to_lowercase();
        Seal::ALL
            .into_iter()
            .find(|seal| seal.id() == norm)
            .ok_or_else(|| ParseError::UnknownSeal(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    Foil,
    Holographic,
    Polychrome,
    Negative,
}

impl Edition {
    pub const ALL: [Edition; 4] = [
        Edition::Foil,
        Edition::Holographic,
        Edition::Polychrome,
        Edition::Negative,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Edition::Foil => "foil",
            Edition::Holographic => "holographic",
            Edition::Polychrome => "polychrome",
            Edition::Negative => "negative",
        }
    }
}

impl FromStr for Edition {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let norm = value.trim().to_lowercase();
        Edition::ALL
            .into_iter()
            .find(|edition| edition.id() == norm)
            .ok_or_else(|| ParseError::UnknownEdition(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    #[serde(default)]
    pub enhancement: Option<Enhancement>,
    #[serde(default)]
    pub edition: Option<Edition>,
    #[serde(default)]
    pub seal: Option<Seal>,
    #[serde(default)]
    pub face_down: bool,
    /// Set by the owning game layer (boss effects); a debuffed card scores nothing.
    #[serde(default)]
    pub debuffed: bool,
    /// Permanent chips accumulated across plays.
    #[serde(default)]
    pub bonus_chips: i64,
}

impl Card {
    pub fn standard(suit: Suit, rank: Rank) -> Self {
        Self {
            suit,
            rank,
            enhancement: None,
            edition: None,
            seal: None,
            face_down: false,
            debuffed: false,
            bonus_chips: 0,
        }
    }

    pub fn with_enhancement(mut self, enhancement: Enhancement) -> Self {
        self.enhancement = Some(enhancement);
        self
    }

    pub fn with_seal(mut self, seal: Seal) -> Self {
        self.seal = Some(seal);
        self
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = Some(edition);
        self
    }

    pub fn is_wild(&self) -> bool {
        matches!(self.enhancement, Some(Enhancement::Wild))
    }

    /// Stone cards have no effective suit or rank.
    pub fn is_stone(&self) -> bool {
        matches!(self.enhancement, Some(Enhancement::Stone))
    }

    pub fn is_face(&self) -> bool {
        !self.is_stone() && self.rank.is_face()
    }

    /// Effective suit match, honouring wild cards and the two-colour collapse.
    pub fn matches_suit(&self, suit: Suit, smeared: bool) -> bool {
        if self.is_stone() {
            return false;
        }
        if self.is_wild() {
            return true;
        }
        if smeared {
            self.suit.is_red() == suit.is_red()
        } else {
            self.suit == suit
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_stone() {
            return f.write_str("Stone");
        }
        write!(f, "{} of {:?}", self.rank, self.suit)
    }
}

/// Parses compact codes such as `AS`, `10h` or `TD`.
impl FromStr for Card {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value.trim();
        let mut chars = code.chars();
        let suit_letter = chars
            .next_back()
            .ok_or_else(|| ParseError::MalformedCard(value.to_string()))?;
        let suit = Suit::from_letter(suit_letter)
            .ok_or_else(|| ParseError::MalformedCard(value.to_string()))?;
        let rank = Rank::from_code(chars.as_str())
            .ok_or_else(|| ParseError::MalformedCard(value.to_string()))?;
        Ok(Card::standard(suit, rank))
    }
}
