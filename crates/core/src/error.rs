use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown suit: {0}")]
    UnknownSuit(String),
    #[error("unknown rank: {0}")]
    UnknownRank(String),
    #[error("unknown enhancement: {0}")]
    UnknownEnhancement(String),
    #[error("unknown seal: {0}")]
    UnknownSeal(String),
    #[error("unknown edition: {0}")]
    UnknownEdition(String),
    #[error("unknown hand: {0}")]
    UnknownHand(String),
    #[error("unknown joker: {0}")]
    UnknownJoker(String),
    #[error("malformed card code: {0}")]
    MalformedCard(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("hand {hand}: base chips must not be negative ({chips})")]
    NegativeHandChips { hand: String, chips: i64 },
    #[error("hand {hand}: base mult must be positive ({mult})")]
    NonPositiveHandMult { hand: String, mult: f64 },
    #[error("rank {rank}: chips must not be negative ({chips})")]
    NegativeRankChips { rank: String, chips: i64 },
    #[error("duplicate rule for {0}")]
    DuplicateRule(String),
    #[error("{field}: multiplier must be positive ({value})")]
    NonPositiveFactor { field: &'static str, value: f64 },
    #[error("{field}: odds denominator must be at least 1")]
    ZeroOdds { field: &'static str },
    #[error("{field}: value must not be negative ({value})")]
    NegativeValue { field: &'static str, value: i64 },
}
