use crate::{
    default_rank_chips, level_kind, CardAttrRules, CardRole, Contribution, GameConfig, HandKind,
    HandResult, Rank, Score,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct ScoreTables {
    hand_rules: HashMap<HandKind, (i64, f64)>,
    hand_level_rules: HashMap<HandKind, (i64, f64)>,
    rank_chips: HashMap<Rank, i64>,
    pub card_attrs: CardAttrRules,
}

impl ScoreTables {
    pub fn from_config(config: &GameConfig) -> Self {
        let mut hand_rules = HashMap::new();
        let mut hand_level_rules = HashMap::new();
        for hand in &config.hands {
            hand_rules.insert(hand.hand, (hand.base_chips, hand.base_mult));
            hand_level_rules.insert(hand.hand, (hand.level_chips, hand.level_mult));
        }
        let mut rank_chips = HashMap::new();
        for rank in &config.ranks {
            rank_chips.insert(rank.rank, rank.chips);
        }
        Self {
            hand_rules,
            hand_level_rules,
            rank_chips,
            card_attrs: config.card_attrs.clone(),
        }
    }

    pub fn standard() -> Self {
        Self::from_config(&GameConfig::standard())
    }

    pub fn hand_base(&self, kind: HandKind) -> (i64, f64) {
        self.hand_rules
            .get(&kind)
            .or_else(|| self.hand_rules.get(&level_kind(kind)))
            .copied()
            .unwrap_or_else(|| kind.default_base())
    }

    pub fn hand_base_for_level(&self, kind: HandKind, level: u32) -> (i64, f64) {
        let (base_chips, base_mult) = self.hand_base(kind);
        let (level_chips, level_mult) = self
            .hand_level_rules
            .get(&level_kind(kind))
            .copied()
            .unwrap_or_else(|| level_kind(kind).default_level_step());
        if level <= 1 {
            return (base_chips, base_mult);
        }
        let extra = (level - 1) as i64;
        let chips = base_chips.saturating_add(level_chips.saturating_mul(extra));
        let mult = base_mult + level_mult * extra as f64;
        (chips, mult)
    }

    pub fn rank_chips(&self, rank: Rank) -> i64 {
        self.rank_chips
            .get(&rank)
            .copied()
            .unwrap_or_else(|| default_rank_chips(rank))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveMode {
    /// Joker state writes are persisted.
    Commit,
    /// Same numbers, nothing written back.
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumableRequest {
    Planet(HandKind),
    Tarot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardBonusRequest {
    /// Index into the played cards.
    pub index: usize,
    pub chips: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardBreakdown {
    pub index: usize,
    pub role: CardRole,
    pub triggers: u32,
    pub contribution: Contribution,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JokerBreakdown {
    pub slot: usize,
    pub id: String,
    /// Slot whose handler ran here; `None` when nothing ran.
    pub source: Option<usize>,
    /// Edition bonuses included.
    pub contribution: Contribution,
}

/// Running totals: chips and additive mult sum, factors multiply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreAccumulator {
    base: Score,
    chips: i64,
    mult: f64,
    factor: f64,
    money: i64,
}

impl ScoreAccumulator {
    pub fn new(base: Score) -> Self {
        Self {
            base,
            chips: 0,
            mult: 0.0,
            factor: 1.0,
            money: 0,
        }
    }

    pub fn add(&mut self, contribution: &Contribution) {
        self.chips += contribution.chips;
        self.mult += contribution.mult;
        self.factor *= contribution.x_mult;
        self.money += contribution.money;
    }

    pub fn chips(&self) -> i64 {
        self.base.chips + self.chips
    }

    pub fn mult(&self) -> f64 {
        (self.base.mult + self.mult) * self.factor
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    pub fn score(&self) -> Score {
        Score {
            chips: self.chips(),
            mult: self.mult(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub mode: ResolveMode,
    pub hand: HandResult,
    pub level: u32,
    pub chips: i64,
    pub mult: f64,
    /// `chips * mult`, unrounded.
    pub score: f64,
    pub cards: Vec<CardBreakdown>,
    pub jokers: Vec<JokerBreakdown>,
    pub money: i64,
    /// Played card indices scheduled for destruction.
    pub destroyed: Vec<usize>,
    pub consumables: Vec<ConsumableRequest>,
    pub card_bonuses: Vec<CardBonusRequest>,
}

impl ScoreResult {
    pub fn empty(mode: ResolveMode) -> Self {
        let mut hand = HandResult::empty();
        hand.base_chips = 0;
        hand.base_mult = 0.0;
        Self {
            mode,
            hand,
            level: 1,
            chips: 0,
            mult: 0.0,
            score: 0.0,
            cards: Vec::new(),
            jokers: Vec::new(),
            money: 0,
            destroyed: Vec::new(),
            consumables: Vec::new(),
            card_bonuses: Vec::new(),
        }
    }

    pub fn total(&self) -> Score {
        Score {
            chips: self.chips,
            mult: self.mult,
        }
    }

    pub fn card(&self, role: CardRole, index: usize) -> Option<&CardBreakdown> {
        self.cards
            .iter()
            .find(|entry| entry.role == role && entry.index == index)
    }
}
