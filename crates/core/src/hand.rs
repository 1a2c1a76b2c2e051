use crate::{Card, ParseError, Rank, Suit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Cards beyond this many are never kickers.
pub const HAND_SIZE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum HandKind {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
    RoyalFlush,
    FiveOfAKind,
    FlushHouse,
    FlushFive,
}

impl HandKind {
    pub const ALL: [HandKind; 13] = [
        HandKind::HighCard,
        HandKind::Pair,
        HandKind::TwoPair,
        HandKind::ThreeOfAKind,
        HandKind::Straight,
        HandKind::Flush,
        HandKind::FullHouse,
        HandKind::FourOfAKind,
        HandKind::StraightFlush,
        HandKind::RoyalFlush,
        HandKind::FiveOfAKind,
        HandKind::FlushHouse,
        HandKind::FlushFive,
    ];

    pub fn id(self) -> &'static str {
        match self {
            HandKind::HighCard => "high_card",
            HandKind::Pair => "pair",
            HandKind::TwoPair => "two_pair",
            HandKind::ThreeOfAKind => "three_of_a_kind",
            HandKind::Straight => "straight",
            HandKind::Flush => "flush",
            HandKind::FullHouse => "full_house",
            HandKind::FourOfAKind => "four_of_a_kind",
            HandKind::StraightFlush => "straight_flush",
            HandKind::RoyalFlush => "royal_flush",
            HandKind::FiveOfAKind => "five_of_a_kind",
            HandKind::FlushHouse => "flush_house",
            HandKind::FlushFive => "flush_five",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HandKind::HighCard => "High Card",
            HandKind::Pair => "Pair",
            HandKind::TwoPair => "Two Pair",
            HandKind::ThreeOfAKind => "Three of a Kind",
            HandKind::Straight => "Straight",
            HandKind::Flush => "Flush",
            HandKind::FullHouse => "Full House",
            HandKind::FourOfAKind => "Four of a Kind",
            HandKind::StraightFlush => "Straight Flush",
            HandKind::RoyalFlush => "Royal Flush",
            HandKind::FiveOfAKind => "Five of a Kind",
            HandKind::FlushHouse => "Flush House",
            HandKind::FlushFive => "Flush Five",
        }
    }

    /// Level-one chips and mult.
    pub fn default_base(self) -> (i64, f64) {
        match self {
            HandKind::HighCard => (5, 1.0),
            HandKind::Pair => (5, 2.0),
            HandKind::TwoPair => (20, 2.0),
            HandKind::ThreeOfAKind => (30, 3.0),
            HandKind::Straight => (30, 4.0),
            HandKind::Flush => (35, 4.0),
            HandKind::FullHouse => (40, 4.0),
            HandKind::FourOfAKind => (60, 7.0),
            HandKind::StraightFlush | HandKind::RoyalFlush => (100, 8.0),
            HandKind::FiveOfAKind => (120, 12.0),
            HandKind::FlushHouse => (140, 14.0),
            HandKind::FlushFive => (160, 16.0),
        }
    }

    /// Chips and mult gained per level above one.
    pub fn default_level_step(self) -> (i64, f64) {
        match self {
            HandKind::HighCard => (10, 1.0),
            HandKind::Pair => (15, 1.0),
            HandKind::TwoPair => (20, 1.0),
            HandKind::ThreeOfAKind => (20, 2.0),
            HandKind::Straight => (30, 3.0),
            HandKind::Flush => (15, 2.0),
            HandKind::FullHouse => (25, 2.0),
            HandKind::FourOfAKind => (30, 3.0),
            HandKind::StraightFlush | HandKind::RoyalFlush => (40, 4.0),
            HandKind::FiveOfAKind => (35, 3.0),
            HandKind::FlushHouse => (40, 4.0),
            HandKind::FlushFive => (50, 3.0),
        }
    }
}

impl fmt::Display for HandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for HandKind {
    type Err = ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let norm = value.trim().to_lowercase();
        HandKind::ALL
            .into_iter()
            .find(|kind| kind.id() == norm)
            .ok_or_else(|| ParseError::UnknownHand(value.to_string()))
    }
}

/// Royal flushes share the straight flush level.
pub fn level_kind(kind: HandKind) -> HandKind {
    match kind {
        HandKind::RoyalFlush => HandKind::StraightFlush,
        other => other,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEvalRules {
    pub smeared_suits: bool,
    pub four_fingers: bool,
    pub shortcut: bool,
}

impl HandEvalRules {
    pub fn threshold(self) -> usize {
        if self.four_fingers {
            4
        } else {
            5
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandCaveat {
    /// Shortcut gaps are only searched for five-card straights, so a gapped
    /// four-card run never counts even with Four Fingers active.
    ShortcutIgnoresFourFingers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandResult {
    pub kind: HandKind,
    pub base_chips: i64,
    pub base_mult: f64,
    /// Indices into the classified cards, ascending.
    pub scoring: Vec<usize>,
    pub kickers: Vec<usize>,
    pub description: String,
    #[serde(default)]
    pub caveats: Vec<HandCaveat>,
}

impl HandResult {
    pub fn empty() -> Self {
        let (base_chips, base_mult) = HandKind::HighCard.default_base();
        Self {
            kind: HandKind::HighCard,
            base_chips,
            base_mult,
            scoring: Vec::new(),
            kickers: Vec::new(),
            description: "No cards".to_string(),
            caveats: Vec::new(),
        }
    }

    /// All played cards score, including any beyond the fifth.
    pub fn promote_kickers(&mut self, card_count: usize) {
        self.scoring = (0..card_count).collect();
        self.kickers.clear();
    }

    pub fn is_scoring(&self, index: usize) -> bool {
        self.scoring.binary_search(&index).is_ok()
    }
}

#[derive(Debug)]
struct RankGroup {
    rank: Rank,
    members: Vec<usize>,
}

#[derive(Debug)]
struct Flush {
    suit: Suit,
    members: Vec<usize>,
}

#[derive(Debug)]
struct Straight {
    /// Low to high; an ace-low run starts with the Ace.
    ranks: Vec<Rank>,
    members: Vec<usize>,
}

impl Straight {
    fn is_royal(&self) -> bool {
        let mut values: Vec<u8> = self.ranks.iter().map(|rank| rank.value()).collect();
        values.sort_unstable();
        values == [10, 11, 12, 13, 14]
    }

    fn span(&self) -> String {
        match (self.ranks.first(), self.ranks.last()) {
            (Some(low), Some(high)) => format!("{low} to {high}"),
            _ => String::new(),
        }
    }
}

pub fn classify_hand(cards: &[Card]) -> HandResult {
    classify_hand_with_rules(cards, HandEvalRules::default())
}

pub fn classify_hand_with_rules(cards: &[Card], rules: HandEvalRules) -> HandResult {
    if cards.is_empty() {
        return HandResult::empty();
    }

    let mut caveats = Vec::new();
    if rules.shortcut && rules.four_fingers {
        log::warn!("shortcut only applies to five-card straights; four fingers runs stay gapless");
        caveats.push(HandCaveat::ShortcutIgnoresFourFingers);
    }

    let groups = rank_groups(cards);
    let all: Vec<usize> = (0..cards.len()).collect();
    let flush = find_flush(cards, rules);
    let straight = find_straight(cards, &all, rules);
    let of_a_kind = |count: usize| groups.iter().find(|group| group.members.len() >= count);
    let full_house = full_house(&groups);

    let (kind, members, description) = if let Some((five, flush)) = of_a_kind(5)
        .zip(flush.as_ref())
        .filter(|(five, flush)| subset(&five.members, &flush.members))
    {
        (
            HandKind::FlushFive,
            five.members.clone(),
            format!("Flush Five ({}, {})", five.rank.plural(), suit_label(flush.suit, rules)),
        )
    } else if let Some(((three, two), flush)) = full_house
        .zip(flush.as_ref())
        .filter(|((three, two), flush)| {
            subset(&three.members, &flush.members) && subset(&two.members, &flush.members)
        })
    {
        (
            HandKind::FlushHouse,
            union(&three.members, &two.members),
            format!(
                "Flush House ({} over {}, {})",
                three.rank.plural(),
                two.rank.plural(),
                suit_label(flush.suit, rules)
            ),
        )
    } else if let Some(five) = of_a_kind(5) {
        (
            HandKind::FiveOfAKind,
            five.members.clone(),
            format!("Five of a Kind ({})", five.rank.plural()),
        )
    } else if let Some((flush, run)) = flush
        .as_ref()
        .and_then(|flush| find_straight(cards, &flush.members, rules).map(|run| (flush, run)))
    {
        let members = union(&flush.members, &run.members);
        if run.is_royal() {
            (
                HandKind::RoyalFlush,
                members,
                format!("Royal Flush ({})", suit_label(flush.suit, rules)),
            )
        } else {
            (
                HandKind::StraightFlush,
                members,
                format!("Straight Flush ({}, {})", suit_label(flush.suit, rules), run.span()),
            )
        }
    } else if let Some(four) = of_a_kind(4) {
        (
            HandKind::FourOfAKind,
            four.members.clone(),
            format!("Four of a Kind ({})", four.rank.plural()),
        )
    } else if let Some((three, two)) = full_house {
        (
            HandKind::FullHouse,
            union(&three.members, &two.members),
            format!("Full House ({} over {})", three.rank.plural(), two.rank.plural()),
        )
    } else if let Some(flush) = flush.as_ref() {
        (
            HandKind::Flush,
            flush.members.clone(),
            format!("Flush ({})", suit_label(flush.suit, rules)),
        )
    } else if let Some(run) = straight.as_ref() {
        (
            HandKind::Straight,
            run.members.clone(),
            format!("Straight ({})", run.span()),
        )
    } else if let Some(three) = of_a_kind(3) {
        (
            HandKind::ThreeOfAKind,
            three.members.clone(),
            format!("Three of a Kind ({})", three.rank.plural()),
        )
    } else if let Some((high, low)) = two_pair(&groups) {
        (
            HandKind::TwoPair,
            union(&high.members, &low.members),
            format!("Two Pair ({} and {})", high.rank.plural(), low.rank.plural()),
        )
    } else if let Some(pair) = of_a_kind(2) {
        (
            HandKind::Pair,
            pair.members.clone(),
            format!("Pair of {}", pair.rank.plural()),
        )
    } else {
        match groups.first() {
            Some(high) => (
                HandKind::HighCard,
                vec![high.members[0]],
                format!("High Card ({})", high.rank),
            ),
            None => (HandKind::HighCard, Vec::new(), "High Card (Stone)".to_string()),
        }
    };

    let stones = cards
        .iter()
        .enumerate()
        .filter(|(_, card)| card.is_stone())
        .map(|(idx, _)| idx);
    let mut scoring: Vec<usize> = members.into_iter().chain(stones).collect();
    scoring.sort_unstable();
    scoring.dedup();
    let kickers = (0..cards.len().min(HAND_SIZE))
        .filter(|idx| scoring.binary_search(idx).is_err())
        .collect();

    let (base_chips, base_mult) = kind.default_base();
    HandResult {
        kind,
        base_chips,
        base_mult,
        scoring,
        kickers,
        description,
        caveats,
    }
}

/// Highest rank first; members keep input order.
fn rank_groups(cards: &[Card]) -> Vec<RankGroup> {
    let mut by_rank: BTreeMap<u8, RankGroup> = BTreeMap::new();
    for (idx, card) in cards.iter().enumerate() {
        if card.is_stone() {
            continue;
        }
        by_rank
            .entry(card.rank.value())
            .or_insert_with(|| RankGroup {
                rank: card.rank,
                members: Vec::new(),
            })
            .members
            .push(idx);
    }
    by_rank.into_values().rev().collect()
}

fn full_house(groups: &[RankGroup]) -> Option<(&RankGroup, &RankGroup)> {
    let three = groups.iter().find(|group| group.members.len() >= 3)?;
    let two = groups
        .iter()
        .find(|group| group.rank != three.rank && group.members.len() >= 2)?;
    Some((three, two))
}

fn two_pair(groups: &[RankGroup]) -> Option<(&RankGroup, &RankGroup)> {
    let mut pairs = groups.iter().filter(|group| group.members.len() >= 2);
    let high = pairs.next()?;
    let low = pairs.next()?;
    Some((high, low))
}

/// Wild cards join every suit group; with smeared suits only the two colour
/// groups exist. The largest group wins, earlier groups on ties.
fn find_flush(cards: &[Card], rules: HandEvalRules) -> Option<Flush> {
    let keys: &[Suit] = if rules.smeared_suits {
        &[Suit::Spades, Suit::Hearts]
    } else {
        &Suit::ALL
    };
    let mut best: Option<Flush> = None;
    for &suit in keys {
        let members: Vec<usize> = cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.matches_suit(suit, rules.smeared_suits))
            .map(|(idx, _)| idx)
            .collect();
        if members.len() < rules.threshold() {
            continue;
        }
        if best
            .as_ref()
            .map(|current| members.len() > current.members.len())
            .unwrap_or(true)
        {
            best = Some(Flush { suit, members });
        }
    }
    best
}

/// Searches `pool` for a straight. The first card of each rank (input order)
/// fills that rank's slot.
fn find_straight(cards: &[Card], pool: &[usize], rules: HandEvalRules) -> Option<Straight> {
    let mut first_by_value: BTreeMap<u8, usize> = BTreeMap::new();
    for &idx in pool {
        let card = &cards[idx];
        if card.is_stone() {
            continue;
        }
        first_by_value.entry(card.rank.value()).or_insert(idx);
    }
    let values: Vec<u8> = first_by_value.keys().copied().collect();
    let threshold = rules.threshold();

    let mut best: Option<Vec<u8>> = None;
    let consider = |run: &[u8], best: &mut Option<Vec<u8>>| {
        if run.len() >= threshold
            && best.as_ref().map(|b| run.len() >= b.len()).unwrap_or(true)
        {
            *best = Some(run.to_vec());
        }
    };
    let mut run: Vec<u8> = Vec::new();
    for &value in &values {
        if run.last().map(|&last| value != last + 1).unwrap_or(false) {
            consider(&run, &mut best);
            run.clear();
        }
        run.push(value);
    }
    consider(&run, &mut best);

    let short = |best: &Option<Vec<u8>>| best.as_ref().map(|b| b.len() < 5).unwrap_or(true);
    if short(&best) && [14, 2, 3, 4, 5].iter().all(|v| first_by_value.contains_key(v)) {
        best = Some(vec![14, 2, 3, 4, 5]);
    }
    if rules.shortcut && short(&best) {
        best = values
            .windows(5)
            .rev()
            .find(|window| one_gap_run(window))
            .map(|window| window.to_vec())
            .or(best);
    }

    let values = best?;
    let mut members: Vec<usize> = values.iter().map(|value| first_by_value[value]).collect();
    members.sort_unstable();
    let ranks = values.iter().filter_map(|&value| Rank::from_value(value)).collect();
    Some(Straight { ranks, members })
}

fn one_gap_run(window: &[u8]) -> bool {
    let mut gaps = 0;
    for pair in window.windows(2) {
        match pair[1] - pair[0] {
            1 => {}
            2 => gaps += 1,
            _ => return false,
        }
    }
    gaps <= 1
}

fn subset(inner: &[usize], outer: &[usize]) -> bool {
    inner.iter().all(|idx| outer.contains(idx))
}

fn union(left: &[usize], right: &[usize]) -> Vec<usize> {
    let mut merged: Vec<usize> = left.iter().chain(right).copied().collect();
    merged.sort_unstable();
    merged.dedup();
    merged
}

fn suit_label(suit: Suit, rules: HandEvalRules) -> &'static str {
    if rules.smeared_suits {
        if suit.is_red() {
            "Red"
        } else {
            "Black"
        }
    } else {
        match suit {
            Suit::Spades => "Spades",
            Suit::Hearts => "Hearts",
            Suit::Clubs => "Clubs",
            Suit::Diamonds => "Diamonds",
        }
    }
}
