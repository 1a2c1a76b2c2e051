//! Per-card scoring: base chips, enhancement, seal and edition.
//!
//! Additive parts of the base value, enhancement and seal are repeated once
//! per trigger. Edition bonuses and every multiplicative factor (Glass,
//! Polychrome, held Steel) land exactly once per card.

use crate::{
    Card, CardAttrRules, Contribution, Enhancement, HandKind, ProbabilityModifier, RuleEffect,
    ScoreTables, Seal,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardRole {
    Played,
    Held,
    Discarded,
}

/// Requests reported to the owning game layer; never executed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFollowUp {
    Destroy,
    CreatePlanet(HandKind),
    CreateTarot,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardOutcome {
    pub role: CardRole,
    /// Zero for debuffed cards.
    pub triggers: u32,
    pub contribution: Contribution,
    pub follow_ups: Vec<CardFollowUp>,
}

impl CardOutcome {
    fn inert(role: CardRole) -> Self {
        Self {
            role,
            triggers: 0,
            contribution: Contribution::default(),
            follow_ups: Vec::new(),
        }
    }
}

/// Trigger count for a card: at least one, and at least two under a Red Seal.
pub fn effective_triggers(card: &Card, requested: u32) -> u32 {
    if card.seal == Some(Seal::Red) {
        requested.max(2)
    } else {
        requested.max(1)
    }
}

pub fn evaluate_card(
    card: &Card,
    role: CardRole,
    retriggers: u32,
    tables: &ScoreTables,
    last_hand: Option<HandKind>,
    probability: &mut ProbabilityModifier,
) -> CardOutcome {
    if card.debuffed {
        return CardOutcome::inert(role);
    }
    let attrs = &tables.card_attrs;
    let triggers = effective_triggers(card, retriggers);
    let mut repeated = Contribution::default();
    let mut once = Contribution::default();
    let mut follow_ups = Vec::new();

    match role {
        CardRole::Played => {
            let base = if card.is_stone() {
                attrs.enhancement(Enhancement::Stone).chips
            } else {
                tables.rank_chips(card.rank)
            };
            repeated.apply(RuleEffect::AddChips(base + card.bonus_chips));
            if let Some(kind) = card.enhancement.filter(|kind| *kind != Enhancement::Stone) {
                played_enhancement(
                    kind,
                    attrs,
                    probability,
                    &mut repeated,
                    &mut once,
                    &mut follow_ups,
                );
            }
            if card.seal == Some(Seal::Gold) {
                repeated.apply(RuleEffect::AddMoney(attrs.seal(Seal::Gold).money_scored));
            }
            if let Some(edition) = card.edition {
                let def = attrs.edition(edition);
                once.apply(RuleEffect::AddChips(def.chips));
                once.apply(RuleEffect::AddMult(def.mult_add));
                if def.mult_mul != 0.0 {
                    once.apply(RuleEffect::MultiplyMult(def.mult_mul));
                }
            }
        }
        CardRole::Held => {
            if let Some(kind) = card.enhancement {
                let held = attrs.enhancement(kind).mult_mul_held;
                if held != 0.0 {
                    once.apply(RuleEffect::MultiplyMult(held));
                }
            }
            if card.seal == Some(Seal::Blue) {
                if let Some(hand) = last_hand {
                    follow_ups.push(CardFollowUp::CreatePlanet(hand));
                }
            }
        }
        CardRole::Discarded => {
            if card.seal == Some(Seal::Purple) {
                follow_ups.push(CardFollowUp::CreateTarot);
            }
        }
    }

    let mut contribution = repeated.repeat_additive(triggers);
    contribution.merge(&once);
    CardOutcome {
        role,
        triggers,
        contribution,
        follow_ups,
    }
}

fn played_enhancement(
    kind: Enhancement,
    attrs: &CardAttrRules,
    probability: &mut ProbabilityModifier,
    repeated: &mut Contribution,
    once: &mut Contribution,
    follow_ups: &mut Vec<CardFollowUp>,
) {
    let def = attrs.enhancement(kind);
    repeated.apply(RuleEffect::AddChips(def.chips));
    repeated.apply(RuleEffect::AddMult(def.mult_add));
    // Both lucky rolls are independent and may fire together.
    if def.prob_mult_odds > 0 && probability.one_in(def.prob_mult_odds) {
        repeated.apply(RuleEffect::AddMult(def.prob_mult_add));
    }
    if def.prob_money_odds > 0 && probability.one_in(def.prob_money_odds) {
        repeated.apply(RuleEffect::AddMoney(def.prob_money_add));
    }
    if def.mult_mul != 0.0 {
        once.apply(RuleEffect::MultiplyMult(def.mult_mul));
    }
    if def.destroy_odds > 0 && probability.one_in(def.destroy_odds) {
        follow_ups.push(CardFollowUp::Destroy);
    }
}
