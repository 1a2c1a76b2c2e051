//! The joker handler contract.
//!
//! A handler answers three questions: which static capabilities it grants
//! (read before classification), whether it retriggers a given card, and
//! what it contributes for a trigger. None of these may mutate anything;
//! state changes are returned as writes and committed by the pipeline.

use crate::{Card, Contribution, Edition, HandEvalRules, HandKind, HandResult, ProbabilityModifier};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

pub type JokerVars = HashMap<String, f64>;

/// Rule relaxations granted by jokers, harvested before classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    pub four_fingers: bool,
    pub shortcut: bool,
    pub smeared_suits: bool,
    /// Every played card scores.
    pub splash: bool,
}

impl Capabilities {
    pub fn union(self, other: Capabilities) -> Capabilities {
        Capabilities {
            four_fingers: self.four_fingers || other.four_fingers,
            shortcut: self.shortcut || other.shortcut,
            smeared_suits: self.smeared_suits || other.smeared_suits,
            splash: self.splash || other.splash,
        }
    }

    pub fn hand_rules(self) -> HandEvalRules {
        HandEvalRules {
            smeared_suits: self.smeared_suits,
            four_fingers: self.four_fingers,
            shortcut: self.shortcut,
        }
    }
}

/// Counters owned by the surrounding game; read-only here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionCounters {
    pub money: i64,
    pub hands_left: u32,
    pub discards_left: u32,
    pub deck_size: u32,
    pub hand_levels: HashMap<HandKind, u32>,
    pub hand_play_counts: HashMap<HandKind, u32>,
    pub last_hand: Option<HandKind>,
}

impl SessionCounters {
    /// Levels start at 1.
    pub fn level(&self, kind: HandKind) -> u32 {
        self.hand_levels.get(&kind).copied().unwrap_or(1).max(1)
    }
}

/// Everything a handler may look at for one resolution.
#[derive(Debug, Clone, Copy)]
pub struct HandContext<'a> {
    pub played: &'a [Card],
    pub held: &'a [Card],
    pub hand: &'a HandResult,
    pub rules: HandEvalRules,
    pub session: &'a SessionCounters,
}

impl HandContext<'_> {
    pub fn scoring_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.hand
            .scoring
            .iter()
            .filter_map(|index| self.played.get(*index))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CardContext<'a> {
    pub card: &'a Card,
    /// Index into `played` or `held`.
    pub index: usize,
    /// Position among the scoring cards, or among the held cards.
    pub position: usize,
    pub scene: &'a HandContext<'a>,
}

#[derive(Debug, Clone, Copy)]
pub enum Trigger<'a> {
    Scored(CardContext<'a>),
    Held(CardContext<'a>),
    Independent(&'a HandContext<'a>),
}

impl<'a> Trigger<'a> {
    pub fn scene(&self) -> &'a HandContext<'a> {
        match *self {
            Trigger::Scored(card) | Trigger::Held(card) => card.scene,
            Trigger::Independent(scene) => scene,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JokerFollowUp {
    /// Permanent chips for the triggering scored card.
    CardBonus { chips: i64 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JokerDelta {
    pub contribution: Contribution,
    /// State writes, applied to the joker's own record on commit.
    pub writes: Vec<(String, f64)>,
    pub follow_ups: Vec<JokerFollowUp>,
}

impl JokerDelta {
    pub fn chips(chips: i64) -> Self {
        Self::from_contribution(Contribution {
            chips,
            ..Default::default()
        })
    }

    pub fn mult(mult: f64) -> Self {
        Self::from_contribution(Contribution {
            mult,
            ..Default::default()
        })
    }

    pub fn x_mult(x_mult: f64) -> Self {
        Self::from_contribution(Contribution {
            x_mult,
            ..Default::default()
        })
    }

    pub fn money(money: i64) -> Self {
        Self::from_contribution(Contribution {
            money,
            ..Default::default()
        })
    }

    pub fn from_contribution(contribution: Contribution) -> Self {
        Self {
            contribution,
            ..Default::default()
        }
    }

    pub fn write(mut self, key: &str, value: f64) -> Self {
        self.writes.push((key.to_string(), value));
        self
    }

    pub fn follow_up(mut self, follow_up: JokerFollowUp) -> Self {
        self.follow_ups.push(follow_up);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.contribution.is_neutral() && self.writes.is_empty() && self.follow_ups.is_empty()
    }
}

pub trait JokerHandler: fmt::Debug {
    fn id(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    fn retrigger_scored(&self, _card: &CardContext<'_>) -> bool {
        false
    }

    fn retrigger_held(&self, _card: &CardContext<'_>) -> bool {
        false
    }

    /// Called once per trigger; `vars` is the record of the joker whose
    /// handler this is, which for a copy is the copied joker's.
    fn effect(
        &self,
        _trigger: &Trigger<'_>,
        _vars: &JokerVars,
        _probability: &mut ProbabilityModifier,
    ) -> JokerDelta {
        JokerDelta::default()
    }
}

#[derive(Debug, Clone)]
pub enum JokerKind {
    Handler(Rc<dyn JokerHandler>),
    /// Runs the handler of the joker to its right.
    CopyRight,
    /// Runs the handler of the leftmost other joker.
    CopyLeftmost,
}

#[derive(Debug, Clone)]
pub struct JokerSlot {
    pub id: String,
    pub kind: JokerKind,
    pub edition: Option<Edition>,
    pub vars: JokerVars,
    pub disabled: bool,
}

impl JokerSlot {
    pub fn new(id: impl Into<String>, kind: JokerKind) -> Self {
        Self {
            id: id.into(),
            kind,
            edition: None,
            vars: JokerVars::new(),
            disabled: false,
        }
    }

    pub fn from_handler(handler: Rc<dyn JokerHandler>) -> Self {
        Self::new(handler.id(), JokerKind::Handler(handler))
    }

    pub fn with_edition(mut self, edition: Edition) -> Self {
        self.edition = Some(edition);
        self
    }

    pub fn with_var(mut self, key: &str, value: f64) -> Self {
        self.vars.insert(key.to_string(), value);
        self
    }

    pub fn handler(&self) -> Option<&Rc<dyn JokerHandler>> {
        match &self.kind {
            JokerKind::Handler(handler) => Some(handler),
            JokerKind::CopyRight | JokerKind::CopyLeftmost => None,
        }
    }

    pub fn var(&self, key: &str) -> f64 {
        self.vars.get(key).copied().unwrap_or(0.0)
    }
}

pub fn var(vars: &JokerVars, key: &str) -> f64 {
    vars.get(key).copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Flags;

    impl JokerHandler for Flags {
        fn id(&self) -> &'static str {
            "flags"
        }

        fn capabilities(&self) -> Capabilities {
            Capabilities {
                shortcut: true,
                ..Default::default()
            }
        }
    }

    #[test]
    fn capabilities_union() {
        let a = Capabilities {
            four_fingers: true,
            ..Default::default()
        };
        let rules = a.union(Flags.capabilities()).hand_rules();
        assert!(rules.four_fingers && rules.shortcut);
        assert!(!rules.smeared_suits);
    }

    #[test]
    fn slot_builders() {
        let slot = JokerSlot::from_handler(Rc::new(Flags))
            .with_edition(Edition::Foil)
            .with_var("mult", 3.0);
        assert_eq!(slot.id, "flags");
        assert_eq!(slot.var("mult"), 3.0);
        assert_eq!(slot.var("missing"), 0.0);
        assert!(slot.handler().is_some());
        assert!(JokerSlot::new("copy", JokerKind::CopyRight).handler().is_none());
    }

    #[test]
    fn delta_builders() {
        let delta = JokerDelta::mult(4.0).write("mult", 4.0);
        assert_eq!(delta.contribution.mult, 4.0);
        assert_eq!(delta.writes, vec![("mult".to_string(), 4.0)]);
        assert!(!delta.is_empty());
        assert!(JokerDelta::default().is_empty());
    }

    #[test]
    fn session_levels_default_to_one() {
        let mut session = SessionCounters::default();
        assert_eq!(session.level(HandKind::Pair), 1);
        session.hand_levels.insert(HandKind::Pair, 3);
        assert_eq!(session.level(HandKind::Pair), 3);
    }
}
