use crate::{ConfigError, Edition, Enhancement, HandKind, Rank, Seal};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandRule {
    pub hand: HandKind,
    #[serde(default)]
    pub display_name: String,
    pub base_chips: i64,
    pub base_mult: f64,
    #[serde(default)]
    pub level_chips: i64,
    #[serde(default)]
    pub level_mult: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRule {
    pub rank: Rank,
    pub chips: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnhancementDef {
    pub chips: i64,
    pub mult_add: f64,
    /// Applied once per scored card; 0 means no factor.
    pub mult_mul: f64,
    /// Applied once per held card; 0 means no factor.
    pub mult_mul_held: f64,
    pub destroy_odds: u32,
    pub prob_mult_odds: u32,
    pub prob_mult_add: f64,
    pub prob_money_odds: u32,
    pub prob_money_add: i64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditionDef {
    pub chips: i64,
    pub mult_add: f64,
    pub mult_mul: f64,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SealDef {
    pub money_scored: i64,
}

/// Balance values for enhancements, editions and seals. Entries missing from
/// the maps fall back to the standard values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardAttrRules {
    pub enhancements: HashMap<Enhancement, EnhancementDef>,
    pub editions: HashMap<Edition, EditionDef>,
    pub seals: HashMap<Seal, SealDef>,
}

impl CardAttrRules {
    pub fn enhancement(&self, kind: Enhancement) -> EnhancementDef {
        self.enhancements
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_enhancement(kind))
    }

    pub fn edition(&self, kind: Edition) -> EditionDef {
        self.editions
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_edition(kind))
    }

    pub fn seal(&self, kind: Seal) -> SealDef {
        self.seals
            .get(&kind)
            .copied()
            .unwrap_or_else(|| default_seal(kind))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for kind in Enhancement::ALL {
            let def = self.enhancement(kind);
            non_negative("enhancement.chips", def.chips)?;
            non_negative("enhancement.prob_money_add", def.prob_money_add)?;
            factor("enhancement.mult_mul", def.mult_mul)?;
            factor("enhancement.mult_mul_held", def.mult_mul_held)?;
            if def.prob_mult_add != 0.0 && def.prob_mult_odds == 0 {
                return Err(ConfigError::ZeroOdds {
                    field: "enhancement.prob_mult_odds",
                });
            }
            if def.prob_money_add != 0 && def.prob_money_odds == 0 {
                return Err(ConfigError::ZeroOdds {
                    field: "enhancement.prob_money_odds",
                });
            }
        }
        for kind in Edition::ALL {
            let def = self.edition(kind);
            non_negative("edition.chips", def.chips)?;
            factor("edition.mult_mul", def.mult_mul)?;
        }
        for kind in Seal::ALL {
            non_negative("seal.money_scored", self.seal(kind).money_scored)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameConfig {
    #[serde(default)]
    pub hands: Vec<HandRule>,
    #[serde(default)]
    pub ranks: Vec<RankRule>,
    #[serde(default)]
    pub card_attrs: CardAttrRules,
}

impl GameConfig {
    /// The standard tables, spelled out row by row.
    pub fn standard() -> Self {
        let hands = HandKind::ALL
            .into_iter()
            .filter(|kind| *kind != HandKind::RoyalFlush)
            .map(|hand| {
                let (base_chips, base_mult) = hand.default_base();
                let (level_chips, level_mult) = hand.default_level_step();
                HandRule {
                    hand,
                    display_name: hand.display_name().to_string(),
                    base_chips,
                    base_mult,
                    level_chips,
                    level_mult,
                }
            })
            .collect();
        let ranks = Rank::ALL
            .into_iter()
            .map(|rank| RankRule {
                rank,
                chips: default_rank_chips(rank),
            })
            .collect();
        Self {
            hands,
            ranks,
            card_attrs: CardAttrRules::default(),
        }
    }

    pub fn hand_rule(&self, kind: HandKind) -> Option<&HandRule> {
        self.hands.iter().find(|rule| rule.hand == kind)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for rule in &self.hands {
            if !seen.insert(rule.hand) {
                return Err(ConfigError::DuplicateRule(rule.hand.id().to_string()));
            }
            if rule.base_chips < 0 {
                return Err(ConfigError::NegativeHandChips {
                    hand: rule.hand.id().to_string(),
                    chips: rule.base_chips,
                });
            }
            if !(rule.base_mult > 0.0) {
                return Err(ConfigError::NonPositiveHandMult {
                    hand: rule.hand.id().to_string(),
                    mult: rule.base_mult,
                });
            }
        }
        let mut seen = HashSet::new();
        for rule in &self.ranks {
            if !seen.insert(rule.rank) {
                return Err(ConfigError::DuplicateRule(rule.rank.id().to_string()));
            }
            if rule.chips < 0 {
                return Err(ConfigError::NegativeRankChips {
                    rank: rule.rank.id().to_string(),
                    chips: rule.chips,
                });
            }
        }
        self.card_attrs.validate()
    }
}

pub fn default_rank_chips(rank: Rank) -> i64 {
    match rank {
        Rank::Ace => 11,
        Rank::Jack | Rank::Queen | Rank::King => 10,
        other => other.value() as i64,
    }
}

fn default_enhancement(kind: Enhancement) -> EnhancementDef {
    match kind {
        Enhancement::Bonus => EnhancementDef {
            chips: 30,
            ..Default::default()
        },
        Enhancement::Mult => EnhancementDef {
            mult_add: 4.0,
            ..Default::default()
        },
        Enhancement::Glass => EnhancementDef {
            mult_mul: 2.0,
            destroy_odds: 4,
            ..Default::default()
        },
        Enhancement::Steel => EnhancementDef {
            mult_mul_held: 1.5,
            ..Default::default()
        },
        Enhancement::Stone => EnhancementDef {
            chips: 50,
            ..Default::default()
        },
        Enhancement::Lucky => EnhancementDef {
            prob_mult_odds: 5,
            prob_mult_add: 20.0,
            prob_money_odds: 15,
            prob_money_add: 20,
            ..Default::default()
        },
        Enhancement::Wild | Enhancement::Gold => EnhancementDef::default(),
    }
}

fn default_edition(kind: Edition) -> EditionDef {
    match kind {
        Edition::Foil => EditionDef {
            chips: 50,
            ..Default::default()
        },
        Edition::Holographic => EditionDef {
            mult_add: 10.0,
            ..Default::default()
        },
        Edition::Polychrome => EditionDef {
            mult_mul: 1.5,
            ..Default::default()
        },
        Edition::Negative => EditionDef::default(),
    }
}

fn default_seal(kind: Seal) -> SealDef {
    match kind {
        Seal::Gold => SealDef { money_scored: 3 },
        Seal::Red | Seal::Blue | Seal::Purple => SealDef::default(),
    }
}

fn non_negative(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value < 0 {
        return Err(ConfigError::NegativeValue { field, value });
    }
    Ok(())
}

/// Zero disables a factor; anything else must be positive.
fn factor(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value == 0.0 || value > 0.0 {
        return Ok(());
    }
    Err(ConfigError::NonPositiveFactor { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_is_valid() {
        let config = GameConfig::standard();
        assert!(config.validate().is_ok());
        assert_eq!(config.hands.len(), 12);
        assert_eq!(config.ranks.len(), 13);
        let pair = config.hand_rule(HandKind::Pair).expect("pair rule");
        assert_eq!((pair.base_chips, pair.base_mult), (5, 2.0));
    }

    #[test]
    fn card_attr_defaults() {
        let attrs = CardAttrRules::default();
        assert_eq!(attrs.enhancement(Enhancement::Stone).chips, 50);
        assert_eq!(attrs.enhancement(Enhancement::Glass).destroy_odds, 4);
        assert_eq!(attrs.edition(Edition::Polychrome).mult_mul, 1.5);
        assert_eq!(attrs.seal(Seal::Gold).money_scored, 3);
    }

    #[test]
    fn rejects_bad_tables() {
        let mut config = GameConfig::standard();
        config.hands[0].base_mult = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveHandMult { .. })
        ));

        let mut config = GameConfig::standard();
        let duplicate = config.ranks[0].clone();
        config.ranks.push(duplicate);
        assert!(matches!(config.validate(), Err(ConfigError::DuplicateRule(_))));

        let mut config = GameConfig::standard();
        config.card_attrs.editions.insert(
            Edition::Polychrome,
            EditionDef {
                mult_mul: -1.0,
                ..Default::default()
            },
        );
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveFactor { .. })
        ));

        let mut config = GameConfig::standard();
        config.card_attrs.enhancements.insert(
            Enhancement::Lucky,
            EnhancementDef {
                prob_mult_add: 20.0,
                ..Default::default()
            },
        );
        assert!(matches!(config.validate(), Err(ConfigError::ZeroOdds { .. })));
    }
}
