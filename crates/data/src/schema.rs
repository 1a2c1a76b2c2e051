//! On-disk shapes. Tags stay strings here and are parsed through the core
//! `FromStr` impls so an unknown tag names itself in the error.

use crate::{Expectation, Scenario};
use anyhow::Context;
use chipmult_core::{
    jokers, Card, Edition, Enhancement, JokerSlot, JokerVars, ResolveMode, Seal, SessionCounters,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardSpec {
    Code(String),
    Detailed(CardDetail),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardDetail {
    pub code: String,
    #[serde(default)]
    pub enhancement: Option<String>,
    #[serde(default)]
    pub seal: Option<String>,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub debuffed: bool,
    #[serde(default)]
    pub bonus_chips: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JokerSpec {
    pub id: String,
    #[serde(default)]
    pub edition: Option<String>,
    #[serde(default)]
    pub vars: JokerVars,
    #[serde(default)]
    pub disabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFile {
    pub name: String,
    pub played: Vec<CardSpec>,
    #[serde(default)]
    pub held: Vec<CardSpec>,
    #[serde(default)]
    pub jokers: Vec<JokerSpec>,
    #[serde(default)]
    pub session: SessionCounters,
    #[serde(default)]
    pub preview: bool,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub amplifier: u32,
    #[serde(default)]
    pub expect: Option<Expectation>,
}

impl CardSpec {
    pub fn to_card(&self) -> anyhow::Result<Card> {
        match self {
            CardSpec::Code(code) => Ok(code.parse()?),
            CardSpec::Detailed(detail) => detail.to_card(),
        }
    }
}

impl CardDetail {
    pub fn to_card(&self) -> anyhow::Result<Card> {
        let mut card: Card = self.code.parse()?;
        card.enhancement = self
            .enhancement
            .as_deref()
            .map(str::parse::<Enhancement>)
            .transpose()?;
        card.seal = self.seal.as_deref().map(str::parse::<Seal>).transpose()?;
        card.edition = self
            .edition
            .as_deref()
            .map(str::parse::<Edition>)
            .transpose()?;
        card.debuffed = self.debuffed;
        card.bonus_chips = self.bonus_chips;
        Ok(card)
    }
}

impl JokerSpec {
    pub fn to_slot(&self) -> anyhow::Result<JokerSlot> {
        let mut slot = jokers::slot(&self.id)?;
        slot.edition = self
            .edition
            .as_deref()
            .map(str::parse::<Edition>)
            .transpose()?;
        slot.vars = self.vars.clone();
        slot.disabled = self.disabled;
        Ok(slot)
    }
}

impl ScenarioFile {
    pub fn into_scenario(self) -> anyhow::Result<Scenario> {
        let played = cards(&self.played).context("played cards")?;
        let held = cards(&self.held).context("held cards")?;
        let jokers = self
            .jokers
            .iter()
            .enumerate()
            .map(|(index, spec)| spec.to_slot().with_context(|| format!("joker {index}")))
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Scenario {
            name: self.name,
            played,
            held,
            jokers,
            session: self.session,
            mode: if self.preview {
                ResolveMode::Preview
            } else {
                ResolveMode::Commit
            },
            seed: self.seed,
            amplifier: self.amplifier,
            expect: self.expect,
        })
    }
}

fn cards(specs: &[CardSpec]) -> anyhow::Result<Vec<Card>> {
    specs
        .iter()
        .enumerate()
        .map(|(index, spec)| spec.to_card().with_context(|| format!("card {index}")))
        .collect()
}
