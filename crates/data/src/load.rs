use crate::schema::ScenarioFile;
use crate::Scenario;
use anyhow::{bail, Context};
use chipmult_core::{CardAttrRules, GameConfig, HandRule, RankRule};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};

const HANDS_FILE: &str = "hands.json";
const RANKS_FILE: &str = "ranks.json";
const CARD_ATTRIBUTES_FILE: &str = "card_attributes.json";

const BUILTIN_HANDS: &str = include_str!("../../../assets/hands.json");
const BUILTIN_RANKS: &str = include_str!("../../../assets/ranks.json");
const BUILTIN_CARD_ATTRIBUTES: &str = include_str!("../../../assets/card_attributes.json");

pub fn load_game_config(dir: &Path) -> anyhow::Result<GameConfig> {
    let hands: Vec<HandRule> = load_json(dir.join(HANDS_FILE))?;
    let ranks: Vec<RankRule> = load_json(dir.join(RANKS_FILE))?;
    let card_attrs_path = dir.join(CARD_ATTRIBUTES_FILE);
    let card_attrs: CardAttrRules = if card_attrs_path.exists() {
        load_json(card_attrs_path)?
    } else {
        CardAttrRules::default()
    };
    let config = GameConfig {
        hands,
        ranks,
        card_attrs,
    };
    config
        .validate()
        .with_context(|| format!("validate config in {}", dir.display()))?;
    log::debug!(
        "loaded {} hand rules and {} rank rules from {}",
        config.hands.len(),
        config.ranks.len(),
        dir.display()
    );
    Ok(config)
}

/// The tables shipped with the crate.
pub fn builtin_config() -> anyhow::Result<GameConfig> {
    let config = GameConfig {
        hands: serde_json::from_str(BUILTIN_HANDS).context("parse builtin hands")?,
        ranks: serde_json::from_str(BUILTIN_RANKS).context("parse builtin ranks")?,
        card_attrs: serde_json::from_str(BUILTIN_CARD_ATTRIBUTES)
            .context("parse builtin card attributes")?,
    };
    config.validate().context("validate builtin config")?;
    Ok(config)
}

pub fn parse_scenario(raw: &str) -> anyhow::Result<Scenario> {
    let file: ScenarioFile = serde_json::from_str(raw).context("parse scenario")?;
    let name = file.name.clone();
    file.into_scenario()
        .with_context(|| format!("scenario {name}"))
}

pub fn load_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let file: ScenarioFile = load_json(path)?;
    file.into_scenario()
        .with_context(|| format!("build {}", path.display()))
}

/// Every `*.json` scenario in `dir`, ordered by file name.
pub fn load_scenarios(dir: &Path) -> anyhow::Result<Vec<Scenario>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("read {}", dir.display()))?
        .map(|entry| entry.map(|entry| entry.path()))
        .collect::<Result<_, _>>()
        .with_context(|| format!("list {}", dir.display()))?;
    paths.retain(|path| path.extension().is_some_and(|ext| ext == "json"));
    paths.sort();
    if paths.is_empty() {
        bail!("no scenarios in {}", dir.display());
    }
    paths.iter().map(|path| load_scenario(path)).collect()
}

fn load_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}
