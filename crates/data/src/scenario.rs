use anyhow::ensure;
use chipmult_core::{
    score_play, Card, HandKind, JokerSlot, ProbabilityModifier, ResolveMode, ScoreRequest,
    ScoreResult, ScoreTables, SessionCounters,
};
use serde::{Deserialize, Serialize};

/// A play with everything needed to score it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub played: Vec<Card>,
    pub held: Vec<Card>,
    pub jokers: Vec<JokerSlot>,
    pub session: SessionCounters,
    pub mode: ResolveMode,
    pub seed: u64,
    pub amplifier: u32,
    pub expect: Option<Expectation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Expectation {
    #[serde(default)]
    pub hand: Option<HandKind>,
    #[serde(default)]
    pub chips: Option<i64>,
    #[serde(default)]
    pub mult: Option<f64>,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub money: Option<i64>,
}

impl Scenario {
    pub fn probability(&self) -> ProbabilityModifier {
        let mut probability = ProbabilityModifier::new(self.seed);
        probability.set_amplifier(self.amplifier);
        probability
    }

    /// Scores with a fresh probability source; joker state commits into
    /// `self.jokers` unless the scenario is a preview.
    pub fn run(&mut self, tables: &ScoreTables) -> ScoreResult {
        let mut probability = self.probability();
        self.run_with(tables, &mut probability)
    }

    pub fn run_with(
        &mut self,
        tables: &ScoreTables,
        probability: &mut ProbabilityModifier,
    ) -> ScoreResult {
        let request = ScoreRequest {
            mode: self.mode,
            ..ScoreRequest::new(&self.played, &self.held, &self.session)
        };
        score_play(request, &mut self.jokers, tables, probability)
    }

    pub fn check(&self, result: &ScoreResult) -> anyhow::Result<()> {
        let Some(expect) = &self.expect else {
            return Ok(());
        };
        expect.check(result)
    }
}

impl Expectation {
    pub fn check(&self, result: &ScoreResult) -> anyhow::Result<()> {
        if let Some(hand) = self.hand {
            ensure!(
                result.hand.kind == hand,
                "expected {hand}, got {}",
                result.hand.kind
            );
        }
        if let Some(chips) = self.chips {
            ensure!(result.chips == chips, "expected {chips} chips, got {}", result.chips);
        }
        if let Some(mult) = self.mult {
            ensure!(close(result.mult, mult), "expected mult {mult}, got {}", result.mult);
        }
        if let Some(score) = self.score {
            ensure!(close(result.score, score), "expected score {score}, got {}", result.score);
        }
        if let Some(money) = self.money {
            ensure!(result.money == money, "expected ${money}, got ${}", result.money);
        }
        Ok(())
    }
}

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() <= 1e-9 * expected.abs().max(1.0)
}
