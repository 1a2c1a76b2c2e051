//! The single source of randomness for anything that affects a score.
//!
//! Every roll goes through [`ProbabilityModifier::check`], which applies the
//! amplifier (`p * 2^n`, clamped to 1) and records the draw in a bounded log.

use crate::RngState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

pub const PROBABILITY_LOG_CAPACITY: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityEntry {
    pub base: f64,
    pub modified: f64,
    pub result: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
}

#[derive(Debug, Clone)]
pub struct ProbabilityModifier {
    amplifier: u32,
    log: VecDeque<ProbabilityEntry>,
    rng: RngState,
}

impl ProbabilityModifier {
    pub fn new(seed: u64) -> Self {
        Self::with_rng(RngState::from_seed(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(RngState::from_entropy())
    }

    pub fn with_rng(rng: RngState) -> Self {
        Self {
            amplifier: 0,
            log: VecDeque::with_capacity(PROBABILITY_LOG_CAPACITY),
            rng,
        }
    }

    pub fn amplifier(&self) -> u32 {
        self.amplifier
    }

    pub fn set_amplifier(&mut self, amplifier: u32) {
        self.amplifier = amplifier;
    }

    /// Doubles every chance once more.
    pub fn amplify(&mut self) {
        self.amplifier = self.amplifier.saturating_add(1);
    }

    pub fn apply(&self, base: f64) -> f64 {
        if !(base > 0.0) {
            return 0.0;
        }
        let factor = 2f64.powi(self.amplifier.min(2048) as i32);
        (base * factor).min(1.0)
    }

    pub fn check(&mut self, base: f64) -> bool {
        let modified = self.apply(base);
        let result = self.rng.next_f64() < modified;
        if self.log.len() == PROBABILITY_LOG_CAPACITY {
            self.log.pop_front();
        }
        self.log.push_back(ProbabilityEntry {
            base,
            modified,
            result,
            timestamp: now_millis(),
        });
        log::trace!("chance {base} -> {modified}: {result}");
        result
    }

    /// `1 in odds`; zero odds never fire and are not logged.
    pub fn one_in(&mut self, odds: u32) -> bool {
        if odds == 0 {
            return false;
        }
        self.check(1.0 / odds as f64)
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &ProbabilityEntry> + '_ {
        self.log.iter()
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Clears the amplifier and the log and replays the rng from its seed.
    pub fn reset(&mut self) {
        self.amplifier = 0;
        self.log.clear();
        self.rng.reseed();
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amplifier_doubles_and_clamps() {
        let mut probability = ProbabilityModifier::new(1);
        assert_eq!(probability.apply(0.25), 0.25);
        probability.set_amplifier(1);
        assert_eq!(probability.apply(0.25), 0.5);
        probability.set_amplifier(2);
        assert_eq!(probability.apply(0.25), 1.0);
        probability.set_amplifier(3);
        assert_eq!(probability.apply(0.25), 1.0);
    }

    #[test]
    fn zero_and_negative_chances_never_fire() {
        let mut probability = ProbabilityModifier::new(1);
        probability.set_amplifier(4000);
        assert_eq!(probability.apply(0.0), 0.0);
        assert_eq!(probability.apply(-0.5), 0.0);
        assert_eq!(probability.apply(f64::NAN), 0.0);
        assert!(!probability.check(0.0));
        assert!(!probability.one_in(0));
        assert_eq!(probability.len(), 1);
    }

    #[test]
    fn certain_chances_always_fire() {
        let mut probability = ProbabilityModifier::new(9);
        for _ in 0..50 {
            assert!(probability.check(1.0));
        }
        probability.set_amplifier(10);
        for _ in 0..50 {
            assert!(probability.one_in(15));
        }
    }

    #[test]
    fn log_records_every_draw() {
        let mut probability = ProbabilityModifier::new(3);
        probability.set_amplifier(1);
        let result = probability.check(0.3);
        let entry = probability.entries().last().cloned().expect("entry");
        assert_eq!(entry.base, 0.3);
        assert_eq!(entry.modified, 0.6);
        assert_eq!(entry.result, result);
    }

    #[test]
    fn log_keeps_newest_thousand() {
        let mut probability = ProbabilityModifier::new(5);
        for i in 0..1200 {
            probability.check(i as f64 / 1200.0);
        }
        assert_eq!(probability.len(), PROBABILITY_LOG_CAPACITY);
        let oldest = probability.entries().next().expect("oldest");
        assert_eq!(oldest.base, 200.0 / 1200.0);
    }

    #[test]
    fn reset_restores_initial_state() {
        let mut probability = ProbabilityModifier::new(11);
        let first: Vec<bool> = (0..20).map(|_| probability.check(0.5)).collect();
        probability.set_amplifier(3);
        probability.reset();
        assert_eq!(probability.amplifier(), 0);
        assert!(probability.is_empty());
        let again: Vec<bool> = (0..20).map(|_| probability.check(0.5)).collect();
        assert_eq!(first, again);
    }
}
