use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Score {
    pub chips: i64,
    pub mult: f64,
}

impl Score {
    /// Unrounded `chips * mult`.
    pub fn total(&self) -> f64 {
        self.chips as f64 * self.mult
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum RuleEffect {
    AddChips(i64),
    AddMult(f64),
    MultiplyMult(f64),
    AddMoney(i64),
}

/// Additive parts sum, `x_mult` multiplies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Contribution {
    pub chips: i64,
    pub mult: f64,
    pub x_mult: f64,
    pub money: i64,
}

impl Default for Contribution {
    fn default() -> Self {
        Self {
            chips: 0,
            mult: 0.0,
            x_mult: 1.0,
            money: 0,
        }
    }
}

impl Contribution {
    pub fn apply(&mut self, effect: RuleEffect) {
        match effect {
            RuleEffect::AddChips(value) => self.chips += value,
            RuleEffect::AddMult(value) => self.mult += value,
            RuleEffect::MultiplyMult(value) => self.x_mult *= value,
            RuleEffect::AddMoney(value) => self.money += value,
        }
    }

    pub fn merge(&mut self, other: &Contribution) {
        self.chips += other.chips;
        self.mult += other.mult;
        self.x_mult *= other.x_mult;
        self.money += other.money;
    }

    /// Repeats the additive parts; the factor is left alone.
    pub fn repeat_additive(&self, times: u32) -> Contribution {
        Contribution {
            chips: self.chips * times as i64,
            mult: self.mult * times as f64,
            x_mult: self.x_mult,
            money: self.money * times as i64,
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.chips == 0 && self.mult == 0.0 && self.x_mult == 1.0 && self.money == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_keeps_factor() {
        let mut contribution = Contribution::default();
        contribution.apply(RuleEffect::AddChips(11));
        contribution.apply(RuleEffect::AddMult(4.0));
        contribution.apply(RuleEffect::MultiplyMult(2.0));
        contribution.apply(RuleEffect::AddMoney(3));
        let repeated = contribution.repeat_additive(3);
        assert_eq!(repeated.chips, 33);
        assert_eq!(repeated.mult, 12.0);
        assert_eq!(repeated.x_mult, 2.0);
        assert_eq!(repeated.money, 9);
    }

    #[test]
    fn merge_multiplies_factors() {
        let mut total = Contribution::default();
        let mut steel = Contribution::default();
        steel.apply(RuleEffect::MultiplyMult(1.5));
        total.merge(&steel);
        total.merge(&steel);
        assert_eq!(total.x_mult, 2.25);
        assert!(!total.is_neutral());
        assert!(Contribution::default().is_neutral());
    }

    #[test]
    fn score_total_is_unrounded() {
        let score = Score {
            chips: 27,
            mult: 1.5,
        };
        assert_eq!(score.total(), 40.5);
    }
}
