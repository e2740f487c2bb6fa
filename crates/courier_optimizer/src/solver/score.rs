use std::{
    cmp::Ordering,
    fmt::Display,
    iter,
    ops::{Add, AddAssign, Sub},
};

use schemars::JsonSchema;
use serde::Serialize;

/// Lexicographic score: unassigned required nodes first, then the objective cost.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Score {
    pub hard_score: f64,
    pub soft_score: f64,
}

impl Score {
    pub const MAX: Score = Score {
        hard_score: f64::MAX,
        soft_score: f64::MAX,
    };

    pub const ZERO: Score = Score {
        hard_score: 0.0,
        soft_score: 0.0,
    };

    pub fn new(hard_score: f64, soft_score: f64) -> Self {
        Score {
            hard_score,
            soft_score,
        }
    }

    pub fn hard(hard_score: f64) -> Self {
        Score {
            hard_score,
            soft_score: 0.0,
        }
    }

    pub fn soft(soft_score: f64) -> Self {
        Score {
            hard_score: 0.0,
            soft_score,
        }
    }

    /// A failing score leaves at least one required node unserved.
    pub fn is_failure(&self) -> bool {
        self.hard_score > 0.0
    }

    /// True when `self` beats `other` by more than rounding noise.
    pub fn improves_on(&self, other: &Score) -> bool {
        self.hard_score < other.hard_score
            || (self.hard_score == other.hard_score
                && self.soft_score < other.soft_score - 1e-9)
    }
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}hard/{:.2}soft", self.hard_score, self.soft_score)
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard_score
            .total_cmp(&other.hard_score)
            .then_with(|| self.soft_score.total_cmp(&other.soft_score))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl iter::Sum for Score {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, score| acc + score)
    }
}

impl Add<Score> for Score {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score + other.hard_score,
            soft_score: self.soft_score + other.soft_score,
        }
    }
}

impl AddAssign<Score> for Score {
    fn add_assign(&mut self, other: Score) {
        self.hard_score += other.hard_score;
        self.soft_score += other.soft_score;
    }
}

impl Sub<Score> for Score {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Score {
            hard_score: self.hard_score - other.hard_score,
            soft_score: self.soft_score - other.soft_score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_sum() {
        let scores = vec![Score::hard(1.0), Score::soft(5.0), Score::soft(2.5)];
        let total: Score = scores.into_iter().sum();
        assert_eq!(total, Score::new(1.0, 7.5));
    }

    #[test]
    fn test_unassigned_dominates_cost() {
        let infeasible = Score::new(1.0, 10.0);
        let expensive = Score::soft(1_000_000.0);

        assert!(expensive < infeasible);
        assert!(infeasible.is_failure());
        assert!(!expensive.is_failure());
    }

    #[test]
    fn test_improves_on_ignores_noise() {
        let a = Score::soft(100.0);
        assert!(!Score::soft(100.0 - 1e-12).improves_on(&a));
        assert!(Score::soft(99.0).improves_on(&a));
        assert!(Score::new(0.0, 500.0).improves_on(&Score::new(1.0, 0.0)));
    }

    #[test]
    fn test_score_cmp() {
        let mut scores = [Score::soft(3.0), Score::hard(1.0), Score::soft(1.0)];
        scores.sort();
        assert_eq!(
            scores,
            [Score::soft(1.0), Score::soft(3.0), Score::hard(1.0)]
        );
        assert_eq!(Score::new(2.0, 1.0) - Score::new(1.0, 1.0), Score::hard(1.0));
    }
}
