//! Critic score aggregation rule.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_RATED_REVIEWS_FOR_SCORE;

/// Derived score fields for one book, as persisted on the book row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub book_id: String,
    /// `None` until at least [`MIN_RATED_REVIEWS_FOR_SCORE`] rated reviews exist.
    pub calculated_critic_score: Option<f64>,
    /// All reviews owned by the book, rated or not.
    pub critic_review_count: u32,
    /// Reviews carrying a rating.
    pub rated_review_count: u32,
}

impl ScoreSummary {
    /// Apply the aggregation rule to a book's full set of review ratings.
    ///
    /// Unrated reviews count toward `critic_review_count` but are excluded from
    /// both sum and divisor of the average.
    pub fn from_ratings<I>(book_id: impl Into<String>, ratings: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut total: u32 = 0;
        let mut rated: u32 = 0;
        let mut sum = 0.0_f64;
        for rating in ratings {
            total = total.saturating_add(1);
            if let Some(r) = rating {
                rated = rated.saturating_add(1);
                sum += r;
            }
        }
        let gate_met = usize::try_from(rated).is_ok_and(|n| n >= MIN_RATED_REVIEWS_FOR_SCORE);
        let calculated_critic_score = gate_met.then(|| sum / f64::from(rated));
        Self {
            book_id: book_id.into(),
            calculated_critic_score,
            critic_review_count: total,
            rated_review_count: rated,
        }
    }

    /// Whether the score is withheld ("coming soon").
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.calculated_critic_score.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rated(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn five_ratings_produce_mean() {
        let summary = ScoreSummary::from_ratings("educated", rated(&[94.0, 92.0, 90.0, 88.0, 91.0]));
        assert_eq!(summary.calculated_critic_score, Some(91.0));
        assert_eq!(summary.critic_review_count, 5);
        assert_eq!(summary.rated_review_count, 5);
    }

    #[test]
    fn below_gate_is_pending() {
        let summary = ScoreSummary::from_ratings("beach-read", rated(&[80.0, 85.0, 90.0]));
        assert!(summary.is_pending());
        assert_eq!(summary.critic_review_count, 3);
    }

    #[test]
    fn unrated_reviews_count_but_do_not_average() {
        let mut ratings = rated(&[90.0, 80.0, 70.0, 60.0]);
        ratings.push(None);
        ratings.push(None);
        let summary = ScoreSummary::from_ratings("b", ratings.clone());
        assert!(summary.is_pending(), "only four rated reviews");
        assert_eq!(summary.critic_review_count, 6);

        ratings.push(Some(100.0));
        let summary = ScoreSummary::from_ratings("b", ratings);
        assert_eq!(summary.calculated_critic_score, Some(80.0));
        assert_eq!(summary.critic_review_count, 7);
        assert_eq!(summary.rated_review_count, 5);
    }

    #[test]
    fn no_reviews_is_pending_with_zero_count() {
        let summary = ScoreSummary::from_ratings("empty", Vec::new());
        assert!(summary.is_pending());
        assert_eq!(summary.critic_review_count, 0);
    }

    #[test]
    fn stored_score_is_the_exact_mean() {
        let summary = ScoreSummary::from_ratings("b", rated(&[90.0, 91.0, 91.0, 90.0, 90.0, 90.0]));
        assert_eq!(summary.calculated_critic_score, Some(542.0 / 6.0));
        assert_ne!(summary.calculated_critic_score, Some(90.3));
    }

    #[test]
    fn aggregation_is_order_insensitive() {
        let a = ScoreSummary::from_ratings("b", rated(&[70.0, 75.0, 99.0, 12.0, 64.0]));
        let b = ScoreSummary::from_ratings("b", rated(&[12.0, 99.0, 64.0, 75.0, 70.0]));
        assert_eq!(a, b);
    }
}
