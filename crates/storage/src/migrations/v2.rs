//! Migration v2: derived critic score columns on books

pub(super) const CALCULATED_SCORE: &str = "calculated_critic_score";
pub(super) const CALCULATED_SCORE_DEF: &str = "REAL";
pub(super) const REVIEW_COUNT: &str = "critic_review_count";
pub(super) const REVIEW_COUNT_DEF: &str = "INTEGER NOT NULL DEFAULT 0";
