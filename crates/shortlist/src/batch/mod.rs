//! Batch aggregation — ranking, summary statistics, categorical buckets,
//! and pairwise comparison over one job's worth of score results.
//!
//! A batch is a view over its current contents: it is regenerated whenever
//! an analysis run completes, and rank order carries no durable identity.

use serde::Serialize;

use crate::analysis::scoring::{ApplicationStatus, ScoreResult};

/// Score results for one job description, ordered by descending overall
/// score with ties kept in original upload order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CandidateBatch {
    results: Vec<ScoreResult>,
}

/// Ranks results by overall score, descending. `sort_by` is stable, so
/// equal scores keep their upload order.
pub fn rank(mut results: Vec<ScoreResult>) -> CandidateBatch {
    results.sort_by(|a, b| b.score.cmp(&a.score));
    CandidateBatch { results }
}

impl CandidateBatch {
    pub fn results(&self) -> &[ScoreResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summarize(&self) -> BatchSummary {
        let count = self.results.len();
        let average_score = (count > 0).then(|| {
            self.results.iter().map(|r| f64::from(r.score)).sum::<f64>() / count as f64
        });
        let top_score = self.results.iter().map(|r| r.score).max();
        BatchSummary {
            count,
            average_score,
            top_score,
        }
    }

    /// Buckets results by overall score. Bounds are closed-open with the
    /// lower bound inclusive: a score of exactly 8 is "excellent".
    pub fn categorize(&self) -> ScoreBuckets {
        let mut buckets = ScoreBuckets::default();
        for result in &self.results {
            let bucket = match result.score {
                8.. => &mut buckets.excellent,
                6..=7 => &mut buckets.good,
                4..=5 => &mut buckets.average,
                _ => &mut buckets.poor,
            };
            bucket.push(result.clone());
        }
        buckets
    }

    /// Counts per score value 1..=10 — index 0 holds the number of results
    /// scored 1. Scores are clamped at validation time, so every result
    /// lands in a bin.
    pub fn score_distribution(&self) -> [usize; 10] {
        let mut bins = [0usize; 10];
        for result in &self.results {
            bins[(result.score.clamp(1, 10) - 1) as usize] += 1;
        }
        bins
    }

    /// Reviewed/rejected totals across the batch.
    pub fn status_counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for result in &self.results {
            match result.status() {
                ApplicationStatus::Reviewed => counts.reviewed += 1,
                ApplicationStatus::Rejected => counts.rejected += 1,
            }
        }
        counts
    }
}

/// Summary statistics for a batch. `average_score` and `top_score` are
/// `None` on an empty batch rather than a division error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub count: usize,
    pub average_score: Option<f64>,
    pub top_score: Option<u8>,
}

impl BatchSummary {
    /// Display form of the average, `"N/A"` when the batch is empty.
    pub fn average_display(&self) -> String {
        match self.average_score {
            Some(avg) => format!("{avg:.1}/10"),
            None => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreBuckets {
    pub excellent: Vec<ScoreResult>,
    pub good: Vec<ScoreResult>,
    pub average: Vec<ScoreResult>,
    pub poor: Vec<ScoreResult>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub reviewed: usize,
    pub rejected: usize,
}

/// Side-by-side projection of two results — scores and skill lists only,
/// no additional computation.
pub fn compare<'a>(left: &'a ScoreResult, right: &'a ScoreResult) -> Comparison<'a> {
    Comparison {
        left: CandidateView::from(left),
        right: CandidateView::from(right),
    }
}

#[derive(Debug, Serialize)]
pub struct Comparison<'a> {
    pub left: CandidateView<'a>,
    pub right: CandidateView<'a>,
}

#[derive(Debug, Serialize)]
pub struct CandidateView<'a> {
    pub filename: Option<&'a str>,
    pub score: u8,
    pub skills_match_score: u8,
    pub experience_relevance_score: u8,
    pub key_skills_matched: &'a [String],
    pub missing_skills: &'a [String],
}

impl<'a> From<&'a ScoreResult> for CandidateView<'a> {
    fn from(result: &'a ScoreResult) -> Self {
        Self {
            filename: result.filename.as_deref(),
            score: result.score,
            skills_match_score: result.skills_match_score,
            experience_relevance_score: result.experience_relevance_score,
            key_skills_matched: &result.key_skills_matched,
            missing_skills: &result.missing_skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(filename: &str, score: u8) -> ScoreResult {
        ScoreResult {
            score,
            skills_match_score: score,
            experience_relevance_score: score,
            explanation: "x".to_string(),
            key_skills_matched: vec!["Rust".to_string()],
            missing_skills: vec!["Kafka".to_string()],
            experience_summary: "x".to_string(),
            filename: Some(filename.to_string()),
            total_experience: None,
            experience_months: None,
            degraded: false,
        }
    }

    fn filenames(results: &[ScoreResult]) -> Vec<&str> {
        results.iter().filter_map(|r| r.filename.as_deref()).collect()
    }

    #[test]
    fn test_rank_descending_with_stable_ties() {
        let batch = rank(vec![
            result("a.pdf", 7),
            result("b.pdf", 9),
            result("c.pdf", 9),
        ]);
        assert_eq!(filenames(batch.results()), vec!["b.pdf", "c.pdf", "a.pdf"]);
    }

    #[test]
    fn test_summarize() {
        let batch = rank(vec![result("a", 4), result("b", 8)]);
        let summary = batch.summarize();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.average_score, Some(6.0));
        assert_eq!(summary.top_score, Some(8));
        assert_eq!(summary.average_display(), "6.0/10");
    }

    #[test]
    fn test_summarize_empty_batch_is_not_an_error() {
        let summary = rank(vec![]).summarize();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_score, None);
        assert_eq!(summary.top_score, None);
        assert_eq!(summary.average_display(), "N/A");
    }

    #[test]
    fn test_categorize_boundaries() {
        let batch = rank(vec![
            result("excellent", 8),
            result("good", 7),
            result("good-low", 6),
            result("average", 4),
            result("poor", 3),
        ]);
        let buckets = batch.categorize();
        assert_eq!(filenames(&buckets.excellent), vec!["excellent"]);
        assert_eq!(filenames(&buckets.good), vec!["good", "good-low"]);
        assert_eq!(filenames(&buckets.average), vec!["average"]);
        assert_eq!(filenames(&buckets.poor), vec!["poor"]);
    }

    #[test]
    fn test_score_distribution_bins() {
        let batch = rank(vec![result("a", 1), result("b", 5), result("c", 5), result("d", 10)]);
        let bins = batch.score_distribution();
        assert_eq!(bins[0], 1);
        assert_eq!(bins[4], 2);
        assert_eq!(bins[9], 1);
        assert_eq!(bins.iter().sum::<usize>(), 4);
    }

    #[test]
    fn test_status_counts() {
        let batch = rank(vec![result("a", 6), result("b", 5), result("c", 9)]);
        assert_eq!(
            batch.status_counts(),
            StatusCounts {
                reviewed: 2,
                rejected: 1
            }
        );
    }

    #[test]
    fn test_compare_is_a_pure_projection() {
        let a = result("a.pdf", 8);
        let b = result("b.pdf", 5);
        let comparison = compare(&a, &b);
        assert_eq!(comparison.left.filename, Some("a.pdf"));
        assert_eq!(comparison.left.score, 8);
        assert_eq!(comparison.right.score, 5);
        assert_eq!(comparison.right.key_skills_matched, &["Rust".to_string()]);
        assert_eq!(comparison.left.missing_skills, &["Kafka".to_string()]);
    }
}
