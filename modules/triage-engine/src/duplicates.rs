//! Duplicate detection: score a new report against issues on file.

use tracing::{debug, info};

use triage_common::{
    round_to, DuplicateCandidate, DuplicateVerdict, ExistingIssue, SimilarityMatch,
};

use crate::similarity::{normalize_text, text_similarity};

/// Share of the combined score contributed by text similarity.
const TEXT_WEIGHT: f64 = 0.7;

/// Share of the combined score contributed by the category comparison.
const CATEGORY_WEIGHT: f64 = 0.3;

/// Category component when the categories differ.
const CATEGORY_MISMATCH: f64 = 0.5;

/// Combined score an existing issue must exceed to be reported at all.
const MATCH_THRESHOLD: f64 = 0.4;

/// Top score above which the report is treated as a duplicate.
const DUPLICATE_THRESHOLD: f64 = 0.8;

/// Top score above which the report is flagged as related.
const RELATED_THRESHOLD: f64 = 0.6;

const MAX_SIMILAR: usize = 5;

/// Compare `candidate` against every existing issue and decide whether it is
/// a duplicate. Never fails: missing fields on existing issues behave as
/// empty text.
pub fn detect_duplicate(
    candidate: &DuplicateCandidate,
    existing: &[ExistingIssue],
) -> DuplicateVerdict {
    if existing.is_empty() {
        return DuplicateVerdict {
            is_duplicate: false,
            confidence: 0.0,
            similar_issues: Vec::new(),
            recommendation: "No existing issues to compare".to_string(),
        };
    }

    let new_text = normalize_text(&format!("{} {}", candidate.title, candidate.description));
    let category = candidate.category.to_lowercase();

    let mut similar: Vec<SimilarityMatch> = existing
        .iter()
        .filter_map(|issue| {
            let existing_text = normalize_text(&format!("{} {}", issue.title, issue.description));
            let category_match = issue.category.to_lowercase() == category;
            let category_score = if category_match { 1.0 } else { CATEGORY_MISMATCH };
            let combined = TEXT_WEIGHT * text_similarity(&new_text, &existing_text)
                + CATEGORY_WEIGHT * category_score;

            (combined > MATCH_THRESHOLD).then(|| SimilarityMatch {
                issue_id: issue.issue_id().to_string(),
                title: issue.title.clone(),
                similarity_score: round_to(combined, 2),
                category_match,
            })
        })
        .collect();

    similar.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
    similar.truncate(MAX_SIMILAR);

    debug!(
        compared = existing.len(),
        retained = similar.len(),
        "Scored duplicate candidates"
    );

    let verdict = match similar.first().map(|m| m.similarity_score) {
        None => DuplicateVerdict {
            is_duplicate: false,
            confidence: 0.0,
            similar_issues: similar,
            recommendation: "New unique issue".to_string(),
        },
        Some(top) if top > DUPLICATE_THRESHOLD => DuplicateVerdict {
            is_duplicate: true,
            confidence: round_to(top, 2),
            similar_issues: similar,
            recommendation: "High likelihood of duplicate - consider merging".to_string(),
        },
        Some(top) if top > RELATED_THRESHOLD => DuplicateVerdict {
            is_duplicate: false,
            confidence: round_to(top, 2),
            similar_issues: similar,
            recommendation: "Potentially related issue - review before creating".to_string(),
        },
        // Confidence here is the complement of similarity (confidence that the
        // report is new), kept as-is for API compatibility.
        Some(top) => DuplicateVerdict {
            is_duplicate: false,
            confidence: round_to(1.0 - top, 2),
            similar_issues: similar,
            recommendation: "New unique issue with some similarities".to_string(),
        },
    };

    info!(
        is_duplicate = verdict.is_duplicate,
        confidence = verdict.confidence,
        matches = verdict.similar_issues.len(),
        "Duplicate check complete"
    );

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(title: &str, description: &str, category: &str) -> DuplicateCandidate {
        DuplicateCandidate {
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
        }
    }

    fn existing(id: &str, title: &str, description: &str, category: &str) -> ExistingIssue {
        ExistingIssue {
            id: Some(id.to_string()),
            title: title.to_string(),
            description: description.to_string(),
            category: category.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn no_existing_issues_has_dedicated_recommendation() {
        let verdict = detect_duplicate(&candidate("a", "b", "road"), &[]);
        assert!(!verdict.is_duplicate);
        assert_eq!(verdict.confidence, 0.0);
        assert_eq!(verdict.recommendation, "No existing issues to compare");
    }

    #[test]
    fn category_comparison_ignores_case() {
        let verdict = detect_duplicate(
            &candidate("Pothole", "Deep pothole on Main St", "ROAD"),
            &[existing("1", "Pothole", "Deep pothole on Main St", "road")],
        );
        assert!(verdict.similar_issues[0].category_match);
        assert_eq!(verdict.similar_issues[0].similarity_score, 1.0);
    }

    #[test]
    fn unrelated_text_in_other_category_is_filtered_out() {
        // Text similarity near zero leaves only 0.3 * 0.5 = 0.15 from category.
        let verdict = detect_duplicate(
            &candidate("Streetlight out", "Dark corner", "electricity"),
            &[existing("1", "zzzz", "qqqq", "waste")],
        );
        assert!(verdict.similar_issues.is_empty());
        assert_eq!(verdict.recommendation, "New unique issue");
        assert_eq!(verdict.confidence, 0.0);
    }

    #[test]
    fn same_category_alone_is_not_enough() {
        // 0.3 from category, ~0 from text: below the 0.4 threshold.
        let verdict = detect_duplicate(
            &candidate("abc", "", "road"),
            &[existing("1", "xyz", "", "road")],
        );
        assert!(verdict.similar_issues.is_empty());
    }

    #[test]
    fn existing_issue_with_no_text_scores_category_only() {
        let verdict = detect_duplicate(
            &candidate("Leak", "Pipe leaking", "water"),
            &[ExistingIssue::default()],
        );
        assert!(verdict.similar_issues.is_empty());
    }
}
