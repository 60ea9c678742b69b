//! Text similarity primitives for duplicate detection.
//!
//! Pure functions: normalization, a character-level matching-blocks ratio
//! (Ratcliff/Obershelp), word-set Jaccard, and the weighted blend of the two.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Weight of the character-sequence ratio in [`text_similarity`].
const SEQUENCE_WEIGHT: f64 = 0.6;

/// Weight of the word-set Jaccard index in [`text_similarity`].
const JACCARD_WEIGHT: f64 = 0.4;

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{L}\p{N}\s]").expect("static regex"));

/// Lowercase, strip everything but letters, digits and whitespace, and
/// collapse whitespace runs to single spaces.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = NON_WORD_RE.replace_all(&lowered, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `2 * matches / (len_a + len_b)` where `matches` is the total size of the
/// matching blocks found by recursively taking the longest common substring
/// and repeating on the pieces to its left and right. Two empty strings are
/// identical (1.0).
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];

    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_common_block(a, b, (alo, ahi), (blo, bhi));
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }

    matched
}

/// Longest common substring of `a[alo..ahi]` and `b[blo..bhi]` as
/// `(start_a, start_b, len)`. Earliest start in `a` wins ties, then earliest in `b`.
fn longest_common_block(
    a: &[char],
    b: &[char],
    (alo, ahi): (usize, usize),
    (blo, bhi): (usize, usize),
) -> (usize, usize, usize) {
    let width = bhi.saturating_sub(blo);
    let mut prev = vec![0usize; width + 1];
    let mut curr = vec![0usize; width + 1];
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);

    for i in alo..ahi {
        for j in blo..bhi {
            let col = j - blo + 1;
            curr[col] = if a[i] == b[j] { prev[col - 1] + 1 } else { 0 };
            if curr[col] > best_k {
                best_k = curr[col];
                best_i = i + 1 - best_k;
                best_j = j + 1 - best_k;
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    (best_i, best_j, best_k)
}

fn word_set(text: &str) -> HashSet<&str> {
    text.split_whitespace().collect()
}

/// |A ∩ B| / |A ∪ B|, zero when either set is empty.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    inter / union
}

/// Blend of sequence ratio and word Jaccard over already-normalized text.
/// Empty text on either side scores 0; if either side has no words the
/// sequence ratio stands alone.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let seq = sequence_ratio(a, b);
    let words_a = word_set(a);
    let words_b = word_set(b);
    if words_a.is_empty() || words_b.is_empty() {
        return seq;
    }

    SEQUENCE_WEIGHT * seq + JACCARD_WEIGHT * jaccard(&words_a, &words_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- normalize_text ---

    #[test]
    fn normalize_strips_punctuation_and_collapses_whitespace() {
        assert_eq!(
            normalize_text("  Huge POTHOLE!!  on   Main-St.\n"),
            "huge pothole on mainst"
        );
    }

    #[test]
    fn normalize_keeps_digits_and_non_ascii_letters() {
        assert_eq!(normalize_text("Pipe #42 bursté"), "pipe 42 bursté");
    }

    #[test]
    fn normalize_drops_underscores() {
        assert_eq!(normalize_text("snake_case"), "snakecase");
    }

    // --- sequence_ratio ---

    #[test]
    fn identical_strings_ratio_is_one() {
        assert_eq!(sequence_ratio("water leak", "water leak"), 1.0);
    }

    #[test]
    fn disjoint_strings_ratio_is_zero() {
        assert_eq!(sequence_ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn empty_strings_are_identical() {
        assert_eq!(sequence_ratio("", ""), 1.0);
        assert_eq!(sequence_ratio("abc", ""), 0.0);
    }

    #[test]
    fn ratio_counts_longest_shared_run() {
        // "abcd" matches; the trailing "e" vs "f" does not. 2 * 4 / 10.
        let r = sequence_ratio("abcde", "abcdf");
        assert!((r - 0.8).abs() < 1e-12);
    }

    #[test]
    fn ratio_counts_blocks_on_both_sides_of_longest_match() {
        // "cd" is longest; "a" matches on its left and "f" on its right.
        // matches = 4, total length = 12.
        let r = sequence_ratio("axcdyf", "abcdzf");
        assert!((r - 8.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn ratio_matches_gestalt_example() {
        // Classic Ratcliff/Obershelp example: "WIKIMEDIA" vs "WIKIMANIA"
        // matches "WIKIM" + "IA" = 7 of 18 characters.
        let r = sequence_ratio("wikimedia", "wikimania");
        assert!((r - 14.0 / 18.0).abs() < 1e-12);
    }

    // --- jaccard ---

    #[test]
    fn jaccard_of_overlapping_sets() {
        let a: HashSet<&str> = ["street", "light", "out"].into_iter().collect();
        let b: HashSet<&str> = ["street", "light", "broken"].into_iter().collect();
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn jaccard_with_empty_set_is_zero() {
        let a: HashSet<&str> = ["x"].into_iter().collect();
        assert_eq!(jaccard(&a, &HashSet::new()), 0.0);
    }

    // --- text_similarity ---

    #[test]
    fn empty_text_scores_zero() {
        assert_eq!(text_similarity("", "pothole"), 0.0);
        assert_eq!(text_similarity("pothole", ""), 0.0);
    }

    #[test]
    fn same_text_scores_one() {
        assert!((text_similarity("broken pipe", "broken pipe") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn blend_weights_sequence_and_words() {
        let a = "street light out";
        let b = "street light broken";
        let expected = 0.6 * sequence_ratio(a, b) + 0.4 * 0.5;
        assert!((text_similarity(a, b) - expected).abs() < 1e-12);
    }
}
