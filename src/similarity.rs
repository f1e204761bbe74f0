/*!
 * Normalized edit-distance scoring.
 *
 * The rehearsal controller uses this score as the only gate for deciding
 * whether a spoken delivery matches the expected line.
 */

/// Default score at or above which a delivery counts as correct
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// Compute the normalized similarity of two strings (0.0-1.0).
///
/// The score is `(max_len - distance) / max_len` where `distance` is the
/// Levenshtein distance over chars. Two empty strings score `1.0`.
/// Comparison is exact; callers lower-case inputs beforehand.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);

    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein_distance(a, b);
    (max_len - distance) as f64 / max_len as f64
}

/// Scores transcripts against expected lines with a delivery threshold
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    /// Minimum score for a delivery to count (0.0-1.0, inclusive)
    threshold: f64,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl SimilarityScorer {
    /// Create a scorer with a custom threshold
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Case-insensitive similarity of a transcript and the expected text
    pub fn score(&self, transcript: &str, expected: &str) -> f64 {
        similarity(&transcript.to_lowercase(), &expected.to_lowercase())
    }

    /// Whether a score clears the threshold (inclusive)
    pub fn accepts(&self, score: f64) -> bool {
        score >= self.threshold
    }
}

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    // Keep the shorter string in the row
    let (long, short) = if a_chars.len() >= b_chars.len() {
        (a_chars, b_chars)
    } else {
        (b_chars, a_chars)
    };

    if short.is_empty() {
        return long.len();
    }

    let mut prev_row: Vec<usize> = (0..=short.len()).collect();
    let mut curr_row: Vec<usize> = vec![0; short.len() + 1];

    for i in 1..=long.len() {
        curr_row[0] = i;

        for j in 1..=short.len() {
            let cost = if long[i - 1] == short[j - 1] { 0 } else { 1 };

            curr_row[j] = (prev_row[j] + 1)                  // deletion
                .min(curr_row[j - 1] + 1)                    // insertion
                .min(prev_row[j - 1] + cost);                // substitution
        }

        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    prev_row[short.len()]
}
