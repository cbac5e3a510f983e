//! Fuzzy string matching for name and content shortcuts.

/// Normalized Levenshtein similarity in `[0, 1]`.
///
/// 1.0 means the strings are equal; 0.0 means every character differs.
/// Comparison is over chars, not bytes, so multibyte input scores the
/// same as its ASCII transliteration would.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let max_len = a_chars.len().max(b_chars.len());
    if max_len == 0 {
        return 1.0;
    }

    let distance = levenshtein(&a_chars, &b_chars);
    1.0 - (distance as f32 / max_len as f32)
}

/// The `n` candidates closest to `target` that score at least `cutoff`.
///
/// Candidates are returned best-first; ties keep their input order.
pub fn closest_matches<'a>(
    target: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    n: usize,
    cutoff: f32,
) -> Vec<&'a str> {
    let mut scored: Vec<(f32, &str)> = candidates
        .into_iter()
        .map(|c| (similarity(target, c), c))
        .filter(|(score, _)| *score >= cutoff)
        .collect();

    // Stable sort preserves input order among equal scores
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.truncate(n);
    scored.into_iter().map(|(_, c)| c).collect()
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_strings_score_one() {
        assert_eq!(similarity("weather", "weather"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
    }

    #[test]
    fn test_disjoint_strings_score_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_single_edit() {
        // one substitution over 7 chars
        let s = similarity("weather", "wedther");
        assert!((s - (1.0 - 1.0 / 7.0)).abs() < 1e-6);
    }

    #[test]
    fn test_length_difference_counts() {
        // "time" vs "times": one insertion, max len 5
        let s = similarity("time", "times");
        assert!((s - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_closest_matches_orders_best_first() {
        let matches = closest_matches("weather", ["weather.pdf", "wether", "time.txt"], 3, 0.5);
        assert_eq!(matches, vec!["wether", "weather.pdf"]);
    }

    #[test]
    fn test_closest_matches_respects_cutoff() {
        let matches = closest_matches("weather", ["zzzzzzz"], 3, 0.6);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_closest_matches_truncates_to_n() {
        let matches = closest_matches("aaa", ["aaa", "aab", "aba", "baa"], 2, 0.5);
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0], "aaa");
    }

    #[test]
    fn test_empty_target_against_nonempty() {
        assert_eq!(similarity("", "abc"), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }
}
