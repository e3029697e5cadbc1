//! # Fuzzy Matcher
//!
//! Ranks catalog titles against free-text user input so the storefront can
//! offer "did you mean?" suggestions. Scoring uses normalized Levenshtein
//! similarity (`strsim`), which maps string pairs into `[0.0, 1.0]` — `1.0`
//! is an exact match.
//!
//! The matcher is deliberately dumb: no tokenization, no prefix boosts, no
//! caching. Score every candidate, keep the best `limit`, drop anything under
//! the cutoff. Both sides are lowercased before scoring so "dune" finds
//! "Dune".
//!
//! Results are deterministic for a fixed catalog and query: the sort is
//! stable, so equal scores tie-break by original catalog order.

use tracing::debug;

/// Rank `titles` against `query` and return the plausible matches.
///
/// # Parameters
/// - `query`: Free-text user input. Empty input yields no suggestions.
/// - `titles`: Candidate titles, scored in order.
/// - `limit`: Maximum number of suggestions to return.
/// - `cutoff`: Minimum similarity score (`0.0`–`1.0`) for a match to count.
///
/// # Returns
/// Up to `limit` titles, best match first. The cutoff is applied **after**
/// the top-`limit` selection, so a crowded neighborhood of strong matches can
/// push a weaker-but-above-cutoff title out entirely.
///
/// An empty result means "no suggestions", never an error.
///
/// # Examples
/// ```rust
/// use bookwyrm::matcher::suggest;
///
/// let titles = vec!["Dune".to_string(), "Foundation".to_string()];
/// let hits = suggest("dunne", &titles, 10, 0.4);
/// assert_eq!(hits, vec!["Dune".to_string()]);
/// ```
pub fn suggest(query: &str, titles: &[String], limit: usize, cutoff: f64) -> Vec<String> {
    if query.is_empty() {
        return Vec::new();
    }

    let needle = query.to_lowercase();

    let mut scored: Vec<(f64, &String)> = titles
        .iter()
        .map(|title| {
            (
                strsim::normalized_levenshtein(&needle, &title.to_lowercase()),
                title,
            )
        })
        .collect();

    // Stable sort: ties keep catalog order, which keeps results reproducible.
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let suggestions: Vec<String> = scored
        .into_iter()
        .take(limit)
        .filter(|(score, _)| *score >= cutoff)
        .map(|(_, title)| title.clone())
        .collect();

    debug!(
        "suggest({:?}): {} of {} titles above cutoff {}",
        query,
        suggestions.len(),
        titles.len(),
        cutoff
    );

    suggestions
}
