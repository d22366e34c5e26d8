/// Counts non-overlapping, case-insensitive occurrences of `phrase` in `text`,
/// scanning left to right. An empty phrase never matches.
pub fn count_occurrences(phrase: &str, text: &str) -> usize {
    let phrase = phrase.to_lowercase();
    match phrase.is_empty() {
        true => 0,
        false => text.to_lowercase().matches(phrase.as_str()).count(),
    }
}
