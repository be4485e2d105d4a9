use crate::checker::dictionary::Dictionary;

/// Common single-letter slips, tried in both directions.
const CONFUSABLE: [(char, char); 11] = [
    ('a', 'e'),
    ('e', 'i'),
    ('i', 'o'),
    ('o', 'u'),
    ('b', 'v'),
    ('c', 'k'),
    ('f', 'v'),
    ('g', 'j'),
    ('m', 'n'),
    ('s', 'z'),
    ('t', 'd'),
];

/// Rank corrections for `word`, best first, at most `max_suggestions`.
///
/// Lookups are lowercase; results take on the capitalization of `word`.
pub fn generate(word: &str, dictionary: &Dictionary, max_suggestions: usize) -> Vec<String> {
    let lower = word.to_lowercase();
    let mut ranked = Ranked::new(&lower, max_suggestions);

    // Same three-letter start, close spelling
    ranked.extend(prefix_candidates(&lower, dictionary, 3), 2);

    // Deletions, swaps and confusable letters that land on a real word
    if !ranked.is_full() {
        let hits: Vec<String> = transformations(&lower)
            .into_iter()
            .filter(|candidate| dictionary.contains(candidate))
            .collect();
        ranked.extend(hits, 2);
    }

    if !ranked.is_full() {
        ranked.extend(prefix_candidates(&lower, dictionary, 2), 3);
    }

    // Short words get a bounded scan of similar-length words
    let len = lower.chars().count();
    if !ranked.is_full() && len <= 3 {
        let candidates = dictionary.words_by_length(len.saturating_sub(1)..=len + 1, 500);
        ranked.extend(candidates, 2);
    }

    ranked
        .into_vec()
        .into_iter()
        .map(|suggestion| match_case(word, &suggestion))
        .collect()
}

/// Accumulates unique candidates in rank order.
struct Ranked<'a> {
    word: &'a str,
    max: usize,
    items: Vec<String>,
}

impl<'a> Ranked<'a> {
    fn new(word: &'a str, max: usize) -> Self {
        Self {
            word,
            max,
            items: Vec::new(),
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.max
    }

    /// Add candidates within `max_distance`, closest first.
    fn extend(&mut self, candidates: Vec<String>, max_distance: usize) {
        let mut scored: Vec<(usize, String)> = candidates
            .into_iter()
            .filter(|c| c != self.word)
            .map(|c| (edit_distance(self.word, &c), c))
            .filter(|(distance, _)| *distance <= max_distance)
            .collect();
        scored.sort_by_key(|(distance, _)| *distance);

        for (_, candidate) in scored {
            if self.is_full() {
                break;
            }
            if !self.items.contains(&candidate) {
                self.items.push(candidate);
            }
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.items
    }
}

fn prefix_candidates(word: &str, dictionary: &Dictionary, prefix_len: usize) -> Vec<String> {
    if word.chars().count() < prefix_len {
        return Vec::new();
    }
    let prefix: String = word.chars().take(prefix_len).collect();
    dictionary.words_with_prefix(&prefix)
}

/// "Teh" -> "The", "TEH" -> "THE", anything else as the dictionary has it.
fn match_case(original: &str, suggestion: &str) -> String {
    let letters: Vec<char> = original.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return suggestion.to_uppercase();
    }
    if original.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = suggestion.chars();
        if let Some(first) = chars.next() {
            return first.to_uppercase().chain(chars).collect();
        }
    }
    suggestion.to_string()
}

/// Calculate Levenshtein distance between two strings
fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, a_char) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, b_char) in b.iter().enumerate() {
            let cost = usize::from(a_char != b_char);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Generate common transformations of a word
fn transformations(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();

    // Deletions
    for i in 0..chars.len() {
        let mut candidate = chars.clone();
        candidate.remove(i);
        out.push(candidate.into_iter().collect());
    }

    // Transpositions (swap adjacent)
    for i in 0..chars.len().saturating_sub(1) {
        let mut candidate = chars.clone();
        candidate.swap(i, i + 1);
        out.push(candidate.into_iter().collect());
    }

    // Confusable letters
    for (i, &ch) in chars.iter().enumerate() {
        for &(a, b) in &CONFUSABLE {
            let replacement = if ch == a {
                b
            } else if ch == b {
                a
            } else {
                continue;
            };
            let mut candidate = chars.clone();
            candidate[i] = replacement;
            out.push(candidate.into_iter().collect());
        }
    }

    out
}
