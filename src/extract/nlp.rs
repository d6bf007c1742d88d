//! Lightweight text analysis: keyword ranking and extractive summaries.
//!
//! Both work on plain article text and need no model. Keywords are ranked by
//! frequency, with words from the title weighted up. The summary picks the
//! highest-scoring sentences and returns them in their original order.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// A title occurrence counts as this many body occurrences.
const TITLE_WEIGHT: usize = 3;
/// Sentences with fewer words rarely carry a point worth summarizing.
const MIN_SENTENCE_WORDS: usize = 4;

static WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*").expect("word pattern is valid")
});

static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
        "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
        "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
        "during", "each", "even", "few", "for", "from", "further", "get", "got", "had", "has",
        "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his",
        "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just", "like", "may",
        "me", "might", "more", "most", "much", "must", "my", "myself", "new", "no", "nor",
        "not", "now", "of", "off", "on", "once", "one", "only", "or", "other", "our", "ours",
        "ourselves", "out", "over", "own", "said", "same", "says", "she", "should", "so",
        "some", "still", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "through", "to",
        "too", "two", "under", "until", "up", "us", "very", "was", "we", "were", "what",
        "when", "where", "which", "while", "who", "whom", "why", "will", "with", "would",
        "year", "years", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Lowercased word tokens, possessive `'s` removed.
pub fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD_RE.find_iter(text).map(|m| {
        let word = m.as_str().to_lowercase();
        match word
            .strip_suffix("'s")
            .or_else(|| word.strip_suffix("’s"))
        {
            Some(stem) => stem.to_string(),
            None => word,
        }
    })
}

fn is_candidate(word: &str) -> bool {
    word.chars().count() >= 2
        && !word.chars().all(|c| c.is_ascii_digit())
        && !STOPWORDS.contains(word)
}

/// Up to `limit` keywords, most relevant first.
///
/// Ties keep the order in which the words first appeared (title first).
pub fn keywords(title: &str, text: &str, limit: usize) -> Vec<String> {
    let mut scores: HashMap<String, (usize, usize)> = HashMap::new();
    let mut seen = 0usize;

    for (weight, source) in [(TITLE_WEIGHT, title), (1, text)] {
        for word in tokens(source).filter(|w| is_candidate(w)) {
            let entry = scores.entry(word).or_insert_with(|| {
                seen += 1;
                (0, seen)
            });
            entry.0 += weight;
        }
    }

    scores
        .into_iter()
        .sorted_by(|(_, (score_a, first_a)), (_, (score_b, first_b))| {
            score_b.cmp(score_a).then(first_a.cmp(first_b))
        })
        .take(limit)
        .map(|(word, _)| word)
        .collect()
}

/// Split text into sentences on `.`, `!`, `?` followed by whitespace.
///
/// Closing quotes and brackets stay with the sentence they end. Line breaks
/// always end a sentence.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();

    for paragraph in text.lines().map(str::trim).filter(|p| !p.is_empty()) {
        let mut start = 0;
        let mut chars = paragraph.char_indices().peekable();

        while let Some((idx, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let mut end = idx + c.len_utf8();
            while let Some(&(j, next)) = chars.peek() {
                if matches!(next, '.' | '!' | '?' | '"' | '\'' | '”' | '’' | ')' | ']') {
                    end = j + next.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            if chars.peek().is_none_or(|&(_, next)| next.is_whitespace()) {
                let sentence = paragraph[start..end].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = end;
            }
        }

        let rest = paragraph[start..].trim();
        if !rest.is_empty() {
            sentences.push(rest);
        }
    }

    sentences
}

/// Pick up to `max_sentences` sentences that best represent the article.
///
/// Each sentence is scored on overlap with the title, density of ranked
/// keywords, and position (earlier is better). The winners are joined in the
/// order they appear in the text.
pub fn extractive_summary(
    title: &str,
    text: &str,
    keywords: &[String],
    max_sentences: usize,
) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() || max_sentences == 0 {
        return String::new();
    }

    let title_words: HashSet<String> = tokens(title).filter(|w| is_candidate(w)).collect();
    let keyword_weights: HashMap<&str, f64> = keywords
        .iter()
        .enumerate()
        .map(|(rank, k)| (k.as_str(), 1.0 - rank as f64 / keywords.len() as f64))
        .collect();
    let total = sentences.len() as f64;

    let mut picked: Vec<(usize, f64)> = sentences
        .iter()
        .enumerate()
        .filter_map(|(idx, sentence)| {
            let words: Vec<String> = tokens(sentence).collect();
            if words.len() < MIN_SENTENCE_WORDS {
                return None;
            }
            let title_overlap = if title_words.is_empty() {
                0.0
            } else {
                let shared: HashSet<&String> =
                    words.iter().filter(|w| title_words.contains(*w)).collect();
                shared.len() as f64 / title_words.len() as f64
            };
            let keyword_density = words
                .iter()
                .filter_map(|w| keyword_weights.get(w.as_str()))
                .sum::<f64>()
                / words.len() as f64;
            let position = 1.0 - idx as f64 / total;
            Some((idx, 1.5 * title_overlap + 4.0 * keyword_density + position))
        })
        .sorted_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)))
        .take(max_sentences)
        .collect();

    if picked.is_empty() {
        return sentences.iter().take(max_sentences).join(" ");
    }

    picked.sort_by_key(|(idx, _)| *idx);
    picked.into_iter().map(|(idx, _)| sentences[idx]).join(" ")
}
