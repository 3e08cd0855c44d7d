//! Keyword Extractor: normalizes free text into an ordered set of keyword tokens.
//!
//! Pipeline: case-fold → strip non-word characters → split on whitespace →
//! drop tokens shorter than `MIN_TOKEN_CHARS` → (optional) stopword filter →
//! dedupe keeping first occurrence.
//!
//! Under `WordCharset::Unicode` the folded text is NFC-normalized, so composed
//! and decomposed spellings of the same word produce the same token.
//!
//! Stripping happens before splitting, so punctuation inside a token joins its
//! fragments (`node.js` → `nodejs`, `ci/cd` → `cicd`).

use indexmap::IndexSet;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Tokens with fewer chars than this are discarded.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Which characters count as word characters during stripping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WordCharset {
    /// Any char with the Unicode Alphabetic or Numeric property, combining
    /// marks, and `_`.
    #[default]
    Unicode,
    /// `[A-Za-z0-9_]` only. Non-Latin letters are stripped. Text is only
    /// lowercased, so expanding case mappings (`ß` → `SS`) are not folded.
    Ascii,
}

impl WordCharset {
    fn is_word_char(self, c: char) -> bool {
        match self {
            WordCharset::Unicode => c.is_alphanumeric() || is_combining_mark(c) || c == '_',
            WordCharset::Ascii => c.is_ascii_alphanumeric() || c == '_',
        }
    }

    fn fold_case(self, text: &str) -> String {
        match self {
            // Upper-then-lower folds expanding mappings (ß, ligatures) the
            // same way regardless of the input's case.
            WordCharset::Unicode => text.to_uppercase().to_lowercase().nfc().collect(),
            WordCharset::Ascii => text.to_lowercase(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopwordPolicy {
    /// Baseline: common words like "the", "and", "for" are ordinary keywords.
    #[default]
    Keep,
    Filter,
}

/// Extraction policy. The default is the baseline lexical behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeywordPolicy {
    pub charset: WordCharset,
    pub stopwords: StopwordPolicy,
}

impl KeywordPolicy {
    /// Label identifying the numeric behavior of this policy. Two policies
    /// with the same label produce identical scores for identical inputs.
    pub fn version(&self) -> &'static str {
        match (self.charset, self.stopwords) {
            (WordCharset::Unicode, StopwordPolicy::Keep) => "lexical-v1/unicode",
            (WordCharset::Ascii, StopwordPolicy::Keep) => "lexical-v1/ascii",
            (WordCharset::Unicode, StopwordPolicy::Filter) => "lexical-v1/unicode+stopwords",
            (WordCharset::Ascii, StopwordPolicy::Filter) => "lexical-v1/ascii+stopwords",
        }
    }
}

/// English stopwords of three or more letters; shorter ones never survive the
/// length filter anyway.
const STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "and", "any", "are", "because", "been",
    "before", "being", "below", "between", "both", "but", "can", "did", "does", "doing", "down",
    "during", "each", "few", "for", "from", "further", "had", "has", "have", "having", "her",
    "here", "hers", "herself", "him", "himself", "his", "how", "into", "its", "itself", "just",
    "more", "most", "myself", "nor", "not", "now", "off", "once", "only", "other", "our", "ours",
    "ourselves", "out", "over", "own", "same", "she", "should", "some", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "through", "too", "under", "until", "very", "was", "were", "what", "when", "where",
    "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your", "yours",
    "yourself", "yourselves",
];

fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(&token)
}

/// A set of normalized keyword tokens that remembers first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    tokens: IndexSet<String>,
}

impl KeywordSet {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Tokens in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Tokens of `self` also present in `other`, in `self`'s order.
    pub fn intersection_in_order<'a>(
        &'a self,
        other: &'a KeywordSet,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |t| other.contains(t))
    }

    /// Tokens of `self` absent from `other`, in `self`'s order.
    pub fn difference_in_order<'a>(
        &'a self,
        other: &'a KeywordSet,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.iter().filter(move |t| !other.contains(t))
    }
}

impl FromIterator<String> for KeywordSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().collect(),
        }
    }
}

/// Extracts the keyword set of `text` under `policy`. Total over all inputs.
pub fn extract_keywords(text: &str, policy: &KeywordPolicy) -> KeywordSet {
    let cleaned: String = policy
        .charset
        .fold_case(text)
        .chars()
        .filter(|&c| policy.charset.is_word_char(c) || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|token| policy.stopwords == StopwordPolicy::Keep || !is_stopword(token))
        .map(str::to_string)
        .collect()
}
