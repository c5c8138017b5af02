// WHY: Per-candidate feature vectors for an external boundary classifier
// One fixed struct per schema version so every row has the same columns

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::abbreviations::AbbreviationSet;
use crate::config::SegmentationContext;
use crate::text::{is_candidate, Text, Word};

/// Bumped whenever a column is added, removed, renamed or redefined
pub const FEATURE_SCHEMA_VERSION: u32 = 2;

/// Honorifics and academic titles, lowercase, no trailing period
pub const TITLES: &[&str] = &[
    "doc", "prof", "ing", "mudr", "judr", "rndr", "phdr", "mvdr", "dr", "drsc", "csc", "paeddr",
    "pharmdr", "thdr", "bc", "mgr", "arch", "plk", "mjr", "kpt", "gen", "p", "sv", "fa",
];

/// Characters that open (or close) a quotation
pub const QUOTE_CHARS: &[char] = &[
    '"', '\'', '\u{201C}', '\u{201D}', '\u{201E}', '\u{2018}', '\u{2019}', '\u{00AB}', '\u{00BB}',
];

/// Closing quotes and brackets other than `)`
const CLOSING_CHARS: &[char] = &['"', '\'', '\u{201D}', '\u{2019}', '\u{00BB}', '\u{201C}', ']', '}'];

/// Opening punctuation trimmed from the previous token before abbreviation lookup
const OPENING_CHARS: &[char] = &['(', '[', '{', '"', '\'', '\u{201E}', '\u{201C}', '\u{2018}', '\u{00AB}'];

/// Extra lookback beyond the longest abbreviation, covering opening punctuation
/// and trailing periods around a dotted token
const TOKEN_WINDOW_MARGIN: usize = 8;

/// Coarse class of a single neighbouring character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    Digit,
    Period,
    /// `!` or `?`
    Terminal,
    ClosingQuote,
    ClosingParen,
    Percent,
    Whitespace,
    Other,
}

impl CharClass {
    pub fn of(ch: char) -> Self {
        match ch {
            '.' => CharClass::Period,
            '!' | '?' => CharClass::Terminal,
            ')' => CharClass::ClosingParen,
            '%' => CharClass::Percent,
            c if CLOSING_CHARS.contains(&c) => CharClass::ClosingQuote,
            c if c.is_whitespace() => CharClass::Whitespace,
            c if c.is_numeric() => CharClass::Digit,
            _ => CharClass::Other,
        }
    }
}

/// Feature vector for one candidate, schema version 2
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub next_is_upper: bool,
    pub next_is_lower: bool,
    pub next_is_number: bool,
    pub next_is_quote: bool,
    pub prev_word_len: usize,
    pub prev_is_upper: bool,
    pub prev_is_number: bool,
    pub prev_is_title: bool,
    pub prev_is_initial: bool,
    pub prev_is_abbreviation: bool,
    pub prev_in_parenthesis: bool,
    pub prev_prev_word_len: usize,
    pub prev_prev_is_abbreviation: bool,
    pub abbreviation_chain: bool,
    pub prev_char_is_digit: bool,
    pub prev_char_is_period: bool,
    pub prev_char_is_punct: bool,
    pub prev_char_is_closing_quote: bool,
    pub prev_char_is_closing_paren: bool,
    pub prev_char_is_percent: bool,
    pub prev_char_is_space: bool,
    pub next_char_is_digit: bool,
    pub next_char_is_period: bool,
    pub next_char_is_punct: bool,
    pub next_char_is_closing_quote: bool,
    pub next_char_is_closing_paren: bool,
    pub next_char_is_percent: bool,
    pub next_char_is_space: bool,
    pub next_next_char_is_period: bool,
    pub is_ellipsis: bool,
    pub punct_type: char,
}

impl FeatureVector {
    /// Column names in output order; identical to the serde field names
    pub const COLUMNS: [&'static str; 31] = [
        "next_is_upper",
        "next_is_lower",
        "next_is_number",
        "next_is_quote",
        "prev_word_len",
        "prev_is_upper",
        "prev_is_number",
        "prev_is_title",
        "prev_is_initial",
        "prev_is_abbreviation",
        "prev_in_parenthesis",
        "prev_prev_word_len",
        "prev_prev_is_abbreviation",
        "abbreviation_chain",
        "prev_char_is_digit",
        "prev_char_is_period",
        "prev_char_is_punct",
        "prev_char_is_closing_quote",
        "prev_char_is_closing_paren",
        "prev_char_is_percent",
        "prev_char_is_space",
        "next_char_is_digit",
        "next_char_is_period",
        "next_char_is_punct",
        "next_char_is_closing_quote",
        "next_char_is_closing_paren",
        "next_char_is_percent",
        "next_char_is_space",
        "next_next_char_is_period",
        "is_ellipsis",
        "punct_type",
    ];

    /// All-default vector for a candidate whose context is entirely absent
    pub fn empty(punct_type: char) -> Self {
        Self {
            next_is_upper: false,
            next_is_lower: false,
            next_is_number: false,
            next_is_quote: false,
            prev_word_len: 0,
            prev_is_upper: false,
            prev_is_number: false,
            prev_is_title: false,
            prev_is_initial: false,
            prev_is_abbreviation: false,
            prev_in_parenthesis: false,
            prev_prev_word_len: 0,
            prev_prev_is_abbreviation: false,
            abbreviation_chain: false,
            prev_char_is_digit: false,
            prev_char_is_period: false,
            prev_char_is_punct: false,
            prev_char_is_closing_quote: false,
            prev_char_is_closing_paren: false,
            prev_char_is_percent: false,
            prev_char_is_space: false,
            next_char_is_digit: false,
            next_char_is_period: false,
            next_char_is_punct: false,
            next_char_is_closing_quote: false,
            next_char_is_closing_paren: false,
            next_char_is_percent: false,
            next_char_is_space: false,
            next_next_char_is_period: false,
            is_ellipsis: false,
            punct_type,
        }
    }

    /// Row values rendered in `COLUMNS` order (bools as 0/1)
    pub fn values(&self) -> Vec<String> {
        let flag = |b: bool| if b { "1" } else { "0" }.to_string();
        vec![
            flag(self.next_is_upper),
            flag(self.next_is_lower),
            flag(self.next_is_number),
            flag(self.next_is_quote),
            self.prev_word_len.to_string(),
            flag(self.prev_is_upper),
            flag(self.prev_is_number),
            flag(self.prev_is_title),
            flag(self.prev_is_initial),
            flag(self.prev_is_abbreviation),
            flag(self.prev_in_parenthesis),
            self.prev_prev_word_len.to_string(),
            flag(self.prev_prev_is_abbreviation),
            flag(self.abbreviation_chain),
            flag(self.prev_char_is_digit),
            flag(self.prev_char_is_period),
            flag(self.prev_char_is_punct),
            flag(self.prev_char_is_closing_quote),
            flag(self.prev_char_is_closing_paren),
            flag(self.prev_char_is_percent),
            flag(self.prev_char_is_space),
            flag(self.next_char_is_digit),
            flag(self.next_char_is_period),
            flag(self.next_char_is_punct),
            flag(self.next_char_is_closing_quote),
            flag(self.next_char_is_closing_paren),
            flag(self.next_char_is_percent),
            flag(self.next_char_is_space),
            flag(self.next_next_char_is_period),
            flag(self.is_ellipsis),
            self.punct_type.to_string(),
        ]
    }

    fn set_prev_char(&mut self, class: CharClass) {
        self.prev_char_is_digit = class == CharClass::Digit;
        self.prev_char_is_period = class == CharClass::Period;
        self.prev_char_is_punct = class == CharClass::Terminal;
        self.prev_char_is_closing_quote = class == CharClass::ClosingQuote;
        self.prev_char_is_closing_paren = class == CharClass::ClosingParen;
        self.prev_char_is_percent = class == CharClass::Percent;
        self.prev_char_is_space = class == CharClass::Whitespace;
    }

    fn set_next_char(&mut self, class: CharClass) {
        self.next_char_is_digit = class == CharClass::Digit;
        self.next_char_is_period = class == CharClass::Period;
        self.next_char_is_punct = class == CharClass::Terminal;
        self.next_char_is_closing_quote = class == CharClass::ClosingQuote;
        self.next_char_is_closing_paren = class == CharClass::ClosingParen;
        self.next_char_is_percent = class == CharClass::Percent;
        self.next_char_is_space = class == CharClass::Whitespace;
    }
}

/// Computes feature vectors against one shared abbreviation set
pub struct FeatureExtractor<'a> {
    abbreviations: &'a AbbreviationSet,
}

impl<'a> FeatureExtractor<'a> {
    pub fn new(ctx: &'a SegmentationContext) -> Self {
        Self::with_abbreviations(ctx.abbreviations())
    }

    /// Use `abbreviations` exactly as given; only `SegmentationContext` adds
    /// the always-included entries
    pub fn with_abbreviations(abbreviations: &'a AbbreviationSet) -> Self {
        Self { abbreviations }
    }

    /// Features for the candidate at `index`.
    ///
    /// `text[index]` is expected to be one of `. ? !`; any other position still
    /// yields a full vector, with `punct_type` set to whatever char sits there
    /// (or `'\0'` past the end).
    pub fn extract(&self, text: &Text, index: usize) -> FeatureVector {
        let punct = text.get(index).unwrap_or('\0');
        if !is_candidate(punct) {
            debug!("Extracting features at non-candidate index {}", index);
        }
        let mut features = FeatureVector::empty(punct);

        if let Some(next) = text.next_word(index).and_then(|w| w.first()) {
            features.next_is_upper = next.is_uppercase();
            features.next_is_lower = next.is_lowercase();
            features.next_is_number = next.is_numeric();
        }
        features.next_is_quote = text
            .next_non_space(index)
            .is_some_and(|ch| QUOTE_CHARS.contains(&ch));

        if let Some(prev) = text.previous_word(index) {
            let lowered = prev.as_string().to_lowercase();
            features.prev_word_len = prev.len();
            features.prev_is_upper = prev.is_upper();
            features.prev_is_number = prev.is_numeric();
            features.prev_is_title = TITLES.contains(&lowered.as_str());
            features.prev_is_initial = prev.len() == 1 && prev.is_upper();
            // WHY: a token longer than any entry plus trimmed punctuation can never match
            let window = self.abbreviations.max_chars() + TOKEN_WINDOW_MARGIN;
            features.prev_is_abbreviation = self.abbreviations.contains(&lowered)
                || previous_token(text, index, window)
                    .is_some_and(|token| self.abbreviations.contains(&token));
            features.prev_in_parenthesis = prev.start > 0 && text.get(prev.start - 1) == Some('(');

            if let Some(prev_prev) = text.previous_word(prev.start) {
                features.prev_prev_word_len = prev_prev.len();
                features.prev_prev_is_abbreviation =
                    self.abbreviations.contains(&prev_prev.as_string());
                features.abbreviation_chain = is_chained(text, &prev_prev, &prev);
            }
        }

        let prev_char = index.checked_sub(1).and_then(|i| text.get(i));
        let next_char = text.get(index + 1);
        if let Some(ch) = prev_char {
            features.set_prev_char(CharClass::of(ch));
        }
        if let Some(ch) = next_char {
            features.set_next_char(CharClass::of(ch));
        }
        features.next_next_char_is_period = text.get(index + 2) == Some('.');
        features.is_ellipsis = prev_char.is_some_and(is_candidate) || next_char.is_some_and(is_candidate);

        features
    }

    /// One vector per candidate, paired with its index
    pub fn extract_all(&self, text: &Text) -> Vec<(usize, FeatureVector)> {
        text.candidates().map(|i| (i, self.extract(text, i))).collect()
    }
}

/// Non-whitespace run ending just before `index`, opening punctuation trimmed.
/// None when the run is longer than `window` chars.
fn previous_token(text: &Text, index: usize, window: usize) -> Option<String> {
    let chars = &text.chars()[..index.min(text.len())];
    let lower = chars.len().saturating_sub(window.saturating_add(1));
    let start = match chars[lower..].iter().rposition(|ch| ch.is_whitespace()) {
        Some(pos) => lower + pos + 1,
        None if lower == 0 => 0,
        None => return None,
    };
    Some(
        chars[start..]
            .iter()
            .collect::<String>()
            .trim_start_matches(OPENING_CHARS)
            .to_string(),
    )
}

/// Two words joined by a single period, as in "e.g" or "U.S"
fn is_chained(text: &Text, first: &Word<'_>, second: &Word<'_>) -> bool {
    second.start == first.end + 1 && text.get(first.end) == Some('.')
}
