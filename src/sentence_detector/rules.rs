// WHY: Rule-based boundary insertion as an ordered list of exception predicates
// Candidate sites come from a compiled regex; exceptions are plain predicates so
// abbreviations never have to be escaped into pattern syntax

use anyhow::Result;
use regex_automata::meta::Regex;
use std::collections::BTreeSet;
use tracing::{debug, info};

use super::split_at_boundaries;
use crate::abbreviations::AbbreviationSet;
use crate::config::SegmentationContext;
use crate::text::{is_word_char, Text};

/// Marker written in place of the whitespace that follows an accepted period
pub const BOUNDARY_MARKER: char = '\n';

/// Exceptions that suppress a boundary, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleException {
    /// 1–2 digit token before the period (ordinals, numbered lists)
    NumeralPrefix,
    /// Known abbreviation before the period
    Abbreviation,
    /// Single word character before the period (an initial)
    BareInitial,
}

impl RuleException {
    pub const ORDER: [RuleException; 3] = [
        RuleException::NumeralPrefix,
        RuleException::Abbreviation,
        RuleException::BareInitial,
    ];
}

/// Outcome of evaluating the rule at one `.` + whitespace site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleDecision {
    Boundary,
    Suppressed(RuleException),
    /// Next sentence would start lowercase
    LowercaseContinuation,
}

impl RuleDecision {
    pub fn is_boundary(&self) -> bool {
        matches!(self, RuleDecision::Boundary)
    }
}

/// One `.` + whitespace site found in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleSite {
    /// Byte offset of the period
    pub period_byte: usize,
    /// Char offset of the period
    pub period_char: usize,
    /// Byte range of the whitespace character after the period
    pub space_start: usize,
    pub space_end: usize,
    pub decision: RuleDecision,
}

/// Rule segmenter bound to one shared abbreviation set
pub struct RuleSegmenter<'a> {
    abbreviations: &'a AbbreviationSet,
    sites: Regex,
}

impl<'a> RuleSegmenter<'a> {
    pub fn new(ctx: &'a SegmentationContext) -> Result<Self> {
        Self::with_abbreviations(ctx.abbreviations())
    }

    /// Use `abbreviations` exactly as given; only `SegmentationContext` adds
    /// the always-included entries
    pub fn with_abbreviations(abbreviations: &'a AbbreviationSet) -> Result<Self> {
        let pattern = r"\.\s";
        let sites = Regex::new(pattern)?;
        debug!("Compiled rule site pattern: {}", pattern);
        Ok(Self { abbreviations, sites })
    }

    /// Decide the site whose period sits at `period_byte` and whose
    /// whitespace ends at `space_end`
    pub fn decide(&self, text: &str, period_byte: usize, space_end: usize) -> RuleDecision {
        let before = &text[..period_byte];
        for exception in RuleException::ORDER {
            let fires = match exception {
                RuleException::NumeralPrefix => numeral_prefix(before),
                RuleException::Abbreviation => abbreviation_suffix(before, self.abbreviations),
                RuleException::BareInitial => bare_initial(before),
            };
            if fires {
                return RuleDecision::Suppressed(exception);
            }
        }

        match text[space_end..].chars().next() {
            Some(next) if next.is_lowercase() => RuleDecision::LowercaseContinuation,
            _ => RuleDecision::Boundary,
        }
    }

    /// Every `.` + whitespace site in order, each with its decision
    pub fn scan(&self, text: &str) -> Vec<RuleSite> {
        let mut sites = Vec::new();
        let mut char_pos = 0;
        let mut byte_pos = 0;

        for m in self.sites.find_iter(text) {
            // WHY: incremental char counting keeps the scan O(n)
            char_pos += text[byte_pos..m.start()].chars().count();
            byte_pos = m.start();

            let space_start = m.start() + 1;
            sites.push(RuleSite {
                period_byte: m.start(),
                period_char: char_pos,
                space_start,
                space_end: m.end(),
                decision: self.decide(text, m.start(), m.end()),
            });
        }

        sites
    }

    /// Replace the whitespace after each accepted period with a newline
    /// WHY: replacing rather than inserting keeps content characters intact and
    /// makes re-application a no-op
    pub fn apply(&self, text: &str) -> String {
        let mut output = String::with_capacity(text.len());
        let mut last = 0;
        let mut inserted = 0;

        for site in self.scan(text).into_iter().filter(|s| s.decision.is_boundary()) {
            output.push_str(&text[last..site.space_start]);
            output.push(BOUNDARY_MARKER);
            last = site.space_end;
            inserted += 1;
        }
        output.push_str(&text[last..]);

        info!("Rule segmenter marked {} boundaries", inserted);
        output
    }

    /// Char indices of the periods the rule accepts as sentence ends
    pub fn boundaries(&self, text: &str) -> BTreeSet<usize> {
        self.scan(text)
            .into_iter()
            .filter(|s| s.decision.is_boundary())
            .map(|s| s.period_char)
            .collect()
    }

    /// Sentences of `text` according to the rule
    pub fn split(&self, text: &str) -> Vec<String> {
        let boundaries = self.boundaries(text);
        split_at_boundaries(&Text::new(text), &boundaries)
    }
}

/// Trailing word run (after at most one whitespace char) is 1–2 digits
fn numeral_prefix(before: &str) -> bool {
    let mut chars = before.chars().rev().peekable();
    if chars.peek().is_some_and(|ch| ch.is_whitespace()) {
        chars.next();
    }

    let mut digits = 0;
    for ch in chars {
        if !is_word_char(ch) {
            break;
        }
        if !ch.is_numeric() {
            return false;
        }
        digits += 1;
        if digits > 2 {
            return false;
        }
    }
    digits > 0
}

/// `before` ends with a known abbreviation that starts on a word boundary
fn abbreviation_suffix(before: &str, abbreviations: &AbbreviationSet) -> bool {
    let max = abbreviations.max_chars();
    if max == 0 {
        return false;
    }

    let tail: Vec<char> = before.chars().rev().take(max + 1).collect();
    let mut suffix = String::new();
    for (len, ch) in tail.iter().enumerate().take(max) {
        suffix.insert(0, *ch);
        let preceding = tail.get(len + 1).copied();
        let at_word_boundary = preceding.is_some_and(is_word_char) != is_word_char(*ch);
        if at_word_boundary && abbreviations.matches_exactly(&suffix) {
            return true;
        }
    }
    false
}

/// Single word character preceded by a word boundary
fn bare_initial(before: &str) -> bool {
    let mut chars = before.chars().rev();
    match chars.next() {
        Some(last) if is_word_char(last) => !chars.next().is_some_and(is_word_char),
        _ => false,
    }
}
