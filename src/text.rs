// WHY: Every offset in the crate is a character index, not a byte index
// Wrapping the char buffer keeps that index space explicit at API boundaries

/// Terminal punctuation that makes a position a boundary candidate
pub const CANDIDATE_CHARS: [char; 3] = ['.', '?', '!'];

/// Immutable character view of a document with a zero-based char index space
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    chars: Vec<char>,
    /// Half-open span of every maximal alphanumeric run, in text order
    words: Vec<(usize, usize)>,
}

impl Text {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let words = word_spans(&chars);
        Self { chars, words }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Character at `index`, or None past either end
    pub fn get(&self, index: usize) -> Option<char> {
        self.chars.get(index).copied()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Render a half-open char range back into a String
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    /// Iterate over every boundary candidate index in order
    pub fn candidates(&self) -> impl Iterator<Item = usize> + '_ {
        self.chars
            .iter()
            .enumerate()
            .filter(|(_, ch)| is_candidate(**ch))
            .map(|(i, _)| i)
    }

    /// Nearest alphanumeric run strictly before `index`, cut at `index`
    /// WHY: Skips any non-alphanumeric characters between `index` and the word
    pub fn previous_word(&self, index: usize) -> Option<Word<'_>> {
        let index = index.min(self.chars.len());
        let before = self.words.partition_point(|&(start, _)| start < index);
        let &(start, end) = self.words[..before].last()?;
        Some(Word::new(&self.chars, start, end.min(index)))
    }

    /// Nearest alphanumeric run strictly after `index`, starting past `index`
    pub fn next_word(&self, index: usize) -> Option<Word<'_>> {
        let from = index.saturating_add(1);
        let passed = self.words.partition_point(|&(_, end)| end <= from);
        let &(start, end) = self.words.get(passed)?;
        Some(Word::new(&self.chars, start.max(from), end))
    }

    /// First non-whitespace character after `index`
    pub fn next_non_space(&self, index: usize) -> Option<char> {
        self.chars
            .iter()
            .skip(index.saturating_add(1))
            .copied()
            .find(|ch| !ch.is_whitespace())
    }
}

impl From<&str> for Text {
    fn from(text: &str) -> Self {
        Text::new(text)
    }
}

/// A borrowed alphanumeric run together with its position in the source Text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word<'a> {
    pub start: usize,
    pub end: usize,
    chars: &'a [char],
}

impl<'a> Word<'a> {
    fn new(source: &'a [char], start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            chars: &source[start..end],
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn first(&self) -> Option<char> {
        self.chars.first().copied()
    }

    /// Mirrors str::isupper: at least one cased char and no lowercase chars
    pub fn is_upper(&self) -> bool {
        self.chars.iter().any(|ch| ch.is_uppercase())
            && !self.chars.iter().any(|ch| ch.is_lowercase())
    }

    pub fn is_numeric(&self) -> bool {
        !self.chars.is_empty() && self.chars.iter().all(|ch| ch.is_numeric())
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

fn word_spans(chars: &[char]) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut start = None;
    for (pos, ch) in chars.iter().enumerate() {
        match (ch.is_alphanumeric(), start) {
            (true, None) => start = Some(pos),
            (false, Some(s)) => {
                spans.push((s, pos));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        spans.push((s, chars.len()));
    }
    spans
}

pub fn is_candidate(ch: char) -> bool {
    CANDIDATE_CHARS.contains(&ch)
}

/// Regex `\w` equivalent used for word-boundary checks
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidates_cover_terminal_punctuation_only() {
        let text = Text::new("Hi. Why? Now! a,b;c");
        let found: Vec<usize> = text.candidates().collect();
        assert_eq!(found, vec![2, 7, 12]);
    }

    #[test]
    fn test_previous_word_skips_punctuation() {
        let text = Text::new("(Dr.) Smith.");
        let word = text.previous_word(11).expect("word before final period");
        assert_eq!(word.as_string(), "Smith");
        assert_eq!((word.start, word.end), (6, 11));

        let word = text.previous_word(6).expect("word before Smith");
        assert_eq!(word.as_string(), "Dr");
    }

    #[test]
    fn test_next_word_runs_to_end_of_text() {
        let text = Text::new("end. \"Next");
        let word = text.next_word(3).expect("word after period");
        assert_eq!(word.as_string(), "Next");
        assert_eq!(word.end, text.len());
    }

    #[test]
    fn test_word_lookup_on_empty_and_edges() {
        let empty = Text::new("");
        assert!(empty.previous_word(0).is_none());
        assert!(empty.next_word(0).is_none());

        let text = Text::new("...");
        assert!(text.previous_word(1).is_none());
        assert!(text.next_word(1).is_none());
        assert_eq!(text.next_non_space(2), None);
    }

    #[test]
    fn test_word_lookup_from_inside_a_word() {
        let text = Text::new("abc def");
        assert_eq!(text.previous_word(2).map(|w| w.as_string()), Some("ab".to_string()));
        assert_eq!(text.next_word(0).map(|w| (w.start, w.end)), Some((1, 3)));
        assert_eq!(text.next_word(3).map(|w| w.as_string()), Some("def".to_string()));
    }

    #[test]
    fn test_word_lookup_across_long_punctuation_runs() {
        let raw = format!("Konec{}Start", ".".repeat(20_000));
        let text = Text::new(&raw);

        let prev = text.previous_word(20_004).expect("word before the run");
        assert_eq!((prev.start, prev.end), (0, 5));
        let next = text.next_word(5).expect("word after the run");
        assert_eq!(next.as_string(), "Start");
        assert_eq!(text.candidates().count(), 20_000);
    }

    #[test]
    fn test_char_indexing_is_not_byte_indexing() {
        let text = Text::new("Čau. Ahoj.");
        assert_eq!(text.get(3), Some('.'));
        assert_eq!(text.slice(0, 3), "Čau");
        assert_eq!(text.candidates().collect::<Vec<_>>(), vec![3, 9]);
    }

    #[test]
    fn test_word_case_predicates() {
        let text = Text::new("NATO 42 Abc");
        assert!(text.next_word(usize::MAX).is_none());
        let nato = text.previous_word(4).unwrap();
        assert!(nato.is_upper());
        let digits = text.previous_word(7).unwrap();
        assert!(digits.is_numeric());
        assert!(!digits.is_upper());
        let abc = text.previous_word(11).unwrap();
        assert!(!abc.is_upper());
    }
}
