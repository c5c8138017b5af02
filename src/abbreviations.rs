// WHY: Centralized abbreviation handling for sentence boundary detection
// Built once per run and shared read-only by the rule segmenter and feature extractor

use anyhow::{bail, Context, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info, warn};

/// Default location of the local abbreviation resource
pub const DEFAULT_ABBREVIATIONS_FILE: &str = "abbreviations.txt";

/// Entries added after every load regardless of where the set came from
pub const ALWAYS_INCLUDED: &[&str] = &["Ms", "obr"];

/// Category listings merged when no local resource exists
pub const BOOTSTRAP_CATEGORIES: &[&str] = &[
    "Kategorie:České zkratky",
    "Category:English abbreviations",
    "Category:Polish abbreviations",
];

/// External provider of category member titles (e.g. a wiki category listing)
pub trait CategorySource {
    fn category_members(&self, category: &str) -> Result<Vec<String>>;
}

/// Fixed in-memory listings; also serves as an offline source when empty
#[derive(Debug, Clone, Default)]
pub struct StaticCategorySource {
    categories: Vec<(String, Vec<String>)>,
}

impl StaticCategorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category<I, S>(mut self, category: &str, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .push((category.to_string(), members.into_iter().map(Into::into).collect()));
        self
    }
}

impl CategorySource for StaticCategorySource {
    fn category_members(&self, category: &str) -> Result<Vec<String>> {
        self.categories
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, members)| members.clone())
            .with_context(|| format!("Category listing unavailable: {category}"))
    }
}

/// Ordered, deduplicated abbreviations with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct AbbreviationSet {
    entries: BTreeSet<String>,
    lowercase: HashSet<String>,
    max_chars: usize,
}

impl AbbreviationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for entry in entries {
            set.insert(entry.as_ref());
        }
        set
    }

    /// Insert one entry; blank input and trailing periods are ignored
    pub fn insert(&mut self, entry: &str) {
        let entry = normalize_entry(entry);
        if entry.is_empty() {
            return;
        }
        self.max_chars = self.max_chars.max(entry.chars().count());
        self.lowercase.insert(entry.to_lowercase());
        self.entries.insert(entry.to_string());
    }

    /// Parse the local resource: one abbreviation per line, case preserved
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let set = Self::from_entries(content.lines().map(str::trim));
        info!("Loaded {} abbreviations from {}", set.len(), path.display());
        Ok(set)
    }

    /// Merge the bootstrap categories, keeping only dotted members.
    ///
    /// A listing that fails is skipped; the merge errors only when every
    /// listing fails.
    pub fn bootstrap(source: &dyn CategorySource) -> Result<Self> {
        let mut set = Self::new();
        let mut fetched = 0;
        for category in BOOTSTRAP_CATEGORIES {
            let members = match source.category_members(category) {
                Ok(members) => members,
                Err(e) => {
                    warn!("Skipping category {}: {:#}", category, e);
                    continue;
                }
            };
            fetched += 1;
            debug!("Category {} returned {} members", category, members.len());
            // WHY: undotted titles (acronyms like "NATO") never precede a false period split
            for member in members.iter().filter(|m| m.contains('.')) {
                set.insert(member);
            }
        }
        if fetched == 0 {
            bail!("None of {} category listings could be fetched", BOOTSTRAP_CATEGORIES.len());
        }
        info!(
            "Bootstrapped {} abbreviations from {} of {} category listings",
            set.len(),
            fetched,
            BOOTSTRAP_CATEGORIES.len()
        );
        Ok(set)
    }

    /// Write entries sorted, one per line
    pub fn persist<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let content = self.entries.iter().cloned().collect::<Vec<_>>().join("\n");
        fs::write(path, content)
    }

    /// Local resource first, then bootstrap, then the hardcoded minimum. Never fails.
    pub fn load_or_bootstrap<P: AsRef<Path>>(path: P, source: &dyn CategorySource) -> Self {
        let path = path.as_ref();
        let mut set = match Self::load(path) {
            Ok(set) => set,
            Err(e) => {
                if e.kind() == io::ErrorKind::NotFound {
                    info!("No abbreviation file at {}, bootstrapping", path.display());
                } else {
                    warn!("Failed to read abbreviation file {}: {}", path.display(), e);
                }
                match Self::bootstrap(source) {
                    Ok(set) => {
                        if let Err(e) = set.persist(path) {
                            warn!("Failed to persist abbreviations to {}: {}", path.display(), e);
                        }
                        set
                    }
                    Err(e) => {
                        warn!("Abbreviation bootstrap failed, continuing with minimal set: {:#}", e);
                        Self::new()
                    }
                }
            }
        };
        set.add_always_included();
        set
    }

    pub fn add_always_included(&mut self) {
        for entry in ALWAYS_INCLUDED {
            self.insert(entry);
        }
    }

    /// Case-insensitive membership, ignoring trailing periods
    pub fn contains(&self, word: &str) -> bool {
        let word = normalize_entry(word);
        !word.is_empty() && self.lowercase.contains(&word.to_lowercase())
    }

    /// Case-insensitive membership of `candidate` exactly as written
    pub fn matches_exactly(&self, candidate: &str) -> bool {
        self.lowercase.contains(&candidate.to_lowercase())
    }

    /// Length in chars of the longest entry
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

fn normalize_entry(entry: &str) -> &str {
    let entry = entry.trim();
    entry.trim_end_matches('.')
}
