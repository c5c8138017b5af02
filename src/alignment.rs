// WHY: Gold boundaries expressed as raw-text offsets
// Alignment counts content (non-whitespace) characters so differing whitespace
// runs between raw and gold files do not shift boundaries

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::text::Text;

/// Raw-text indices of every non-whitespace character, in order
pub fn content_map(raw: &Text) -> Vec<usize> {
    raw.chars()
        .iter()
        .enumerate()
        .filter(|(_, ch)| !ch.is_whitespace())
        .map(|(i, _)| i)
        .collect()
}

/// Raw-text index of the last content char before each gold newline.
///
/// Raw and gold must contain the same non-whitespace characters in the same
/// order. When they diverge the result is silently wrong; indices that fall
/// past the raw content are dropped.
pub fn gold_boundaries(raw: &Text, gold: &Text) -> BTreeSet<usize> {
    let map = content_map(raw);
    let mut boundaries = BTreeSet::new();
    let mut content_count = 0usize;
    let mut dropped = 0usize;

    for &ch in gold.chars() {
        if !ch.is_whitespace() {
            content_count += 1;
        } else if ch == '\n' && content_count > 0 {
            match map.get(content_count - 1) {
                Some(&raw_index) => {
                    boundaries.insert(raw_index);
                }
                None => dropped += 1,
            }
        }
    }

    if dropped > 0 {
        debug!("Dropped {} gold boundaries beyond raw content ({} chars)", dropped, map.len());
    }
    boundaries
}

/// `{raw_index: 1}` for every gold boundary; absent indices are label 0
pub fn labels(raw: &Text, gold: &Text) -> BTreeMap<usize, u8> {
    gold_boundaries(raw, gold)
        .into_iter()
        .map(|i| (i, 1))
        .collect()
}
