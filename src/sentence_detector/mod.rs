// WHY: Detector interface shared by the rule segmenter and the classifier-driven path
// Both produce boundary sets in the char index space of the input text

use std::collections::BTreeSet;
use tracing::debug;

use crate::config::SegmentationContext;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::text::Text;

pub mod rules;

pub use rules::{RuleDecision, RuleException, RuleSegmenter, RuleSite, BOUNDARY_MARKER};

/// Seam for an externally trained boundary classifier
pub trait BoundaryClassifier {
    /// True when the candidate described by `features` ends a sentence
    fn is_boundary(&self, features: &FeatureVector) -> bool;
}

impl<F> BoundaryClassifier for F
where
    F: Fn(&FeatureVector) -> bool,
{
    fn is_boundary(&self, features: &FeatureVector) -> bool {
        self(features)
    }
}

/// Feature extraction followed by per-candidate classification
pub struct ClassifierSegmenter<'a, C> {
    extractor: FeatureExtractor<'a>,
    classifier: C,
}

impl<'a, C: BoundaryClassifier> ClassifierSegmenter<'a, C> {
    pub fn new(ctx: &'a SegmentationContext, classifier: C) -> Self {
        Self {
            extractor: FeatureExtractor::new(ctx),
            classifier,
        }
    }

    /// Candidates the classifier labels as boundaries
    pub fn boundaries(&self, text: &Text) -> BTreeSet<usize> {
        let boundaries: BTreeSet<usize> = self
            .extractor
            .extract_all(text)
            .into_iter()
            .filter(|(_, features)| self.classifier.is_boundary(features))
            .map(|(i, _)| i)
            .collect();
        debug!("Classifier accepted {} boundaries", boundaries.len());
        boundaries
    }

    pub fn split(&self, text: &Text) -> Vec<String> {
        split_at_boundaries(text, &self.boundaries(text))
    }
}

/// Cut `text` after every boundary index; sentences are trimmed and empty ones dropped
pub fn split_at_boundaries(text: &Text, boundaries: &BTreeSet<usize>) -> Vec<String> {
    let mut sentences = Vec::with_capacity(boundaries.len() + 1);
    let mut start = 0;

    for &boundary in boundaries.range(..text.len()) {
        push_trimmed(&mut sentences, text.slice(start, boundary + 1));
        start = boundary + 1;
    }
    push_trimmed(&mut sentences, text.slice(start, text.len()));

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, sentence: String) {
    let trimmed = sentence.trim();
    if !trimmed.is_empty() {
        sentences.push(trimmed.to_string());
    }
}
