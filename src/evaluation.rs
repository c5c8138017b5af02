//! Boundary-level scoring of a predicted segmentation against gold.
//!
//! Boundaries are plain offsets; the evaluator only ever compares them as
//! sets, so order and duplicates in the inputs do not matter. Degenerate
//! inputs never error: `score` returns the `(0, 0, -1)` sentinel and
//! `tolerant_recall` returns `None`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// F1 value reported when the score is undefined
pub const UNDEFINED_F1: f64 = -1.0;

/// Confusion counts for boundary detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Counts {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
}

/// Precision, recall and F1; F1 of -1 marks an undefined score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl Scores {
    pub const UNDEFINED: Scores = Scores {
        precision: 0.0,
        recall: 0.0,
        f1: UNDEFINED_F1,
    };

    pub fn is_defined(&self) -> bool {
        self.f1 != UNDEFINED_F1
    }
}

impl fmt::Display for Scores {
    /// Undefined scores print as the integer sentinel `0, 0, -1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_defined() {
            return write!(f, "Precision: 0, Recall: 0, F1: -1");
        }
        write!(
            f,
            "Precision: {:?}, Recall: {:?}, F1: {:?}",
            self.precision, self.recall, self.f1
        )
    }
}

/// Full report for one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub counts: Counts,
    pub scores: Scores,
    pub tolerant_recall: Option<f64>,
}

impl Evaluation {
    pub fn new(truth: &BTreeSet<usize>, predicted: &BTreeSet<usize>) -> Self {
        let counts = compare(truth.iter().copied(), predicted.iter().copied());
        Self {
            counts,
            scores: score(counts),
            tolerant_recall: tolerant_recall(truth.iter().copied(), predicted.iter().copied()),
        }
    }
}

/// Offsets where each sentence but the last ends.
///
/// Lengths are counted in chars. Unless `space_included`, one separator char
/// is added per boundary. `["A.", "BB.", "C."]` gives `[3, 7]`.
pub fn sentence_indices<S: AsRef<str>>(sentences: &[S], space_included: bool) -> Vec<usize> {
    let Some((_, init)) = sentences.split_last() else {
        return Vec::new();
    };

    let mut offset = 0;
    init.iter()
        .map(|sentence| {
            offset += sentence.as_ref().chars().count();
            if !space_included {
                offset += 1;
            }
            offset
        })
        .collect()
}

/// Set comparison of true and predicted boundaries
pub fn compare<T, P>(truth: T, predicted: P) -> Counts
where
    T: IntoIterator<Item = usize>,
    P: IntoIterator<Item = usize>,
{
    let truth: BTreeSet<usize> = truth.into_iter().collect();
    let predicted: BTreeSet<usize> = predicted.into_iter().collect();

    Counts {
        tp: predicted.intersection(&truth).count(),
        fp: predicted.difference(&truth).count(),
        fn_: truth.difference(&predicted).count(),
    }
}

/// Precision/recall/F1 with the `(0, 0, -1)` sentinel for empty predictions or truth
pub fn score(counts: Counts) -> Scores {
    let Counts { tp, fp, fn_ } = counts;
    if tp + fp == 0 || tp + fn_ == 0 {
        return Scores::UNDEFINED;
    }

    let precision = tp as f64 / (tp + fp) as f64;
    let recall = tp as f64 / (tp + fn_) as f64;
    let f1 = if precision + recall != 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        UNDEFINED_F1
    };

    Scores { precision, recall, f1 }
}

/// Recall where a prediction within ±1 of a true boundary counts as a hit.
/// None when there are no true boundaries.
pub fn tolerant_recall<T, P>(truth: T, predicted: P) -> Option<f64>
where
    T: IntoIterator<Item = usize>,
    P: IntoIterator<Item = usize>,
{
    let truth: BTreeSet<usize> = truth.into_iter().collect();
    if truth.is_empty() {
        return None;
    }

    let widened: BTreeSet<usize> = predicted
        .into_iter()
        .flat_map(|p| [p.checked_sub(1), Some(p), p.checked_add(1)])
        .flatten()
        .collect();
    let hits = truth.intersection(&widened).count();
    Some(hits as f64 / truth.len() as f64)
}

/// Score two sentence-per-line listings; lines are stripped first
pub fn evaluate_sentences<G, P>(gold_lines: &[G], pred_lines: &[P]) -> Scores
where
    G: AsRef<str>,
    P: AsRef<str>,
{
    let gold: Vec<&str> = gold_lines.iter().map(|l| l.as_ref().trim()).collect();
    let pred: Vec<&str> = pred_lines.iter().map(|l| l.as_ref().trim()).collect();

    let counts = compare(sentence_indices(&gold[..], false), sentence_indices(&pred[..], false));
    score(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_indices_basic() {
        assert_eq!(sentence_indices(&["A.", "BB.", "C."], false), vec![3, 7]);
        assert_eq!(sentence_indices(&["A. ", "BB. ", "C."], true), vec![3, 7]);
        assert!(sentence_indices::<&str>(&[], false).is_empty());
        assert!(sentence_indices(&["Only one."], false).is_empty());
    }

    #[test]
    fn test_sentence_indices_counts_chars_and_increases_strictly() {
        let sentences = ["Příliš.", "Žluťoučký kůň.", "", "Úpěl."];
        let indices = sentence_indices(&sentences, false);
        assert_eq!(indices.len(), sentences.len() - 1);
        assert_eq!(indices, vec![8, 23, 24]);
        assert!(indices.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_compare_ignores_order_and_duplicates() {
        let counts = compare(vec![19, 4, 4], vec![4, 19, 19, 30]);
        assert_eq!(counts, Counts { tp: 2, fp: 1, fn_: 0 });
    }

    #[test]
    fn test_identical_sets_score_perfectly() {
        let truth = vec![3, 9, 14];
        let counts = compare(truth.clone(), truth);
        assert_eq!(counts, Counts { tp: 3, fp: 0, fn_: 0 });
        assert_eq!(score(counts), Scores { precision: 1.0, recall: 1.0, f1: 1.0 });
    }

    #[test]
    fn test_degenerate_scores_use_sentinel() {
        assert_eq!(score(Counts::default()), Scores::UNDEFINED);
        assert_eq!(score(Counts { tp: 0, fp: 0, fn_: 5 }), Scores::UNDEFINED);
        assert_eq!(score(Counts { tp: 0, fp: 3, fn_: 0 }), Scores::UNDEFINED);
        assert!(!Scores::UNDEFINED.is_defined());
    }

    #[test]
    fn test_zero_hits_with_predictions_and_truth() {
        let scores = score(Counts { tp: 0, fp: 2, fn_: 2 });
        assert_eq!(scores.precision, 0.0);
        assert_eq!(scores.recall, 0.0);
        assert_eq!(scores.f1, UNDEFINED_F1);
    }

    #[test]
    fn test_dr_smith_scenario() {
        let gold = ["Dr. Smith arrived.", "He left."];
        let pred = ["Dr.", "Smith arrived.", "He left."];

        assert_eq!(sentence_indices(&gold, false), vec![19]);
        assert_eq!(sentence_indices(&pred, false), vec![4, 19]);

        let counts = compare(sentence_indices(&gold, false), sentence_indices(&pred, false));
        assert_eq!(counts, Counts { tp: 1, fp: 1, fn_: 0 });

        let scores = score(counts);
        assert_eq!(scores.precision, 0.5);
        assert_eq!(scores.recall, 1.0);
        assert!((scores.f1 - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_sentences_strips_lines() {
        let gold = ["Dr. Smith arrived.\n", "He left.\n"];
        let pred = ["  Dr.\n", "Smith arrived. \n", "He left."];
        let scores = evaluate_sentences(&gold, &pred);
        assert_eq!(scores.precision, 0.5);
        assert_eq!(scores.recall, 1.0);
    }

    #[test]
    fn test_tolerant_recall_accepts_off_by_one() {
        let truth = [10, 20, 30];
        assert_eq!(tolerant_recall(truth, [11, 19, 35]), Some(2.0 / 3.0));
        assert_eq!(tolerant_recall(truth, [0]), Some(0.0));
        assert_eq!(tolerant_recall([0], [1]), Some(1.0));
    }

    #[test]
    fn test_tolerant_recall_undefined_without_truth() {
        assert_eq!(tolerant_recall(Vec::new(), vec![1, 2]), None);
    }

    #[test]
    fn test_tolerant_recall_never_below_strict_recall() {
        let cases: [(&[usize], &[usize]); 4] = [
            (&[1, 5, 9], &[1, 6, 12]),
            (&[0, 2], &[0, 1, 2, 3]),
            (&[4], &[]),
            (&[7, 8], &[8]),
        ];
        for (truth, pred) in cases {
            let strict = score(compare(truth.iter().copied(), pred.iter().copied())).recall;
            let tolerant = tolerant_recall(truth.iter().copied(), pred.iter().copied())
                .expect("truth is non-empty");
            assert!(tolerant >= strict, "tolerant {tolerant} < strict {strict} for {truth:?} / {pred:?}");
        }
    }

    #[test]
    fn test_scores_display_format() {
        let scores = Scores { precision: 0.5, recall: 1.0, f1: 2.0 / 3.0 };
        assert_eq!(
            scores.to_string(),
            "Precision: 0.5, Recall: 1.0, F1: 0.6666666666666666"
        );
        assert_eq!(Scores::UNDEFINED.to_string(), "Precision: 0, Recall: 0, F1: -1");
        assert_eq!(score(Counts { tp: 0, fp: 0, fn_: 4 }).to_string(), "Precision: 0, Recall: 0, F1: -1");
    }

    #[test]
    fn test_evaluation_bundles_all_metrics() {
        let truth = BTreeSet::from([2, 6]);
        let predicted = BTreeSet::from([3, 6]);
        let evaluation = Evaluation::new(&truth, &predicted);
        assert_eq!(evaluation.counts, Counts { tp: 1, fp: 1, fn_: 1 });
        assert_eq!(evaluation.tolerant_recall, Some(1.0));
        assert_eq!(evaluation.scores.precision, 0.5);
    }
}
