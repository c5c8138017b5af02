pub mod abbreviations;
pub mod alignment;
pub mod config;
pub mod dataset;
pub mod evaluation;
pub mod features;
pub mod reader;
pub mod sentence_detector;
pub mod text;

// Re-export main types for convenient access
pub use abbreviations::{AbbreviationSet, CategorySource, StaticCategorySource};
pub use config::{AbbreviationConfig, SegmentationContext};
pub use evaluation::{Counts, Evaluation, Scores};
pub use features::{FeatureExtractor, FeatureVector, FEATURE_SCHEMA_VERSION};
pub use sentence_detector::{BoundaryClassifier, ClassifierSegmenter, RuleSegmenter};
pub use text::Text;
