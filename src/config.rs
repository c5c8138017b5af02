// WHY: Explicit context object replaces process-wide abbreviation state
// Construct once before first use, then share by reference across calls

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::abbreviations::{AbbreviationSet, CategorySource, DEFAULT_ABBREVIATIONS_FILE};

/// Where abbreviations come from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbbreviationConfig {
    /// Local resource, one abbreviation per line
    pub path: PathBuf,
    /// Extra entries merged after loading
    #[serde(default)]
    pub extra: Vec<String>,
}

impl Default for AbbreviationConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_ABBREVIATIONS_FILE),
            extra: Vec::new(),
        }
    }
}

/// Read-only state shared by the rule segmenter and the feature extractor
#[derive(Debug, Clone)]
pub struct SegmentationContext {
    abbreviations: AbbreviationSet,
}

impl Default for SegmentationContext {
    fn default() -> Self {
        Self::new(AbbreviationSet::new())
    }
}

impl SegmentationContext {
    /// Wrap `abbreviations`, adding the always-included entries
    pub fn new(mut abbreviations: AbbreviationSet) -> Self {
        abbreviations.add_always_included();
        Self { abbreviations }
    }

    /// Resolve the abbreviation set per `config`; degrades instead of failing
    pub fn from_config(config: &AbbreviationConfig, source: &dyn CategorySource) -> Self {
        let mut abbreviations = AbbreviationSet::load_or_bootstrap(&config.path, source);
        for entry in &config.extra {
            abbreviations.insert(entry);
        }
        info!("Segmentation context ready with {} abbreviations", abbreviations.len());
        Self::new(abbreviations)
    }

    pub fn abbreviations(&self) -> &AbbreviationSet {
        &self.abbreviations
    }
}
