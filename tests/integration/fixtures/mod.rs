// Test fixtures with aligned raw/gold texts and expected outputs
// WHY: Golden-file testing requires deterministic input/output pairs for validation

/// Abbreviation list used alongside the Czech fixtures
pub const ABBREVIATIONS: &str = "Dr\nprof\nnapř";

/// Raw Czech paragraph exercising every rule exception
pub const CZECH_RAW: &str = "Dr. Novák přišel 12. května do Prahy. Potkal prof. Svobodu. Ten řekl, že J. Dvořák odjel. Konec.\n";

/// Gold segmentation of CZECH_RAW, one sentence per line
pub const CZECH_GOLD: &str = "Dr. Novák přišel 12. května do Prahy.
Potkal prof. Svobodu.
Ten řekl, že J. Dvořák odjel.
Konec.
";

/// Rule segmenter output for CZECH_RAW
/// WHY: Whitespace after accepted periods becomes a newline, nothing else changes
pub const CZECH_SEGMENTED: &str = "Dr. Novák přišel 12. května do Prahy.
Potkal prof. Svobodu.
Ten řekl, že J. Dvořák odjel.
Konec.
";

/// Raw text whose second period is a lowercase continuation the gold splits on
pub const MISSED_RAW: &str = "Byl tam. Jak se má? Dobře! viz tab. dole.";

/// Gold segmentation of MISSED_RAW with irregular whitespace
pub const MISSED_GOLD: &str = "Byl tam.\n   Jak se má?\nDobře!\nviz tab.\ndole.";

/// Gold sentences for the evaluation scenario
pub const EVAL_GOLD: &str = "Dr. Smith arrived.\nHe left.\n";

/// Prediction that wrongly splits after the title
pub const EVAL_PRED: &str = "Dr.\nSmith arrived.\nHe left.\n";

/// Expected evaluate output for EVAL_GOLD vs EVAL_PRED
pub const EVAL_EXPECTED: &str = "Precision: 0.5, Recall: 1.0, F1: 0.6666666666666666";
