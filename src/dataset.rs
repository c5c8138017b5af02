// WHY: Tabular hand-off to an external classifier
// One row per candidate with the full feature schema plus a 0/1 label

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;

use crate::features::{FeatureExtractor, FeatureVector, FEATURE_SCHEMA_VERSION};
use crate::text::Text;

/// Name of the label column appended after the feature columns
pub const LABEL_COLUMN: &str = "label";

/// Output encodings for the dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TableFormat {
    /// Comma-separated with a header row
    Csv,
    /// One JSON object per line
    Jsonl,
}

/// Feature vector of one candidate and its gold label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledRow {
    #[serde(flatten)]
    pub features: FeatureVector,
    pub label: u8,
}

/// One labeled row per candidate, in text order. Indices missing from
/// `labels` are label 0.
pub fn create_dataset(
    text: &Text,
    labels: &BTreeMap<usize, u8>,
    extractor: &FeatureExtractor<'_>,
) -> Vec<LabeledRow> {
    let rows: Vec<LabeledRow> = extractor
        .extract_all(text)
        .into_iter()
        .map(|(i, features)| LabeledRow {
            features,
            label: labels.get(&i).copied().unwrap_or(0),
        })
        .collect();

    let positives = rows.iter().filter(|r| r.label == 1).count();
    info!(
        "Built dataset: {} candidates, {} boundaries, schema v{}",
        rows.len(),
        positives,
        FEATURE_SCHEMA_VERSION
    );
    rows
}

/// Header row for CSV output
pub fn header() -> Vec<&'static str> {
    let mut columns = FeatureVector::COLUMNS.to_vec();
    columns.push(LABEL_COLUMN);
    columns
}

pub fn write_rows<W: Write>(rows: &[LabeledRow], format: TableFormat, writer: W) -> Result<()> {
    match format {
        TableFormat::Csv => write_csv(rows, writer),
        TableFormat::Jsonl => write_jsonl(rows, writer),
    }
}

pub fn write_csv<W: Write>(rows: &[LabeledRow], mut writer: W) -> Result<()> {
    writeln!(writer, "{}", header().join(","))?;
    for row in rows {
        let mut fields: Vec<String> = row.features.values().into_iter().map(csv_field).collect();
        fields.push(row.label.to_string());
        writeln!(writer, "{}", fields.join(","))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_jsonl<W: Write>(rows: &[LabeledRow], mut writer: W) -> Result<()> {
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Quote a field when it contains a delimiter, quote or line break
fn csv_field(value: String) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}
