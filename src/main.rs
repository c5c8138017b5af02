use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};

use sentseg::abbreviations::DEFAULT_ABBREVIATIONS_FILE;
use sentseg::dataset::{self, TableFormat};
use sentseg::evaluation::{self, Evaluation};
use sentseg::{
    alignment, reader, AbbreviationConfig, FeatureExtractor, RuleSegmenter, SegmentationContext,
    StaticCategorySource, Text,
};

#[derive(Parser, Debug)]
#[command(name = "sentseg")]
#[command(about = "Sentence boundary detection and segmentation scoring")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score a predicted sentence-per-line file against a gold one
    Evaluate {
        /// Gold segmentation, one sentence per line
        gold: PathBuf,
        /// Predicted segmentation, one sentence per line
        pred: PathBuf,
    },
    /// Segment raw text with the rule-based segmenter
    Segment {
        /// Raw, unsegmented text
        raw: PathBuf,
        /// Write segmented text here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        abbreviations: AbbreviationArgs,
    },
    /// Export one labeled feature row per candidate punctuation mark
    Features {
        /// Raw, unsegmented text
        raw: PathBuf,
        /// Gold text with one sentence per line
        gold: PathBuf,
        #[arg(long, value_enum, default_value = "csv")]
        format: TableFormat,
        /// Write the table here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        abbreviations: AbbreviationArgs,
    },
    /// Score the rule-based segmenter against an aligned raw/gold pair
    Compare {
        /// Raw, unsegmented text
        raw: PathBuf,
        /// Gold text with one sentence per line
        gold: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        abbreviations: AbbreviationArgs,
    },
}

#[derive(Args, Debug)]
struct AbbreviationArgs {
    /// Abbreviation list, one entry per line
    #[arg(long = "abbreviations", default_value = DEFAULT_ABBREVIATIONS_FILE)]
    path: PathBuf,
}

impl AbbreviationArgs {
    fn context(&self) -> SegmentationContext {
        let config = AbbreviationConfig {
            path: self.path.clone(),
            ..AbbreviationConfig::default()
        };
        // WHY: no remote category fetcher ships with the CLI; a missing list
        // degrades to the built-in minimum instead of failing
        SegmentationContext::from_config(&config, &StaticCategorySource::new())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    // WHY: stdout carries results, so structured logs go to stderr
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?cli, "Parsed CLI arguments");

    match cli.command {
        Command::Evaluate { gold, pred } => {
            let (gold_lines, pred_lines) =
                tokio::try_join!(reader::read_lines(&gold), reader::read_lines(&pred))?;
            let scores = evaluation::evaluate_sentences(&gold_lines[..], &pred_lines[..]);
            println!("{scores}");
        }
        Command::Segment { raw, output, abbreviations } => {
            let ctx = abbreviations.context();
            let text = reader::read_text(&raw).await?;
            let segmented = RuleSegmenter::new(&ctx)?.apply(&text);
            emit(output, &segmented).await?;
        }
        Command::Features { raw, gold, format, output, abbreviations } => {
            let ctx = abbreviations.context();
            let (raw_text, gold_text) =
                tokio::try_join!(reader::read_text(&raw), reader::read_text(&gold))?;
            let raw_text = Text::new(&raw_text);
            let labels = alignment::labels(&raw_text, &Text::new(&gold_text));

            let rows = dataset::create_dataset(&raw_text, &labels, &FeatureExtractor::new(&ctx));
            let mut buffer = Vec::new();
            dataset::write_rows(&rows, format, &mut buffer)?;
            emit(output, &String::from_utf8(buffer)?).await?;
        }
        Command::Compare { raw, gold, json, abbreviations } => {
            let ctx = abbreviations.context();
            let (raw_text, gold_text) =
                tokio::try_join!(reader::read_text(&raw), reader::read_text(&gold))?;

            let truth = alignment::gold_boundaries(&Text::new(&raw_text), &Text::new(&gold_text));
            let predicted = RuleSegmenter::new(&ctx)?.boundaries(&raw_text);
            let report = Evaluation::new(&truth, &predicted);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let counts = report.counts;
                println!("TP: {}, FP: {}, FN: {}", counts.tp, counts.fp, counts.fn_);
                println!("{}", report.scores);
                match report.tolerant_recall {
                    Some(recall) => println!("Tolerant recall: {recall:?}"),
                    None => println!("Tolerant recall: undefined (no gold boundaries)"),
                }
            }
        }
    }

    Ok(())
}

/// Write to `output` when given, otherwise print to stdout
async fn emit(output: Option<PathBuf>, content: &str) -> Result<()> {
    match output {
        Some(path) => reader::write_text(&path, content).await,
        None => {
            print!("{content}");
            Ok(())
        }
    }
}
