//! Extract heading outlines from a directory of glyph dumps.
//!
//! Every `*.json` dump in the input directory produces a `<name>.json`
//! outline in the output directory:
//!
//! ```text
//! extract_outline --input-dir ./dumps --output-dir ./outlines --timing
//! ```

use clap::{ArgAction, Parser, ValueEnum};
use pdf_outline::{
    BatchRunner, LevelStrategyKind, OutlineConfig, OutlineEngine, TitleStrategyKind,
};
use std::fs;
use std::path::PathBuf;

/// Level classification strategy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Strategy {
    /// Patterns and size thresholds, font ranking as backstop
    Hybrid,
    /// Patterns and size thresholds only
    Pattern,
    /// Distinct (size, emphasis) pairs ranked into levels
    Rank,
}

impl From<Strategy> for LevelStrategyKind {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Hybrid => LevelStrategyKind::Hybrid,
            Strategy::Pattern => LevelStrategyKind::PatternThreshold,
            Strategy::Rank => LevelStrategyKind::RankBased,
        }
    }
}

/// Title selection policy.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TitlePolicy {
    /// First prominent line near the top of the first page
    EarlyPage,
    /// Highest scoring first-page line
    Scored,
}

impl From<TitlePolicy> for TitleStrategyKind {
    fn from(policy: TitlePolicy) -> Self {
        match policy {
            TitlePolicy::EarlyPage => TitleStrategyKind::EarlyPage,
            TitlePolicy::Scored => TitleStrategyKind::Scored,
        }
    }
}

/// Extract a title and H1-H5 outline from decoded document glyphs.
#[derive(Parser, Debug)]
#[command(name = "extract_outline")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding the glyph dumps
    #[arg(long, default_value = "/app/input")]
    input_dir: PathBuf,

    /// Directory receiving the outlines
    #[arg(long, default_value = "/app/output")]
    output_dir: PathBuf,

    /// JSON configuration file, overlaid on the defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Level classification strategy
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Title selection policy
    #[arg(long, value_enum)]
    title: Option<TitlePolicy>,

    /// Number of heading levels to hand out (1-5)
    #[arg(long)]
    max_levels: Option<usize>,

    /// Merge headings that wrap onto a second line
    #[arg(long, action = ArgAction::SetTrue)]
    merge_lines: bool,

    /// Add time_taken_seconds to each output
    #[arg(long, action = ArgAction::SetTrue)]
    timing: bool,

    /// Process documents one at a time
    #[arg(long, action = ArgAction::SetTrue)]
    sequential: bool,

    /// Enable debug logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn load_config(args: &Args) -> pdf_outline::Result<OutlineConfig> {
    let mut config = match &args.config {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => OutlineConfig::default(),
    };

    if let Some(strategy) = args.strategy {
        config = config.with_level_strategy(strategy.into());
    }
    if let Some(policy) = args.title {
        config = config.with_title_strategy(policy.into());
    }
    if let Some(max_levels) = args.max_levels {
        config = config.with_max_levels(max_levels);
    }
    if args.merge_lines {
        config = config.with_merge_wrapped_lines(true);
    }
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let engine = OutlineEngine::with_config(load_config(&args)?)?;
    let summary = BatchRunner::new(engine, args.input_dir.clone(), args.output_dir.clone())
        .with_timing(args.timing)
        .with_parallel(!args.sequential)
        .run()?;

    println!(
        "Processed {} documents ({} failed) into {}",
        summary.processed + summary.failed,
        summary.failed,
        args.output_dir.display()
    );
    Ok(())
}
