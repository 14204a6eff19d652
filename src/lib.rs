//! voc2yolo: convert Pascal VOC detection datasets into YOLO label trees.
//!
//! The converter reads `Annotations/`, `JPEGImages/` and the split index
//! files under `ImageSets/Main/`, and writes `labels/<split>/*.txt` plus
//! copied images under `images/<split>/`, ready for Ultralytics-style
//! training.
//!
//! # Modules
//!
//! - [`ir`]: box geometry, class map and the VOC / YOLO file formats
//! - [`conversion`]: the dataset walker and its report
//! - [`error`]: error types for whole-run failures
//!
//! # Example
//!
//! ```no_run
//! use voc2yolo::conversion::{convert_dataset, ConvertConfig};
//! use voc2yolo::ir::ClassMap;
//!
//! let config = ConvertConfig::new("datasets/VOC", "datasets/yolo", ClassMap::builtin());
//! let report = convert_dataset(&config)?;
//! print!("{report}");
//! # Ok::<(), voc2yolo::Voc2YoloError>(())
//! ```

pub mod conversion;
pub mod error;
pub mod ir;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use error::Voc2YoloError;

use conversion::{convert_dataset, ConversionReport, ConvertConfig};
use ir::ClassMap;

/// The voc2yolo CLI application.
#[derive(Parser)]
#[command(name = "voc2yolo")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a VOC dataset into a YOLO dataset.
    Convert(ConvertArgs),
    /// Print the class table that a conversion would use.
    Classes(ClassArgs),
}

/// Where the class table comes from.
#[derive(clap::Args)]
struct ClassArgs {
    /// data.yaml whose `names:` block defines the class table.
    #[arg(long, env = "VOC2YOLO_DATA")]
    data: Option<PathBuf>,

    /// Class mapping entry, repeatable (e.g. `--class jg=0 --class rxd=1`).
    #[arg(long = "class", value_name = "NAME=ID", value_parser = parse_class_pair, conflicts_with = "data")]
    classes: Vec<(String, u32)>,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// VOC dataset root (containing Annotations/, JPEGImages/, ImageSets/Main/).
    voc_root: PathBuf,

    /// Output directory for images/, labels/ and data.yaml.
    output_dir: PathBuf,

    #[command(flatten)]
    class_args: ClassArgs,

    /// Split to convert, repeatable (default: train, val, test).
    #[arg(long = "split", value_name = "NAME")]
    splits: Vec<String>,

    /// Worker threads (0 = one per core).
    #[arg(long, short = 'j', default_value_t = 0)]
    jobs: usize,

    /// Ignore split files and convert every annotation into labels/ and images/.
    #[arg(long, conflicts_with = "splits")]
    flat: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    report: String,

    /// Exit non-zero if any warning or error was reported.
    #[arg(long)]
    strict: bool,
}

/// Run the voc2yolo CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Voc2YoloError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Classes(args)) => run_classes(args),
        None => {
            println!("voc2yolo {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert Pascal VOC datasets into YOLO label trees.");
            println!();
            println!("Run 'voc2yolo --help' for usage information.");
            Ok(())
        }
    }
}

fn run_convert(args: ConvertArgs) -> Result<(), Voc2YoloError> {
    // Fail on a bad --report value before touching the filesystem.
    if !matches!(args.report.as_str(), "text" | "json") {
        return Err(Voc2YoloError::UnsupportedReportFormat(format!(
            "'{}' (supported: text, json)",
            args.report
        )));
    }

    let classes = load_class_map(&args.class_args)?;
    let mut config =
        ConvertConfig::new(args.voc_root, args.output_dir, classes).with_flat(args.flat);
    if !args.splits.is_empty() {
        config = config.with_splits(args.splits);
    }
    if args.jobs > 0 {
        config = config.with_jobs(args.jobs);
    }

    let report = convert_dataset(&config)?;
    print_report(&report, &args.report)?;

    let error_count = report.error_count();
    let warning_count = report.warning_count();
    if args.strict && (error_count > 0 || warning_count > 0) {
        return Err(Voc2YoloError::StrictFailed {
            error_count,
            warning_count,
        });
    }

    Ok(())
}

fn run_classes(args: ClassArgs) -> Result<(), Voc2YoloError> {
    let classes = load_class_map(&args)?;
    for (id, name) in classes.names_by_id().iter().enumerate() {
        println!("{} {}", id, name);
    }
    Ok(())
}

/// Class table precedence: `--data`, then `--class` pairs, then the built-in table.
fn load_class_map(args: &ClassArgs) -> Result<ClassMap, Voc2YoloError> {
    if let Some(path) = &args.data {
        log::debug!("loading class table from {}", path.display());
        return ClassMap::from_data_yaml(path);
    }
    if !args.classes.is_empty() {
        return ClassMap::new(args.classes.iter().map(|(name, id)| (name.as_str(), *id)));
    }
    Ok(ClassMap::builtin())
}

fn print_report(report: &ConversionReport, format: &str) -> Result<(), Voc2YoloError> {
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(report)?),
        _ => print!("{}", report),
    }
    Ok(())
}

fn parse_class_pair(raw: &str) -> Result<(String, u32), String> {
    let (name, id) = raw
        .rsplit_once('=')
        .ok_or_else(|| format!("expected NAME=ID, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty class name in '{raw}'"));
    }
    let id = id
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid class id in '{raw}'; expected non-negative integer"))?;
    Ok((name.to_string(), id))
}
