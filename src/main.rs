use std::{
    fs::{File, create_dir_all},
    path::PathBuf,
};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crosswoz_dst::{
    dst_evaluator::evaluate_model_output_file,
    merge::{DataType, merge_raw_data_files},
    ontology::clean_ontology_file,
    paths::DataPaths,
};
use log::info;
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

/// Data preparation and evaluation for BERT-based CrossWOZ dialogue state tracking.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Root of the data directory holding `crosswoz/`
    #[arg(long, env = "DST_DATA_PATH", default_value = "data", global = true)]
    data_path: PathBuf,

    /// Also write a timestamped log file into this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Inject belief states from `{data_type}_dials.json` into the raw sessions
    Merge {
        /// Splits to merge, all of them when omitted
        #[arg(long = "data-type", value_enum)]
        data_types: Vec<DataType>,
    },
    /// Split compound values and fold facility slots of `ontology.json`
    CleanOntology,
    /// Compute turn inform, turn request and joint goal accuracy
    Eval {
        #[arg(long)]
        model_output: PathBuf,
        /// Where to write the metrics and per-turn triples
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_logging(log_dir: Option<&PathBuf>) -> Result<()> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    loggers.push(TermLogger::new(
        LevelFilter::Info,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ));
    if let Some(log_dir) = log_dir {
        create_dir_all(log_dir)
            .with_context(|| format!("Unable to create log directory {}", log_dir.display()))?;
        let ts = Local::now().format("%Y%m%d_%H%M%S");
        let log_path = log_dir.join(format!("crosswoz_dst_{ts}.log"));
        loggers.push(WriteLogger::new(
            LevelFilter::Debug,
            LogConfig::default(),
            File::create(&log_path)
                .with_context(|| format!("Unable to create log file {}", log_path.display()))?,
        ));
    }
    CombinedLogger::init(loggers)?;
    Ok(())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_dir.as_ref())?;

    let paths = DataPaths::new(&cli.data_path);
    info!("Using data directory {}", paths.base().display());

    match cli.command {
        Command::Merge { data_types } => {
            let data_types: Vec<DataType> = if data_types.is_empty() {
                DataType::all_data_types().collect()
            } else {
                data_types
            };
            for data_type in data_types {
                merge_raw_data_files(&paths, data_type)
                    .with_context(|| format!("Failed to merge {} data", data_type))?;
            }
        }
        Command::CleanOntology => {
            clean_ontology_file(&paths).context("Failed to clean ontology")?;
        }
        Command::Eval {
            model_output,
            output,
        } => {
            let report = evaluate_model_output_file(&model_output, output.as_deref())
                .with_context(|| format!("Failed to evaluate {}", model_output.display()))?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report.metrics)
                    .context("Unable to serialize metrics")?
            );
        }
    }
    Ok(())
}
