//! stepwise CLI - apply a scalar map step to a stream of NDJSON traversers
//!
//! Reads one JSON value per line from a file or stdin and writes one result
//! per line to stdout.

use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process;

use stepwise::{run_stream, ErrorPolicy, RunSummary, StepConfig, StepDef, SubstringStep};

#[derive(Parser)]
#[command(name = "stepwise")]
#[command(version, about = "Apply traversal steps to NDJSON item streams", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Command-line spelling of `ErrorPolicy`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OnError {
    /// Stop at the first failing item
    Abort,
    /// Log failing items, skip them, and keep going
    Report,
}

impl From<OnError> for ErrorPolicy {
    fn from(value: OnError) -> Self {
        match value {
            OnError::Abort => ErrorPolicy::Abort,
            OnError::Report => ErrorPolicy::Report,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Take the substring of every string item
    Substring {
        /// Start index (inclusive); negative counts from the end
        #[arg(short, long, allow_negative_numbers = true)]
        start: i64,

        /// End index (exclusive); negative counts from the end
        #[arg(short, long, allow_negative_numbers = true)]
        end: Option<i64>,

        /// NDJSON input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// What to do with non-string items
        #[arg(long, value_enum, default_value_t = OnError::Abort)]
        on_error: OnError,
    },

    /// Apply the step described by a YAML step file
    Run {
        /// Path to step file
        #[arg(short, long, default_value = "step.yaml")]
        config: PathBuf,

        /// NDJSON input file (defaults to stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Override the step file's error policy
        #[arg(long, value_enum)]
        on_error: Option<OnError>,
    },

    /// Validate a YAML step file without reading any input
    Validate {
        /// Path to step file
        #[arg(short, long, default_value = "step.yaml")]
        config: PathBuf,
    },
}

fn main() {
    dotenv::dotenv().ok();
    stepwise::logging::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Substring { start, end, input, on_error } => {
            let config = StepConfig {
                step: StepDef::Substring(SubstringStep::new_range(start, end)),
                on_error: on_error.into(),
            };
            run_config(config, input)
        }
        Commands::Run { config, input, on_error } => load_config(&config).and_then(|config| {
            run_config(config.with_policy_override(on_error.map(ErrorPolicy::from)), input)
        }),
        Commands::Validate { config } => validate_config(&config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn load_config(path: &Path) -> Result<StepConfig, String> {
    StepConfig::load_from_file(path).map_err(|e| e.to_string())
}

fn open_input(input: Option<PathBuf>) -> Result<Box<dyn BufRead>, String> {
    match input {
        Some(path) => {
            let file = File::open(&path)
                .map_err(|e| format!("Failed to open input {}: {}", path.display(), e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

fn run_config(config: StepConfig, input: Option<PathBuf>) -> Result<(), String> {
    let policy = config.on_error;
    let step = config.step.into_step();
    let reader = open_input(input)?;
    let stdout = io::stdout().lock();

    let RunSummary { processed, failed } =
        run_stream(step.as_ref(), reader, stdout, policy).map_err(|e| e.to_string())?;

    if failed > 0 {
        return Err(format!("{} of {} items failed", failed, processed));
    }
    Ok(())
}

fn validate_config(path: &Path) -> Result<(), String> {
    let config = load_config(path)?;
    let step = config.step.into_step();
    println!("✓ {} is valid: {:?} (on_error: {:?})", path.display(), step, config.on_error);
    Ok(())
}
