// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use doctag::app_config::{self, Config};
use doctag::app_controller::Controller;
use doctag::tagging::TaggingRules;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tag protected terms and translation markers in .docx documents (default command)
    Tag(TagArgs),

    /// Generate shell completions for doctag
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TagArgs {
    /// Input .docx file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output file (single input only; defaults to <stem>_<suffix>.docx next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "doctag.json")]
    config_path: String,

    /// Extra newline-delimited protected terms file
    #[arg(long)]
    terms_file: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// doctag - protected-term tagging for machine translation
///
/// Marks protected terms with [PROT] and paragraphs that need translation with [FR]
/// in Word documents, keeping each run's formatting.
#[derive(Parser, Debug)]
#[command(name = "doctag")]
#[command(version)]
#[command(about = "Protected-term tagging for .docx translation prep")]
#[command(long_about = "doctag marks protected terms and translation targets in .docx documents.

EXAMPLES:
    doctag report.docx                         # Tag using doctag.json
    doctag -f report.docx                      # Overwrite an existing output
    doctag report.docx -o out/report_fr.docx   # Choose the output path
    doctag --terms-file glossary.txt /docs/    # Process a directory with extra terms
    doctag completions bash > doctag.bash      # Generate bash completions

CONFIGURATION:
    Configuration is stored in doctag.json by default. If the config file doesn't
    exist, a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input .docx file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output file (single input only)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "doctag.json")]
    config_path: String,

    /// Extra newline-delimited protected terms file
    #[arg(long)]
    terms_file: Option<PathBuf>,

    /// Number of worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Accept everything here; the effective level is set with set_max_level below
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "doctag", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Tag(args)) => run_tag(args),
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            run_tag(TagArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                config_path: cli.config_path,
                terms_file: cli.terms_file,
                workers: cli.workers,
                log_level: cli.log_level,
            })
        }
    }
}

fn load_config(options: &TagArgs) -> Result<(Config, TaggingRules)> {
    let config_path = Path::new(&options.config_path);

    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", options.config_path);
        let config = Config::default();
        config.save(config_path)?;
        config
    };

    if let Some(terms_file) = &options.terms_file {
        config.terms_file = Some(terms_file.clone());
    }

    if let Some(workers) = options.workers {
        config.workers = Some(workers);
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Relative term files resolve against the config file's directory, CLI ones against the cwd
    let base_dir = if options.terms_file.is_some() {
        Path::new(".")
    } else {
        config_path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
    };
    let added = config.load_terms_file(base_dir)?;
    if added > 0 {
        info!("Loaded {} extra protected terms", added);
    }

    let rules = config.validate().context("Configuration validation failed")?;
    Ok((config, rules))
}

fn run_tag(options: TagArgs) -> Result<()> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (config, rules) = load_config(&options)?;
    log::set_max_level(config.log_level.to_level_filter());

    let controller = Controller::new(config, rules)?;

    if options.input_path.is_file() {
        controller.run(&options.input_path, options.output.clone(), options.force_overwrite)?;
    } else if options.input_path.is_dir() {
        if options.output.is_some() {
            return Err(anyhow!("--output can only be used with a single input file"));
        }
        controller.run_folder(&options.input_path, options.force_overwrite)?;
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
