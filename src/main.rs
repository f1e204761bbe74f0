// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use linerunner::app_config::{self, Config};
use linerunner::app_controller::{Controller, RehearsalSummary};
use linerunner::ports::analysis::SYSTEM_PROMPT;
use linerunner::ports::console::{ConsoleRecognizer, ConsoleSynthesizer};

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

/// Output format for the segment command
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Segment a script file into dialogue lines and print them
    Segment {
        /// Script file (.txt, .pdf or .docx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Treat the text as extracted from PDF/DOCX sides
        #[arg(short, long)]
        unstructured: bool,
    },

    /// List the characters of a script with their line counts
    Roles {
        /// Script file (.txt, .pdf or .docx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Treat the text as extracted from PDF/DOCX sides
        #[arg(short, long)]
        unstructured: bool,
    },

    /// Rehearse a script in the terminal, typing your own lines
    Rehearse {
        /// Script file (.txt, .pdf or .docx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Character you play
        #[arg(short, long)]
        role: String,

        /// Treat the text as extracted from PDF/DOCX sides
        #[arg(short, long)]
        unstructured: bool,

        /// Print the other lines without simulated speaking time
        #[arg(short, long)]
        instant: bool,
    },

    /// Print the scene-analysis prompt for a script
    Analyze {
        /// Script file (.txt, .pdf or .docx)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Treat the text as extracted from PDF/DOCX sides
        #[arg(short, long)]
        unstructured: bool,
    },

    /// Generate shell completions for linerunner
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// linerunner - Rehearse your lines with a synthetic scene partner
///
/// Segments a script into character lines, speaks the other characters'
/// lines and checks yours.
#[derive(Parser, Debug)]
#[command(name = "linerunner")]
#[command(version)]
#[command(about = "Script segmentation and line rehearsal tool")]
#[command(long_about = "linerunner turns a script into ordered dialogue lines and runs a turn-taking rehearsal.

EXAMPLES:
    linerunner segment sides.txt                      # Print CHARACTER: text lines
    linerunner segment -u extracted.txt --format json # Segment text extracted from a PDF
    linerunner roles sides.txt                        # List characters and line counts
    linerunner rehearse sides.txt --role TOM          # Rehearse as TOM
    linerunner completions bash > linerunner.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in linerunner.json by default. You can specify a
    different config file with --config-path. If the config file doesn't exist,
    a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "linerunner.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
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

    // @returns: Emoji and ANSI color for a log level
    fn decoration_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "1;31"),
            Level::Warn => ("🚧 ", "1;33"),
            Level::Info => ("", "1;32"),
            Level::Debug => ("🔍 ", "1;36"),
            Level::Trace => ("📋 ", "1;35"),
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
            let (emoji, color) = Self::decoration_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {}{}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "linerunner", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Segment { file, format, unstructured } => {
            let script = controller.load_script(&file, unstructured).await?;
            match format {
                OutputFormat::Text => println!("{}", script.to_formatted()),
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&script).context("Failed to serialize script")?;
                    println!("{}", json);
                }
            }
        }
        Commands::Roles { file, unstructured } => {
            let script = controller.load_script(&file, unstructured).await?;
            for entry in controller.role_catalog(&script).entries() {
                println!("{:<24} {:>4} lines", entry.role, entry.line_count);
            }
        }
        Commands::Rehearse { file, role, unstructured, instant } => {
            let script = controller.load_script(&file, unstructured).await?;
            let synthesizer = if instant {
                ConsoleSynthesizer::instant()
            } else {
                ConsoleSynthesizer::default()
            };

            info!("Rehearsing {:?} as {}. Type your lines; an empty line stops.", file, role);
            let summary = controller
                .rehearse(script, &role, Arc::new(synthesizer), Arc::new(ConsoleRecognizer::new()))
                .await?;
            print_summary(&summary);
        }
        Commands::Analyze { file, unstructured } => {
            let script = controller.load_script(&file, unstructured).await?;
            println!("{}\n\n{}", SYSTEM_PROMPT, controller.analysis_prompt(&script)?);
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load or create the config and apply the CLI log level over it
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());
    Ok(config)
}

fn print_summary(summary: &RehearsalSummary) {
    println!();
    if summary.completed {
        println!("🎬 Scene complete!");
    } else {
        println!("⏹  Stopped at line {}/{}", summary.lines_reached + 1, summary.total_lines);
    }
    println!("   Lines delivered: {} ({} attempts)", summary.delivered(), summary.attempts);
    if let Some(mean) = summary.mean_score() {
        println!("   Average match:   {:.0}%", mean * 100.0);
    }
}
