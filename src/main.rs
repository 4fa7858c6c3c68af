// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use mtroute::app_config::{Config, LogLevel};
use mtroute::providers::mock::MockInferenceBackend;
use mtroute::{Controller, LanguagePair};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a text with one or more engines
    Translate(TranslateArgs),

    /// List engines and whether they can serve a pair
    Engines {
        /// Source language code
        #[arg(short, long, default_value = "en")]
        source_language: String,

        /// Target language code
        #[arg(short, long, default_value = "fr")]
        target_language: String,
    },

    /// List registered models and whether their files exist
    Models,

    /// Show backend, model and engine status
    Status,

    /// Generate shell completions for mtroute
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Text to translate
    #[arg(value_name = "TEXT")]
    text: String,

    /// Source language code (e.g., 'en', 'jp', 'fr')
    #[arg(short, long)]
    source_language: String,

    /// Target language code (e.g., 'en', 'jp', 'fr')
    #[arg(short, long)]
    target_language: String,

    /// Engine to use; repeat for several, omit for every available engine
    #[arg(short, long = "engine")]
    engines: Vec<String>,

    /// Use the three preferred engines for the pair
    #[arg(long, conflicts_with = "engines")]
    triple: bool,

    /// Translate along the pair's default route only
    #[arg(long, conflicts_with_all = ["engines", "triple"])]
    default_route: bool,
}

/// mtroute - multi-engine machine translation routing
///
/// Routes a text across local translation models and returns one result per engine.
#[derive(Parser, Debug)]
#[command(name = "mtroute")]
#[command(version)]
#[command(about = "Multi-engine machine translation router")]
#[command(long_about = "mtroute routes translation requests across a catalog of local translation models.

EXAMPLES:
    mtroute translate -s en -t fr \"Hello\"              # Every available engine
    mtroute translate -s jp -t fr -e elan_quality \"...\" # Pivot through English
    mtroute translate -s en -t fr --triple \"Hello\"     # Three preferred engines
    mtroute engines -s en -t jp                        # Engine availability
    mtroute completions bash > mtroute.bash            # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. MODEL_CACHE_DIR overrides model_cache_dir.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Use the in-process mock backend instead of the inference server
    #[arg(long, global = true)]
    mock: bool,
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
            let _ = writeln!(
                std::io::stderr(),
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

#[tokio::main]
async fn main() -> Result<()> {
    // Start permissive; the effective level is applied once the config is loaded
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "mtroute", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = cli.log_level {
        log::set_max_level(LogLevel::from(level).to_level_filter());
    }

    let config = load_or_create_config(&cli.config, cli.log_level)?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = if cli.mock {
        info!("Using the mock inference backend");
        Controller::with_backend(config, Arc::new(MockInferenceBackend::working()))?
    } else {
        Controller::with_config(config)?
    };

    match cli.command {
        Commands::Translate(args) => run_translate(&controller, args).await,
        Commands::Engines {
            source_language,
            target_language,
        } => {
            let pair = LanguagePair::new(&source_language, &target_language);
            let available = controller.available_engines(&source_language, &target_language);
            for engine in controller.catalog().engines().engines() {
                let label = engine.model_label(&pair).unwrap_or_else(|| "-".to_string());
                let state = if available.contains(&engine.id) {
                    "available"
                } else if engine.supports(&pair) {
                    "missing models"
                } else {
                    "unsupported"
                };
                println!(
                    "{:<20} {:<5.2} {:<16} {}",
                    engine.id, engine.confidence, state, label
                );
            }
            Ok(())
        }
        Commands::Models => {
            let status = controller.status().await;
            for model in status.models {
                let state = if model.available { "ok" } else { "missing" };
                println!("{:<28} {:<16} {:<8} {}", model.key, model.family, state, model.path);
            }
            Ok(())
        }
        Commands::Status => {
            let status = controller.status().await;
            print_json(&status)
        }
        Commands::Completions { .. } => Ok(()),
    }
}

fn load_or_create_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config
            .save_to_file(config_path)
            .with_context(|| format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    config.apply_env_overrides();
    if let Some(level) = log_level {
        config.log_level = level.into();
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

async fn run_translate(controller: &Controller, args: TranslateArgs) -> Result<()> {
    if args.text.trim().is_empty() {
        return Err(anyhow!("Nothing to translate"));
    }

    if args.default_route {
        let route = controller
            .orchestrator()
            .translate_default(&args.text, &args.source_language, &args.target_language)
            .await?;
        return print_json(&serde_json::json!({
            "text": route.text,
            "model": route.model,
            "latency_ms": route.latency_ms,
        }));
    }

    let outcomes = if args.triple {
        controller
            .translate_triple(&args.text, &args.source_language, &args.target_language)
            .await
    } else {
        controller
            .translate_multi_engine(&args.text, &args.source_language, &args.target_language, &args.engines)
            .await
    };
    print_json(&outcomes)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
