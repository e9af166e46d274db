/// Version injected at compile time via FUNCTION_XBUCKETS_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("FUNCTION_XBUCKETS_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use function_xbuckets::config::{Config, Format};
use function_xbuckets::{transport, Function};
use std::io;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Composition function deriving S3 buckets from XBuckets composites
#[derive(Parser, Debug)]
#[command(name = "function-xbuckets", version, about, long_about = None)]
struct Args {
    /// Log level
    #[arg(long, value_enum, default_value = "info", global = true)]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the function once on a request document
    Run {
        /// Request file (stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Request and response format
        #[arg(short, long, value_enum)]
        format: Option<Format>,
    },
    /// Serve newline-delimited JSON requests over TCP
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        address: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&PathBuf>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let (non_blocking, guard) = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {:?}", parent))?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {:?}", path))?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(io::stderr()),
    };

    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing_level.to_string().to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("function-xbuckets {} started with log level: {:?}", VERSION, level);

    Ok(Some(guard))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_ref())?;

    let config = Config::load();
    let function = Function::new(tracing::info_span!("function", name = "function-xbuckets"));

    match args.command {
        Command::Run { input, format } => {
            let format = config.effective_format(format);
            let stdout = io::stdout();
            match input {
                Some(path) => {
                    let file = std::fs::File::open(&path)
                        .with_context(|| format!("Failed to open request file {:?}", path))?;
                    transport::run_once(io::BufReader::new(file), stdout.lock(), format, &function)
                }
                None => transport::run_once(io::stdin().lock(), stdout.lock(), format, &function),
            }
        }
        Command::Serve { address } => {
            let address = config.effective_address(address.as_deref());
            let listener = TcpListener::bind(&address)
                .await
                .with_context(|| format!("Failed to bind {}", address))?;

            tokio::select! {
                result = transport::serve(listener, function) => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutting down");
                    Ok(())
                }
            }
        }
    }
}
