use anyhow::{anyhow, Result};
use clap::{Parser, ValueEnum};
use sgsclient::config::Config;
use sgsclient::shell::{Command, OutputFormat, Shell};
use sgsclient::{Client, ClientConfig};
use std::io;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// Environment filter overriding --log-level, e.g. `SGS_LOG=sgsclient=debug`
const LOG_ENV: &str = "SGS_LOG";

/// Command-line client for the storage-gateway service
#[derive(Parser, Debug)]
#[command(name = "sgs", version, about, long_about = None)]
struct Args {
    /// Service endpoint, e.g. http://controller:8975/v1/<project> [env: SGS_URL]
    #[arg(long, global = true)]
    sgs_url: Option<String>,

    /// Pre-issued auth token [env: SGS_AUTH_TOKEN, OS_AUTH_TOKEN]
    #[arg(long, global = true)]
    auth_token: Option<String>,

    /// Request timeout in seconds [env: SGS_TIMEOUT]
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
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
    fn as_directive(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(level.as_directive()?),
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("WARNING: cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("sgs started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = Config::config_dir() {
        return config_dir.join("sgs.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".sgsclient").join("sgs.log");
    }
    PathBuf::from("sgs.log")
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(args).await {
        tracing::error!("Command failed: {:#}", err);
        eprintln!("ERROR: {}", err);
        if let Some(hint) = err
            .downcast_ref::<sgsclient::Error>()
            .and_then(|e| e.hint())
        {
            eprintln!("{}", hint);
        }
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load();

    let endpoint = config
        .effective_endpoint(args.sgs_url.as_deref())
        .ok_or_else(|| {
            anyhow!("You must provide an endpoint via --sgs-url, SGS_URL or the config file")
        })?;
    let timeout = config.effective_timeout(args.timeout);
    let format = args
        .format
        .or_else(|| config.format.as_deref().and_then(OutputFormat::from_name))
        .unwrap_or_default();

    let mut client_config = ClientConfig::new(endpoint)
        .timeout(timeout)
        .request_id(ClientConfig::generate_request_id());
    if let Some(token) = config.effective_auth_token(args.auth_token.as_deref()) {
        client_config = client_config.auth_token(token);
    }

    tracing::info!(
        "Using endpoint: {}, request id: {:?}",
        client_config.endpoint,
        client_config.request_id
    );

    let client = Client::new(&client_config)?;
    let mut shell = Shell::new(client, format, io::stdout().lock());
    shell.run(args.command).await?;

    Ok(())
}
