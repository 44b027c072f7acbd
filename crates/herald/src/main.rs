mod cli; // Declare the cli module

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand}; // Use clap for argument parsing
use herald_core::event::{DEFAULT_PRIORITY, EventManager, EventNames, EventResult, Listener};
use herald_core::kernel::{Application, ApplicationBuilder};
use herald_core::KernelError;
use log::info;
use serde_json::Value;

use cli::{DispatchLogListener, EchoService, LoggerService};

/// Herald: in-process event dispatch
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    /// Log at debug level, including dispatch diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Dispatch one event through the static and dynamic listeners
    Dispatch {
        /// The name of the event
        event: String,
        /// Payload; parsed as JSON, otherwise passed as a string
        #[arg(long)]
        data: Option<String>,
        /// Application directory (defaults to the current directory)
        #[arg(long)]
        app_dir: Option<PathBuf>,
        /// Events configuration file (JSON, YAML or TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// List events that have dynamic listener definitions
    List {
        /// Application directory (defaults to the current directory)
        #[arg(long)]
        app_dir: Option<PathBuf>,
        /// Events configuration file (JSON, YAML or TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_level);
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        // Already installed; the existing logger keeps receiving records
        log::debug!("Logger already initialized: {}", e);
    }
}

fn builder(app_dir: Option<PathBuf>, config: Option<PathBuf>) -> ApplicationBuilder {
    let mut builder = Application::builder()
        .service("echo", Arc::new(EchoService))
        .service("logger", Arc::new(LoggerService));
    if let Some(dir) = app_dir {
        builder = builder.app_dir(dir);
    }
    if let Some(path) = config {
        builder = builder.config_file(path);
    }
    builder
}

fn parse_payload(data: Option<String>) -> Value {
    match data {
        Some(raw) => serde_json::from_str(&raw).unwrap_or(Value::String(raw)),
        None => Value::Null,
    }
}

async fn dispatch(event: String, data: Option<String>, app_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<(), KernelError> {
    let mut app = builder(app_dir, config).build()?;
    app.start().await?;

    let manager = app.event_manager();
    manager
        .register_listener(EventNames::from(&event), Listener::handler(DispatchLogListener), DEFAULT_PRIORITY)
        .await;

    let payload = parse_payload(data);
    let outcome = manager.dispatch(&event, Some(&payload)).await?;
    info!("Dispatched events so far: {:?}", manager.dispatched_events().await);

    println!("Dispatched {}: {}", event, match outcome {
        EventResult::Continue => "continue",
        EventResult::Stop => "stopped",
    });

    app.shutdown().await
}

fn list(app_dir: Option<PathBuf>, config: Option<PathBuf>) -> Result<(), KernelError> {
    let app = builder(app_dir, config).build()?;
    let manager = app.event_manager();
    match manager.dynamic_loader() {
        Some(loader) => {
            for event in loader.events()? {
                println!("{}", event);
            }
        }
        None => println!("Dynamic listeners are disabled."),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let args = CliArgs::parse();
    init_logging(args.verbose);

    // Handle simple ping command
    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS; // Exit after pong
    }

    let result = match args.command {
        Some(Commands::Dispatch { event, data, app_dir, config }) => dispatch(event, data, app_dir, config).await,
        Some(Commands::List { app_dir, config }) => list(app_dir, config),
        None => {
            println!("No command given. Run with --help for usage.");
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
