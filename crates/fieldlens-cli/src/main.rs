//! FieldLens CLI - analyze metric tensors with a remote analysis service.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

use fieldlens_analyzer::{AnalysisTask, ChannelObserver, TaskEvent};
use fieldlens_client::{HttpEndpoint, RetryingTransport};
use fieldlens_core::{AnalysisMode, RequestDescriptor, ResultsReport, TaskStatus};

mod error;
mod input;
mod logging;
mod settings;

use settings::{Settings, DEFAULT_SETTINGS_PATH};

/// FieldLens - metric tensor analysis tool
#[derive(Parser)]
#[command(name = "fieldlens")]
#[command(about = "Analyze metric tensors with a remote analysis service", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_PATH)]
    config: PathBuf,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a metric to the analysis service
    Analyze {
        /// Metric JSON file
        #[arg(short, long)]
        metric: PathBuf,

        /// Analysis mode (validate, interpret, suggest)
        #[arg(long)]
        mode: Option<String>,

        /// Service base URL
        #[arg(long)]
        url: Option<String>,

        /// Per-call timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum attempts per request
        #[arg(long)]
        max_retries: Option<u32>,

        /// API key (defaults to $FIELDLENS_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Print the local signature/symmetry/singularity report
    Report {
        /// Metric JSON file
        #[arg(short, long)]
        metric: PathBuf,
    },

    /// Show the effective endpoint configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;
    let subscriber = logging::build_subscriber(&settings, cli.debug)?;
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Analyze {
            metric,
            mode,
            url,
            timeout,
            max_retries,
            api_key,
        } => {
            let mut endpoint = settings.endpoint_config();
            if let Some(url) = url {
                endpoint.base_url = url;
            }
            if let Some(secs) = timeout {
                endpoint = endpoint.with_timeout(Duration::from_secs(secs));
            }
            if let Some(max_retries) = max_retries {
                endpoint = endpoint.with_max_retries(max_retries);
            }
            if api_key.is_some() {
                endpoint = endpoint.with_api_key(api_key);
            }

            let payload = input::load_metric(&metric)?;
            let mode = AnalysisMode::from(mode.unwrap_or_else(|| settings.default_mode.clone()));
            if let AnalysisMode::Other(name) = &mode {
                warn!(mode = %name, "Unknown analysis mode, sending base prompt only");
            }

            analyze(RequestDescriptor::new(payload, mode, endpoint)).await?;
        }
        Commands::Report { metric } => {
            let payload = input::load_metric(&metric)?;
            println!("{}", ResultsReport::new().full_report(&payload));
        }
        Commands::Config => {
            let endpoint = settings.endpoint_config();
            println!("{}", serde_json::to_string_pretty(&endpoint.summary())?);
        }
    }

    Ok(())
}

async fn analyze(descriptor: RequestDescriptor) -> Result<(), Box<dyn Error>> {
    let transport = RetryingTransport::new(Arc::new(HttpEndpoint::new()));
    let (observer, mut events) = ChannelObserver::new();
    let task = AnalysisTask::new(descriptor, transport)
        .with_observer(Arc::new(observer));
    let task = Arc::new(task);

    task.start()?;
    info!(task_id = %task.id(), "Analysis started, press Ctrl-C to cancel");

    let event = tokio::select! {
        event = events.recv() => event,
        _ = tokio::signal::ctrl_c() => {
            task.stop();
            eprintln!("Cancelling analysis...");
            let waiting = Arc::clone(&task);
            let status = tokio::task::spawn_blocking(move || waiting.join()).await?;
            delivered_before_stop(status, events.try_recv().ok())
        }
    };

    match event {
        Some(TaskEvent::Success(text)) => println!("{}", text),
        Some(TaskEvent::Error(message)) => {
            eprintln!("{}", message);
            std::process::exit(1);
        }
        None => println!("Analysis cancelled"),
    }
    Ok(())
}

/// Event the worker delivered before a Ctrl-C took effect, if any.
fn delivered_before_stop(status: TaskStatus, pending: Option<TaskEvent>) -> Option<TaskEvent> {
    match (status, pending) {
        (TaskStatus::Completed, Some(event @ TaskEvent::Success(_))) => Some(event),
        (TaskStatus::Failed, Some(event @ TaskEvent::Error(_))) => Some(event),
        (status, _) => {
            debug!(status = %status, "Nothing delivered before cancellation");
            None
        }
    }
}
