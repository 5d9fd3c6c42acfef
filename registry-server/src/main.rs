use clap::Parser;
use registry_core::RegistryConfig;
use registry_http::{build_router, AppState};
use registry_observability::Counters;
use registry_store::{JsonlFileSink, MutationSink, NullSink, Registry};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "registry-server", about = "Fleet registry: identity and cross-link service")]
struct Cli {
    /// Path to a YAML configuration file. Defaults apply for anything
    /// the file doesn't set, and `REGISTRY_`-prefixed environment
    /// variables take precedence over both.
    #[arg(long)]
    config: Option<String>,

    #[arg(long, default_value = "info")]
    log_level: String,
}

static SHUTDOWN: AtomicBool = AtomicBool::new(false);

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN.store(true, Ordering::SeqCst);
}

fn setup_signal_handler() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = RegistryConfig::load(cli.config.as_deref())?;
    tracing::info!(hostname = %config.hostname, machine_guid = %config.machine_guid, "starting registry");

    let sink: Box<dyn MutationSink> = match &config.persistence.path {
        Some(path) => {
            tracing::info!(path = %path.display(), "persisting mutations to jsonl sink");
            Box::new(JsonlFileSink::open(path)?)
        }
        None => Box::new(NullSink),
    };

    let store = Arc::new(Registry::new(sink));
    let counters = Arc::new(Counters::new());

    if let Some(push_url) = config.observability.push_url.clone() {
        counters.clone().start_push_loop(
            store.clone(),
            push_url,
            Duration::from_secs(config.observability.push_interval_secs),
        );
    }

    let addr = config.http.addr.clone();
    let state = Arc::new(AppState {
        store,
        counters,
        config: Arc::new(config),
    });
    let app = build_router(state);

    setup_signal_handler();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            while !SHUTDOWN.load(Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            tracing::info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
