use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use logman::{
    actors::{coordinator::CoordinatorHandle, listener},
    alerts::AlertMatcher,
    config::read_config_file,
    mailer::{Mailer, SmtpMailer},
    rotation::RotationPolicy,
    store::{ObjectStore, s3::S3Store},
    uploader::UploadDispatcher,
};
use tracing::{debug, info, trace};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Parser)]
struct Args {
    /// Config file
    #[arg(short)]
    file: String,
}

fn init() {
    // RUST_LOG overrides the default verbosity, e.g. RUST_LOG=logman=error
    // for a quiet production daemon
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("logman=debug,logsyncd=debug"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_ansi(false),
        )
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();
    let args = Args::parse();
    trace!("started with args: {args:?}");

    let config = read_config_file(&args.file)?;

    // alert path: invalid SMTP settings or rule expressions are startup-fatal
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(&config.smtp)?);
    let matcher = Arc::new(AlertMatcher::new(&config.actions, mailer)?);
    debug!("compiled {} alert rule(s)", matcher.rule_count());

    // upload path
    let store: Arc<dyn ObjectStore> = match &config.store.endpoint {
        Some(endpoint) => {
            Arc::new(S3Store::with_endpoint(endpoint, config.store.region.as_deref()).await)
        }
        None => Arc::new(S3Store::new(config.store.region.as_deref()).await),
    };
    let uploader = UploadDispatcher::new(
        store,
        config.store.bucket.clone(),
        config.store.folder.clone(),
    );

    // the active file and the upload queue share one directory
    if let Some(dir) = config.log_file_path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let coordinator = CoordinatorHandle::spawn(
        config.log_file_path.clone(),
        RotationPolicy::new(
            config.max_file_size_bytes,
            Duration::from_millis(config.max_file_age_ms),
        ),
        Duration::from_millis(config.flush_interval_ms),
        config.forward_queue_size,
        uploader,
    );

    let socket = Arc::new(listener::bind_socket(config.listen_address, config.udp_port).await?);
    let listeners = listener::spawn_listeners(
        socket,
        config.listeners,
        coordinator.clone(),
        Arc::clone(&matcher),
    );
    info!(
        "{} listener(s) accepting log datagrams on {}:{}",
        listeners.len(),
        config.listen_address,
        config.udp_port
    );
    listener::watch(listeners);

    tokio::signal::ctrl_c().await?;

    // no shutdown drain: buffered lines and in-flight uploads are not awaited
    info!("shutting down");
    coordinator.shutdown().await;

    Ok(())
}
