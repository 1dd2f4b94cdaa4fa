use clap::Parser;

use std::convert::TryFrom;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use tokio::runtime;
use tokio::sync::mpsc;

use tracing::error;
use tracing::info;

use tracing_subscriber::filter::EnvFilter;

use track_relay::acquisition::Acquisition;
use track_relay::configuration::Configuration;
use track_relay::ingest;
use track_relay::live_view;
use track_relay::live_view::ViewerSlot;
use track_relay::nmea::DeviceBuilder;

/// Relays position fixes from a serial receiver to a live viewer and
/// a remote time-series channel.
#[derive(Parser)]
struct Args {
    /// configuration file
    config: String,
}

fn main() {
    let runtime = runtime::Builder::new_multi_thread()
        .thread_name_fn(|| {
            static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
            let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
            format!("track_relay-{}", id)
        })
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(run());
}

async fn run() {
    let args = Args::parse();

    let config = match Configuration::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("failed to load configuration file: {}", e);
            std::process::exit(1);
        }
    };

    start_tracing(&config);

    let viewers = ViewerSlot::new();

    match &config.live_view {
        Some(live_view_config) => {
            let server = live_view::Server::new(live_view_config, viewers.clone());

            tokio::spawn(async move {
                if let Err(e) = server.run().await {
                    error!("live view server failed: {}", e);
                }
            });
        }
        None => info!("live view not configured, fixes go only to ingestion"),
    }

    let (ingest_tx, ingest_rx) = mpsc::channel(8);

    ingest::Client::new(&config.ingest).relay(ingest_rx);

    let source = match DeviceBuilder::new(&config.device) {
        Ok(b) => b.build(),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    info!(
        "acquiring from {} every {:?}",
        config.device.path,
        config.acquisition.period()
    );

    Acquisition::new(
        source,
        viewers,
        ingest_tx,
        config.acquisition.period(),
        config.acquisition.read_timeout(),
    )
    .run()
    .await;
}

fn start_tracing(config: &Configuration) {
    let filter = match EnvFilter::try_from(config.clone()) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    tracing::subscriber::set_global_default(subscriber).expect("no global subscriber has been set");
}
