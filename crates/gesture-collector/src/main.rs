//! Gesture Collector: records labelled wrist-motion sessions and ships them
//! to a companion device.

mod app;
mod app_command;
mod config;
mod console;
mod error;
mod logging;
mod peer_link;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    console::Console,
    error::{AppError, Result as AppResult},
    peer_link::DirectoryPeerLink,
};

use crate::config::Config;

use gesture_collector_core::{
    SessionCatalog, SessionRecorder, Selection, SyntheticMotion, TransferCoordinator,
};

use std::{fs, sync::Arc, time::Duration};

use tokio::sync::{mpsc, watch};
use tracing::{error, info};

/// Application entry point.
fn main() {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            logging::init_fallback_logging();
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    // Held for the process lifetime; dropping it flushes the log file.
    let _log_guard = match logging::init_logging(&config.storage.log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            logging::init_fallback_logging();
            error!("Failed to initialise logging: {:?}", e);
            std::process::exit(1);
        }
    };

    if let Ok(path) = Config::config_path() {
        info!(config = ?path, data_root = ?config.storage.data_root, "Configuration in use");
    }

    if let Err(e) = fs::create_dir_all(&config.transfer.outbox_dir) {
        error!(outbox = ?config.transfer.outbox_dir, error = %e, "Failed to create outbox");
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to create tokio runtime: {:?}", e);
            std::process::exit(1);
        }
    };

    rt.block_on(async {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();

        let link = DirectoryPeerLink::new(&config.transfer.outbox_dir, completion_tx);
        info!(outbox = ?link.outbox(), "Peer link ready");

        let transfer = Arc::new(TransferCoordinator::new(
            Arc::new(link),
            &config.storage.temp_dir,
        ));

        let completions = {
            let transfer = Arc::clone(&transfer);
            tokio::spawn(async move { transfer.run_completions(completion_rx).await })
        };

        let recorder = SessionRecorder::new(&config.storage.data_root, SyntheticMotion::new())
            .with_rate_hz(config.sampling.rate_hz)
            .with_label_style(config.labels.style.into());

        let app = App {
            recorder,
            catalog: SessionCatalog::new(&config.storage.data_root),
            transfer,
            selection: Selection::default(),
            command_rx,
            shutdown_tx,
        };

        let console = Console::new(command_tx);

        tokio::join!(
            async {
                if let Err(e) = console.run(shutdown_rx).await {
                    error!(error = ?e, "Console error");
                }
            },
            async {
                if let Err(e) = app.run().await {
                    error!(error = ?e, "App error");
                }
            }
        );

        // The peer link's sender lives inside the coordinator, so the
        // completion pump never sees its channel close on its own.
        completions.abort();
    });

    // The stdin forwarder may be blocked in read() with nothing to wake it.
    rt.shutdown_timeout(Duration::from_secs(1));
}
