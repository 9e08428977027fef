//! Screencast presenter host.
//!
//! Owns the engine thread and exposes the command/event bridge a UI shell
//! talks to. Transport and capture come from the embedder.

mod commands;
pub mod config;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Context, Result};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use screencast_audio::{ChannelSink, MixedAudioChunk, PlaybackSink};
use screencast_engine::{create_engine, Collaborators, StatsCollector};
use screencast_ipc::{
    command_channel, event_channel, PresenterCommand, PresenterEvent, SessionConfig,
    SessionSnapshot,
};

pub use config::load_config;

/// Default log directives when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "screencast_lib=debug,screencast_engine=debug,screencast_transport=debug,screencast_audio=info,screencast_capture=debug";

/// Handle to a running presenter engine.
pub struct PresenterHandle {
    pub(crate) command_tx: Sender<PresenterCommand>,
    pub(crate) event_rx: Mutex<Receiver<PresenterEvent>>,
    pub(crate) snapshot: Arc<RwLock<SessionSnapshot>>,
    stats: Arc<StatsCollector>,
    engine_thread: Option<JoinHandle<()>>,
}

impl PresenterHandle {
    pub fn stats(&self) -> Arc<StatsCollector> {
        Arc::clone(&self.stats)
    }

    fn join(&mut self) -> Result<()> {
        if let Some(handle) = self.engine_thread.take() {
            handle
                .join()
                .map_err(|_| anyhow!("Engine thread panicked"))?;
        }
        Ok(())
    }
}

impl Drop for PresenterHandle {
    fn drop(&mut self) {
        if self.engine_thread.is_some() {
            let _ = self.command_tx.send(PresenterCommand::Shutdown);
            if let Err(e) = self.join() {
                warn!("{:#}", e);
            }
        }
    }
}

/// Initialize logging.
pub fn init_logging() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .context("Failed to install tracing subscriber")
}

/// Start the threaded playback sink. Mixed chunks arrive on the receiver.
pub fn playback_sink() -> Result<(Box<dyn PlaybackSink>, Receiver<MixedAudioChunk>)> {
    let (sink, chunks) = ChannelSink::start().context("Failed to start playback pump")?;
    Ok((Box::new(sink), chunks))
}

/// Spawn the engine thread for one presenter.
pub fn spawn_presenter(
    config: SessionConfig,
    collaborators: Collaborators,
) -> Result<PresenterHandle> {
    let (command_tx, command_rx) = command_channel();
    let (event_tx, event_rx) = event_channel();

    let mut engine = create_engine(config, collaborators, command_rx, event_tx);
    let snapshot = engine.shared_snapshot();
    let stats = engine.stats();

    let engine_thread = thread::Builder::new()
        .name("screencast-engine".into())
        .spawn(move || {
            info!("Engine thread starting");
            engine.run();
            info!("Engine thread stopped");
        })
        .context("Failed to spawn engine thread")?;

    Ok(PresenterHandle {
        command_tx,
        event_rx: Mutex::new(event_rx),
        snapshot,
        stats,
        engine_thread: Some(engine_thread),
    })
}
