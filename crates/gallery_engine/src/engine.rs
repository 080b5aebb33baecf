use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use engine_logging::{engine_debug, engine_error};
use gallery_core::{MediaAsset, RecordId, SelectedFile};
use tokio::sync::mpsc as async_mpsc;

use crate::pipeline::UploadPipeline;
use crate::probe::{DurationProbe, MediaProbe};
use crate::progress::ChannelProgressSink;
use crate::source::{source_from_settings, RecordSource};
use crate::{EngineConfig, EngineEvent};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    FetchAll,
    FetchOne { id: RecordId },
    Probe { path: PathBuf },
    Upload { submission: u64, file: SelectedFile },
    Notify { submission: u64, asset: MediaAsset },
}

#[derive(Clone)]
struct Services {
    source: Arc<dyn RecordSource>,
    probe: Arc<dyn DurationProbe>,
    pipeline: Arc<UploadPipeline>,
}

/// Runs commands on a dedicated thread with a current-thread runtime; every
/// command becomes a task and answers with exactly one terminal event.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_services(
            Arc::from(source_from_settings(&config.source)),
            Arc::new(MediaProbe::default()),
            Arc::new(UploadPipeline::from_settings(&config.upload)),
        )
    }

    pub fn with_services(
        source: Arc<dyn RecordSource>,
        probe: Arc<dyn DurationProbe>,
        pipeline: Arc<UploadPipeline>,
    ) -> Self {
        let (cmd_tx, mut cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();
        let services = Services {
            source,
            probe,
            pipeline,
        };

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Engine runtime failed to start: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                while let Some(command) = cmd_rx.recv().await {
                    let services = services.clone();
                    let event_tx = event_tx.clone();
                    tokio::spawn(async move {
                        handle_command(&services, command, event_tx).await;
                    });
                }
                engine_debug!("Engine command channel closed");
            });
        });

        Self { cmd_tx, event_rx }
    }

    pub fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Waits up to `timeout` for the next event.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(
    services: &Services,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::FetchAll => EngineEvent::RecordsFetched(services.source.fetch_all().await),
        EngineCommand::FetchOne { id } => {
            EngineEvent::RecordFetched(services.source.fetch_one(&id).await)
        }
        EngineCommand::Probe { path } => {
            let result = services
                .probe
                .probe(&path)
                .await
                .map_err(|err| err.to_string());
            EngineEvent::DurationProbed { path, result }
        }
        EngineCommand::Upload { submission, file } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            let result = services.pipeline.upload(submission, &file, &sink).await;
            EngineEvent::Uploaded { submission, result }
        }
        EngineCommand::Notify { submission, asset } => {
            let result = services.pipeline.notify(&asset).await;
            EngineEvent::Acknowledged { submission, result }
        }
    };
    let _ = event_tx.send(event);
}
