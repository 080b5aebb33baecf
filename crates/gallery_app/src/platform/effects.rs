use std::time::Duration;

use engine_logging::{engine_info, engine_warn};
use gallery_core::{Effect, Msg};
use gallery_engine::{EngineCommand, EngineEvent, EngineHandle};

/// Hands effects to the engine and turns its events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            self.engine.send(command_for(effect));
        }
    }

    /// Next engine answer as a message, waiting at most `timeout`.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(msg_for)
    }
}

pub(crate) fn command_for(effect: Effect) -> EngineCommand {
    match effect {
        Effect::FetchAllRecords => EngineCommand::FetchAll,
        Effect::FetchRecord { id } => EngineCommand::FetchOne { id },
        Effect::ProbeDuration { path } => EngineCommand::Probe { path },
        Effect::UploadFile { submission, file } => {
            engine_info!(
                "Upload submission={} file={} size={}",
                submission,
                file.name,
                file.size_bytes
            );
            EngineCommand::Upload { submission, file }
        }
        Effect::NotifyBackend { submission, asset } => {
            EngineCommand::Notify { submission, asset }
        }
    }
}

pub(crate) fn msg_for(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RecordsFetched(result) => Msg::RecordsLoaded(result),
        EngineEvent::RecordFetched(result) => Msg::RecordLoaded(result),
        EngineEvent::DurationProbed { path, result } => Msg::DurationProbed { path, result },
        EngineEvent::UploadProgress {
            submission,
            percent,
        } => Msg::UploadProgress {
            submission,
            percent,
        },
        EngineEvent::Uploaded { submission, result } => Msg::UploadFinished {
            submission,
            result: result.map_err(|err| {
                engine_warn!("Upload {} failed: {}", submission, err);
                err.to_string()
            }),
        },
        EngineEvent::Acknowledged { submission, result } => Msg::BackendAcknowledged {
            submission,
            result: result.map_err(|err| {
                engine_warn!("Backend notification {} failed: {}", submission, err);
                err.to_string()
            }),
        },
    }
}
