//! Gallery engine: record sources, media probing and the upload pipeline.
mod airtable;
mod backend;
mod config;
mod demo;
mod engine;
mod media_host;
mod pipeline;
mod probe;
mod progress;
mod remote;
mod signing;
mod source;
mod types;

pub use airtable::AirtableClient;
pub use backend::{ProcessingBackend, ProcessingRequest};
pub use config::{
    EngineConfig, MediaHostSettings, ProgressSettings, SourceKind, SourceSettings, UploadSettings,
};
pub use demo::demo_records;
pub use engine::{EngineCommand, EngineHandle};
pub use media_host::{
    media_host_from_settings, MediaHost, SignedUploader, SigningProxyUploader, UploadBody,
};
pub use pipeline::UploadPipeline;
pub use probe::{inspect_file, DurationProbe, FfprobeProbe, MediaProbe, Mp4Probe, ProbeError};
pub use progress::{with_simulated_progress, ChannelProgressSink, ProgressSink};
pub use remote::RemoteError;
pub use signing::{sign_params, SignatureAlgorithm, UploadSignature};
pub use source::{source_from_settings, AirtableSource, FallbackSource, ProxiedSource, RecordSource};
pub use types::{BackendError, EngineEvent, UploadError};
