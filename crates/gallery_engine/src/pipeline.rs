use engine_logging::{engine_info, engine_warn};
use gallery_core::{JobAck, MediaAsset, SelectedFile};

use crate::backend::ProcessingBackend;
use crate::media_host::{media_host_from_settings, MediaHost, UploadBody};
use crate::progress::{with_simulated_progress, ProgressSink};
use crate::{BackendError, EngineEvent, ProgressSettings, UploadError, UploadSettings};

/// Upload to the media host, then announce the stored asset to the backend.
///
/// Either side may be missing from the configuration; the matching step then
/// fails with a `NotConfigured` error instead of the pipeline refusing to start.
pub struct UploadPipeline {
    host: Option<Box<dyn MediaHost>>,
    backend: Option<ProcessingBackend>,
    progress: ProgressSettings,
}

impl UploadPipeline {
    pub fn new(
        host: Option<Box<dyn MediaHost>>,
        backend: Option<ProcessingBackend>,
        progress: ProgressSettings,
    ) -> Self {
        Self {
            host,
            backend,
            progress,
        }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        let host = media_host_from_settings(&settings.media_host)
            .map_err(|err| engine_warn!("Uploads disabled: {}", err))
            .ok();
        let backend = settings.backend_url.as_deref().and_then(|url| {
            ProcessingBackend::new(url, settings.backend_timeout)
                .map_err(|err| engine_warn!("Processing backend unusable: {}", err))
                .ok()
        });
        if backend.is_none() {
            engine_warn!("PROCESSING_BACKEND_URL not set; uploads cannot be queued");
        }
        Self::new(host, backend, settings.progress)
    }

    pub async fn upload(
        &self,
        submission: u64,
        file: &SelectedFile,
        sink: &dyn ProgressSink,
    ) -> Result<MediaAsset, UploadError> {
        let host = self
            .host
            .as_ref()
            .ok_or_else(|| UploadError::NotConfigured("media host credentials".into()))?;
        let body = UploadBody::File {
            path: file.path.clone(),
            file_name: file.name.clone(),
            mime_type: file.mime_type.clone(),
        };
        engine_info!(
            "Submission {}: uploading {} ({:.2} MB)",
            submission,
            file.name,
            file.size_mb()
        );
        let reply = with_simulated_progress(host.upload(body), self.progress, |percent| {
            sink.emit(EngineEvent::UploadProgress {
                submission,
                percent,
            })
        })
        .await?;
        serde_json::from_value::<MediaAsset>(reply)
            .map_err(|err| UploadError::InvalidResponse(err.to_string()))
    }

    pub async fn notify(&self, asset: &MediaAsset) -> Result<JobAck, BackendError> {
        let backend = self.backend.as_ref().ok_or(BackendError::NotConfigured)?;
        backend.notify(asset).await
    }
}
