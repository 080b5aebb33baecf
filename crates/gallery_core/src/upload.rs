use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Effect;

/// Highest estimated progress shown before the media host confirms the upload.
pub const MAX_PROGRESS_BEFORE_CONFIRMATION: u8 = 90;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    Idle,
    Uploading,
    Processing,
    Queued,
    Error,
}

impl UploadState {
    pub fn is_in_flight(self) -> bool {
        matches!(self, UploadState::Uploading | UploadState::Processing)
    }

    pub fn label(self) -> &'static str {
        match self {
            UploadState::Idle => "idle",
            UploadState::Uploading => "uploading",
            UploadState::Processing => "processing",
            UploadState::Queued => "queued",
            UploadState::Error => "error",
        }
    }
}

/// A file the user picked, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
}

impl FileCandidate {
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
    }
}

/// A file that passed type, size and duration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: Option<String>,
    pub duration: Duration,
}

impl SelectedFile {
    pub fn size_mb(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MB as f64
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unsupported file type for {name} (allowed: {allowed})")]
    UnsupportedType { name: String, allowed: String },
    #[error("file is too large ({} MB, max {} MB)", mb(*size_bytes), mb(*max_bytes))]
    TooLarge { size_bytes: u64, max_bytes: u64 },
    #[error("video is too long ({:.1}s, max {}s)", duration.as_secs_f64(), max.as_secs())]
    TooLong { duration: Duration, max: Duration },
    #[error("could not read video duration: {message}")]
    Unreadable { message: String },
}

fn mb(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / BYTES_PER_MB as f64)
}

/// Which files may be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadPolicy {
    pub allowed_extensions: Vec<String>,
    pub allowed_mime_types: Vec<String>,
    pub max_bytes: u64,
    pub max_duration_secs: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: ["mp4", "mov", "avi", "mkv"]
                .into_iter()
                .map(String::from)
                .collect(),
            allowed_mime_types: [
                "video/mp4",
                "video/quicktime",
                "video/x-msvideo",
                "video/x-matroska",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            max_bytes: 100 * BYTES_PER_MB,
            max_duration_secs: 120,
        }
    }
}

impl UploadPolicy {
    pub fn max_duration(&self) -> Duration {
        Duration::from_secs(self.max_duration_secs)
    }

    pub fn check_type(&self, candidate: &FileCandidate) -> Result<(), ValidationError> {
        let extension_ok = candidate.extension().is_some_and(|ext| {
            self.allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
        });
        let mime_ok = candidate.mime_type.as_deref().is_some_and(|mime| {
            let essence = mime.split(';').next().unwrap_or(mime).trim();
            self.allowed_mime_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(essence))
        });
        if extension_ok || mime_ok {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedType {
                name: candidate.name.clone(),
                allowed: self.allowed_extensions.join(", "),
            })
        }
    }

    pub fn check_size(&self, candidate: &FileCandidate) -> Result<(), ValidationError> {
        if candidate.size_bytes > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size_bytes: candidate.size_bytes,
                max_bytes: self.max_bytes,
            });
        }
        Ok(())
    }

    pub fn check_duration(&self, duration: Duration) -> Result<(), ValidationError> {
        let max = self.max_duration();
        if duration > max {
            return Err(ValidationError::TooLong { duration, max });
        }
        Ok(())
    }
}

/// Media host reply for a stored upload. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaAsset {
    pub secure_url: String,
    pub public_id: String,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub bytes: Option<u64>,
    #[serde(default)]
    pub format: Option<String>,
}

/// Processing backend acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobAck {
    pub job_id: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// The single upload job behind the upload surface.
///
/// `submission` increases with every submit and survives resets, so results
/// of an abandoned submission never land on a newer job.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UploadJob {
    pending: Option<FileCandidate>,
    file: Option<SelectedFile>,
    state: UploadState,
    progress: u8,
    submission: u64,
    asset: Option<MediaAsset>,
    job_id: Option<String>,
    error: Option<String>,
    rejection: Option<ValidationError>,
}

impl UploadJob {
    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn pending(&self) -> Option<&FileCandidate> {
        self.pending.as_ref()
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn submission(&self) -> u64 {
        self.submission
    }

    pub fn asset(&self) -> Option<&MediaAsset> {
        self.asset.as_ref()
    }

    pub fn job_id(&self) -> Option<&str> {
        self.job_id.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn rejection(&self) -> Option<&ValidationError> {
        self.rejection.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        self.state == UploadState::Idle && self.file.is_some()
    }

    /// Starts a new job for `candidate`. Type and size are checked here; the
    /// duration probe is only requested once both pass.
    pub(crate) fn pick(&mut self, candidate: FileCandidate, policy: &UploadPolicy) -> Vec<Effect> {
        if self.state.is_in_flight() {
            return Vec::new();
        }
        self.clear();
        let checked = policy
            .check_type(&candidate)
            .and_then(|()| policy.check_size(&candidate));
        if let Err(err) = checked {
            self.rejection = Some(err);
            return Vec::new();
        }
        let path = candidate.path.clone();
        self.pending = Some(candidate);
        vec![Effect::ProbeDuration { path }]
    }

    pub(crate) fn apply_probe(
        &mut self,
        path: &Path,
        result: Result<Duration, String>,
        policy: &UploadPolicy,
    ) {
        if self.pending.as_ref().map(|c| c.path.as_path()) != Some(path) {
            return;
        }
        let Some(candidate) = self.pending.take() else {
            return;
        };
        let duration = match result {
            Ok(duration) => duration,
            Err(message) => {
                self.rejection = Some(ValidationError::Unreadable { message });
                return;
            }
        };
        if let Err(err) = policy.check_duration(duration) {
            self.rejection = Some(err);
            return;
        }
        self.file = Some(SelectedFile {
            path: candidate.path,
            name: candidate.name,
            size_bytes: candidate.size_bytes,
            mime_type: candidate.mime_type,
            duration,
        });
    }

    /// Removing the file is the only way out of `Error`.
    pub(crate) fn remove_file(&mut self) {
        if self.state.is_in_flight() {
            return;
        }
        self.clear();
    }

    /// Closing the upload surface abandons any in-flight submission.
    pub(crate) fn dismiss(&mut self) {
        self.clear();
    }

    pub(crate) fn submit(&mut self) -> Vec<Effect> {
        if !self.can_submit() {
            return Vec::new();
        }
        let Some(file) = self.file.clone() else {
            return Vec::new();
        };
        self.submission += 1;
        self.state = UploadState::Uploading;
        self.progress = 0;
        self.error = None;
        vec![Effect::UploadFile {
            submission: self.submission,
            file,
        }]
    }

    pub(crate) fn apply_progress(&mut self, submission: u64, percent: u8) {
        if !self.is_current(submission, UploadState::Uploading) {
            return;
        }
        let estimate = percent.min(MAX_PROGRESS_BEFORE_CONFIRMATION);
        self.progress = self.progress.max(estimate);
    }

    pub(crate) fn apply_upload_result(
        &mut self,
        submission: u64,
        result: Result<MediaAsset, String>,
    ) -> Vec<Effect> {
        if !self.is_current(submission, UploadState::Uploading) {
            return Vec::new();
        }
        match result {
            Ok(asset) => {
                self.state = UploadState::Processing;
                self.progress = 100;
                self.asset = Some(asset.clone());
                vec![Effect::NotifyBackend { submission, asset }]
            }
            Err(message) => {
                self.fail(message);
                Vec::new()
            }
        }
    }

    pub(crate) fn apply_ack(&mut self, submission: u64, result: Result<JobAck, String>) {
        if !self.is_current(submission, UploadState::Processing) {
            return;
        }
        match result {
            Ok(ack) => {
                self.state = UploadState::Queued;
                self.job_id = Some(ack.job_id);
            }
            Err(message) => self.fail(message),
        }
    }

    fn is_current(&self, submission: u64, expected: UploadState) -> bool {
        self.submission == submission && self.state == expected
    }

    fn fail(&mut self, message: String) {
        self.state = UploadState::Error;
        self.error = Some(message);
    }

    fn clear(&mut self) {
        *self = Self {
            submission: self.submission,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, mime: Option<&str>, size_bytes: u64) -> FileCandidate {
        FileCandidate {
            path: PathBuf::from(format!("/tmp/{name}")),
            name: name.to_string(),
            size_bytes,
            mime_type: mime.map(String::from),
        }
    }

    #[test]
    fn type_check_accepts_extension_or_mime() {
        let policy = UploadPolicy::default();
        assert!(policy.check_type(&candidate("clip.MP4", None, 1)).is_ok());
        assert!(policy
            .check_type(&candidate("clip", Some("video/quicktime"), 1))
            .is_ok());
        assert!(policy
            .check_type(&candidate("song.mp3", Some("audio/mpeg"), 1))
            .is_err());
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let policy = UploadPolicy::default();
        assert!(policy
            .check_size(&candidate("a.mp4", None, policy.max_bytes))
            .is_ok());
        assert_eq!(
            policy.check_size(&candidate("a.mp4", None, policy.max_bytes + 1)),
            Err(ValidationError::TooLarge {
                size_bytes: policy.max_bytes + 1,
                max_bytes: policy.max_bytes,
            })
        );
    }

    #[test]
    fn stale_probe_result_is_ignored() {
        let policy = UploadPolicy::default();
        let mut job = UploadJob::default();
        job.pick(candidate("a.mp4", None, 10), &policy);
        job.pick(candidate("b.mp4", None, 10), &policy);
        job.apply_probe(Path::new("/tmp/a.mp4"), Ok(Duration::from_secs(5)), &policy);
        assert!(job.file().is_none());
        assert_eq!(job.pending().map(|c| c.name.as_str()), Some("b.mp4"));
    }

    #[test]
    fn validation_messages_are_distinct() {
        let long = ValidationError::TooLong {
            duration: Duration::from_millis(130_500),
            max: Duration::from_secs(120),
        };
        assert_eq!(long.to_string(), "video is too long (130.5s, max 120s)");
        let large = ValidationError::TooLarge {
            size_bytes: 150 * BYTES_PER_MB,
            max_bytes: 100 * BYTES_PER_MB,
        };
        assert_eq!(large.to_string(), "file is too large (150.0 MB, max 100.0 MB)");
    }
}
