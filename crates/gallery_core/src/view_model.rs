use crate::presenter::{CardModel, DetailModel};
use crate::upload::{UploadJob, UploadState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub loading: bool,
    pub error: Option<String>,
    pub cards: Vec<CardModel>,
    pub detail: DetailView,
    pub upload: UploadView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    Empty,
    Loading,
    NotFound,
    Error(String),
    Ready(Box<DetailModel>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadView {
    pub state: UploadState,
    pub file_name: Option<String>,
    pub file_size_mb: Option<String>,
    pub duration_secs: Option<String>,
    pub probing: bool,
    /// Estimate, not a measured byte count.
    pub progress: u8,
    pub job_id: Option<String>,
    pub message: Option<String>,
    pub can_submit: bool,
    pub can_remove: bool,
}

impl UploadView {
    pub(crate) fn from_job(job: &UploadJob) -> Self {
        let file = job.file();
        let message = job
            .rejection()
            .map(ToString::to_string)
            .or_else(|| job.error().map(ToOwned::to_owned));
        Self {
            state: job.state(),
            file_name: file
                .map(|f| f.name.clone())
                .or_else(|| job.pending().map(|c| c.name.clone())),
            file_size_mb: file.map(|f| format!("{:.2}", f.size_mb())),
            duration_secs: file.map(|f| format!("{:.1}", f.duration.as_secs_f64())),
            probing: job.pending().is_some(),
            progress: job.progress(),
            job_id: job.job_id().map(ToOwned::to_owned),
            message,
            can_submit: job.can_submit(),
            can_remove: file.is_some() && !job.state().is_in_flight(),
        }
    }
}
