use std::path::PathBuf;
use std::time::Duration;

use crate::{FetchError, FileCandidate, JobAck, MediaAsset, Record, RecordId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// List view opened or retry requested.
    RecordsRequested,
    /// Engine answer for the record list.
    RecordsLoaded(Result<Vec<Record>, FetchError>),
    /// Detail view opened for one record, or retry requested.
    RecordRequested(RecordId),
    /// Engine answer for a single record.
    RecordLoaded(Result<Record, FetchError>),
    /// Detail view closed.
    SelectionCleared,
    /// Drop everything fetched so far.
    StoreReset,
    /// User picked a local file for upload.
    FilePicked(FileCandidate),
    /// Engine answer for the duration probe of a picked file.
    DurationProbed {
        path: PathBuf,
        result: Result<Duration, String>,
    },
    /// User removed the selected file.
    FileRemoved,
    /// User closed the upload surface.
    UploadDismissed,
    /// User clicked Upload.
    SubmitClicked,
    /// Estimated upload progress in percent.
    UploadProgress { submission: u64, percent: u8 },
    /// Media host finished (or refused) the upload.
    UploadFinished {
        submission: u64,
        result: Result<MediaAsset, String>,
    },
    /// Processing backend answered the notification.
    BackendAcknowledged {
        submission: u64,
        result: Result<JobAck, String>,
    },
    /// Render tick.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
