use std::path::PathBuf;

use crate::{MediaAsset, RecordId, SelectedFile};

/// IO requested by `update`; executed by the engine, answered with a `Msg`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchAllRecords,
    FetchRecord { id: RecordId },
    ProbeDuration { path: PathBuf },
    UploadFile { submission: u64, file: SelectedFile },
    NotifyBackend { submission: u64, asset: MediaAsset },
}
