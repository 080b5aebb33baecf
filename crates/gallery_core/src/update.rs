use crate::{AppState, Effect, Msg, StoreAction};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::RecordsRequested => {
            state.dispatch(StoreAction::SetLoading(true));
            vec![Effect::FetchAllRecords]
        }
        Msg::RecordsLoaded(Ok(records)) => {
            state.dispatch(StoreAction::SetRecords(records));
            Vec::new()
        }
        Msg::RecordsLoaded(Err(err)) => {
            state.dispatch(StoreAction::SetError(Some(err.to_string())));
            Vec::new()
        }
        Msg::RecordRequested(id) => {
            state.set_detail_missing(false);
            state.dispatch(StoreAction::SetLoading(true));
            vec![Effect::FetchRecord { id }]
        }
        Msg::RecordLoaded(Ok(record)) => {
            state.dispatch(StoreAction::SetSelectedRecord(Some(record)));
            state.dispatch(StoreAction::SetLoading(false));
            Vec::new()
        }
        Msg::RecordLoaded(Err(err)) => {
            state.set_detail_missing(err.is_not_found());
            state.dispatch(StoreAction::SetError(Some(err.to_string())));
            Vec::new()
        }
        Msg::SelectionCleared => {
            state.set_detail_missing(false);
            state.dispatch(StoreAction::SetSelectedRecord(None));
            Vec::new()
        }
        Msg::StoreReset => {
            state.set_detail_missing(false);
            state.dispatch(StoreAction::Reset);
            Vec::new()
        }
        Msg::FilePicked(candidate) => {
            state.change_upload(|job, policy| job.pick(candidate, policy))
        }
        Msg::DurationProbed { path, result } => {
            state.change_upload(|job, policy| job.apply_probe(&path, result, policy));
            Vec::new()
        }
        Msg::FileRemoved => {
            state.change_upload(|job, _| job.remove_file());
            Vec::new()
        }
        Msg::UploadDismissed => {
            state.change_upload(|job, _| job.dismiss());
            Vec::new()
        }
        Msg::SubmitClicked => state.change_upload(|job, _| job.submit()),
        Msg::UploadProgress {
            submission,
            percent,
        } => {
            state.change_upload(|job, _| job.apply_progress(submission, percent));
            Vec::new()
        }
        Msg::UploadFinished { submission, result } => {
            state.change_upload(|job, _| job.apply_upload_result(submission, result))
        }
        Msg::BackendAcknowledged { submission, result } => {
            state.change_upload(|job, _| job.apply_ack(submission, result));
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
