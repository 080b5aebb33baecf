use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use engine_logging::{engine_debug, engine_info};
use gallery_core::{update, AppState, AppViewModel, DetailView, Msg, UploadPolicy, UploadState};
use gallery_engine::{inspect_file, EngineHandle};

use super::effects::EffectRunner;
use super::render::{render_cards, render_detail, render_upload};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Owns the state and drives the update loop against a live engine.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
}

impl Session {
    pub fn new(engine: EngineHandle, policy: UploadPolicy) -> Self {
        Self {
            state: AppState::with_policy(policy),
            runner: EffectRunner::new(engine),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies `msg`, starts its effects, and returns the view when anything changed.
    pub fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let view = state.consume_dirty().then(|| state.view());
        self.state = state;
        self.runner.enqueue(effects);
        view
    }

    /// Feeds engine answers into `update` until `done` holds or `timeout`
    /// passes. Each changed view goes to `on_view`.
    pub fn run_until(
        &mut self,
        mut done: impl FnMut(&AppState) -> bool,
        timeout: Duration,
        mut on_view: impl FnMut(&AppViewModel),
    ) -> bool {
        let deadline = Instant::now() + timeout;
        while !done(&self.state) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let wait = POLL_INTERVAL.min(deadline - now);
            let msg = self.runner.next_msg(wait).unwrap_or(Msg::Tick);
            if let Some(view) = self.dispatch(msg) {
                on_view(&view);
            }
        }
        true
    }
}

/// Fetches the list and renders every card. Fails when the list could not be fetched.
pub fn list_records(session: &mut Session, timeout: Duration) -> anyhow::Result<Vec<String>> {
    session.dispatch(Msg::RecordsRequested);
    if !session.run_until(|state| !state.store().loading(), timeout, |_| {}) {
        bail!("timed out waiting for records");
    }
    let view = session.state().view();
    if let Some(error) = &view.error {
        bail!(error.clone());
    }
    Ok(render_cards(&view))
}

pub fn show_record(
    session: &mut Session,
    id: &str,
    timeout: Duration,
) -> anyhow::Result<Vec<String>> {
    session.dispatch(Msg::RecordRequested(id.to_string()));
    if !session.run_until(|state| !state.store().loading(), timeout, |_| {}) {
        bail!("timed out waiting for record {id}");
    }
    let view = session.state().view();
    if let DetailView::Error(message) = &view.detail {
        bail!(message.clone());
    }
    Ok(render_detail(&view))
}

/// Validates, uploads and queues one file, reporting each visible change to
/// `report`. Returns the backend job id.
pub fn upload_file(
    session: &mut Session,
    path: &Path,
    timeout: Duration,
    mut report: impl FnMut(&str),
) -> anyhow::Result<String> {
    let candidate =
        inspect_file(path).with_context(|| format!("cannot read {}", path.display()))?;
    engine_info!("Picked {} ({} bytes)", candidate.name, candidate.size_bytes);

    if let Some(view) = session.dispatch(Msg::FilePicked(candidate)) {
        report(&render_upload(&view.upload));
    }
    let probed = session.run_until(
        |state| state.upload().pending().is_none(),
        timeout,
        |view| report(&render_upload(&view.upload)),
    );
    if !probed {
        bail!("timed out reading the video duration");
    }
    if !session.state().upload().can_submit() {
        let view = session.state().view();
        bail!(view
            .upload
            .message
            .unwrap_or_else(|| "file cannot be uploaded".to_string()));
    }

    if let Some(view) = session.dispatch(Msg::SubmitClicked) {
        report(&render_upload(&view.upload));
    }
    let settled = session.run_until(
        |state| matches!(state.upload().state(), UploadState::Queued | UploadState::Error),
        timeout,
        |view| report(&render_upload(&view.upload)),
    );
    if !settled {
        bail!("timed out waiting for the upload to finish");
    }

    let job = session.state().upload();
    engine_debug!("Upload settled in state {}", job.state().label());
    match (job.state(), job.job_id()) {
        (UploadState::Queued, Some(job_id)) => Ok(job_id.to_string()),
        _ => bail!(job.error().unwrap_or("upload failed").to_string()),
    }
}
