use crate::presenter::{present_card, present_detail};
use crate::store::{reduce_store, RecordStore, StoreAction};
use crate::upload::{UploadJob, UploadPolicy};
use crate::view_model::{AppViewModel, DetailView, UploadView};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    store: RecordStore,
    upload: UploadJob,
    policy: UploadPolicy,
    detail_missing: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: UploadPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn upload(&self) -> &UploadJob {
        &self.upload
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            loading: self.store.loading(),
            error: self.store.error().map(ToOwned::to_owned),
            cards: self.store.records().iter().map(present_card).collect(),
            detail: self.detail_view(),
            upload: UploadView::from_job(&self.upload),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn dispatch(&mut self, action: StoreAction) {
        let store = std::mem::take(&mut self.store);
        self.store = reduce_store(store, action);
        self.dirty = true;
    }

    pub(crate) fn set_detail_missing(&mut self, missing: bool) {
        self.detail_missing = missing;
    }

    /// Runs `change` against the upload job and marks the state dirty if it moved.
    pub(crate) fn change_upload<T>(
        &mut self,
        change: impl FnOnce(&mut UploadJob, &UploadPolicy) -> T,
    ) -> T {
        let before = self.upload.clone();
        let out = change(&mut self.upload, &self.policy);
        if self.upload != before {
            self.dirty = true;
        }
        out
    }

    fn detail_view(&self) -> DetailView {
        if self.store.loading() {
            return DetailView::Loading;
        }
        if self.detail_missing {
            return DetailView::NotFound;
        }
        if let Some(error) = self.store.error() {
            return DetailView::Error(error.to_string());
        }
        match self.store.selected() {
            Some(record) => DetailView::Ready(Box::new(present_detail(record))),
            None => DetailView::Empty,
        }
    }
}
