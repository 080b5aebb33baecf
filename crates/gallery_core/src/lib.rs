//! Gallery core: pure record store, upload state machine and presenters.
mod effect;
mod msg;
mod presenter;
mod record;
mod state;
mod store;
mod update;
mod upload;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use presenter::{
    first_present, present_card, present_detail, CardModel, DetailModel, ImageRef, StatusTone,
    DEFAULT_CARD_TITLE, DEFAULT_DETAIL_TITLE, PLACEHOLDER_IMAGE_URL, PRICE_ON_REQUEST,
};
pub use record::{FetchError, Fields, Record, RecordId, RecordList};
pub use state::AppState;
pub use store::{reduce_store, RecordStore, StoreAction};
pub use update::update;
pub use upload::{
    FileCandidate, JobAck, MediaAsset, SelectedFile, UploadJob, UploadPolicy, UploadState,
    ValidationError, MAX_PROGRESS_BEFORE_CONFIRMATION,
};
pub use view_model::{AppViewModel, DetailView, UploadView};
