mod app;
mod config;
mod effects;
mod render;

pub use app::{list_records, show_record, upload_file, Session};
pub use config::{load_config, AppConfig, DEFAULT_CONFIG_FILENAME};
pub use effects::EffectRunner;
pub use render::{render_cards, render_detail, render_upload};
