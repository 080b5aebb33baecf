//! Terminal front end: browse records and push videos through the upload pipeline.
mod platform;

pub use platform::*;
