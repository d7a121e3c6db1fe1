pub mod app_settings;
pub mod persistence;
pub mod store;

pub use app_settings::{AppSettings, Language};
pub use store::{JsonFileStore, KeyValueStore, STORED_DOB_KEY};
