// Settings persisted in config.json.

pub mod settings;

pub use settings::{KeyMapping, Settings};
