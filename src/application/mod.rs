pub mod config;

pub use config::{ActionsConfig, Config, DisplayConfig, EditorConfig, SearchConfig, RESERVED_KEYS};
