pub mod catalog;
pub mod command_processor;
pub mod config;
pub mod constants;
pub mod entry;
pub mod error;
pub mod messages;
pub mod model;
pub mod paths;
pub mod store;
pub mod ui;

pub use catalog::{CatalogClient, ListEvent, PluginList};
pub use error::{PlugdexError, Result};
pub use model::{CategoryFilter, PluginDraft, PluginFilter, PluginRecord};
pub use store::{JsonFileStore, MemoryStore, PluginStore};
