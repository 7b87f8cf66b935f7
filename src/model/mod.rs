pub mod draft;
pub mod filter;
pub mod plugin;

pub use draft::{PluginDraft, parse_tags, validate_record};
pub use filter::{CategoryFilter, PluginFilter};
pub use plugin::PluginRecord;
