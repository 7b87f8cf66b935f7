use std::time::Duration;

// Catalogue Constants
pub const CATEGORIES: [&str; 3] = ["effects", "synth", "processing"];
pub const ALL_CATEGORIES: &str = "all";
pub const DEFAULT_CATEGORY: &str = "effects";
pub const CATALOG_FILE_NAME: &str = "catalog.json";
pub const CATALOG_ENV_VAR: &str = "PLUGDEX_CATALOG";
pub const TAG_SEPARATOR: char = ',';

// Storage Constants
pub const DEFAULT_MAX_BACKUPS: usize = 10;
pub const BACKUP_DIR_NAME: &str = "Backups";
pub const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S%3f";

// UI Layout Constants
pub const DEFAULT_WINDOW_WIDTH: f32 = 1100.0;
pub const DEFAULT_WINDOW_HEIGHT: f32 = 720.0;
pub const MIN_WINDOW_WIDTH: f32 = 480.0;
pub const MIN_WINDOW_HEIGHT: f32 = 360.0;
pub const CARD_MIN_WIDTH: f32 = 300.0;
pub const MAX_GRID_COLUMNS: usize = 3;
pub const CARD_SPACING: f32 = 16.0;

// Interaction Constants
pub const STORE_POLL_INTERVAL: Duration = Duration::from_millis(50);
pub const FILTER_SAVE_DELAY: Duration = Duration::from_secs(1);

/// Human-readable label for a category value.
pub fn category_label(category: &str) -> String {
    let mut chars = category.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
