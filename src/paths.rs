use std::path::PathBuf;

use directories::ProjectDirs;

use crate::constants::CATALOG_FILE_NAME;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "plugdex", "plugdex")
}

/// Used when the platform reports no home directory.
fn fallback_dir() -> PathBuf {
    PathBuf::from(".plugdex")
}

pub fn config_root_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(fallback_dir)
}

pub fn config_path() -> PathBuf {
    config_root_dir().join("config.json")
}

pub fn data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(fallback_dir)
}

pub fn cache_dir() -> PathBuf {
    let dir = project_dirs()
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(fallback_dir);
    let _ = std::fs::create_dir_all(&dir);
    dir
}

pub fn default_catalog_path() -> PathBuf {
    data_dir().join(CATALOG_FILE_NAME)
}
