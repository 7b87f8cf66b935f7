use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{BACKUP_DIR_NAME, BACKUP_TIMESTAMP_FORMAT, DEFAULT_MAX_BACKUPS};
use crate::error::{PlugdexError, Result};
use crate::model::PluginRecord;
use crate::model::draft::validate_name;

/// Persistence boundary for the catalogue.
///
/// Every call answers with the complete collection as stored, in insertion
/// order. Callers replace their copy wholesale; nothing is patched locally.
pub trait PluginStore: Send {
    fn get_plugins(&mut self) -> Result<Vec<PluginRecord>>;

    /// Creates the record when `id` is `None` (the store picks the id),
    /// otherwise replaces the record with that id.
    fn save_plugin(&mut self, record: PluginRecord) -> Result<Vec<PluginRecord>>;

    fn delete_plugin(&mut self, id: u64) -> Result<Vec<PluginRecord>>;
}

fn id_space_exhausted() -> PlugdexError {
    PlugdexError::StoreUnavailable("no plugin ids left above the current maximum".to_string())
}

/// One past the largest id in use. Fails instead of reusing `u64::MAX`.
fn next_id(records: &[PluginRecord]) -> Result<u64> {
    match records.iter().filter_map(|r| r.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or_else(id_space_exhausted),
    }
}

fn upsert(records: &mut Vec<PluginRecord>, mut record: PluginRecord) -> Result<u64> {
    validate_name(&record.name)?;
    match record.id {
        None => {
            let id = next_id(records)?;
            record.id = Some(id);
            records.push(record);
            Ok(id)
        }
        Some(id) => {
            let existing = records
                .iter_mut()
                .find(|r| r.id == Some(id))
                .ok_or(PlugdexError::NotFound(id))?;
            *existing = record;
            Ok(id)
        }
    }
}

fn remove(records: &mut Vec<PluginRecord>, id: u64) -> Result<()> {
    let before = records.len();
    records.retain(|r| r.id != Some(id));
    if records.len() == before {
        return Err(PlugdexError::NotFound(id));
    }
    Ok(())
}

/// Gives every id-less record a fresh id. Only hand-edited or legacy files
/// contain such records.
fn assign_missing_ids(records: &mut [PluginRecord]) -> Result<usize> {
    let mut next = next_id(records);
    let mut assigned = 0;
    for record in records.iter_mut().filter(|r| r.id.is_none()) {
        let id = next?;
        record.id = Some(id);
        next = id.checked_add(1).ok_or_else(id_space_exhausted);
        assigned += 1;
    }
    Ok(assigned)
}

// ── In-memory implementation ─────────────────────────────────────────

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: Vec<PluginRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(mut records: Vec<PluginRecord>) -> Result<Self> {
        assign_missing_ids(&mut records)?;
        Ok(Self { records })
    }
}

impl PluginStore for MemoryStore {
    fn get_plugins(&mut self) -> Result<Vec<PluginRecord>> {
        Ok(self.records.clone())
    }

    fn save_plugin(&mut self, record: PluginRecord) -> Result<Vec<PluginRecord>> {
        upsert(&mut self.records, record)?;
        Ok(self.records.clone())
    }

    fn delete_plugin(&mut self, id: u64) -> Result<Vec<PluginRecord>> {
        remove(&mut self.records, id)?;
        Ok(self.records.clone())
    }
}

// ── JSON file-backed implementation ──────────────────────────────────

/// `plugins` is required and nothing else is allowed, so an object of the
/// wrong shape is reported as malformed rather than read as empty.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    plugins: Vec<PluginRecord>,
}

/// Accepts both the current layout and a bare array of records.
#[derive(Deserialize)]
#[serde(untagged)]
enum OnDisk {
    Current(CatalogFile),
    Legacy(Vec<PluginRecord>),
}

/// Stores the catalogue as pretty JSON at the given path. The file is read
/// on every call, so edits made while the app runs are picked up.
pub struct JsonFileStore {
    path: PathBuf,
    backups: Option<usize>,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            backups: Some(DEFAULT_MAX_BACKUPS),
        }
    }

    /// Keep at most `max` timestamped copies under `Backups/`; `None` turns
    /// backups off.
    pub fn with_backups(mut self, max: Option<usize>) -> Self {
        self.backups = max.filter(|m| *m > 0);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<Vec<PluginRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path).map_err(|e| {
            PlugdexError::StoreUnavailable(format!("reading {}: {}", self.path.display(), e))
        })?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut records = match serde_json::from_str::<OnDisk>(&data)? {
            OnDisk::Current(file) => file.plugins,
            OnDisk::Legacy(records) => records,
        };
        let assigned = assign_missing_ids(&mut records)?;
        if assigned > 0 {
            log::warn!(
                "{} record(s) in {} had no id; assigned new ones",
                assigned,
                self.path.display()
            );
        }
        Ok(records)
    }

    fn write_file(&self, records: &[PluginRecord]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        if let Some(max) = self.backups
            && self.path.exists()
        {
            self.create_backup(max)?;
        }

        let file = CatalogFile {
            plugins: records.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Replace atomically so a crash mid-write leaves the old catalogue.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn backup_dir(&self) -> PathBuf {
        self.path
            .parent()
            .unwrap_or(Path::new("."))
            .join(BACKUP_DIR_NAME)
    }

    fn stem(&self) -> &str {
        self.path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("catalog")
    }

    /// Copies the current file into `Backups/` before it is overwritten.
    fn create_backup(&self, max: usize) -> Result<()> {
        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir)?;

        let timestamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut backup_path = backup_dir.join(format!("{}_{}.json", self.stem(), timestamp));
        // Saves within the same millisecond get a counter suffix.
        let mut counter = 1;
        while backup_path.exists() {
            backup_path = backup_dir.join(format!("{}_{}_{}.json", self.stem(), timestamp, counter));
            counter += 1;
        }
        fs::copy(&self.path, &backup_path)?;

        self.rotate_backups(&backup_dir, max);
        Ok(())
    }

    fn rotate_backups(&self, backup_dir: &Path, max: usize) {
        let pattern = format!(
            "{}/{}_*.json",
            glob::Pattern::escape(&backup_dir.to_string_lossy()),
            glob::Pattern::escape(self.stem())
        );
        let mut backups: Vec<PathBuf> = match glob::glob(&pattern) {
            Ok(paths) => paths.flatten().collect(),
            Err(e) => {
                log::warn!("Bad backup pattern {}: {}", pattern, e);
                return;
            }
        };

        // Timestamped names sort oldest first.
        backups.sort();
        if backups.len() > max {
            let to_remove = backups.len() - max;
            for path in backups.iter().take(to_remove) {
                if let Err(e) = fs::remove_file(path) {
                    log::warn!("Could not remove old backup {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Paths of existing backups, oldest first.
    pub fn list_backups(&self) -> Vec<PathBuf> {
        let pattern = format!(
            "{}/{}_*.json",
            glob::Pattern::escape(&self.backup_dir().to_string_lossy()),
            glob::Pattern::escape(self.stem())
        );
        let mut out: Vec<PathBuf> = glob::glob(&pattern)
            .map(|paths| paths.flatten().collect())
            .unwrap_or_default();
        out.sort();
        out
    }
}

impl PluginStore for JsonFileStore {
    fn get_plugins(&mut self) -> Result<Vec<PluginRecord>> {
        self.read_file()
    }

    fn save_plugin(&mut self, record: PluginRecord) -> Result<Vec<PluginRecord>> {
        let mut records = self.read_file()?;
        let id = upsert(&mut records, record)?;
        self.write_file(&records)?;
        log::debug!("Saved plugin {} to {}", id, self.path.display());
        Ok(records)
    }

    fn delete_plugin(&mut self, id: u64) -> Result<Vec<PluginRecord>> {
        let mut records = self.read_file()?;
        remove(&mut records, id)?;
        self.write_file(&records)?;
        log::debug!("Deleted plugin {} from {}", id, self.path.display());
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reverb_king() -> PluginRecord {
        PluginRecord::new("Reverb King", "effects")
            .with_description("lush hall reverb")
            .with_tags(["reverb", "hall"])
            .with_download_url("https://example.com/reverb")
    }

    fn bass_synth() -> PluginRecord {
        PluginRecord::new("Bass Synth", "synth").with_download_url("http://x")
    }

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut store = MemoryStore::new();
        let after_first = store.save_plugin(reverb_king()).unwrap();
        assert_eq!(after_first[0].id, Some(1));

        let after_second = store.save_plugin(bass_synth()).unwrap();
        assert_eq!(after_second.len(), 2);
        assert_eq!(after_second[1].id, Some(2));
    }

    #[test]
    fn ids_are_not_reused_below_the_maximum() {
        let mut store = MemoryStore::with_records(vec![
            reverb_king().with_id(4),
            bass_synth().with_id(9),
        ])
        .unwrap();
        store.delete_plugin(4).unwrap();
        let records = store.save_plugin(PluginRecord::new("Comp", "processing")).unwrap();
        assert_eq!(records.last().and_then(|r| r.id), Some(10));
    }

    #[test]
    fn save_with_existing_id_replaces_in_place() {
        let mut store = MemoryStore::with_records(vec![reverb_king(), bass_synth()]).unwrap();
        let renamed = PluginRecord::new("Reverb Queen", "effects").with_id(1);
        let records = store.save_plugin(renamed).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Reverb Queen");
    }

    #[test]
    fn save_with_unknown_id_is_not_found() {
        let mut store = MemoryStore::new();
        let err = store.save_plugin(bass_synth().with_id(42)).unwrap_err();
        assert_eq!(err, PlugdexError::NotFound(42));
    }

    #[test]
    fn nameless_records_are_rejected() {
        let mut store = MemoryStore::new();
        let err = store.save_plugin(PluginRecord::new(" ", "synth")).unwrap_err();
        assert!(matches!(err, PlugdexError::ValidationFailed(_)));
        assert!(store.get_plugins().unwrap().is_empty());
    }

    #[test]
    fn deleting_a_missing_id_is_not_found() {
        let mut store = MemoryStore::with_records(vec![reverb_king()]).unwrap();
        assert_eq!(store.delete_plugin(5).unwrap_err(), PlugdexError::NotFound(5));
        assert_eq!(store.get_plugins().unwrap().len(), 1);
    }

    #[test]
    fn json_store_starts_empty_without_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path().join("catalog.json"));
        assert!(store.get_plugins().unwrap().is_empty());
    }

    #[test]
    fn json_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let mut store = JsonFileStore::new(path.clone()).with_backups(None);
        store.save_plugin(reverb_king()).unwrap();
        store.save_plugin(bass_synth()).unwrap();
        store.delete_plugin(1).unwrap();

        let mut reopened = JsonFileStore::new(path);
        let records = reopened.get_plugins().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(2));
        assert_eq!(records[0].name, "Bass Synth");
    }

    #[test]
    fn json_store_reads_the_legacy_array_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(
            &path,
            r#"[{"id":3,"name":"Old","category":"effects","description":"","tags":[],"downloadUrl":"http://old"},
                {"name":"No Id","category":"synth"}]"#,
        )
        .unwrap();

        let records = JsonFileStore::new(path).get_plugins().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].download_url, "http://old");
        assert_eq!(records[1].id, Some(4));
    }

    #[test]
    fn corrupt_file_reports_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "{ not json").unwrap();

        let mut store = JsonFileStore::new(path.clone());
        assert!(matches!(
            store.get_plugins(),
            Err(PlugdexError::StoreUnavailable(_))
        ));
        assert!(store.save_plugin(bass_synth()).is_err());
        assert_eq!(fs::read_to_string(path).unwrap(), "{ not json");
    }

    #[test]
    fn wrong_shape_object_is_not_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        for contents in [
            r#"{"plugin":[{"id":1,"name":"Keep","category":"effects"}]}"#,
            "{}",
            r#"{"plugins":[],"extra":true}"#,
        ] {
            let path = dir.path().join("catalog.json");
            fs::write(&path, contents).unwrap();

            let mut store = JsonFileStore::new(path.clone()).with_backups(None);
            assert!(
                matches!(store.get_plugins(), Err(PlugdexError::StoreUnavailable(_))),
                "{contents}"
            );
            assert!(store.save_plugin(bass_synth()).is_err());
            assert_eq!(fs::read_to_string(&path).unwrap(), contents);
        }
    }

    #[test]
    fn empty_legacy_array_is_an_empty_catalogue() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, "[]").unwrap();
        assert!(JsonFileStore::new(path).get_plugins().unwrap().is_empty());
    }

    #[test]
    fn adding_past_the_largest_id_fails_instead_of_reusing_it() {
        let mut store = MemoryStore::with_records(vec![reverb_king().with_id(u64::MAX)]).unwrap();
        let err = store.save_plugin(bass_synth()).unwrap_err();
        assert!(matches!(err, PlugdexError::StoreUnavailable(_)));

        let records = store.delete_plugin(u64::MAX).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn assigning_ids_near_the_top_of_the_range_does_not_overflow() {
        let crowded = vec![
            reverb_king().with_id(u64::MAX - 1),
            PluginRecord::new("First", "synth"),
            PluginRecord::new("Second", "synth"),
        ];
        assert!(matches!(
            MemoryStore::with_records(crowded),
            Err(PlugdexError::StoreUnavailable(_))
        ));

        let fits = vec![
            reverb_king().with_id(u64::MAX - 1),
            PluginRecord::new("Last", "synth"),
        ];
        let mut store = MemoryStore::with_records(fits).unwrap();
        let ids: Vec<Option<u64>> = store.get_plugins().unwrap().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(u64::MAX - 1), Some(u64::MAX)]);
    }

    #[test]
    fn rapid_saves_each_leave_a_backup() {
        let dir = tempfile::tempdir().unwrap();
        let mut store =
            JsonFileStore::new(dir.path().join("catalog.json")).with_backups(Some(10));
        for n in 0..5 {
            store
                .save_plugin(PluginRecord::new(format!("Plugin {n}"), "synth"))
                .unwrap();
        }
        // The first save had nothing to back up.
        assert_eq!(store.list_backups().len(), 4);
    }

    #[test]
    fn writes_leave_a_bounded_number_of_backups() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let mut store = JsonFileStore::new(path).with_backups(Some(2));

        store.save_plugin(reverb_king()).unwrap();
        assert!(store.list_backups().is_empty());

        store.save_plugin(bass_synth()).unwrap();
        assert_eq!(store.list_backups().len(), 1);

        // Pre-seed older backups; rotation should prune down to the limit.
        let backup_dir = dir.path().join(BACKUP_DIR_NAME);
        fs::write(backup_dir.join("catalog_19990101_000000.json"), "[]").unwrap();
        fs::write(backup_dir.join("catalog_19990101_000001.json"), "[]").unwrap();

        store.delete_plugin(1).unwrap();
        let backups = store.list_backups();
        assert_eq!(backups.len(), 2);
        assert!(
            backups
                .iter()
                .all(|p| !p.to_string_lossy().contains("19990101_000000"))
        );
    }
}
