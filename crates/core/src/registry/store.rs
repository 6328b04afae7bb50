//! JSON file registry store with backup and atomic replace.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::types::{Registry, SeriesEntry};
use super::RegistryError;

/// Registry store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonRegistryStore {
    path: PathBuf,
    backup_dir: PathBuf,
}

impl JsonRegistryStore {
    /// Create a store for `path`, keeping backups in `<dir of path>/backups`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_dir = default_backup_dir(&path);
        Self { path, backup_dir }
    }

    /// Override the backup directory.
    pub fn with_backup_dir(mut self, backup_dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = backup_dir.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Sibling file the next write is staged into.
    pub fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "registry.json".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    /// Load the registry.
    ///
    /// A missing file is an empty registry. Entries that fail schema
    /// validation, or repeat an earlier name, are skipped with a warning.
    pub fn load(&self) -> Result<Registry, RegistryError> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "Registry file not found, starting empty");
            return Ok(Registry::default());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| RegistryError::io(&self.path, e))?;

        let root: Value = serde_json::from_str(&content).map_err(|e| RegistryError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let rows = match root {
            Value::Array(rows) => rows,
            other => {
                return Err(RegistryError::Corrupt {
                    path: self.path.clone(),
                    reason: format!("expected a JSON array, found {}", json_kind(&other)),
                })
            }
        };

        let mut registry = Registry::default();
        for (index, row) in rows.iter().enumerate() {
            match parse_entry(row) {
                Ok(entry) => {
                    let key = entry.name_key();
                    if registry.names.contains(&key) {
                        warn!(index, name = %entry.name, "Skipping duplicate registry entry");
                        registry.skipped += 1;
                        continue;
                    }
                    registry.names.insert(key);
                    registry.entries.push(entry);
                }
                Err(reason) => {
                    warn!(index, %reason, "Skipping malformed registry entry");
                    registry.skipped += 1;
                }
            }
        }
        registry.preserved = rows;

        info!(
            path = %self.path.display(),
            entries = registry.entries.len(),
            skipped = registry.skipped,
            "Registry loaded"
        );

        Ok(registry)
    }

    /// Append entries and persist the full registry.
    ///
    /// Entries whose name is already present (case-insensitive), or that
    /// fail validation, are dropped. Nothing is written when no entry
    /// survives. Otherwise the current file is copied to
    /// `backups/<YYYYMMDD_HHMMSS>_<strategy>.json` first, then replaced
    /// atomically. Returns the number of entries written.
    pub fn append_all(
        &self,
        registry: &mut Registry,
        new_entries: Vec<SeriesEntry>,
        strategy: &str,
    ) -> Result<usize, RegistryError> {
        let mut batch_names: HashSet<String> = HashSet::new();
        let mut accepted = Vec::with_capacity(new_entries.len());

        for entry in new_entries {
            if let Err(reason) = entry.validate() {
                warn!(name = %entry.name, %reason, "Refusing to persist invalid entry");
                continue;
            }
            let key = entry.name_key();
            if registry.names.contains(&key) || !batch_names.insert(key) {
                debug!(name = %entry.name, "Dropping entry already in registry");
                continue;
            }
            accepted.push(entry);
        }

        if accepted.is_empty() {
            debug!("No new entries, registry left untouched");
            return Ok(0);
        }

        if self.path.exists() {
            let backup = self.backup(strategy)?;
            info!(backup = %backup.display(), "Registry backed up");
        }

        let mut rows = registry.preserved.clone();
        for entry in &accepted {
            rows.push(serde_json::to_value(entry)?);
        }

        let staged = self.stage_write(&rows)?;
        self.commit_staged(&staged)?;

        let written = accepted.len();
        for entry in accepted {
            registry.names.insert(entry.name_key());
            registry.entries.push(entry);
        }
        registry.preserved = rows;

        info!(
            path = %self.path.display(),
            written,
            total = registry.entries.len(),
            "Registry updated"
        );

        Ok(written)
    }

    /// Copy the current registry file into the backup directory.
    pub fn backup(&self, strategy: &str) -> Result<PathBuf, RegistryError> {
        fs::create_dir_all(&self.backup_dir).map_err(|e| RegistryError::BackupFailed {
            path: self.backup_dir.clone(),
            source: e,
        })?;

        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let label = sanitize_label(strategy);
        let mut target = self.backup_dir.join(format!("{}_{}.json", stamp, label));
        let mut suffix = 1;
        while target.exists() {
            target = self
                .backup_dir
                .join(format!("{}_{}_{}.json", stamp, label, suffix));
            suffix += 1;
        }

        fs::copy(&self.path, &target).map_err(|e| RegistryError::BackupFailed {
            path: target.clone(),
            source: e,
        })?;

        Ok(target)
    }

    /// Write the full registry contents to the temp sibling file and sync it.
    ///
    /// The live registry is untouched until [`commit_staged`](Self::commit_staged).
    pub fn stage_write(&self, rows: &[Value]) -> Result<PathBuf, RegistryError> {
        let temp = self.temp_path();

        if let Some(parent) = temp.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| RegistryError::io(parent, e))?;
        }

        let file = File::create(&temp).map_err(|e| RegistryError::io(&temp, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, rows)?;
        writer
            .write_all(b"\n")
            .map_err(|e| RegistryError::io(&temp, e))?;
        let file = writer
            .into_inner()
            .map_err(|e| RegistryError::io(&temp, e.into_error()))?;
        file.sync_all().map_err(|e| RegistryError::io(&temp, e))?;

        Ok(temp)
    }

    /// Atomically move a staged file over the registry.
    pub fn commit_staged(&self, staged: &Path) -> Result<(), RegistryError> {
        fs::rename(staged, &self.path).map_err(|e| RegistryError::io(&self.path, e))
    }
}

fn default_backup_dir(path: &Path) -> PathBuf {
    path.parent()
        .map(|p| p.join("backups"))
        .unwrap_or_else(|| PathBuf::from("backups"))
}

fn parse_entry(row: &Value) -> Result<SeriesEntry, String> {
    let entry: SeriesEntry = serde_json::from_value(row.clone()).map_err(|e| e.to_string())?;
    entry.validate()?;
    Ok(entry)
}

fn sanitize_label(label: &str) -> String {
    let cleaned: String = label
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "harvest".to_string()
    } else {
        cleaned
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Category;
    use tempfile::TempDir;

    fn entry(name: &str) -> SeriesEntry {
        SeriesEntry {
            name: name.to_string(),
            authors: vec!["Jane Roe".to_string()],
            category: Category::Prose,
            volumes: 3,
            keywords: vec![name.to_lowercase()],
            variations: vec![],
            exclusions: vec![],
            source: "keyword".to_string(),
            confidence_score: 88,
            detection_date: "2024-05-01T12:00:00Z".to_string(),
            auto_generated: true,
            metadata: None,
        }
    }

    fn store_in(dir: &TempDir) -> JsonRegistryStore {
        JsonRegistryStore::new(dir.path().join("registry.json"))
    }

    #[test]
    fn test_missing_file_is_empty_registry() {
        let dir = TempDir::new().unwrap();
        let registry = store_in(&dir).load().unwrap();
        assert!(registry.is_empty());
        assert!(registry.names.is_empty());
    }

    #[test]
    fn test_unparseable_file_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "[{ not json").unwrap();

        let err = store.load().unwrap_err();
        assert!(matches!(err, RegistryError::Corrupt { .. }));
    }

    #[test]
    fn test_non_array_root_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"name": "Foo"}"#).unwrap();

        let err = store.load().unwrap_err();
        match err {
            RegistryError::Corrupt { reason, .. } => assert!(reason.contains("an object")),
            other => panic!("Expected Corrupt, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let good = serde_json::to_value(entry("Foo Saga")).unwrap();
        let mut bad_category = serde_json::to_value(entry("Bar")).unwrap();
        bad_category["category"] = Value::String("poetry".to_string());
        let rows = vec![good, bad_category, serde_json::json!({"title": "no name"})];
        fs::write(store.path(), serde_json::to_string(&rows).unwrap()).unwrap();

        let registry = store.load().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.skipped, 2);
        assert!(registry.contains_name("FOO SAGA"));
    }

    #[test]
    fn test_duplicate_names_in_file_keep_first() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let rows = vec![
            serde_json::to_value(entry("Foo Saga")).unwrap(),
            serde_json::to_value(entry("foo saga")).unwrap(),
        ];
        fs::write(store.path(), serde_json::to_string(&rows).unwrap()).unwrap();

        let registry = store.load().unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries[0].name, "Foo Saga");
        assert_eq!(registry.skipped, 1);
    }

    #[test]
    fn test_append_creates_file_without_backup() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut registry = store.load().unwrap();

        let written = store
            .append_all(&mut registry, vec![entry("Foo Saga")], "keyword")
            .unwrap();
        assert_eq!(written, 1);
        assert!(!store.backup_dir().exists());

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries[0], entry("Foo Saga"));
    }

    #[test]
    fn test_append_backs_up_existing_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut registry = store.load().unwrap();
        store
            .append_all(&mut registry, vec![entry("Foo Saga")], "keyword")
            .unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        store
            .append_all(&mut registry, vec![entry("Bar Chronicles")], "author")
            .unwrap();

        let backups: Vec<_> = fs::read_dir(store.backup_dir())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(backups.len(), 1);
        let backup_name = backups[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(backup_name.ends_with("_author.json"));
        assert_eq!(fs::read_to_string(&backups[0]).unwrap(), before);

        let reloaded = store.load().unwrap();
        let names: Vec<_> = reloaded.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Foo Saga", "Bar Chronicles"]);
    }

    #[test]
    fn test_append_drops_case_insensitive_duplicates() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut registry = store.load().unwrap();
        store
            .append_all(&mut registry, vec![entry("Foo Saga")], "keyword")
            .unwrap();

        let written = store
            .append_all(
                &mut registry,
                vec![entry("FOO SAGA"), entry("Baz"), entry("baz")],
                "keyword",
            )
            .unwrap();
        assert_eq!(written, 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_append_nothing_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut registry = store.load().unwrap();
        store
            .append_all(&mut registry, vec![entry("Foo Saga")], "keyword")
            .unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let written = store
            .append_all(&mut registry, vec![entry("Foo Saga")], "keyword")
            .unwrap();
        assert_eq!(written, 0);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert!(!store.backup_dir().exists());
    }

    #[test]
    fn test_malformed_rows_survive_rewrite() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let rows = vec![serde_json::json!({"legacy": true})];
        fs::write(store.path(), serde_json::to_string(&rows).unwrap()).unwrap();

        let mut registry = store.load().unwrap();
        store
            .append_all(&mut registry, vec![entry("Foo Saga")], "keyword")
            .unwrap();

        let raw: Vec<Value> =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw.len(), 2);
        assert_eq!(raw[0], serde_json::json!({"legacy": true}));
    }

    #[test]
    fn test_output_is_pretty_and_keeps_unicode() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut registry = store.load().unwrap();
        store
            .append_all(&mut registry, vec![entry("Bande Dessinée")], "keyword")
            .unwrap();

        let content = fs::read_to_string(store.path()).unwrap();
        assert!(content.contains("Bande Dessinée"));
        assert!(content.contains("\n  {\n    \"name\""));
    }

    #[test]
    fn test_backup_failure_aborts_before_write() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file in the way").unwrap();
        let store = store_in(&dir).with_backup_dir(blocker.join("backups"));
        let mut registry = store.load().unwrap();
        store
            .append_all(&mut registry, vec![entry("Foo Saga")], "keyword")
            .unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store
            .append_all(&mut registry, vec![entry("Bar")], "keyword")
            .unwrap_err();
        assert!(matches!(err, RegistryError::BackupFailed { .. }));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_sanitize_label() {
        assert_eq!(sanitize_label("keyword"), "keyword");
        assert_eq!(sanitize_label("My Strategy/2"), "my_strategy_2");
        assert_eq!(sanitize_label(""), "harvest");
    }
}
