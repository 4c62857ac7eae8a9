use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{self, DataLoadError};
use super::model::ConsumptionTable;

/// What a cached table is checked against before reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: SystemTime,
    len: u64,
}

struct CacheEntry {
    stamp: FileStamp,
    table: Arc<ConsumptionTable>,
}

/// Loaded tables keyed by file path, valid while the file's modification
/// time and size are unchanged.
#[derive(Default)]
pub struct LoadCache {
    entries: HashMap<PathBuf, CacheEntry>,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `path`, reloading it if the file changed
    /// since it was cached. Failed loads leave the cache without an entry.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<ConsumptionTable>, DataLoadError> {
        let stamp = file_stamp(path)?;

        if let Some(entry) = self.entries.get(path) {
            if entry.stamp == stamp {
                log::debug!("Cache hit for {}", path.display());
                return Ok(Arc::clone(&entry.table));
            }
            log::warn!("{} changed on disk, reloading", path.display());
        }

        self.entries.remove(path);
        let table = Arc::new(loader::load(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                stamp,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drop the entry for `path`. Returns whether one existed.
    pub fn invalidate(&mut self, path: &Path) -> bool {
        self.entries.remove(path).is_some()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn file_stamp(path: &Path) -> Result<FileStamp, DataLoadError> {
    std::fs::metadata(path)
        .and_then(|meta| {
            Ok(FileStamp {
                modified: meta.modified()?,
                len: meta.len(),
            })
        })
        .map_err(|source| DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::time::Duration;

    const HEADER: &str = "Data,Classe,Ramo,Submercado,UF,Consumo,Covid\n";

    fn write_csv(path: &Path, rows: &[&str]) {
        let mut body = HEADER.to_string();
        for row in rows {
            body.push_str(row);
            body.push('\n');
        }
        fs::write(path, body).unwrap();
    }

    fn touch(path: &Path, modified: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(modified)
            .unwrap();
    }

    #[test]
    fn second_lookup_reuses_the_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        write_csv(&path, &["01/01/2020,A,B,C,D,1,0"]);

        let mut cache = LoadCache::new();
        let first = cache.get_or_load(&path).unwrap();
        let second = cache.get_or_load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn changed_modification_time_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        write_csv(&path, &["01/01/2020,A,B,C,D,1,0"]);
        touch(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));

        let mut cache = LoadCache::new();
        let first = cache.get_or_load(&path).unwrap();
        assert_eq!(first.len(), 1);

        write_csv(&path, &["01/01/2020,A,B,C,D,1,0", "01/02/2020,A,B,C,D,2,0"]);
        touch(&path, SystemTime::UNIX_EPOCH + Duration::from_secs(2_000));

        let second = cache.get_or_load(&path).unwrap();
        assert_eq!(second.len(), 2);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rewrite_within_the_same_timestamp_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(5_000);
        write_csv(&path, &["01/01/2020,A,B,C,D,1,0"]);
        touch(&path, stamp);

        let mut cache = LoadCache::new();
        assert_eq!(cache.get_or_load(&path).unwrap().len(), 1);

        write_csv(&path, &["01/01/2020,A,B,C,D,1,0", "01/02/2020,A,B,C,D,2,0"]);
        touch(&path, stamp);

        assert_eq!(cache.get_or_load(&path).unwrap().len(), 2);
    }

    #[test]
    fn invalidate_forces_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        write_csv(&path, &["01/01/2020,A,B,C,D,1,0"]);

        let mut cache = LoadCache::new();
        let first = cache.get_or_load(&path).unwrap();
        assert!(cache.invalidate(&path));
        assert!(!cache.invalidate(&path));
        assert!(cache.is_empty());

        let second = cache.get_or_load(&path).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(*first, *second);
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.csv");
        fs::write(&path, "Data,Classe\n01/01/2020,A\n").unwrap();

        let mut cache = LoadCache::new();
        assert!(matches!(
            cache.get_or_load(&path),
            Err(DataLoadError::MissingColumn(_))
        ));
        assert!(cache.is_empty());

        assert!(matches!(
            cache.get_or_load(&dir.path().join("absent.csv")),
            Err(DataLoadError::Io { .. })
        ));
    }

    #[test]
    fn clear_drops_everything() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        write_csv(&a, &["01/01/2020,A,B,C,D,1,0"]);
        write_csv(&b, &["01/01/2021,A,B,C,D,1,1"]);

        let mut cache = LoadCache::new();
        cache.get_or_load(&a).unwrap();
        cache.get_or_load(&b).unwrap();
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
