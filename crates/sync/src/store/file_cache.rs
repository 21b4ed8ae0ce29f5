use std::path::{Path, PathBuf};

use super::{CacheStore, StoreError};

/// File-per-key cache under a single directory: the on-device counterpart
/// of the browser's local storage mirror.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileCache { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are fixed constants today, but keep filenames safe anyway.
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.json"))
    }
}

impl CacheStore for FileCache {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        write_replace(&path, value)?;
        Ok(())
    }
}

/// Write through a sibling temp file and rename, so a crash mid-write
/// leaves the previous value readable instead of a truncated file.
fn write_replace(path: &Path, value: &str) -> std::io::Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, value)?;
    std::fs::rename(&tmp, path)
}
