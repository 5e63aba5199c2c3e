//! One file per key under the platform data directory.

use super::DraftStore;
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Disk-backed store. Each key maps to `<dir>/<sanitized key>.json`;
/// writes are synchronous since there is only ever one writer per form.
pub struct DiskStore {
    dir: PathBuf,
}

impl DiskStore {
    /// Opens the store in the per-user data directory.
    pub fn open() -> std::io::Result<Self> {
        let proj_dirs = ProjectDirs::from("com", "wenzhen", "wenzhen").ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory")
        })?;
        Self::open_at(proj_dirs.data_dir().to_path_buf())
    }

    /// Opens the store rooted at an explicit directory.
    pub fn open_at(dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_filename(key)))
    }
}

impl DraftStore for DiskStore {
    fn load(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Some(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(key, error = %e, "treating unreadable entry as absent");
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) {
        if let Err(e) = fs::write(self.path_for(key), value) {
            warn!(key, error = %e, "failed to persist entry");
        }
    }

    fn remove(&self, key: &str) {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(key, error = %e, "failed to remove entry"),
        }
    }
}

fn sanitize_filename(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}
