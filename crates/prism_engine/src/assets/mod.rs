//! Asset loading
//!
//! Thin I/O layer that resolves asset names against a base directory and
//! returns raw bytes. The `archive` parameter names a packed archive the asset
//! should come from; until the archive container format lands, assets are
//! always read from loose files and the tag is ignored.

use std::path::PathBuf;
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// The named asset does not exist or could not be read
    #[error("failed to load asset \"{name}\": {source}")]
    Io {
        /// Name the asset was requested under
        name: String,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Resolves asset names to file contents.
pub struct Assets {
    base_path: PathBuf,
}

impl Assets {
    /// Create an asset loader rooted at `base_path`.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load the raw bytes of the asset `name`.
    ///
    /// `archive` selects a packed archive; `None` (and currently any value)
    /// reads the loose file `<base_path>/<name>`.
    pub fn load_bytes(&self, name: &str, archive: Option<&str>) -> Result<Vec<u8>, AssetError> {
        if let Some(archive) = archive {
            log::trace!("Archive \"{archive}\" requested for \"{name}\"; reading loose file");
        }

        let path = self.base_path.join(name);
        std::fs::read(&path).map_err(|source| AssetError::Io {
            name: name.to_string(),
            source,
        })
    }

    /// The directory asset names are resolved against.
    pub fn base_path(&self) -> &std::path::Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_bytes_reads_file_contents() {
        let dir = std::env::temp_dir();
        let name = format!("prism_asset_test_{}.bin", std::process::id());
        std::fs::write(dir.join(&name), b"\x03\x02\x02\x07").expect("write test asset");

        let assets = Assets::new(&dir);
        let bytes = assets.load_bytes(&name, None).expect("load test asset");
        assert_eq!(bytes, b"\x03\x02\x02\x07");

        let _ = std::fs::remove_file(dir.join(&name));
    }

    #[test]
    fn load_bytes_fails_for_missing_asset() {
        let assets = Assets::new(std::env::temp_dir());
        let result = assets.load_bytes("prism_asset_does_not_exist.spv", Some("core"));
        assert!(result.is_err());
    }
}
