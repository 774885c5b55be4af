//! Persistent key-value configuration store
//!
//! Settings that must survive across runs (previously selected render backend,
//! previously selected physical device, tuning flags) live in a flat text file
//! of newline-separated `key=value` pairs. The whole file is read once at
//! startup and rewritten in full at shutdown, but only when something changed.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Key-value configuration backed by a `key=value` text file.
///
/// The first `=` in a line is the delimiter; lines without one, or with an
/// empty key or value, are ignored on read. Keys and values containing `=` or
/// newlines are unsupported by the format.
pub struct Config {
    path: PathBuf,
    data: BTreeMap<String, String>,
    modified: bool,
}

impl Config {
    /// Load the configuration from `path`.
    ///
    /// A missing file is not an error; it simply yields an empty store that
    /// will be created on the first save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut data = BTreeMap::new();

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for line in contents.lines() {
                    if let Some((key, value)) = parse_line(line) {
                        data.insert(key.to_string(), value.to_string());
                    }
                }
                log::debug!("Loaded {} config entries from {}", data.len(), path.display());
            }
            Err(err) => {
                log::debug!("No config file at {} ({err})", path.display());
            }
        }

        Self {
            path,
            data,
            modified: false,
        }
    }

    /// Get the value for `key`, falling back to `default` when absent.
    pub fn get(&self, key: &str, default: &str) -> String {
        self.data.get(key).cloned().unwrap_or_else(|| default.to_string())
    }

    /// Get the value for `key` parsed as `T`, falling back to `default` when
    /// absent or unparsable.
    pub fn get_parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        self.data
            .get(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Set `key` to `value`, marking the store dirty only on actual change.
    pub fn set(&mut self, key: &str, value: &str) {
        if self.data.get(key).map(String::as_str) != Some(value) {
            self.data.insert(key.to_string(), value.to_string());
            self.modified = true;
        }
    }

    /// Whether any entry changed since load or the last save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Rewrite the backing file if anything changed since the last save.
    ///
    /// Entries are written sorted by key so the file stays stable across runs.
    pub fn save(&mut self) -> std::io::Result<()> {
        if !self.modified {
            return Ok(());
        }

        let mut contents = String::new();
        for (key, value) in &self.data {
            let _ = writeln!(contents, "{key}={value}");
        }
        std::fs::write(&self.path, contents)?;
        self.modified = false;
        log::debug!("Saved {} config entries to {}", self.data.len(), self.path.display());
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Split one line of the config file into a `(key, value)` pair.
///
/// Returns `None` for lines the reader ignores: no `=`, empty key, or empty
/// value.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("prism_config_test_{tag}_{}.cfg", std::process::id()))
    }

    #[test]
    fn parse_line_splits_at_first_equals() {
        assert_eq!(parse_line("key=value"), Some(("key", "value")));
        assert_eq!(parse_line("key=a=b"), Some(("key", "a=b")));
    }

    #[test]
    fn parse_line_ignores_malformed_lines() {
        assert_eq!(parse_line("no delimiter"), None);
        assert_eq!(parse_line("=value"), None);
        assert_eq!(parse_line("key="), None);
        assert_eq!(parse_line(""), None);
    }

    #[test]
    fn get_returns_default_for_missing_key() {
        let config = Config::load(temp_config_path("missing"));
        assert_eq!(config.get("Absent", "fallback"), "fallback");
    }

    #[test]
    fn set_marks_modified_only_on_change() {
        let mut config = Config::load(temp_config_path("dirty"));
        assert!(!config.is_modified());

        config.set("RendererAPI", "Vulkan");
        assert!(config.is_modified());

        // Saving clears the flag; re-setting the same value must not set it.
        config.save().expect("save config");
        assert!(!config.is_modified());
        config.set("RendererAPI", "Vulkan");
        assert!(!config.is_modified());

        let _ = std::fs::remove_file(config.path());
    }

    #[test]
    fn round_trip_preserves_entries() {
        let path = temp_config_path("roundtrip");
        let mut config = Config::load(&path);
        config.set("PhysicalDeviceName", "Test GPU");
        config.set("PhysicalDeviceId", "4660");
        config.set("RendererAPI", "Vulkan");
        config.save().expect("save config");

        let reloaded = Config::load(&path);
        assert_eq!(reloaded.get("PhysicalDeviceName", ""), "Test GPU");
        assert_eq!(reloaded.get("PhysicalDeviceId", ""), "4660");
        assert_eq!(reloaded.get("RendererAPI", ""), "Vulkan");
        assert_eq!(reloaded.get_parsed::<u32>("PhysicalDeviceId", 0), 4660);

        let _ = std::fs::remove_file(&path);
    }
}
