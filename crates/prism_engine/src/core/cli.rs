//! Command-line argument handling
//!
//! Flags are matched case-insensitively and tolerate `-`, `--` and `/`
//! prefixes, so `--vulkan`, `-Vulkan` and `/VULKAN` all name the same flag.
//! Value arguments use the `name=value` form.

/// The process arguments, minus the executable name.
#[derive(Debug, Clone, Default)]
pub struct CommandLineArgs {
    args: Vec<String>,
}

impl CommandLineArgs {
    /// Capture arguments from an iterator (usually `std::env::args()`).
    ///
    /// The first element is treated as the executable path and skipped.
    pub fn new(args: impl IntoIterator<Item = String>) -> Self {
        Self {
            args: args.into_iter().skip(1).collect(),
        }
    }

    /// Whether the flag `name` was passed.
    pub fn check(&self, name: &str) -> bool {
        self.args.iter().any(|arg| {
            let trimmed = trim_prefix(arg);
            let key = trimmed.split('=').next().unwrap_or(trimmed);
            key.eq_ignore_ascii_case(name)
        })
    }

    /// The value of a `name=value` argument, when present.
    pub fn get(&self, name: &str) -> Option<String> {
        self.args.iter().find_map(|arg| {
            let trimmed = trim_prefix(arg);
            let (key, value) = trimmed.split_once('=')?;
            key.eq_ignore_ascii_case(name)
                .then(|| value.to_string())
        })
    }

    /// Iterator over the raw arguments, for startup logging.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(String::as_str)
    }

    /// Whether any arguments were passed at all.
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }
}

fn trim_prefix(arg: &str) -> &str {
    arg.trim_start_matches(['-', '/'])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> CommandLineArgs {
        CommandLineArgs::new(
            std::iter::once("app".to_string()).chain(list.iter().map(|s| (*s).to_string())),
        )
    }

    #[test]
    fn check_accepts_any_prefix_and_case() {
        let args = args(&["--vulkan", "-Log=debug", "/FULLSCREEN"]);
        assert!(args.check("vulkan"));
        assert!(args.check("VULKAN"));
        assert!(args.check("fullscreen"));
        assert!(args.check("log"));
        assert!(!args.check("opengl"));
    }

    #[test]
    fn get_returns_value_part() {
        let args = args(&["--log=debug", "-width=1280"]);
        assert_eq!(args.get("log").as_deref(), Some("debug"));
        assert_eq!(args.get("WIDTH").as_deref(), Some("1280"));
        assert_eq!(args.get("height"), None);
    }

    #[test]
    fn executable_name_is_skipped() {
        let args = CommandLineArgs::new(["--vulkan".to_string()]);
        assert!(args.is_empty());
        assert!(!args.check("vulkan"));
    }
}
