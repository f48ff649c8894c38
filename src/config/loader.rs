// src/config/loader.rs

use std::path::Path;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, Settings};
use crate::errors::{PollrunError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Load a configuration file from disk and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; merging with CLI flags and
/// validation happen in [`resolve_settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    load_from_fs(&RealFileSystem, path.as_ref())
}

/// Same as [`load_from_path`], reading through `fs`.
pub fn load_from_fs(fs: &dyn FileSystem, path: &Path) -> Result<RawConfigFile> {
    if !fs.exists(path) {
        return Err(PollrunError::ConfigError(format!(
            "config file {:?} does not exist",
            path
        )));
    }
    let contents = fs.read_to_string(path)?;
    let config: RawConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Build the final [`Settings`] from CLI arguments, reading `--config` if set.
///
/// This is the recommended entry point for the rest of the application.
pub fn resolve_settings(args: &CliArgs) -> Result<Settings> {
    let file = match &args.config {
        Some(path) => load_from_path(path)?,
        None => RawConfigFile::default(),
    };
    Settings::resolve(args, &file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::{mock_time, MockFileSystem};
    use crate::types::TerminationMode;

    #[test]
    fn reads_config_through_filesystem() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "./pollrun.toml",
            "[run]\ncommands = [\"go run .\"]\ntermination = \"graceful\"\n",
            mock_time(1),
        );

        let cfg = load_from_fs(&fs, Path::new("./pollrun.toml")).unwrap();
        assert_eq!(cfg.run.commands, Some(vec!["go run .".to_string()]));
        assert_eq!(cfg.run.termination, Some(TerminationMode::Graceful));
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let fs = MockFileSystem::new();
        let err = load_from_fs(&fs, Path::new("./nope.toml")).unwrap_err();
        assert!(matches!(err, PollrunError::ConfigError(ref m) if m.contains("does not exist")));
    }

    #[test]
    fn directory_is_not_a_config_file() {
        let fs = MockFileSystem::new();
        fs.add_dir("./conf");
        let err = load_from_fs(&fs, Path::new("./conf")).unwrap_err();
        assert!(matches!(err, PollrunError::Other(_)), "{err:?}");
    }
}
