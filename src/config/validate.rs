// src/config/validate.rs

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::model::{RawConfigFile, Settings};
use crate::config::shorthand::expand_commands;
use crate::errors::{PollrunError, Result};
use crate::types::TerminationMode;
use crate::watch::rules::{
    default_extensions, normalize_extensions, parse_extensions, split_patterns,
    DEFAULT_SKIP_PATTERNS,
};

/// Scan interval used when neither the CLI nor the config file set one.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

impl Settings {
    /// Merge CLI flags over config file values over built-in defaults, then
    /// validate the result.
    pub fn resolve(args: &CliArgs, file: &RawConfigFile) -> Result<Self> {
        let watch = &file.watch;
        let run = &file.run;

        let extensions = match (&args.exts, &watch.exts) {
            (Some(list), _) => parse_extensions(list),
            (None, Some(list)) if watch.append_default_exts => {
                let mut exts = default_extensions();
                exts.extend(normalize_extensions(list));
                exts
            }
            (None, Some(list)) => normalize_extensions(list),
            (None, None) => default_extensions(),
        };

        let watch_patterns = match (&args.patterns, &watch.patterns) {
            (Some(s), _) => split_patterns(s),
            (None, Some(list)) => list.clone(),
            (None, None) => Vec::new(),
        };

        let skip_patterns = match (&args.skip_patterns, &watch.skip_patterns) {
            (Some(s), _) => split_patterns(s),
            (None, Some(list)) => list.clone(),
            (None, None) => split_patterns(DEFAULT_SKIP_PATTERNS),
        };

        let interval = match (args.interval, &watch.interval) {
            (Some(d), _) => d,
            (None, Some(s)) => humantime::parse_duration(s.trim()).map_err(|e| {
                PollrunError::ConfigError(format!("[watch].interval {s:?} is invalid: {e}"))
            })?,
            (None, None) => DEFAULT_INTERVAL,
        };

        let raw_commands: Vec<String> = if !args.commands.is_empty() {
            args.commands.clone()
        } else {
            run.commands.clone().unwrap_or_default()
        };

        let termination = match run.termination {
            Some(mode) if !args.sigterm => mode,
            _ => TerminationMode::from_graceful(args.sigterm),
        };

        let settings = Settings {
            root: args
                .root
                .clone()
                .or_else(|| watch.root.clone())
                .unwrap_or_else(|| PathBuf::from(".")),
            extensions,
            watch_patterns,
            skip_patterns,
            skip_dot_dirs: args.skip_dot_dirs.or(watch.skip_dot_dirs).unwrap_or(true),
            skip_dot_files: args.skip_dot_files.or(watch.skip_dot_files).unwrap_or(false),
            interval,
            verbose: args.verbose || run.verbose.unwrap_or(false),
            clear: args.clear || run.clear.unwrap_or(false),
            clear_cmd: args
                .clear_cmd
                .clone()
                .or_else(|| run.clear_cmd.clone())
                .filter(|c| !c.trim().is_empty()),
            termination,
            commands: expand_commands(raw_commands),
        };

        validate_settings(&settings)?;
        Ok(settings)
    }
}

fn validate_settings(settings: &Settings) -> Result<()> {
    ensure_has_commands(settings)?;
    ensure_positive_interval(settings)?;
    Ok(())
}

fn ensure_has_commands(settings: &Settings) -> Result<()> {
    if settings.commands.is_empty() {
        return Err(PollrunError::ConfigError(
            "no commands given; pass at least one COMMAND or set [run].commands".to_string(),
        ));
    }
    if let Some(idx) = settings.commands.iter().position(|c| c.trim().is_empty()) {
        return Err(PollrunError::ConfigError(format!(
            "command #{} is empty",
            idx + 1
        )));
    }
    Ok(())
}

fn ensure_positive_interval(settings: &Settings) -> Result<()> {
    if settings.interval.is_zero() {
        return Err(PollrunError::ConfigError(
            "interval must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::model::{RunSection, WatchSection};

    fn args_with(commands: &[&str]) -> CliArgs {
        CliArgs {
            commands: commands.iter().map(|s| s.to_string()).collect(),
            ..CliArgs::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::resolve(&args_with(&["go test"]), &RawConfigFile::default()).unwrap();

        assert_eq!(s.root, PathBuf::from("."));
        assert_eq!(s.extensions, default_extensions());
        assert_eq!(s.skip_patterns, vec!["node_modules/*"]);
        assert!(s.watch_patterns.is_empty());
        assert!(s.skip_dot_dirs);
        assert!(!s.skip_dot_files);
        assert_eq!(s.interval, DEFAULT_INTERVAL);
        assert_eq!(s.termination, TerminationMode::Kill);
    }

    #[test]
    fn cli_overrides_file() {
        let file = RawConfigFile {
            watch: WatchSection {
                skip_dot_files: Some(false),
                interval: Some("5s".to_string()),
                exts: Some(vec!["py".to_string()]),
                ..WatchSection::default()
            },
            run: RunSection {
                commands: Some(vec!["from-file".to_string()]),
                ..RunSection::default()
            },
        };
        let args = CliArgs {
            skip_dot_files: Some(true),
            interval: Some(Duration::from_millis(250)),
            sigterm: true,
            ..args_with(&["from-cli"])
        };

        let s = Settings::resolve(&args, &file).unwrap();
        assert!(s.skip_dot_files);
        assert_eq!(s.interval, Duration::from_millis(250));
        assert_eq!(s.commands, vec!["from-cli"]);
        assert_eq!(s.termination, TerminationMode::Graceful);
        assert_eq!(s.extensions.iter().collect::<Vec<_>>(), vec![".py"]);
    }

    #[test]
    fn termination_mode_from_file_yields_to_sigterm_flag() {
        let file = RawConfigFile {
            run: RunSection {
                termination: Some(TerminationMode::Kill),
                ..RunSection::default()
            },
            ..RawConfigFile::default()
        };

        let plain = Settings::resolve(&args_with(&["x"]), &file).unwrap();
        assert_eq!(plain.termination, TerminationMode::Kill);

        let args = CliArgs {
            sigterm: true,
            ..args_with(&["x"])
        };
        let flagged = Settings::resolve(&args, &file).unwrap();
        assert_eq!(flagged.termination, TerminationMode::Graceful);
    }

    #[test]
    fn file_extensions_can_append_to_defaults() {
        let file = RawConfigFile {
            watch: WatchSection {
                exts: Some(vec!["mjs".to_string()]),
                append_default_exts: true,
                ..WatchSection::default()
            },
            ..RawConfigFile::default()
        };

        let s = Settings::resolve(&args_with(&["x"]), &file).unwrap();
        assert!(s.extensions.contains(".mjs"));
        assert!(s.extensions.contains(".go"));
    }

    #[test]
    fn make_shorthand_is_expanded() {
        let s = Settings::resolve(&args_with(&["make:a,b", "./run"]), &RawConfigFile::default())
            .unwrap();
        assert_eq!(s.commands, vec!["make a", "make b", "./run"]);
    }

    #[test]
    fn missing_commands_is_config_error() {
        let err = Settings::resolve(&CliArgs::default(), &RawConfigFile::default()).unwrap_err();
        assert!(matches!(err, PollrunError::ConfigError(msg) if msg.contains("no commands")));
    }

    #[test]
    fn blank_command_is_rejected() {
        let err = Settings::resolve(&args_with(&["ls", "  "]), &RawConfigFile::default())
            .unwrap_err();
        assert!(matches!(err, PollrunError::ConfigError(msg) if msg.contains("#2")));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let args = CliArgs {
            interval: Some(Duration::ZERO),
            ..args_with(&["ls"])
        };
        assert!(Settings::resolve(&args, &RawConfigFile::default()).is_err());
    }

    #[test]
    fn bad_file_interval_is_reported() {
        let file = RawConfigFile {
            watch: WatchSection {
                interval: Some("often".to_string()),
                ..WatchSection::default()
            },
            ..RawConfigFile::default()
        };
        let err = Settings::resolve(&args_with(&["ls"]), &file).unwrap_err();
        assert!(matches!(err, PollrunError::ConfigError(msg) if msg.contains("interval")));
    }
}
