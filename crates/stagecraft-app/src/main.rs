//! Session runner entry point.
//!
//! `stagecraft <level.json> <script.json> [out.json] [--config <file>]`;
//! `--help` also lists the keyboard shortcuts.
//!
//! Level files are addressed through file storage, so the file stem is the
//! level's storage id. Without an output path the edited level is printed.

use clap::{CommandFactory, FromArgMatches, Parser};
use stagecraft_app::{Script, Session, SessionError, ShortcutRegistry};
use stagecraft_core::{EditorConfig, FileStorage, Level, Storage};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Debug, Clone, PartialEq, Parser)]
#[command(
    name = "stagecraft",
    about = "Replay a recorded input script against a level file",
    version
)]
struct Args {
    /// Level file to edit.
    level: PathBuf,

    /// Session script of timed input steps.
    script: PathBuf,

    /// Where to write the edited level. Printed to stdout when omitted.
    output: Option<PathBuf>,

    /// Editor configuration file (JSON).
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Storage rooted at the file's directory, plus the file's storage id.
fn storage_for(path: &Path) -> Result<(FileStorage, String), SessionError> {
    let id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| SessionError::Usage(format!("not a level file: {}", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((FileStorage::new(dir)?, id.to_string()))
}

fn load_level(path: &Path) -> Result<Level, SessionError> {
    let (storage, id) = storage_for(path)?;
    Ok(pollster::block_on(storage.load(&id))?)
}

fn save_level(path: &Path, level: &Level) -> Result<(), SessionError> {
    let (storage, id) = storage_for(path)?;
    pollster::block_on(storage.save(&id, level))?;
    Ok(())
}

/// Load, replay and write out. Returns the edited level.
fn run(args: &Args) -> Result<Level, SessionError> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let level = load_level(&args.level)?;
    let script = Script::load(&args.script)?;

    let mut session = Session::new(level, config)?;
    session.run(&script)?;
    let level = session.into_level();

    match &args.output {
        Some(path) => save_level(path, &level)?,
        None => {
            let json = level
                .to_json()
                .map_err(|e| SessionError::Usage(format!("cannot print level: {}", e)))?;
            println!("{}", json);
        }
    }
    Ok(level)
}

fn main() -> ExitCode {
    env_logger::init();

    let matches = Args::command()
        .after_long_help(ShortcutRegistry::help_text())
        .get_matches();
    let args = match Args::from_arg_matches(&matches) {
        Ok(args) => args,
        Err(e) => e.exit(),
    };

    log::info!("Starting Stagecraft session for {}", args.level.display());
    match run(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Session failed: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from([
            "stagecraft",
            "level.json",
            "--config",
            "c.json",
            "s.json",
            "out.json",
        ])
        .unwrap();
        assert_eq!(args.level, PathBuf::from("level.json"));
        assert_eq!(args.script, PathBuf::from("s.json"));
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        assert_eq!(args.config, Some(PathBuf::from("c.json")));

        let args = Args::try_parse_from(["stagecraft", "level.json", "s.json"]).unwrap();
        assert_eq!(args.output, None);
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_parse_args_rejects_bad_usage() {
        use clap::error::ErrorKind;

        let kind = |argv: &[&str]| Args::try_parse_from(argv).unwrap_err().kind();
        assert_eq!(kind(&["stagecraft", "--help"]), ErrorKind::DisplayHelp);
        assert_eq!(
            kind(&["stagecraft", "level.json"]),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            kind(&["stagecraft", "a", "b", "--config"]),
            ErrorKind::InvalidValue
        );
        assert_eq!(
            kind(&["stagecraft", "a", "b", "--verbose"]),
            ErrorKind::UnknownArgument
        );
        assert_eq!(
            kind(&["stagecraft", "a", "b", "c", "d"]),
            ErrorKind::UnknownArgument
        );
    }

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_run_writes_output() {
        let dir = tempdir().unwrap();
        let level_path = dir.path().join("meadow.json");
        let script_path = dir.path().join("script.json");
        let out_path = dir.path().join("meadow-edited.json");
        let config_path = dir.path().join("config.json");

        fs::write(&level_path, Level::new("Meadow").to_json().unwrap()).unwrap();
        fs::write(
            &script_path,
            r#"{"steps": [
                {"t_ms": 0, "action": "key", "key": "c"},
                {"t_ms": 10, "action": "down", "x": 103, "y": 97},
                {"t_ms": 40, "action": "up", "x": 103, "y": 97},
                {"t_ms": 50, "action": "key", "key": "=", "modifiers": {}}
            ]}"#,
        )
        .unwrap();
        fs::write(&config_path, r#"{"grid_size": 50}"#).unwrap();

        let args = Args {
            level: level_path,
            script: script_path,
            output: Some(out_path.clone()),
            config: Some(config_path),
        };
        let level = run(&args).unwrap();
        assert_eq!(level.coins.len(), 1);
        assert_eq!(level.coins[0].center(), kurbo::Point::new(100.0, 100.0));
        assert_eq!(level.tempo, 121);

        let written = Level::from_json(&fs::read_to_string(out_path).unwrap()).unwrap();
        assert_eq!(written, level);
    }

    #[test]
    fn test_run_missing_level() {
        let dir = tempdir().unwrap();
        let args = Args {
            level: dir.path().join("absent.json"),
            script: dir.path().join("script.json"),
            output: None,
            config: None,
        };
        assert!(matches!(run(&args), Err(SessionError::Storage(_))));
    }
}
