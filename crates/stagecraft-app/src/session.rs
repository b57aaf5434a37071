//! Headless editing sessions driven by recorded input scripts.
//!
//! A script is a JSON list of timestamped steps. Raw pointer steps go
//! through the gesture recognizer exactly as live input would; key steps
//! go through the shortcut registry; command and hold steps drive the
//! engine directly. Time only moves forward.

use crate::shortcuts::{KeyChord, ShortcutRegistry};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use stagecraft_core::{
    ConfigError, EditingEngine, EditorCommand, EditorConfig, EditorError, GestureEvent,
    GestureRecognizer, HoldAction, Level, PointerEvent, PointerId, StorageError,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors from loading or replaying a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Step {index} at {t_ms}ms goes back in time")]
    OutOfOrder { index: usize, t_ms: u64 },
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Usage(String),
}

fn default_pointer() -> u32 {
    PointerId::MOUSE.0
}

/// What a script step does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Down {
        #[serde(default = "default_pointer")]
        pointer: u32,
        x: f64,
        y: f64,
    },
    Move {
        #[serde(default = "default_pointer")]
        pointer: u32,
        x: f64,
        y: f64,
    },
    Up {
        #[serde(default = "default_pointer")]
        pointer: u32,
        x: f64,
        y: f64,
    },
    Cancel {
        #[serde(default = "default_pointer")]
        pointer: u32,
    },
    /// Mouse hover, which sets the paste target.
    Hover { x: f64, y: f64 },
    /// Pointer left the canvas.
    Leave,
    /// Let time pass (fires long-press and hold-repeat timers).
    Tick,
    Key(KeyChord),
    Command { command: EditorCommand },
    HoldStart { hold: HoldAction },
    HoldEnd,
}

/// One timestamped script step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub t_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

/// A recorded input script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Script {
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

/// Counters reported after a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub steps: usize,
    pub gestures: usize,
    pub commands: usize,
    /// Steps that changed the level, selection or view.
    pub changes: usize,
}

/// An editing engine fed by a gesture recognizer on a simulated clock.
pub struct Session {
    engine: EditingEngine,
    recognizer: GestureRecognizer,
    now: Duration,
    summary: Summary,
}

impl Session {
    pub fn new(level: Level, config: EditorConfig) -> Result<Self, SessionError> {
        let recognizer = GestureRecognizer::new(config.gesture.clone());
        let engine = EditingEngine::new(level, config)?;
        Ok(Self {
            engine,
            recognizer,
            now: Duration::ZERO,
            summary: Summary::default(),
        })
    }

    pub fn engine(&self) -> &EditingEngine {
        &self.engine
    }

    pub fn level(&self) -> &Level {
        self.engine.level()
    }

    pub fn into_level(self) -> Level {
        self.engine.level().clone()
    }

    /// Replay every step of `script`, then release any control still held.
    pub fn run(&mut self, script: &Script) -> Result<Summary, SessionError> {
        for (index, step) in script.steps.iter().enumerate() {
            self.step(index, step)?;
        }
        self.finish()?;
        log::info!(
            "Replayed {} step(s): {} gesture(s), {} command(s), {} change(s)",
            self.summary.steps,
            self.summary.gestures,
            self.summary.commands,
            self.summary.changes
        );
        Ok(self.summary)
    }

    /// Apply one step at its timestamp.
    pub fn step(&mut self, index: usize, step: &Step) -> Result<(), SessionError> {
        let now = Duration::from_millis(step.t_ms);
        if now < self.now {
            return Err(SessionError::OutOfOrder {
                index,
                t_ms: step.t_ms,
            });
        }
        self.now = now;
        self.summary.steps += 1;

        // Timers due before this step fire first
        let gestures = self.recognizer.tick(now);
        self.dispatch(gestures)?;
        if self.engine.tick(now) {
            self.summary.changes += 1;
        }

        match &step.action {
            Action::Down { pointer, x, y } => self.pointer(PointerEvent::Down {
                id: PointerId(*pointer),
                position: Point::new(*x, *y),
                time: now,
            }),
            Action::Move { pointer, x, y } => self.pointer(PointerEvent::Move {
                id: PointerId(*pointer),
                position: Point::new(*x, *y),
                time: now,
            }),
            Action::Up { pointer, x, y } => self.pointer(PointerEvent::Up {
                id: PointerId(*pointer),
                position: Point::new(*x, *y),
                time: now,
            }),
            Action::Cancel { pointer } => self.pointer(PointerEvent::Cancel {
                id: PointerId(*pointer),
                time: now,
            }),
            Action::Hover { x, y } => {
                self.engine.set_pointer(Some(Point::new(*x, *y)));
                Ok(())
            }
            Action::Leave => {
                self.engine.set_pointer(None);
                Ok(())
            }
            Action::Tick => Ok(()),
            Action::Key(chord) => match ShortcutRegistry::lookup(chord) {
                Some(command) => self.command(command),
                None => {
                    log::warn!("No shortcut bound to {:?}", chord);
                    Ok(())
                }
            },
            Action::Command { command } => self.command(*command),
            Action::HoldStart { hold } => {
                let changed = self.engine.begin_hold(*hold, now)?;
                self.count(changed);
                Ok(())
            }
            Action::HoldEnd => {
                self.engine.end_hold(now)?;
                Ok(())
            }
        }
    }

    /// Release a control still held when the script ends.
    fn finish(&mut self) -> Result<(), SessionError> {
        if self.engine.is_holding() {
            log::debug!("Releasing hold at end of script");
            self.engine.end_hold(self.now)?;
        }
        Ok(())
    }

    fn pointer(&mut self, event: PointerEvent) -> Result<(), SessionError> {
        let gestures = self.recognizer.process(&event);
        self.dispatch(gestures)
    }

    fn dispatch(&mut self, gestures: Vec<GestureEvent>) -> Result<(), SessionError> {
        for gesture in gestures {
            log::debug!("Gesture {:?}", gesture);
            self.summary.gestures += 1;
            let changed = self.engine.handle_gesture(&gesture)?;
            self.count(changed);
        }
        Ok(())
    }

    fn command(&mut self, command: EditorCommand) -> Result<(), SessionError> {
        self.summary.commands += 1;
        let changed = self.engine.execute(command)?;
        self.count(changed);
        Ok(())
    }

    fn count(&mut self, changed: bool) {
        if changed {
            self.summary.changes += 1;
        }
    }
}
