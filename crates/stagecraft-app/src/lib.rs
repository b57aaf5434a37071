//! Stagecraft Application
//!
//! Headless shell around the editing engine: replays recorded input
//! scripts against a level and maps key chords onto editor commands.

mod session;
mod shortcuts;

pub use session::{Action, Script, Session, SessionError, Step, Summary};
pub use shortcuts::{KeyChord, Shortcut, ShortcutRegistry};
