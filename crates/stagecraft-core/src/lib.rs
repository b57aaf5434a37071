//! Stagecraft Core Library
//!
//! Platform-agnostic editing logic for the Stagecraft platformer level
//! editor: gesture recognition, the level document, snapping, history and
//! the editing engine that ties them together. Rendering and the window
//! shell live elsewhere.

pub mod clipboard;
pub mod config;
pub mod editor;
pub mod gesture;
pub mod history;
pub mod input;
pub mod level;
pub mod selection;
pub mod snap;
pub mod storage;
pub mod timer;
pub mod tools;
pub mod viewport;

pub use clipboard::Clipboard;
pub use config::{ConfigError, EditorConfig, GestureConfig};
pub use editor::{Alignment, EditingEngine, EditorCommand, EditorError, HoldAction};
pub use gesture::{GestureEvent, GestureRecognizer};
pub use history::{HistoryError, HistoryManager, JsonCodec, SnapshotCodec};
pub use input::{Modifiers, PointerEvent, PointerId, PointerSample, PointerTracker};
pub use level::{Axis, Background, EntityKind, Level, LevelError, PlatformKind, SelectedElement};
pub use selection::Selection;
pub use snap::{AlignmentEngine, Guide, SnapResult, snap_to_grid, GRID_SIZE};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use timer::{TimerId, TimerQueue};
pub use tools::Tool;
pub use viewport::Viewport;
