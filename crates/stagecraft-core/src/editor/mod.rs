//! The editing engine: owns a level and everything needed to edit it.
//!
//! [`EditingEngine`] consumes semantic gestures ([`EditingEngine::handle_gesture`]),
//! discrete commands ([`EditingEngine::execute`]) and hold-to-repeat controls,
//! and is the only thing that mutates its [`Level`]. Every mutating
//! operation commits exactly one history snapshot once it is fully applied.
//! Drags mutate the live level frame by frame and commit on release.

mod arrange;
mod command;
mod hold;
mod interaction;


pub use arrange::{Alignment, align_platforms, distribute_platforms};
pub use command::EditorCommand;
pub use hold::HoldAction;

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::history::{HistoryError, HistoryManager};
use crate::level::{Coin, Entity, Goal, Level, LevelError, Placeable, Platform, PlayerStart, SelectedElement};
use crate::selection::Selection;
use crate::snap::{AlignmentEngine, Guide, snap_to_grid};
use crate::tools::Tool;
use crate::viewport::Viewport;
use hold::HoldState;
use interaction::Interaction;
use kurbo::{Point, Rect, Vec2};
use thiserror::Error;

/// Errors surfaced by the editing engine. The level is left as it was
/// before the failing operation.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    History(#[from] HistoryError),
    #[error("Invalid level: {0}")]
    Level(#[from] LevelError),
}

fn is_finite(point: Point) -> bool {
    point.x.is_finite() && point.y.is_finite()
}

/// Editing session for one level.
#[derive(Debug, Clone)]
pub struct EditingEngine {
    config: EditorConfig,
    level: Level,
    selection: Selection,
    alignment: AlignmentEngine,
    history: HistoryManager,
    clipboard: Clipboard,
    viewport: Viewport,
    tool: Tool,
    interaction: Interaction,
    hold: HoldState,
    /// Last known pointer position in world space.
    pointer: Option<Point>,
}

impl EditingEngine {
    /// Start editing `level`, which becomes the bottom of the undo history.
    pub fn new(level: Level, config: EditorConfig) -> Result<Self, EditorError> {
        level.validate()?;
        let mut history = HistoryManager::new(config.history_capacity);
        history.reset(&level)?;
        log::info!(
            "Editing level '{}' ({} platforms, {} coins)",
            level.name,
            level.platforms.len(),
            level.coins.len()
        );
        Ok(Self {
            alignment: AlignmentEngine::new(config.grid_size, config.snap_threshold),
            viewport: Viewport::with_zoom_limits(config.min_zoom, config.max_zoom),
            config,
            level,
            selection: Selection::new(),
            history,
            clipboard: Clipboard::new(),
            tool: Tool::default(),
            interaction: Interaction::Idle,
            hold: HoldState::default(),
            pointer: None,
        })
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Alignment guides to draw for the current drag.
    pub fn guides(&self) -> &[Guide] {
        self.alignment.guides()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// World rectangle of an in-progress box selection.
    pub fn box_select_rect(&self) -> Option<Rect> {
        self.interaction.box_select().map(|b| b.rect())
    }

    /// Whether a drag, resize or box-select is in progress.
    pub fn is_interacting(&self) -> bool {
        !matches!(self.interaction, Interaction::Idle)
    }

    /// Update the hover position (screen space) used as the paste target.
    pub fn set_pointer(&mut self, screen: Option<Point>) {
        self.pointer = screen
            .map(|p| self.viewport.screen_to_world(p))
            .filter(|p| is_finite(*p));
    }

    /// Record the current level as a history state.
    fn commit(&mut self, label: &str) -> Result<(), EditorError> {
        self.level.validate()?;
        self.history.commit(&self.level)?;
        log::debug!("Committed '{}'", label);
        Ok(())
    }

    /// Apply a mutation as one undoable step. `apply` reports whether it
    /// changed anything; if not, or if committing fails, the level and
    /// selection are put back as they were.
    fn transact(
        &mut self,
        label: &str,
        apply: impl FnOnce(&mut Self) -> bool,
    ) -> Result<bool, EditorError> {
        let level_before = self.level.clone();
        let selection_before = self.selection.clone();
        if !apply(self) {
            self.level = level_before;
            self.selection = selection_before;
            return Ok(false);
        }
        if let Err(e) = self.commit(label) {
            log::warn!("Rolled back '{}': {}", label, e);
            self.level = level_before;
            self.selection = selection_before;
            return Err(e);
        }
        Ok(true)
    }

    /// Commit an active hold and cancel a drag or resize in progress, so
    /// an edit starts from a committed level with fresh indices.
    fn settle_for_edit(&mut self) -> Result<(), EditorError> {
        self.settle_hold()?;
        if self.interaction.edits_level() {
            self.cancel_interaction()?;
        }
        Ok(())
    }

    /// Put the live level back to the latest committed state.
    fn restore_committed(&mut self) -> Result<(), EditorError> {
        if let Some(level) = self.history.current()? {
            self.level = level;
        }
        self.selection.retain_valid(&self.level);
        Ok(())
    }

    /// Move an element to `origin`, clamped to the level's vertical bounds.
    fn move_element(&mut self, element: SelectedElement, origin: Point) -> bool {
        if !is_finite(origin) {
            return false;
        }
        let clamped = self.level.clamp_origin(element, origin);
        match self.level.origin(element) {
            Some(current) if current != clamped => self.level.set_origin(element, clamped),
            _ => false,
        }
    }

    /// Shift every selected element by the same offset.
    fn shift_selection(&mut self, offset: Vec2) -> bool {
        let mut changed = false;
        for element in self.selection.elements().to_vec() {
            if let Some(origin) = self.level.origin(element) {
                changed |= self.move_element(element, origin + offset);
            }
        }
        changed
    }

    /// Place a new entity with a placement tool at a world position.
    pub fn place(&mut self, tool: Tool, world: Point) -> Result<bool, EditorError> {
        if !is_finite(world) {
            log::warn!("Ignoring placement at non-finite position");
            return Ok(false);
        }
        if matches!(tool, Tool::Select | Tool::Pan) {
            return Ok(false);
        }
        self.settle_for_edit()?;
        let at = snap_to_grid(world, self.config.grid_size);
        let entity = match tool {
            Tool::Platform(kind) => Entity::Platform(Platform::new(
                at,
                self.config.platform_width,
                self.config.platform_height,
                kind,
            )),
            Tool::Coin => Entity::Coin(Coin::new(at)),
            Tool::PlayerStart => Entity::PlayerStart(PlayerStart::new(at)),
            Tool::Goal => {
                let mut goal = self.level.goal.unwrap_or_else(|| Goal::new(at));
                goal.set_origin(at);
                Entity::Goal(goal)
            }
            Tool::Select | Tool::Pan => return Ok(false),
        };
        self.transact("place", |engine| {
            let element = engine.level.insert(entity);
            if let Some(origin) = engine.level.origin(element) {
                engine.move_element(element, origin);
            }
            engine.selection.select(element);
            true
        })
    }

    /// Step back in history. Clears the selection.
    pub fn undo(&mut self) -> Result<bool, EditorError> {
        self.cancel_interaction()?;
        match self.history.undo()? {
            Some(level) => {
                self.level = level;
                self.selection.clear();
                log::debug!("Undo ({} state(s) left)", self.history.undo_len());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Step forward in history. Clears the selection.
    pub fn redo(&mut self) -> Result<bool, EditorError> {
        self.cancel_interaction()?;
        match self.history.redo()? {
            Some(level) => {
                self.level = level;
                self.selection.clear();
                log::debug!("Redo ({} state(s) left)", self.history.redo_len());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
