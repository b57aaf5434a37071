//! Discrete editor commands from keyboard shortcuts and menus.

use super::{Alignment, EditingEngine, EditorError, is_finite};
use crate::level::{Axis, Background, Entity, EntityKind, MAX_TEMPO, MIN_TEMPO, PlatformKind};
use crate::snap::snap_to_grid;
use crate::tools::Tool;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// A discrete action on the editing engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum EditorCommand {
    Undo,
    Redo,
    Copy,
    Cut,
    Paste,
    Duplicate,
    Delete,
    SelectAll,
    /// Cancel the current interaction and clear the selection.
    Escape,
    /// Move the selection by a world-space offset.
    Nudge { dx: f64, dy: f64 },
    Group,
    Ungroup,
    Align { alignment: Alignment },
    Distribute { axis: Axis },
    SetTool { tool: Tool },
    /// Change the kind of every selected platform.
    SetPlatformKind { kind: PlatformKind },
    SetBackground { background: Background },
    SetTempo { bpm: u32 },
    AdjustTempo { delta: i32 },
    /// Zoom by `factor` about a screen point.
    ZoomAt { point: Point, factor: f64 },
    /// Place an entity with a placement tool at a world position.
    Place { tool: Tool, position: Point },
}

impl EditorCommand {
    /// Whether the command commits a change to the level.
    pub fn edits_level(&self) -> bool {
        !matches!(
            self,
            EditorCommand::Undo
                | EditorCommand::Redo
                | EditorCommand::Copy
                | EditorCommand::SelectAll
                | EditorCommand::Escape
                | EditorCommand::SetTool { .. }
                | EditorCommand::ZoomAt { .. }
        )
    }
}

impl EditingEngine {
    /// Run one command. Returns whether the level, selection or view changed.
    pub fn execute(&mut self, command: EditorCommand) -> Result<bool, EditorError> {
        if command.edits_level() {
            self.settle_for_edit()?;
        }
        self.selection.retain_valid(&self.level);
        log::debug!("Command {:?}", command);
        match command {
            EditorCommand::Undo => self.undo(),
            EditorCommand::Redo => self.redo(),
            EditorCommand::Copy => Ok(self.copy_selection()),
            EditorCommand::Cut => self.cut_selection(),
            EditorCommand::Paste => self.paste(),
            EditorCommand::Duplicate => self.duplicate_selection(),
            EditorCommand::Delete => self.delete_selection(),
            EditorCommand::SelectAll => {
                self.selection.set(self.level.all_elements());
                Ok(!self.selection.is_empty())
            }
            EditorCommand::Escape => {
                let cancelled = self.cancel_interaction()?;
                let had_selection = !self.selection.is_empty();
                self.selection.clear();
                Ok(cancelled || had_selection)
            }
            EditorCommand::Nudge { dx, dy } => {
                self.transact("nudge", |engine| engine.shift_selection(Vec2::new(dx, dy)))
            }
            EditorCommand::Group => self.group_selection(),
            EditorCommand::Ungroup => self.ungroup_selection(),
            EditorCommand::Align { alignment } => self.align(alignment),
            EditorCommand::Distribute { axis } => self.distribute(axis),
            EditorCommand::SetTool { tool } => {
                if tool == self.tool {
                    return Ok(false);
                }
                self.cancel_interaction()?;
                log::debug!("Tool: {}", tool.name());
                self.tool = tool;
                Ok(true)
            }
            EditorCommand::SetPlatformKind { kind } => {
                let indices = self.selection.platform_indices();
                self.transact("set kind", |engine| {
                    let mut changed = false;
                    for index in indices {
                        if let Some(platform) = engine.level.platforms.get_mut(index) {
                            if platform.kind != kind {
                                platform.set_kind(kind);
                                changed = true;
                            }
                        }
                    }
                    changed
                })
            }
            EditorCommand::SetBackground { background } => self.transact("set background", |engine| {
                let changed = engine.level.background != background;
                engine.level.background = background;
                changed
            }),
            EditorCommand::SetTempo { bpm } => self.transact("set tempo", |engine| {
                let before = engine.level.tempo;
                engine.level.set_tempo(bpm);
                engine.level.tempo != before
            }),
            EditorCommand::AdjustTempo { delta } => self.transact("adjust tempo", |engine| {
                let before = engine.level.tempo;
                let target = (i64::from(before) + i64::from(delta))
                    .clamp(i64::from(MIN_TEMPO), i64::from(MAX_TEMPO));
                engine.level.set_tempo(target as u32);
                engine.level.tempo != before
            }),
            EditorCommand::ZoomAt { point, factor } => {
                if !is_finite(point) || !factor.is_finite() || factor <= 0.0 {
                    return Ok(false);
                }
                let before = self.viewport.zoom();
                self.viewport.zoom_at(point, factor);
                Ok(self.viewport.zoom() != before)
            }
            EditorCommand::Place { tool, position } => self.place(tool, position),
        }
    }

    /// Copy the selected platforms and coins. Not an undoable change.
    fn copy_selection(&mut self) -> bool {
        let copied = self.clipboard.copy(&self.level, self.selection.elements());
        log::debug!("Copied {} entities", copied);
        false
    }

    fn cut_selection(&mut self) -> Result<bool, EditorError> {
        if self.clipboard.copy(&self.level, self.selection.elements()) == 0 {
            return Ok(false);
        }
        self.delete_selection()
    }

    /// Remove the selected entities. The player start is never removed.
    fn delete_selection(&mut self) -> Result<bool, EditorError> {
        if self.selection.is_empty() {
            return Ok(false);
        }
        self.transact("delete", |engine| {
            let elements = engine.selection.elements().to_vec();
            let removed = engine.level.remove_elements(&elements);
            engine.selection.clear();
            removed > 0
        })
    }

    /// Clone selected platforms and coins at a fixed offset and select the clones.
    fn duplicate_selection(&mut self) -> Result<bool, EditorError> {
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let copies: Vec<_> = self
            .selection
            .elements()
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Platform | EntityKind::Coin))
            .filter_map(|e| self.level.entity(*e))
            .map(|mut entity| {
                entity.translate(offset);
                entity
            })
            .collect();
        if copies.is_empty() {
            return Ok(false);
        }
        self.insert_and_select("duplicate", copies)
    }

    /// Paste at the pointer (grid-snapped), or offset from the originals
    /// when there is no pointer position.
    fn paste(&mut self) -> Result<bool, EditorError> {
        if self.clipboard.is_empty() {
            return Ok(false);
        }
        let target = self.pointer.map(|p| snap_to_grid(p, self.config.grid_size));
        let offset = Vec2::new(self.config.duplicate_offset, self.config.duplicate_offset);
        let entities = self.clipboard.paste(target, offset);
        self.insert_and_select("paste", entities)
    }

    fn insert_and_select(
        &mut self,
        label: &str,
        entities: Vec<Entity>,
    ) -> Result<bool, EditorError> {
        self.transact(label, |engine| {
            let mut inserted = Vec::with_capacity(entities.len());
            for entity in entities {
                let element = engine.level.insert(entity);
                if let Some(origin) = engine.level.origin(element) {
                    engine.move_element(element, origin);
                }
                inserted.push(element);
            }
            engine.selection.set(inserted);
            true
        })
    }
}
