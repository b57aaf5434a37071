//! Keyboard shortcut registry: key chords mapped onto editor commands.

use serde::{Deserialize, Serialize};
use stagecraft_core::{Alignment, Axis, EditorCommand, Modifiers, PlatformKind, Tool};

/// A key press with its modifier state, as recorded in session scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: String,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyChord {
    pub fn new(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            key: key.into(),
            modifiers,
        }
    }

    /// Ctrl on most platforms, Cmd on macOS.
    fn command_key(&self) -> bool {
        self.modifiers.ctrl || self.modifiers.meta
    }
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: &'static str,
    pub ctrl: bool,
    pub shift: bool,
    pub description: &'static str,
    pub command: EditorCommand,
}

impl Shortcut {
    pub const fn new(
        key: &'static str,
        ctrl: bool,
        shift: bool,
        description: &'static str,
        command: EditorCommand,
    ) -> Self {
        Self {
            key,
            ctrl,
            shift,
            description,
            command,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+Shift+Z").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key);
        parts.join("+")
    }

    /// Keys compare case-insensitively; Alt is never bound.
    pub fn matches(&self, chord: &KeyChord) -> bool {
        self.key.eq_ignore_ascii_case(&chord.key)
            && self.ctrl == chord.command_key()
            && self.shift == chord.modifiers.shift
            && !chord.modifiers.alt
    }
}

const NUDGE: f64 = 1.0;
const NUDGE_LARGE: f64 = 10.0;

const fn nudge(dx: f64, dy: f64) -> EditorCommand {
    EditorCommand::Nudge { dx, dy }
}

const fn tool(tool: Tool) -> EditorCommand {
    EditorCommand::SetTool { tool }
}

const fn align(alignment: Alignment) -> EditorCommand {
    EditorCommand::Align { alignment }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        use EditorCommand as C;
        vec![
            Shortcut::new("A", true, false, "Select all", C::SelectAll),
            Shortcut::new("Z", true, false, "Undo", C::Undo),
            Shortcut::new("Z", true, true, "Redo", C::Redo),
            Shortcut::new("Y", true, false, "Redo", C::Redo),
            Shortcut::new("C", true, false, "Copy", C::Copy),
            Shortcut::new("X", true, false, "Cut", C::Cut),
            Shortcut::new("V", true, false, "Paste at pointer", C::Paste),
            Shortcut::new("D", true, false, "Duplicate", C::Duplicate),
            Shortcut::new("G", true, false, "Group selected platforms", C::Group),
            Shortcut::new("G", true, true, "Ungroup selected platforms", C::Ungroup),
            Shortcut::new("Delete", false, false, "Delete selection", C::Delete),
            Shortcut::new("Backspace", false, false, "Delete selection", C::Delete),
            Shortcut::new("Escape", false, false, "Cancel current action", C::Escape),
            Shortcut::new("ArrowLeft", false, false, "Nudge left", nudge(-NUDGE, 0.0)),
            Shortcut::new("ArrowRight", false, false, "Nudge right", nudge(NUDGE, 0.0)),
            Shortcut::new("ArrowUp", false, false, "Nudge up", nudge(0.0, -NUDGE)),
            Shortcut::new("ArrowDown", false, false, "Nudge down", nudge(0.0, NUDGE)),
            Shortcut::new("ArrowLeft", false, true, "Nudge left by 10", nudge(-NUDGE_LARGE, 0.0)),
            Shortcut::new("ArrowRight", false, true, "Nudge right by 10", nudge(NUDGE_LARGE, 0.0)),
            Shortcut::new("ArrowUp", false, true, "Nudge up by 10", nudge(0.0, -NUDGE_LARGE)),
            Shortcut::new("ArrowDown", false, true, "Nudge down by 10", nudge(0.0, NUDGE_LARGE)),
            Shortcut::new("L", true, true, "Align left", align(Alignment::Left)),
            Shortcut::new("R", true, true, "Align right", align(Alignment::Right)),
            Shortcut::new("C", true, true, "Align centers horizontally", align(Alignment::Center)),
            Shortcut::new("T", true, true, "Align top", align(Alignment::Top)),
            Shortcut::new("B", true, true, "Align bottom", align(Alignment::Bottom)),
            Shortcut::new("M", true, true, "Align centers vertically", align(Alignment::Middle)),
            Shortcut::new(
                "H",
                true,
                true,
                "Distribute horizontally",
                C::Distribute {
                    axis: Axis::Horizontal,
                },
            ),
            Shortcut::new(
                "V",
                true,
                true,
                "Distribute vertically",
                C::Distribute {
                    axis: Axis::Vertical,
                },
            ),
            Shortcut::new("V", false, false, "Select tool", tool(Tool::Select)),
            Shortcut::new("H", false, false, "Pan tool", tool(Tool::Pan)),
            Shortcut::new(
                "P",
                false,
                false,
                "Platform tool",
                tool(Tool::Platform(PlatformKind::Solid)),
            ),
            Shortcut::new("C", false, false, "Coin tool", tool(Tool::Coin)),
            Shortcut::new("S", false, false, "Player start tool", tool(Tool::PlayerStart)),
            Shortcut::new("E", false, false, "Goal tool", tool(Tool::Goal)),
            Shortcut::new("=", false, false, "Faster tempo", C::AdjustTempo { delta: 1 }),
            Shortcut::new("-", false, false, "Slower tempo", C::AdjustTempo { delta: -1 }),
        ]
    }

    /// The command bound to `chord`, if any.
    pub fn lookup(chord: &KeyChord) -> Option<EditorCommand> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(chord))
            .map(|shortcut| shortcut.command)
    }

    /// All shortcuts as a table, one per line.
    pub fn help_text() -> String {
        let mut text = String::from("Keyboard shortcuts:\n");
        for shortcut in Self::all() {
            text.push_str(&format!("  {:20} {}\n", shortcut.format(), shortcut.description));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        }
    }

    #[test]
    fn test_lookup_with_modifiers() {
        let undo = KeyChord::new("z", ctrl());
        assert_eq!(ShortcutRegistry::lookup(&undo), Some(EditorCommand::Undo));

        let redo = KeyChord::new(
            "Z",
            Modifiers {
                shift: true,
                ..ctrl()
            },
        );
        assert_eq!(ShortcutRegistry::lookup(&redo), Some(EditorCommand::Redo));

        let paste = KeyChord::new(
            "v",
            Modifiers {
                meta: true,
                ..Modifiers::default()
            },
        );
        assert_eq!(ShortcutRegistry::lookup(&paste), Some(EditorCommand::Paste));
    }

    #[test]
    fn test_plain_keys_pick_tools() {
        let chord = KeyChord::new("c", Modifiers::default());
        assert_eq!(
            ShortcutRegistry::lookup(&chord),
            Some(EditorCommand::SetTool { tool: Tool::Coin })
        );
        let chord = KeyChord::new("ArrowLeft", Modifiers { shift: true, ..Modifiers::default() });
        assert_eq!(
            ShortcutRegistry::lookup(&chord),
            Some(EditorCommand::Nudge { dx: -10.0, dy: 0.0 })
        );
    }

    #[test]
    fn test_unbound_chords() {
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::new("q", ctrl())), None);
        let alt = Modifiers {
            alt: true,
            ..Modifiers::default()
        };
        assert_eq!(ShortcutRegistry::lookup(&KeyChord::new("Delete", alt)), None);
    }

    #[test]
    fn test_no_duplicate_bindings() {
        let all = ShortcutRegistry::all();
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                let same = a.key.eq_ignore_ascii_case(b.key) && a.ctrl == b.ctrl && a.shift == b.shift;
                assert!(!same, "{} is bound twice", a.format());
            }
        }
    }

    #[test]
    fn test_help_text_lists_every_shortcut() {
        let text = ShortcutRegistry::help_text();
        assert_eq!(text.lines().count(), ShortcutRegistry::all().len() + 1);
        assert!(text.contains("Ctrl+Shift+Z"));
        assert!(text.contains("Slower tempo"));
    }

    #[test]
    fn test_format() {
        let shortcut = Shortcut::new("Z", true, true, "Redo", EditorCommand::Redo);
        assert_eq!(shortcut.format(), "Ctrl+Shift+Z");
    }
}
