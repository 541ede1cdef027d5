use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::fmt;

/// A key plus the modifiers that must be held for it to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(c: char) -> Self {
        Self {
            code: KeyCode::Char(c),
            modifiers: KeyModifiers::CONTROL,
        }
    }

    /// Normalize a terminal event into a binding.
    ///
    /// Shift is folded into the character itself (`?` arrives as Shift+`?` on
    /// most terminals), and only Ctrl/Alt/Shift are significant.
    pub fn from_event(event: &KeyEvent) -> Self {
        let mut modifiers =
            event.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT);
        if let KeyCode::Char(_) = event.code {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        Self {
            code: event.code,
            modifiers,
        }
    }

    /// A printable character typed without Ctrl or Alt.
    pub fn is_plain_char(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
            && !self
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    }
}

impl From<KeyCode> for KeyBinding {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift-")?;
        }

        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) if self.modifiers.contains(KeyModifiers::CONTROL) => {
                write!(f, "{}", c.to_ascii_uppercase())
            }
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Esc => write!(f, "Esc"),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::BackTab => write!(f, "Backtab"),
            KeyCode::Backspace => write!(f, "Backspace"),
            KeyCode::Delete => write!(f, "Delete"),
            KeyCode::Up => write!(f, "Up"),
            KeyCode::Down => write!(f, "Down"),
            KeyCode::Left => write!(f, "Left"),
            KeyCode::Right => write!(f, "Right"),
            KeyCode::Home => write!(f, "Home"),
            KeyCode::End => write!(f, "End"),
            KeyCode::PageUp => write!(f, "PgUp"),
            KeyCode::PageDown => write!(f, "PgDn"),
            KeyCode::F(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Actions every screen shares, plus a screen-local action routed to the active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    ListOrganizations,
    Screen(ScreenAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenAction {
    Select,
    NextPage,
    PrevPage,
    Search,
    CancelSearch,
    ExitHelp,
    ListWorkspaces,
    FocusNext,
    ShowRun,
    ShowVariable,
    ReturnToWorkspace,
}

impl From<ScreenAction> for Action {
    fn from(action: ScreenAction) -> Self {
        Action::Screen(action)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAction {
    pub description: String,
    pub action: Action,
    pub visible: bool,
}

impl KeyAction {
    pub fn new(description: impl Into<String>, action: impl Into<Action>) -> Self {
        Self {
            description: description.into(),
            action: action.into(),
            visible: true,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A key -> action table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyActions(HashMap<KeyBinding, KeyAction>);

impl KeyActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(
        mut self,
        key: impl Into<KeyBinding>,
        description: impl Into<String>,
        action: impl Into<Action>,
    ) -> Self {
        self.0.insert(key.into(), KeyAction::new(description, action));
        self
    }

    pub fn insert(&mut self, key: impl Into<KeyBinding>, action: KeyAction) {
        self.0.insert(key.into(), action);
    }

    /// Right-biased merge: entries in `other` replace ours on collision.
    pub fn add(&mut self, other: KeyActions) {
        self.0.extend(other.0);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn delete(&mut self, keys: &[KeyBinding]) {
        for key in keys {
            self.0.remove(key);
        }
    }

    pub fn get(&self, key: &KeyBinding) -> Option<&KeyAction> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &KeyBinding) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyBinding, &KeyAction)> {
        self.0.iter()
    }
}

struct Overlay {
    scope: &'static str,
    actions: KeyActions,
}

/// The live dispatch table: a base set merged from the global and active-screen
/// bindings, with scoped overlays stacked on top while a sub-widget has focus.
#[derive(Default)]
pub struct KeyActionRegistry {
    base: KeyActions,
    overlays: Vec<Overlay>,
}

impl KeyActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, actions: KeyActions) {
        self.base.add(actions);
    }

    /// Drop every binding, overlays included.
    pub fn clear(&mut self) {
        self.base.clear();
        self.overlays.clear();
    }

    pub fn delete(&mut self, keys: &[KeyBinding]) {
        self.base.delete(keys);
    }

    /// Install `actions` above the base set until `pop_overlay(scope)`.
    /// Pushing a scope that is already installed replaces it.
    pub fn push_overlay(&mut self, scope: &'static str, actions: KeyActions) {
        self.overlays.retain(|o| o.scope != scope);
        self.overlays.push(Overlay { scope, actions });
    }

    pub fn pop_overlay(&mut self, scope: &'static str) {
        self.overlays.retain(|o| o.scope != scope);
    }

    pub fn has_overlay(&self, scope: &str) -> bool {
        self.overlays.iter().any(|o| o.scope == scope)
    }

    /// Overlays are searched newest first, then the base set.
    pub fn lookup(&self, key: &KeyBinding) -> Option<&KeyAction> {
        self.overlays
            .iter()
            .rev()
            .find_map(|o| o.actions.get(key))
            .or_else(|| self.base.get(key))
    }

    /// Every effective binding, sorted by description.
    pub fn entries(&self) -> Vec<(KeyBinding, KeyAction)> {
        let mut effective = self.base.clone();
        for overlay in &self.overlays {
            effective.add(overlay.actions.clone());
        }

        let mut entries: Vec<_> = effective
            .iter()
            .map(|(k, a)| (*k, a.clone()))
            .collect();
        entries.sort_by(|a, b| {
            a.1.description
                .cmp(&b.1.description)
                .then_with(|| a.0.to_string().cmp(&b.0.to_string()))
        });
        entries
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.overlays.iter().all(|o| o.actions.is_empty())
    }
}
