use crate::tui::keys::KeyActions;
use crate::tui::screen::{LoadTask, ScreenId};

/// Commands represent side effects that screens want to perform.
/// They are returned from action and input handlers and executed by the controller.
pub enum Command {
    /// Do nothing
    None,

    /// Execute multiple commands in sequence
    Batch(Vec<Command>),

    /// Activate a screen, building a fresh instance
    NavigateTo(ScreenId),

    /// Re-activate a registered screen as-is, without reloading it
    ReturnTo(ScreenId),

    /// Re-run the active screen's load/render cycle with a custom load
    Reload(LoadTask),

    /// The event was not handled and should continue to the next handler
    PassThrough,

    /// Install a scoped key overlay
    PushKeys {
        scope: &'static str,
        actions: KeyActions,
    },

    /// Remove a scoped key overlay
    PopKeys(&'static str),

    /// Flash a message on the footer
    Notify(String),

    /// Quit the application
    Quit,
}

impl Command {
    /// Helper to navigate to another screen
    pub fn navigate_to(screen: ScreenId) -> Self {
        Command::NavigateTo(screen)
    }

    /// Helper to batch multiple commands
    pub fn batch(commands: Vec<Command>) -> Self {
        Command::Batch(commands)
    }

    pub fn notify(message: impl Into<String>) -> Self {
        Command::Notify(message.into())
    }

    pub fn is_pass_through(&self) -> bool {
        matches!(self, Command::PassThrough)
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Command::None)
    }
}

impl Default for Command {
    fn default() -> Self {
        Command::None
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::None => write!(f, "None"),
            Command::Batch(commands) => f.debug_tuple("Batch").field(commands).finish(),
            Command::NavigateTo(id) => f.debug_tuple("NavigateTo").field(id).finish(),
            Command::ReturnTo(id) => f.debug_tuple("ReturnTo").field(id).finish(),
            Command::Reload(_) => write!(f, "Reload(..)"),
            Command::PassThrough => write!(f, "PassThrough"),
            Command::PushKeys { scope, .. } => f.debug_struct("PushKeys").field("scope", scope).finish(),
            Command::PopKeys(scope) => f.debug_tuple("PopKeys").field(scope).finish(),
            Command::Notify(message) => f.debug_tuple("Notify").field(message).finish(),
            Command::Quit => write!(f, "Quit"),
        }
    }
}
