pub mod apps;
pub mod command;
pub mod context;
pub mod keys;
pub mod loader;
pub mod resource;
pub mod runtime;
pub mod screen;
pub mod theme;
pub mod widgets;

pub use command::Command;
pub use context::{Context, Navigation};
pub use keys::{Action, KeyAction, KeyActionRegistry, KeyActions, KeyBinding, ScreenAction};
pub use loader::AsyncLoadCoordinator;
pub use resource::Resource;
pub use runtime::PageController;
pub use screen::{Loaded, Page, Screen, ScreenId};
pub use theme::Theme;
