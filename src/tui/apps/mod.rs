pub mod help;
pub mod list;
pub mod organizations;
pub mod run;
pub mod workspace;
pub mod workspaces;

pub use help::HelpScreen;
pub use list::{ListCursor, ListScreen, ListSource};
pub use organizations::OrganizationSource;
pub use run::{RunScreen, RunSnapshot};
pub use workspace::{WorkspaceScreen, WorkspaceSnapshot};
pub use workspaces::WorkspaceSource;
