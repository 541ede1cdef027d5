use anyhow::{bail, Context as _, Result};

use crate::api::{Paged, Pagination, Workspace};
use crate::tui::apps::list::ListSource;
use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::screen::{LoadTask, Loaded, ScreenId};
use crate::tui::widgets::fields::{fmt_short_time, run_status_icon, run_status_tone};
use crate::tui::widgets::{TableCell, TableModel};

/// Workspaces of one organization, searchable by name and tags.
pub struct WorkspaceSource {
    organization: String,
    workspaces: Paged<Workspace>,
}

impl WorkspaceSource {
    pub fn new(organization: &str) -> Self {
        Self {
            organization: organization.to_string(),
            workspaces: Paged::new(Vec::new(), Pagination::default()),
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn workspaces(&self) -> &[Workspace] {
        &self.workspaces.items
    }
}

fn current_run_cell(workspace: &Workspace) -> TableCell {
    match &workspace.current_run {
        Some(run) => TableCell::toned(
            format!("{}{}", run_status_icon(&run.status), run.status),
            run_status_tone(&run.status),
        ),
        None => TableCell::new(""),
    }
}

impl ListSource for WorkspaceSource {
    fn id(&self) -> ScreenId {
        ScreenId::Workspaces
    }

    fn name(&self) -> &'static str {
        "workspace"
    }

    fn name_list(&self) -> &'static str {
        "workspaces"
    }

    fn crumb(&self) -> Vec<String> {
        vec![self.organization.clone(), "workspaces".to_string()]
    }

    fn supports_search(&self) -> bool {
        true
    }

    fn search(&self, ctx: &Context, text: &str, page: Option<u32>) -> LoadTask {
        let client = ctx.client.clone();
        let organization = self.organization.clone();
        let text = text.to_string();
        Box::pin(async move {
            let workspaces = client
                .list_workspaces(&organization, &text, page)
                .await
                .context("error listing the workspaces")?;
            Ok(Loaded::Workspaces(workspaces))
        })
    }

    fn accept(&mut self, loaded: Loaded) -> Result<()> {
        match loaded {
            Loaded::Workspaces(workspaces) => {
                self.workspaces = workspaces;
                Ok(())
            }
            other => bail!("workspaces screen cannot show {}", other.kind()),
        }
    }

    fn render_header(&self, table: &mut TableModel) {
        table.column("ID", 2);
        table.column("NAME", 2);
        table.column("TAGS", 2);
        table.column("TERRAFORM", 1);
        table.column("COUNT", 1);
        table.column("RUN STATUS", 2);
        table.column("LATEST CHANGE", 2);
    }

    fn render_rows(&self, table: &mut TableModel) {
        for ws in &self.workspaces.items {
            table.push_row(vec![
                ws.id.clone().into(),
                ws.name.clone().into(),
                ws.tag_names.join(" ").into(),
                ws.terraform_version.clone().into(),
                ws.resource_count.to_string().into(),
                current_run_cell(ws),
                fmt_short_time(ws.updated_at).into(),
            ]);
        }
    }

    fn empty(&self) -> bool {
        self.workspaces.is_empty()
    }

    fn current_page(&self) -> u32 {
        self.workspaces.pagination.current_page
    }

    fn total_pages(&self) -> u32 {
        self.workspaces.pagination.total_pages
    }

    fn total_count(&self) -> u32 {
        self.workspaces.pagination.total_count
    }

    fn select(&self, row: usize, ctx: &mut Context) -> Command {
        match self.workspaces.items.get(row) {
            Some(ws) => {
                ctx.select_workspace(ws.name.clone());
                Command::navigate_to(ScreenId::Workspace)
            }
            None => Command::None,
        }
    }
}
