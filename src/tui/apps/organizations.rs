use anyhow::{bail, Context as _, Result};

use crate::api::{Organization, Paged, Pagination};
use crate::tui::apps::list::ListSource;
use crate::tui::command::Command;
use crate::tui::context::Context;
use crate::tui::screen::{LoadTask, Loaded, ScreenId};
use crate::tui::widgets::TableModel;

/// Organizations the token can see. No search.
pub struct OrganizationSource {
    organizations: Paged<Organization>,
}

impl OrganizationSource {
    pub fn new() -> Self {
        Self {
            organizations: Paged::new(Vec::new(), Pagination::default()),
        }
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations.items
    }
}

impl Default for OrganizationSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ListSource for OrganizationSource {
    fn id(&self) -> ScreenId {
        ScreenId::Organizations
    }

    fn name(&self) -> &'static str {
        "organization"
    }

    fn name_list(&self) -> &'static str {
        "organizations"
    }

    fn crumb(&self) -> Vec<String> {
        vec!["organizations".to_string()]
    }

    fn supports_search(&self) -> bool {
        false
    }

    fn search(&self, ctx: &Context, _text: &str, page: Option<u32>) -> LoadTask {
        let client = ctx.client.clone();
        Box::pin(async move {
            let organizations = client
                .list_organizations(page)
                .await
                .context("error listing the organizations")?;
            Ok(Loaded::Organizations(organizations))
        })
    }

    fn accept(&mut self, loaded: Loaded) -> Result<()> {
        match loaded {
            Loaded::Organizations(organizations) => {
                self.organizations = organizations;
                Ok(())
            }
            other => bail!("organizations screen cannot show {}", other.kind()),
        }
    }

    fn render_header(&self, table: &mut TableModel) {
        table.column("ID", 1);
        table.column("NAME", 1);
        table.column("E-MAIL", 1);
    }

    fn render_rows(&self, table: &mut TableModel) {
        for org in &self.organizations.items {
            table.push_row(vec![
                org.external_id.clone().into(),
                org.name.clone().into(),
                org.email.clone().into(),
            ]);
        }
    }

    fn empty(&self) -> bool {
        self.organizations.is_empty()
    }

    fn current_page(&self) -> u32 {
        self.organizations.pagination.current_page
    }

    fn total_pages(&self) -> u32 {
        self.organizations.pagination.total_pages
    }

    fn total_count(&self) -> u32 {
        self.organizations.pagination.total_count
    }

    fn select(&self, row: usize, ctx: &mut Context) -> Command {
        match self.organizations.items.get(row) {
            Some(org) => {
                ctx.select_organization(org.name.clone());
                Command::navigate_to(ScreenId::Workspaces)
            }
            None => Command::None,
        }
    }
}
