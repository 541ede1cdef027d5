//! Domain models returned by the client, plus the JSON:API wire shapes they are decoded from.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;

/// Server-side pagination details of a list response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            total_count: 0,
        }
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Paged<T> {
    pub fn new(items: Vec<T>, pagination: Pagination) -> Self {
        Self { items, pagination }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Organization {
    pub name: String,
    pub external_id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Workspace {
    pub id: String,
    pub name: String,
    pub description: String,
    pub tag_names: Vec<String>,
    pub terraform_version: String,
    pub resource_count: u64,
    pub updated_at: Option<DateTime<Utc>>,
    pub locked: bool,
    pub working_directory: String,
    pub execution_mode: String,
    pub auto_apply: bool,
    /// Milliseconds
    pub apply_duration_average: Option<u64>,
    /// Milliseconds
    pub plan_duration_average: Option<u64>,
    pub run_failures: u64,
    pub runs_count: u64,
    pub current_run: Option<Run>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Run {
    pub id: String,
    pub message: String,
    pub status: String,
    pub source: String,
    pub created_at: Option<DateTime<Utc>>,
    pub auto_apply: bool,
    pub is_destroy: bool,
    pub created_by: Option<String>,
    pub plan: Option<Plan>,
    pub plan_id: Option<String>,
    pub apply_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub id: String,
    pub status: String,
    pub resource_additions: u64,
    pub resource_changes: u64,
    pub resource_destructions: u64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variable {
    pub id: String,
    pub key: String,
    pub value: String,
    pub category: String,
    pub sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TeamAccess {
    pub team_id: String,
    pub team_name: String,
    pub access: String,
}

// ---------------------------------------------------------------------------
// JSON:API wire shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct Document<D> {
    pub data: D,
    #[serde(default)]
    pub included: Vec<Resource<serde_json::Value>>,
    #[serde(default)]
    pub meta: Option<Meta>,
}

impl<D> Document<D> {
    /// Find an included resource by type and id and decode its attributes.
    pub fn find_included<A: for<'de> Deserialize<'de>>(&self, kind: &str, id: &str) -> Option<Resource<A>> {
        let raw = self.included.iter().find(|r| r.kind == kind && r.id == id)?;
        let attributes = serde_json::from_value(raw.attributes.clone()).ok()?;
        Some(Resource {
            id: raw.id.clone(),
            kind: raw.kind.clone(),
            attributes,
            relationships: raw.relationships.clone(),
        })
    }

    pub fn pagination(&self) -> Pagination {
        self.meta
            .as_ref()
            .and_then(|m| m.pagination)
            .map(|p| Pagination {
                current_page: p.current_page.max(1),
                total_pages: p.total_pages.max(1),
                total_count: p.total_count,
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: A,
    #[serde(default)]
    pub relationships: HashMap<String, Relationship>,
}

impl<A> Resource<A> {
    /// Id of a to-one relationship, if present and non-null.
    pub fn related_id(&self, name: &str) -> Option<&str> {
        match self.relationships.get(name)?.data.as_ref()? {
            Linkage::One(id) => Some(id.id.as_str()),
            Linkage::Many(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub data: Option<Linkage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
    One(ResourceId),
    Many(Vec<ResourceId>),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceId {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PaginationMeta {
    #[serde(default)]
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OrganizationAttributes {
    pub name: String,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkspaceAttributes {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tag_names: Vec<String>,
    #[serde(default)]
    pub terraform_version: Option<String>,
    #[serde(default)]
    pub resource_count: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub working_directory: Option<String>,
    #[serde(default)]
    pub execution_mode: Option<String>,
    #[serde(default)]
    pub auto_apply: bool,
    #[serde(default)]
    pub apply_duration_average: Option<u64>,
    #[serde(default)]
    pub plan_duration_average: Option<u64>,
    #[serde(default)]
    pub run_failures: Option<u64>,
    #[serde(default)]
    pub workspace_kpis_runs_count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunAttributes {
    #[serde(default)]
    pub message: Option<String>,
    pub status: String,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub auto_apply: Option<bool>,
    #[serde(default)]
    pub is_destroy: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlanAttributes {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub resource_additions: u64,
    #[serde(default)]
    pub resource_changes: u64,
    #[serde(default)]
    pub resource_destructions: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct VariableAttributes {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sensitive: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamWorkspaceAttributes {
    #[serde(default)]
    pub access: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamAttributes {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserAttributes {
    pub username: String,
}

impl From<Resource<OrganizationAttributes>> for Organization {
    fn from(r: Resource<OrganizationAttributes>) -> Self {
        Self {
            name: r.attributes.name,
            external_id: r.attributes.external_id.unwrap_or_default(),
            email: r.attributes.email.unwrap_or_default(),
        }
    }
}

impl From<Resource<PlanAttributes>> for Plan {
    fn from(r: Resource<PlanAttributes>) -> Self {
        Self {
            id: r.id,
            status: r.attributes.status,
            resource_additions: r.attributes.resource_additions,
            resource_changes: r.attributes.resource_changes,
            resource_destructions: r.attributes.resource_destructions,
        }
    }
}

impl From<Resource<VariableAttributes>> for Variable {
    fn from(r: Resource<VariableAttributes>) -> Self {
        Self {
            id: r.id,
            key: r.attributes.key,
            value: r.attributes.value.unwrap_or_default(),
            category: r.attributes.category,
            sensitive: r.attributes.sensitive,
        }
    }
}

impl Workspace {
    /// Build a workspace from its resource, resolving `current-run` from `included` when present.
    pub fn from_resource<D>(r: Resource<WorkspaceAttributes>, doc: &Document<D>) -> Self {
        let current_run = r
            .related_id("current-run")
            .and_then(|id| doc.find_included::<RunAttributes>("runs", id))
            .map(|run| Run::from_resource(run, doc));

        let a = r.attributes;
        Self {
            id: r.id,
            name: a.name,
            description: a.description.unwrap_or_default(),
            tag_names: a.tag_names,
            terraform_version: a.terraform_version.unwrap_or_default(),
            resource_count: a.resource_count,
            updated_at: a.updated_at,
            locked: a.locked,
            working_directory: a.working_directory.unwrap_or_default(),
            execution_mode: a.execution_mode.unwrap_or_default(),
            auto_apply: a.auto_apply,
            apply_duration_average: a.apply_duration_average,
            plan_duration_average: a.plan_duration_average,
            run_failures: a.run_failures.unwrap_or_default(),
            runs_count: a.workspace_kpis_runs_count.unwrap_or_default(),
            current_run,
        }
    }
}

impl Run {
    /// Build a run, resolving `created-by` and `plan` from `included` when present.
    pub fn from_resource<D>(r: Resource<RunAttributes>, doc: &Document<D>) -> Self {
        let created_by = r
            .related_id("created-by")
            .and_then(|id| doc.find_included::<UserAttributes>("users", id))
            .map(|user| user.attributes.username);
        let plan_id = r.related_id("plan").map(str::to_string);
        let plan = plan_id
            .as_deref()
            .and_then(|id| doc.find_included::<PlanAttributes>("plans", id))
            .map(Plan::from);
        let apply_id = r.related_id("apply").map(str::to_string);

        let a = r.attributes;
        Self {
            id: r.id,
            message: a.message.unwrap_or_default(),
            status: a.status,
            source: a.source.unwrap_or_default(),
            created_at: a.created_at,
            auto_apply: a.auto_apply.unwrap_or_default(),
            is_destroy: a.is_destroy,
            created_by,
            plan,
            plan_id,
            apply_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_workspace_resolves_current_run_and_plan() {
        let body = json!({
            "data": {
                "id": "ws-1",
                "type": "workspaces",
                "attributes": {
                    "name": "networking",
                    "tag-names": ["prod", "net"],
                    "terraform-version": "1.6.0",
                    "resource-count": 12,
                    "locked": true,
                    "auto-apply": false,
                    "workspace-kpis-runs-count": 40,
                    "run-failures": 3
                },
                "relationships": {
                    "current-run": { "data": { "id": "run-1", "type": "runs" } },
                    "locked-by": { "data": null }
                }
            },
            "included": [
                {
                    "id": "run-1",
                    "type": "runs",
                    "attributes": { "status": "applied", "message": "nightly" },
                    "relationships": {
                        "plan": { "data": { "id": "plan-1", "type": "plans" } },
                        "apply": { "data": { "id": "apply-1", "type": "applies" } }
                    }
                },
                {
                    "id": "plan-1",
                    "type": "plans",
                    "attributes": {
                        "status": "finished",
                        "resource-additions": 2,
                        "resource-changes": 1,
                        "resource-destructions": 0
                    }
                }
            ]
        });

        let doc: Document<Resource<WorkspaceAttributes>> = serde_json::from_value(body).unwrap();
        let data = doc.data.clone();
        let workspace = Workspace::from_resource(data, &doc);

        assert_eq!(workspace.name, "networking");
        assert_eq!(workspace.tag_names, vec!["prod", "net"]);
        assert_eq!(workspace.runs_count, 40);
        let run = workspace.current_run.unwrap();
        assert_eq!(run.status, "applied");
        assert_eq!(run.apply_id.as_deref(), Some("apply-1"));
        assert_eq!(run.plan.unwrap().resource_additions, 2);
    }

    #[test]
    fn test_missing_pagination_defaults_to_single_page() {
        let doc: Document<Vec<Resource<OrganizationAttributes>>> =
            serde_json::from_value(json!({ "data": [] })).unwrap();
        assert_eq!(doc.pagination(), Pagination::default());
    }

    #[test]
    fn test_pagination_meta_is_read() {
        let doc: Document<Vec<Resource<OrganizationAttributes>>> = serde_json::from_value(json!({
            "data": [],
            "meta": { "pagination": { "current-page": 3, "total-pages": 5, "total-count": 141 } }
        }))
        .unwrap();
        assert_eq!(
            doc.pagination(),
            Pagination { current_page: 3, total_pages: 5, total_count: 141 }
        );
    }
}
