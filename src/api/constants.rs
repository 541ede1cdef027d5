//! API constants and endpoint builders for the Terraform Cloud / Enterprise v2 API

/// Default address used when `TFE_ADDRESS` is not set
pub const DEFAULT_ADDRESS: &str = "https://app.terraform.io";

/// Base API path
pub const API_BASE_PATH: &str = "/api/v2";

/// Page size requested from every paginated endpoint
pub const PAGE_SIZE: u32 = 30;

/// Environment variable holding the API token
pub const TOKEN_ENV: &str = "TFE_TOKEN";

/// Environment variable holding the API address
pub const ADDRESS_ENV: &str = "TFE_ADDRESS";

/// Standard headers for JSON:API requests
pub mod headers {
    pub const CONTENT_TYPE_JSON_API: &str = "application/vnd.api+json";
}

fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

pub fn organizations_endpoint(base_url: &str) -> String {
    format!("{}{}/organizations", base_url, API_BASE_PATH)
}

pub fn workspaces_endpoint(base_url: &str, organization: &str) -> String {
    format!(
        "{}{}/organizations/{}/workspaces",
        base_url,
        API_BASE_PATH,
        segment(organization)
    )
}

pub fn workspace_endpoint(base_url: &str, organization: &str, workspace: &str) -> String {
    format!(
        "{}/{}",
        workspaces_endpoint(base_url, organization),
        segment(workspace)
    )
}

pub fn workspace_vars_endpoint(base_url: &str, workspace_id: &str) -> String {
    format!("{}{}/workspaces/{}/vars", base_url, API_BASE_PATH, segment(workspace_id))
}

pub fn workspace_runs_endpoint(base_url: &str, workspace_id: &str) -> String {
    format!("{}{}/workspaces/{}/runs", base_url, API_BASE_PATH, segment(workspace_id))
}

pub fn team_workspaces_endpoint(base_url: &str) -> String {
    format!("{}{}/team-workspaces", base_url, API_BASE_PATH)
}

pub fn team_endpoint(base_url: &str, team_id: &str) -> String {
    format!("{}{}/teams/{}", base_url, API_BASE_PATH, segment(team_id))
}

pub fn run_endpoint(base_url: &str, run_id: &str) -> String {
    format!("{}{}/runs/{}", base_url, API_BASE_PATH, segment(run_id))
}

pub fn plan_endpoint(base_url: &str, plan_id: &str) -> String {
    format!("{}{}/plans/{}", base_url, API_BASE_PATH, segment(plan_id))
}

pub fn plan_logs_endpoint(base_url: &str, plan_id: &str) -> String {
    format!("{}/logs", plan_endpoint(base_url, plan_id))
}

pub fn apply_logs_endpoint(base_url: &str, apply_id: &str) -> String {
    format!(
        "{}{}/applies/{}/logs",
        base_url,
        API_BASE_PATH,
        segment(apply_id)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(
            workspace_endpoint("https://tfe.local", "acme corp", "net/prod"),
            "https://tfe.local/api/v2/organizations/acme%20corp/workspaces/net%2Fprod"
        );
    }

    #[test]
    fn test_log_endpoints() {
        assert_eq!(
            plan_logs_endpoint(DEFAULT_ADDRESS, "plan-1"),
            "https://app.terraform.io/api/v2/plans/plan-1/logs"
        );
        assert_eq!(
            apply_logs_endpoint(DEFAULT_ADDRESS, "apply-1"),
            "https://app.terraform.io/api/v2/applies/apply-1/logs"
        );
    }
}
