//! Terraform Cloud / Enterprise API access
//!
//! A thin async client over the JSON:API endpoints the browser needs, plus the
//! pure helpers for search text and log decoding.

pub mod client;
pub mod constants;
pub mod logs;
pub mod models;
pub mod search;

pub use client::{TfeApi, TfeClient};
pub use logs::log_messages;
pub use models::{Organization, Paged, Pagination, Plan, Run, TeamAccess, Variable, Workspace};
pub use search::parse_search_text;
