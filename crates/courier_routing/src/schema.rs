use schemars::schema_for;

use crate::{request::RouteRequest, response::RouteResponseSummary};

pub fn generate_request_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(RouteRequest))
}

pub fn generate_summary_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schema_for!(RouteResponseSummary))
}
