//! Run listing request types.

use prolif_postgres::types::RunStatus;
use schemars::JsonSchema;
use serde::Deserialize;

/// Query parameters for listing runs.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListRunsQuery {
    /// Filter by status.
    pub status: Option<RunStatus>,
    /// Maximum records to return.
    pub limit: Option<i64>,
    /// Records to skip.
    pub offset: Option<i64>,
}
