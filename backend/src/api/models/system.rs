use serde::{Deserialize, Serialize};

/// Response for GET /health
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "ok" when every component answers, "degraded" otherwise
    pub status: String,
    pub version: String,
    /// Unix timestamp of the check
    pub timestamp: i64,
    /// Database component status
    pub database: ComponentStatus,
}

/// Component status
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Ok,
    Unavailable,
}
