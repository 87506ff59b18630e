//! Project, matching and invitation API models

use serde::{Deserialize, Serialize};

use crate::api::error::ApiResult;
use crate::api::middleware::validation::{parse_field, validate_non_negative};
use crate::domain::ProjectStatus;
use crate::services::MatchCandidate;

/// Query parameters for listing projects
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectListQuery {
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Requested project status change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectStatusRequest {
    pub status: String,
}

impl ProjectStatusRequest {
    pub fn parse(&self) -> ApiResult<ProjectStatus> {
        parse_field::<ProjectStatus>(&self.status, "status")
    }
}

/// Search radius override for matching and inviting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchQuery {
    /// Miles; defaults to `[matching] default_max_distance_miles`
    pub max_distance_miles: Option<f64>,
}

impl MatchQuery {
    pub fn radius(&self, default_miles: f64) -> ApiResult<f64> {
        match self.max_distance_miles {
            Some(miles) => {
                validate_non_negative(miles, "max_distance_miles")?;
                Ok(miles)
            }
            None => Ok(default_miles),
        }
    }
}

/// Candidates for a project in ranking order
#[derive(Debug, Clone, Serialize)]
pub struct MatchResponse {
    pub project_id: String,
    pub max_distance_miles: f64,
    pub candidates: Vec<MatchCandidate>,
}
