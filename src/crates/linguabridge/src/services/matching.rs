//! Interpreter matching
//!
//! Candidates come from the database already filtered on activity,
//! availability flag and interpretation languages. Ranking applies the
//! travel radius for on-site work and orders the result.

use serde::Serialize;
use std::cmp::Ordering;
use tracing::debug;

use crate::db::models::{Linguist, Project};
use crate::db::repositories::LinguistRepository;
use crate::db::DatabasePool;
use crate::domain::ServiceType;
use crate::services::geo::{distance_miles, Coordinates};
use crate::{LinguabridgeError, Result};

/// Job to find interpreters for
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub source_language: String,
    pub target_language: String,
    pub service_type: ServiceType,

    /// Job location; required for on-site work
    pub location: Option<Coordinates>,

    /// Search radius requested by the coordinator
    pub max_distance_miles: f64,
}

impl MatchRequest {
    /// Build a request for an existing project
    pub fn for_project(project: &Project, max_distance_miles: f64) -> Result<Self> {
        let service_type = project
            .service_type
            .parse::<ServiceType>()
            .map_err(LinguabridgeError::Validation)?;
        Ok(Self {
            source_language: project.source_language.clone(),
            target_language: project.target_language.clone(),
            service_type,
            location: project.coordinates(),
            max_distance_miles,
        })
    }
}

/// Linguist that fits a job
#[derive(Debug, Clone, Serialize)]
pub struct MatchCandidate {
    pub linguist: Linguist,

    /// Distance to the job; set for on-site work only
    pub distance_miles: Option<f64>,
}

/// Radius a linguist is considered within: the tighter of the two limits
pub fn effective_radius(requested: f64, linguist_max: Option<f64>) -> f64 {
    match linguist_max {
        Some(max) => requested.min(max),
        None => requested,
    }
}

/// Filter and order pre-selected linguists for a job
pub fn rank_candidates(linguists: Vec<Linguist>, request: &MatchRequest) -> Result<Vec<MatchCandidate>> {
    let eligible = linguists
        .into_iter()
        .filter(|l| l.active && l.is_available_for(request.service_type));

    match request.service_type {
        ServiceType::Translation => Err(LinguabridgeError::Validation(
            "translation jobs are not matched to interpreters".to_string(),
        )),
        ServiceType::Onsite => {
            let job = request.location.ok_or_else(|| {
                LinguabridgeError::Validation("on-site matching needs job coordinates".to_string())
            })?;

            let mut candidates: Vec<MatchCandidate> = eligible
                .filter_map(|linguist| {
                    let distance = distance_miles(job, linguist.coordinates()?);
                    let radius = effective_radius(request.max_distance_miles, linguist.max_travel_distance);
                    (distance <= radius).then_some(MatchCandidate {
                        linguist,
                        distance_miles: Some(distance),
                    })
                })
                .collect();

            candidates.sort_by(|a, b| {
                a.distance_miles
                    .partial_cmp(&b.distance_miles)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.linguist.last_name.cmp(&b.linguist.last_name))
                    .then_with(|| a.linguist.id.cmp(&b.linguist.id))
            });
            Ok(candidates)
        }
        ServiceType::Video | ServiceType::Phone => {
            let mut candidates: Vec<MatchCandidate> = eligible
                .map(|linguist| MatchCandidate {
                    linguist,
                    distance_miles: None,
                })
                .collect();
            candidates.sort_by(|a, b| {
                a.linguist
                    .last_name
                    .cmp(&b.linguist.last_name)
                    .then_with(|| a.linguist.id.cmp(&b.linguist.id))
            });
            Ok(candidates)
        }
    }
}

/// Find and rank interpreters for a job
pub async fn find_matches(pool: &DatabasePool, request: &MatchRequest) -> Result<Vec<MatchCandidate>> {
    if !request.service_type.is_interpretation() {
        return Err(LinguabridgeError::Validation(
            "translation jobs are not matched to interpreters".to_string(),
        ));
    }

    let linguists = LinguistRepository::find_interpretation_candidates(
        pool,
        &request.source_language,
        &request.target_language,
        request.service_type,
    )
    .await?;
    let pool_size = linguists.len();

    let ranked = rank_candidates(linguists, request)?;
    debug!(
        "Matched {} of {} {}->{} {} candidates",
        ranked.len(),
        pool_size,
        request.source_language,
        request.target_language,
        request.service_type
    );
    Ok(ranked)
}
