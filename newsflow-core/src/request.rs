use serde::{Deserialize, Serialize};

use crate::constants;
use crate::errors::{NewsError, NewsResult};
use crate::query::QueryContext;

/// A latitude/longitude pair supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn validate(&self) -> NewsResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(NewsError::Validation(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(NewsError::Validation(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        Ok(())
    }
}

/// Incoming news query request, validated before the pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    pub user_location: Option<GeoPoint>,
    pub max_results: Option<usize>,
    pub radius_km: Option<f64>,
    pub score_threshold: Option<f64>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            user_location: None,
            max_results: None,
            radius_km: None,
            score_threshold: None,
        }
    }

    /// Effective result limit: default 10, hard cap 50.
    pub fn resolved_limit(&self) -> usize {
        self.max_results
            .map(|limit| limit.min(constants::MAX_QUERY_LIMIT))
            .unwrap_or(constants::DEFAULT_QUERY_LIMIT)
    }

    /// Effective search radius: default 10 km, hard cap 100 km.
    pub fn resolved_radius_km(&self) -> f64 {
        self.radius_km
            .map(|radius| radius.min(constants::MAX_QUERY_RADIUS_KM))
            .unwrap_or(constants::DEFAULT_QUERY_RADIUS_KM)
    }

    /// Reject malformed requests before any pipeline work happens.
    pub fn validate(&self) -> NewsResult<()> {
        if self.query.trim().is_empty() {
            return Err(NewsError::Validation("query must not be blank".to_string()));
        }
        if self.query.chars().count() > constants::MAX_QUERY_LENGTH {
            return Err(NewsError::Validation(format!(
                "query exceeds {} characters",
                constants::MAX_QUERY_LENGTH
            )));
        }
        if let Some(limit) = self.max_results {
            if limit == 0 || limit > constants::MAX_REQUESTED_RESULTS {
                return Err(NewsError::Validation(format!(
                    "max_results must be in 1..={}",
                    constants::MAX_REQUESTED_RESULTS
                )));
            }
        }
        if let Some(radius) = self.radius_km {
            if radius <= 0.0 || radius > constants::MAX_REQUESTED_RADIUS_KM {
                return Err(NewsError::Validation(format!(
                    "radius_km must be in (0, {}]",
                    constants::MAX_REQUESTED_RADIUS_KM
                )));
            }
        }
        if let Some(threshold) = self.score_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(NewsError::Validation(
                    "score_threshold must be in [0, 1]".to_string(),
                ));
            }
        }
        if let Some(location) = &self.user_location {
            location.validate()?;
        }
        Ok(())
    }

    /// Context handed to query understanding.
    pub fn understanding_context(&self) -> QueryContext {
        QueryContext {
            query: self.query.clone(),
            latitude: self.user_location.map(|l| l.latitude),
            longitude: self.user_location.map(|l| l.longitude),
            radius_km: self.radius_km,
            score_threshold: self.score_threshold,
        }
    }
}
