//! Shared per-request state for retrieval strategies.

use newsflow_core::geo::EARTH_RADIUS_KM;
use newsflow_core::query::ParsedQuery;
use newsflow_core::request::QueryRequest;
use newsflow_core::traits::{ArticleFilter, BoundingBox};

/// One query's request and parse, with resolution helpers.
///
/// Parsed filters win over request fields everywhere: the model may have
/// extracted a more specific location than the caller supplied.
#[derive(Debug, Clone, Copy)]
pub struct RetrievalContext<'a> {
    pub request: &'a QueryRequest,
    pub parsed: &'a ParsedQuery,
}

impl<'a> RetrievalContext<'a> {
    pub fn new(request: &'a QueryRequest, parsed: &'a ParsedQuery) -> Self {
        Self { request, parsed }
    }

    pub fn resolve_latitude(&self) -> Option<f64> {
        self.parsed
            .filters()
            .latitude
            .or_else(|| self.request.user_location.map(|l| l.latitude))
    }

    pub fn resolve_longitude(&self) -> Option<f64> {
        self.parsed
            .filters()
            .longitude
            .or_else(|| self.request.user_location.map(|l| l.longitude))
    }

    pub fn resolve_radius_km(&self) -> f64 {
        self.parsed
            .filters()
            .radius_km
            .unwrap_or_else(|| self.request.resolved_radius_km())
    }

    /// Filter built from the parse: category, source, score threshold,
    /// search text, and date bounds. Strategies start from this.
    pub fn base_filter(&self) -> ArticleFilter {
        let filters = self.parsed.filters();
        ArticleFilter {
            category: filters.category.clone().filter(|c| !c.trim().is_empty()),
            source: filters.source.clone().filter(|s| !s.trim().is_empty()),
            min_score: filters.score_threshold,
            published_after: filters.date_from,
            published_before: filters.date_to,
            bounding_box: None,
            search_text: self.parsed.search_query().map(str::to_string),
        }
    }

    /// Attach a radius-derived bounding box when coordinates resolve.
    ///
    /// Longitude delta widens with latitude; both axes clamp to the valid
    /// coordinate ranges rather than wrapping.
    pub fn apply_bounding_box(&self, mut filter: ArticleFilter) -> ArticleFilter {
        let (Some(lat), Some(lon)) = (self.resolve_latitude(), self.resolve_longitude()) else {
            return filter;
        };
        let radius_km = self.resolve_radius_km();
        let lat_delta = (radius_km / EARTH_RADIUS_KM).to_degrees();
        let lon_delta = (radius_km / (EARTH_RADIUS_KM * lat.to_radians().cos())).to_degrees();
        filter.bounding_box = Some(BoundingBox {
            min_latitude: (lat - lat_delta).max(-90.0),
            max_latitude: (lat + lat_delta).min(90.0),
            min_longitude: (lon - lon_delta).max(-180.0),
            max_longitude: (lon + lon_delta).min(180.0),
        });
        filter
    }
}
