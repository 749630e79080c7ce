//! Property tests for the radius-derived bounding box.

use newsflow_core::geo::distance_km;
use newsflow_core::query::{ParsedQuery, QueryFilters};
use newsflow_core::request::{GeoPoint, QueryRequest};
use newsflow_retrieval::RetrievalContext;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn context_parts(lat: f64, lon: f64, radius_km: f64) -> (QueryRequest, ParsedQuery) {
    let mut request = QueryRequest::new("anything");
    request.user_location = Some(GeoPoint::new(lat, lon));
    request.radius_km = Some(radius_km);
    let parsed = ParsedQuery::new(
        Vec::new(),
        Vec::new(),
        BTreeSet::new(),
        QueryFilters::default(),
        None,
        false,
    );
    (request, parsed)
}

proptest! {
    /// Any point within the radius in a cardinal direction lands inside the
    /// box. Mid-latitudes only; the box is a flat-earth approximation that
    /// degrades toward the poles.
    #[test]
    fn cardinal_points_at_radius_are_contained(
        lat in -60.0f64..60.0,
        lon in -170.0f64..170.0,
        radius_km in 1.0f64..100.0,
    ) {
        let (request, parsed) = context_parts(lat, lon, radius_km);
        let context = RetrievalContext::new(&request, &parsed);
        let bbox = context
            .apply_bounding_box(context.base_filter())
            .bounding_box
            .unwrap();

        // Slightly inside the radius to stay clear of float edges.
        let r = radius_km * 0.99;
        let lat_step = r / 111.32;
        let lon_step = r / (111.32 * lat.to_radians().cos());

        prop_assert!(bbox.contains(lat + lat_step, lon));
        prop_assert!(bbox.contains(lat - lat_step, lon));
        prop_assert!(bbox.contains(lat, (lon + lon_step).clamp(-180.0, 180.0)));
        prop_assert!(bbox.contains(lat, (lon - lon_step).clamp(-180.0, 180.0)));
    }

    /// The box always contains its own center.
    #[test]
    fn center_is_always_contained(
        lat in -89.0f64..89.0,
        lon in -179.0f64..179.0,
        radius_km in 1.0f64..100.0,
    ) {
        let (request, parsed) = context_parts(lat, lon, radius_km);
        let context = RetrievalContext::new(&request, &parsed);
        let bbox = context
            .apply_bounding_box(context.base_filter())
            .bounding_box
            .unwrap();
        prop_assert!(bbox.contains(lat, lon));
    }

    /// The box never exceeds valid coordinate ranges.
    #[test]
    fn box_stays_within_coordinate_ranges(
        lat in -89.9f64..89.9,
        lon in -179.9f64..179.9,
        radius_km in 1.0f64..100.0,
    ) {
        let (request, parsed) = context_parts(lat, lon, radius_km);
        let context = RetrievalContext::new(&request, &parsed);
        let bbox = context
            .apply_bounding_box(context.base_filter())
            .bounding_box
            .unwrap();
        prop_assert!(bbox.min_latitude >= -90.0 && bbox.max_latitude <= 90.0);
        prop_assert!(bbox.min_longitude >= -180.0 && bbox.max_longitude <= 180.0);
    }

    /// Haversine distance between the center and any contained cardinal edge
    /// point stays within a small multiple of the radius.
    #[test]
    fn latitude_edge_tracks_the_radius(
        lat in -60.0f64..60.0,
        lon in -170.0f64..170.0,
        radius_km in 5.0f64..100.0,
    ) {
        let (request, parsed) = context_parts(lat, lon, radius_km);
        let context = RetrievalContext::new(&request, &parsed);
        let bbox = context
            .apply_bounding_box(context.base_filter())
            .bounding_box
            .unwrap();
        let edge = distance_km(lat, lon, bbox.max_latitude, lon);
        prop_assert!(edge <= radius_km * 1.05);
        prop_assert!(edge >= radius_km * 0.95);
    }
}
