//! Geographic primitives: great-circle distance and grid-cell bucketing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in km (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Crude km-per-degree figure used for grid expansion. Only valid as an
/// equirectangular approximation; cells shrink toward the poles.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points in km (haversine).
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Composite grid-cell key: `(floor(lat/size), floor(lon/size))`.
///
/// Structured indices avoid the parse/format edge cases a concatenated
/// string key would have at negative indices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BucketId {
    pub lat_index: i64,
    pub lon_index: i64,
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.lat_index, self.lon_index)
    }
}

/// Deterministic lat/lon → grid-cell mapping with neighborhood expansion.
///
/// Cells have a fixed angular width, so their km extent shrinks toward the
/// poles; this equirectangular approximation is not corrected.
#[derive(Debug, Clone)]
pub struct GeoBucketer {
    bucket_size_degrees: f64,
}

impl GeoBucketer {
    pub fn new(bucket_size_degrees: f64) -> Self {
        assert!(
            bucket_size_degrees > 0.0,
            "bucket_size_degrees must be positive"
        );
        Self {
            bucket_size_degrees,
        }
    }

    pub fn bucket_id(&self, latitude: f64, longitude: f64) -> BucketId {
        BucketId {
            lat_index: (latitude / self.bucket_size_degrees).floor() as i64,
            lon_index: (longitude / self.bucket_size_degrees).floor() as i64,
        }
    }

    /// All cells within `ceil(radius / (size · km_per_degree))` grid steps of
    /// the cell containing the point, in both axes.
    pub fn nearby_buckets(&self, latitude: f64, longitude: f64, radius_km: f64) -> Vec<BucketId> {
        let steps = ((radius_km / (self.bucket_size_degrees * KM_PER_DEGREE)).ceil() as i64).max(1);
        let base = self.bucket_id(latitude, longitude);
        let side = (2 * steps + 1) as usize;
        let mut buckets = Vec::with_capacity(side * side);
        for lat_index in (base.lat_index - steps)..=(base.lat_index + steps) {
            for lon_index in (base.lon_index - steps)..=(base.lon_index + steps) {
                buckets.push(BucketId {
                    lat_index,
                    lon_index,
                });
            }
        }
        buckets
    }

    /// Center coordinates of a cell.
    pub fn bucket_center(&self, bucket: BucketId) -> (f64, f64) {
        (
            (bucket.lat_index as f64 + 0.5) * self.bucket_size_degrees,
            (bucket.lon_index as f64 + 0.5) * self.bucket_size_degrees,
        )
    }
}
