//! Property tests for trend score decay.

use chrono::{Duration, TimeZone, Utc};
use newsflow_core::geo::BucketId;
use newsflow_core::trend::TrendAggregate;
use proptest::prelude::*;
use uuid::Uuid;

const LAMBDA: f64 = std::f64::consts::LN_2 / 360.0;

fn aggregate_with_score(score: f64) -> TrendAggregate {
    let mut aggregate = TrendAggregate::new(
        BucketId {
            lat_index: 0,
            lon_index: 0,
        },
        Uuid::new_v4(),
        Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    );
    aggregate.score = score;
    aggregate
}

proptest! {
    /// Decay never increases a score and never produces a negative one.
    #[test]
    fn decay_is_bounded(score in 0.0f64..1e6, minutes in 0i64..100_000) {
        let aggregate = aggregate_with_score(score);
        let reference = aggregate.last_interaction_at + Duration::minutes(minutes);
        let decayed = aggregate.decayed_score(reference, LAMBDA);
        prop_assert!(decayed >= 0.0);
        prop_assert!(decayed <= score + 1e-9);
    }

    /// More elapsed time means no higher a decayed score.
    #[test]
    fn decay_is_monotonic_in_time(
        score in 0.001f64..1e6,
        earlier in 0i64..50_000,
        gap in 0i64..50_000,
    ) {
        let aggregate = aggregate_with_score(score);
        let t1 = aggregate.last_interaction_at + Duration::minutes(earlier);
        let t2 = t1 + Duration::minutes(gap);
        prop_assert!(aggregate.decayed_score(t2, LAMBDA) <= aggregate.decayed_score(t1, LAMBDA) + 1e-9);
    }

    /// Registering an event never lowers the score below the increment.
    #[test]
    fn register_event_adds_at_least_increment(
        score in 0.0f64..1e6,
        increment in prop::sample::select(vec![1.0f64, 3.0, 5.0]),
        minutes in 0i64..100_000,
    ) {
        let mut aggregate = aggregate_with_score(score);
        let at = aggregate.last_interaction_at + Duration::minutes(minutes);
        aggregate.register_event(increment, at, LAMBDA);
        prop_assert!(aggregate.score >= increment - 1e-9);
        prop_assert_eq!(aggregate.event_count, 1);
    }

    /// A non-positive stored score always decays to exactly zero.
    #[test]
    fn non_positive_scores_decay_to_zero(score in -1e6f64..=0.0, minutes in 0i64..10_000) {
        let aggregate = aggregate_with_score(score);
        let reference = aggregate.last_interaction_at + Duration::minutes(minutes);
        prop_assert_eq!(aggregate.decayed_score(reference, LAMBDA), 0.0);
    }
}
