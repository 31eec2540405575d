//! Integration test: booking encoding against the shipped encoder artifacts

use std::path::PathBuf;

use polars::prelude::{NamedFrom, Series};
use staywise::artifacts::EncoderArtifact;
use staywise::booking::{frozen_columns, records_to_frame, BookingRecord};
use staywise::encoding::{FeaturePipeline, UnknownCategoryPolicy};
use staywise::StaywiseError;

fn artifact(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts").join(name)
}

fn combined() -> FeaturePipeline {
    EncoderArtifact::load(artifact("encoder.json")).unwrap().0
}

fn split() -> FeaturePipeline {
    EncoderArtifact::load(artifact("encoder_split.json")).unwrap().0
}

fn far_ahead_booking() -> BookingRecord {
    BookingRecord {
        lead_time: 250,
        no_of_adults: 1,
        type_of_meal_plan: "Not Selected".to_string(),
        room_type_reserved: "Room_Type 3".to_string(),
        market_segment_type: "Offline".to_string(),
        no_of_previous_cancellations: 2,
        avg_price_per_room: 200.0,
        ..BookingRecord::default()
    }
}

#[test]
fn test_shipped_encoder_matches_frozen_schema() {
    let pipeline = combined();
    assert_eq!(pipeline.expected_columns(), frozen_columns().as_slice());
    assert_eq!(pipeline.n_features(), 27);
}

#[test]
fn test_output_follows_expected_columns() {
    let pipeline = combined();
    let features = pipeline.encode(&far_ahead_booking()).unwrap();

    assert_eq!(features.columns(), pipeline.expected_columns());
    assert_eq!(features.values().dim(), (1, 27));
    assert!(features.filled().is_empty());
}

#[test]
fn test_one_hot_groups_have_single_indicator() {
    let features = combined().encode(&far_ahead_booking()).unwrap();
    let row = features.named_row(0);

    for prefix in ["type_of_meal_plan_", "room_type_reserved_", "market_segment_type_"] {
        let hot: Vec<&String> = row
            .iter()
            .filter(|(name, value)| name.starts_with(prefix) && *value == 1.0)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(hot.len(), 1, "group {} should have exactly one indicator set", prefix);
    }

    let value = |name: &str| row.iter().find(|(n, _)| n == name).map(|(_, v)| *v).unwrap();
    assert_eq!(value("type_of_meal_plan_Not Selected"), 1.0);
    assert_eq!(value("room_type_reserved_Room_Type 3"), 1.0);
    assert_eq!(value("market_segment_type_Offline"), 1.0);
    assert_eq!(value("lead_time"), 250.0);
    assert_eq!(value("avg_price_per_room"), 200.0);
}

#[test]
fn test_encoding_is_deterministic() {
    let pipeline = combined();
    let record = far_ahead_booking();

    let first = pipeline.encode(&record).unwrap();
    let second = pipeline.encode(&record).unwrap();
    assert_eq!(first.values(), second.values());
}

#[test]
fn test_arrival_fields_do_not_reach_features() {
    let pipeline = combined();
    let record = far_ahead_booking();
    let dated = BookingRecord {
        arrival_year: Some(2018),
        arrival_month: Some(10),
        arrival_date: Some(2),
        ..record.clone()
    };

    let plain = pipeline.encode(&record).unwrap();
    let with_dates = pipeline.encode(&dated).unwrap();
    assert_eq!(plain.values(), with_dates.values());
    assert!(with_dates.dropped().contains(&"arrival_month".to_string()));
}

#[test]
fn test_unknown_category_rejected_by_default() {
    let record = BookingRecord {
        market_segment_type: "Travel Agent".to_string(),
        ..BookingRecord::default()
    };

    match combined().encode(&record) {
        Err(StaywiseError::UnknownCategory { field, value }) => {
            assert_eq!(field, "market_segment_type");
            assert_eq!(value, "Travel Agent");
        }
        other => panic!("expected an unknown category error, got {:?}", other),
    }
}

#[test]
fn test_unknown_category_zero_filled_on_request() {
    let pipeline = combined().with_unknown_policy(UnknownCategoryPolicy::ZeroFill);
    let record = BookingRecord {
        room_type_reserved: "Suite".to_string(),
        ..BookingRecord::default()
    };

    let features = pipeline.encode(&record).unwrap();
    let room_total: f64 = features
        .named_row(0)
        .iter()
        .filter(|(name, _)| name.starts_with("room_type_reserved_"))
        .map(|(_, v)| v)
        .sum();
    assert_eq!(room_total, 0.0);
}

#[test]
fn test_combined_and_split_schemes_agree() {
    let records = vec![
        BookingRecord::default(),
        far_ahead_booking(),
        BookingRecord {
            required_car_parking_space: 1,
            repeated_guest: 1,
            no_of_previous_bookings_not_canceled: 4,
            market_segment_type: "Corporate".to_string(),
            ..BookingRecord::default()
        },
    ];
    let raw = records_to_frame(&records).unwrap();

    let a = combined().encode_frame(&raw).unwrap();
    let b = split().encode_frame(&raw).unwrap();
    assert_eq!(a.columns(), b.columns());
    assert_eq!(a.values(), b.values());
}

#[test]
fn test_split_scheme_rejects_unknown_text_flag() {
    let mut raw = records_to_frame(&[BookingRecord::default()]).unwrap();
    raw.with_column(Series::new("repeated_guest".into(), &["3"])).unwrap();

    let err = split().encode_frame(&raw).unwrap_err();
    assert!(err.is_encoding(), "unexpected error: {}", err);
}

#[test]
fn test_table_ranges_checked_like_single_records() {
    let mut raw = records_to_frame(&[BookingRecord::default(), far_ahead_booking()]).unwrap();
    raw.with_column(Series::new("required_car_parking_space".into(), &[0i32, 7])).unwrap();

    for pipeline in [combined(), split()] {
        match pipeline.encode_frame(&raw) {
            Err(StaywiseError::InvalidInput(message)) => {
                assert!(message.contains("required_car_parking_space"));
                assert!(message.contains("row 1"));
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }
}

#[test]
fn test_invalid_flag_rejected_before_encoding() {
    let record = BookingRecord {
        repeated_guest: 2,
        ..BookingRecord::default()
    };
    assert!(matches!(combined().encode(&record), Err(StaywiseError::InvalidInput(_))));
}
