//! Raw booking record

use super::fields;
use crate::error::{Result, StaywiseError};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// One booking as entered by the user
///
/// Field names double as the raw table's column names. A record is built
/// per interaction, encoded once and then dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRecord {
    #[serde(default)]
    pub lead_time: u32,
    pub no_of_adults: u32,
    pub no_of_children: u32,
    pub no_of_weekend_nights: u32,
    pub no_of_week_nights: u32,
    pub type_of_meal_plan: String,
    pub room_type_reserved: String,
    pub market_segment_type: String,
    pub required_car_parking_space: u8,
    pub repeated_guest: u8,
    pub no_of_previous_cancellations: u32,
    pub no_of_previous_bookings_not_canceled: u32,
    pub avg_price_per_room: f64,
    pub no_of_special_requests: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_year: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_month: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<u32>,
}

impl Default for BookingRecord {
    fn default() -> Self {
        Self {
            lead_time: 0,
            no_of_adults: 2,
            no_of_children: 0,
            no_of_weekend_nights: 0,
            no_of_week_nights: 1,
            type_of_meal_plan: "Meal Plan 1".to_string(),
            room_type_reserved: "Room_Type 1".to_string(),
            market_segment_type: "Online".to_string(),
            required_car_parking_space: 0,
            repeated_guest: 0,
            no_of_previous_cancellations: 0,
            no_of_previous_bookings_not_canceled: 0,
            avg_price_per_room: 100.0,
            no_of_special_requests: 0,
            arrival_year: None,
            arrival_month: None,
            arrival_date: None,
        }
    }
}

impl BookingRecord {
    /// Check value ranges the type system does not cover.
    ///
    /// Category membership is checked by the encoder under its
    /// unknown-category policy.
    pub fn validate(&self) -> Result<()> {
        for (name, flag) in [
            (fields::REQUIRED_CAR_PARKING_SPACE, self.required_car_parking_space),
            (fields::REPEATED_GUEST, self.repeated_guest),
        ] {
            if flag > 1 {
                return Err(StaywiseError::InvalidInput(format!(
                    "{} must be 0 or 1, got {}",
                    name, flag
                )));
            }
        }

        if !self.avg_price_per_room.is_finite() || self.avg_price_per_room < 0.0 {
            return Err(StaywiseError::InvalidInput(format!(
                "{} must be a non-negative number, got {}",
                fields::AVG_PRICE_PER_ROOM,
                self.avg_price_per_room
            )));
        }

        if let Some(month) = self.arrival_month {
            if !(1..=12).contains(&month) {
                return Err(StaywiseError::InvalidInput(format!(
                    "{} must be within 1..=12, got {}",
                    fields::ARRIVAL_MONTH,
                    month
                )));
            }
        }

        if let Some(day) = self.arrival_date {
            if !(1..=31).contains(&day) {
                return Err(StaywiseError::InvalidInput(format!(
                    "{} must be within 1..=31, got {}",
                    fields::ARRIVAL_DATE,
                    day
                )));
            }
        }

        Ok(())
    }

    /// Build the single-row raw table for this record
    pub fn to_frame(&self) -> Result<DataFrame> {
        records_to_frame(std::slice::from_ref(self))
    }

    /// Field/value pairs in form order, used to show the record a prediction was made from
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        let mut entries = vec![
            (fields::LEAD_TIME, self.lead_time.to_string()),
            (fields::NO_OF_ADULTS, self.no_of_adults.to_string()),
            (fields::NO_OF_CHILDREN, self.no_of_children.to_string()),
            (fields::NO_OF_WEEKEND_NIGHTS, self.no_of_weekend_nights.to_string()),
            (fields::NO_OF_WEEK_NIGHTS, self.no_of_week_nights.to_string()),
            (fields::TYPE_OF_MEAL_PLAN, self.type_of_meal_plan.clone()),
            (fields::ROOM_TYPE_RESERVED, self.room_type_reserved.clone()),
            (fields::MARKET_SEGMENT_TYPE, self.market_segment_type.clone()),
            (fields::REQUIRED_CAR_PARKING_SPACE, self.required_car_parking_space.to_string()),
            (fields::REPEATED_GUEST, self.repeated_guest.to_string()),
            (fields::NO_OF_PREVIOUS_CANCELLATIONS, self.no_of_previous_cancellations.to_string()),
            (
                fields::NO_OF_PREVIOUS_BOOKINGS_NOT_CANCELED,
                self.no_of_previous_bookings_not_canceled.to_string(),
            ),
            (fields::AVG_PRICE_PER_ROOM, format!("{:.2}", self.avg_price_per_room)),
            (fields::NO_OF_SPECIAL_REQUESTS, self.no_of_special_requests.to_string()),
        ];
        if let Some(year) = self.arrival_year {
            entries.push((fields::ARRIVAL_YEAR, year.to_string()));
        }
        if let Some(month) = self.arrival_month {
            entries.push((fields::ARRIVAL_MONTH, month.to_string()));
        }
        if let Some(day) = self.arrival_date {
            entries.push((fields::ARRIVAL_DATE, day.to_string()));
        }
        entries
    }
}

fn int_column(name: &str, records: &[BookingRecord], get: impl Fn(&BookingRecord) -> u32) -> Column {
    let values: Vec<i64> = records.iter().map(|r| get(r) as i64).collect();
    Series::new(name.into(), values).into()
}

fn flag_column(name: &str, records: &[BookingRecord], get: impl Fn(&BookingRecord) -> u8) -> Column {
    let values: Vec<i32> = records.iter().map(|r| get(r) as i32).collect();
    Series::new(name.into(), values).into()
}

fn str_column(name: &str, records: &[BookingRecord], get: impl Fn(&BookingRecord) -> &str) -> Column {
    let values: Vec<&str> = records.iter().map(|r| get(r)).collect();
    Series::new(name.into(), values).into()
}

fn optional_column(
    name: &str,
    records: &[BookingRecord],
    get: impl Fn(&BookingRecord) -> Option<u32>,
) -> Option<Column> {
    if records.iter().all(|r| get(r).is_none()) {
        return None;
    }
    let values: Vec<Option<i64>> = records.iter().map(|r| get(r).map(|v| v as i64)).collect();
    Some(Series::new(name.into(), values).into())
}

/// Stack records into one raw table.
///
/// Counts become Int64, flags Int32, price Float64 and categorical fields
/// String. Arrival-date columns appear only when some record carries them.
pub fn records_to_frame(records: &[BookingRecord]) -> Result<DataFrame> {
    if records.is_empty() {
        return Err(StaywiseError::InvalidInput("no booking records given".to_string()));
    }

    let mut columns = vec![
        int_column(fields::LEAD_TIME, records, |r| r.lead_time),
        int_column(fields::NO_OF_ADULTS, records, |r| r.no_of_adults),
        int_column(fields::NO_OF_CHILDREN, records, |r| r.no_of_children),
        int_column(fields::NO_OF_WEEKEND_NIGHTS, records, |r| r.no_of_weekend_nights),
        int_column(fields::NO_OF_WEEK_NIGHTS, records, |r| r.no_of_week_nights),
        str_column(fields::TYPE_OF_MEAL_PLAN, records, |r| r.type_of_meal_plan.as_str()),
        str_column(fields::ROOM_TYPE_RESERVED, records, |r| r.room_type_reserved.as_str()),
        str_column(fields::MARKET_SEGMENT_TYPE, records, |r| r.market_segment_type.as_str()),
        flag_column(fields::REQUIRED_CAR_PARKING_SPACE, records, |r| r.required_car_parking_space),
        flag_column(fields::REPEATED_GUEST, records, |r| r.repeated_guest),
        int_column(fields::NO_OF_PREVIOUS_CANCELLATIONS, records, |r| r.no_of_previous_cancellations),
        int_column(fields::NO_OF_PREVIOUS_BOOKINGS_NOT_CANCELED, records, |r| {
            r.no_of_previous_bookings_not_canceled
        }),
        Series::new(
            fields::AVG_PRICE_PER_ROOM.into(),
            records.iter().map(|r| r.avg_price_per_room).collect::<Vec<f64>>(),
        )
        .into(),
        int_column(fields::NO_OF_SPECIAL_REQUESTS, records, |r| r.no_of_special_requests),
    ];

    columns.extend(optional_column(fields::ARRIVAL_YEAR, records, |r| r.arrival_year));
    columns.extend(optional_column(fields::ARRIVAL_MONTH, records, |r| r.arrival_month));
    columns.extend(optional_column(fields::ARRIVAL_DATE, records, |r| r.arrival_date));

    Ok(DataFrame::new(columns)?)
}

/// Numeric values of `name`, or `None` when the column is absent or textual.
///
/// Text columns are left to the encoders, which report them precisely.
fn numeric_values(df: &DataFrame, name: &str) -> Result<Option<Vec<Option<f64>>>> {
    let column = match df.column(name) {
        Ok(column) => column,
        Err(_) => return Ok(None),
    };
    if column.dtype() == &DataType::String {
        return Ok(None);
    }
    let casted = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(Some(casted.f64()?.into_iter().collect()))
}

fn check_column(
    df: &DataFrame,
    name: &str,
    rule: &str,
    accept: impl Fn(f64) -> bool,
) -> Result<()> {
    let Some(values) = numeric_values(df, name)? else {
        return Ok(());
    };
    for (row, value) in values.into_iter().enumerate() {
        if let Some(value) = value {
            if !accept(value) {
                return Err(StaywiseError::InvalidInput(format!(
                    "{} must be {}, got {} in row {}",
                    name, rule, value, row
                )));
            }
        }
    }
    Ok(())
}

/// Apply the range checks of [`BookingRecord::validate`] to a raw table.
///
/// Absent columns and nulls are not checked here; the encoders and the
/// aligner reject those.
pub fn validate_frame(df: &DataFrame) -> Result<()> {
    for name in fields::BINARY {
        check_column(df, name, "0 or 1", |v| v == 0.0 || v == 1.0)?;
    }
    for name in fields::COUNTS {
        check_column(df, name, "a non-negative whole number", |v| v >= 0.0 && v.fract() == 0.0)?;
    }
    check_column(df, fields::AVG_PRICE_PER_ROOM, "a non-negative number", |v| {
        v.is_finite() && v >= 0.0
    })?;
    check_column(df, fields::ARRIVAL_MONTH, "within 1..=12", |v| (1.0..=12.0).contains(&v))?;
    check_column(df, fields::ARRIVAL_DATE, "within 1..=31", |v| (1.0..=31.0).contains(&v))?;
    Ok(())
}
