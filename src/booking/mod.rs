//! Booking record data model
//!
//! Provides the raw, user-entered booking attributes:
//! - Column names shared by the form, the raw table and the encoder artifact
//! - Fixed vocabularies of the categorical fields
//! - [`BookingRecord`] with validation and conversion to a polars table

mod record;

pub use record::{records_to_frame, validate_frame, BookingRecord};

/// Column names of the raw booking table
pub mod fields {
    pub const LEAD_TIME: &str = "lead_time";
    pub const NO_OF_ADULTS: &str = "no_of_adults";
    pub const NO_OF_CHILDREN: &str = "no_of_children";
    pub const NO_OF_WEEKEND_NIGHTS: &str = "no_of_weekend_nights";
    pub const NO_OF_WEEK_NIGHTS: &str = "no_of_week_nights";
    pub const TYPE_OF_MEAL_PLAN: &str = "type_of_meal_plan";
    pub const ROOM_TYPE_RESERVED: &str = "room_type_reserved";
    pub const MARKET_SEGMENT_TYPE: &str = "market_segment_type";
    pub const REQUIRED_CAR_PARKING_SPACE: &str = "required_car_parking_space";
    pub const REPEATED_GUEST: &str = "repeated_guest";
    pub const NO_OF_PREVIOUS_CANCELLATIONS: &str = "no_of_previous_cancellations";
    pub const NO_OF_PREVIOUS_BOOKINGS_NOT_CANCELED: &str = "no_of_previous_bookings_not_canceled";
    pub const AVG_PRICE_PER_ROOM: &str = "avg_price_per_room";
    pub const NO_OF_SPECIAL_REQUESTS: &str = "no_of_special_requests";
    pub const ARRIVAL_YEAR: &str = "arrival_year";
    pub const ARRIVAL_MONTH: &str = "arrival_month";
    pub const ARRIVAL_DATE: &str = "arrival_date";

    /// Categorical fields, expanded into indicator columns
    pub const CATEGORICAL: [&str; 3] = [TYPE_OF_MEAL_PLAN, ROOM_TYPE_RESERVED, MARKET_SEGMENT_TYPE];

    /// Binary flag fields
    pub const BINARY: [&str; 2] = [REQUIRED_CAR_PARKING_SPACE, REPEATED_GUEST];

    /// Non-negative count fields
    pub const COUNTS: [&str; 8] = [
        LEAD_TIME,
        NO_OF_ADULTS,
        NO_OF_CHILDREN,
        NO_OF_WEEKEND_NIGHTS,
        NO_OF_WEEK_NIGHTS,
        NO_OF_PREVIOUS_CANCELLATIONS,
        NO_OF_PREVIOUS_BOOKINGS_NOT_CANCELED,
        NO_OF_SPECIAL_REQUESTS,
    ];

    /// Numeric and flag columns in their frozen training-time order
    pub const PASSTHROUGH: [&str; 11] = [
        LEAD_TIME,
        NO_OF_ADULTS,
        NO_OF_CHILDREN,
        NO_OF_WEEKEND_NIGHTS,
        NO_OF_WEEK_NIGHTS,
        REQUIRED_CAR_PARKING_SPACE,
        REPEATED_GUEST,
        NO_OF_PREVIOUS_CANCELLATIONS,
        NO_OF_PREVIOUS_BOOKINGS_NOT_CANCELED,
        AVG_PRICE_PER_ROOM,
        NO_OF_SPECIAL_REQUESTS,
    ];
}

/// Meal plans offered by the booking form
pub const MEAL_PLANS: [&str; 4] = ["Meal Plan 1", "Meal Plan 2", "Meal Plan 3", "Not Selected"];

/// Reserved room types
pub const ROOM_TYPES: [&str; 7] = [
    "Room_Type 1",
    "Room_Type 2",
    "Room_Type 3",
    "Room_Type 4",
    "Room_Type 5",
    "Room_Type 6",
    "Room_Type 7",
];

/// Market segments, in the order the form lists them
pub const MARKET_SEGMENTS: [&str; 5] = ["Offline", "Online", "Corporate", "Aviation", "Complementary"];

/// Vocabulary of a categorical field, if the field is categorical
pub fn vocabulary(field: &str) -> Option<&'static [&'static str]> {
    match field {
        fields::TYPE_OF_MEAL_PLAN => Some(&MEAL_PLANS),
        fields::ROOM_TYPE_RESERVED => Some(&ROOM_TYPES),
        fields::MARKET_SEGMENT_TYPE => Some(&MARKET_SEGMENTS),
        _ => None,
    }
}

/// The frozen training-time column order: passthrough columns followed by
/// the indicator columns of each categorical field in sorted category order.
pub fn frozen_columns() -> Vec<String> {
    let mut columns: Vec<String> = fields::PASSTHROUGH.iter().map(|s| s.to_string()).collect();
    for field in fields::CATEGORICAL {
        let mut categories: Vec<&str> = vocabulary(field).map(|v| v.to_vec()).unwrap_or_default();
        categories.sort_unstable();
        columns.extend(categories.into_iter().map(|c| format!("{}_{}", field, c)));
    }
    columns
}
