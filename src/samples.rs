//! Built-in sample bookings offered as one-click test cases

use crate::booking::BookingRecord;
use crate::inference::CancellationLabel;
use serde::Serialize;

/// A named booking with the outcome the shipped model gives it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleCase {
    pub name: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub record: BookingRecord,
    pub expected: CancellationLabel,
}

pub fn sample_cases() -> Vec<SampleCase> {
    vec![
        SampleCase {
            name: "likely-kept",
            title: "Short-notice online stay",
            description: "Booked the same day online for two adults, one special request",
            record: BookingRecord {
                lead_time: 0,
                no_of_adults: 2,
                no_of_children: 0,
                no_of_weekend_nights: 1,
                no_of_week_nights: 2,
                type_of_meal_plan: "Meal Plan 1".to_string(),
                room_type_reserved: "Room_Type 1".to_string(),
                market_segment_type: "Online".to_string(),
                required_car_parking_space: 0,
                repeated_guest: 0,
                no_of_previous_cancellations: 0,
                no_of_previous_bookings_not_canceled: 0,
                avg_price_per_room: 100.0,
                no_of_special_requests: 1,
                arrival_year: None,
                arrival_month: None,
                arrival_date: None,
            },
            expected: CancellationLabel::NotCancelled,
        },
        SampleCase {
            name: "likely-cancelled",
            title: "Far-ahead offline booking",
            description: "Booked 250 days ahead, no meal plan, guest cancelled twice before",
            record: BookingRecord {
                lead_time: 250,
                no_of_adults: 1,
                no_of_children: 0,
                no_of_weekend_nights: 0,
                no_of_week_nights: 1,
                type_of_meal_plan: "Not Selected".to_string(),
                room_type_reserved: "Room_Type 3".to_string(),
                market_segment_type: "Offline".to_string(),
                required_car_parking_space: 0,
                repeated_guest: 0,
                no_of_previous_cancellations: 2,
                no_of_previous_bookings_not_canceled: 0,
                avg_price_per_room: 200.0,
                no_of_special_requests: 0,
                arrival_year: None,
                arrival_month: None,
                arrival_date: None,
            },
            expected: CancellationLabel::Cancelled,
        },
    ]
}

pub fn find(name: &str) -> Option<SampleCase> {
    sample_cases().into_iter().find(|case| case.name == name)
}
